//! Controller backends. Each vendor driver sits behind a small trait that
//! mirrors its C API ([`flexcan::FlexCan`], [`twai::Twai`]); an adapter
//! turns it into a [`CanBackend`], the single contract the manager talks to.
//! Board support code implements the vendor trait on top of the real driver.
use crate::{error::CanError, frame::CanFrame};
use embassy_time::Duration;

pub mod flexcan;
pub mod twai;

/// Contract to open the bus and exchange frames through one controller.
///
/// All calls are blocking and must not be made from interrupt context.
pub trait CanBackend {
    /// Install and start the controller at `bitrate` bit/s.
    fn open(&mut self, bitrate: u32) -> Result<(), CanError>;
    /// Stop the controller and release the driver. Never fails.
    fn close(&mut self);
    /// Hand one frame to the driver's transmit path.
    fn transmit(&mut self, frame: &CanFrame) -> Result<(), CanError>;
    /// Fetch the next received frame, waiting at most `timeout` when the
    /// driver supports waiting.
    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, CanError>;
}

impl<B: CanBackend + ?Sized> CanBackend for &mut B {
    fn open(&mut self, bitrate: u32) -> Result<(), CanError> {
        (**self).open(bitrate)
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn transmit(&mut self, frame: &CanFrame) -> Result<(), CanError> {
        (**self).transmit(frame)
    }

    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, CanError> {
        (**self).receive(timeout)
    }
}
