//! FlexCAN backend (NXP i.MX RT, Teensy 4.0 / 4.1).
//!
//! The FlexCAN driver owns its mailboxes and ring buffers: `write` queues a
//! frame and returns at once, `read` polls the receive buffer without
//! waiting. The adapter therefore never blocks, and the receive timeout is
//! ignored.
use crate::{
    config::FlexCanConfig,
    driver::CanBackend,
    error::CanError,
    frame::{clamp_len, CanFrame, FrameFlags, MAX_DATA_LEN},
};
use embassy_time::Duration;

/// Status returned by [`FlexCan::write`] once the frame is queued.
pub const WRITE_QUEUED: i32 = 1;

/// Flags of a FlexCAN message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlexCanFlags {
    pub extended: bool,
    pub remote: bool,
    /// Set by the driver when the receive buffer overflowed before this frame.
    pub overrun: bool,
}

/// Message layout used by the FlexCAN driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlexCanMessage {
    pub id: u32,
    /// Data length code. The driver may report up to 8.
    pub len: u8,
    pub buf: [u8; MAX_DATA_LEN],
    pub flags: FlexCanFlags,
    /// Free-running timer value captured on reception.
    pub timestamp: u16,
    /// Mailbox that handled the frame, `-1` when unknown.
    pub mb: i8,
}

impl From<&CanFrame> for FlexCanMessage {
    fn from(frame: &CanFrame) -> Self {
        let mut msg = FlexCanMessage {
            id: frame.raw_id(),
            len: frame.len(),
            flags: FlexCanFlags {
                extended: frame.is_extended(),
                remote: frame.is_remote(),
                overrun: false,
            },
            mb: -1,
            ..FlexCanMessage::default()
        };
        msg.buf[..frame.len() as usize].copy_from_slice(frame.data());
        msg
    }
}

impl From<&FlexCanMessage> for CanFrame {
    fn from(msg: &FlexCanMessage) -> Self {
        let len = clamp_len(msg.len as usize) as usize;
        let mut frame = CanFrame::from_parts(
            msg.id,
            &msg.buf[..len],
            FrameFlags {
                extended: msg.flags.extended,
                remote: msg.flags.remote,
            },
        );
        // Remote frames carry a length without data; keep it.
        frame.set_len(msg.len);
        frame
    }
}

/// Calls of the FlexCAN driver used by the backend.
///
/// Implemented by board support code on top of the real peripheral driver,
/// or by a test double.
pub trait FlexCan {
    /// Enable the peripheral clocks, pins and mailboxes.
    fn begin(&mut self, config: &FlexCanConfig);
    /// Program the nominal bit rate; the driver computes the bit timing.
    fn set_baud_rate(&mut self, bitrate: u32);
    /// Queue a frame; returns [`WRITE_QUEUED`] on success.
    fn write(&mut self, msg: &FlexCanMessage) -> i32;
    /// Pop the oldest received frame, if any.
    fn read(&mut self) -> Option<FlexCanMessage>;
    /// Put the controller back in reset.
    fn reset(&mut self);
}

impl<T: FlexCan + ?Sized> FlexCan for &mut T {
    fn begin(&mut self, config: &FlexCanConfig) {
        (**self).begin(config)
    }

    fn set_baud_rate(&mut self, bitrate: u32) {
        (**self).set_baud_rate(bitrate)
    }

    fn write(&mut self, msg: &FlexCanMessage) -> i32 {
        (**self).write(msg)
    }

    fn read(&mut self) -> Option<FlexCanMessage> {
        (**self).read()
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}

/// [`CanBackend`] over a FlexCAN driver.
#[derive(Debug)]
pub struct FlexCanBackend<D> {
    driver: D,
    config: FlexCanConfig,
}

impl<D: FlexCan> FlexCanBackend<D> {
    /// Backend on `CAN1` with the default buffer depths.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, FlexCanConfig::default())
    }

    pub fn with_config(driver: D, config: FlexCanConfig) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> &FlexCanConfig {
        &self.config
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Release the driver.
    pub fn into_driver(self) -> D {
        self.driver
    }
}

impl<D: FlexCan> CanBackend for FlexCanBackend<D> {
    fn open(&mut self, bitrate: u32) -> Result<(), CanError> {
        self.driver.begin(&self.config);
        // Any rate is passed through; the driver works out the timing.
        self.driver.set_baud_rate(bitrate);
        Ok(())
    }

    fn close(&mut self) {
        self.driver.reset();
    }

    fn transmit(&mut self, frame: &CanFrame) -> Result<(), CanError> {
        let msg = FlexCanMessage::from(frame);
        if self.driver.write(&msg) == WRITE_QUEUED {
            Ok(())
        } else {
            Err(CanError::TxRejected)
        }
    }

    fn receive(&mut self, _timeout: Duration) -> Result<CanFrame, CanError> {
        self.driver
            .read()
            .map(|msg| CanFrame::from(&msg))
            .ok_or(CanError::Empty)
    }
}
