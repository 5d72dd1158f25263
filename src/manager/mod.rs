//! Running-state wrapper around a [`CanBackend`].
//!
//! The manager only tracks whether the bus was opened: `send` and `receive`
//! are refused while idle, without reaching the driver. Nothing is retried
//! and nothing is buffered here; the vendor driver queues are the only
//! buffers.
//!
//! # Lifecycle
//!
//! ```text
//! new() ──▶ idle ──init() ok──▶ running ──stop()──▶ idle
//!             ▲      │                                │
//!             └──────┘ init() err                     └─▶ init() again
//! ```
use crate::{driver::CanBackend, error::CanError, frame::CanFrame};
use embassy_time::Duration;

/// Uniform send/receive front-end over one controller backend.
///
/// Single-threaded: every call takes `&mut self` and may block, so it must
/// not be used from interrupt context.
///
/// # Example
///
/// ```rust,ignore
/// use canfetti::{config::DEFAULT_BITRATE, CanFrame, CanManager};
/// use canfetti::driver::twai::TwaiBackend;
/// use embassy_time::Duration;
///
/// let mut can = CanManager::new(TwaiBackend::new(board_twai));
/// can.init(DEFAULT_BITRATE)?;
///
/// can.send(&CanFrame::builder().id(0x7DF).data(&[0x02, 0x01, 0x0D]).build())?;
/// let reply = can.receive(Duration::from_millis(50))?;
/// ```
#[derive(Debug)]
pub struct CanManager<B> {
    backend: B,
    running: bool,
}

impl<B: CanBackend> CanManager<B> {
    /// Wrap a backend; the bus stays closed until [`Self::init`].
    pub const fn new(backend: B) -> Self {
        Self {
            backend,
            running: false,
        }
    }

    /// Open the bus at `bitrate` bit/s.
    ///
    /// If the bus is already running it is stopped first, then reopened with
    /// the new rate. On failure the manager stays idle.
    pub fn init(&mut self, bitrate: u32) -> Result<(), CanError> {
        self.stop();
        let result = self.backend.open(bitrate);
        self.running = result.is_ok();
        result
    }

    /// Close the bus. Does nothing while idle.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.backend.close();
        self.running = false;
    }

    /// Transmit one frame.
    pub fn send(&mut self, frame: &CanFrame) -> Result<(), CanError> {
        self.ensure_running()?;
        let result = self.backend.transmit(frame);

        #[cfg(feature = "defmt")]
        match &result {
            Ok(()) => defmt::debug!("CAN TX ID: {:x} Len: {}", frame.raw_id(), frame.len()),
            Err(err) => defmt::warn!("CAN TX ID: {:x} failed: {}", frame.raw_id(), err),
        }

        result
    }

    /// Receive one frame, waiting at most `timeout` on backends that can wait.
    pub fn receive(&mut self, timeout: Duration) -> Result<CanFrame, CanError> {
        self.ensure_running()?;
        let frame = self.backend.receive(timeout)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("CAN RX ID: {:x} Len: {}", frame.raw_id(), frame.len());

        Ok(frame)
    }

    /// Receive without waiting.
    #[inline]
    pub fn try_receive(&mut self) -> Result<CanFrame, CanError> {
        self.receive(Duration::from_ticks(0))
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend, e.g. to change its configuration
    /// before the next [`Self::init`].
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Release the backend. The bus is left as it is; call [`Self::stop`]
    /// first to close it.
    pub fn into_backend(self) -> B {
        self.backend
    }

    fn ensure_running(&self) -> Result<(), CanError> {
        if self.running {
            Ok(())
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!("CAN not running");
            Err(CanError::NotRunning)
        }
    }
}

impl<B: CanBackend> embedded_can::blocking::Can for CanManager<B> {
    type Frame = CanFrame;
    type Error = CanError;

    fn transmit(&mut self, frame: &Self::Frame) -> Result<(), Self::Error> {
        self.send(frame)
    }

    /// Wait until a frame arrives. Empty mailboxes and timeouts are retried;
    /// any other failure, including an idle bus, is returned.
    fn receive(&mut self) -> Result<Self::Frame, Self::Error> {
        loop {
            match CanManager::receive(self, Duration::MAX) {
                Err(err) if err.is_transient() => continue,
                other => return other,
            }
        }
    }
}
