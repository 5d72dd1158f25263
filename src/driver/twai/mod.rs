//! TWAI backend (ESP32 family).
//!
//! The TWAI driver is installed with three configuration blocks (general,
//! timing, filter), then started. Transmit and receive block on the driver
//! queues for a bounded time: transmit for [`TWAI_TRANSMIT_TIMEOUT`],
//! receive for the caller's timeout.
use crate::{
    config::{Bitrate, TwaiConfig, TwaiMode, TwaiTiming, TWAI_IO_UNUSED, TWAI_TRANSMIT_TIMEOUT},
    driver::CanBackend,
    error::CanError,
    frame::{clamp_len, CanFrame, FrameFlags, MAX_DATA_LEN},
};
use embassy_time::Duration;
use thiserror_no_std::Error;

/// Message uses a 29-bit identifier.
pub const TWAI_MSG_FLAG_EXTD: u32 = 0x01;
/// Message is a remote frame.
pub const TWAI_MSG_FLAG_RTR: u32 = 0x02;
/// Transmit as a single shot (no retransmission on error).
pub const TWAI_MSG_FLAG_SS: u32 = 0x04;
/// Transmit as a self-reception request.
pub const TWAI_MSG_FLAG_SELF: u32 = 0x08;

/// No alert enabled.
pub const TWAI_ALERT_NONE: u32 = 0;
/// Level-1 (lowest priority) interrupt allocation.
pub const INTR_FLAG_LEVEL1: u32 = 1 << 1;

//==================================================================================STATUS
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Non-success status codes of the TWAI driver.
pub enum TwaiError {
    /// An argument (configuration, message) was rejected.
    #[error("Invalid argument")]
    InvalidArg,
    /// The driver is not in the right state (not installed, not running…).
    #[error("Invalid state")]
    InvalidState,
    /// The queue did not accept or deliver a message in time.
    #[error("Timeout")]
    Timeout,
    /// Transmit queue disabled or generic driver failure.
    #[error("Failed")]
    Fail,
    /// Operation not supported in the current mode (e.g. transmit while listen-only).
    #[error("Not supported")]
    NotSupported,
    /// Out of memory while allocating queues.
    #[error("No memory")]
    NoMem,
}

//==================================================================================WIRE
/// Message layout used by the TWAI driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwaiMessage {
    /// Bit set of `TWAI_MSG_FLAG_*`.
    pub flags: u32,
    pub id: u32,
    /// Data length code. Values above 8 are legal on the wire but carry 8 bytes.
    pub data_length_code: u8,
    pub data: [u8; MAX_DATA_LEN],
}

impl TwaiMessage {
    #[inline]
    pub const fn is_extended(&self) -> bool {
        self.flags & TWAI_MSG_FLAG_EXTD != 0
    }

    #[inline]
    pub const fn is_remote(&self) -> bool {
        self.flags & TWAI_MSG_FLAG_RTR != 0
    }
}

impl From<&CanFrame> for TwaiMessage {
    fn from(frame: &CanFrame) -> Self {
        let mut flags = 0;
        if frame.is_extended() {
            flags |= TWAI_MSG_FLAG_EXTD;
        }
        if frame.is_remote() {
            flags |= TWAI_MSG_FLAG_RTR;
        }
        let mut msg = TwaiMessage {
            flags,
            id: frame.raw_id(),
            data_length_code: frame.len(),
            data: [0; MAX_DATA_LEN],
        };
        msg.data[..frame.len() as usize].copy_from_slice(frame.data());
        msg
    }
}

impl From<&TwaiMessage> for CanFrame {
    fn from(msg: &TwaiMessage) -> Self {
        let len = clamp_len(msg.data_length_code as usize) as usize;
        let mut frame = CanFrame::from_parts(
            msg.id,
            &msg.data[..len],
            FrameFlags {
                extended: msg.is_extended(),
                remote: msg.is_remote(),
            },
        );
        frame.set_len(msg.data_length_code);
        frame
    }
}

//==================================================================================INSTALL_CONFIG
/// General configuration block passed at install time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwaiGeneralConfig {
    pub mode: TwaiMode,
    pub tx_io: i8,
    pub rx_io: i8,
    /// Clock output pin, [`TWAI_IO_UNUSED`] when disabled.
    pub clkout_io: i8,
    /// Bus-off indicator pin, [`TWAI_IO_UNUSED`] when disabled.
    pub bus_off_io: i8,
    pub tx_queue_len: u32,
    pub rx_queue_len: u32,
    /// Bit set of enabled alerts.
    pub alerts_enabled: u32,
    pub clkout_divider: u32,
    /// Interrupt allocation flags.
    pub intr_flags: u32,
}

impl From<&TwaiConfig> for TwaiGeneralConfig {
    fn from(config: &TwaiConfig) -> Self {
        Self {
            mode: config.mode,
            tx_io: config.tx_pin,
            rx_io: config.rx_pin,
            clkout_io: TWAI_IO_UNUSED,
            bus_off_io: TWAI_IO_UNUSED,
            tx_queue_len: u32::from(config.tx_queue_len),
            rx_queue_len: u32::from(config.rx_queue_len),
            alerts_enabled: TWAI_ALERT_NONE,
            clkout_divider: 0,
            intr_flags: INTR_FLAG_LEVEL1,
        }
    }
}

/// Hardware acceptance filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwaiFilterConfig {
    pub acceptance_code: u32,
    pub acceptance_mask: u32,
    pub single_filter: bool,
}

impl TwaiFilterConfig {
    /// Let every frame through.
    pub const fn accept_all() -> Self {
        Self {
            acceptance_code: 0,
            acceptance_mask: 0xFFFF_FFFF,
            single_filter: true,
        }
    }
}

impl Default for TwaiFilterConfig {
    fn default() -> Self {
        Self::accept_all()
    }
}

//==================================================================================DRIVER
/// Calls of the TWAI driver used by the backend.
///
/// Implemented by board support code on top of the real peripheral driver,
/// or by a test double. Timeouts are converted to ticks by the implementor;
/// [`Duration::MAX`] means wait forever.
pub trait Twai {
    fn driver_install(
        &mut self,
        general: &TwaiGeneralConfig,
        timing: &TwaiTiming,
        filter: &TwaiFilterConfig,
    ) -> Result<(), TwaiError>;
    fn driver_uninstall(&mut self) -> Result<(), TwaiError>;
    fn start(&mut self) -> Result<(), TwaiError>;
    fn stop(&mut self) -> Result<(), TwaiError>;
    /// Queue a message, waiting up to `timeout` for queue space.
    fn transmit(&mut self, msg: &TwaiMessage, timeout: Duration) -> Result<(), TwaiError>;
    /// Take a message from the receive queue, waiting up to `timeout`.
    fn receive(&mut self, timeout: Duration) -> Result<TwaiMessage, TwaiError>;
}

impl<T: Twai + ?Sized> Twai for &mut T {
    fn driver_install(
        &mut self,
        general: &TwaiGeneralConfig,
        timing: &TwaiTiming,
        filter: &TwaiFilterConfig,
    ) -> Result<(), TwaiError> {
        (**self).driver_install(general, timing, filter)
    }

    fn driver_uninstall(&mut self) -> Result<(), TwaiError> {
        (**self).driver_uninstall()
    }

    fn start(&mut self) -> Result<(), TwaiError> {
        (**self).start()
    }

    fn stop(&mut self) -> Result<(), TwaiError> {
        (**self).stop()
    }

    fn transmit(&mut self, msg: &TwaiMessage, timeout: Duration) -> Result<(), TwaiError> {
        (**self).transmit(msg, timeout)
    }

    fn receive(&mut self, timeout: Duration) -> Result<TwaiMessage, TwaiError> {
        (**self).receive(timeout)
    }
}

/// [`CanBackend`] over a TWAI driver.
#[derive(Debug)]
pub struct TwaiBackend<D> {
    driver: D,
    config: TwaiConfig,
}

impl<D: Twai> TwaiBackend<D> {
    /// Backend with the default pins (TX 10, RX 9) and 32-frame queues.
    pub fn new(driver: D) -> Self {
        Self::with_config(driver, TwaiConfig::default())
    }

    pub fn with_config(driver: D, config: TwaiConfig) -> Self {
        Self { driver, config }
    }

    pub fn config(&self) -> &TwaiConfig {
        &self.config
    }

    /// Change pins or queue depths; applied on the next `open`.
    pub fn set_config(&mut self, config: TwaiConfig) {
        self.config = config;
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

impl<D: Twai> CanBackend for TwaiBackend<D> {
    fn open(&mut self, bitrate: u32) -> Result<(), CanError> {
        let general = TwaiGeneralConfig::from(&self.config);
        let timing = Bitrate::from_bps(bitrate).twai_timing();
        let filter = TwaiFilterConfig::accept_all();

        if let Err(err) = self.driver.driver_install(&general, &timing, &filter) {
            #[cfg(feature = "defmt")]
            defmt::warn!("TWAI driver install failed: {}", err);
            return Err(err.into());
        }

        if let Err(err) = self.driver.start() {
            #[cfg(feature = "defmt")]
            defmt::warn!("TWAI start failed: {}", err);
            // Leave the driver uninstalled so the next open starts clean.
            if let Err(_err) = self.driver.driver_uninstall() {
                #[cfg(feature = "defmt")]
                defmt::warn!("TWAI uninstall failed: {}", _err);
            }
            return Err(err.into());
        }

        #[cfg(feature = "defmt")]
        defmt::info!(
            "TWAI running at {} bit/s (tx {}, rx {})",
            Bitrate::from_bps(bitrate).bps(),
            general.tx_io,
            general.rx_io
        );
        Ok(())
    }

    fn close(&mut self) {
        if let Err(_err) = self.driver.stop() {
            #[cfg(feature = "defmt")]
            defmt::warn!("TWAI stop failed: {}", _err);
        }
        if let Err(_err) = self.driver.driver_uninstall() {
            #[cfg(feature = "defmt")]
            defmt::warn!("TWAI uninstall failed: {}", _err);
        }
    }

    fn transmit(&mut self, frame: &CanFrame) -> Result<(), CanError> {
        let msg = TwaiMessage::from(frame);
        self.driver
            .transmit(&msg, TWAI_TRANSMIT_TIMEOUT)
            .map_err(CanError::from)
    }

    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, CanError> {
        let msg = self.driver.receive(timeout)?;
        Ok(CanFrame::from(&msg))
    }
}

#[cfg(test)]
mod tests;
