//! `canfetti` library: a uniform frame send/receive API over the FlexCAN
//! (Teensy 4.x) and TWAI (ESP32) CAN controllers, plus a fluent builder for
//! frames. The vendor drivers do the real work (arbitration, filtering, bit
//! timing, error frames); this crate only selects, configures and forwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use canfetti::{config::DEFAULT_BITRATE, frame::CanFrame, platform::PlatformManager};
//!
//! let mut can = PlatformManager::new(backend);
//! can.init(DEFAULT_BITRATE)?;
//!
//! let frame = CanFrame::builder()
//!     .id(0x123)
//!     .data(&[0xDE, 0xAD, 0xBE, 0xEF])
//!     .build();
//! can.send(&frame)?;
//! ```
#![no_std]
//==================================================================================
/// Bit rates, TWAI timing presets and per-controller configuration.
pub mod config;
/// Vendor driver seam and the FlexCAN / TWAI adapters.
pub mod driver;
/// Errors reported by the manager and the backends.
pub mod error;
/// Raw CAN frame value object and its fluent builder.
pub mod frame;
/// Running-state wrapper that forwards frames to the selected backend.
pub mod manager;
/// Build-time selection of the backend for the target microcontroller.
pub mod platform;
//==================================================================================
pub use error::CanError;
pub use frame::{builder::FrameBuilder, CanFrame};
pub use manager::CanManager;
