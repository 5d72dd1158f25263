//! Build-time backend selection.
//!
//! Enable the cargo feature of the target board and use
//! `PlatformManager` so application code stays identical across boards:
//!
//! | feature   | board             | backend                |
//! |-----------|-------------------|------------------------|
//! | `teensy4` | Teensy 4.0 / 4.1  | [`FlexCanBackend`](crate::driver::flexcan::FlexCanBackend) |
//! | `esp32`   | ESP32 family      | [`TwaiBackend`](crate::driver::twai::TwaiBackend) |
//!
//! `D` is the board's vendor driver (an implementation of
//! [`FlexCan`](crate::driver::flexcan::FlexCan) or
//! [`Twai`](crate::driver::twai::Twai)).
#[cfg(any(feature = "teensy4", feature = "esp32"))]
use crate::manager::CanManager;

#[cfg(all(feature = "teensy4", not(feature = "esp32")))]
use crate::driver::flexcan::FlexCanBackend;

#[cfg(all(feature = "esp32", not(feature = "teensy4")))]
use crate::driver::twai::TwaiBackend;

#[cfg(all(feature = "teensy4", feature = "esp32"))]
compile_error!("features `teensy4` and `esp32` are mutually exclusive");

/// Backend of the selected board.
#[cfg(all(feature = "teensy4", not(feature = "esp32")))]
pub type PlatformBackend<D> = FlexCanBackend<D>;

/// Backend of the selected board.
#[cfg(all(feature = "esp32", not(feature = "teensy4")))]
pub type PlatformBackend<D> = TwaiBackend<D>;

/// Manager over the selected board's backend.
#[cfg(any(feature = "teensy4", feature = "esp32"))]
pub type PlatformManager<D> = CanManager<PlatformBackend<D>>;

/// Name of the controller selected at build time, `None` on host builds.
pub const PLATFORM_CONTROLLER: Option<&str> = if cfg!(feature = "teensy4") {
    Some("FlexCAN")
} else if cfg!(feature = "esp32") {
    Some("TWAI")
} else {
    None
};
