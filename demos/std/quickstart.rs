//! # Quickstart (host)
//!
//! Drives a `CanManager` over a software TWAI driver that loops every
//! transmitted frame back into its receive queue. On a board, replace
//! `LoopbackTwai` with an implementation of `Twai` (ESP32) or `FlexCan`
//! (Teensy 4.x) on top of the vendor driver; the application code stays the
//! same.
//!
//! ```bash
//! cargo run --example quickstart
//! ```
use canfetti::{
    config::{TwaiConfig, TwaiTiming},
    driver::twai::{Twai, TwaiBackend, TwaiError, TwaiFilterConfig, TwaiGeneralConfig, TwaiMessage},
    CanError, CanFrame, CanManager,
};
use embassy_time::Duration;
use std::collections::VecDeque;

// ============================================================================
// Loopback driver
// ============================================================================

#[derive(Default)]
struct LoopbackTwai {
    installed: bool,
    started: bool,
    queue: VecDeque<TwaiMessage>,
}

impl Twai for LoopbackTwai {
    fn driver_install(
        &mut self,
        general: &TwaiGeneralConfig,
        timing: &TwaiTiming,
        _filter: &TwaiFilterConfig,
    ) -> Result<(), TwaiError> {
        if self.installed {
            return Err(TwaiError::InvalidState);
        }
        println!(
            "install: tx GPIO{} rx GPIO{} brp {} ({} quanta/bit)",
            general.tx_io,
            general.rx_io,
            timing.brp,
            timing.quanta_per_bit()
        );
        self.installed = true;
        Ok(())
    }

    fn driver_uninstall(&mut self) -> Result<(), TwaiError> {
        if !self.installed || self.started {
            return Err(TwaiError::InvalidState);
        }
        self.installed = false;
        self.queue.clear();
        Ok(())
    }

    fn start(&mut self) -> Result<(), TwaiError> {
        if !self.installed {
            return Err(TwaiError::InvalidState);
        }
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), TwaiError> {
        if !self.started {
            return Err(TwaiError::InvalidState);
        }
        self.started = false;
        Ok(())
    }

    fn transmit(&mut self, msg: &TwaiMessage, _timeout: Duration) -> Result<(), TwaiError> {
        if !self.started {
            return Err(TwaiError::InvalidState);
        }
        self.queue.push_back(*msg);
        Ok(())
    }

    fn receive(&mut self, _timeout: Duration) -> Result<TwaiMessage, TwaiError> {
        if !self.started {
            return Err(TwaiError::InvalidState);
        }
        self.queue.pop_front().ok_or(TwaiError::Timeout)
    }
}

// ============================================================================
// Main application
// ============================================================================

fn main() -> Result<(), CanError> {
    println!("=== canfetti quickstart ===");

    let backend = TwaiBackend::with_config(LoopbackTwai::default(), TwaiConfig::new().with_pins(17, 18));
    let mut can = CanManager::new(backend);

    // Sending before init is refused without touching the driver.
    let early = CanFrame::builder().id(0x100).build();
    println!("send before init: {:?}", can.send(&early));

    can.init(250_000)?;
    println!("running: {}", can.is_running());

    // OBD-II style request: standard id, 3 meaningful bytes.
    let request = CanFrame::builder()
        .id(0x7DF)
        .data(&[0x02, 0x01, 0x0C])
        .build();

    // J1939 style broadcast: extended id, full payload (extra bytes dropped).
    let broadcast = CanFrame::builder()
        .id(0x18FE_F100)
        .extended(true)
        .data(&[0x10, 0x20, 0x30, 0x40, 0x50, 0x60, 0x70, 0x80, 0x90])
        .build();

    // Remote request announcing an 8-byte reply.
    let remote = CanFrame::builder()
        .id(0x321)
        .remote(true)
        .data_length(8)
        .build();

    for frame in [request, broadcast, remote] {
        can.send(&frame)?;
        println!("TX {frame}");
    }

    loop {
        match can.receive(Duration::from_millis(10)) {
            Ok(frame) => println!(
                "RX {frame} ext={} rtr={} data={:02X?}",
                frame.is_extended(),
                frame.is_remote(),
                frame.data()
            ),
            Err(CanError::Timeout) => break,
            Err(err) => return Err(err),
        }
    }

    can.stop();
    println!("running: {}", can.is_running());
    Ok(())
}
