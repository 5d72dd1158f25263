/// Test doubles standing in for the vendor FlexCAN and TWAI drivers.
use canfetti::{
    config::{FlexCanConfig, TwaiTiming},
    driver::{
        flexcan::{FlexCan, FlexCanMessage, WRITE_QUEUED},
        twai::{Twai, TwaiError, TwaiFilterConfig, TwaiGeneralConfig, TwaiMessage},
    },
};
use embassy_time::Duration;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
/// Every call that reached a driver double, in order.
pub enum Call {
    Begin(FlexCanConfig),
    SetBaudRate(u32),
    Write(FlexCanMessage),
    Read,
    Reset,
    Install(TwaiGeneralConfig, TwaiTiming, TwaiFilterConfig),
    Uninstall,
    Start,
    Stop,
    Transmit(TwaiMessage, Duration),
    Receive(Duration),
}

#[derive(Default)]
#[allow(dead_code)]
/// FlexCAN driver double: records calls, serves queued frames.
pub struct MockFlexCan {
    pub calls: Vec<Call>,
    pub rx: VecDeque<FlexCanMessage>,
    /// Refuse writes, as when every transmit mailbox is busy.
    pub mailboxes_full: bool,
}

#[allow(dead_code)]
impl MockFlexCan {
    pub fn written(&self) -> Vec<FlexCanMessage> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Write(msg) => Some(*msg),
                _ => None,
            })
            .collect()
    }
}

impl FlexCan for MockFlexCan {
    fn begin(&mut self, config: &FlexCanConfig) {
        self.calls.push(Call::Begin(*config));
    }

    fn set_baud_rate(&mut self, bitrate: u32) {
        self.calls.push(Call::SetBaudRate(bitrate));
    }

    fn write(&mut self, msg: &FlexCanMessage) -> i32 {
        self.calls.push(Call::Write(*msg));
        if self.mailboxes_full {
            0
        } else {
            WRITE_QUEUED
        }
    }

    fn read(&mut self) -> Option<FlexCanMessage> {
        self.calls.push(Call::Read);
        self.rx.pop_front()
    }

    fn reset(&mut self) {
        self.calls.push(Call::Reset);
    }
}

#[derive(Default)]
#[allow(dead_code)]
/// TWAI driver double: records calls, serves queued frames, and lets a test
/// script the status of each call.
pub struct MockTwai {
    pub calls: Vec<Call>,
    pub rx: VecDeque<TwaiMessage>,
    pub install_error: Option<TwaiError>,
    pub start_error: Option<TwaiError>,
    pub uninstall_error: Option<TwaiError>,
    pub transmit_error: Option<TwaiError>,
    /// Mirrors the driver state so double installs fail like the real one.
    pub installed: bool,
}

#[allow(dead_code)]
impl MockTwai {
    pub fn installed_timing(&self) -> Option<TwaiTiming> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::Install(_, timing, _) => Some(*timing),
            _ => None,
        })
    }

    pub fn transmitted(&self) -> Vec<(TwaiMessage, Duration)> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Transmit(msg, timeout) => Some((*msg, *timeout)),
                _ => None,
            })
            .collect()
    }
}

impl Twai for MockTwai {
    fn driver_install(
        &mut self,
        general: &TwaiGeneralConfig,
        timing: &TwaiTiming,
        filter: &TwaiFilterConfig,
    ) -> Result<(), TwaiError> {
        self.calls.push(Call::Install(*general, *timing, *filter));
        if let Some(err) = self.install_error {
            return Err(err);
        }
        if self.installed {
            return Err(TwaiError::InvalidState);
        }
        self.installed = true;
        Ok(())
    }

    fn driver_uninstall(&mut self) -> Result<(), TwaiError> {
        self.calls.push(Call::Uninstall);
        if let Some(err) = self.uninstall_error {
            return Err(err);
        }
        if !self.installed {
            return Err(TwaiError::InvalidState);
        }
        self.installed = false;
        Ok(())
    }

    fn start(&mut self) -> Result<(), TwaiError> {
        self.calls.push(Call::Start);
        match self.start_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn stop(&mut self) -> Result<(), TwaiError> {
        self.calls.push(Call::Stop);
        Ok(())
    }

    fn transmit(&mut self, msg: &TwaiMessage, timeout: Duration) -> Result<(), TwaiError> {
        self.calls.push(Call::Transmit(*msg, timeout));
        match self.transmit_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn receive(&mut self, timeout: Duration) -> Result<TwaiMessage, TwaiError> {
        self.calls.push(Call::Receive(timeout));
        self.rx.pop_front().ok_or(TwaiError::Timeout)
    }
}
