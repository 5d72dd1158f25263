//! Error definitions shared by the manager and the controller backends.
//! Every failure is also a plain pass/fail: callers that only care about
//! success check `result.is_ok()`.
use crate::driver::twai::TwaiError;
use thiserror_no_std::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Failures of the frame send/receive path.
pub enum CanError {
    /// `send`/`receive` called before `init` or after `stop`.
    #[error("CAN not running")]
    NotRunning,
    /// FlexCAN had no free transmit mailbox for the frame.
    #[error("Transmit rejected by the controller")]
    TxRejected,
    /// FlexCAN receive mailboxes hold no frame.
    #[error("No frame available")]
    Empty,
    /// The TWAI driver did not complete the call within its timeout.
    #[error("Driver call timed out")]
    Timeout,
    /// Any other status reported by the TWAI driver.
    #[error("TWAI driver error: {0}")]
    Twai(TwaiError),
}

impl From<TwaiError> for CanError {
    fn from(err: TwaiError) -> Self {
        match err {
            TwaiError::Timeout => CanError::Timeout,
            other => CanError::Twai(other),
        }
    }
}

impl CanError {
    /// Returns `true` when the call may succeed if simply repeated
    /// (empty mailbox or timeout).
    #[inline]
    pub const fn is_transient(&self) -> bool {
        matches!(self, CanError::Empty | CanError::Timeout)
    }
}

impl embedded_can::Error for CanError {
    fn kind(&self) -> embedded_can::ErrorKind {
        embedded_can::ErrorKind::Other
    }
}
