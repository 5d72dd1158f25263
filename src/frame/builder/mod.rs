//! Fluent construction of [`CanFrame`] values.
//!
//! Every setter consumes and returns the builder so calls chain; setting a
//! field twice keeps the last value. Lengths are clamped to eight bytes.
use crate::frame::{CanFrame, FrameFlags, MAX_DATA_LEN};

/// Fluent builder used to construct a `CanFrame`.
///
/// # Example
///
/// ```
/// use canfetti::frame::CanFrame;
///
/// let frame = CanFrame::builder()
///     .id(0x18FF_5010)
///     .extended(true)
///     .data(&[0x01, 0x02, 0x03])
///     .build();
///
/// assert_eq!(frame.raw_id(), 0x18FF_5010);
/// assert!(frame.is_extended());
/// assert_eq!(frame.data(), &[0x01, 0x02, 0x03]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FrameBuilder {
    frame: CanFrame,
}

impl FrameBuilder {
    /// Initialize the builder with an empty standard data frame.
    #[inline]
    pub const fn new() -> Self {
        Self {
            frame: CanFrame {
                id: 0,
                len: 0,
                data: [0; MAX_DATA_LEN],
                flags: FrameFlags {
                    extended: false,
                    remote: false,
                },
            },
        }
    }

    /// Set the identifier. Stored verbatim; width follows [`Self::extended`].
    #[inline]
    pub fn id(mut self, id: u32) -> Self {
        self.frame.set_id(id);
        self
    }

    /// Mark the identifier as 29-bit (`true`) or 11-bit (`false`).
    #[inline]
    pub fn extended(mut self, is_extended: bool) -> Self {
        let flags = self.frame.flags();
        self.frame.set_flags(FrameFlags {
            extended: is_extended,
            ..flags
        });
        self
    }

    /// Set or clear the remote transmission request flag.
    #[inline]
    pub fn remote(mut self, is_rtr: bool) -> Self {
        let flags = self.frame.flags();
        self.frame.set_flags(FrameFlags {
            remote: is_rtr,
            ..flags
        });
        self
    }

    /// Set the payload length alone (clamped to 8). Useful for remote frames,
    /// where the length announces the size of the expected reply.
    #[inline]
    pub fn data_length(mut self, length: u8) -> Self {
        self.frame.set_len(length);
        self
    }

    /// Copy up to eight payload bytes; the length becomes the number copied.
    #[inline]
    pub fn data(mut self, data: &[u8]) -> Self {
        self.frame.set_data(data);
        self
    }

    /// Build the final `CanFrame`.
    #[inline]
    pub const fn build(&self) -> CanFrame {
        self.frame
    }
}

impl Default for FrameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl From<CanFrame> for FrameBuilder {
    /// Start from an existing frame, e.g. to answer with a modified copy.
    fn from(frame: CanFrame) -> Self {
        Self { frame }
    }
}
