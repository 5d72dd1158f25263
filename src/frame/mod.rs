//! In-memory representation of a classic CAN frame as exchanged with the
//! controller drivers.
use core::{
    fmt,
    hash::{Hash, Hasher},
};
use embedded_can::{ExtendedId, Id, StandardId};

pub mod builder;

use builder::FrameBuilder;

/// Maximum payload of a classic CAN frame (bytes).
pub const MAX_DATA_LEN: usize = 8;

/// Mask of a standard 11-bit identifier.
pub const STANDARD_ID_MASK: u32 = 0x7FF;
/// Mask of an extended 29-bit identifier.
pub const EXTENDED_ID_MASK: u32 = 0x1FFF_FFFF;

/// Extended-identifier and remote-request flags carried by every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameFlags {
    /// The identifier is 29 bits wide.
    pub extended: bool,
    /// Remote transmission request: the payload is not meaningful.
    pub remote: bool,
}

/// Raw CAN frame: identifier, up to eight payload bytes and the flag pair.
///
/// The payload length never exceeds [`MAX_DATA_LEN`]; every constructor
/// clamps it. Only the first `len()` bytes of the buffer are meaningful;
/// equality and hashing ignore the bytes past it.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CanFrame {
    id: u32,
    len: u8,
    data: [u8; MAX_DATA_LEN],
    flags: FrameFlags,
}

impl CanFrame {
    /// Create a builder starting from an empty frame.
    #[inline]
    pub const fn builder() -> FrameBuilder {
        FrameBuilder::new()
    }

    /// Assemble a frame from its parts, clamping the payload to eight bytes.
    pub fn from_parts(id: u32, data: &[u8], flags: FrameFlags) -> Self {
        let mut frame = Self {
            id,
            flags,
            ..Self::default()
        };
        frame.set_data(data);
        frame
    }

    /// Raw identifier exactly as it was supplied (not masked).
    #[inline]
    pub const fn raw_id(&self) -> u32 {
        self.id
    }

    /// Number of meaningful payload bytes (0 to 8).
    #[inline]
    pub const fn len(&self) -> u8 {
        self.len
    }

    /// Checks whether the frame carries no payload.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Meaningful payload bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }

    /// Full eight-byte buffer, including bytes past `len()`.
    #[inline]
    pub const fn raw_data(&self) -> &[u8; MAX_DATA_LEN] {
        &self.data
    }

    /// Flag pair.
    #[inline]
    pub const fn flags(&self) -> FrameFlags {
        self.flags
    }

    /// 29-bit identifier flag.
    #[inline]
    pub const fn is_extended(&self) -> bool {
        self.flags.extended
    }

    /// Remote transmission request flag.
    #[inline]
    pub const fn is_remote(&self) -> bool {
        self.flags.remote
    }

    #[inline]
    pub(crate) fn set_id(&mut self, id: u32) {
        self.id = id;
    }

    #[inline]
    pub(crate) fn set_flags(&mut self, flags: FrameFlags) {
        self.flags = flags;
    }

    /// Set the length alone, keeping the buffer contents.
    #[inline]
    pub(crate) fn set_len(&mut self, len: u8) {
        self.len = clamp_len(len as usize);
    }

    /// Copy at most eight bytes and set the length to the number copied.
    /// The rest of the buffer is zeroed.
    #[inline]
    pub(crate) fn set_data(&mut self, data: &[u8]) {
        let len = clamp_len(data.len()) as usize;
        self.data = [0; MAX_DATA_LEN];
        self.data[..len].copy_from_slice(&data[..len]);
        self.len = len as u8;
    }
}

/// Clamp a payload length to the classic CAN maximum.
#[inline]
pub(crate) const fn clamp_len(len: usize) -> u8 {
    if len > MAX_DATA_LEN {
        MAX_DATA_LEN as u8
    } else {
        len as u8
    }
}

impl PartialEq for CanFrame {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.flags == other.flags && self.data() == other.data()
    }
}

impl Eq for CanFrame {}

impl Hash for CanFrame {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.flags.hash(state);
        // The slice hash covers the length as well.
        self.data().hash(state);
    }
}

impl fmt::Display for CanFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {:x} Len: {}", self.id, self.len)
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > MAX_DATA_LEN {
            return None;
        }
        let (id, extended) = split_id(id.into());
        Some(Self::from_parts(
            id,
            data,
            FrameFlags {
                extended,
                remote: false,
            },
        ))
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > MAX_DATA_LEN {
            return None;
        }
        let (id, extended) = split_id(id.into());
        let mut frame = Self {
            id,
            flags: FrameFlags {
                extended,
                remote: true,
            },
            ..Self::default()
        };
        frame.set_len(dlc as u8);
        Some(frame)
    }

    fn is_extended(&self) -> bool {
        self.flags.extended
    }

    fn is_remote_frame(&self) -> bool {
        self.flags.remote
    }

    fn id(&self) -> Id {
        if self.flags.extended {
            // Masked to 29 bits, so `new` cannot fail.
            Id::Extended(ExtendedId::new(self.id & EXTENDED_ID_MASK).unwrap_or(ExtendedId::ZERO))
        } else {
            Id::Standard(
                StandardId::new((self.id & STANDARD_ID_MASK) as u16).unwrap_or(StandardId::ZERO),
            )
        }
    }

    fn dlc(&self) -> usize {
        self.len as usize
    }

    fn data(&self) -> &[u8] {
        CanFrame::data(self)
    }
}

/// Split an `embedded_can` identifier into raw value and extended flag.
fn split_id(id: Id) -> (u32, bool) {
    match id {
        Id::Standard(std_id) => (u32::from(std_id.as_raw()), false),
        Id::Extended(ext_id) => (ext_id.as_raw(), true),
    }
}
