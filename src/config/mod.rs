//! Bus configuration: the discrete bit-rate set, the TWAI timing presets and
//! the per-controller settings (pins, queue depths, bus instance).
//!
//! ## Bit timing
//!
//! Bit timing is never computed here. FlexCAN derives it from the requested
//! rate itself; TWAI uses the vendor presets below, all for an 80 MHz APB
//! clock. A TWAI bit lasts `1 + tseg_1 + tseg_2` time quanta of `brp / 80 MHz`.
use embassy_time::Duration;

/// Bit rate used when the caller does not pick one (bit/s).
pub const DEFAULT_BITRATE: u32 = 500_000;

/// Fixed upper bound for a single TWAI transmit call.
pub const TWAI_TRANSMIT_TIMEOUT: Duration = Duration::from_millis(100);

/// Marker for an unused TWAI GPIO (clock-out, bus-off indicator).
pub const TWAI_IO_UNUSED: i8 = -1;

//==================================================================================BITRATE
/// Bit rates supported by the TWAI timing presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bitrate {
    /// 1 Mbit/s
    Mbps1,
    /// 800 kbit/s
    Kbps800,
    /// 500 kbit/s
    #[default]
    Kbps500,
    /// 250 kbit/s
    Kbps250,
    /// 125 kbit/s
    Kbps125,
    /// 100 kbit/s
    Kbps100,
}

impl Bitrate {
    /// Every supported rate, fastest first.
    pub const ALL: [Bitrate; 6] = [
        Bitrate::Mbps1,
        Bitrate::Kbps800,
        Bitrate::Kbps500,
        Bitrate::Kbps250,
        Bitrate::Kbps125,
        Bitrate::Kbps100,
    ];

    /// Map a rate in bit/s to a preset; unrecognised rates fall back to 500 kbit/s.
    pub const fn from_bps(bps: u32) -> Self {
        match Self::lookup(bps) {
            Some(bitrate) => bitrate,
            None => Bitrate::Kbps500,
        }
    }

    const fn lookup(bps: u32) -> Option<Self> {
        match bps {
            1_000_000 => Some(Bitrate::Mbps1),
            800_000 => Some(Bitrate::Kbps800),
            500_000 => Some(Bitrate::Kbps500),
            250_000 => Some(Bitrate::Kbps250),
            125_000 => Some(Bitrate::Kbps125),
            100_000 => Some(Bitrate::Kbps100),
            _ => None,
        }
    }

    /// Rate in bit/s.
    pub const fn bps(self) -> u32 {
        match self {
            Bitrate::Mbps1 => 1_000_000,
            Bitrate::Kbps800 => 800_000,
            Bitrate::Kbps500 => 500_000,
            Bitrate::Kbps250 => 250_000,
            Bitrate::Kbps125 => 125_000,
            Bitrate::Kbps100 => 100_000,
        }
    }

    /// TWAI timing preset for this rate.
    pub const fn twai_timing(self) -> TwaiTiming {
        match self {
            Bitrate::Mbps1 => TwaiTiming::preset(4, 15, 4),
            Bitrate::Kbps800 => TwaiTiming::preset(4, 16, 8),
            Bitrate::Kbps500 => TwaiTiming::preset(8, 15, 4),
            Bitrate::Kbps250 => TwaiTiming::preset(16, 15, 4),
            Bitrate::Kbps125 => TwaiTiming::preset(32, 15, 4),
            Bitrate::Kbps100 => TwaiTiming::preset(40, 15, 4),
        }
    }
}

/// Returned by the strict `TryFrom<u32>` conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnsupportedBitrate(pub u32);

impl TryFrom<u32> for Bitrate {
    type Error = UnsupportedBitrate;

    fn try_from(bps: u32) -> Result<Self, Self::Error> {
        Self::lookup(bps).ok_or(UnsupportedBitrate(bps))
    }
}

impl From<Bitrate> for u32 {
    fn from(bitrate: Bitrate) -> Self {
        bitrate.bps()
    }
}

//==================================================================================TWAI
/// TWAI bit timing, as handed to the driver at install time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwaiTiming {
    /// Baud-rate prescaler (APB clock divider).
    pub brp: u32,
    /// Time quanta before the sample point (propagation + phase 1).
    pub tseg_1: u8,
    /// Time quanta after the sample point.
    pub tseg_2: u8,
    /// Synchronization jump width.
    pub sjw: u8,
    /// Sample each bit three times.
    pub triple_sampling: bool,
}

impl TwaiTiming {
    /// Shape shared by every vendor preset: SJW 3, single sampling.
    const fn preset(brp: u32, tseg_1: u8, tseg_2: u8) -> Self {
        Self {
            brp,
            tseg_1,
            tseg_2,
            sjw: 3,
            triple_sampling: false,
        }
    }

    /// Time quanta per bit.
    pub const fn quanta_per_bit(&self) -> u32 {
        1 + self.tseg_1 as u32 + self.tseg_2 as u32
    }
}

impl Default for TwaiTiming {
    fn default() -> Self {
        Bitrate::default().twai_timing()
    }
}

/// TWAI controller operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TwaiMode {
    /// Transmit, receive and acknowledge.
    #[default]
    Normal,
    /// Transmit without requiring acknowledgement (self-test).
    NoAck,
    /// Receive only, never drive the bus.
    ListenOnly,
}

/// Caller-facing TWAI settings: transceiver pins and driver queue depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwaiConfig {
    /// GPIO wired to the transceiver TX input.
    pub tx_pin: i8,
    /// GPIO wired to the transceiver RX output.
    pub rx_pin: i8,
    /// Depth of the driver transmit queue (frames).
    pub tx_queue_len: u16,
    /// Depth of the driver receive queue (frames).
    pub rx_queue_len: u16,
    /// Controller mode.
    pub mode: TwaiMode,
}

impl TwaiConfig {
    /// Defaults: TX on GPIO10, RX on GPIO9, 32-frame queues, normal mode.
    pub const fn new() -> Self {
        Self {
            tx_pin: 10,
            rx_pin: 9,
            tx_queue_len: 32,
            rx_queue_len: 32,
            mode: TwaiMode::Normal,
        }
    }

    /// Route the controller to other transceiver pins.
    pub const fn with_pins(mut self, tx_pin: i8, rx_pin: i8) -> Self {
        self.tx_pin = tx_pin;
        self.rx_pin = rx_pin;
        self
    }

    /// Set the driver transmit and receive queue depths (frames).
    pub const fn with_queue_lengths(mut self, tx_queue_len: u16, rx_queue_len: u16) -> Self {
        self.tx_queue_len = tx_queue_len;
        self.rx_queue_len = rx_queue_len;
        self
    }

    /// Select the operating mode (normal, no-ack or listen-only).
    pub const fn with_mode(mut self, mode: TwaiMode) -> Self {
        self.mode = mode;
        self
    }
}

impl Default for TwaiConfig {
    fn default() -> Self {
        Self::new()
    }
}

//==================================================================================FLEXCAN
/// FlexCAN peripheral instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlexCanBus {
    /// First FlexCAN instance (`CAN1`).
    #[default]
    Can1,
    /// Second FlexCAN instance (`CAN2`).
    Can2,
    /// CAN-FD capable instance; driven in classic mode here.
    Can3,
}

/// FlexCAN settings: bus instance and driver ring-buffer depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FlexCanConfig {
    /// Peripheral instance the backend drives.
    pub bus: FlexCanBus,
    /// Receive ring-buffer depth (frames).
    pub rx_size: u16,
    /// Transmit ring-buffer depth (frames).
    pub tx_size: u16,
}

impl FlexCanConfig {
    /// Defaults: `CAN1`, 256-frame receive buffer, 16-frame transmit buffer.
    pub const fn new() -> Self {
        Self {
            bus: FlexCanBus::Can1,
            rx_size: 256,
            tx_size: 16,
        }
    }

    /// Drive another FlexCAN instance.
    pub const fn with_bus(mut self, bus: FlexCanBus) -> Self {
        self.bus = bus;
        self
    }

    /// Set the receive and transmit ring-buffer depths (frames).
    pub const fn with_buffer_sizes(mut self, rx_size: u16, tx_size: u16) -> Self {
        self.rx_size = rx_size;
        self.tx_size = tx_size;
        self
    }
}

impl Default for FlexCanConfig {
    fn default() -> Self {
        Self::new()
    }
}
