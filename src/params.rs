//! Strongly typed parameter enumerations for the MSSP I2C driver.
//!
//! These types map directly to the bit encodings used on the bus and in the
//! MSSP control registers. Prefer them over raw integers so that directions,
//! acknowledgement levels and idle masks stay explicit at call sites.
//!
//! # Examples
//!
//! ```rust
//! use mssp_i2c::params::{address_byte, AckStatus, Direction};
//!
//! assert_eq!(address_byte(0x50, Direction::Write), 0xA0);
//! assert_eq!(address_byte(0x50, Direction::Read), 0xA1);
//! assert_eq!(AckStatus::Nack.bit(), 1);
//! ```

use fugit::HertzU32;
use modular_bitfield::prelude::Specifier;

/// Transfer direction encoded in the low bit of the address byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Direction {
    /// Master transmits to the addressed device.
    Write = 0,
    /// Master receives from the addressed device.
    Read = 1,
}

/// Builds the byte transmitted after a (repeated) start condition.
///
/// The address is not range checked: an eighth bit is shifted out of the
/// byte, which leaves the caller with an undefined target on the bus.
pub const fn address_byte(address: u8, direction: Direction) -> u8 {
    (address << 1) | direction as u8
}

/// Acknowledgement level driven or observed on the ninth clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum AckStatus {
    /// SDA pulled low: byte accepted, or "send more" on a read.
    Ack = 0,
    /// SDA left high: nobody answered, the device declined, or "last byte".
    Nack = 1,
}

impl AckStatus {
    /// Maps the hardware not-acknowledged bit onto a status.
    pub const fn from_nack_bit(not_acknowledged: bool) -> Self {
        if not_acknowledged { Self::Nack } else { Self::Ack }
    }

    /// Returns the raw bit value, `0` for [`AckStatus::Ack`].
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Returns `true` when the peer acknowledged.
    pub const fn is_ack(self) -> bool {
        matches!(self, Self::Ack)
    }

    /// Returns `true` when the peer did not acknowledge.
    pub const fn is_nack(self) -> bool {
        matches!(self, Self::Nack)
    }
}

/// Bus conditions the peripheral can be asked to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Condition {
    /// Start condition (`SEN`).
    Start,
    /// Repeated start condition (`RSEN`).
    RepeatedStart,
    /// Stop condition (`PEN`).
    Stop,
    /// Receive enable (`RCEN`).
    ReceiveEnable,
    /// Acknowledge sequence enable (`ACKEN`).
    AckEnable,
}

impl Condition {
    /// Bit of `SSPCON2` that asserts this condition.
    pub const fn mask(self) -> u8 {
        match self {
            Self::Start => 1 << 0,
            Self::RepeatedStart => 1 << 1,
            Self::Stop => 1 << 2,
            Self::ReceiveEnable => 1 << 3,
            Self::AckEnable => 1 << 4,
        }
    }
}

/// Interrupt sources raised by the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Signal {
    /// Byte-level handshake or condition finished (`SSPIF`).
    Completion,
    /// Bus collision detected (`BCLIF`).
    Conflict,
}

/// Selection of `SSPSTAT` bits that must read clear for the bus to count as idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IdleMask(u8);

impl IdleMask {
    /// Buffer full and transmit in progress.
    pub const TRANSFER: Self = Self(0x05);
    /// Transmit in progress only. Used while a received byte sits in the buffer.
    pub const RECEIVE: Self = Self(0x04);

    /// Creates a mask from raw `SSPSTAT` bits.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw `SSPSTAT` bits.
    pub const fn bits(self) -> u8 {
        self.0
    }
}

/// Handling of bus collisions reported by the peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConflictPolicy {
    /// Clear the collision indicator and carry on.
    Ignore,
    /// Clear the indicator, release any waiter and fail the running operation.
    #[default]
    Report,
}

/// Synchronous serial port mode select (`SSPCON1.SSPM`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum SerialPortMode {
    /// I2C slave, 7-bit address.
    I2cSlave7Bit = 0b0110,
    /// I2C slave, 10-bit address.
    I2cSlave10Bit = 0b0111,
    /// I2C master, clock = FOSC / (4 * (SSPADD + 1)).
    I2cMaster = 0b1000,
    /// I2C firmware controlled master, slave idle.
    I2cFirmwareMaster = 0b1011,
}

/// Common I2C bus rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusSpeed {
    /// 100 kHz standard mode.
    Standard,
    /// 400 kHz fast mode.
    Fast,
    /// 1 MHz fast mode plus.
    FastPlus,
}

impl BusSpeed {
    /// Returns the nominal SCL frequency.
    pub const fn rate(self) -> HertzU32 {
        match self {
            Self::Standard => HertzU32::kHz(100),
            Self::Fast => HertzU32::kHz(400),
            Self::FastPlus => HertzU32::MHz(1),
        }
    }
}
