//! Register map definitions for the MSSP peripheral in I2C master mode.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{AckStatus, IdleMask, SerialPortMode};

/// Special function registers touched by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Sfr {
    /// Transmit/receive buffer.
    Sspbuf,
    /// Baud rate reload value in master mode.
    Sspadd,
    /// Status register.
    Sspstat,
    /// Control register 1.
    Sspcon1,
    /// Control register 2.
    Sspcon2,
    /// Peripheral interrupt request register 1 (`SSPIF`).
    Pir1,
    /// Peripheral interrupt enable register 1 (`SSPIE`).
    Pie1,
    /// Peripheral interrupt request register 2 (`BCLIF`).
    Pir2,
    /// Peripheral interrupt enable register 2 (`BCLIE`).
    Pie2,
    /// Interrupt control register (`GIE`, `PEIE`).
    Intcon,
}

impl Sfr {
    /// Every register, in declaration order.
    pub const ALL: [Sfr; 10] = [
        Sfr::Sspbuf,
        Sfr::Sspadd,
        Sfr::Sspstat,
        Sfr::Sspcon1,
        Sfr::Sspcon2,
        Sfr::Pir1,
        Sfr::Pie1,
        Sfr::Pir2,
        Sfr::Pie2,
        Sfr::Intcon,
    ];

    /// Data memory address on PIC18F2455/2550/4455/4550 parts.
    pub const fn address(self) -> u16 {
        match self {
            Self::Sspbuf => 0xFC9,
            Self::Sspadd => 0xFC8,
            Self::Sspstat => 0xFC7,
            Self::Sspcon1 => 0xFC6,
            Self::Sspcon2 => 0xFC5,
            Self::Pir1 => 0xF9E,
            Self::Pie1 => 0xF9D,
            Self::Pir2 => 0xFA1,
            Self::Pie2 => 0xFA0,
            Self::Intcon => 0xFF2,
        }
    }
}

/// `SSPIF` / `SSPIE` position in `PIR1` / `PIE1`.
pub const SSP_INTERRUPT_BIT: u8 = 1 << 3;
/// `BCLIF` / `BCLIE` position in `PIR2` / `PIE2`.
pub const BUS_COLLISION_INTERRUPT_BIT: u8 = 1 << 3;
/// `INTCON.PEIE`.
pub const INTCON_PEIE: u8 = 1 << 6;
/// `INTCON.GIE`.
pub const INTCON_GIE: u8 = 1 << 7;
/// `SSPCON2` bits that read set while a condition is still being generated.
pub const CONDITION_ACTIVE_MASK: u8 = 0x1F;

/// Register value type bound to the SFR it is read from and written to.
pub trait Register: From<u8> + Into<u8> + Copy {
    /// Register location.
    const SFR: Sfr;
}

/// Bitfield representation of `SSPCON1`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sspcon1 {
    // Port mode select (bits 3:0).
    pub mode: SerialPortMode,
    // Clock polarity; unused in I2C master mode (bit 4).
    pub clock_polarity: bool,
    // Serial port enable (bit 5).
    pub enabled: bool,
    // Receive overflow indicator (bit 6).
    pub receive_overflow: bool,
    // Write collision detect (bit 7).
    pub write_collision: bool,
}

impl From<u8> for Sspcon1 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Sspcon1> for u8 {
    fn from(value: Sspcon1) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `SSPCON2`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sspcon2 {
    // Start condition enable (bit 0).
    pub start: bool,
    // Repeated start condition enable (bit 1).
    pub repeated_start: bool,
    // Stop condition enable (bit 2).
    pub stop: bool,
    // Receive enable (bit 3).
    pub receive_enable: bool,
    // Acknowledge sequence enable (bit 4).
    pub ack_enable: bool,
    // Acknowledge level driven after a receive (bit 5).
    pub ack_data: AckStatus,
    // Acknowledge level observed from the slave (bit 6).
    pub ack_status: AckStatus,
    // General call enable, slave mode only (bit 7).
    pub general_call: bool,
}

impl From<u8> for Sspcon2 {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Sspcon2> for u8 {
    fn from(value: Sspcon2) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of `SSPSTAT`.
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sspstat {
    // Buffer full (bit 0).
    pub buffer_full: bool,
    // Update address, 10-bit slave mode only (bit 1).
    pub update_address: bool,
    // Transmit in progress when in master mode (bit 2).
    pub transmit_in_progress: bool,
    // Start bit detected last (bit 3).
    pub start_seen: bool,
    // Stop bit detected last (bit 4).
    pub stop_seen: bool,
    // Data/address, slave mode only (bit 5).
    pub data_address: bool,
    // SMBus input levels (bit 6).
    pub smbus_levels: bool,
    // Slew rate control disabled (bit 7).
    pub slew_rate_disabled: bool,
}

impl From<u8> for Sspstat {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Sspstat> for u8 {
    fn from(value: Sspstat) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for Sspcon1 {
    const SFR: Sfr = Sfr::Sspcon1;
}

impl Register for Sspcon2 {
    const SFR: Sfr = Sfr::Sspcon2;
}

impl Register for Sspstat {
    const SFR: Sfr = Sfr::Sspstat;
}

/// `SSPCON1` value selecting an enabled I2C master.
pub fn master_mode_control() -> Sspcon1 {
    Sspcon1::new()
        .with_mode(SerialPortMode::I2cMaster)
        .with_enabled(true)
}

/// Combined view of the condition-active bits of `SSPCON2` and of `SSPSTAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusStatus {
    conditions: u8,
    status: u8,
}

impl BusStatus {
    /// Snapshot with nothing in progress.
    pub const IDLE: Self = Self::new(0, 0);

    /// Builds a snapshot from raw `SSPCON2` and `SSPSTAT` values.
    ///
    /// Only the condition-active bits of `control` are kept.
    pub const fn new(control: u8, status: u8) -> Self {
        Self {
            conditions: control & CONDITION_ACTIVE_MASK,
            status,
        }
    }

    /// Builds a snapshot from the register bitfields.
    pub fn from_registers(control: Sspcon2, status: Sspstat) -> Self {
        Self::new(u8::from(control), u8::from(status))
    }

    /// `SSPCON2[4:0]`: conditions still being generated.
    pub const fn conditions(&self) -> u8 {
        self.conditions
    }

    /// Raw `SSPSTAT`.
    pub const fn status(&self) -> u8 {
        self.status
    }

    /// Returns `true` when no condition is active and every masked status bit is clear.
    pub const fn is_idle(&self, mask: IdleMask) -> bool {
        (self.conditions | (self.status & mask.bits())) == 0
    }
}
