//! Register-level interface implementation on top of raw MSSP special function registers.

use core::convert::Infallible;

use super::{BusInterface, SignalLines};
use crate::params::{AckStatus, Condition, Signal};
use crate::registers::{
    master_mode_control,
    BusStatus,
    Register,
    Sfr,
    Sspcon2,
    Sspstat,
    BUS_COLLISION_INTERRUPT_BIT,
    INTCON_GIE,
    INTCON_PEIE,
    SSP_INTERRUPT_BIT,
};

/// Byte-wide access to the special function registers of one MSSP instance.
///
/// Implementations are expected to perform volatile accesses.
pub trait SfrAccess {
    /// Reads a register.
    fn read(&mut self, register: Sfr) -> u8;

    /// Writes a register.
    fn write(&mut self, register: Sfr, value: u8);
}

/// MSSP-based interface implementation for the I2C master driver.
pub struct MsspInterface<SFR> {
    sfr: SFR,
}

impl<SFR> MsspInterface<SFR> {
    /// Creates a new interface from the provided register accessor.
    pub const fn new(sfr: SFR) -> Self {
        Self { sfr }
    }

    /// Provides mutable access to the wrapped register accessor.
    pub fn sfr_mut(&mut self) -> &mut SFR {
        &mut self.sfr
    }

    /// Consumes the interface and returns the owned register accessor.
    pub fn release(self) -> SFR {
        self.sfr
    }
}

impl<SFR> MsspInterface<SFR>
where
    SFR: SfrAccess,
{
    fn read_register<R: Register>(&mut self) -> R {
        R::from(self.sfr.read(R::SFR))
    }

    fn modify_register<R, F>(&mut self, mutate: F)
    where
        R: Register,
        F: FnOnce(R) -> R,
    {
        let current = self.read_register::<R>();
        self.sfr.write(R::SFR, mutate(current).into());
    }

    fn set_bits(&mut self, register: Sfr, mask: u8) {
        let current = self.sfr.read(register);
        self.sfr.write(register, current | mask);
    }

    fn clear_bits(&mut self, register: Sfr, mask: u8) {
        let current = self.sfr.read(register);
        self.sfr.write(register, current & !mask);
    }

    fn flag_location(signal: Signal) -> (Sfr, u8) {
        match signal {
            Signal::Completion => (Sfr::Pir1, SSP_INTERRUPT_BIT),
            Signal::Conflict => (Sfr::Pir2, BUS_COLLISION_INTERRUPT_BIT),
        }
    }
}

impl<SFR> SignalLines for MsspInterface<SFR>
where
    SFR: SfrAccess,
{
    type Error = Infallible;

    fn enable_signals(&mut self) -> core::result::Result<(), Self::Error> {
        self.set_bits(Sfr::Pie1, SSP_INTERRUPT_BIT);
        self.set_bits(Sfr::Pie2, BUS_COLLISION_INTERRUPT_BIT);
        self.set_bits(Sfr::Intcon, INTCON_PEIE | INTCON_GIE);
        Ok(())
    }

    fn signal_pending(&mut self, signal: Signal) -> core::result::Result<bool, Self::Error> {
        let (register, mask) = Self::flag_location(signal);
        Ok(self.sfr.read(register) & mask != 0)
    }

    fn clear_signal_pending(&mut self, signal: Signal) -> core::result::Result<(), Self::Error> {
        let (register, mask) = Self::flag_location(signal);
        self.clear_bits(register, mask);
        Ok(())
    }
}

impl<SFR> BusInterface for MsspInterface<SFR>
where
    SFR: SfrAccess,
{
    fn set_master_mode(&mut self, divisor: u8) -> core::result::Result<(), Self::Error> {
        self.sfr.write(Sfr::Sspcon1, master_mode_control().into());
        self.sfr.write(Sfr::Sspstat, Sspstat::new().into());
        self.sfr.write(Sfr::Sspadd, divisor);
        Ok(())
    }

    fn assert_condition(&mut self, condition: Condition) -> core::result::Result<(), Self::Error> {
        self.modify_register::<Sspcon2, _>(|control| match condition {
            Condition::Start => control.with_start(true),
            Condition::RepeatedStart => control.with_repeated_start(true),
            Condition::Stop => control.with_stop(true),
            Condition::ReceiveEnable => control.with_receive_enable(true),
            Condition::AckEnable => control.with_ack_enable(true),
        });
        Ok(())
    }

    fn set_ack_bit(&mut self, not_acknowledge: bool) -> core::result::Result<(), Self::Error> {
        self.modify_register::<Sspcon2, _>(|control| {
            control.with_ack_data(AckStatus::from_nack_bit(not_acknowledge))
        });
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> core::result::Result<(), Self::Error> {
        self.sfr.write(Sfr::Sspbuf, byte);
        Ok(())
    }

    fn read_byte(&mut self) -> core::result::Result<u8, Self::Error> {
        Ok(self.sfr.read(Sfr::Sspbuf))
    }

    fn status_snapshot(&mut self) -> core::result::Result<BusStatus, Self::Error> {
        let control = self.read_register::<Sspcon2>();
        let status = self.read_register::<Sspstat>();
        Ok(BusStatus::from_registers(control, status))
    }

    fn acknowledge_status(&mut self) -> core::result::Result<bool, Self::Error> {
        Ok(self.read_register::<Sspcon2>().ack_status().is_nack())
    }
}
