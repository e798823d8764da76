//! `embedded-hal` I2C implementation layered on the bus primitives.
//!
//! Adjacent operations of the same kind share one address phase, a change of
//! direction issues a repeated start, the final byte of a read run is answered
//! with NACK and every transaction ends with a stop, even when it fails.

use embedded_hal::i2c::{self, ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation, SevenBitAddress};

use crate::bus::BusController;
use crate::error::{Error, Result};
use crate::interface::BusInterface;
use crate::params::{AckStatus, Direction};

impl<E> i2c::Error for Error<E>
where
    E: core::fmt::Debug,
{
    fn kind(&self) -> ErrorKind {
        match self {
            Error::NoAcknowledge(source) => ErrorKind::NoAcknowledge(*source),
            Error::BusConflict => ErrorKind::ArbitrationLoss,
            Error::Interface(_) => ErrorKind::Bus,
            Error::InvalidConfig | Error::NotReady => ErrorKind::Other,
        }
    }
}

impl<IFACE, CommE> ErrorType for BusController<'_, IFACE>
where
    IFACE: BusInterface<Error = CommE>,
    CommE: core::fmt::Debug,
{
    type Error = Error<CommE>;
}

impl<IFACE, CommE> I2c<SevenBitAddress> for BusController<'_, IFACE>
where
    IFACE: BusInterface<Error = CommE>,
    CommE: core::fmt::Debug,
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> core::result::Result<(), Self::Error> {
        let outcome = self.run_operations(address, operations);
        if outcome.is_err() {
            debug!("transaction to {=u8:#04x} failed, releasing bus", address);
        }

        match (outcome, self.stop()) {
            (Err(err), _) | (Ok(()), Err(err)) => Err(err),
            (Ok(()), Ok(())) => Ok(()),
        }
    }
}

impl<IFACE, CommE> BusController<'_, IFACE>
where
    IFACE: BusInterface<Error = CommE>,
{
    fn run_operations(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<(), CommE> {
        let mut current: Option<Direction> = None;

        for index in 0..operations.len() {
            // Empty reads share the address phase but carry no byte to ACK.
            let read_follows = operations[index + 1..]
                .iter()
                .map_while(|operation| match operation {
                    Operation::Read(buffer) => Some(buffer.len()),
                    Operation::Write(_) => None,
                })
                .any(|len| len > 0);

            match &mut operations[index] {
                Operation::Write(bytes) => {
                    self.select(address, Direction::Write, &mut current)?;
                    for &byte in bytes.iter() {
                        if self.send_byte(byte)?.is_nack() {
                            return Err(Error::NoAcknowledge(NoAcknowledgeSource::Data));
                        }
                    }
                }
                Operation::Read(buffer) => {
                    self.select(address, Direction::Read, &mut current)?;
                    let last = buffer.len().saturating_sub(1);
                    for (position, slot) in buffer.iter_mut().enumerate() {
                        let ack = if position == last && !read_follows {
                            AckStatus::Nack
                        } else {
                            AckStatus::Ack
                        };
                        *slot = self.receive_byte(ack)?;
                    }
                }
            }
        }

        Ok(())
    }

    fn select(
        &mut self,
        address: u8,
        direction: Direction,
        current: &mut Option<Direction>,
    ) -> Result<(), CommE> {
        let ack = match *current {
            Some(active) if active == direction => return Ok(()),
            Some(_) => self.repeated_start(address, direction)?,
            None => self.start(address, direction)?,
        };
        *current = Some(direction);

        if ack.is_nack() {
            return Err(Error::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        Ok(())
    }
}
