//! Error handling primitives for the MSSP I2C driver.

use embedded_hal::i2c::NoAcknowledgeSource;

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying peripheral interface.
    Interface(E),
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// The controller has not been initialized yet.
    NotReady,
    /// Another master disturbed the bus while the operation was running.
    BusConflict,
    /// The addressed device did not acknowledge.
    NoAcknowledge(NoAcknowledgeSource),
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
