//! Peripheral interface abstraction for the I2C master driver.

pub mod mssp;

use crate::params::{Condition, Signal};
use crate::registers::BusStatus;

/// Interrupt-side capabilities: enabling, inspecting and clearing signal state.
///
/// Interrupt handlers hold their own implementation of this trait and pass it to
/// [`SignalBridge::on_signal`](crate::bridge::SignalBridge::on_signal).
pub trait SignalLines {
    /// Error type produced by the concrete peripheral implementation.
    type Error;

    /// Enables the completion and conflict signals.
    fn enable_signals(&mut self) -> core::result::Result<(), Self::Error>;

    /// Returns whether the given signal is pending.
    fn signal_pending(&mut self, signal: Signal) -> core::result::Result<bool, Self::Error>;

    /// Clears the pending indicator of the given signal.
    fn clear_signal_pending(&mut self, signal: Signal) -> core::result::Result<(), Self::Error>;
}

/// Abstraction over the peripheral capabilities required by the bus controller.
pub trait BusInterface: SignalLines {
    /// Configures the peripheral as a bus master with the given clock divisor.
    fn set_master_mode(&mut self, divisor: u8) -> core::result::Result<(), Self::Error>;

    /// Asks the peripheral to generate a bus condition.
    fn assert_condition(&mut self, condition: Condition) -> core::result::Result<(), Self::Error>;

    /// Sets the acknowledgement level sent after a receive; `true` sends NACK.
    fn set_ack_bit(&mut self, not_acknowledge: bool) -> core::result::Result<(), Self::Error>;

    /// Loads the transmit buffer, starting a byte transfer.
    fn write_byte(&mut self, byte: u8) -> core::result::Result<(), Self::Error>;

    /// Reads the receive buffer.
    fn read_byte(&mut self) -> core::result::Result<u8, Self::Error>;

    /// Reads the condition-active and status bits used for idle detection.
    fn status_snapshot(&mut self) -> core::result::Result<BusStatus, Self::Error>;

    /// Returns `true` when the last transmitted byte was not acknowledged.
    fn acknowledge_status(&mut self) -> core::result::Result<bool, Self::Error>;
}
