//! Blocking I2C master built on the MSSP handshake sequence.

use crate::bridge::SignalBridge;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::mssp::{MsspInterface, SfrAccess};
use crate::interface::BusInterface;
use crate::params::{address_byte, AckStatus, Condition, Direction, IdleMask, Signal};

/// Synchronous I2C bus controller.
///
/// Every operation spins until the peripheral reports completion, so the
/// controller must not be shared between execution contexts. The interrupt
/// handler only ever touches the [`SignalBridge`].
pub struct BusController<'a, IFACE> {
    interface: IFACE,
    bridge: &'a SignalBridge,
    config: Config,
    initialized: bool,
}

impl<'a, IFACE> BusController<'a, IFACE> {
    // ==================================================================
    // == Construction & Ownership ======================================
    // ==================================================================
    /// Creates a controller; [`init`](Self::init) must run before any bus operation.
    pub fn new(interface: IFACE, bridge: &'a SignalBridge, config: Config) -> Self {
        Self {
            interface,
            bridge,
            config,
            initialized: false,
        }
    }

    /// Consumes the controller and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Returns the bridge shared with the interrupt handler.
    pub fn bridge(&self) -> &'a SignalBridge {
        self.bridge
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns `true` once [`init`](Self::init) succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl<'a, SFR> BusController<'a, MsspInterface<SFR>>
where
    SFR: SfrAccess,
{
    /// Convenience constructor for register-level access.
    pub fn new_mssp(sfr: SFR, bridge: &'a SignalBridge, config: Config) -> Self {
        Self::new(MsspInterface::new(sfr), bridge, config)
    }

    /// Releases the controller, returning the register accessor and configuration.
    pub fn release_mssp(self) -> (SFR, Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> BusController<'_, IFACE>
where
    IFACE: BusInterface<Error = CommE>,
{
    // ==================================================================
    // == Initialization ================================================
    // ==================================================================
    /// Puts the peripheral into master mode using the current configuration.
    ///
    /// Programs the baud rate divisor, enables the completion and conflict
    /// signals and discards anything they had pending.
    pub fn init(&mut self) -> Result<(), CommE> {
        let divisor = self.config.divisor().map_err(|_| Error::InvalidConfig)?;

        self.initialized = false;
        self.bridge.reset(self.config.conflict_policy);

        self.interface.set_master_mode(divisor)?;
        self.interface.enable_signals()?;
        self.interface.clear_signal_pending(Signal::Completion)?;
        self.interface.clear_signal_pending(Signal::Conflict)?;

        debug!("i2c master ready, divisor {=u8:#x}", divisor);
        self.initialized = true;
        Ok(())
    }

    // ==================================================================
    // == Bus Primitives ================================================
    // ==================================================================
    /// Spins until no condition is being generated and the masked status bits are clear.
    pub fn wait_idle(&mut self, mask: IdleMask) -> Result<(), CommE> {
        self.ensure_ready()?;
        self.spin_until_idle(mask)
    }

    /// Generates a start condition and transmits the address byte.
    ///
    /// Returns [`AckStatus::Nack`] when no device answered the address.
    pub fn start(&mut self, address: u8, direction: Direction) -> Result<AckStatus, CommE> {
        self.ensure_ready()?;
        if self.bridge.take_conflict() {
            debug!("discarding conflict latched before start");
        }
        self.address_phase(Condition::Start, address, direction)
    }

    /// Generates a repeated start condition and transmits the address byte.
    pub fn repeated_start(&mut self, address: u8, direction: Direction) -> Result<AckStatus, CommE> {
        self.ensure_ready()?;
        self.address_phase(Condition::RepeatedStart, address, direction)
    }

    /// Generates a stop condition, releasing the bus.
    ///
    /// The stop is issued even when a conflict was latched since the last
    /// operation; that conflict is then returned as [`Error::BusConflict`].
    pub fn stop(&mut self) -> Result<(), CommE> {
        self.ensure_ready()?;
        self.spin_until_idle(IdleMask::TRANSFER)?;
        self.interface.assert_condition(Condition::Stop)?;
        trace!("stop");
        self.check_conflict()
    }

    /// Transmits one data byte and returns the receiver's acknowledgement.
    pub fn send_byte(&mut self, data: u8) -> Result<AckStatus, CommE> {
        self.ensure_ready()?;
        self.transmit(data)
    }

    /// Receives one data byte and answers it with `ack`.
    ///
    /// Send [`AckStatus::Nack`] after the last byte the master wants to read.
    pub fn receive_byte(&mut self, ack: AckStatus) -> Result<u8, CommE> {
        self.ensure_ready()?;

        self.spin_until_idle(IdleMask::TRANSFER)?;
        self.interface.assert_condition(Condition::ReceiveEnable)?;

        // Buffer full is set once the byte is in; wait for the shift only.
        self.spin_until_idle(IdleMask::RECEIVE)?;
        let data = self.interface.read_byte()?;
        // Drained either way so buffer full does not stall the next idle wait.
        self.check_conflict()?;

        self.spin_until_idle(IdleMask::TRANSFER)?;
        self.interface.set_ack_bit(ack.is_nack())?;
        self.interface.assert_condition(Condition::AckEnable)?;

        trace!("rx {=u8:#04x} -> {}", data, ack);
        Ok(data)
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn ensure_ready(&self) -> Result<(), CommE> {
        if self.initialized {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    fn check_conflict(&self) -> Result<(), CommE> {
        if self.bridge.take_conflict() {
            warn!("bus conflict");
            Err(Error::BusConflict)
        } else {
            Ok(())
        }
    }

    fn spin_until_idle(&mut self, mask: IdleMask) -> Result<(), CommE> {
        while !self.interface.status_snapshot()?.is_idle(mask) {
            core::hint::spin_loop();
        }
        Ok(())
    }

    fn address_phase(
        &mut self,
        condition: Condition,
        address: u8,
        direction: Direction,
    ) -> Result<AckStatus, CommE> {
        self.spin_until_idle(IdleMask::TRANSFER)?;
        self.interface.assert_condition(condition)?;

        let ack = self.transmit(address_byte(address, direction))?;
        trace!("{} {=u8:#04x} {} -> {}", condition, address, direction, ack);
        Ok(ack)
    }

    fn transmit(&mut self, byte: u8) -> Result<AckStatus, CommE> {
        self.spin_until_idle(IdleMask::TRANSFER)?;

        self.bridge.arm();
        if let Err(err) = self.interface.write_byte(byte) {
            self.bridge.disarm();
            return Err(Error::Interface(err));
        }
        self.bridge.wait_cleared();

        if self.bridge.take_conflict() {
            warn!("bus conflict while sending {=u8:#04x}", byte);
            return Err(Error::BusConflict);
        }

        Ok(AckStatus::from_nack_bit(self.interface.acknowledge_status()?))
    }
}
