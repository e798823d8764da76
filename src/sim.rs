//! Simulated MSSP peripheral and bus peer used by the unit tests.

extern crate std;

use core::convert::Infallible;
use std::vec::Vec;

use crate::bridge::SignalBridge;
use crate::interface::{BusInterface, SignalLines};
use crate::params::{Condition, Signal};
use crate::registers::BusStatus;

// Status polls a condition stays active before the hardware finishes it.
const CONDITION_POLLS: u32 = 2;
const BUFFER_FULL: u8 = 0x01;

/// Peripheral-visible side effect recorded by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    MasterMode(u8),
    SignalsEnabled,
    ClearPending(Signal),
    Condition(Condition),
    AckBit(bool),
    Write(u8),
    Read(u8),
}

/// Behaviour of the device on the other end of the bus.
#[derive(Debug, Clone, Copy)]
pub struct Peer {
    acks: bool,
    data: &'static [u8],
}

impl Peer {
    pub fn acking() -> Self {
        Self { acks: true, data: &[] }
    }

    pub fn silent() -> Self {
        Self { acks: false, data: &[] }
    }

    pub fn responding(data: &'static [u8]) -> Self {
        Self { acks: true, data }
    }
}

pub struct SimPeripheral<'a> {
    bridge: &'a SignalBridge,
    peer: Peer,
    log: Vec<Event>,
    polls: usize,
    conditions: u8,
    settle: u32,
    status: u8,
    hold_bits: u8,
    hold_polls: u32,
    hold_after_read: (u8, u32),
    rx: u8,
    rx_index: usize,
    ack_status: bool,
    ack_after_idle: bool,
    owned: bool,
    completion_pending: bool,
    conflict_pending: bool,
    collide: bool,
    in_interrupt: bool,
}

impl<'a> SimPeripheral<'a> {
    pub fn new(bridge: &'a SignalBridge, peer: Peer) -> Self {
        Self {
            bridge,
            peer,
            log: Vec::new(),
            polls: 0,
            conditions: 0,
            settle: 0,
            status: 0,
            hold_bits: 0,
            hold_polls: 0,
            hold_after_read: (0, 0),
            rx: 0,
            rx_index: 0,
            ack_status: false,
            ack_after_idle: false,
            owned: false,
            completion_pending: false,
            conflict_pending: false,
            collide: false,
            in_interrupt: false,
        }
    }

    pub fn log(&self) -> &[Event] {
        &self.log
    }

    /// Forgets recorded events and the poll counter.
    pub fn clear_log(&mut self) {
        self.log.clear();
        self.polls = 0;
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn set_peer(&mut self, peer: Peer) {
        self.peer = peer;
    }

    /// Reports `bits` in `SSPSTAT` for the next `polls` snapshots.
    pub fn hold_status(&mut self, bits: u8, polls: u32) {
        self.hold_bits = bits;
        self.hold_polls = polls;
    }

    /// Like [`hold_status`](Self::hold_status), armed by the next buffer read.
    pub fn hold_after_read(&mut self, bits: u8, polls: u32) {
        self.hold_after_read = (bits, polls);
    }

    pub fn ack_bit_saw_idle_bus(&self) -> bool {
        self.ack_after_idle
    }

    pub fn bus_released(&self) -> bool {
        !self.owned && self.conditions == 0
    }

    pub fn collide_on_next_write(&mut self) {
        self.collide = true;
    }

    pub fn raise(&mut self, signal: Signal) {
        match signal {
            Signal::Completion => self.completion_pending = true,
            Signal::Conflict => self.conflict_pending = true,
        }
    }

    pub fn is_pending(&self, signal: Signal) -> bool {
        match signal {
            Signal::Completion => self.completion_pending,
            Signal::Conflict => self.conflict_pending,
        }
    }

    /// Runs the interrupt handler as if it preempted the main path now.
    pub fn fire_interrupt(&mut self) {
        let bridge = self.bridge;
        self.in_interrupt = true;
        let _ = bridge.on_signal(&mut *self);
        self.in_interrupt = false;
    }

    fn advance(&mut self) {
        if self.conditions == 0 {
            return;
        }

        self.settle -= 1;
        if self.settle > 0 {
            return;
        }

        let finished = self.conditions;
        self.conditions = 0;

        if finished & (Condition::Start.mask() | Condition::RepeatedStart.mask()) != 0 {
            self.owned = true;
        }
        if finished & Condition::Stop.mask() != 0 {
            self.owned = false;
        }
        if finished & Condition::ReceiveEnable.mask() != 0 {
            self.rx = self.peer.data.get(self.rx_index).copied().unwrap_or(0xFF);
            self.rx_index += 1;
            self.status |= BUFFER_FULL;
        }

        self.raise(Signal::Completion);
        self.fire_interrupt();
    }
}

impl SignalLines for SimPeripheral<'_> {
    type Error = Infallible;

    fn enable_signals(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::SignalsEnabled);
        Ok(())
    }

    fn signal_pending(&mut self, signal: Signal) -> Result<bool, Self::Error> {
        Ok(self.is_pending(signal))
    }

    fn clear_signal_pending(&mut self, signal: Signal) -> Result<(), Self::Error> {
        if !self.in_interrupt {
            self.log.push(Event::ClearPending(signal));
        }
        match signal {
            Signal::Completion => self.completion_pending = false,
            Signal::Conflict => self.conflict_pending = false,
        }
        Ok(())
    }
}

impl BusInterface for SimPeripheral<'_> {
    fn set_master_mode(&mut self, divisor: u8) -> Result<(), Self::Error> {
        self.log.push(Event::MasterMode(divisor));
        Ok(())
    }

    fn assert_condition(&mut self, condition: Condition) -> Result<(), Self::Error> {
        self.log.push(Event::Condition(condition));
        self.conditions |= condition.mask();
        self.settle = CONDITION_POLLS;
        Ok(())
    }

    fn set_ack_bit(&mut self, not_acknowledge: bool) -> Result<(), Self::Error> {
        self.log.push(Event::AckBit(not_acknowledge));
        self.ack_after_idle = self.hold_polls == 0 && self.conditions == 0;
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.log.push(Event::Write(byte));

        if self.collide {
            self.collide = false;
            self.raise(Signal::Conflict);
        } else {
            self.ack_status = !self.peer.acks;
            self.raise(Signal::Completion);
        }

        self.fire_interrupt();
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.log.push(Event::Read(self.rx));
        self.status &= !BUFFER_FULL;

        let (bits, polls) = self.hold_after_read;
        if polls > 0 {
            self.hold_status(bits, polls);
            self.hold_after_read = (0, 0);
        }

        Ok(self.rx)
    }

    fn status_snapshot(&mut self) -> Result<BusStatus, Self::Error> {
        self.polls += 1;

        let mut status = self.status;
        if self.hold_polls > 0 {
            self.hold_polls -= 1;
            status |= self.hold_bits;
        }

        let snapshot = BusStatus::new(self.conditions, status);
        self.advance();
        Ok(snapshot)
    }

    fn acknowledge_status(&mut self) -> Result<bool, Self::Error> {
        Ok(self.ack_status)
    }
}
