//! Rendezvous between the peripheral interrupt and the blocking bus operations.
//!
//! A [`SignalBridge`] holds the "handshake pending" flag. The bus controller arms
//! it right before loading the transmit buffer and then spins until the
//! interrupt handler, via [`SignalBridge::on_signal`], clears it. Only atomic
//! loads and stores are used so the bridge also works on cores without
//! compare-and-swap; the handler cannot be preempted by the main path, which is
//! what makes the split read/write sequences safe.
//!
//! ```rust,ignore
//! static BRIDGE: SignalBridge = SignalBridge::new();
//!
//! #[interrupt]
//! fn high_priority() {
//!     let _ = BRIDGE.on_signal(&mut MsspInterface::new(Sfrs::steal()));
//! }
//! ```

use core::hint;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::interface::SignalLines;
use crate::params::{ConflictPolicy, Signal};

/// Completion flag shared between one bus controller and its interrupt handler.
#[derive(Debug)]
pub struct SignalBridge {
    pending: AtomicBool,
    conflict: AtomicBool,
    report_conflicts: AtomicBool,
}

/// What a single [`SignalBridge::on_signal`] invocation observed and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SignalEvents {
    /// The completion signal was pending and has been cleared.
    pub completion: bool,
    /// The conflict signal was pending and has been cleared.
    pub conflict: bool,
    /// A waiting operation was released.
    pub released: bool,
}

impl SignalBridge {
    /// Creates a disarmed bridge that reports conflicts.
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
            conflict: AtomicBool::new(false),
            report_conflicts: AtomicBool::new(true),
        }
    }

    /// Marks a handshake as pending.
    ///
    /// Must be called after the preceding idle wait and right before the
    /// register write that makes the peripheral raise the completion signal.
    pub fn arm(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Withdraws a pending handshake that will never be signalled.
    pub fn disarm(&self) {
        self.pending.store(false, Ordering::Release);
    }

    /// Returns `true` while a handshake is pending.
    pub fn is_armed(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Spins until the interrupt handler clears the pending flag.
    ///
    /// There is no timeout: a peripheral that never signals blocks forever.
    pub fn wait_cleared(&self) {
        while self.pending.load(Ordering::Acquire) {
            hint::spin_loop();
        }
    }

    /// Interrupt-side entry point.
    ///
    /// Clears the completion indicator whenever it is pending, releasing an
    /// armed waiter, and clears the conflict indicator unconditionally. Under
    /// [`ConflictPolicy::Report`] a conflict is also latched for the waiting
    /// operation and releases it, since the peripheral aborts the transfer.
    pub fn on_signal<S>(&self, lines: &mut S) -> core::result::Result<SignalEvents, S::Error>
    where
        S: SignalLines,
    {
        let mut events = SignalEvents::default();

        if lines.signal_pending(Signal::Completion)? {
            events.released |= self.release();
            lines.clear_signal_pending(Signal::Completion)?;
            events.completion = true;
        }

        if lines.signal_pending(Signal::Conflict)? {
            lines.clear_signal_pending(Signal::Conflict)?;
            events.conflict = true;

            if self.report_conflicts.load(Ordering::Acquire) {
                self.conflict.store(true, Ordering::Release);
                events.released |= self.release();
            } else {
                warn!("bus conflict ignored");
            }
        }

        Ok(events)
    }

    /// Returns and clears the latched conflict indicator.
    ///
    /// The latch is a single flag, not a counter. A conflict latched by the
    /// handler between the load and the store below folds into the one being
    /// returned; a swap would close that window but needs compare-and-swap.
    pub fn take_conflict(&self) -> bool {
        let latched = self.conflict.load(Ordering::Acquire);
        if latched {
            self.conflict.store(false, Ordering::Release);
        }
        latched
    }

    /// Selects whether conflicts are latched and release waiters.
    pub fn set_conflict_policy(&self, policy: ConflictPolicy) {
        self.report_conflicts
            .store(matches!(policy, ConflictPolicy::Report), Ordering::Release);
    }

    /// Returns the bridge to its disarmed state with the given policy.
    pub fn reset(&self, policy: ConflictPolicy) {
        self.set_conflict_policy(policy);
        self.conflict.store(false, Ordering::Release);
        self.pending.store(false, Ordering::Release);
    }

    fn release(&self) -> bool {
        let armed = self.pending.load(Ordering::Acquire);
        if armed {
            self.pending.store(false, Ordering::Release);
        }
        armed
    }
}

impl Default for SignalBridge {
    fn default() -> Self {
        Self::new()
    }
}
