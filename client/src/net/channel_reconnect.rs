//! Reconnect state machine for push channels.
//!
//! Recovery policy: a fixed 2000 ms delay after an unclean closure, one
//! outstanding timer per channel slot, and generation-numbered timers so a
//! timer that fires after cancellation (or after a newer timer replaced it)
//! is a no-op instead of resurrecting a connection for a dead view. The
//! async side (sleeping, reopening the socket) lives in the channel driver;
//! this machine only answers "should a timer be armed" and "is this fire
//! still meaningful".

#[cfg(test)]
#[path = "channel_reconnect_test.rs"]
mod channel_reconnect_test;

use std::fmt;

/// Delay between an unclean closure and the reconnect attempt.
pub const RECONNECT_DELAY_MS: u64 = 2000;

/// Identity of one armed reconnect timer.
pub type TimerId = u64;

/// Where the channel is in its failure/recovery cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Channel open and delivering messages.
    Active,
    /// Unclean closure seen; the backoff timer is armed.
    WaitingToReconnect,
    /// Timer fired; a new connection to the same topic is being opened.
    Reconnecting,
}

/// Failure/recovery state for one channel slot.
pub struct Reconnector {
    phase: Phase,
    next_timer: TimerId,
    pending: Option<TimerId>,
}

impl Default for Reconnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Reconnector {
    #[must_use]
    pub fn new() -> Self {
        Self { phase: Phase::Active, next_timer: 0, pending: None }
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn has_pending_timer(&self) -> bool {
        self.pending.is_some()
    }

    /// Handle an unclean closure. Returns the timer to arm, or `None` when a
    /// timer is already outstanding — rapid repeated closures before a
    /// successful reconnect must never stack timers.
    pub fn unclean_close(&mut self) -> Option<TimerId> {
        if self.pending.is_some() {
            return None;
        }
        self.phase = Phase::WaitingToReconnect;
        self.next_timer += 1;
        self.pending = Some(self.next_timer);
        Some(self.next_timer)
    }

    /// Handle a timer firing. Returns `true` iff this timer is still the
    /// pending one and a new connection should be opened; a cancelled or
    /// superseded timer returns `false`.
    pub fn timer_fired(&mut self, timer: TimerId) -> bool {
        if self.pending != Some(timer) {
            return false;
        }
        self.pending = None;
        self.phase = Phase::Reconnecting;
        true
    }

    /// A snapshot arrived on the (re)opened connection; recovery is done.
    pub fn connected(&mut self) {
        self.pending = None;
        self.phase = Phase::Active;
    }

    /// Cancel any pending timer on clean teardown. Returns the cancelled
    /// timer id, if one was outstanding.
    pub fn cancel(&mut self) -> Option<TimerId> {
        self.phase = Phase::Active;
        self.pending.take()
    }
}

impl fmt::Debug for Reconnector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconnector")
            .field("phase", &self.phase)
            .field("pending", &self.pending)
            .finish()
    }
}
