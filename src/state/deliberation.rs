//! Banked deliberation time and the overlay countdown it buys.

use crate::state::{
    catalog::Side,
    clock::Timestamp,
    error::TimerError,
    interval::Countdown,
};

/// Seconds each side starts a session with.
pub const DELIBERATION_ALLOWANCE_SECS: u32 = 120;
/// The only amounts a side may spend at once.
pub const DELIBERATION_GRANTS_SECS: [u32; 2] = [60, 120];

/// Remaining deliberation seconds per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliberationPool {
    pros: u32,
    cons: u32,
}

impl Default for DeliberationPool {
    fn default() -> Self {
        Self::full()
    }
}

impl DeliberationPool {
    /// Pool holding the full allowance for both sides.
    pub fn full() -> Self {
        Self {
            pros: DELIBERATION_ALLOWANCE_SECS,
            cons: DELIBERATION_ALLOWANCE_SECS,
        }
    }

    /// Seconds `side` may still spend.
    pub fn remaining(&self, side: Side) -> u32 {
        match side {
            Side::Pros => self.pros,
            Side::Cons => self.cons,
        }
    }

    /// Debit `seconds` from `side`, leaving the pool untouched on failure.
    pub fn spend(&mut self, side: Side, seconds: u32) -> Result<(), TimerError> {
        if !DELIBERATION_GRANTS_SECS.contains(&seconds) {
            return Err(TimerError::InvalidDeliberationAmount { requested: seconds });
        }

        let slot = match side {
            Side::Pros => &mut self.pros,
            Side::Cons => &mut self.cons,
        };
        if seconds > *slot {
            return Err(TimerError::InsufficientBudget {
                side,
                requested: seconds,
                available: *slot,
            });
        }

        *slot -= seconds;
        Ok(())
    }
}

/// Countdown that replaces the step display while a side deliberates.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliberationOverlay {
    side: Side,
    clock: Countdown,
}

impl DeliberationOverlay {
    /// Overlay armed and already running from `now`.
    pub fn begin(side: Side, seconds: u32, now: Timestamp) -> Self {
        Self {
            side,
            clock: Countdown::running_from(seconds, now),
        }
    }

    /// Side deliberating.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Overlay countdown.
    pub fn clock(&self) -> &Countdown {
        &self.clock
    }

    /// Whether the overlay has run out and should be torn down.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.clock.is_finished(now)
    }
}
