//! Elapsed-time accounting over start/stop marks.
//!
//! A clock never ticks. It only records the instants at which it was started
//! and stopped, and every reading is derived from those marks and the time
//! the caller passes in.

use crate::state::clock::Timestamp;

/// Ordered start/stop marks. An odd number of marks means the clock is
/// running and the last mark is the open start.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalLog {
    marks: Vec<Timestamp>,
}

impl IntervalLog {
    /// Empty, paused log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log with a single open interval starting at `now`.
    pub fn started_at(now: Timestamp) -> Self {
        Self { marks: vec![now] }
    }

    /// Raw marks, oldest first.
    pub fn marks(&self) -> &[Timestamp] {
        &self.marks
    }

    /// Whether an interval is currently open.
    pub fn is_running(&self) -> bool {
        self.marks.len() % 2 == 1
    }

    /// Total time covered by the closed intervals plus the open one, if any.
    pub fn elapsed(&self, now: Timestamp) -> f64 {
        let pairs = self.marks.chunks_exact(2);
        let open = pairs.remainder().first().copied();
        let closed: f64 = pairs.map(|pair| pair[1] - pair[0]).sum();
        match open {
            Some(started) => closed + (now - started).max(0.0),
            None => closed,
        }
    }

    /// Append a mark, flipping the running state.
    ///
    /// The mark is never earlier than the previous one so the log stays
    /// non-decreasing even if the wall clock steps backwards.
    pub fn toggle(&mut self, now: Timestamp) {
        let mark = match self.marks.last() {
            Some(last) if *last > now => *last,
            _ => now,
        };
        self.marks.push(mark);
    }
}

/// A countdown of `nominal` seconds measured against an [`IntervalLog`].
#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    nominal: f64,
    log: IntervalLog,
}

impl Countdown {
    /// Fresh, paused countdown.
    pub fn new(nominal_secs: u32) -> Self {
        Self {
            nominal: f64::from(nominal_secs),
            log: IntervalLog::new(),
        }
    }

    /// Countdown already running from `now`.
    pub fn running_from(nominal_secs: u32, now: Timestamp) -> Self {
        Self {
            nominal: f64::from(nominal_secs),
            log: IntervalLog::started_at(now),
        }
    }

    /// Configured full length in seconds.
    pub fn nominal(&self) -> f64 {
        self.nominal
    }

    /// Underlying interval log.
    pub fn log(&self) -> &IntervalLog {
        &self.log
    }

    /// Whether the countdown is ticking.
    pub fn is_running(&self) -> bool {
        self.log.is_running()
    }

    /// Seconds left, never negative.
    pub fn remaining(&self, now: Timestamp) -> f64 {
        (self.nominal - self.log.elapsed(now)).max(0.0)
    }

    /// Whether no time is left at `now`.
    pub fn is_finished(&self, now: Timestamp) -> bool {
        self.remaining(now) <= 0.0
    }

    /// True while no time has been consumed since the clock was armed.
    pub fn is_untouched(&self, now: Timestamp) -> bool {
        self.remaining(now) >= self.nominal
    }

    /// Pause if running, resume if paused.
    pub fn toggle(&mut self, now: Timestamp) {
        self.log.toggle(now);
    }

    /// Start the clock unless it is already running.
    pub fn start(&mut self, now: Timestamp) {
        if !self.is_running() {
            self.log.toggle(now);
        }
    }

    /// Stop the clock unless it is already paused.
    pub fn stop(&mut self, now: Timestamp) {
        if self.is_running() {
            self.log.toggle(now);
        }
    }

    /// Shift the remaining time by `delta` seconds, clamped to `[0, nominal]`.
    ///
    /// The log is rebuilt as a single interval whose length equals the new
    /// elapsed time, left open if the clock was running.
    pub fn adjust(&mut self, delta: f64, now: Timestamp) {
        let remaining = (self.remaining(now) + delta).clamp(0.0, self.nominal);
        let started = now - (self.nominal - remaining);
        self.log = if self.is_running() {
            IntervalLog { marks: vec![started] }
        } else {
            IntervalLog {
                marks: vec![started, now],
            }
        };
    }
}
