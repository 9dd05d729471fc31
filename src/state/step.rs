//! Live clocks for the currently selected step, including the two-sided
//! turn alternation used during free debate.

use tracing::debug;

use crate::state::{
    catalog::{ParticipantMode, Side, Step},
    clock::Timestamp,
    interval::Countdown,
};

/// Length of a single speaking turn during free debate.
pub const TURN_BUDGET_SECS: u32 = 120;

/// Clocks backing the selected step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepState {
    /// One shared countdown.
    Sequence(Countdown),
    /// Per-side countdowns plus a turn clock.
    DualSide(DualSideState),
}

impl StepState {
    /// Arm fresh, paused clocks for `step`.
    pub fn arm(step: &Step) -> Self {
        Self::with_nominal(step.mode, step.nominal_secs)
    }

    /// Arm fresh, paused clocks for a step shape with an explicit length.
    pub fn with_nominal(mode: ParticipantMode, nominal_secs: u32) -> Self {
        match mode {
            ParticipantMode::DualSide => StepState::DualSide(DualSideState::new(nominal_secs)),
            ParticipantMode::Unconstrained | ParticipantMode::Restricted(_) => {
                StepState::Sequence(Countdown::new(nominal_secs))
            }
        }
    }

    /// Pause or resume the clock that currently holds the floor.
    pub fn toggle(&mut self, now: Timestamp) {
        match self {
            StepState::Sequence(clock) => clock.toggle(now),
            StepState::DualSide(dual) => dual.toggle(now),
        }
    }

    /// Nudge the clock that currently holds the floor by `delta` seconds.
    pub fn adjust(&mut self, delta: f64, now: Timestamp) {
        match self {
            StepState::Sequence(clock) => clock.adjust(delta, now),
            StepState::DualSide(dual) => dual.adjust(delta, now),
        }
    }

    /// Clock a side speaks against; single-clock steps share one.
    pub fn clock_for(&self, side: Side) -> &Countdown {
        match self {
            StepState::Sequence(clock) => clock,
            StepState::DualSide(dual) => dual.clock(side),
        }
    }
}

/// Two independent side clocks and the turn clock that governs alternation.
#[derive(Debug, Clone, PartialEq)]
pub struct DualSideState {
    pros: Countdown,
    cons: Countdown,
    active: Side,
    turn: Countdown,
}

impl DualSideState {
    /// Both sides at `nominal_secs`, pros holding the floor, everything paused.
    pub fn new(nominal_secs: u32) -> Self {
        Self {
            pros: Countdown::new(nominal_secs),
            cons: Countdown::new(nominal_secs),
            active: Side::Pros,
            turn: Countdown::new(TURN_BUDGET_SECS),
        }
    }

    /// Side currently holding the floor.
    pub fn active(&self) -> Side {
        self.active
    }

    /// Speaking clock of `side`.
    pub fn clock(&self, side: Side) -> &Countdown {
        match side {
            Side::Pros => &self.pros,
            Side::Cons => &self.cons,
        }
    }

    fn clock_mut(&mut self, side: Side) -> &mut Countdown {
        match side {
            Side::Pros => &mut self.pros,
            Side::Cons => &mut self.cons,
        }
    }

    /// Clock bounding the current turn.
    pub fn turn(&self) -> &Countdown {
        &self.turn
    }

    /// Flip the active side's clock and the turn clock. Each clock flips
    /// independently, so they can disagree after a switch to an exhausted side.
    pub fn toggle(&mut self, now: Timestamp) {
        let active = self.active;
        self.clock_mut(active).toggle(now);
        self.turn.toggle(now);
    }

    /// Apply the same nudge to the active side and to the turn clock.
    pub fn adjust(&mut self, delta: f64, now: Timestamp) {
        let active = self.active;
        self.clock_mut(active).adjust(delta, now);
        self.turn.adjust(delta, now);
    }

    /// Hand the floor to the other side.
    ///
    /// The outgoing clock is stopped if it was running. The incoming clock is
    /// started only when it still has time left. The turn clock always
    /// restarts running, even when no side clock was started.
    pub fn switch_turn(&mut self, now: Timestamp) {
        let outgoing = self.active;
        let incoming = outgoing.other();

        self.clock_mut(outgoing).stop(now);

        let next = self.clock_mut(incoming);
        if !next.is_running() && next.remaining(now) > 0.0 {
            next.start(now);
        }

        self.active = incoming;
        self.turn = Countdown::running_from(TURN_BUDGET_SECS, now);
    }

    /// Switch turns if the running turn clock has run out. Returns whether a
    /// switch happened.
    pub fn expire_turn(&mut self, now: Timestamp) -> bool {
        if !(self.turn.is_running() && self.turn.is_finished(now)) {
            return false;
        }

        debug!(from = self.active.as_str(), "turn clock expired; switching turns");
        self.switch_turn(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: Timestamp = 5_000.0;

    #[test]
    fn arm_picks_shape_from_mode() {
        assert!(matches!(
            StepState::with_nominal(ParticipantMode::Unconstrained, 60),
            StepState::Sequence(_)
        ));
        assert!(matches!(
            StepState::with_nominal(ParticipantMode::Restricted(Side::Cons), 60),
            StepState::Sequence(_)
        ));
        assert!(matches!(
            StepState::with_nominal(ParticipantMode::DualSide, 480),
            StepState::DualSide(_)
        ));
    }

    #[test]
    fn toggle_starts_active_side_and_turn() {
        let mut dual = DualSideState::new(480);
        dual.toggle(T0);
        assert!(dual.clock(Side::Pros).is_running());
        assert!(!dual.clock(Side::Cons).is_running());
        assert!(dual.turn().is_running());

        dual.toggle(T0 + 30.0);
        assert!(!dual.clock(Side::Pros).is_running());
        assert!(!dual.turn().is_running());
        assert_eq!(dual.clock(Side::Pros).remaining(T0 + 100.0), 450.0);
        assert_eq!(dual.turn().remaining(T0 + 100.0), 90.0);
    }

    #[test]
    fn switch_stops_outgoing_and_starts_incoming() {
        let mut dual = DualSideState::new(480);
        dual.toggle(T0);
        dual.switch_turn(T0 + 40.0);

        assert_eq!(dual.active(), Side::Cons);
        assert!(!dual.clock(Side::Pros).is_running());
        assert!(dual.clock(Side::Cons).is_running());
        assert!(dual.turn().is_running());
        assert_eq!(dual.clock(Side::Pros).remaining(T0 + 60.0), 440.0);
        assert_eq!(dual.clock(Side::Cons).remaining(T0 + 60.0), 460.0);
        assert_eq!(dual.turn().remaining(T0 + 60.0), 100.0);
    }

    #[test]
    fn switch_never_starts_an_exhausted_side() {
        let mut dual = DualSideState::new(480);
        dual.cons.adjust(-480.0, T0);
        dual.toggle(T0);
        dual.switch_turn(T0 + 10.0);

        assert_eq!(dual.active(), Side::Cons);
        assert!(!dual.clock(Side::Cons).is_running());
        assert!(dual.turn().is_running());
    }

    #[test]
    fn toggle_after_switch_to_exhausted_side_flips_both_clocks() {
        let mut dual = DualSideState::new(480);
        dual.cons.adjust(-480.0, T0);
        dual.toggle(T0);
        dual.switch_turn(T0 + 10.0);
        assert!(!dual.clock(Side::Cons).is_running());
        assert!(dual.turn().is_running());

        dual.toggle(T0 + 15.0);
        assert!(dual.clock(Side::Cons).is_running());
        assert_eq!(dual.clock(Side::Cons).remaining(T0 + 15.0), 0.0);
        assert!(!dual.turn().is_running());
        assert_eq!(dual.turn().remaining(T0 + 30.0), 115.0);
    }

    #[test]
    fn switch_with_both_sides_exhausted_still_flips_and_resets_turn() {
        let mut dual = DualSideState::new(60);
        dual.pros.adjust(-60.0, T0);
        dual.cons.adjust(-60.0, T0);

        dual.switch_turn(T0 + 1.0);
        assert_eq!(dual.active(), Side::Cons);
        assert!(!dual.clock(Side::Pros).is_running());
        assert!(!dual.clock(Side::Cons).is_running());
        assert_eq!(dual.turn().remaining(T0 + 1.0), f64::from(TURN_BUDGET_SECS));
        assert!(dual.turn().is_running());

        dual.switch_turn(T0 + 2.0);
        assert_eq!(dual.active(), Side::Pros);
        assert!(!dual.clock(Side::Pros).is_running());
    }

    #[test]
    fn consecutive_switches_alternate_the_running_side() {
        let mut dual = DualSideState::new(480);
        dual.switch_turn(T0);
        assert!(dual.clock(Side::Cons).is_running());
        dual.switch_turn(T0 + 5.0);
        assert_eq!(dual.active(), Side::Pros);
        assert!(!dual.clock(Side::Cons).is_running());
        assert!(dual.clock(Side::Pros).is_running());
    }

    #[test]
    fn expired_turn_switches_only_when_running() {
        let mut dual = DualSideState::new(480);
        dual.toggle(T0);
        assert!(!dual.expire_turn(T0 + 119.0));
        assert!(dual.expire_turn(T0 + 120.0));
        assert_eq!(dual.active(), Side::Cons);
        assert!(!dual.expire_turn(T0 + 120.0));

        let mut paused = DualSideState::new(480);
        paused.turn.adjust(-120.0, T0);
        assert!(!paused.expire_turn(T0 + 500.0));
        assert_eq!(paused.active(), Side::Pros);
    }

    #[test]
    fn adjust_moves_side_and_turn_together() {
        let mut dual = DualSideState::new(480);
        dual.toggle(T0);
        dual.adjust(-10.0, T0 + 20.0);
        assert_eq!(dual.clock(Side::Pros).remaining(T0 + 20.0), 450.0);
        assert_eq!(dual.turn().remaining(T0 + 20.0), 90.0);
        assert_eq!(dual.clock(Side::Cons).remaining(T0 + 20.0), 480.0);
    }

    #[test]
    fn sequence_toggle_and_adjust_hit_single_clock() {
        let mut state = StepState::with_nominal(ParticipantMode::Unconstrained, 180);
        state.toggle(T0);
        state.adjust(10.0, T0 + 30.0);
        let clock = state.clock_for(Side::Pros);
        assert!(clock.is_running());
        assert_eq!(clock.remaining(T0 + 30.0), 160.0);
    }
}
