//! Orchestration of a running format: step selection, the step clocks,
//! deliberation budget and the status projection read by clients.

use tracing::debug;

use crate::state::{
    catalog::{FormatDefinition, FormatId, Side, Step},
    clock::Timestamp,
    deliberation::{DeliberationOverlay, DeliberationPool},
    error::TimerError,
    interval::Countdown,
    step::StepState,
};

/// Timer state for one format run inside a user session.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSession {
    format: FormatId,
    step_index: usize,
    step: StepState,
    pool: DeliberationPool,
    overlay: Option<DeliberationOverlay>,
}

impl FormatSession {
    /// Begin `format` at its first step with a full deliberation pool.
    pub fn start(format: FormatId) -> Self {
        let definition = format.definition();
        Self {
            format,
            step_index: 0,
            step: StepState::arm(&definition.steps()[0]),
            pool: DeliberationPool::full(),
            overlay: None,
        }
    }

    /// Format being run.
    pub fn format(&self) -> FormatId {
        self.format
    }

    /// Catalog definition of the running format.
    pub fn definition(&self) -> &'static FormatDefinition {
        self.format.definition()
    }

    /// Index of the selected step.
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Catalog entry for the selected step.
    pub fn current_step(&self) -> &'static Step {
        &self.definition().steps()[self.step_index]
    }

    /// Clocks of the selected step.
    pub fn step_state(&self) -> &StepState {
        &self.step
    }

    /// Deliberation time left per side.
    pub fn pool(&self) -> DeliberationPool {
        self.pool
    }

    /// Running deliberation countdown, if any.
    pub fn overlay(&self) -> Option<&DeliberationOverlay> {
        self.overlay.as_ref()
    }

    /// Whether a deliberation countdown replaces the step display.
    pub fn in_deliberation(&self) -> bool {
        self.overlay.is_some()
    }

    /// Select step `index`, re-arming its clocks from scratch.
    pub fn goto_step(&mut self, index: usize) -> Result<(), TimerError> {
        let definition = self.definition();
        let step = definition.step(index).ok_or(TimerError::InvalidStep {
            index,
            len: definition.len(),
        })?;

        self.step_index = index;
        self.step = StepState::arm(step);
        Ok(())
    }

    /// Advance one step; does nothing on the last step.
    pub fn next_step(&mut self) {
        if self.step_index < self.definition().last_index() {
            self.select(self.step_index + 1);
        }
    }

    /// Go back one step; does nothing on the first step.
    pub fn previous_step(&mut self) {
        if self.step_index > 0 {
            self.select(self.step_index - 1);
        }
    }

    fn select(&mut self, index: usize) {
        self.step_index = index;
        self.step = StepState::arm(self.current_step());
    }

    /// Start or pause the step clock holding the floor.
    pub fn toggle(&mut self, now: Timestamp) {
        self.step.toggle(now);
    }

    /// Hand the floor to the other side of a dual-side step.
    pub fn switch_turn(&mut self, now: Timestamp) -> Result<(), TimerError> {
        match &mut self.step {
            StepState::DualSide(dual) => {
                dual.switch_turn(now);
                Ok(())
            }
            StepState::Sequence(_) => Err(TimerError::WrongMode(
                "turns can only be switched during a dual-side step",
            )),
        }
    }

    /// Shift the step clock holding the floor by `delta_secs`.
    pub fn adjust(&mut self, delta_secs: i32, now: Timestamp) {
        self.step.adjust(f64::from(delta_secs), now);
    }

    /// Spend banked deliberation time and start the overlay countdown.
    pub fn spend_deliberation(
        &mut self,
        side: Side,
        seconds: u32,
        now: Timestamp,
    ) -> Result<(), TimerError> {
        if !self.definition().offers_deliberation() {
            return Err(TimerError::WrongMode("this format has no deliberation time"));
        }

        self.pool.spend(side, seconds)?;
        self.overlay = Some(DeliberationOverlay::begin(side, seconds, now));
        Ok(())
    }

    /// Drop the overlay before it runs out.
    pub fn clear_deliberation(&mut self) {
        self.overlay = None;
    }

    /// Tear down an overlay whose countdown has reached zero. Returns whether
    /// one was removed. Turn clocks are left alone.
    pub fn drop_expired_overlay(&mut self, now: Timestamp) -> bool {
        match &self.overlay {
            Some(overlay) if overlay.is_expired(now) => {
                debug!(
                    side = overlay.side().as_str(),
                    "deliberation time elapsed; clearing overlay"
                );
                self.overlay = None;
                true
            }
            _ => false,
        }
    }

    /// Replace the length of the general format's manual-entry step.
    pub fn set_custom_duration(&mut self, minutes: u32, seconds: u32) -> Result<(), TimerError> {
        if self.format != FormatId::General || self.step_index != self.definition().last_index() {
            return Err(TimerError::WrongMode(
                "a custom duration can only be set on the general timer's custom step",
            ));
        }

        let nominal = minutes.saturating_mul(60).saturating_add(seconds);
        self.step = StepState::with_nominal(self.current_step().mode, nominal);
        Ok(())
    }

    /// Read the displayed state at `now`.
    ///
    /// Reading can itself move the session forward: an expired overlay is
    /// torn down and an expired running turn clock switches turns. The
    /// returned session carries those transitions and must be stored before
    /// the report is handed out.
    pub fn status(&self, now: Timestamp) -> (StatusReport, FormatSession) {
        let mut next = self.clone();
        next.drop_expired_overlay(now);

        if let Some(overlay) = &next.overlay {
            let view = TimerView::Deliberation {
                side: overlay.side(),
                clock: ClockReading::of(overlay.clock(), now),
            };
            return (next.report(view, None), next);
        }

        let view = match &mut next.step {
            StepState::Sequence(clock) => TimerView::Sequence(ClockReading::of(clock, now)),
            StepState::DualSide(dual) => {
                dual.expire_turn(now);
                TimerView::FreeDebate {
                    active: dual.active(),
                    pros: ClockReading::of(dual.clock(Side::Pros), now),
                    cons: ClockReading::of(dual.clock(Side::Cons), now),
                    turn: ClockReading::of(dual.turn(), now),
                }
            }
        };

        let offer = next.deliberation_offer(now);
        (next.report(view, offer), next)
    }

    /// The eligible side may deliberate only before its clock has moved.
    fn deliberation_offer(&self, now: Timestamp) -> Option<DeliberationOffer> {
        let side = self.current_step().deliberation_chance?;
        let clock = self.step.clock_for(side);
        if clock.nominal() > 0.0 && clock.is_untouched(now) {
            Some(DeliberationOffer {
                side,
                pool: self.pool,
            })
        } else {
            None
        }
    }

    fn report(&self, view: TimerView, offer: Option<DeliberationOffer>) -> StatusReport {
        StatusReport {
            format: self.format,
            step_index: self.step_index,
            view,
            offer,
        }
    }
}

/// Derived snapshot of a session at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    /// Format being run.
    pub format: FormatId,
    /// Selected step.
    pub step_index: usize,
    /// Clocks to display.
    pub view: TimerView,
    /// Present when a side may call deliberation time right now.
    pub offer: Option<DeliberationOffer>,
}

/// What the timer display shows.
#[derive(Debug, Clone, PartialEq)]
pub enum TimerView {
    /// Single step clock.
    Sequence(ClockReading),
    /// Both side clocks and the turn clock.
    FreeDebate {
        /// Side holding the floor.
        active: Side,
        /// Pros speaking clock.
        pros: ClockReading,
        /// Cons speaking clock.
        cons: ClockReading,
        /// Current turn clock.
        turn: ClockReading,
    },
    /// Deliberation countdown hiding the step clocks.
    Deliberation {
        /// Side deliberating.
        side: Side,
        /// Overlay countdown.
        clock: ClockReading,
    },
}

/// A countdown read at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    /// Full length of the clock.
    pub nominal_secs: f64,
    /// Seconds left, never negative.
    pub remaining_secs: f64,
    /// Whether the clock is counting down.
    pub is_running: bool,
    /// Whether no time is left.
    pub is_finished: bool,
}

impl ClockReading {
    /// Read `clock` at `now`.
    pub fn of(clock: &Countdown, now: Timestamp) -> Self {
        let remaining_secs = clock.remaining(now);
        Self {
            nominal_secs: clock.nominal(),
            remaining_secs,
            is_running: clock.is_running(),
            is_finished: remaining_secs <= 0.0,
        }
    }
}

/// Advisory that a side may spend deliberation time on the current step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliberationOffer {
    /// Side that may deliberate.
    pub side: Side,
    /// Budget left for both sides.
    pub pool: DeliberationPool,
}
