//! Wire types for the timer command and status endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    dto::{format::StepSnapshot, format_clock},
    state::{
        FormatId, Side,
        deliberation::DeliberationPool,
        session::{ClockReading, DeliberationOffer, StatusReport, TimerView},
    },
};

/// Start (or restart) a format from its first step.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartFormatRequest {
    /// Format to run.
    pub format: FormatId,
}

/// Jump to a specific step of the active format.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GotoStepRequest {
    /// Zero-based step index.
    pub step: usize,
}

/// Nudge the active clock; positive values add time.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AdjustTimeRequest {
    /// Seconds to add, between -3600 and 3600.
    #[validate(range(min = -3600, max = 3600))]
    pub seconds: i32,
}

/// Spend banked deliberation time for one side.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SpendDeliberationRequest {
    /// Side spending its budget.
    pub side: Side,
    /// Either 60 or 120.
    pub seconds: u32,
}

/// Length of the general timer's custom step.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CustomDurationRequest {
    /// Whole minutes, at most 99.
    #[serde(default)]
    #[validate(range(max = 99))]
    pub minutes: u32,
    /// Extra seconds, at most 59.
    #[serde(default)]
    #[validate(range(max = 59))]
    pub seconds: u32,
}

/// A countdown as displayed to clients.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct ClockSnapshot {
    /// Whole seconds left, rounded down.
    pub remaining_secs: u64,
    /// Full length of the clock.
    pub nominal_secs: u64,
    /// `MM:SS` rendering of `remaining_secs`.
    pub time_str: String,
    /// Whether the clock is counting down.
    pub is_running: bool,
    /// Whether no time is left.
    pub is_finished: bool,
}

impl From<ClockReading> for ClockSnapshot {
    fn from(reading: ClockReading) -> Self {
        let remaining_secs = reading.remaining_secs.floor() as u64;
        Self {
            remaining_secs,
            nominal_secs: reading.nominal_secs.floor() as u64,
            time_str: format_clock(remaining_secs),
            is_running: reading.is_running,
            is_finished: reading.is_finished,
        }
    }
}

/// Timer payload, tagged by the kind of display the client should render.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerPayload {
    /// Single countdown for the whole step.
    Sequence {
        /// Step clock.
        clock: ClockSnapshot,
    },
    /// Two side clocks plus the shared turn clock.
    FreeDebate {
        /// Side currently holding the floor.
        turn: Side,
        /// Pros speaking clock.
        pros: ClockSnapshot,
        /// Cons speaking clock.
        cons: ClockSnapshot,
        /// Clock bounding the current turn.
        turn_clock: ClockSnapshot,
    },
    /// Deliberation countdown overlaying the step.
    Deliberation {
        /// Side deliberating.
        side: Side,
        /// Display caption.
        label: String,
        /// Overlay countdown.
        clock: ClockSnapshot,
    },
}

impl TimerPayload {
    /// Whether the clock currently holding the display is running.
    pub fn is_running(&self) -> bool {
        match self {
            TimerPayload::Sequence { clock } | TimerPayload::Deliberation { clock, .. } => {
                clock.is_running
            }
            TimerPayload::FreeDebate {
                turn, pros, cons, ..
            } => match turn {
                Side::Pros => pros.is_running,
                Side::Cons => cons.is_running,
            },
        }
    }
}

impl From<TimerView> for TimerPayload {
    fn from(view: TimerView) -> Self {
        match view {
            TimerView::Sequence(reading) => TimerPayload::Sequence {
                clock: reading.into(),
            },
            TimerView::FreeDebate {
                active,
                pros,
                cons,
                turn,
            } => TimerPayload::FreeDebate {
                turn: active,
                pros: pros.into(),
                cons: cons.into(),
                turn_clock: turn.into(),
            },
            TimerView::Deliberation { side, clock } => TimerPayload::Deliberation {
                side,
                label: match side {
                    Side::Pros => "Pros deliberation".into(),
                    Side::Cons => "Cons deliberation".into(),
                },
                clock: clock.into(),
            },
        }
    }
}

/// Remaining deliberation seconds per side.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
pub struct PoolSnapshot {
    /// Seconds left for pros.
    pub pros: u32,
    /// Seconds left for cons.
    pub cons: u32,
}

impl From<DeliberationPool> for PoolSnapshot {
    fn from(pool: DeliberationPool) -> Self {
        Self {
            pros: pool.remaining(Side::Pros),
            cons: pool.remaining(Side::Cons),
        }
    }
}

/// Advisory telling the client to offer the "spend deliberation time" control.
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
pub struct DeliberationOfferSnapshot {
    /// Side that may deliberate now.
    pub chance_for: Side,
    /// Budget left for both sides.
    pub remaining: PoolSnapshot,
}

impl From<DeliberationOffer> for DeliberationOfferSnapshot {
    fn from(offer: DeliberationOffer) -> Self {
        Self {
            chance_for: offer.side,
            remaining: offer.pool.into(),
        }
    }
}

/// Response of `GET /timer/status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    /// False when no format has been started in this session.
    pub active: bool,
    /// Format being run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatId>,
    /// Selected step index.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<usize>,
    /// Label of the selected step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_name: Option<String>,
    /// Full step sequence of the active format.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Vec<StepSnapshot>>,
    /// Whether the clock holding the display is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_running: Option<bool>,
    /// Clocks to render.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<TimerPayload>,
    /// Present when a side may spend deliberation time on this step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deliberation: Option<DeliberationOfferSnapshot>,
}

impl StatusResponse {
    /// Response for a session with no running format.
    pub fn inactive() -> Self {
        Self {
            active: false,
            format: None,
            step: None,
            step_name: None,
            timeline: None,
            is_running: None,
            timer: None,
            deliberation: None,
        }
    }
}

impl From<StatusReport> for StatusResponse {
    fn from(report: StatusReport) -> Self {
        let definition = report.format.definition();
        let step_name = definition
            .step(report.step_index)
            .map(|step| step.label.clone());
        let timer = TimerPayload::from(report.view);

        Self {
            active: true,
            format: Some(report.format),
            step: Some(report.step_index),
            step_name,
            timeline: Some(StepSnapshot::timeline(definition)),
            is_running: Some(timer.is_running()),
            timer: Some(timer),
            deliberation: report.offer.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reading(remaining: f64, nominal: f64, running: bool) -> ClockReading {
        ClockReading {
            nominal_secs: nominal,
            remaining_secs: remaining,
            is_running: running,
            is_finished: remaining <= 0.0,
        }
    }

    #[test]
    fn clock_snapshot_floors_remaining_time() {
        let snapshot = ClockSnapshot::from(reading(239.7, 240.0, true));
        assert_eq!(snapshot.remaining_secs, 239);
        assert_eq!(snapshot.time_str, "03:59");
        assert!(snapshot.is_running);
        assert!(!snapshot.is_finished);
    }

    #[test]
    fn sequence_status_serializes_with_type_tag() {
        let response = StatusResponse::from(StatusReport {
            format: FormatId::Ceda,
            step_index: 0,
            view: TimerView::Sequence(reading(240.0, 240.0, false)),
            offer: None,
        });
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["active"], json!(true));
        assert_eq!(value["format"], json!("ceda"));
        assert_eq!(value["step_name"], json!("Pros 1 Constructive"));
        assert_eq!(value["timer"]["type"], json!("sequence"));
        assert_eq!(value["timer"]["clock"]["remaining_secs"], json!(240));
        assert_eq!(value["timeline"].as_array().unwrap().len(), 11);
        assert!(value.get("deliberation").is_none());
    }

    #[test]
    fn free_debate_status_reports_active_side() {
        let response = StatusResponse::from(StatusReport {
            format: FormatId::Ceda,
            step_index: 8,
            view: TimerView::FreeDebate {
                active: Side::Cons,
                pros: reading(300.0, 480.0, false),
                cons: reading(470.0, 480.0, true),
                turn: reading(110.0, 120.0, true),
            },
            offer: Some(DeliberationOffer {
                side: Side::Cons,
                pool: DeliberationPool::full(),
            }),
        });
        assert_eq!(response.is_running, Some(true));

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["timer"]["type"], json!("free_debate"));
        assert_eq!(value["timer"]["turn"], json!("cons"));
        assert_eq!(value["timer"]["turn_clock"]["time_str"], json!("01:50"));
        assert_eq!(value["deliberation"]["chance_for"], json!("cons"));
        assert_eq!(value["deliberation"]["remaining"]["pros"], json!(120));
    }

    #[test]
    fn inactive_status_is_bare() {
        let value = serde_json::to_value(StatusResponse::inactive()).unwrap();
        assert_eq!(value, json!({ "active": false }));
    }

    #[test]
    fn custom_duration_bounds_are_validated() {
        let ok = CustomDurationRequest {
            minutes: 99,
            seconds: 59,
        };
        assert!(ok.validate().is_ok());
        let bad = CustomDurationRequest {
            minutes: 5,
            seconds: 60,
        };
        assert!(bad.validate().is_err());
        let adjust = AdjustTimeRequest { seconds: -4000 };
        assert!(adjust.validate().is_err());
    }
}
