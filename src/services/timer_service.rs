//! Timer commands and status reads for one session.
//!
//! Every command works on a copy of the session's [`FormatSession`]: an
//! overlay that has already run out is torn down, the command is applied,
//! and only a successful result is written back. A rejected command leaves
//! the session untouched. Turn expiry is left to status reads.

use tracing::{debug, info};

use crate::{
    dto::{common::ActionResponse, format::FormatSummary, timer::StatusResponse},
    error::ServiceError,
    state::{
        Capability, FormatId, FormatSession, SessionHandle, SharedState, Side, TimerError,
        Timestamp, UserSession, catalog,
    },
};

fn ensure_granted(
    state: &SharedState,
    session: &UserSession,
    capability: Capability,
) -> Result<(), ServiceError> {
    if state.gate().is_granted(session.grants(), capability) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!(
            "session lacks the `{}` capability",
            capability.as_str()
        )))
    }
}

/// Apply `command` to the session's running format and acknowledge with `outcome`.
async fn run_command<F>(
    state: &SharedState,
    handle: &SessionHandle,
    outcome: &'static str,
    command: F,
) -> Result<ActionResponse, ServiceError>
where
    F: FnOnce(&mut FormatSession, Timestamp) -> Result<(), TimerError>,
{
    let mut session = handle.lock().await;
    let current = session.format().ok_or_else(|| {
        ServiceError::InvalidState("no format has been started in this session".into())
    })?;
    ensure_granted(state, &session, current.format().capability())?;

    let now = state.now();
    let mut next = current.clone();
    next.drop_expired_overlay(now);
    command(&mut next, now)?;

    info!(
        session_id = %session.id(),
        format = next.format().as_str(),
        step = next.step_index(),
        outcome,
        "timer command applied"
    );
    session.install_format(next);
    Ok(ActionResponse::new(outcome))
}

/// Every format in the catalog, in display order.
pub fn list_formats() -> Vec<FormatSummary> {
    catalog::formats().map(FormatSummary::from).collect()
}

/// Start `format` from its first step, discarding whatever was running.
pub async fn start_format(
    state: &SharedState,
    handle: &SessionHandle,
    format: FormatId,
) -> Result<ActionResponse, ServiceError> {
    let mut session = handle.lock().await;
    ensure_granted(state, &session, format.capability())?;

    info!(
        session_id = %session.id(),
        format = format.as_str(),
        "format started"
    );
    session.install_format(FormatSession::start(format));
    Ok(ActionResponse::new("format started"))
}

/// Jump to `step` of the running format.
pub async fn goto_step(
    state: &SharedState,
    handle: &SessionHandle,
    step: usize,
) -> Result<ActionResponse, ServiceError> {
    run_command(state, handle, "step selected", |format, _| format.goto_step(step)).await
}

/// Advance one step; stays put on the last step.
pub async fn next_step(
    state: &SharedState,
    handle: &SessionHandle,
) -> Result<ActionResponse, ServiceError> {
    run_command(state, handle, "moved to next step", |format, _| {
        format.next_step();
        Ok(())
    })
    .await
}

/// Go back one step; stays put on the first step.
pub async fn previous_step(
    state: &SharedState,
    handle: &SessionHandle,
) -> Result<ActionResponse, ServiceError> {
    run_command(state, handle, "moved to previous step", |format, _| {
        format.previous_step();
        Ok(())
    })
    .await
}

/// Start or pause the clock of the current step.
pub async fn toggle(
    state: &SharedState,
    handle: &SessionHandle,
) -> Result<ActionResponse, ServiceError> {
    run_command(state, handle, "toggled", |format, now| {
        format.toggle(now);
        Ok(())
    })
    .await
}

/// Hand the floor to the other side during a dual-side step.
pub async fn switch_turn(
    state: &SharedState,
    handle: &SessionHandle,
) -> Result<ActionResponse, ServiceError> {
    run_command(state, handle, "turn switched", |format, now| {
        format.switch_turn(now)
    })
    .await
}

/// Add (or with a negative value remove) time from the current clock.
pub async fn adjust(
    state: &SharedState,
    handle: &SessionHandle,
    seconds: i32,
) -> Result<ActionResponse, ServiceError> {
    run_command(state, handle, "time adjusted", |format, now| {
        format.adjust(seconds, now);
        Ok(())
    })
    .await
}

/// Spend `seconds` of `side`'s deliberation budget.
pub async fn spend_deliberation(
    state: &SharedState,
    handle: &SessionHandle,
    side: Side,
    seconds: u32,
) -> Result<ActionResponse, ServiceError> {
    run_command(state, handle, "deliberation started", |format, now| {
        format.spend_deliberation(side, seconds, now)?;
        debug!(side = side.as_str(), seconds, "deliberation overlay started");
        Ok(())
    })
    .await
}

/// Cancel the deliberation countdown, if one is running. Spent budget is not refunded.
pub async fn clear_deliberation(
    state: &SharedState,
    handle: &SessionHandle,
) -> Result<ActionResponse, ServiceError> {
    run_command(state, handle, "deliberation cleared", |format, _| {
        format.clear_deliberation();
        Ok(())
    })
    .await
}

/// Set the length of the general timer's custom step.
pub async fn set_custom_duration(
    state: &SharedState,
    handle: &SessionHandle,
    minutes: u32,
    seconds: u32,
) -> Result<ActionResponse, ServiceError> {
    run_command(state, handle, "custom duration set", |format, _| {
        format.set_custom_duration(minutes, seconds)
    })
    .await
}

/// Read the display state, persisting any transitions the read triggered.
pub async fn status(
    state: &SharedState,
    handle: &SessionHandle,
) -> Result<StatusResponse, ServiceError> {
    let mut session = handle.lock().await;
    let Some(current) = session.format() else {
        return Ok(StatusResponse::inactive());
    };
    ensure_granted(state, &session, current.format().capability())?;

    let (report, next) = current.status(state.now());
    session.install_format(next);
    Ok(report.into())
}
