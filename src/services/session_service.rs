use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::debug;

use crate::{
    dto::{common::ActionResponse, session::SessionCreatedResponse},
    error::ServiceError,
    state::{SessionHandle, SharedState},
};

/// Open a session with the configured default grants.
pub async fn open_session(state: &SharedState) -> SessionCreatedResponse {
    let handle = state.open_session();
    let session = handle.lock().await;
    SessionCreatedResponse::from(&*session)
}

/// Close the session behind `handle`, discarding its timer state.
pub async fn close_session(
    state: &SharedState,
    handle: &SessionHandle,
) -> Result<ActionResponse, ServiceError> {
    let id = handle.lock().await.id();
    if !state.close_session(id) {
        debug!(session_id = %id, "session already closed");
        return Err(ServiceError::Unauthorized(format!("unknown session `{id}`")));
    }
    Ok(ActionResponse::new("session closed"))
}

/// Evict idle sessions every `period` for as long as the server runs.
pub async fn run_idle_sweeper(state: SharedState, period: Duration) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        state.evict_idle_sessions();
    }
}
