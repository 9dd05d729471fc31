use crate::{dto::health::HealthResponse, state::SharedState};

/// Respond with a static health payload including the live session count.
pub fn health_status(state: &SharedState) -> HealthResponse {
    HealthResponse::ok(state.session_count())
}
