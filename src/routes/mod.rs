use axum::Router;

use crate::state::SharedState;

/// Swagger UI and OpenAPI document.
pub mod docs;
/// Format catalog listing.
pub mod formats;
/// Health check.
pub mod health;
/// Session lifecycle and the session header guard.
pub mod session;
/// Timer commands and status.
pub mod timer;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(formats::router())
        .merge(session::router(state.clone()))
        .merge(timer::router(state.clone()));

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
