use axum::{
    Extension, Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{delete, post},
};
use uuid::Uuid;

use crate::{
    dto::{common::ActionResponse, session::SessionCreatedResponse},
    error::AppError,
    services::session_service,
    state::{SessionHandle, SharedState},
};

pub(crate) const SESSION_HEADER: &str = "x-session-id";

/// Session lifecycle endpoints.
pub fn router(state: SharedState) -> Router<SharedState> {
    let current = Router::new()
        .route("/sessions/current", delete(close_session))
        .route_layer(middleware::from_fn_with_state(state, require_session));

    Router::new()
        .route("/sessions", post(open_session))
        .merge(current)
}

/// Open a timer session and return the identifier to send in `X-Session-Id`.
#[utoipa::path(
    post,
    path = "/sessions",
    tag = "session",
    responses((status = 201, description = "Session opened", body = SessionCreatedResponse))
)]
pub async fn open_session(
    State(state): State<SharedState>,
) -> (StatusCode, Json<SessionCreatedResponse>) {
    let created = session_service::open_session(&state).await;
    (StatusCode::CREATED, Json(created))
}

/// Close the current session and drop its timer state.
#[utoipa::path(
    delete,
    path = "/sessions/current",
    tag = "session",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    responses(
        (status = 200, description = "Session closed", body = ActionResponse),
        (status = 401, description = "Missing or unknown session")
    )
)]
pub async fn close_session(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        session_service::close_session(&state, &session).await?,
    ))
}

/// Resolve `X-Session-Id` to a live session and expose it to the handler.
pub(crate) async fn require_session(
    State(state): State<SharedState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let raw = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized("missing session header `X-Session-Id`".into())
        })?;

    let id = Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("malformed session id `{raw}`")))?;

    let session = state
        .session(id)
        .ok_or_else(|| AppError::Unauthorized(format!("unknown session `{id}`")))?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
