use axum::{
    Extension, Json, Router,
    extract::State,
    middleware,
    routing::{get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        common::ActionResponse,
        timer::{
            AdjustTimeRequest, CustomDurationRequest, GotoStepRequest, SpendDeliberationRequest,
            StartFormatRequest, StatusResponse,
        },
    },
    error::AppError,
    routes::session::require_session,
    services::timer_service,
    state::{SessionHandle, SharedState},
};

/// Timer commands and status for the session named by `X-Session-Id`.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/timer/start", post(start_format))
        .route("/timer/step", post(goto_step))
        .route("/timer/next", post(next_step))
        .route("/timer/previous", post(previous_step))
        .route("/timer/toggle", post(toggle))
        .route("/timer/switch-turn", post(switch_turn))
        .route("/timer/adjust", post(adjust))
        .route("/timer/deliberation", post(spend_deliberation))
        .route("/timer/deliberation/clear", post(clear_deliberation))
        .route("/timer/custom-duration", post(set_custom_duration))
        .route("/timer/status", get(status))
        .route_layer(middleware::from_fn_with_state(state, require_session))
}

/// Start a format from its first step, replacing whatever was running.
#[utoipa::path(
    post,
    path = "/timer/start",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    request_body = StartFormatRequest,
    responses(
        (status = 200, description = "Format started", body = ActionResponse),
        (status = 403, description = "Session may not use this format")
    )
)]
pub async fn start_format(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
    Json(payload): Json<StartFormatRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        timer_service::start_format(&state, &session, payload.format).await?,
    ))
}

/// Jump to a step of the running format; its clock is re-armed and paused.
#[utoipa::path(
    post,
    path = "/timer/step",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    request_body = GotoStepRequest,
    responses(
        (status = 200, description = "Step selected", body = ActionResponse),
        (status = 400, description = "Step index out of range")
    )
)]
pub async fn goto_step(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
    Json(payload): Json<GotoStepRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        timer_service::goto_step(&state, &session, payload.step).await?,
    ))
}

/// Move to the next step.
#[utoipa::path(
    post,
    path = "/timer/next",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    responses((status = 200, description = "Step advanced", body = ActionResponse))
)]
pub async fn next_step(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(timer_service::next_step(&state, &session).await?))
}

/// Move to the previous step.
#[utoipa::path(
    post,
    path = "/timer/previous",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    responses((status = 200, description = "Step moved back", body = ActionResponse))
)]
pub async fn previous_step(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(timer_service::previous_step(&state, &session).await?))
}

/// Start or pause the current clock.
#[utoipa::path(
    post,
    path = "/timer/toggle",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    responses((status = 200, description = "Clock toggled", body = ActionResponse))
)]
pub async fn toggle(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(timer_service::toggle(&state, &session).await?))
}

/// Give the floor to the other side during free debate.
#[utoipa::path(
    post,
    path = "/timer/switch-turn",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    responses(
        (status = 200, description = "Turn switched", body = ActionResponse),
        (status = 409, description = "Current step is not a dual-side step")
    )
)]
pub async fn switch_turn(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(timer_service::switch_turn(&state, &session).await?))
}

/// Add or remove time on the current clock.
#[utoipa::path(
    post,
    path = "/timer/adjust",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    request_body = AdjustTimeRequest,
    responses((status = 200, description = "Clock adjusted", body = ActionResponse))
)]
pub async fn adjust(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
    Valid(Json(payload)): Valid<Json<AdjustTimeRequest>>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        timer_service::adjust(&state, &session, payload.seconds).await?,
    ))
}

/// Spend deliberation time for one side.
#[utoipa::path(
    post,
    path = "/timer/deliberation",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    request_body = SpendDeliberationRequest,
    responses(
        (status = 200, description = "Deliberation started", body = ActionResponse),
        (status = 400, description = "Unsupported amount or budget exhausted"),
        (status = 409, description = "Format has no deliberation time")
    )
)]
pub async fn spend_deliberation(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
    Json(payload): Json<SpendDeliberationRequest>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        timer_service::spend_deliberation(&state, &session, payload.side, payload.seconds)
            .await?,
    ))
}

/// Cancel a running deliberation countdown.
#[utoipa::path(
    post,
    path = "/timer/deliberation/clear",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    responses((status = 200, description = "Deliberation cleared", body = ActionResponse))
)]
pub async fn clear_deliberation(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        timer_service::clear_deliberation(&state, &session).await?,
    ))
}

/// Set the length of the general timer's custom step.
#[utoipa::path(
    post,
    path = "/timer/custom-duration",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    request_body = CustomDurationRequest,
    responses(
        (status = 200, description = "Custom duration applied", body = ActionResponse),
        (status = 409, description = "Current step is not the custom step")
    )
)]
pub async fn set_custom_duration(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
    Valid(Json(payload)): Valid<Json<CustomDurationRequest>>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        timer_service::set_custom_duration(&state, &session, payload.minutes, payload.seconds)
            .await?,
    ))
}

/// Current display state of the session's timer.
#[utoipa::path(
    get,
    path = "/timer/status",
    tag = "timer",
    params(("X-Session-Id" = String, Header, description = "Identifier returned by POST /sessions")),
    responses((status = 200, description = "Timer status", body = StatusResponse))
)]
pub async fn status(
    State(state): State<SharedState>,
    Extension(session): Extension<SessionHandle>,
) -> Result<Json<StatusResponse>, AppError> {
    Ok(Json(timer_service::status(&state, &session).await?))
}
