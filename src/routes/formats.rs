use axum::{Json, Router, routing::get};

use crate::{dto::format::FormatSummary, services::timer_service, state::SharedState};

/// List the debate formats a session can start.
#[utoipa::path(
    get,
    path = "/formats",
    tag = "formats",
    responses((status = 200, description = "Format catalog", body = [FormatSummary]))
)]
pub async fn list_formats() -> Json<Vec<FormatSummary>> {
    Json(timer_service::list_formats())
}

/// Catalog routes.
pub fn router() -> Router<SharedState> {
    Router::new().route("/formats", get(list_formats))
}
