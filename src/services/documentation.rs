use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the debate timer backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::formats::list_formats,
        crate::routes::session::open_session,
        crate::routes::session::close_session,
        crate::routes::timer::start_format,
        crate::routes::timer::goto_step,
        crate::routes::timer::next_step,
        crate::routes::timer::previous_step,
        crate::routes::timer::toggle,
        crate::routes::timer::switch_turn,
        crate::routes::timer::adjust,
        crate::routes::timer::spend_deliberation,
        crate::routes::timer::clear_deliberation,
        crate::routes::timer::set_custom_duration,
        crate::routes::timer::status,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::common::ActionResponse,
            crate::dto::session::SessionCreatedResponse,
            crate::dto::format::FormatSummary,
            crate::dto::format::StepSnapshot,
            crate::dto::timer::StartFormatRequest,
            crate::dto::timer::GotoStepRequest,
            crate::dto::timer::AdjustTimeRequest,
            crate::dto::timer::SpendDeliberationRequest,
            crate::dto::timer::CustomDurationRequest,
            crate::dto::timer::StatusResponse,
            crate::dto::timer::TimerPayload,
            crate::dto::timer::ClockSnapshot,
            crate::dto::timer::PoolSnapshot,
            crate::dto::timer::DeliberationOfferSnapshot,
            crate::state::Side,
            crate::state::Capability,
            crate::state::FormatId,
            crate::state::catalog::ParticipantMode,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "formats", description = "Debate format catalog"),
        (name = "session", description = "Timer session lifecycle"),
        (name = "timer", description = "Timer commands and status for the current session"),
    )
)]
pub struct ApiDoc;
