use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::format_system_time,
    state::{Capability, UserSession},
};

/// Returned when a session is opened; `session_id` goes into `X-Session-Id`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionCreatedResponse {
    /// Identifier to send in `X-Session-Id`.
    pub session_id: Uuid,
    /// RFC 3339 creation time.
    pub created_at: String,
    /// Capabilities granted to the session.
    pub grants: Vec<Capability>,
}

impl From<&UserSession> for SessionCreatedResponse {
    fn from(session: &UserSession) -> Self {
        let mut grants: Vec<Capability> = session.grants().iter().copied().collect();
        grants.sort();
        Self {
            session_id: session.id(),
            created_at: format_system_time(session.created_at()),
            grants,
        }
    }
}
