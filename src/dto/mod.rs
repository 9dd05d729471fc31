use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Shared acknowledgement payloads.
pub mod common;
/// Format catalog payloads.
pub mod format;
/// Health check payload.
pub mod health;
/// Session lifecycle payloads.
pub mod session;
/// Timer command bodies and status payloads.
pub mod timer;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Render whole seconds as `MM:SS`; minutes keep growing past 99.
fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
