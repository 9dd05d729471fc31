/// Capability gate.
pub mod access;
/// Static format catalog.
pub mod catalog;
/// Wall-clock sources.
pub mod clock;
/// Deliberation budget and overlay.
pub mod deliberation;
/// Domain errors.
pub mod error;
/// Interval logs and countdowns.
pub mod interval;
/// Format orchestration and status projection.
pub mod session;
/// Clocks of the selected step.
pub mod step;

use std::{collections::HashSet, sync::Arc, time::SystemTime};

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::AppConfig;

pub use self::access::{CapabilityGate, SessionGrants};
pub use self::catalog::{Capability, FormatId, Side};
pub use self::clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use self::error::TimerError;
pub use self::session::FormatSession;

/// Application state shared across handlers.
pub type SharedState = Arc<AppState>;
/// Per-session lock; every command or status read holds it for its whole duration.
pub type SessionHandle = Arc<Mutex<UserSession>>;

/// State owned by one client session.
#[derive(Debug)]
pub struct UserSession {
    id: Uuid,
    created_at: SystemTime,
    grants: HashSet<Capability>,
    format: Option<FormatSession>,
}

impl UserSession {
    fn new(id: Uuid, grants: HashSet<Capability>) -> Self {
        Self {
            id,
            created_at: SystemTime::now(),
            grants,
            format: None,
        }
    }

    /// Session identifier sent back in `X-Session-Id`.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// When the session was opened.
    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Capabilities attached when the session was opened.
    pub fn grants(&self) -> &HashSet<Capability> {
        &self.grants
    }

    /// Format currently running in this session, if any.
    pub fn format(&self) -> Option<&FormatSession> {
        self.format.as_ref()
    }

    /// Replace the running format wholesale.
    pub fn install_format(&mut self, format: FormatSession) {
        self.format = Some(format);
    }
}

/// Registry entry: the session plus the last time a request touched it.
struct SessionSlot {
    handle: SessionHandle,
    last_seen: Timestamp,
}

/// Central application state: configuration, time source, access gate and
/// the registry of live sessions.
pub struct AppState {
    config: AppConfig,
    clock: Arc<dyn Clock>,
    gate: Arc<dyn CapabilityGate>,
    sessions: DashMap<Uuid, SessionSlot>,
}

impl AppState {
    /// Construct a new [`AppState`] backed by the system clock and session grants.
    pub fn new(config: AppConfig) -> SharedState {
        Self::with_parts(config, Arc::new(SystemClock), Arc::new(SessionGrants))
    }

    /// Construct an [`AppState`] with an explicit clock and access gate.
    pub fn with_parts(
        config: AppConfig,
        clock: Arc<dyn Clock>,
        gate: Arc<dyn CapabilityGate>,
    ) -> SharedState {
        Arc::new(Self {
            config,
            clock,
            gate,
            sessions: DashMap::new(),
        })
    }

    /// Current wall-clock reading.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Gate deciding which formats a session may run.
    pub fn gate(&self) -> &dyn CapabilityGate {
        self.gate.as_ref()
    }

    /// Open a session carrying the configured default grants.
    pub fn open_session(&self) -> SessionHandle {
        let id = Uuid::new_v4();
        let grants = self.config.default_grants().iter().copied().collect();
        let handle = Arc::new(Mutex::new(UserSession::new(id, grants)));
        self.sessions.insert(
            id,
            SessionSlot {
                handle: handle.clone(),
                last_seen: self.now(),
            },
        );
        info!(session_id = %id, "opened timer session");
        handle
    }

    /// Look up a live session and mark it as seen now.
    pub fn session(&self, id: Uuid) -> Option<SessionHandle> {
        let now = self.now();
        self.sessions.get_mut(&id).map(|mut slot| {
            slot.last_seen = now;
            slot.handle.clone()
        })
    }

    /// Drop a session, returning whether it existed.
    pub fn close_session(&self, id: Uuid) -> bool {
        let removed = self.sessions.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "closed timer session");
        }
        removed
    }

    /// Drop every session not looked up for longer than the configured idle
    /// TTL. Returns how many were removed.
    pub fn evict_idle_sessions(&self) -> usize {
        let cutoff = self.now() - self.config.session_idle_ttl().as_secs_f64();
        let before = self.sessions.len();
        self.sessions.retain(|id, slot| {
            let keep = slot.last_seen >= cutoff;
            if !keep {
                debug!(session_id = %id, "evicting idle timer session");
            }
            keep
        });
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            info!(evicted, remaining = self.sessions.len(), "idle sessions evicted");
        }
        evicted
    }

    /// Number of live sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
