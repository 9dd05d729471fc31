//! Application-level configuration loading, including the capabilities granted to new sessions.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::state::Capability;

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "DEBATE_TIMER_CONFIG_PATH";
/// Sessions untouched for this long are dropped from the registry.
const DEFAULT_SESSION_IDLE_TTL: Duration = Duration::from_secs(4 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    default_grants: Vec<Capability>,
    session_idle_ttl: Duration,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        grants = app_config.default_grants.len(),
                        session_idle_ttl_secs = app_config.session_idle_ttl.as_secs(),
                        "loaded timer configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a configuration document. Keys left out keep their defaults.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }

    /// Build a configuration granting exactly `grants` to new sessions.
    pub fn with_grants(grants: impl IntoIterator<Item = Capability>) -> Self {
        Self {
            default_grants: grants.into_iter().collect(),
            session_idle_ttl: DEFAULT_SESSION_IDLE_TTL,
        }
    }

    /// Replace the idle TTL after which sessions are evicted.
    pub fn with_session_idle_ttl(mut self, ttl: Duration) -> Self {
        self.session_idle_ttl = ttl;
        self
    }

    /// Capabilities every new session receives.
    pub fn default_grants(&self) -> &[Capability] {
        &self.default_grants
    }

    /// How long a session may go without requests before it is evicted.
    pub fn session_idle_ttl(&self) -> Duration {
        self.session_idle_ttl
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::with_grants([
            Capability::CedaTimer,
            Capability::FreeTimer,
            Capability::GeneralTimer,
        ])
    }
}

#[derive(Debug, Deserialize)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    #[serde(default)]
    default_grants: Option<Vec<Capability>>,
    #[serde(default)]
    session_idle_ttl_secs: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let config = match value.default_grants {
            Some(grants) => Self::with_grants(grants),
            None => Self::default(),
        };
        match value.session_idle_ttl_secs {
            Some(secs) => config.with_session_idle_ttl(Duration::from_secs(secs)),
            None => config,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}
