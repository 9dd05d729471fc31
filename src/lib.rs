//! Library crate for debate-timer-back, exposing modules for binaries and integration tests.

/// JSON configuration loading.
pub mod config;
/// Request and response payloads.
pub mod dto;
/// Service and HTTP error types.
pub mod error;
/// Axum route trees.
pub mod routes;
/// Operations behind the routes.
pub mod services;
/// Timer domain and shared application state.
pub mod state;
