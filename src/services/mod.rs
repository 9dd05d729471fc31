/// OpenAPI documentation generation.
pub mod documentation;
/// Health check service.
pub mod health_service;
/// Session lifecycle operations.
pub mod session_service;
/// Timer commands, status reads and the format catalog.
pub mod timer_service;
