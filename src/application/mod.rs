//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, listing and resolution
//! - [`services::analytics_service::AnalyticsService`] - Per-link click analytics
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
