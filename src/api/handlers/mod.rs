//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod health;
pub mod links;
pub mod redirect;

pub use analytics::analytics_handler;
pub use health::health_handler;
pub use links::{create_link_handler, list_links_handler};
pub use redirect::{api_redirect_handler, redirect_handler};
