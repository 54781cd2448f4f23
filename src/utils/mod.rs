//! Utility functions shared across layers.
//!
//! - [`code_generator`] - Short code generation and alias validation
//! - [`client_ip`] - Client IP extraction from request metadata
//! - [`datetime`] - Lenient timestamp parsing for request bodies

pub mod client_ip;
pub mod code_generator;
pub mod datetime;
