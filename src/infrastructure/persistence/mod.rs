//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx prepared
//! statements. Rows are mapped through private `FromRow` structs so the
//! domain entities stay free of database derives.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Link storage, lookup and atomic click counting
//! - [`PgClickRepository`] - Click event log
//! - [`PgTokenRepository`] - API token storage and validation
//! - [`PgUserRepository`] - Link owners

pub mod pg_click_repository;
pub mod pg_link_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_click_repository::PgClickRepository;
pub use pg_link_repository::PgLinkRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;
