//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`LinkRepository`] - Link records, lookup and atomic click counting
//! - [`ClickRepository`] - Append-only click log
//! - [`TokenRepository`] - API token authentication
//! - [`UserRepository`] - Link owners

pub mod click_repository;
pub mod link_repository;
pub mod token_repository;
pub mod user_repository;

pub use click_repository::ClickRepository;
pub use link_repository::LinkRepository;
pub use token_repository::{ApiToken, TokenRepository};
pub use user_repository::UserRepository;

#[cfg(test)]
pub use click_repository::MockClickRepository;
#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
