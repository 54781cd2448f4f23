//! Repository trait for link records.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the link record store.
///
/// Codes are matched exactly (case-sensitive, no trimming) against both the
/// generated short code and the custom alias.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_link.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Creates a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the short code or alias collides with
    /// any existing code or alias.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds the link whose short code or custom alias equals `code`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Same as [`Self::find_by_code`], restricted to links owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_owned_by_code(
        &self,
        code: &str,
        owner_id: i64,
    ) -> Result<Option<Link>, AppError>;

    /// Lists all links of an owner, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError>;

    /// Atomically adds one to the click count of a link.
    ///
    /// Returns the new count, or `None` if the link no longer exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_click_count(&self, link_id: i64) -> Result<Option<i64>, AppError>;

    /// Verifies that the store is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the store cannot be queried.
    async fn health_check(&self) -> Result<(), AppError>;
}
