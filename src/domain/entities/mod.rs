//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL owned by a user
//! - [`Click`] - One recorded resolution of a link
//! - [`User`] - A link owner
//!
//! Creation inputs use separate structs (`NewLink`, `NewClick`).

pub mod click;
pub mod link;
pub mod user;

pub use click::{Click, NewClick};
pub use link::{Link, NewLink, Resolution, ResolvedLink, is_redirectable};
pub use user::{AuthUser, User};

#[cfg(test)]
pub(crate) use link::sample_link;
