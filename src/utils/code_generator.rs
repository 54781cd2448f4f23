//! Short code generation and custom alias validation.

use crate::error::AppError;
use base64::Engine as _;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

/// Random bytes per generated code; 6 bytes encode to 8 base64 characters.
const CODE_LENGTH_BYTES: usize = 6;

/// Length of generated short codes.
pub const GENERATED_CODE_LENGTH: usize = 8;

const ALIAS_MIN_LENGTH: usize = 3;
const ALIAS_MAX_LENGTH: usize = 64;

/// Path segments served by the router itself.
const RESERVED_CODES: &[&str] = &["api", "health"];

static ALIAS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("alias pattern is valid"));

/// Generates a random short code.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing an 8-character code over `[A-Za-z0-9_-]`.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_code() -> Result<String, AppError> {
    let mut buffer = [0u8; CODE_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate short code",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Validates a user-supplied alias.
///
/// # Rules
///
/// - Length: 3-64 characters
/// - Allowed characters: ASCII letters, digits, `_` and `-` (case is kept)
/// - Cannot be a reserved route segment
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_alias(alias: &str) -> Result<(), AppError> {
    let len = alias.chars().count();
    if !(ALIAS_MIN_LENGTH..=ALIAS_MAX_LENGTH).contains(&len) {
        return Err(AppError::bad_request(
            "Custom alias must be 3-64 characters",
            json!({ "provided_length": len }),
        ));
    }

    if !ALIAS_REGEX.is_match(alias) {
        return Err(AppError::bad_request(
            "Custom alias can only contain letters, digits, underscores and hyphens",
            json!({ "alias": alias }),
        ));
    }

    if RESERVED_CODES.contains(&alias) {
        return Err(AppError::bad_request(
            "This alias is reserved",
            json!({ "alias": alias }),
        ));
    }

    Ok(())
}
