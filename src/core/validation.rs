//! Input validation for warren operations.
//!
//! Validates permalinks and secret keys before they enter a store.

use crate::core::constants::{ID_SEPARATOR, WILDCARD};
use crate::error::{Result, ValidationError};

/// Validate an environment, project, or deploy group permalink.
///
/// Permalinks must be URL-safe and must not contain the id separator:
/// - Only lowercase a-z, 0-9, `-`, and `_`
/// - Cannot be empty
///
/// The reserved value `global` is a valid permalink.
///
/// # Errors
///
/// Returns `ValidationError` if the permalink is invalid.
pub fn validate_permalink(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(ValidationError::EmptyPermalink.into());
    }

    for (i, ch) in value.chars().enumerate() {
        if !ch.is_ascii_lowercase() && !ch.is_ascii_digit() && ch != '-' && ch != '_' {
            return Err(ValidationError::InvalidPermalink {
                value: value.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only a-z, 0-9, '-', and '_' are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}

/// Validate a stored secret key name.
///
/// Keys become the last segment of a secret id, so they must not contain
/// the separator, the wildcard marker, or whitespace:
/// - Only a-z, A-Z, 0-9, `_`, `-`, and `.`
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ValidationError` if the key is invalid.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(ValidationError::EmptyKey.into());
    }

    for (i, ch) in key.chars().enumerate() {
        if ch == ID_SEPARATOR || ch == WILDCARD || ch.is_whitespace() {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: format!("'{}' is not allowed in stored keys", ch),
            }
            .into());
        }
        if !ch.is_ascii_alphanumeric() && ch != '_' && ch != '-' && ch != '.' {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only a-z, A-Z, 0-9, '_', '-', and '.' are allowed",
                    ch,
                    i + 1
                ),
            }
            .into());
        }
    }

    Ok(())
}
