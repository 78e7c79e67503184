//! Constants used throughout warren.
//!
//! Centralizes magic strings and reserved values.

/// Reserved permalink matching any environment, project, or deploy group.
pub const GLOBAL_SCOPE: &str = "global";

/// Trailing marker turning an env name / secret key into a wildcard pattern.
pub const WILDCARD: char = '*';

/// Separator between the scope segments of a secret id.
pub const ID_SEPARATOR: char = '/';

/// Default vault snapshot file name (warren.toml).
pub const VAULT_FILE: &str = "warren.toml";

/// Placeholder env name used for lookups that discard the env-var side.
pub(crate) const READ_PLACEHOLDER: &str = "unused-param";
