//! Key pattern type.
//!
//! Env names and secret keys may carry a trailing wildcard marker.
//! Parsing them into a typed pattern once, at the request boundary,
//! keeps the wildcard checks out of the resolution algorithm itself.

use crate::core::constants::WILDCARD;
use crate::core::types::EnvName;

/// An env name or secret key parsed into its literal prefix and an
/// is-wildcard flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPattern {
    literal: String,
    wildcard: bool,
}

impl KeyPattern {
    /// Parse a raw env name or secret key.
    ///
    /// `db_*` parses as a wildcard with literal `db_`; `db_password`
    /// parses as a plain pattern.
    pub fn parse(raw: &str) -> Self {
        match raw.strip_suffix(WILDCARD) {
            Some(literal) => Self {
                literal: literal.to_string(),
                wildcard: true,
            },
            None => Self {
                literal: raw.to_string(),
                wildcard: false,
            },
        }
    }

    /// Whether the raw input ended with the wildcard marker
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Literal prefix with the marker stripped
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Remainder of a matched key beyond this pattern's literal prefix.
    pub fn suffix_of<'k>(&self, key: &'k str) -> &'k str {
        key.strip_prefix(&self.literal).unwrap_or_default()
    }

    /// Env name for a wildcard match: the literal env prefix with the
    /// matched key suffix appended, uppercased.
    ///
    /// Env `FOO_*` matching key suffix `bar` yields `FOO_BAR`.
    pub fn expand_env(&self, suffix: &str) -> EnvName {
        format!("{}{}", self.literal, suffix.to_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let pattern = KeyPattern::parse("db_password");
        assert!(!pattern.is_wildcard());
        assert_eq!(pattern.literal(), "db_password");
    }

    #[test]
    fn test_parse_wildcard() {
        let pattern = KeyPattern::parse("db_*");
        assert!(pattern.is_wildcard());
        assert_eq!(pattern.literal(), "db_");
    }

    #[test]
    fn test_suffix_of() {
        let pattern = KeyPattern::parse("foo_*");
        assert_eq!(pattern.suffix_of("foo_bar"), "bar");
        assert_eq!(pattern.suffix_of("foo_"), "");
        // not a match for the literal prefix
        assert_eq!(pattern.suffix_of("other"), "");
    }

    #[test]
    fn test_expand_env_uppercases_suffix() {
        let env = KeyPattern::parse("FOO_*");
        assert_eq!(env.expand_env("bar"), "FOO_BAR");
        assert_eq!(env.expand_env(""), "FOO_");
    }
}
