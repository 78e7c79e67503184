//! Sharing-grant registry.
//!
//! A sharing grant lets a project read a globally-scoped secret key it
//! does not own. The resolver consults the registry only when the store
//! enforces sharing grants.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::{Permalink, SecretKey};
use crate::error::Result;

/// Grant registry trait.
///
/// Answers which globally-scoped keys a project has been granted.
pub trait GrantRegistry {
    /// Keys `project` may read at global project scope.
    fn granted_keys(&self, project: &str) -> Result<BTreeSet<SecretKey>>;
}

/// In-memory grant registry.
#[derive(Debug, Default)]
pub struct MemoryGrants {
    grants: BTreeMap<Permalink, BTreeSet<SecretKey>>,
}

impl MemoryGrants {
    /// Create an empty registry (no project is granted anything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `project` access to the globally-scoped `key`.
    pub fn grant(&mut self, project: impl Into<Permalink>, key: impl Into<SecretKey>) {
        self.grants.entry(project.into()).or_default().insert(key.into());
    }
}

impl GrantRegistry for MemoryGrants {
    fn granted_keys(&self, project: &str) -> Result<BTreeSet<SecretKey>> {
        Ok(self.grants.get(project).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granted_keys() {
        let mut grants = MemoryGrants::new();
        grants.grant("acme", "db_password");
        grants.grant("acme", "api_token");

        let keys = grants.granted_keys("acme").unwrap();
        assert!(keys.contains("db_password"));
        assert!(keys.contains("api_token"));
    }

    #[test]
    fn test_ungranted_project_gets_empty_set() {
        let grants = MemoryGrants::new();
        assert!(grants.granted_keys("acme").unwrap().is_empty());
    }
}
