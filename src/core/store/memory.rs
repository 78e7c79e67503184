//! In-memory secret store.
//!
//! `BTreeMap`-backed store used by tests and by callers embedding the
//! resolver against secrets they already hold in memory.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::{SecretMeta, SecretStore, StoredSecret};
use crate::core::domain::SecretIdParts;
use crate::core::types::{SecretId, SecretValue};
use crate::core::validation;
use crate::error::{Result, StoreError};

/// In-memory secret store.
///
/// Ids iterate in lexicographic order, which gives the stable listing
/// order the resolver relies on.
#[derive(Debug, Default)]
pub struct MemoryStore {
    secrets: BTreeMap<SecretId, StoredSecret>,
    sharing_grants: bool,
}

impl MemoryStore {
    /// Create an empty store with sharing grants disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable sharing-grant enforcement.
    pub fn with_sharing_grants(mut self, enabled: bool) -> Self {
        self.sharing_grants = enabled;
        self
    }

    /// Insert a secret under the id composed from `parts`.
    ///
    /// Validates the permalinks and key first. Overwrites any existing
    /// value under the same id.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a permalink or the key is invalid.
    pub fn insert(
        &mut self,
        parts: &SecretIdParts,
        value: impl Into<SecretValue>,
    ) -> Result<SecretId> {
        validation::validate_permalink(parts.environment())?;
        validation::validate_permalink(parts.project())?;
        validation::validate_permalink(parts.deploy_group())?;
        validation::validate_key(parts.key())?;

        let id = self.generate_id(parts);
        self.secrets.insert(id.clone(), StoredSecret::new(value));
        Ok(id)
    }

    /// Mark a stored secret deprecated as of `at`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownId` if nothing is stored under `id`.
    pub fn deprecate(&mut self, id: &str, at: DateTime<Utc>) -> Result<()> {
        let secret = self
            .secrets
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownId(id.to_string()))?;
        secret.deprecated_at = Some(at);
        Ok(())
    }

    /// Number of stored secrets
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl SecretStore for MemoryStore {
    fn ids(&self) -> Result<Vec<SecretId>> {
        Ok(self.secrets.keys().cloned().collect())
    }

    fn metadata(&self) -> Result<BTreeMap<SecretId, SecretMeta>> {
        Ok(self
            .secrets
            .iter()
            .map(|(id, secret)| (id.clone(), secret.meta()))
            .collect())
    }

    fn read_values(&self, ids: &[SecretId]) -> Result<BTreeMap<SecretId, SecretValue>> {
        Ok(ids
            .iter()
            .filter_map(|id| {
                self.secrets
                    .get(id)
                    .map(|secret| (id.clone(), secret.value.clone()))
            })
            .collect())
    }

    fn sharing_grants_enabled(&self) -> bool {
        self.sharing_grants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::ScopeParts;

    fn parts(key: &str) -> SecretIdParts {
        ScopeParts::new("pod1", "acme", "production").with_key(key)
    }

    #[test]
    fn test_insert_and_list() {
        let mut store = MemoryStore::new();
        let id = store.insert(&parts("db_password"), "hunter2").unwrap();

        assert_eq!(id, "production/acme/pod1/db_password");
        assert_eq!(store.ids().unwrap(), vec![id]);
    }

    #[test]
    fn test_insert_rejects_invalid_parts() {
        let mut store = MemoryStore::new();
        let bad_key = ScopeParts::global().with_key("db password");
        assert!(store.insert(&bad_key, "x").is_err());

        let bad_scope = ScopeParts::new("Pod1", "acme", "production").with_key("db_password");
        assert!(store.insert(&bad_scope, "x").is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_deprecate_sets_metadata() {
        let mut store = MemoryStore::new();
        let id = store.insert(&parts("db_password"), "hunter2").unwrap();

        store.deprecate(&id, Utc::now()).unwrap();
        let metadata = store.metadata().unwrap();
        assert!(metadata[&id].deprecated_at.is_some());
    }

    #[test]
    fn test_deprecate_unknown_id() {
        let mut store = MemoryStore::new();
        assert!(store.deprecate("production/acme/pod1/missing", Utc::now()).is_err());
    }

    #[test]
    fn test_read_values_omits_unknown_ids() {
        let mut store = MemoryStore::new();
        let id = store.insert(&parts("db_password"), "hunter2").unwrap();

        let values = store
            .read_values(&[id.clone(), "production/acme/pod1/missing".to_string()])
            .unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values[&id], "hunter2");
    }
}
