//! File-backed secret store.
//!
//! Handles reading, writing, and validating `warren.toml` vault
//! snapshots. A vault file carries the stored secrets, the sharing-grant
//! flag, and the per-project grant lists, so one file can back both the
//! store and the grant registry in development and fixtures.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{SecretMeta, SecretStore, StoredSecret};
use crate::core::domain::SecretIdParts;
use crate::core::grants::GrantRegistry;
use crate::core::types::{Permalink, SecretId, SecretKey, SecretValue};
use crate::core::validation;
use crate::error::{Result, StoreError};

/// A vault snapshot stored in `warren.toml`
#[derive(Debug, Serialize, Deserialize)]
pub struct VaultFile {
    #[serde(skip)]
    path: PathBuf,
    /// Snapshot format version
    pub version: String,
    /// Whether globally-scoped keys require a sharing grant
    #[serde(default)]
    pub sharing_grants: bool,
    /// Map of secret ids to their stored records
    #[serde(default)]
    pub secrets: BTreeMap<SecretId, StoredSecret>,
    /// Map of project permalinks to the globally-scoped keys they are
    /// granted
    #[serde(default)]
    pub grants: BTreeMap<Permalink, BTreeSet<SecretKey>>,
}

impl VaultFile {
    /// Create a new empty vault backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            sharing_grants: false,
            secrets: BTreeMap::new(),
            grants: BTreeMap::new(),
        }
    }

    /// Default vault path (`warren.toml` in the current directory)
    pub fn default_path() -> PathBuf {
        PathBuf::from(crate::core::constants::VAULT_FILE)
    }

    /// Load a vault snapshot from `path`
    ///
    /// # Errors
    ///
    /// Returns `StoreError::VaultNotFound` if the file doesn't exist,
    /// or `StoreError::Parse` if the TOML is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading vault");

        if !path.exists() {
            return Err(StoreError::VaultNotFound(path.display().to_string()).into());
        }
        let contents = std::fs::read_to_string(path).map_err(StoreError::ReadFile)?;
        let mut vault: Self = toml::from_str(&contents).map_err(StoreError::Parse)?;
        vault.path = path.to_path_buf();

        debug!(
            secrets = vault.secrets.len(),
            grants = vault.grants.len(),
            "vault loaded"
        );

        vault.validate()?;

        Ok(vault)
    }

    /// Save the vault snapshot to its backing path
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self) -> Result<()> {
        debug!(path = %self.path.display(), "saving vault");

        let contents = toml::to_string_pretty(self).map_err(StoreError::Serialize)?;
        std::fs::write(&self.path, contents).map_err(StoreError::WriteFile)?;

        Ok(())
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Insert a secret under the id composed from `parts`.
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

    /// Grant `project` access to the globally-scoped `key`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the project or key is invalid.
    pub fn grant(&mut self, project: impl Into<Permalink>, key: impl Into<SecretKey>) -> Result<()> {
        let project = project.into();
        let key = key.into();
        validation::validate_permalink(&project)?;
        validation::validate_key(&key)?;

        self.grants.entry(project).or_default().insert(key);
        Ok(())
    }

    /// Validate the snapshot structure and contents
    ///
    /// Checks:
    /// - Version field is present
    /// - Every secret id splits into four segments with valid permalinks
    ///   and a valid key
    /// - Grant entries name valid projects and keys
    ///
    /// # Errors
    ///
    /// Returns `StoreError` or `ValidationError` on the first failure.
    pub fn validate(&self) -> Result<()> {
        debug!("validating vault");

        if self.version.is_empty() {
            return Err(StoreError::InvalidSnapshot("missing version".to_string()).into());
        }

        for id in self.secrets.keys() {
            let parts = self.parse_id(id)?;
            validation::validate_permalink(parts.environment())?;
            validation::validate_permalink(parts.project())?;
            validation::validate_permalink(parts.deploy_group())?;
            validation::validate_key(parts.key())?;
        }

        for (project, keys) in &self.grants {
            validation::validate_permalink(project)?;
            for key in keys {
                validation::validate_key(key)?;
            }
        }

        Ok(())
    }
}

impl SecretStore for VaultFile {
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

impl GrantRegistry for VaultFile {
    fn granted_keys(&self, project: &str) -> Result<BTreeSet<SecretKey>> {
        Ok(self.grants.get(project).cloned().unwrap_or_default())
    }
}
