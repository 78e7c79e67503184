//! Secret store backends.
//!
//! Provides the store abstraction the resolver works against, with
//! implementations for different backends.
//!
//! ## Adding a New Store Backend
//!
//! 1. Implement the `SecretStore` trait
//! 2. Add the implementation in a new file (e.g., `vault.rs`, `http.rs`)
//! 3. Re-export from this module
//!
//! The provided `generate_id`/`parse_id` methods compose the canonical
//! `environment/project/deploy_group/key` form; backends with their own
//! identifier scheme may override both, as long as one stays the exact
//! inverse of the other.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::constants::ID_SEPARATOR;
use crate::core::domain::{ScopeParts, SecretIdParts};
use crate::core::types::{SecretId, SecretValue};
use crate::error::{Result, StoreError};

mod fs;
mod memory;

pub use fs::VaultFile;
pub use memory::MemoryStore;

/// Per-id metadata returned by a bulk `metadata` fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecretMeta {
    /// When the secret was marked deprecated, if ever.
    pub deprecated_at: Option<DateTime<Utc>>,
}

/// A stored secret record shared by the shipped backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSecret {
    /// The secret value.
    pub value: SecretValue,
    /// When the secret was marked deprecated. Deprecated secrets are kept
    /// for audit but excluded from resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecated_at: Option<DateTime<Utc>>,
}

impl StoredSecret {
    /// Create a live (non-deprecated) record.
    pub fn new(value: impl Into<SecretValue>) -> Self {
        Self {
            value: value.into(),
            deprecated_at: None,
        }
    }

    /// Metadata view of this record.
    pub fn meta(&self) -> SecretMeta {
        SecretMeta {
            deprecated_at: self.deprecated_at,
        }
    }
}

/// Secret store trait.
///
/// Abstracts id composition and secret listing/retrieval so the resolver
/// can run against any backend. All read methods are bulk operations; the
/// resolver snapshots metadata once per instance rather than querying per
/// candidate.
pub trait SecretStore {
    /// Compose a secret id from its parts.
    ///
    /// Deterministic and injective for validated parts.
    fn generate_id(&self, parts: &SecretIdParts) -> SecretId {
        format!(
            "{env}{sep}{project}{sep}{group}{sep}{key}",
            env = parts.environment(),
            project = parts.project(),
            group = parts.deploy_group(),
            key = parts.key(),
            sep = ID_SEPARATOR,
        )
    }

    /// Split a secret id back into its parts. Exact inverse of
    /// [`generate_id`](Self::generate_id) for ids it produced.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::MalformedId` if the id does not have four
    /// segments.
    fn parse_id(&self, id: &str) -> Result<SecretIdParts> {
        let mut segments = id.splitn(4, ID_SEPARATOR);
        match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(environment), Some(project), Some(deploy_group), Some(key))
                if !key.is_empty() =>
            {
                Ok(ScopeParts::new(deploy_group, project, environment).with_key(key))
            }
            _ => Err(StoreError::MalformedId(id.to_string()).into()),
        }
    }

    /// All ids currently stored, in stable iteration order.
    fn ids(&self) -> Result<Vec<SecretId>>;

    /// Bulk metadata for every stored id.
    fn metadata(&self) -> Result<BTreeMap<SecretId, SecretMeta>>;

    /// Values for the requested ids. Unknown ids are omitted from the
    /// result rather than reported as errors.
    fn read_values(&self, ids: &[SecretId]) -> Result<BTreeMap<SecretId, SecretValue>>;

    /// Whether cross-project sharing grants are enforced for globally
    /// scoped keys.
    fn sharing_grants_enabled(&self) -> bool;
}
