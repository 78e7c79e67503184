//! Warren - hierarchically-scoped secret resolution for deploy pipelines.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── error          # Error categories and crate Result
//! └── core/          # Core library components
//!     ├── constants  # Reserved scope value, wildcard marker, separators
//!     ├── types      # Semantic type aliases
//!     ├── domain/    # Deploy context, scope parts, key patterns
//!     ├── validation # Permalink and key validation
//!     ├── store/     # Secret store backends
//!     │   ├── mod    # SecretStore trait and id composition
//!     │   ├── memory # In-memory store
//!     │   └── fs     # warren.toml vault snapshots
//!     ├── grants     # Sharing-grant registry
//!     └── resolver   # KeyResolver (expand / read / verify)
//! ```
//!
//! # Features
//!
//! - Most-specific-wins resolution across environment, project, and
//!   deploy-group scopes
//! - Wildcard expansion of `KEY_*` requests into every matching stored key
//! - Deprecation and cross-project sharing-grant filtering
//! - Batched failure reporting: resolve every key first, fail once
//!
//! # Example
//!
//! ```
//! use warren::{DeployContext, DeployGroup, KeyResolver, MemoryGrants, MemoryStore, ScopeParts};
//!
//! # fn main() -> warren::Result<()> {
//! let mut store = MemoryStore::new();
//! store.insert(&ScopeParts::global().with_key("db_password"), "hunter2")?;
//! store.insert(
//!     &ScopeParts::new("pod100", "acme", "production").with_key("db_password"),
//!     "s3cret",
//! )?;
//!
//! let grants = MemoryGrants::new();
//! let context = DeployContext::new(
//!     Some("acme".to_string()),
//!     vec![DeployGroup::new("pod100", "production")],
//! );
//!
//! let mut resolver = KeyResolver::new(&store, &grants, context);
//! let resolved = resolver.expand("DATABASE_PASSWORD", "db_password")?;
//! assert_eq!(resolved[0].id, "production/acme/pod100/db_password");
//! resolver.verify()?;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;

pub use crate::core::domain::{DeployContext, DeployGroup, KeyPattern, ScopeParts, SecretIdParts};
pub use crate::core::grants::{GrantRegistry, MemoryGrants};
pub use crate::core::resolver::{KeyResolver, ResolvedKey};
pub use crate::core::store::{MemoryStore, SecretMeta, SecretStore, StoredSecret, VaultFile};
pub use crate::error::{Error, Result};
