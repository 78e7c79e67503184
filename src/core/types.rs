//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A stable, URL-safe identifier for an environment, project, or deploy
/// group. The reserved value `global` matches any scope.
pub type Permalink = String;

/// A logical secret key name (e.g., db_password).
pub type SecretKey = String;

/// A plaintext secret value as handed back by a store backend.
pub type SecretValue = String;

/// A composite secret identifier produced by a store
/// (environment/project/deploy_group/key).
pub type SecretId = String;

/// An environment variable name a secret is injected under (e.g., DATABASE_URL).
pub type EnvName = String;
