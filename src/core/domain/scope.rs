//! Scope types.
//!
//! A secret is stored under a three-axis scope (deploy group, project,
//! environment) plus its key. Each axis holds either a concrete permalink
//! or the reserved `global` value.

use crate::core::constants::GLOBAL_SCOPE;
use crate::core::types::{Permalink, SecretKey};

/// The scope half of a secret id, without the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeParts {
    deploy_group: Permalink,
    project: Permalink,
    environment: Permalink,
}

impl ScopeParts {
    /// Create scope parts from the three axis permalinks.
    pub fn new(
        deploy_group: impl Into<Permalink>,
        project: impl Into<Permalink>,
        environment: impl Into<Permalink>,
    ) -> Self {
        Self {
            deploy_group: deploy_group.into(),
            project: project.into(),
            environment: environment.into(),
        }
    }

    /// The fully-global scope.
    pub fn global() -> Self {
        Self::new(GLOBAL_SCOPE, GLOBAL_SCOPE, GLOBAL_SCOPE)
    }

    /// Deploy group permalink or `global`
    pub fn deploy_group(&self) -> &str {
        &self.deploy_group
    }

    /// Project permalink or `global`
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Environment permalink or `global`
    pub fn environment(&self) -> &str {
        &self.environment
    }

    /// Rank of this scope combination, higher meaning more specific.
    ///
    /// One bit per concrete (non-global) axis: deploy group outweighs
    /// project, which outweighs environment. A deploy-group-scoped value
    /// therefore always outranks a project-scoped one, and so on down to
    /// the fully-global default at rank 0.
    pub fn specificity(&self) -> u8 {
        let mut rank = 0;
        if self.deploy_group != GLOBAL_SCOPE {
            rank |= 0b100;
        }
        if self.project != GLOBAL_SCOPE {
            rank |= 0b010;
        }
        if self.environment != GLOBAL_SCOPE {
            rank |= 0b001;
        }
        rank
    }

    /// Merge a key into this scope to form full id parts.
    pub fn with_key(&self, key: impl Into<SecretKey>) -> SecretIdParts {
        SecretIdParts {
            scope: self.clone(),
            key: key.into(),
        }
    }
}

/// All four parts of a secret id: scope plus key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretIdParts {
    scope: ScopeParts,
    key: SecretKey,
}

impl SecretIdParts {
    /// Create id parts from a scope and a key.
    pub fn new(scope: ScopeParts, key: impl Into<SecretKey>) -> Self {
        Self {
            scope,
            key: key.into(),
        }
    }

    /// Scope half of the id
    pub fn scope(&self) -> &ScopeParts {
        &self.scope
    }

    /// Deploy group permalink or `global`
    pub fn deploy_group(&self) -> &str {
        self.scope.deploy_group()
    }

    /// Project permalink or `global`
    pub fn project(&self) -> &str {
        self.scope.project()
    }

    /// Environment permalink or `global`
    pub fn environment(&self) -> &str {
        self.scope.environment()
    }

    /// Secret key name
    pub fn key(&self) -> &str {
        &self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specificity_ranks_deploy_group_highest() {
        let dg_only = ScopeParts::new("pod1", GLOBAL_SCOPE, GLOBAL_SCOPE);
        let project_and_env = ScopeParts::new(GLOBAL_SCOPE, "acme", "production");

        // a single concrete deploy group beats project plus environment
        assert!(dg_only.specificity() > project_and_env.specificity());
    }

    #[test]
    fn test_specificity_full_range() {
        assert_eq!(ScopeParts::global().specificity(), 0);
        assert_eq!(ScopeParts::new("pod1", "acme", "production").specificity(), 7);
        assert_eq!(
            ScopeParts::new(GLOBAL_SCOPE, "acme", GLOBAL_SCOPE).specificity(),
            2
        );
        assert_eq!(
            ScopeParts::new(GLOBAL_SCOPE, GLOBAL_SCOPE, "production").specificity(),
            1
        );
    }

    #[test]
    fn test_with_key() {
        let parts = ScopeParts::new("pod1", "acme", "production").with_key("db_password");

        assert_eq!(parts.deploy_group(), "pod1");
        assert_eq!(parts.project(), "acme");
        assert_eq!(parts.environment(), "production");
        assert_eq!(parts.key(), "db_password");
    }
}
