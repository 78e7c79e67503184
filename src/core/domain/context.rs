//! Deploy context types.
//!
//! A deploy context is the static input a resolver is built for: the
//! project being deployed and the deploy groups it targets.

use crate::core::types::Permalink;

/// A named deployment target belonging to exactly one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployGroup {
    permalink: Permalink,
    environment: Permalink,
}

impl DeployGroup {
    /// Create a deploy group with its owning environment.
    pub fn new(permalink: impl Into<Permalink>, environment: impl Into<Permalink>) -> Self {
        Self {
            permalink: permalink.into(),
            environment: environment.into(),
        }
    }

    /// Deploy group permalink
    pub fn permalink(&self) -> &str {
        &self.permalink
    }

    /// Permalink of the environment this group belongs to
    pub fn environment(&self) -> &str {
        &self.environment
    }
}

impl std::fmt::Display for DeployGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.environment, self.permalink)
    }
}

/// The (project, deploy groups) pair one resolver instance serves.
#[derive(Debug, Clone, Default)]
pub struct DeployContext {
    project: Option<Permalink>,
    deploy_groups: Vec<DeployGroup>,
}

impl DeployContext {
    /// Create a deploy context. `project` may be absent for deploys that
    /// run outside any project namespace.
    pub fn new(project: Option<Permalink>, deploy_groups: Vec<DeployGroup>) -> Self {
        Self {
            project,
            deploy_groups,
        }
    }

    /// Project permalink, if the deploy belongs to a project
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Deploy groups targeted by this deploy
    pub fn deploy_groups(&self) -> &[DeployGroup] {
        &self.deploy_groups
    }

    /// Distinct environments the deploy groups belong to, first-seen
    /// order preserved.
    pub fn environments(&self) -> Vec<Permalink> {
        let mut environments: Vec<Permalink> = Vec::new();
        for group in &self.deploy_groups {
            if !environments.iter().any(|e| e == group.environment()) {
                environments.push(group.environment().to_string());
            }
        }
        environments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environments_deduplicates_preserving_order() {
        let context = DeployContext::new(
            Some("acme".to_string()),
            vec![
                DeployGroup::new("pod1", "production"),
                DeployGroup::new("pod2", "production"),
                DeployGroup::new("pod100", "staging"),
            ],
        );

        assert_eq!(context.environments(), vec!["production", "staging"]);
    }

    #[test]
    fn test_empty_context() {
        let context = DeployContext::default();
        assert!(context.project().is_none());
        assert!(context.deploy_groups().is_empty());
        assert!(context.environments().is_empty());
    }

    #[test]
    fn test_deploy_group_display() {
        let group = DeployGroup::new("pod100", "production");
        assert_eq!(format!("{}", group), "production/pod100");
    }
}
