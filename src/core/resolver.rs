//! Secret key resolution.
//!
//! Resolves logical env-var/key pairs against a secret store by picking
//! the most specific stored variant for the deploy context, expanding
//! wildcard requests, and filtering out deprecated and ungranted ids.
//! Resolution failures are accumulated instead of raised so a caller can
//! check every key first and report all failures in one pass.

use std::collections::BTreeSet;

use tracing::{debug, trace};

use crate::core::constants::{GLOBAL_SCOPE, READ_PLACEHOLDER, WILDCARD};
use crate::core::domain::{DeployContext, KeyPattern, ScopeParts, SecretIdParts};
use crate::core::grants::GrantRegistry;
use crate::core::store::SecretStore;
use crate::core::types::{EnvName, SecretId, SecretKey, SecretValue};
use crate::error::{ResolveError, Result};

/// A resolved env-var/secret-id pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    /// Env name the secret should be injected under
    pub env_name: EnvName,
    /// Id of the stored secret that won resolution
    pub id: SecretId,
}

/// Per-deploy-context secret key resolver.
///
/// Built once for a (project, deploy groups) pair and used for the full
/// set of key lookups that deploy requires, then discarded. The candidate
/// scope list, the deprecated-id set, and the granted-key set are each
/// computed once per instance on first use.
///
/// Resolution failures never raise from [`expand`](Self::expand); they
/// accumulate until [`verify`](Self::verify) reports them all at once.
/// Store failures propagate immediately.
pub struct KeyResolver<'a> {
    store: &'a dyn SecretStore,
    grants: &'a dyn GrantRegistry,
    context: DeployContext,
    errors: Vec<String>,
    candidates: Option<Vec<ScopeParts>>,
    deprecated: Option<BTreeSet<SecretId>>,
    shared_keys: Option<BTreeSet<SecretKey>>,
}

impl<'a> KeyResolver<'a> {
    /// Create a resolver for one deploy context.
    pub fn new(
        store: &'a dyn SecretStore,
        grants: &'a dyn GrantRegistry,
        context: DeployContext,
    ) -> Self {
        Self {
            store,
            grants,
            context,
            errors: Vec::new(),
            candidates: None,
            deprecated: None,
            shared_keys: None,
        }
    }

    /// Expand a key by finding the most specific stored value for it.
    ///
    /// `bar` resolves to e.g. `production/my_project/pod100/bar`. A
    /// trailing wildcard on both the env name and the key expands to
    /// every matching stored key, most specific variant first.
    ///
    /// Returns an empty list and records a diagnostic when nothing
    /// resolves; the result is never partially failed.
    ///
    /// # Errors
    ///
    /// Only store-layer failures error. "Not found" is not an error here.
    pub fn expand(&mut self, env_name: &str, secret_key: &str) -> Result<Vec<ResolvedKey>> {
        let env = KeyPattern::parse(env_name);
        let key = KeyPattern::parse(secret_key);

        if env.is_wildcard() != key.is_wildcard() {
            self.errors.push(format!(
                "{env_name} and {secret_key} need to both end with {WILDCARD} or not include them"
            ));
            return Ok(Vec::new());
        }

        let possible_ids = self.possible_ids(secret_key)?;

        let found = if key.is_wildcard() {
            self.expand_wildcard_key(&env, &key, &possible_ids)?
        } else {
            self.expand_simple_key(env_name, &possible_ids)?
        };

        if found.is_empty() {
            self.errors
                .push(format!("{} (tried: {})", secret_key, possible_ids.join(", ")));
            return Ok(Vec::new());
        }

        debug!(key = secret_key, matches = found.len(), "resolved secret key");
        Ok(found)
    }

    /// Read the value of the most specific stored variant of `key`.
    ///
    /// Best-effort lookup for optional keys: returns `None` when the key
    /// or its value is absent. A resolution failure still lands in the
    /// error log for a later [`verify`](Self::verify).
    ///
    /// # Errors
    ///
    /// Only store-layer failures error.
    pub fn read(&mut self, key: &str) -> Result<Option<SecretValue>> {
        let Some(found) = self.expand(READ_PLACEHOLDER, key)?.into_iter().next() else {
            return Ok(None);
        };
        let mut values = self.store.read_values(std::slice::from_ref(&found.id))?;
        Ok(values.remove(&found.id))
    }

    /// Fail with every accumulated resolution failure at once.
    ///
    /// Errors on every call while the log is non-empty, so a resolver
    /// with failures cannot be verified into silence.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::UnresolvedKeys` listing each failure on its
    /// own line.
    pub fn verify(&self) -> Result<()> {
        if self.errors.is_empty() {
            return Ok(());
        }
        Err(ResolveError::UnresolvedKeys(self.errors.join("\n\t")).into())
    }

    /// Diagnostics accumulated so far, in call order
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Candidate ids for `secret_key`, most specific first, with
    /// ungranted and deprecated ids already filtered out.
    fn possible_ids(&mut self, secret_key: &str) -> Result<Vec<SecretId>> {
        let scopes = self.candidate_scopes().to_vec();
        let mut ids = Vec::with_capacity(scopes.len());
        for scope in &scopes {
            let parts = scope.with_key(secret_key);
            let id = self.store.generate_id(&parts);
            if self.key_granted(&parts)? && !self.is_deprecated(&id)? {
                ids.push(id);
            }
        }

        trace!(key = secret_key, candidates = ids.len(), "built candidate ids");
        Ok(ids)
    }

    /// First candidate id that actually exists in the store.
    fn expand_simple_key(
        &self,
        env_name: &str,
        possible_ids: &[SecretId],
    ) -> Result<Vec<ResolvedKey>> {
        let stored: BTreeSet<SecretId> = self.store.ids()?.into_iter().collect();

        Ok(possible_ids
            .iter()
            .find(|id| stored.contains(*id))
            .map(|id| {
                vec![ResolvedKey {
                    env_name: env_name.to_string(),
                    id: id.clone(),
                }]
            })
            .unwrap_or_default())
    }

    /// Every stored id matching a candidate prefix, deduplicated so the
    /// most specific variant of each distinct key wins.
    ///
    /// Env `FOO_*` with key `d_*` matching id `a/b/c/d_bar` yields
    /// `(FOO_BAR, a/b/c/d_bar)`.
    fn expand_wildcard_key(
        &self,
        env: &KeyPattern,
        key: &KeyPattern,
        possible_ids: &[SecretId],
    ) -> Result<Vec<ResolvedKey>> {
        let stored = self.store.ids()?;

        // candidate order carries priority, store order breaks ties
        let mut matched: Vec<&SecretId> = Vec::new();
        for id in possible_ids {
            let prefix = id.strip_suffix(WILDCARD).unwrap_or(id);
            matched.extend(stored.iter().filter(|s| s.starts_with(prefix)));
        }

        let mut seen: BTreeSet<SecretKey> = BTreeSet::new();
        let mut found = Vec::new();
        for id in matched {
            let stored_key = self.store.parse_id(id)?.key().to_string();
            if !seen.insert(stored_key.clone()) {
                continue;
            }
            found.push(ResolvedKey {
                env_name: env.expand_env(key.suffix_of(&stored_key)),
                id: id.clone(),
            });
        }

        Ok(found)
    }

    /// Whether the context's project may see this candidate.
    ///
    /// Always true unless the store enforces sharing grants and the
    /// candidate sits at global project scope; then the key must be in
    /// the project's granted set. A context without a project is never
    /// granted globally-scoped keys.
    fn key_granted(&mut self, parts: &SecretIdParts) -> Result<bool> {
        if !(self.store.sharing_grants_enabled() && parts.project() == GLOBAL_SCOPE) {
            return Ok(true);
        }

        let shared = match &self.shared_keys {
            Some(keys) => keys,
            None => {
                let keys = match self.context.project() {
                    Some(project) => self.grants.granted_keys(project)?,
                    None => BTreeSet::new(),
                };
                self.shared_keys.insert(keys)
            }
        };

        Ok(shared.contains(parts.key()))
    }

    /// Whether the id is marked deprecated in the store's metadata.
    fn is_deprecated(&mut self, id: &str) -> Result<bool> {
        let deprecated = match &self.deprecated {
            Some(set) => set,
            None => {
                let set = self
                    .store
                    .metadata()?
                    .into_iter()
                    .filter(|(_, meta)| meta.deprecated_at.is_some())
                    .map(|(id, _)| id)
                    .collect();
                self.deprecated.insert(set)
            }
        };

        Ok(deprecated.contains(id))
    }

    /// All scope combinations eligible for this context, most specific
    /// first.
    ///
    /// Each axis admits its concrete permalink only when the context has
    /// exactly one distinct value for it; `global` is always admitted.
    /// A deploy spanning several deploy groups or environments makes
    /// per-group or per-environment overrides ambiguous, so those axes
    /// fall back to `global` alone.
    fn candidate_scopes(&mut self) -> &[ScopeParts] {
        let context = &self.context;
        self.candidates
            .get_or_insert_with(|| Self::build_candidate_scopes(context))
    }

    fn build_candidate_scopes(context: &DeployContext) -> Vec<ScopeParts> {
        let environments = context.environments();

        let mut environment_permalinks = vec![GLOBAL_SCOPE.to_string()];
        let mut project_permalinks = vec![GLOBAL_SCOPE.to_string()];
        let mut deploy_group_permalinks = vec![GLOBAL_SCOPE.to_string()];

        if environments.len() == 1 {
            environment_permalinks.extend(environments);
        }
        if let Some(project) = context.project() {
            project_permalinks.push(project.to_string());
        }
        if context.deploy_groups().len() == 1 {
            deploy_group_permalinks.extend(
                context
                    .deploy_groups()
                    .iter()
                    .map(|group| group.permalink().to_string()),
            );
        }

        let mut scopes = Vec::with_capacity(
            deploy_group_permalinks.len()
                * project_permalinks.len()
                * environment_permalinks.len(),
        );
        for deploy_group in &deploy_group_permalinks {
            for project in &project_permalinks {
                for environment in &environment_permalinks {
                    scopes.push(ScopeParts::new(deploy_group, project, environment));
                }
            }
        }

        // priority is the rank, not the loop order above
        scopes.sort_by_key(|scope| std::cmp::Reverse(scope.specificity()));
        scopes.dedup();

        trace!(scopes = scopes.len(), "computed candidate scopes");
        scopes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::DeployGroup;
    use crate::core::grants::MemoryGrants;
    use crate::core::store::MemoryStore;

    fn context(project: Option<&str>, groups: &[(&str, &str)]) -> DeployContext {
        DeployContext::new(
            project.map(str::to_string),
            groups
                .iter()
                .map(|(permalink, environment)| DeployGroup::new(*permalink, *environment))
                .collect(),
        )
    }

    #[test]
    fn test_candidate_scopes_single_group_full_cross_product() {
        let store = MemoryStore::new();
        let grants = MemoryGrants::new();
        let mut resolver = KeyResolver::new(
            &store,
            &grants,
            context(Some("acme"), &[("pod1", "production")]),
        );

        let scopes: Vec<(String, String, String)> = resolver
            .candidate_scopes()
            .iter()
            .map(|s| {
                (
                    s.deploy_group().to_string(),
                    s.project().to_string(),
                    s.environment().to_string(),
                )
            })
            .collect();

        let expected = [
            ("pod1", "acme", "production"),
            ("pod1", "acme", "global"),
            ("pod1", "global", "production"),
            ("pod1", "global", "global"),
            ("global", "acme", "production"),
            ("global", "acme", "global"),
            ("global", "global", "production"),
            ("global", "global", "global"),
        ];
        let expected: Vec<(String, String, String)> = expected
            .iter()
            .map(|(d, p, e)| (d.to_string(), p.to_string(), e.to_string()))
            .collect();

        assert_eq!(scopes, expected);
    }

    #[test]
    fn test_candidate_scopes_ranks_strictly_decrease() {
        let store = MemoryStore::new();
        let grants = MemoryGrants::new();
        let mut resolver = KeyResolver::new(
            &store,
            &grants,
            context(Some("acme"), &[("pod1", "production")]),
        );

        let ranks: Vec<u8> = resolver
            .candidate_scopes()
            .iter()
            .map(ScopeParts::specificity)
            .collect();
        assert!(ranks.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_candidate_scopes_multi_group_drops_group_axis() {
        let store = MemoryStore::new();
        let grants = MemoryGrants::new();
        let mut resolver = KeyResolver::new(
            &store,
            &grants,
            context(Some("acme"), &[("pod1", "production"), ("pod2", "production")]),
        );

        let scopes = resolver.candidate_scopes();
        // two groups in one environment: group axis collapses to global,
        // environment stays concrete
        assert_eq!(scopes.len(), 4);
        assert!(scopes.iter().all(|s| s.deploy_group() == "global"));
        assert!(scopes.iter().any(|s| s.environment() == "production"));
    }

    #[test]
    fn test_candidate_scopes_multi_environment_drops_both_axes() {
        let store = MemoryStore::new();
        let grants = MemoryGrants::new();
        let mut resolver = KeyResolver::new(
            &store,
            &grants,
            context(Some("acme"), &[("pod1", "production"), ("pod100", "staging")]),
        );

        let scopes = resolver.candidate_scopes();
        assert_eq!(scopes.len(), 2);
        assert!(scopes
            .iter()
            .all(|s| s.deploy_group() == "global" && s.environment() == "global"));
    }

    #[test]
    fn test_candidate_scopes_no_project() {
        let store = MemoryStore::new();
        let grants = MemoryGrants::new();
        let mut resolver =
            KeyResolver::new(&store, &grants, context(None, &[("pod1", "production")]));

        let scopes = resolver.candidate_scopes();
        assert_eq!(scopes.len(), 4);
        assert!(scopes.iter().all(|s| s.project() == "global"));
    }
}
