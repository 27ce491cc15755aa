//! Resolving include directives to registry URLs.

use crate::config::ConfigSnapshot;
use crate::error::{Error, Result};
use crate::include::{IncludeDirective, IncludeScope};
use crate::npm::PackageManager;
use crate::registry::PUBLISH_REGISTRY_FIELD;
use std::collections::HashSet;
use std::fmt;

/// A registry to configure, with the variable holding its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTask {
    pub scope: IncludeScope,
    pub registry_url: String,
    pub env_var: String,
}

impl fmt::Display for ResolvedTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} -> {}", self.scope, self.registry_url, self.env_var)
    }
}

fn find<'a>(
    includes: &'a [IncludeDirective],
    scope: &IncludeScope,
) -> Option<&'a IncludeDirective> {
    includes.iter().find(|inc| &inc.scope == scope)
}

/// Match include directives against the config snapshot.
///
/// Tasks come out as: default, publish, then scoped registries in snapshot
/// order. npm is only consulted when a `publish` include is present.
/// Directives that match nothing produce no task; see [`ensure_all_resolved`].
pub async fn discover_registries<P>(
    includes: &[IncludeDirective],
    snapshot: &ConfigSnapshot,
    npm: &P,
) -> Result<Vec<ResolvedTask>>
where
    P: PackageManager + ?Sized,
{
    let mut tasks = Vec::new();

    if let Some(include) = find(includes, &IncludeScope::Default) {
        if let Some(registry) = snapshot.default_registry() {
            tasks.push(ResolvedTask {
                scope: IncludeScope::Default,
                registry_url: registry.to_string(),
                env_var: include.env_var.clone(),
            });
        }
    }

    if let Some(include) = find(includes, &IncludeScope::Publish) {
        if let Some(registry) = npm.get_manifest_field(PUBLISH_REGISTRY_FIELD).await? {
            tasks.push(ResolvedTask {
                scope: IncludeScope::Publish,
                registry_url: registry,
                env_var: include.env_var.clone(),
            });
        }
    }

    for (scope, registry) in snapshot.scoped_registries() {
        let scope = IncludeScope::Named(scope.to_string());
        if let Some(include) = find(includes, &scope) {
            tasks.push(ResolvedTask {
                scope,
                registry_url: registry.to_string(),
                env_var: include.env_var.clone(),
            });
        }
    }

    Ok(tasks)
}

/// Fail on the first include (in request order) that resolved to no task.
pub fn ensure_all_resolved(includes: &[IncludeDirective], tasks: &[ResolvedTask]) -> Result<()> {
    let resolved: HashSet<&IncludeScope> = tasks.iter().map(|t| &t.scope).collect();

    match includes.iter().find(|inc| !resolved.contains(&inc.scope)) {
        Some(missing) => Err(Error::UnresolvedInclude {
            scope: missing.scope.to_string(),
            hint: missing.scope.unresolved_hint(),
        }),
        None => Ok(()),
    }
}
