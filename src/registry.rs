//! Scoped registry config keys.
//!
//! npm maps a package scope to a registry with a config entry of the form
//! `@scope:registry = <url>`.

use regex::Regex;
use std::sync::LazyLock;

/// Config key holding the default registry.
pub const DEFAULT_REGISTRY_KEY: &str = "registry";

/// Manifest field holding the registry a package publishes to.
pub const PUBLISH_REGISTRY_FIELD: &str = "publishConfig.registry";

/// Captures `@scope` up to the first `:registry`.
static SCOPED_REGISTRY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<scope>@[^:]*):registry").unwrap());

const REGISTRY_SUFFIX: &str = ":registry";

/// Extract the scope from a scoped registry config key.
///
/// The key must start with `@` and end with `:registry`; the scope is
/// everything before the first `:registry`. Returns `None` for other keys.
///
/// # Examples
///
/// ```
/// use setup_npm_auth::registry::scope_from_registry_key;
///
/// assert_eq!(scope_from_registry_key("@myorg:registry"), Some("@myorg"));
/// assert_eq!(scope_from_registry_key("registry"), None);
/// assert_eq!(scope_from_registry_key("@myorg:always-auth"), None);
/// ```
pub fn scope_from_registry_key(key: &str) -> Option<&str> {
    if !key.ends_with(REGISTRY_SUFFIX) {
        return None;
    }
    SCOPED_REGISTRY_KEY
        .captures(key)
        .and_then(|caps| caps.name("scope"))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_registry_key() {
        assert_eq!(scope_from_registry_key("@myorg:registry"), Some("@myorg"));
        assert_eq!(scope_from_registry_key("@a-b.c:registry"), Some("@a-b.c"));
        assert_eq!(scope_from_registry_key("registry"), None);
        assert_eq!(scope_from_registry_key("myorg:registry"), None);
        assert_eq!(
            scope_from_registry_key("//registry.npmjs.org/:_authToken"),
            None
        );
    }

    #[test]
    fn test_scope_stops_at_first_registry_suffix() {
        assert_eq!(scope_from_registry_key("@a:registry:registry"), Some("@a"));
        assert_eq!(scope_from_registry_key("@a:registry:extra"), None);
        assert_eq!(scope_from_registry_key("@:registry"), Some("@"));
    }
}
