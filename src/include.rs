//! Parsing of `--include <scope>[=<ENV_VAR>]` directives.
//!
//! An include directive names a registry to configure and the environment
//! variable holding its token:
//!
//! - `default` - the registry from the `registry` config key
//! - `publish` - the registry from `publishConfig.registry` in package.json
//! - `@scope`  - the registry from the `@scope:registry` config key
//!
//! The environment variable defaults to [`DEFAULT_ENV_VAR`].

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Environment variable read when an include does not name one.
pub const DEFAULT_ENV_VAR: &str = "NODE_AUTH_TOKEN";

/// The registry an include directive refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IncludeScope {
    /// The default registry (`registry` config key).
    Default,
    /// The package's publish registry (`publishConfig.registry`).
    Publish,
    /// A scoped registry, stored with its leading `@`.
    Named(String),
}

impl IncludeScope {
    /// Validate a raw scope string.
    pub fn parse(scope: &str) -> Result<Self> {
        match scope {
            "default" => Ok(IncludeScope::Default),
            "publish" => Ok(IncludeScope::Publish),
            s if s.starts_with('@') => Ok(IncludeScope::Named(s.to_string())),
            s => Err(Error::InvalidIncludeTarget {
                scope: s.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            IncludeScope::Default => "default",
            IncludeScope::Publish => "publish",
            IncludeScope::Named(name) => name,
        }
    }

    /// Hint shown when no registry could be found for this scope.
    pub fn unresolved_hint(&self) -> &'static str {
        match self {
            IncludeScope::Default => "Is a default registry configured?",
            IncludeScope::Publish => "Is publishConfig.registry set in package.json?",
            IncludeScope::Named(_) => {
                "Is this scope configured via @scope:registry somewhere in npm config?"
            }
        }
    }
}

impl fmt::Display for IncludeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request to configure auth for one scope from one environment variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeDirective {
    pub scope: IncludeScope,
    pub env_var: String,
}

impl IncludeDirective {
    pub fn new(scope: IncludeScope, env_var: impl Into<String>) -> Self {
        IncludeDirective {
            scope,
            env_var: env_var.into(),
        }
    }

    /// `default=NODE_AUTH_TOKEN`, used when no includes are given.
    pub fn default_registry() -> Self {
        IncludeDirective::new(IncludeScope::Default, DEFAULT_ENV_VAR)
    }
}

impl FromStr for IncludeDirective {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let value = unquote(raw.trim());
        if value.is_empty() {
            return Err(Error::InvalidIncludeValue {
                value: raw.to_string(),
            });
        }

        let (scope, env_var) = match value.find('=') {
            Some(eq) => (&value[..eq], &value[eq + 1..]),
            None => (value, ""),
        };
        let scope = unquote(scope).trim();
        let env_var = unquote(env_var).trim();

        if scope.is_empty() {
            return Err(Error::InvalidIncludeValue {
                value: raw.to_string(),
            });
        }

        let env_var = if env_var.is_empty() {
            DEFAULT_ENV_VAR
        } else {
            env_var
        };

        Ok(IncludeDirective::new(IncludeScope::parse(scope)?, env_var))
    }
}

impl fmt::Display for IncludeDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.scope, self.env_var)
    }
}

/// Remove one pair of surrounding single or double quotes.
///
/// Either quote character may open or close the pair, so `'x"` is unquoted
/// as well.
///
/// # Examples
///
/// ```
/// use setup_npm_auth::unquote;
///
/// assert_eq!(unquote("\"@my-scope\""), "@my-scope");
/// assert_eq!(unquote("'user'"), "user");
/// assert_eq!(unquote("plain"), "plain");
/// ```
pub fn unquote(value: &str) -> &str {
    let is_quote = |c: char| c == '"' || c == '\'';
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first), Some(last)) if is_quote(first) && is_quote(last) => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

/// Parse one raw include value and append it to the directives seen so far.
///
/// The input sequence is left untouched; a new sequence is returned.
pub fn parse_include(
    raw: &str,
    accumulated: &[IncludeDirective],
) -> Result<Vec<IncludeDirective>> {
    let directive = raw.parse::<IncludeDirective>()?;
    let mut result = accumulated.to_vec();
    result.push(directive);
    Ok(result)
}

/// Substitute `default=NODE_AUTH_TOKEN` when no includes were requested.
pub fn ensure_includes(includes: Vec<IncludeDirective>) -> Vec<IncludeDirective> {
    if includes.is_empty() {
        vec![IncludeDirective::default_registry()]
    } else {
        includes
    }
}
