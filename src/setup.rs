//! Writing auth tokens for resolved registries.

use crate::auth::{auth_key, Token};
use crate::discover::ResolvedTask;
use crate::error::Result;
use crate::include::IncludeScope;
use crate::npm::{Location, PackageManager};
use std::collections::HashMap;

/// Auth tokens are always written to the user config, whatever location
/// the configuration was read from.
pub const AUTH_LOCATION: Location = Location::User;

/// Source of environment variables.
pub trait EnvSource {
    /// The variable's value, or `None` when unset or empty.
    fn var(&self, name: &str) -> Option<String>;
}

/// The environment of the current process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// What happened to each resolved registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Scopes whose token was written (or would have been, in dry-run mode).
    pub configured: Vec<IncludeScope>,
    /// Scopes skipped because their variable was missing, with the variable name.
    pub skipped: Vec<(IncludeScope, String)>,
}

impl ApplyReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Write the token for each task, one at a time, in task order.
///
/// A missing variable is logged and that registry is skipped. Errors from
/// npm abort the remaining tasks.
pub async fn setup_registry_auth<P, E>(
    tasks: &[ResolvedTask],
    npm: &P,
    env: &E,
    dry_run: bool,
) -> Result<ApplyReport>
where
    P: PackageManager + ?Sized,
    E: EnvSource + ?Sized,
{
    let mut report = ApplyReport::default();

    for task in tasks {
        let Some(token) = env.var(&task.env_var).map(Token::new) else {
            tracing::warn!(
                scope = %task.scope,
                "Environment variable {} does not exist.",
                task.env_var
            );
            report.skipped.push((task.scope.clone(), task.env_var.clone()));
            continue;
        };

        let key = auth_key(&task.registry_url)?;
        npm.set_config(Some(AUTH_LOCATION), &key, &token, dry_run)
            .await?;
        report.configured.push(task.scope.clone());
    }

    Ok(report)
}
