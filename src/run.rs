//! The end-to-end pipeline: read config, discover, validate, write tokens.

use crate::discover::{discover_registries, ensure_all_resolved};
use crate::error::Result;
use crate::include::{ensure_includes, IncludeDirective};
use crate::npm::{Location, PackageManager};
use crate::setup::{setup_registry_auth, ApplyReport, EnvSource};

/// Options for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Requested includes. Empty means `default=NODE_AUTH_TOKEN`.
    pub includes: Vec<IncludeDirective>,
    /// Location to read configuration from. `None` uses npm's default.
    pub location: Option<Location>,
    /// Narrate `config set` instead of running it.
    pub dry_run: bool,
    /// Narrate options and discovery results at `info` instead of `debug`.
    pub verbose: bool,
}

/// Emits progress lines at a level chosen by the verbose option.
#[derive(Debug, Clone, Copy)]
struct Narrator {
    verbose: bool,
}

impl Narrator {
    fn say(&self, message: &str) {
        if self.verbose {
            tracing::info!("{}", message);
        } else {
            tracing::debug!("{}", message);
        }
    }
}

/// Run the whole pipeline against `npm` with tokens taken from `env`.
///
/// There is always at least one include and each must resolve to a task, so
/// a successful run never has an empty task list.
pub async fn run<P, E>(opts: RunOptions, npm: &P, env: &E) -> Result<ApplyReport>
where
    P: PackageManager + ?Sized,
    E: EnvSource + ?Sized,
{
    let narrator = Narrator {
        verbose: opts.verbose,
    };
    let includes = ensure_includes(opts.includes);

    narrator.say("Running with options:");
    narrator.say(&format!(
        "  dryRun: {}",
        if opts.dry_run { "enabled" } else { "disabled" }
    ));
    narrator.say(&format!(
        "  verbose: {}",
        if opts.verbose { "enabled" } else { "disabled" }
    ));
    narrator.say(&format!(
        "  location: {}",
        opts.location
            .map(|l| l.to_string())
            .unwrap_or_else(|| "none given. Using npm default.".to_string())
    ));
    narrator.say("  includes:");
    for include in &includes {
        narrator.say(&format!("    {} -> {}", include.scope, include.env_var));
    }

    let snapshot = npm.list_config(opts.location).await?;
    let tasks = discover_registries(&includes, &snapshot, npm).await?;

    narrator.say("Discovered registries:");
    for task in &tasks {
        narrator.say(&format!("  {}", task));
    }

    ensure_all_resolved(&includes, &tasks)?;

    setup_registry_auth(&tasks, npm, env, opts.dry_run).await
}
