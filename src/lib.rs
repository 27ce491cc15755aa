//! Configure npm registry auth tokens from declarative include directives.
//!
//! Built for CI jobs that need to inject secret tokens for the default
//! registry, a package's publish registry, and scoped registries without
//! hand-writing registry URLs or editing `.npmrc` files.
//!
//! # Quick Start
//!
//! ```no_run
//! use setup_npm_auth::{run, CommandRunner, Npm, ProcessEnv, RunOptions};
//!
//! # async fn example() -> setup_npm_auth::Result<()> {
//! let npm = Npm::new(CommandRunner::locate_npm()?);
//! let opts = RunOptions {
//!     includes: vec!["default".parse()?, "@myorg=MYORG_TOKEN".parse()?],
//!     ..Default::default()
//! };
//! run(opts, &npm, &ProcessEnv).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! 1. **Parse** each `<scope>[=<ENV_VAR>]` include (`default`, `publish` or `@scope`)
//! 2. **Read** the effective config with `npm config list --json`
//! 3. **Discover** a registry URL for every include
//! 4. **Validate** that every include found a registry
//! 5. **Apply** each token with `npm config set --location user`
//!
//! npm is the only source of truth: configuration files are never read or
//! written directly.
//!
//! # Auth keys
//!
//! Tokens are stored under npm's "nerf-darted" registry key:
//!
//! ```ini
//! //registry.npmjs.org/:_authToken = your-token
//! ```

pub mod action;
mod auth;
pub mod cli;
mod config;
mod discover;
mod error;
mod exec;
mod include;
mod npm;
pub mod registry;
mod run;
mod setup;

// Re-export main types
pub use auth::{auth_key, Token, AUTH_TOKEN_SUFFIX};
pub use config::ConfigSnapshot;
pub use discover::{discover_registries, ensure_all_resolved, ResolvedTask};
pub use error::{Error, Result};
pub use exec::CommandRunner;
pub use include::{
    ensure_includes, parse_include, unquote, IncludeDirective, IncludeScope, DEFAULT_ENV_VAR,
};
pub use npm::{
    decode_manifest_field, get_manifest_field_command, list_config_command, set_config_command,
    Location, Npm, NpmCommand, PackageManager,
};
pub use run::{run, RunOptions};
pub use setup::{setup_registry_auth, ApplyReport, EnvSource, ProcessEnv, AUTH_LOCATION};
