//! The npm command surface this tool reads and writes through.
//!
//! Configuration is never parsed from or written to files directly. npm is
//! asked for its effective config as JSON and told to persist new keys.

use crate::auth::Token;
use crate::config::ConfigSnapshot;
use crate::error::{Error, Result};
use crate::exec::CommandRunner;
use crate::include::unquote;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// An npm configuration tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    Global,
    User,
    Project,
}

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Global => "global",
            Location::User => "user",
            Location::Project => "project",
        }
    }
}

impl FromStr for Location {
    type Err = Error;

    /// Parse a location, ignoring surrounding whitespace and quotes.
    fn from_str(value: &str) -> Result<Self> {
        match unquote(value.trim()).trim() {
            "global" => Ok(Location::Global),
            "user" => Ok(Location::User),
            "project" => Ok(Location::Project),
            _ => Err(Error::InvalidLocation {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations consumed from the package manager.
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// The effective configuration for `location`, or npm's default view.
    async fn list_config(&self, location: Option<Location>) -> Result<ConfigSnapshot>;

    /// A dotted-path field from the current package.json, if set.
    async fn get_manifest_field(&self, key: &str) -> Result<Option<String>>;

    /// Persist `key = value`. In dry-run mode nothing is changed.
    async fn set_config(
        &self,
        location: Option<Location>,
        key: &str,
        value: &Token,
        dry_run: bool,
    ) -> Result<()>;
}

/// Arguments for one npm invocation.
///
/// `Display` renders the command line for narration with any secret
/// argument replaced by `***`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NpmCommand {
    args: Vec<String>,
    secret: Option<usize>,
}

impl NpmCommand {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        NpmCommand {
            args: args.into_iter().map(Into::into).collect(),
            secret: None,
        }
    }

    /// Append an argument that must never be printed.
    fn secret_arg(mut self, value: &Token) -> Self {
        self.secret = Some(self.args.len());
        self.args.push(value.expose().to_string());
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for NpmCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("npm")?;
        for (i, arg) in self.args.iter().enumerate() {
            if Some(i) == self.secret {
                f.write_str(" ***")?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// `npm config list --json [--location=<loc>]`
pub fn list_config_command(location: Option<Location>) -> NpmCommand {
    let mut args = vec!["config".to_string(), "list".into(), "--json".into()];
    if let Some(location) = location {
        args.push(format!("--location={}", location));
    }
    NpmCommand::new(args)
}

/// `npm pkg get <key> --json`
pub fn get_manifest_field_command(key: &str) -> NpmCommand {
    NpmCommand::new(["pkg", "get", key, "--json"])
}

/// `npm config set [--location <loc>] <key> <value>`
pub fn set_config_command(location: Option<Location>, key: &str, value: &Token) -> NpmCommand {
    let mut args = vec!["config".to_string(), "set".into()];
    if let Some(location) = location {
        args.push("--location".into());
        args.push(location.as_str().into());
    }
    args.push(key.into());
    NpmCommand::new(args).secret_arg(value)
}

/// Shape of `npm pkg get <key> --json` output.
///
/// Newer npm wraps the value in an object keyed by the requested field,
/// older npm prints the bare value, and without JSON support the output
/// is plain text.
#[derive(Debug, Clone, PartialEq)]
enum ManifestOutput {
    Wrapped(Value),
    Bare(Value),
    Text(String),
}

impl ManifestOutput {
    fn decode(key: &str, stdout: &str) -> Self {
        match serde_json::from_str::<Value>(stdout) {
            Ok(Value::Object(mut map)) if map.contains_key(key) => {
                ManifestOutput::Wrapped(map.remove(key).unwrap_or(Value::Null))
            }
            Ok(value) => ManifestOutput::Bare(value),
            Err(_) => ManifestOutput::Text(stdout.trim().to_string()),
        }
    }

    fn into_value(self) -> Option<String> {
        match self {
            ManifestOutput::Wrapped(Value::String(s)) | ManifestOutput::Bare(Value::String(s)) => {
                Some(s).filter(|s| !s.is_empty())
            }
            ManifestOutput::Text(s) => Some(s).filter(|s| !s.is_empty()),
            // Missing fields come back as `{}` or nothing at all.
            ManifestOutput::Wrapped(_) | ManifestOutput::Bare(_) => None,
        }
    }
}

/// Decode the output of `npm pkg get <key> --json` into the field's value.
///
/// Both the wrapped (`{"<key>": value}`) and bare forms yield the same
/// result. Only a non-empty string counts as a value.
///
/// # Examples
///
/// ```
/// use setup_npm_auth::decode_manifest_field;
///
/// let key = "publishConfig.registry";
/// let wrapped = r#"{"publishConfig.registry": "https://r.example/"}"#;
/// let bare = r#""https://r.example/""#;
///
/// assert_eq!(decode_manifest_field(key, wrapped).as_deref(), Some("https://r.example/"));
/// assert_eq!(decode_manifest_field(key, bare).as_deref(), Some("https://r.example/"));
/// assert_eq!(decode_manifest_field(key, "{}"), None);
/// ```
pub fn decode_manifest_field(key: &str, stdout: &str) -> Option<String> {
    ManifestOutput::decode(key, stdout).into_value()
}

/// [`PackageManager`] backed by the real npm executable.
#[derive(Debug, Clone)]
pub struct Npm {
    runner: CommandRunner,
}

impl Npm {
    pub fn new(runner: CommandRunner) -> Self {
        Npm { runner }
    }

    /// Narrate `command` and, unless `dry_run` is set, run it.
    async fn exec(&self, command: &NpmCommand, dry_run: bool) -> Result<String> {
        if dry_run {
            tracing::info!("$ {} (dry-run)", command);
            return Ok(String::new());
        }
        tracing::info!("$ {}", command);
        self.runner.run(command.args()).await
    }
}

#[async_trait]
impl PackageManager for Npm {
    async fn list_config(&self, location: Option<Location>) -> Result<ConfigSnapshot> {
        let command = list_config_command(location);
        let out = self.exec(&command, false).await?;
        ConfigSnapshot::from_json(&command.to_string(), &out)
    }

    async fn get_manifest_field(&self, key: &str) -> Result<Option<String>> {
        let command = get_manifest_field_command(key);
        let out = self.exec(&command, false).await?;
        Ok(decode_manifest_field(key, &out))
    }

    async fn set_config(
        &self,
        location: Option<Location>,
        key: &str,
        value: &Token,
        dry_run: bool,
    ) -> Result<()> {
        let command = set_config_command(location, key, value);
        self.exec(&command, dry_run).await?;
        Ok(())
    }
}
