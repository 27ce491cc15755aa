//! Command-line interface shared by the binaries.

use crate::error::Result;
use crate::exec::CommandRunner;
use crate::include::IncludeDirective;
use crate::npm::{Location, Npm};
use crate::run::{run, RunOptions};
use crate::setup::{ApplyReport, ProcessEnv};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:

  # Set auth for the default registry using NODE_AUTH_TOKEN
  $ NODE_AUTH_TOKEN=foo setup-npm-auth

  # Set auth for default and publishConfig.registry using different env vars
  $ NODE_AUTH_TOKEN=foo PUBLISH_TOKEN=bar setup-npm-auth --include default --include publish=PUBLISH_TOKEN

  # Set auth for a scoped registry
  $ SCOPE_TOKEN=abc setup-npm-auth --include @myscope=SCOPE_TOKEN

  # Read registries from a specific npm config location
  $ NODE_AUTH_TOKEN=foo setup-npm-auth -L project

  # Show what would be configured, but do not write anything
  $ NODE_AUTH_TOKEN=foo setup-npm-auth --dry-run

  # Fail if a required registry is not found
  $ setup-npm-auth --include @notfound";

/// Configure user-level auth tokens for npm registries.
#[derive(Parser, Debug)]
#[command(name = "setup-npm-auth", version, after_help = EXAMPLES)]
pub struct Cli {
    /// Include a registry. Repeatable. Grammar: <scope>[=<ENV_VAR>]. Defaults to "default".
    #[arg(short = 'i', long = "include", value_name = "SCOPE")]
    pub include: Vec<IncludeDirective>,

    /// Config location to discover registries from. Defaults to npm's own default.
    #[arg(short = 'L', long, value_name = "global|project|user")]
    pub location: Option<Location>,

    /// Show which commands would be run, but don't execute them.
    #[arg(long)]
    pub dry_run: bool,

    /// Show more detailed output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Terminate any npm invocation running longer than this. 0 disables.
    #[arg(long, value_name = "SECONDS", env = "SETUP_NPM_AUTH_TIMEOUT")]
    pub timeout: Option<u64>,

    /// npm executable to use instead of the one found on PATH.
    #[arg(long, value_name = "PATH", env = "SETUP_NPM_AUTH_NPM")]
    pub npm: Option<PathBuf>,
}

impl Cli {
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            includes: self.include.clone(),
            location: self.location,
            dry_run: self.dry_run,
            verbose: self.verbose,
        }
    }

    /// The npm runner these arguments select.
    pub fn command_runner(&self) -> Result<CommandRunner> {
        let runner = match &self.npm {
            Some(path) => CommandRunner::new(path),
            None => CommandRunner::locate_npm()?,
        };
        Ok(runner.with_timeout(self.timeout.map(Duration::from_secs)))
    }
}

/// Parse `argv` into [`Cli`].
///
/// `--help` and `--version` print and exit through clap. Any other parse
/// failure is reported as `[ERROR]: <message>` and yields the failure code.
pub fn parse_args<I, T>(argv: I) -> std::result::Result<Cli, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(argv) {
        Ok(cli) => Ok(cli),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => err.exit(),
            _ => {
                eprintln!("[ERROR]: {}", parse_error_message(&err));
                Err(ExitCode::FAILURE)
            }
        },
    }
}

/// The cause of a parse failure, without clap's usage block.
fn parse_error_message(err: &clap::Error) -> String {
    if let Some(source) = std::error::Error::source(err) {
        return source.to_string();
    }
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

/// Install the `tracing` subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Run the pipeline against the real npm and the process environment.
pub async fn execute(cli: Cli) -> Result<ApplyReport> {
    let npm = Npm::new(cli.command_runner()?);
    run(cli.run_options(), &npm, &ProcessEnv).await
}

/// Print a failure and pick the process exit code.
pub fn exit_code<T>(result: Result<T>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("[ERROR]: {}", err);
            if let Some(stderr) = err.stderr().map(str::trim).filter(|s| !s.is_empty()) {
                eprintln!("{}", stderr);
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::include::IncludeScope;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_full() {
        let cli = Cli::try_parse_from([
            "setup-npm-auth",
            "--include",
            "default",
            "-i",
            "@foo=FOO_TOKEN",
            "-L",
            "'project'",
            "--dry-run",
            "-v",
            "--timeout",
            "30",
        ])
        .unwrap();

        let opts = cli.run_options();
        assert_eq!(
            opts.includes,
            vec![
                IncludeDirective::default_registry(),
                IncludeDirective::new(IncludeScope::Named("@foo".into()), "FOO_TOKEN"),
            ]
        );
        assert_eq!(opts.location, Some(Location::Project));
        assert!(opts.dry_run);
        assert!(opts.verbose);
        assert_eq!(cli.timeout, Some(30));
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["setup-npm-auth"]).unwrap();
        let opts = cli.run_options();
        assert!(opts.includes.is_empty());
        assert_eq!(opts.location, None);
        assert!(!opts.dry_run);
        assert!(!opts.verbose);
    }

    #[test]
    fn test_parse_rejects_bad_include() {
        let err = Cli::try_parse_from(["setup-npm-auth", "--include", "bogus"]).unwrap_err();
        assert!(err.to_string().contains("Invalid include target \"bogus\""));
    }

    #[test]
    fn test_parse_error_message_uses_cause() {
        let err = Cli::try_parse_from(["setup-npm-auth", "--include", "bogus"]).unwrap_err();
        let message = parse_error_message(&err);
        assert!(message.starts_with("Invalid include target \"bogus\""));
        assert!(!message.contains("Usage:"));

        let err = Cli::try_parse_from(["setup-npm-auth", "--no-such-flag"]).unwrap_err();
        let message = parse_error_message(&err);
        assert!(message.contains("--no-such-flag"));
        assert!(!message.starts_with("error:"));
    }

    #[test]
    fn test_parse_args_reports_failure() {
        assert!(parse_args(["setup-npm-auth", "-i", "bogus"]).is_err());
        assert!(parse_args(["setup-npm-auth", "-i", "@ok"]).is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_location() {
        assert!(Cli::try_parse_from(["setup-npm-auth", "-L", "builtin"]).is_err());
    }

    #[test]
    fn test_explicit_npm_path() {
        let cli = Cli::try_parse_from([
            "setup-npm-auth",
            "--npm",
            "/opt/node/bin/npm",
            "--timeout",
            "0",
        ])
        .unwrap();
        let runner = cli.command_runner().unwrap();
        assert_eq!(runner.program(), std::path::Path::new("/opt/node/bin/npm"));
        assert_eq!(runner.timeout(), None);
    }
}
