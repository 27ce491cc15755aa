//! Error types for setup-npm-auth.

use thiserror::Error;

/// Errors that can occur while configuring registry authentication.
#[derive(Error, Debug)]
pub enum Error {
    /// An `--include` value was empty after trimming and unquoting.
    #[error("Invalid --include value \"{value}\".")]
    InvalidIncludeValue { value: String },

    /// An `--include` scope is not `default`, `publish` or an `@scope`.
    #[error(
        "Invalid include target \"{scope}\". Use \"default\", \"publish\", or an \"@scope\" like \"@my-scope\"."
    )]
    InvalidIncludeTarget { scope: String },

    /// A config location other than `global`, `user` or `project`.
    #[error("Invalid location \"{value}\". Use \"global\", \"user\", or \"project\".")]
    InvalidLocation { value: String },

    /// A registry URL could not be parsed into an absolute URL.
    #[error("invalid registry URL '{url}': {message}")]
    InvalidRegistryUrl { url: String, message: String },

    /// No npm executable could be located.
    #[error("could not find an npm executable on PATH")]
    NpmNotFound(#[source] which::Error),

    /// The npm process could not be started or awaited.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// npm exited with a non-zero status.
    #[error("npm exited with code {code}")]
    ExitStatus {
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// npm was terminated by a signal (including our own timeout).
    #[error("npm was terminated by signal {signal}")]
    Signal {
        signal: i32,
        stdout: String,
        stderr: String,
    },

    /// npm produced output we could not interpret.
    #[error("unexpected output from `{command}`: {message}")]
    UnexpectedOutput { command: String, message: String },

    /// A requested include matched no registry.
    #[error(
        "Include target \"{scope}\" was requested but no registry could be discovered for it. {hint}"
    )]
    UnresolvedInclude { scope: String, hint: &'static str },

    /// A CI action input had a value we could not interpret.
    #[error("invalid value for action input '{name}': \"{value}\"")]
    InvalidActionInput { name: String, value: String },
}

impl Error {
    /// Captured stderr of a failed npm invocation, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Error::ExitStatus { stderr, .. } | Error::Signal { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}

/// Result type alias for setup-npm-auth operations.
pub type Result<T> = std::result::Result<T, Error>;
