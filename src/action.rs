//! Mapping CI action inputs onto command-line arguments.
//!
//! Action runners expose each input `<name>` as the environment variable
//! `INPUT_<NAME>` (upper-cased, spaces replaced by `_`).

use crate::error::{Error, Result};
use crate::setup::EnvSource;

/// Environment variable carrying a named action input.
pub fn input_var(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Parse a boolean value from a string.
///
/// Returns `Some(true)` for "true", `Some(false)` for "false", and `None` for other values.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Inputs declared by the action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionInputs {
    pub includes: Vec<String>,
    pub location: Option<String>,
    pub dry_run: bool,
    pub verbose: bool,
}

impl ActionInputs {
    /// Read inputs from `env`.
    ///
    /// `includes` is multi-line; each line is trimmed and blank lines are
    /// dropped. Unset booleans are `false`.
    pub fn from_env<E: EnvSource + ?Sized>(env: &E) -> Result<Self> {
        let includes = env
            .var(&input_var("includes"))
            .map(|v| {
                v.lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let location = env
            .var(&input_var("location"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(ActionInputs {
            includes,
            location,
            dry_run: bool_input(env, "dry-run")?,
            verbose: bool_input(env, "verbose")?,
        })
    }

    /// The equivalent command-line arguments, without the program name.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for include in &self.includes {
            args.push("--include".to_string());
            args.push(include.clone());
        }
        if let Some(location) = &self.location {
            args.push("--location".to_string());
            args.push(location.clone());
        }
        if self.dry_run {
            args.push("--dry-run".to_string());
        }
        if self.verbose {
            args.push("--verbose".to_string());
        }
        args
    }
}

fn bool_input<E: EnvSource + ?Sized>(env: &E, name: &str) -> Result<bool> {
    match env.var(&input_var(name)) {
        None => Ok(false),
        Some(value) => parse_bool(value.trim()).ok_or_else(|| Error::InvalidActionInput {
            name: name.to_string(),
            value,
        }),
    }
}
