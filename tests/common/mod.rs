//! A recording in-memory package manager for pipeline tests.

#![allow(dead_code)]

use async_trait::async_trait;
use setup_npm_auth::{ConfigSnapshot, Error, Location, PackageManager, Result, Token};
use std::collections::HashMap;
use std::sync::Mutex;

/// One call made against [`FakeNpm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(Option<Location>),
    GetManifestField(String),
    Set {
        location: Option<Location>,
        key: String,
        value: String,
        dry_run: bool,
    },
}

#[derive(Debug, Default)]
pub struct FakeNpm {
    pub config: ConfigSnapshot,
    pub publish_registry: Option<String>,
    /// Make `config set` fail as if npm exited with this code.
    pub fail_set_with: Option<i32>,
    calls: Mutex<Vec<Call>>,
}

impl FakeNpm {
    pub fn with_config(json: &str) -> Self {
        FakeNpm {
            config: ConfigSnapshot::from_json("npm config list --json", json).unwrap(),
            ..Default::default()
        }
    }

    pub fn publish_registry(mut self, url: &str) -> Self {
        self.publish_registry = Some(url.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// `config set` calls that would have changed npm's config.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Set {
                    key,
                    value,
                    dry_run: false,
                    ..
                } => Some((key, value)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl PackageManager for FakeNpm {
    async fn list_config(&self, location: Option<Location>) -> Result<ConfigSnapshot> {
        self.record(Call::List(location));
        Ok(self.config.clone())
    }

    async fn get_manifest_field(&self, key: &str) -> Result<Option<String>> {
        self.record(Call::GetManifestField(key.to_string()));
        Ok(self.publish_registry.clone())
    }

    async fn set_config(
        &self,
        location: Option<Location>,
        key: &str,
        value: &Token,
        dry_run: bool,
    ) -> Result<()> {
        self.record(Call::Set {
            location,
            key: key.to_string(),
            value: value.expose().to_string(),
            dry_run,
        });
        match self.fail_set_with {
            Some(code) if !dry_run => Err(Error::ExitStatus {
                code,
                stdout: String::new(),
                stderr: "npm ERR! could not save config".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Build an environment from `(name, value)` pairs.
pub fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
