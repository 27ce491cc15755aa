//! Authentication keys and token handling for npm registries.
//!
//! npm scopes bearer tokens to a registry by storing them under a
//! "nerf-darted" key: the registry URL without its protocol, followed by
//! `:_authToken`.
//!
//! ```text
//! https://registry.npmjs.org/ → //registry.npmjs.org/:_authToken
//! ```

use crate::error::{Error, Result};
use std::fmt;
use url::Url;

/// Suffix npm appends to a nerf-darted registry to form its token key.
pub const AUTH_TOKEN_SUFFIX: &str = ":_authToken";

/// Convert a registry URL to the config key npm reads its bearer token from.
///
/// The key is built from the URL's host (including a non-default port) and
/// its path, with a trailing slash added when missing.
///
/// # Examples
///
/// ```
/// use setup_npm_auth::auth_key;
///
/// assert_eq!(
///     auth_key("https://registry.example.com/api").unwrap(),
///     "//registry.example.com/api/:_authToken"
/// );
/// assert_eq!(
///     auth_key("https://registry.npmjs.org").unwrap(),
///     "//registry.npmjs.org/:_authToken"
/// );
/// ```
pub fn auth_key(registry_url: &str) -> Result<String> {
    let url = Url::parse(registry_url).map_err(|e| Error::InvalidRegistryUrl {
        url: registry_url.to_string(),
        message: e.to_string(),
    })?;

    let host = url.host_str().unwrap_or("");
    let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();

    let mut host_path = format!("{}{}{}", host, port, url.path());
    if !host_path.ends_with('/') {
        host_path.push('/');
    }

    Ok(format!("//{}{}", host_path, AUTH_TOKEN_SUFFIX))
}

/// A registry auth token read from the environment.
///
/// `Debug` and `Display` are redacted so a token never reaches a log line or
/// an error message by accident. Use [`Token::expose`] to hand the value to npm.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Token(value.into())
    }

    /// The raw token value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&"[REDACTED]").finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}
