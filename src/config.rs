//! Configuration management for spotoken.
//!
//! Credentials and endpoints are read from environment variables, optionally
//! populated from a `.env` file in the local data directory. Everything the
//! flow needs is collected once into a [`Config`] that is passed explicitly to
//! each step, so nothing secret lives in source and tests can hand in their own
//! endpoints.
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults (everything except the client credentials)

use std::{env, path::PathBuf, time::Duration};

use crate::error::{AuthError, Result};

pub const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8888/callback";
pub const DEFAULT_SCOPE: &str = "user-read-playback-state user-modify-playback-state user-read-currently-playing user-read-private user-read-email";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CALLBACK_TIMEOUT_SECS: u64 = 120;

pub const CLIENT_ID_KEY: &str = "SPOTIFY_API_AUTH_CLIENT_ID";
pub const CLIENT_SECRET_KEY: &str = "SPOTIFY_API_AUTH_CLIENT_SECRET";
pub const REDIRECT_URI_KEY: &str = "SPOTIFY_API_REDIRECT_URI";
pub const SCOPE_KEY: &str = "SPOTIFY_API_AUTH_SCOPE";
pub const AUTH_URL_KEY: &str = "SPOTIFY_API_AUTH_URL";
pub const TOKEN_URL_KEY: &str = "SPOTIFY_API_TOKEN_URL";
pub const HTTP_TIMEOUT_KEY: &str = "SPOTOKEN_HTTP_TIMEOUT_SECS";
pub const CALLBACK_TIMEOUT_KEY: &str = "SPOTOKEN_CALLBACK_TIMEOUT_SECS";

/// Loads environment variables from `spotoken/.env` in the local data directory.
///
/// Creates the directory if needed so users know where to put the file. A
/// missing `.env` is not an error, since the values may come straight from the
/// environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotoken/.env`
/// - macOS: `~/Library/Application Support/spotoken/.env`
/// - Windows: `%LOCALAPPDATA%/spotoken/.env`
///
/// # Errors
///
/// Returns an error if the directory cannot be created or an existing `.env`
/// file cannot be parsed.
pub async fn load_env() -> crate::Res<()> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

/// Location of the `.env` file read by [`load_env`].
pub fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotoken/.env");
    path
}

/// Everything the authorization code flow needs for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    /// Space-delimited scope list, already normalized.
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub http_timeout: Duration,
    pub callback_timeout: Duration,
}

impl Config {
    /// Creates a config with the given credentials and default endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Config {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
            auth_url: SPOTIFY_AUTH_URL.to_string(),
            token_url: SPOTIFY_TOKEN_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            callback_timeout: Duration::from_secs(DEFAULT_CALLBACK_TIMEOUT_SECS),
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset. Client id and secret are required;
    /// every other key falls back to its default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let client_id = get(CLIENT_ID_KEY).ok_or(AuthError::MissingConfig(CLIENT_ID_KEY))?;
        let client_secret =
            get(CLIENT_SECRET_KEY).ok_or(AuthError::MissingConfig(CLIENT_SECRET_KEY))?;

        let mut config = Config::new(client_id, client_secret);

        if let Some(redirect_uri) = get(REDIRECT_URI_KEY) {
            config.redirect_uri = redirect_uri;
        }
        if let Some(scope) = get(SCOPE_KEY) {
            config.scope = normalize_scope(&scope);
        }
        if let Some(auth_url) = get(AUTH_URL_KEY) {
            config.auth_url = auth_url;
        }
        if let Some(token_url) = get(TOKEN_URL_KEY) {
            config.token_url = token_url;
        }
        if let Some(secs) = get(HTTP_TIMEOUT_KEY) {
            config.http_timeout = parse_secs(HTTP_TIMEOUT_KEY, &secs)?;
        }
        if let Some(secs) = get(CALLBACK_TIMEOUT_KEY) {
            config.callback_timeout = parse_secs(CALLBACK_TIMEOUT_KEY, &secs)?;
        }

        Ok(config)
    }
}

/// Collapses every run of whitespace in a scope list to a single space.
///
/// # Example
///
/// ```
/// let scope = normalize_scope("user-read-private\n   user-read-email ");
/// assert_eq!(scope, "user-read-private user-read-email");
/// ```
pub fn normalize_scope(scope: &str) -> String {
    scope.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_secs(key: &'static str, value: &str) -> Result<Duration> {
    match value.parse::<u64>() {
        Ok(0) => Err(AuthError::InvalidConfig {
            key,
            reason: "must be greater than zero".into(),
        }),
        Ok(secs) => Ok(Duration::from_secs(secs)),
        Err(e) => Err(AuthError::InvalidConfig {
            key,
            reason: e.to_string(),
        }),
    }
}
