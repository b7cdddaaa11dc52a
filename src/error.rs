//! Error types for the authorization code flow.
//!
//! Every failure of a run is terminal: the driver prints the message of the
//! [`AuthError`] it received and exits with a non-zero status.

use thiserror::Error;

/// Everything that can end an authorization run.
#[derive(Debug, Error)]
pub enum AuthError {
    /// A required configuration value is not set.
    #[error("{0} must be set")]
    MissingConfig(&'static str),

    #[error("invalid value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    /// The pasted text could not be parsed as an absolute URL.
    #[error("invalid redirect URL: {0}")]
    InvalidRedirectUrl(String),

    #[error("no redirect URL was entered")]
    EmptyInput,

    /// The redirect URL carries no `code` query parameter.
    #[error("redirect URL does not contain an authorization code")]
    MissingAuthorizationCode,

    #[error("redirect URL contains more than one authorization code")]
    AmbiguousAuthorizationCode,

    /// The provider redirected back with `error=...`, usually `access_denied`.
    #[error("authorization was denied: {0}")]
    AuthorizationDenied(String),

    /// The token endpoint answered with an `error` field.
    #[error("error obtaining tokens: {}", describe(.error, .description))]
    TokenExchange {
        error: String,
        description: Option<String>,
    },

    #[error("unexpected token endpoint response: {0}")]
    MalformedTokenResponse(String),

    /// DNS, connection or timeout failure while talking to the provider.
    #[error("network failure: {0}")]
    Network(#[from] reqwest::Error),

    #[error("callback server failed: {0}")]
    CallbackServer(String),

    #[error("no authorization callback received within {0} seconds")]
    CallbackTimeout(u64),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn describe(error: &str, description: &Option<String>) -> String {
    match description {
        Some(d) if !d.is_empty() => format!("{error} ({d})"),
        _ => error.to_string(),
    }
}

/// Result alias used throughout the flow.
pub type Result<T> = std::result::Result<T, AuthError>;
