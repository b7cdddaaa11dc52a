use chrono::{DateTime, Local};
use serde::Deserialize;
use tabled::Tabled;

/// Tokens returned by a successful authorization code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
}

impl TokenPair {
    /// Local time at which the access token expires, if the provider said.
    pub fn expires_at(&self, obtained_at: DateTime<Local>) -> Option<DateTime<Local>> {
        let secs = i64::try_from(self.expires_in?).ok()?;
        obtained_at.checked_add_signed(chrono::Duration::seconds(secs))
    }
}

/// Raw body of the token endpoint, covering both success and error shapes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

#[derive(Tabled)]
pub struct TokenTableRow {
    pub field: String,
    pub value: String,
}
