use std::time::Duration;

use chrono::{DateTime, Local};
use indicatif::{ProgressBar, ProgressStyle};

use crate::types::{TokenPair, TokenTableRow};

/// Starts a steadily ticking spinner with the given message.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Rows describing the token metadata, skipping anything Spotify left out.
pub fn token_table_rows(tokens: &TokenPair, obtained_at: DateTime<Local>) -> Vec<TokenTableRow> {
    let mut rows = Vec::new();

    if let Some(token_type) = &tokens.token_type {
        rows.push(TokenTableRow {
            field: "Token type".to_string(),
            value: token_type.clone(),
        });
    }

    if let Some(scope) = &tokens.scope {
        rows.push(TokenTableRow {
            field: "Scope".to_string(),
            // one scope per line keeps the table narrow
            value: scope.split_whitespace().collect::<Vec<_>>().join("\n"),
        });
    }

    if let Some(expires_at) = tokens.expires_at(obtained_at) {
        rows.push(TokenTableRow {
            field: "Expires at".to_string(),
            value: expires_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        });
    }

    rows
}
