//! spotoken library
//!
//! Runs the Spotify OAuth 2.0 authorization code flow for one local user:
//! build the authorization URL, capture the redirect, exchange the code for
//! an access and a refresh token.
//!
//! # Modules
//!
//! - `api` - HTTP endpoint of the local callback listener
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `error` - Error type shared by every step of the flow
//! - `server` - Local HTTP listener capturing the OAuth redirect
//! - `spotify` - Authorization URL, code extraction and token exchange
//! - `types` - Token data structures
//! - `utils` - Console helpers
//!
//! # Example
//!
//! ```
//! use spotoken::{config, spotify};
//!
//! let config = config::Config::new("client-id", "client-secret");
//! let url = spotify::auth::authorization_url(&config, false)?;
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Boxed-error result for glue code that only reports failures.
///
/// The authorization flow itself uses [`error::Result`] with the typed
/// [`error::AuthError`].
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational line prefixed with a blue `o`.
///
/// ```
/// info!("Listening for the authorization callback on {}", addr);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success line prefixed with a green checkmark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line prefixed with a red `!` and exits with status 1.
///
/// Only for failures that end the run; code after the call never executes.
///
/// ```
/// error!("{} must be set", key);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning line prefixed with a yellow `!`; the run continues.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
