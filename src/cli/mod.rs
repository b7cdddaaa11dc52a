//! # CLI Module
//!
//! User-facing commands of spotoken. Each command loads nothing itself: it
//! receives a ready [`crate::config::Config`] from `main` and delegates to the
//! Spotify integration layer, handling output and exit status.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the authorization code flow and prints the token pair
//! - [`url`] - Prints the authorization URL without running the flow
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotoken auth                    # open browser, paste the redirect URL
//! spotoken auth --listen           # capture the redirect on localhost:8888
//! spotoken auth --no-browser       # print the URL instead of opening it
//! spotoken url --show-dialog       # only print the authorization URL
//! ```
//!
//! ## Error Handling
//!
//! Failures are printed with the `error!` macro, which exits with status 1.

mod auth;

pub use auth::auth;
pub use auth::url;
