//! # API Module
//!
//! HTTP endpoints served by the local callback listener while waiting for
//! Spotify to redirect the browser back after consent.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect and forwards its query string to the
//!   terminal side of the flow through a one-shot channel.
//!
//! Routes are mounted by [`crate::server::CallbackServer`] on the path of the
//! configured redirect URI.

mod callback;

pub use callback::{CallbackState, callback};
