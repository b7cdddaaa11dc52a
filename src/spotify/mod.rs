//! # Spotify Integration Module
//!
//! Talks to the Spotify accounts service to run the OAuth 2.0 authorization
//! code flow for a single local user.
//!
//! ## Architecture
//!
//! ```text
//! CLI (auth, url)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authorization URL + browser launch
//!     ├── Redirect capture (console paste or local callback listener)
//!     ├── Code extraction
//!     └── Token exchange
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! accounts.spotify.com
//! ```
//!
//! ## Flow Implementation
//!
//! 1. **Authorization Request**: the user is sent to `/authorize` with
//!    `response_type=code`, the client id, redirect URI and scope
//! 2. **Redirect Capture**: the URL Spotify redirects to carries `code`
//! 3. **Token Exchange**: `code` plus client id and secret are posted to
//!    `/api/token`, which answers with an access and a refresh token
//!
//! ## Error Handling
//!
//! Every step returns [`crate::error::AuthError`]. There is no retry: a single
//! failed paste or token request ends the run and the user starts over.
//! Requests are bounded by the configured HTTP timeout.
//!
//! ## Security Considerations
//!
//! - The client secret is only read from the environment or `.env`
//! - Tokens are printed, never written to disk

pub mod auth;
