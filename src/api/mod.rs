//! # API Module
//!
//! HTTP endpoints of the short-lived local server that completes the OAuth
//! 2.0 PKCE sign-in.
//!
//! ## Endpoints
//!
//! - [`callback`] - receives the authorization code from the identity
//!   provider and exchanges it for a grant using the pending PKCE verifier.
//! - [`health`] - reports status and version, handy to check that the
//!   callback server is reachable on the configured address.
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use tvshows::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
