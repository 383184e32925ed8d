//! TV Shows Client Library
//!
//! This library provides a session-oriented client for the TV shows API. It
//! lists and inserts shows on behalf of a signed-in user and manages the
//! sign-in lifecycle either with a bearer token issued by the API itself or
//! with an OAuth 2.0 identity provider.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local OAuth callback server
//! - `backend` - Items API client (`Backend` trait and REST implementation)
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `error` - Crate error type
//! - `identity` - OAuth identity provider (PKCE flow, silent sign-in)
//! - `server` - Local HTTP server for OAuth callbacks
//! - `session` - Session controller, observable state and bootstrap gate
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use tvshows::{backend::RestBackend, config, session::{SessionCache, SessionController}, types::Order};
//!
//! #[tokio::main]
//! async fn main() -> tvshows::error::Result<()> {
//!     config::load_env().await?;
//!     let backend = RestBackend::new(config::api_url());
//!     let controller = SessionController::restore(backend, SessionCache::local()).await;
//!     controller.fetch_list(Order::Date).await;
//!     println!("{} shows", controller.snapshot().items.len());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod server;
pub mod session;
pub mod types;
pub mod utils;

/// Prints an informational message with a blue bullet point.
///
/// The macro accepts the same arguments as `println!`.
///
/// # Example
///
/// ```
/// info!("Signing in as {}...", identifier);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Signed in");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for the command-line layer. Library code reports failures
/// through `Result` or through the session's notice slot instead.
///
/// # Example
///
/// ```
/// error!("Not signed in. Please run tvshows signin");
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// Used for recoverable issues that should not stop the current operation,
/// such as a session cache that could not be written.
///
/// # Example
///
/// ```
/// warning!("Cannot cache session token. Err: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
