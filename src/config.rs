//! Configuration management for the TV shows client.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Everything except the OAuth client id
//! has a default, so the bearer-token commands work against a local backend
//! without any configuration at all.
//!
//! Precedence:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{env, path::PathBuf};

use crate::error::{Error, Result};

/// Directory name used below the platform data directory.
pub const APP_DIR: &str = "tvshows";

const DEFAULT_API_URL: &str = "http://localhost:8080/_ah/api/tvshows/v1";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8085";
const DEFAULT_OAUTH_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_OAUTH_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_OAUTH_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
const DEFAULT_OAUTH_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives at:
/// - Linux: `~/.local/share/tvshows/.env`
/// - macOS: `~/Library/Application Support/tvshows/.env`
/// - Windows: `%LOCALAPPDATA%/tvshows/.env`
///
/// A missing file is not an error; a file that exists but cannot be parsed is.
/// Variables already present in the environment are not overridden.
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::Cache(e.to_string()))?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| Error::Cache(format!("{}: {}", path.display(), e)))
}

/// Returns the application's directory below the platform data directory.
///
/// Falls back to `./tvshows` when the platform has no data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

/// Base URL of the TV shows API (`TVSHOWS_API_URL`).
///
/// ```
/// let url = api_url(); // e.g. "http://localhost:8080/_ah/api/tvshows/v1"
/// ```
pub fn api_url() -> String {
    var_or("TVSHOWS_API_URL", DEFAULT_API_URL)
}

/// Address the local OAuth callback server binds to (`SERVER_ADDRESS`).
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// OAuth client id registered with the identity provider
/// (`OAUTH_CLIENT_ID`). There is no sensible default, so the OAuth flow
/// fails with [`Error::MissingConfig`] when it is absent.
pub fn oauth_client_id() -> Result<String> {
    env::var("OAUTH_CLIENT_ID").map_err(|_| Error::MissingConfig("OAUTH_CLIENT_ID"))
}

/// Authorization endpoint of the identity provider (`OAUTH_AUTH_URL`).
pub fn oauth_auth_url() -> String {
    var_or("OAUTH_AUTH_URL", DEFAULT_OAUTH_AUTH_URL)
}

/// Token exchange and refresh endpoint (`OAUTH_TOKEN_URL`).
pub fn oauth_token_url() -> String {
    var_or("OAUTH_TOKEN_URL", DEFAULT_OAUTH_TOKEN_URL)
}

/// Profile endpoint queried after a successful OAuth sign-in
/// (`OAUTH_USERINFO_URL`).
pub fn oauth_userinfo_url() -> String {
    var_or("OAUTH_USERINFO_URL", DEFAULT_OAUTH_USERINFO_URL)
}

/// Space separated scopes requested during authorization (`OAUTH_SCOPE`).
pub fn oauth_scope() -> String {
    var_or("OAUTH_SCOPE", DEFAULT_OAUTH_SCOPE)
}

/// Redirect URI registered for the OAuth client (`OAUTH_REDIRECT_URI`).
///
/// Defaults to the `/callback` route of the local callback server.
pub fn oauth_redirect_uri() -> String {
    env::var("OAUTH_REDIRECT_URI")
        .unwrap_or_else(|_| format!("http://{}/callback", server_addr()))
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
