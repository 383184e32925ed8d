//! # Identity Module
//!
//! OAuth-delegated sign-in. The session layer only sees the
//! [`IdentityProvider`] trait; [`PkceIdentity`] implements it with the
//! OAuth 2.0 PKCE flow (browser authorization plus a local callback server)
//! and a cached, refreshable grant for silent sign-in.

pub mod pkce;

use async_trait::async_trait;

use crate::{error::Result, types::Profile};

pub use pkce::PkceIdentity;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Tries to obtain an access token without user interaction.
    ///
    /// Returns `Ok(None)` when the provider declines, e.g. because no prior
    /// grant exists or it can no longer be refreshed.
    async fn silent_sign_in(&self) -> Result<Option<String>>;

    /// Runs the interactive authorization and returns an access token.
    async fn interactive_sign_in(&self) -> Result<String>;

    async fn profile(&self, access_token: &str) -> Result<Profile>;

    /// Drops any locally held grant. Never contacts the provider.
    async fn forget(&self) -> Result<()>;
}
