use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use crate::{backend::Backend, identity::IdentityProvider, warning};

use super::{bootstrap::Ready, cache::SessionCache, controller::SessionController};

/// Session whose token comes from an OAuth identity provider instead of the
/// items API's own login endpoint.
pub struct OAuthSession<B, I> {
    controller: SessionController<B>,
    identity: I,
    silent_attempted: AtomicBool,
}

impl<B: Backend, I: IdentityProvider> OAuthSession<B, I> {
    /// Creates the session from loaded clients and marks the backend ready.
    pub fn new(ready: Ready<B, I>, cache: SessionCache) -> Self {
        let controller = SessionController::new(ready.backend, cache);
        controller.mark_backend_ready();

        Self {
            controller,
            identity: ready.identity,
            silent_attempted: AtomicBool::new(false),
        }
    }

    /// Creates the session and makes the automatic silent sign-in attempt.
    pub async fn start(ready: Ready<B, I>, cache: SessionCache) -> Self {
        let session = Self::new(ready, cache);
        session.silent_sign_in().await;
        session
    }

    pub fn controller(&self) -> &SessionController<B> {
        &self.controller
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Asks the identity provider for a token without user interaction.
    ///
    /// Runs at most once per session; returns whether this call made the
    /// attempt. A provider that declines leaves the session signed out.
    pub async fn silent_sign_in(&self) -> bool {
        if self.silent_attempted.swap(true, AtomicOrdering::SeqCst) {
            return false;
        }

        let sign_outs = self.controller.sign_outs();
        match self.identity.silent_sign_in().await {
            Ok(Some(token)) => {
                if self.controller.authorize(token.clone()).await {
                    self.load_profile(&token).await;
                } else {
                    // a refresh may have stored the grant again
                    self.forget_if_signed_out(sign_outs).await;
                }
            }
            Ok(None) => {}
            Err(e) => warning!("Silent sign-in failed. Err: {}", e),
        }
        true
    }

    /// Runs the provider's interactive authorization.
    ///
    /// The provider stores its grant when the authorization completes. If
    /// the session was signed out meanwhile, that grant is forgotten again.
    pub async fn sign_in(&self) {
        let sign_outs = self.controller.sign_outs();
        let attempt = self.controller.begin_sign_in(None);
        let result = self.identity.interactive_sign_in().await;
        let token = result.as_ref().ok().cloned();

        let applied = self.controller.finish_sign_in(attempt, result).await;
        match token {
            Some(token) if applied => self.load_profile(&token).await,
            Some(_) => self.forget_if_signed_out(sign_outs).await,
            None => {}
        }
    }

    /// Forgets the provider grant and signs the session out.
    pub async fn sign_out(&self) {
        if let Err(e) = self.identity.forget().await {
            warning!("Cannot forget OAuth grant. Err: {}", e);
        }
        self.controller.sign_out().await;
    }

    async fn forget_if_signed_out(&self, sign_outs: u64) {
        if self.controller.sign_outs() == sign_outs {
            return;
        }
        if let Err(e) = self.identity.forget().await {
            warning!("Cannot forget OAuth grant. Err: {}", e);
        }
    }

    async fn load_profile(&self, token: &str) {
        match self.identity.profile(token).await {
            Ok(profile) => self.controller.set_profile(token, profile),
            Err(e) => warning!("Cannot fetch profile. Err: {}", e),
        }
    }
}

