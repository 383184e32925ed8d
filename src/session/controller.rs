use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio::sync::watch;

use crate::{
    backend::Backend,
    error::{Error, Result},
    types::{Credentials, Order, Profile, TvShow, TvShowDraft},
    warning,
};

use super::{
    cache::SessionCache,
    state::{
        INSERT_FAILED, ITEM_FAILED, LIST_FAILED, Notice, Phase, SIGN_IN_FAILED, SIGN_UP_FAILED,
        SIGN_UP_SUCCEEDED, SessionState,
    },
};

/// Identifies one sign-in attempt. A result is only applied while the
/// attempt is still the latest one and no sign-out happened in between.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Attempt {
    seq: u64,
    epoch: u64,
}

/// Owner of the session state.
///
/// All mutations go through the `watch` channel, so every subscriber sees a
/// consistent snapshot after each step. Operations take `&self` and may run
/// concurrently; results that were overtaken by a newer call of the same
/// operation, or by a sign-out, are dropped.
pub struct SessionController<B> {
    backend: B,
    cache: SessionCache,
    state: watch::Sender<SessionState>,
    list_seq: AtomicU64,
    sign_in_seq: AtomicU64,
    // bumped by every sign-out
    epoch: AtomicU64,
}

impl<B: Backend> SessionController<B> {
    pub fn new(backend: B, cache: SessionCache) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            backend,
            cache,
            state,
            list_seq: AtomicU64::new(0),
            sign_in_seq: AtomicU64::new(0),
            epoch: AtomicU64::new(0),
        }
    }

    /// Creates a controller that adopts the token left in `cache` by an
    /// earlier sign-in. Does not touch the network.
    pub async fn restore(backend: B, cache: SessionCache) -> Self {
        let controller = Self::new(backend, cache);
        match controller.cache.load().await {
            Ok(Some(token)) => controller.state.send_modify(|s| {
                s.phase = Phase::Authenticated;
                s.token = Some(token);
            }),
            Ok(None) => {}
            Err(e) => warning!("Ignoring unreadable session cache. Err: {}", e),
        }
        controller
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn set_draft(&self, draft: TvShowDraft) {
        self.state.send_modify(|s| s.draft = draft);
    }

    pub fn set_credentials(&self, credentials: Credentials) {
        self.state.send_modify(|s| s.credentials = credentials);
    }

    pub fn dismiss_notice(&self) {
        self.state.send_if_modified(|s| s.notice.take().is_some());
    }

    /// Replaces the item collection with the backend's list sorted by `order`.
    pub async fn fetch_list(&self, order: Order) {
        let seq = self.list_seq.fetch_add(1, AtomicOrdering::SeqCst) + 1;
        let epoch = self.epoch();
        let token = self.token();

        let result = self.backend.list(token.as_deref(), &order).await;

        self.state.send_if_modified(|s| {
            if seq != self.list_seq.load(AtomicOrdering::SeqCst) || epoch != self.epoch() {
                return false;
            }

            match result {
                // a list fetched for nobody is not shown to anybody
                Ok(_) if !s.authorized() => false,
                Ok(items) => {
                    s.items = items;
                    true
                }
                Err(e) => {
                    apply_failure(s, LIST_FAILED, &e);
                    true
                }
            }
        });
    }

    /// Fetches a single show by id.
    ///
    /// Does not touch the item collection. Returns `None` and publishes a
    /// notice when the backend fails; returns `None` silently when a sign-out
    /// happened while the request was in flight.
    pub async fn fetch_item(&self, id: i64) -> Option<TvShow> {
        let epoch = self.epoch();
        let token = self.token();

        let result = self.backend.get(token.as_deref(), id).await;
        if epoch != self.epoch() {
            return None;
        }

        match result {
            Ok(item) => Some(item),
            Err(e) => {
                self.fail(ITEM_FAILED, &e);
                None
            }
        }
    }

    /// Submits `item`; on success clears the draft and refreshes the list.
    ///
    /// The item stays in the draft when the backend rejects it.
    pub async fn insert(&self, item: TvShowDraft) {
        let epoch = self.epoch();
        let token = self.token();
        self.state.send_modify(|s| s.draft = item.clone());

        let result = self.backend.insert(token.as_deref(), &item).await;
        if epoch != self.epoch() {
            return;
        }

        match result {
            Ok(_) => {
                // edits made while the request was in flight are kept
                self.state.send_if_modified(|s| {
                    if s.draft != item {
                        return false;
                    }
                    s.draft = TvShowDraft::default();
                    true
                });
                self.fetch_list(Order::default()).await;
            }
            Err(e) => self.fail(INSERT_FAILED, &e),
        }
    }

    /// Exchanges `credentials` for a bearer token and loads the list.
    pub async fn sign_in(&self, credentials: Credentials) {
        let attempt = self.begin_sign_in(Some(&credentials));
        let result = self.backend.login(&credentials).await;
        self.finish_sign_in(attempt, result).await;
    }

    /// Registers an account. Does not sign in.
    pub async fn sign_up(&self, credentials: Credentials) {
        self.state
            .send_modify(|s| s.credentials = credentials.clone());

        match self.backend.register(&credentials).await {
            Ok(()) => self.state.send_modify(|s| {
                if s.credentials == credentials {
                    s.credentials = Credentials::default();
                }
                s.notice = Some(Notice::info(SIGN_UP_SUCCEEDED));
            }),
            Err(e) => self.fail(SIGN_UP_FAILED, &e),
        }
    }

    /// Drops the token, the item collection and the draft. Never touches the
    /// network; calling it while signed out changes nothing.
    pub async fn sign_out(&self) {
        self.epoch.fetch_add(1, AtomicOrdering::SeqCst);
        self.state.send_if_modified(|s| {
            let before = s.clone();
            s.reset();
            *s != before
        });

        if let Err(e) = self.cache.clear().await {
            warning!("Cannot clear session cache. Err: {}", e);
        }
    }

    /// Adopts a token obtained outside the items API (e.g. from an OAuth
    /// identity provider) and loads the list.
    pub async fn authorize(&self, token: String) -> bool {
        let attempt = self.begin_sign_in(None);
        self.finish_sign_in(attempt, Ok(token)).await
    }

    pub(crate) fn begin_sign_in(&self, credentials: Option<&Credentials>) -> Attempt {
        let attempt = Attempt {
            seq: self.sign_in_seq.fetch_add(1, AtomicOrdering::SeqCst) + 1,
            epoch: self.epoch(),
        };

        self.state.send_modify(|s| {
            if let Some(credentials) = credentials {
                s.credentials = credentials.clone();
            }
            if s.phase == Phase::Unauthenticated {
                s.phase = Phase::Authenticating;
            }
        });

        attempt
    }

    /// Applies the outcome of `attempt`. Returns whether the session is now
    /// authorized with the new token.
    pub(crate) async fn finish_sign_in(&self, attempt: Attempt, result: Result<String>) -> bool {
        let applied = self.state.send_if_modified(|s| {
            if !self.is_current(attempt) {
                return false;
            }

            match &result {
                Ok(token) => {
                    s.phase = Phase::Authenticated;
                    s.token = Some(token.clone());
                    s.credentials = Credentials::default();
                }
                Err(e) => {
                    if s.phase == Phase::Authenticating {
                        s.phase = Phase::Unauthenticated;
                    }
                    apply_failure(s, SIGN_IN_FAILED, e);
                }
            }
            true
        });

        let Ok(token) = result else {
            return false;
        };
        if !applied {
            return false;
        }

        if let Err(e) = self.cache.persist(&token).await {
            warning!("Cannot cache session token. Err: {}", e);
        }
        if attempt.epoch != self.epoch() {
            // signed out while the token was being written
            if let Err(e) = self.cache.clear().await {
                warning!("Cannot clear session cache. Err: {}", e);
            }
            return false;
        }

        self.fetch_list(Order::default()).await;
        true
    }

    pub(crate) fn fail(&self, message: &str, err: &Error) {
        self.state.send_modify(|s| apply_failure(s, message, err));
    }

    pub(crate) fn mark_backend_ready(&self) {
        self.state.send_if_modified(|s| !std::mem::replace(&mut s.backend_ready, true));
    }

    /// Stores the identity profile if `token` still is the session's token.
    pub(crate) fn set_profile(&self, token: &str, profile: Profile) {
        self.state.send_if_modified(|s| {
            if !s.authorized() || s.token.as_deref() != Some(token) {
                return false;
            }
            s.profile = Some(profile);
            true
        });
    }

    /// Number of sign-outs so far.
    pub(crate) fn sign_outs(&self) -> u64 {
        self.epoch()
    }

    fn is_current(&self, attempt: Attempt) -> bool {
        attempt.seq == self.sign_in_seq.load(AtomicOrdering::SeqCst)
            && attempt.epoch == self.epoch()
    }

    fn epoch(&self) -> u64 {
        self.epoch.load(AtomicOrdering::SeqCst)
    }

    fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }
}

fn apply_failure(state: &mut SessionState, message: &str, err: &Error) {
    state.notice = Some(Notice::error(message));
    state.last_failure = Some(err.to_string());
}
