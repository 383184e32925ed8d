#![allow(dead_code)]

use std::{
    collections::VecDeque,
    path::PathBuf,
    sync::{
        Mutex,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio::sync::oneshot;
use tvshows::{
    backend::Backend,
    error::{Error, Result},
    identity::IdentityProvider,
    types::{Credentials, Order, Profile, TvShow, TvShowDraft},
};

static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub fn show(name: &str) -> TvShow {
    TvShow {
        name: name.to_string(),
        ..TvShow::default()
    }
}

pub fn status_error(endpoint: &str, status: StatusCode) -> Error {
    Error::Status {
        endpoint: endpoint.to_string(),
        status,
    }
}

/// Unique file path below the system temp dir; the file does not exist yet.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir()
        .join(format!(
            "tvshows-test-{}-{}",
            std::process::id(),
            TEMP_COUNTER.fetch_add(1, Ordering::SeqCst)
        ))
        .join(name)
}

/// Scripted items API.
///
/// `list_reply`/`login_reply` of `None` make the call fail. Queued list gates
/// hold a list call until the test sends the items to return; queued login
/// gates do the same with the token (`None` fails the login).
#[derive(Default)]
pub struct FakeBackend {
    pub list_reply: Mutex<Option<Vec<TvShow>>>,
    pub list_gates: Mutex<VecDeque<oneshot::Receiver<Vec<TvShow>>>>,
    pub list_calls: Mutex<Vec<(Option<String>, Order)>>,
    pub login_reply: Mutex<Option<String>>,
    pub login_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub login_script: Mutex<VecDeque<oneshot::Receiver<Option<String>>>>,
    pub login_calls: Mutex<Vec<Credentials>>,
    pub insert_ok: AtomicBool,
    pub insert_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub inserted: Mutex<Vec<(Option<String>, TvShowDraft)>>,
    pub register_ok: AtomicBool,
    pub registered: Mutex<Vec<Credentials>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_list(self, items: Vec<TvShow>) -> Self {
        *self.list_reply.lock().unwrap() = Some(items);
        self
    }

    pub fn with_login(self, token: &str) -> Self {
        *self.login_reply.lock().unwrap() = Some(token.to_string());
        self
    }

    pub fn with_insert_ok(self) -> Self {
        self.insert_ok.store(true, Ordering::SeqCst);
        self
    }

    pub fn with_register_ok(self) -> Self {
        self.register_ok.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_list(&self, items: Option<Vec<TvShow>>) {
        *self.list_reply.lock().unwrap() = items;
    }

    pub fn list_call_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn list_calls(&self) -> Vec<(Option<String>, Order)> {
        self.list_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn list(&self, token: Option<&str>, order: &Order) -> Result<Vec<TvShow>> {
        self.list_calls
            .lock()
            .unwrap()
            .push((token.map(str::to_string), order.clone()));

        let gate = self.list_gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            return gate
                .await
                .map_err(|_| status_error("/tvshows", StatusCode::SERVICE_UNAVAILABLE));
        }

        self.list_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| status_error("/tvshows", StatusCode::INTERNAL_SERVER_ERROR))
    }

    async fn get(&self, _token: Option<&str>, id: i64) -> Result<TvShow> {
        self.list_reply
            .lock()
            .unwrap()
            .iter()
            .flatten()
            .find(|s| s.id == Some(id))
            .cloned()
            .ok_or_else(|| status_error("/tvshows/{id}", StatusCode::NOT_FOUND))
    }

    async fn insert(&self, token: Option<&str>, draft: &TvShowDraft) -> Result<TvShow> {
        let gate = self.insert_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if !self.insert_ok.load(Ordering::SeqCst) {
            return Err(status_error("/tvshows", StatusCode::BAD_REQUEST));
        }

        self.inserted
            .lock()
            .unwrap()
            .push((token.map(str::to_string), draft.clone()));
        Ok(TvShow {
            id: Some(1),
            name: draft.name.clone(),
            rate: Some(draft.rate),
            ..TvShow::default()
        })
    }

    async fn login(&self, credentials: &Credentials) -> Result<String> {
        self.login_calls.lock().unwrap().push(credentials.clone());

        let scripted = self.login_script.lock().unwrap().pop_front();
        if let Some(scripted) = scripted {
            return scripted
                .await
                .ok()
                .flatten()
                .ok_or_else(|| status_error("/users/login", StatusCode::UNAUTHORIZED));
        }

        let gate = self.login_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.login_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| status_error("/users/login", StatusCode::UNAUTHORIZED))
    }

    async fn register(&self, credentials: &Credentials) -> Result<()> {
        if !self.register_ok.load(Ordering::SeqCst) {
            return Err(status_error("/users/register", StatusCode::CONFLICT));
        }

        self.registered.lock().unwrap().push(credentials.clone());
        Ok(())
    }
}

/// Scripted identity provider.
///
/// Like a real provider it keeps the grant of a completed interactive
/// sign-in, so the next silent sign-in returns it until `forget`.
#[derive(Default)]
pub struct FakeIdentity {
    pub silent_reply: Mutex<Option<String>>,
    pub silent_calls: AtomicUsize,
    pub interactive_reply: Mutex<Option<String>>,
    pub interactive_gate: Mutex<Option<oneshot::Receiver<()>>>,
    pub interactive_calls: AtomicUsize,
    pub profile: Mutex<Option<Profile>>,
    pub forgotten: AtomicBool,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grant(self, token: &str) -> Self {
        *self.silent_reply.lock().unwrap() = Some(token.to_string());
        self
    }

    pub fn with_interactive(self, token: &str) -> Self {
        *self.interactive_reply.lock().unwrap() = Some(token.to_string());
        self
    }

    pub fn with_profile(self, email: &str) -> Self {
        *self.profile.lock().unwrap() = Some(Profile {
            email: Some(email.to_string()),
            ..Profile::default()
        });
        self
    }

    pub fn grant(&self) -> Option<String> {
        self.silent_reply.lock().unwrap().clone()
    }

    pub fn silent_call_count(&self) -> usize {
        self.silent_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn silent_sign_in(&self) -> Result<Option<String>> {
        self.silent_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.silent_reply.lock().unwrap().clone())
    }

    async fn interactive_sign_in(&self) -> Result<String> {
        self.interactive_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.interactive_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let token = self
            .interactive_reply
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| Error::Identity("user closed the window".to_string()))?;
        *self.silent_reply.lock().unwrap() = Some(token.clone());
        Ok(token)
    }

    async fn profile(&self, _access_token: &str) -> Result<Profile> {
        self.profile
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| status_error("/userinfo", StatusCode::FORBIDDEN))
    }

    async fn forget(&self) -> Result<()> {
        self.forgotten.store(true, Ordering::SeqCst);
        *self.silent_reply.lock().unwrap() = None;
        Ok(())
    }
}
