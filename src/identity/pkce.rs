use std::{path::PathBuf, sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    config,
    error::{Error, Result},
    server::start_api_server,
    types::{PkceToken, Profile, Token},
    utils, warning,
};

use super::IdentityProvider;

const CALLBACK_TIMEOUT: Duration = Duration::from_secs(60);
const CALLBACK_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// OAuth 2.0 PKCE identity provider with a grant cached on disk.
pub struct PkceIdentity {
    client: Client,
    grant: Mutex<Option<Token>>,
    path: PathBuf,
}

impl PkceIdentity {
    /// Loads the identity client together with the grant cached by an earlier
    /// sign-in, if any.
    ///
    /// This is the identity half of the OAuth bootstrap gate.
    pub async fn load() -> Result<Self> {
        Self::load_from(Self::grant_path()).await
    }

    pub async fn load_from(path: PathBuf) -> Result<Self> {
        let grant = match async_fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<Token>(&content) {
                Ok(token) => Some(token),
                Err(e) => {
                    warning!("Ignoring unreadable OAuth grant cache. Err: {}", e);
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(Error::Cache(e.to_string())),
        };

        Ok(Self {
            client: Client::new(),
            grant: Mutex::new(grant),
            path,
        })
    }

    pub async fn has_grant(&self) -> bool {
        self.grant.lock().await.is_some()
    }

    async fn store(&self, token: Token) -> Result<String> {
        let access_token = token.access_token.clone();
        let json = serde_json::to_string_pretty(&token).map_err(|e| Error::Cache(e.to_string()))?;
        *self.grant.lock().await = Some(token);

        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Cache(e.to_string()))?;
        }
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| Error::Cache(e.to_string()))?;

        Ok(access_token)
    }

    fn grant_path() -> PathBuf {
        let mut path = config::data_dir();
        path.push("cache/oauth.json");
        path
    }
}

#[async_trait]
impl IdentityProvider for PkceIdentity {
    async fn silent_sign_in(&self) -> Result<Option<String>> {
        let grant = self.grant.lock().await.clone();
        let Some(grant) = grant else {
            return Ok(None);
        };

        let now = Utc::now().timestamp() as u64;
        if !grant.is_expired(now) {
            return Ok(Some(grant.access_token));
        }

        if !grant.can_refresh() {
            return Ok(None);
        }

        match refresh_token(&self.client, &grant.refresh_token).await {
            Ok(mut fresh) => {
                // providers may omit the refresh token when it is not rotated
                if fresh.refresh_token.is_empty() {
                    fresh.refresh_token = grant.refresh_token;
                }
                self.store(fresh).await.map(Some)
            }
            Err(e) => {
                warning!("Cannot refresh OAuth grant. Err: {}", e);
                Ok(None)
            }
        }
    }

    async fn interactive_sign_in(&self) -> Result<String> {
        let client_id = config::oauth_client_id()?;

        // generate PKCE verifier and challenge
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);

        let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(Some(PkceToken {
            code_verifier,
            token: None,
        })));

        let redirect_uri = config::oauth_redirect_uri();
        let scope = config::oauth_scope();
        let auth_url = reqwest::Url::parse_with_params(
            &config::oauth_auth_url(),
            &[
                ("client_id", client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", redirect_uri.as_str()),
                ("code_challenge", code_challenge.as_str()),
                ("code_challenge_method", "S256"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
            ],
        )
        .map_err(|e| Error::Identity(format!("invalid authorization url: {}", e)))?
        .to_string();

        let server = tokio::spawn(start_api_server(Arc::clone(&shared_state)));

        if webbrowser::open(&auth_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            )
        }

        let token = wait_for_token(shared_state, &server).await;
        if token.is_none() && server.is_finished() {
            return Err(match server.await {
                Ok(Err(e)) => e,
                Ok(Ok(())) => Error::Identity("callback server stopped".to_string()),
                Err(e) => Error::Identity(format!("callback server task failed: {}", e)),
            });
        }
        server.abort();

        match token {
            Some(token) => self.store(token).await,
            None => Err(Error::Identity(
                "authorization failed or timed out".to_string(),
            )),
        }
    }

    async fn profile(&self, access_token: &str) -> Result<Profile> {
        let endpoint = config::oauth_userinfo_url();
        let response = self
            .client
            .get(&endpoint)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|source| Error::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status { endpoint, status });
        }

        response.json::<Profile>().await.map_err(|e| Error::Decode {
            endpoint,
            message: e.to_string(),
        })
    }

    async fn forget(&self) -> Result<()> {
        *self.grant.lock().await = None;
        match async_fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Cache(e.to_string())),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

impl From<TokenResponse> for Token {
    fn from(res: TokenResponse) -> Self {
        Token {
            access_token: res.access_token,
            refresh_token: res.refresh_token.unwrap_or_default(),
            scope: res.scope.unwrap_or_default(),
            expires_in: res.expires_in.unwrap_or(3600),
            obtained_at: Utc::now().timestamp() as u64,
        }
    }
}

/// Exchanges an authorization code for a grant using the PKCE verifier that
/// started the flow.
pub async fn exchange_code(code: &str, verifier: &str) -> Result<Token> {
    let client_id = config::oauth_client_id()?;
    let redirect_uri = config::oauth_redirect_uri();

    request_token(
        &Client::new(),
        &[
            ("grant_type", "authorization_code"),
            ("client_id", client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", redirect_uri.as_str()),
        ],
    )
    .await
}

/// Exchanges a refresh token for a fresh grant.
pub async fn refresh_token(client: &Client, refresh_token: &str) -> Result<Token> {
    let client_id = config::oauth_client_id()?;

    request_token(
        client,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id.as_str()),
        ],
    )
    .await
}

async fn request_token(client: &Client, form: &[(&str, &str)]) -> Result<Token> {
    let endpoint = config::oauth_token_url();
    let response = client
        .post(&endpoint)
        .form(form)
        .send()
        .await
        .map_err(|source| Error::Request {
            endpoint: endpoint.clone(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status { endpoint, status });
    }

    let res = response
        .json::<TokenResponse>()
        .await
        .map_err(|e| Error::Decode {
            endpoint,
            message: e.to_string(),
        })?;

    Ok(res.into())
}

/// Polls the shared PKCE state until the callback handler stored a grant, the
/// callback server stopped or the timeout elapses.
async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    server: &JoinHandle<Result<()>>,
) -> Option<Token> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < CALLBACK_TIMEOUT {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|pkce| pkce.token.clone()) {
            return Some(token);
        }
        drop(lock);
        if server.is_finished() {
            return None;
        }
        tokio::time::sleep(CALLBACK_POLL_INTERVAL).await;
    }

    None
}
