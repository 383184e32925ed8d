use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::{
    config,
    error::{Error, Result},
    types::{Credentials, ListResponse, LoginResponse, Order, TvShow, TvShowDraft},
};

use super::Backend;

/// JSON client for the TV shows API.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Builds the client from the configured API URL.
    ///
    /// This is the items half of the OAuth bootstrap gate; it reloads the
    /// `.env` file so a freshly edited configuration is picked up.
    pub async fn load() -> Result<Self> {
        config::load_env().await?;
        Ok(Self::new(config::api_url()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Backend for RestBackend {
    async fn list(&self, token: Option<&str>, order: &Order) -> Result<Vec<TvShow>> {
        let endpoint = self.endpoint("tvshows");
        let request = with_bearer(self.client.get(&endpoint), token)
            .query(&[("order", order.as_str())]);

        let response = send_checked(&endpoint, request).await?;
        let list: ListResponse = decode(&endpoint, response).await?;
        Ok(list.items)
    }

    async fn get(&self, token: Option<&str>, id: i64) -> Result<TvShow> {
        let endpoint = self.endpoint(&format!("tvshows/{}", id));
        let request = with_bearer(self.client.get(&endpoint), token);

        let response = send_checked(&endpoint, request).await?;
        decode(&endpoint, response).await
    }

    async fn insert(&self, token: Option<&str>, draft: &TvShowDraft) -> Result<TvShow> {
        let endpoint = self.endpoint("tvshows");
        let request = with_bearer(self.client.post(&endpoint), token).json(draft);

        let response = send_checked(&endpoint, request).await?;
        decode(&endpoint, response).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<String> {
        let endpoint = self.endpoint("users/login");
        let request = self.client.post(&endpoint).json(credentials);

        let response = send_checked(&endpoint, request).await?;
        let login: LoginResponse = decode(&endpoint, response).await?;
        Ok(login.token)
    }

    async fn register(&self, credentials: &Credentials) -> Result<()> {
        let endpoint = self.endpoint("users/register");
        let request = self.client.post(&endpoint).json(credentials);

        // the body of a successful registration carries nothing of interest
        send_checked(&endpoint, request).await?;
        Ok(())
    }
}

fn with_bearer(request: RequestBuilder, token: Option<&str>) -> RequestBuilder {
    match token {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

async fn send_checked(endpoint: &str, request: RequestBuilder) -> Result<Response> {
    let response = request.send().await.map_err(|source| Error::Request {
        endpoint: endpoint.to_string(),
        source,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status {
            endpoint: endpoint.to_string(),
            status,
        });
    }

    Ok(response)
}

async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> Result<T> {
    let body = response.text().await.map_err(|source| Error::Request {
        endpoint: endpoint.to_string(),
        source,
    })?;

    serde_json::from_str(&body).map_err(|e| Error::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}
