use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;

use crate::{
    api, config,
    error::{Error, Result},
    types::PkceToken,
};

pub fn router(state: Arc<Mutex<Option<PkceToken>>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback).layer(Extension(state)))
}

/// Serves the OAuth callback routes on the configured `SERVER_ADDRESS` until
/// the task is aborted.
pub async fn start_api_server(state: Arc<Mutex<Option<PkceToken>>>) -> Result<()> {
    let addr = SocketAddr::from_str(&config::server_addr())
        .map_err(|e| Error::Identity(format!("invalid callback server address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| Error::Identity(format!("cannot bind callback server to {}: {}", addr, e)))?;

    axum::serve(listener, router(state))
        .await
        .map_err(|e| Error::Identity(format!("callback server failed: {}", e)))
}
