//! # Items API Module
//!
//! The session controller talks to the TV shows API through the [`Backend`]
//! trait. [`RestBackend`] is the production implementation: JSON over HTTPS
//! with an optional bearer token.
//!
//! ## Endpoints
//!
//! - `GET /tvshows?order={field}` - shows of the current user
//! - `GET /tvshows/{id}` - a single show
//! - `POST /tvshows` - insert a show
//! - `POST /users/login` - exchange credentials for a bearer token
//! - `POST /users/register` - create an account
//!
//! Every failure, whether transport, status or payload, surfaces as one of
//! the network/server variants of [`crate::error::Error`]. Nothing is retried.

mod rest;

use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Credentials, Order, TvShow, TvShowDraft},
};

pub use rest::RestBackend;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Lists the shows visible to `token`, sorted by the backend.
    async fn list(&self, token: Option<&str>, order: &Order) -> Result<Vec<TvShow>>;

    async fn get(&self, token: Option<&str>, id: i64) -> Result<TvShow>;

    /// Inserts `draft` and returns the stored show.
    async fn insert(&self, token: Option<&str>, draft: &TvShowDraft) -> Result<TvShow>;

    /// Exchanges credentials for a bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<String>;

    async fn register(&self, credentials: &Credentials) -> Result<()>;
}
