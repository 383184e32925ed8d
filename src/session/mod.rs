//! # Session Module
//!
//! Holds the authentication state of the current session and mediates
//! between user actions and the items API.
//!
//! ```text
//! view ──action──▶ SessionController ──request──▶ Backend
//!   ▲                     │
//!   └──── watch::Receiver<SessionState> ◀── publish after every mutation
//! ```
//!
//! - [`SessionController`] - bearer-token session: list, insert, sign in,
//!   sign up, sign out.
//! - [`SessionState`] / [`Phase`] / [`Notice`] - the observable store the
//!   view subscribes to.
//! - [`SessionCache`] - optional on-disk cache of the bearer token.
//! - [`Bootstrap`] / [`OAuthSession`] - OAuth-delegated variant: a join over
//!   the two client loads gates a single silent sign-in.
//!
//! Failures never escape controller operations. Each one is turned into a
//! [`Notice`] and the state stays as it was before the call (drafts included).

mod bootstrap;
mod cache;
mod controller;
mod oauth;
mod state;

pub use bootstrap::{Bootstrap, Ready};
pub use cache::SessionCache;
pub use controller::SessionController;
pub use oauth::OAuthSession;
pub use state::{
    INSERT_FAILED, ITEM_FAILED, LIST_FAILED, Notice, Phase, SIGN_IN_FAILED, SIGN_UP_FAILED,
    SIGN_UP_SUCCEEDED, SessionState,
};
