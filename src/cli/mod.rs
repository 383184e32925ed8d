//! # CLI Module
//!
//! Command implementations for the `tvshows` binary. Each command builds a
//! session controller, runs one user action through it and renders the
//! resulting state: notices become coloured messages, the item collection
//! becomes a table.
//!
//! ## Commands
//!
//! - [`list`] - show the signed-in user's shows
//! - [`show`] - show a single show by id
//! - [`insert`] - add a show, then show the refreshed list
//! - [`signin`] / [`signup`] / [`signout`] - bearer-token account flow
//! - [`auth`] - OAuth flow: silent sign-in first, browser authorization as
//!   fallback
//!
//! The bearer token is cached in the local data directory, so a session
//! opened by `signin` or `auth` carries over to later commands until
//! `signout`.
//!
//! ```bash
//! tvshows signup me@example.com
//! tvshows signin me@example.com
//! tvshows insert --name "The Wire" --rate 5
//! tvshows list --order name
//! tvshows signout
//! ```

mod account;
mod auth;
mod shows;

pub use account::{signin, signout, signup};
pub use auth::auth;
pub use shows::{insert, list, show};

use crate::{
    backend::RestBackend,
    config, error, info,
    session::{Notice, SessionCache, SessionController, SessionState},
    success, utils, warning,
};

async fn open_session() -> SessionController<RestBackend> {
    SessionController::restore(RestBackend::new(config::api_url()), SessionCache::local()).await
}

fn require_signed_in(state: &SessionState) {
    if !state.authorized() {
        error!("Not signed in. Please run tvshows signin or tvshows auth");
    }
}

/// Prints the pending notice; exits when it reports a failure.
fn report(state: &SessionState) {
    match &state.notice {
        Some(Notice::Error(message)) => {
            if let Some(cause) = &state.last_failure {
                warning!("{}", cause);
            }
            error!("{}", message);
        }
        Some(Notice::Info(message)) => success!("{}", message),
        None => {}
    }
}

fn print_shows(state: &SessionState) {
    if state.items.is_empty() {
        info!("No shows yet. Add one with tvshows insert");
        return;
    }
    println!("{}", utils::shows_table(&state.items));
}
