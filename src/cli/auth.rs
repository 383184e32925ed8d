use crate::{
    backend::RestBackend,
    error, info,
    identity::PkceIdentity,
    session::{Bootstrap, OAuthSession, SessionCache},
    success, utils,
};

use super::{print_shows, report};

pub async fn auth() {
    let pb = utils::spinner("Loading API clients...");
    let bootstrap = Bootstrap {
        items: RestBackend::load(),
        identity: PkceIdentity::load(),
    };
    let ready = match bootstrap.ready().await {
        Ok(ready) => ready,
        Err(e) => {
            pb.finish_and_clear();
            error!("Cannot load API clients. Err: {}", e);
        }
    };
    pb.finish_and_clear();

    let session = OAuthSession::start(ready, SessionCache::local()).await;

    if !session.controller().snapshot().authorized() {
        info!("Opening browser to sign in...");
        session.sign_in().await;
    }

    let state = session.controller().snapshot();
    report(&state);

    let who = state
        .profile
        .as_ref()
        .and_then(|p| p.email.clone().or_else(|| p.name.clone()));
    match who {
        Some(who) => success!("Signed in as {}", who),
        None => success!("Signed in"),
    }
    print_shows(&state);
}
