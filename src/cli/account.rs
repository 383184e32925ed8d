use dialoguer::Password;

use crate::{
    error,
    identity::{IdentityProvider, PkceIdentity},
    success,
    types::Credentials,
    utils, warning,
};

use super::{open_session, print_shows, report};

pub async fn signin(identifier: String, secret: Option<String>) {
    let secret = secret.unwrap_or_else(|| prompt_secret(false));
    let controller = open_session().await;

    let pb = utils::spinner(&format!("Signing in as {}...", identifier));
    controller
        .sign_in(Credentials::new(identifier.clone(), secret))
        .await;
    pb.finish_and_clear();

    let state = controller.snapshot();
    report(&state);
    success!("Signed in as {}", identifier);
    print_shows(&state);
}

pub async fn signup(identifier: String, secret: Option<String>) {
    let secret = secret.unwrap_or_else(|| prompt_secret(true));
    let controller = open_session().await;

    let pb = utils::spinner(&format!("Creating account {}...", identifier));
    controller.sign_up(Credentials::new(identifier, secret)).await;
    pb.finish_and_clear();

    report(&controller.snapshot());
}

pub async fn signout() {
    let controller = open_session().await;
    controller.sign_out().await;

    // an OAuth grant would silently sign the next `auth` back in
    match PkceIdentity::load().await {
        Ok(identity) => {
            if let Err(e) = identity.forget().await {
                warning!("Cannot forget OAuth grant. Err: {}", e);
            }
        }
        Err(e) => warning!("Cannot load OAuth grant. Err: {}", e),
    }

    success!("Signed out");
}

fn prompt_secret(confirm: bool) -> String {
    let mut prompt = Password::new().with_prompt("Secret");
    if confirm {
        prompt = prompt.with_confirmation("Repeat secret", "Secrets do not match");
    }

    match prompt.interact() {
        Ok(secret) => secret,
        Err(e) => error!("Cannot read secret. Err: {}", e),
    }
}
