mod common;

use std::sync::atomic::Ordering;

use common::{FakeBackend, FakeIdentity, show};
use tokio::sync::oneshot;
use tvshows::{
    error::Error,
    identity::IdentityProvider,
    session::{Bootstrap, OAuthSession, Phase, Ready, SIGN_IN_FAILED, SessionCache},
    types::Order,
};

fn ready(backend: FakeBackend, identity: FakeIdentity) -> Ready<FakeBackend, FakeIdentity> {
    Ready { backend, identity }
}

#[tokio::test]
async fn test_start_signs_in_silently_once() {
    let backend = FakeBackend::new().with_list(vec![show("Fargo")]);
    let identity = FakeIdentity::new()
        .with_grant("oauth-token")
        .with_profile("a@b.com");

    let session = OAuthSession::start(ready(backend, identity), SessionCache::ephemeral()).await;

    let state = session.controller().snapshot();
    assert!(state.backend_ready);
    assert!(state.authorized());
    assert_eq!(state.token.as_deref(), Some("oauth-token"));
    assert_eq!(state.items, vec![show("Fargo")]);
    assert_eq!(
        state.profile.and_then(|p| p.email).as_deref(),
        Some("a@b.com")
    );
    assert_eq!(session.identity().silent_call_count(), 1);
    assert_eq!(
        session.controller().backend().list_calls(),
        vec![(Some("oauth-token".to_string()), Order::Date)]
    );

    // the automatic attempt is not repeated
    assert!(!session.silent_sign_in().await);
    assert_eq!(session.identity().silent_call_count(), 1);
}

#[tokio::test]
async fn test_new_is_ready_before_silent_sign_in() {
    let identity = FakeIdentity::new().with_grant("oauth-token");
    let session = OAuthSession::new(
        ready(FakeBackend::new(), identity),
        SessionCache::ephemeral(),
    );

    let state = session.controller().snapshot();
    assert!(state.backend_ready);
    assert_eq!(state.phase, Phase::Unauthenticated);
    assert_eq!(session.identity().silent_call_count(), 0);

    assert!(session.silent_sign_in().await);
    assert!(session.controller().snapshot().authorized());
}

#[tokio::test]
async fn test_declined_silent_sign_in_stays_signed_out() {
    let session = OAuthSession::start(
        ready(FakeBackend::new(), FakeIdentity::new()),
        SessionCache::ephemeral(),
    )
    .await;

    let state = session.controller().snapshot();
    assert!(state.backend_ready);
    assert_eq!(state.phase, Phase::Unauthenticated);
    assert!(state.notice.is_none());
    assert_eq!(session.identity().silent_call_count(), 1);
    assert_eq!(session.controller().backend().list_call_count(), 0);
}

#[tokio::test]
async fn test_profile_failure_keeps_session() {
    let backend = FakeBackend::new().with_list(vec![]);
    let identity = FakeIdentity::new().with_grant("oauth-token");

    let session = OAuthSession::start(ready(backend, identity), SessionCache::ephemeral()).await;

    let state = session.controller().snapshot();
    assert!(state.authorized());
    assert!(state.profile.is_none());
    assert!(state.notice.is_none());
}

#[tokio::test]
async fn test_bootstrap_waits_for_both_loads() {
    let (release, gate) = oneshot::channel::<()>();

    let handle = tokio::spawn(
        Bootstrap {
            items: async move {
                let _ = gate.await;
                Ok::<_, Error>(FakeBackend::new())
            },
            identity: async { Ok::<_, Error>(FakeIdentity::new()) },
        }
        .ready(),
    );

    tokio::task::yield_now().await;
    assert!(!handle.is_finished());

    release.send(()).unwrap();
    let ready = handle.await.unwrap().unwrap();
    let session = OAuthSession::new(ready, SessionCache::ephemeral());
    assert!(session.controller().snapshot().backend_ready);
}

#[tokio::test]
async fn test_bootstrap_fails_when_a_load_fails() {
    let result = Bootstrap {
        items: async { Ok::<_, Error>(FakeBackend::new()) },
        identity: async {
            Err::<FakeIdentity, _>(Error::Identity("no client".to_string()))
        },
    }
    .ready()
    .await;

    assert!(matches!(result, Err(Error::Identity(_))));
}

#[tokio::test]
async fn test_interactive_sign_in() {
    let backend = FakeBackend::new().with_list(vec![show("Lost")]);
    let identity = FakeIdentity::new()
        .with_interactive("fresh-token")
        .with_profile("c@d.com");
    let session = OAuthSession::start(ready(backend, identity), SessionCache::ephemeral()).await;
    assert!(!session.controller().snapshot().authorized());

    session.sign_in().await;

    let state = session.controller().snapshot();
    assert!(state.authorized());
    assert_eq!(state.token.as_deref(), Some("fresh-token"));
    assert_eq!(state.items, vec![show("Lost")]);
    assert!(state.profile.is_some());
    assert_eq!(session.identity().interactive_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_interactive_sign_in_failure() {
    let session = OAuthSession::start(
        ready(FakeBackend::new(), FakeIdentity::new()),
        SessionCache::ephemeral(),
    )
    .await;

    session.sign_in().await;

    let state = session.controller().snapshot();
    assert_eq!(state.phase, Phase::Unauthenticated);
    assert_eq!(
        state.notice.as_ref().map(|n| n.message()),
        Some(SIGN_IN_FAILED)
    );
    assert!(state.notice.is_some_and(|n| n.is_error()));
    assert!(state.last_failure.is_some());
}

#[tokio::test]
async fn test_sign_out_forgets_grant() {
    let backend = FakeBackend::new().with_list(vec![show("Fargo")]);
    let identity = FakeIdentity::new().with_grant("oauth-token");
    let session = OAuthSession::start(ready(backend, identity), SessionCache::ephemeral()).await;
    assert!(session.controller().snapshot().authorized());

    session.sign_out().await;

    let state = session.controller().snapshot();
    assert_eq!(state.phase, Phase::Unauthenticated);
    assert!(state.token.is_none());
    assert!(state.items.is_empty());
    assert!(session.identity().forgotten.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_sign_out_during_interactive_sign_in_forgets_late_grant() {
    let backend = FakeBackend::new().with_list(vec![show("Fargo")]);
    let identity = FakeIdentity::new().with_interactive("late-token");
    let (release, gate) = oneshot::channel();
    *identity.interactive_gate.lock().unwrap() = Some(gate);
    let session = OAuthSession::start(ready(backend, identity), SessionCache::ephemeral()).await;

    tokio::join!(session.sign_in(), async {
        assert_eq!(session.controller().snapshot().phase, Phase::Authenticating);
        session.sign_out().await;
        release.send(()).unwrap();
    });

    let state = session.controller().snapshot();
    assert_eq!(state.phase, Phase::Unauthenticated);
    assert!(state.token.is_none());
    assert!(state.items.is_empty());
    assert_eq!(session.controller().backend().list_call_count(), 0);

    // nothing is left for a later silent sign-in to pick up
    assert_eq!(session.identity().grant(), None);
    assert_eq!(session.identity().silent_sign_in().await.unwrap(), None);
}

#[tokio::test]
async fn test_completed_interactive_sign_in_keeps_grant() {
    let identity = FakeIdentity::new().with_interactive("fresh-token");
    let session = OAuthSession::start(
        ready(FakeBackend::new().with_list(vec![]), identity),
        SessionCache::ephemeral(),
    )
    .await;

    session.sign_in().await;

    assert!(session.controller().snapshot().authorized());
    assert_eq!(session.identity().grant().as_deref(), Some("fresh-token"));
}
