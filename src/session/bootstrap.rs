use std::future::Future;

use crate::error::Result;

/// Both clients of the OAuth variant, loaded and ready for use.
pub struct Ready<B, I> {
    pub backend: B,
    pub identity: I,
}

/// Readiness gate of the OAuth variant: the items API client and the
/// identity client load concurrently and the session may only start once
/// both are available.
///
/// ```rust,ignore
/// let ready = Bootstrap {
///     items: RestBackend::load(),
///     identity: PkceIdentity::load(),
/// }
/// .ready()
/// .await?;
/// let session = OAuthSession::start(ready, SessionCache::local()).await;
/// ```
pub struct Bootstrap<FB, FI> {
    pub items: FB,
    pub identity: FI,
}

impl<FB, FI> Bootstrap<FB, FI> {
    /// Awaits both loads. Fails with the first error if either load fails.
    pub async fn ready<B, I>(self) -> Result<Ready<B, I>>
    where
        FB: Future<Output = Result<B>>,
        FI: Future<Output = Result<I>>,
    {
        let (backend, identity) = tokio::try_join!(self.items, self.identity)?;
        Ok(Ready { backend, identity })
    }
}
