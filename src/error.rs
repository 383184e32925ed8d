use reqwest::StatusCode;
use thiserror::Error;

/// Errors raised by the API clients, the identity provider and the local
/// caches.
///
/// `Request`, `Status` and `Decode` together form the single failure kind the
/// session controller recognizes (see [`Error::is_network_or_server`]); it
/// does not tell them apart when it reports a failure to the user.
#[derive(Debug, Error)]
pub enum Error {
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} answered with status {status}")]
    Status {
        endpoint: String,
        status: StatusCode,
    },
    #[error("cannot decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("missing configuration value {0}")]
    MissingConfig(&'static str),
    #[error("session cache error: {0}")]
    Cache(String),
    #[error("identity provider error: {0}")]
    Identity(String),
}

impl Error {
    pub fn is_network_or_server(&self) -> bool {
        matches!(
            self,
            Error::Request { .. } | Error::Status { .. } | Error::Decode { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
