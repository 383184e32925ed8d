use crate::types::{Credentials, Profile, TvShow, TvShowDraft};

pub const LIST_FAILED: &str = "Error, cannot get list, please try again.";
pub const ITEM_FAILED: &str = "Error, cannot get element, please try again.";
pub const INSERT_FAILED: &str = "Error, element not inserted, please try again.";
pub const SIGN_IN_FAILED: &str = "Error, cannot log in, please try again.";
pub const SIGN_UP_FAILED: &str = "Error, account not created, please try again.";
pub const SIGN_UP_SUCCEEDED: &str = "Account created successfully, please log in.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// User-facing notification published by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error(String),
    Info(String),
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Notice::Error(message.into())
    }

    pub fn info(message: impl Into<String>) -> Self {
        Notice::Info(message.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Error(message) | Notice::Info(message) => message,
        }
    }
}

/// Everything a view needs to render the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    pub token: Option<String>,
    /// Shows of the signed-in user in server order. Empty unless authorized.
    pub items: Vec<TvShow>,
    pub draft: TvShowDraft,
    pub credentials: Credentials,
    pub profile: Option<Profile>,
    /// Set once both clients of the OAuth variant finished loading.
    pub backend_ready: bool,
    /// Last notification; replaced by the next one.
    pub notice: Option<Notice>,
    /// Cause of the most recent error notice, for diagnostics.
    pub last_failure: Option<String>,
}

impl SessionState {
    pub fn authorized(&self) -> bool {
        self.phase == Phase::Authenticated
    }

    /// Drops everything tied to the signed-in user.
    pub(crate) fn reset(&mut self) {
        self.phase = Phase::Unauthenticated;
        self.token = None;
        self.items.clear();
        self.draft = TvShowDraft::default();
        self.profile = None;
    }
}
