use std::{convert::Infallible, fmt, str::FromStr};

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tabled::Tabled;

/// Format the backend uses for `TvShow::date`, e.g. `Mar 04, 2015 09:12:45 PM`.
pub const SHOW_DATE_FORMAT: &str = "%b %d, %Y %I:%M:%S %p";

/// Seconds before nominal expiry at which an OAuth token counts as expired.
pub const TOKEN_EXPIRY_MARGIN_SECS: u64 = 240;

/// A show as the backend returns it.
///
/// Fields the client does not know are kept in `extra` and written back
/// unchanged. `title` is accepted in place of `name`; when both are present
/// `name` wins and `title` stays in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawTvShow")]
pub struct TvShow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawTvShow {
    #[serde(default, deserialize_with = "int64_field")]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, deserialize_with = "int64_field")]
    rate: Option<i64>,
    #[serde(default)]
    date: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawTvShow> for TvShow {
    fn from(raw: RawTvShow) -> Self {
        let mut extra = raw.extra;
        let name = match (raw.name, raw.title) {
            (Some(name), Some(title)) => {
                extra.insert("title".to_string(), Value::String(title));
                name
            }
            (Some(name), None) => name,
            (None, title) => title.unwrap_or_default(),
        };

        Self {
            id: raw.id,
            name,
            rate: raw.rate,
            date: raw.date,
            extra,
        }
    }
}

impl TvShow {
    /// Parses the creation timestamp the backend attached to the show.
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDateTime::parse_from_str(d, SHOW_DATE_FORMAT).ok())
    }
}

/// A show being edited before it is submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TvShowDraft {
    pub name: String,
    pub rate: i64,
}

impl TvShowDraft {
    pub fn new(name: impl Into<String>, rate: i64) -> Self {
        Self {
            name: name.into(),
            rate,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.identifier.is_empty() && self.secret.is_empty()
    }
}

// keep secrets out of logs and debug dumps of the session state
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListResponse {
    #[serde(default)]
    pub items: Vec<TvShow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Sort field understood by `GET /tvshows?order=`.
///
/// The backend knows `DATE` (newest first, the default), `NAME` and `RATE`.
/// Any other value is forwarded verbatim and left for the backend to judge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Order {
    #[default]
    Date,
    Name,
    Rate,
    Other(String),
}

impl Order {
    pub fn as_str(&self) -> &str {
        match self {
            Order::Date => "DATE",
            Order::Name => "NAME",
            Order::Rate => "RATE",
            Order::Other(value) => value,
        }
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Order {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_ascii_uppercase().as_str() {
            "" | "DATE" => Order::Date,
            "NAME" => Order::Name,
            "RATE" => Order::Rate,
            _ => Order::Other(trimmed.to_string()),
        })
    }
}

/// OAuth grant held by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

impl Token {
    pub fn is_expired(&self, now: u64) -> bool {
        now >= self
            .obtained_at
            .saturating_add(self.expires_in)
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS)
    }

    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.is_empty()
    }
}

/// PKCE state shared between the sign-in flow and the callback handler.
#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Tabled)]
pub struct TvShowTableRow {
    pub name: String,
    pub rate: String,
    pub added: String,
}

impl From<&TvShow> for TvShowTableRow {
    fn from(show: &TvShow) -> Self {
        Self {
            name: show.name.clone(),
            rate: show.rate.map(|r| r.to_string()).unwrap_or_default(),
            added: show.date.clone().unwrap_or_default(),
        }
    }
}

// The backend serializes 64-bit integers as JSON strings.
fn int64_field<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Int64 {
        Number(i64),
        Text(String),
    }

    match Option::<Int64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Int64::Number(n)) => Ok(Some(n)),
        Some(Int64::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}
