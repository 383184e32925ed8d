use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::{
    config,
    error::{Error, Result},
};

#[derive(Debug, Serialize, Deserialize)]
struct CachedSession {
    token: String,
}

/// Where the bearer token survives between runs.
///
/// `ephemeral()` keeps nothing: the token then lives exactly as long as the
/// controller holding it.
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: Option<PathBuf>,
}

impl SessionCache {
    /// Cache file in the local data directory
    /// (e.g. `~/.local/share/tvshows/cache/session.json`).
    pub fn local() -> Self {
        let mut path = config::data_dir();
        path.push("cache/session.json");
        Self { path: Some(path) }
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn ephemeral() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub async fn load(&self) -> Result<Option<String>> {
        let Some(path) = &self.path else {
            return Ok(None);
        };

        let content = match async_fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Cache(e.to_string())),
        };

        let cached: CachedSession =
            serde_json::from_str(&content).map_err(|e| Error::Cache(e.to_string()))?;
        Ok(Some(cached.token).filter(|t| !t.is_empty()))
    }

    pub async fn persist(&self, token: &str) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Cache(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(&CachedSession {
            token: token.to_string(),
        })
        .map_err(|e| Error::Cache(e.to_string()))?;

        async_fs::write(path, json)
            .await
            .map_err(|e| Error::Cache(e.to_string()))
    }

    pub async fn clear(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        match async_fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Cache(e.to_string())),
        }
    }
}
