//! Client state kept across restarts: credential, theme, last route.
//!
//! The search context is deliberately absent; a reopened trip page is
//! rebuilt from its route alone.

use crate::theme::ThemeMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tripmate_core::{AuthToken, Route, UserProfile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAuth {
    pub token: AuthToken,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientState {
    #[serde(default)]
    pub auth: Option<StoredAuth>,
    #[serde(default)]
    pub theme: Option<ThemeMode>,
    #[serde(default)]
    pub last_route: Option<String>,
}

impl ClientState {
    pub fn route(&self) -> Option<Route> {
        self.last_route.as_deref().map(Route::parse)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub fn load(path: &Path) -> Result<Option<ClientState>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let state = serde_json::from_str::<ClientState>(&contents)?;
    Ok(Some(state))
}

pub fn save(path: &Path, state: &ClientState) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(state)?;
    std::fs::write(path, contents)?;
    Ok(())
}
