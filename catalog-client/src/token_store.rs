//! TokenStore - file-backed named token storage
//!
//! Plays the role browser local storage plays for the web dashboard:
//! set on login, read on demand, removed on logout.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::{ClientResult, Session};

/// Persisted tokens, `{state_dir}/session.json`
#[derive(Debug, Clone)]
pub struct TokenStore {
    file_path: PathBuf,
}

impl TokenStore {
    pub fn new(state_dir: &Path) -> Self {
        Self {
            file_path: state_dir.join("session.json"),
        }
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn read_all(&self) -> ClientResult<HashMap<String, String>> {
        if !self.file_path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.file_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, tokens: &HashMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(tokens)?;
        std::fs::write(&self.file_path, content)?;
        Ok(())
    }

    pub fn store(&self, key: &str, token: &str) -> ClientResult<()> {
        let mut tokens = self.read_all()?;
        tokens.insert(key.to_string(), token.to_string());
        self.write_all(&tokens)
    }

    pub fn load(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    /// Remove the token; returns whether one was stored
    pub fn remove(&self, key: &str) -> ClientResult<bool> {
        let mut tokens = self.read_all()?;
        let removed = tokens.remove(key).is_some();
        if removed {
            self.write_all(&tokens)?;
        }
        Ok(removed)
    }

    /// Session for `key`, anonymous when nothing is stored
    pub fn session(&self, key: &str) -> ClientResult<Session> {
        Ok(self
            .load(key)?
            .map(Session::with_token)
            .unwrap_or_else(Session::anonymous))
    }
}
