// src/session.rs
//! Session state: role-scoped bearer tokens persisted to disk (the desktop
//! analog of the browser's local storage) and the path-prefix rules that
//! decide which token a request carries.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

pub const ADMIN_TOKEN: &str = "admin_token";
pub const SISWA_TOKEN: &str = "siswa_token";
pub const ALUMNI_TOKEN: &str = "alumni_token";
pub const GENERIC_TOKEN: &str = "token";

/// Role-keyed token storage backed by a JSON file. Login responses name the
/// key to store under (`tokenName`), so arbitrary keys are accepted.
#[derive(Debug)]
pub struct TokenStore {
    path: PathBuf,
    tokens: BTreeMap<String, String>,
}

impl TokenStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let tokens = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read session file: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Corrupt session file: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        Ok(Self { path, tokens })
    }

    /// Stored token under `name`, ignoring empty values.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.tokens
            .get(name)
            .map(String::as_str)
            .filter(|token| !token.is_empty())
    }

    pub fn set(&mut self, name: &str, value: &str) -> Result<()> {
        self.tokens.insert(name.to_string(), value.to_string());
        self.persist()
    }

    pub fn clear(&mut self) -> Result<()> {
        self.tokens.clear();
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory: {}", parent.display())
                })?;
            }
        }

        let raw = serde_json::to_string_pretty(&self.tokens)
            .context("Failed to serialize session tokens")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))
    }
}

/// Recover the guard even when another holder panicked; the token map
/// itself stays consistent.
pub(crate) fn lock_store(store: &Mutex<TokenStore>) -> MutexGuard<'_, TokenStore> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Route namespace of the page the client is currently on. Decides which
/// stored token the request carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Admin,
    Applicant,
    Public,
}

impl RouteClass {
    pub fn of(path: &str) -> Self {
        if path.starts_with("/admin") {
            RouteClass::Admin
        } else if path.starts_with("/Id") {
            RouteClass::Applicant
        } else {
            RouteClass::Public
        }
    }

    /// Token for this namespace: admin pages use `admin_token`, applicant
    /// pages the first non-empty of `siswa_token`/`alumni_token`, everything
    /// else the generic `token`.
    pub fn token_from<'a>(&self, store: &'a TokenStore) -> Option<&'a str> {
        match self {
            RouteClass::Admin => store.get(ADMIN_TOKEN),
            RouteClass::Applicant => store.get(SISWA_TOKEN).or_else(|| store.get(ALUMNI_TOKEN)),
            RouteClass::Public => store.get(GENERIC_TOKEN),
        }
    }
}

/// Forced-navigation seam. The production impl logs the redirect; tests
/// substitute a recorder.
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Default navigator: an expired session can only be reported, the next
/// command starts from the login screen anyway.
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn redirect(&self, path: &str) {
        warn!("Session expired, redirecting to {}", path);
    }
}

#[derive(Debug)]
pub enum SessionError {
    MissingToken,
    Expired,
}

impl SessionError {
    pub fn message(&self) -> &'static str {
        match self {
            SessionError::MissingToken => "Sesi tidak ditemukan, silakan login.",
            SessionError::Expired => "Sesi berakhir, silakan login kembali.",
        }
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(entries: &[(&str, &str)]) -> TokenStore {
        let dir = tempfile::tempdir().unwrap();
        let mut store = TokenStore::load(dir.path().join("session.json")).unwrap();
        for (name, value) in entries {
            store.set(name, value).unwrap();
        }
        store
    }

    #[test]
    fn route_class_by_prefix() {
        assert_eq!(RouteClass::of("/admin/pengguna"), RouteClass::Admin);
        assert_eq!(RouteClass::of("/Id/lowongan/3"), RouteClass::Applicant);
        assert_eq!(RouteClass::of("/"), RouteClass::Public);
        assert_eq!(RouteClass::of("/jobs"), RouteClass::Public);
    }

    #[test]
    fn applicant_prefers_siswa_token() {
        let store = store_with(&[(SISWA_TOKEN, "s-token"), (ALUMNI_TOKEN, "a-token")]);
        assert_eq!(RouteClass::Applicant.token_from(&store), Some("s-token"));
    }

    #[test]
    fn applicant_falls_back_to_alumni_token() {
        let store = store_with(&[(SISWA_TOKEN, ""), (ALUMNI_TOKEN, "a-token")]);
        assert_eq!(RouteClass::Applicant.token_from(&store), Some("a-token"));
    }

    #[test]
    fn admin_route_ignores_applicant_tokens() {
        let store = store_with(&[(SISWA_TOKEN, "s-token")]);
        assert_eq!(RouteClass::Admin.token_from(&store), None);
    }

    #[test]
    fn tokens_survive_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let mut store = TokenStore::load(&path).unwrap();
            store.set(ADMIN_TOKEN, "abc").unwrap();
        }

        let reloaded = TokenStore::load(&path).unwrap();
        assert_eq!(reloaded.get(ADMIN_TOKEN), Some("abc"));
    }

    #[test]
    fn clear_removes_everything() {
        let mut store = store_with(&[(ADMIN_TOKEN, "abc"), (GENERIC_TOKEN, "xyz")]);
        store.clear().unwrap();
        assert_eq!(store.get(ADMIN_TOKEN), None);
        assert_eq!(store.get(GENERIC_TOKEN), None);
    }
}
