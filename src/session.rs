use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "SUPERADMIN")]
    SuperAdmin,
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "LIDER")]
    Leader,
    #[serde(rename = "INTEGRANTE")]
    Member,
}

impl Role {
    /// Unknown or missing roles are treated as plain members.
    pub fn parse(raw: Option<&str>) -> Self {
        let raw = raw.unwrap_or_default().trim().to_uppercase();
        match raw.trim_start_matches("ROLE_") {
            "SUPERADMIN" => Role::SuperAdmin,
            "ADMIN" => Role::Admin,
            "LIDER" => Role::Leader,
            _ => Role::Member,
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPERADMIN",
            Role::Admin => "ADMIN",
            Role::Leader => "LIDER",
            Role::Member => "INTEGRANTE",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

/// Identity of the logged-in user, handed to every component that needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub username: String,
    pub role: Role,
    pub persona_id: Option<i64>,
}

impl AuthSession {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn is_self(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username)
    }
}

/// Persists the auth session between runs. Nothing else is stored locally.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|d| Self::new(d.join("asistencia-tui").join("session.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<AuthSession> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match toml::from_str(&content) {
            Ok(session) => Some(session),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable session file");
                None
            }
        }
    }

    pub fn save(&self, session: &AuthSession) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ApiError::Config(e.to_string()))?;
        }
        let content = toml::to_string(session).map_err(|e| ApiError::Config(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| ApiError::Config(e.to_string()))?;
        debug!(path = %self.path.display(), "session saved");
        Ok(())
    }

    pub fn clear(&self) {
        if self.path.exists() {
            if let Err(err) = std::fs::remove_file(&self.path) {
                warn!(error = %err, "could not remove session file");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_is_forgiving() {
        assert_eq!(Role::parse(Some("ADMIN")), Role::Admin);
        assert_eq!(Role::parse(Some("role_lider")), Role::Leader);
        assert_eq!(Role::parse(Some("SUPERADMIN")), Role::SuperAdmin);
        assert_eq!(Role::parse(Some("visitante")), Role::Member);
        assert_eq!(Role::parse(None), Role::Member);
    }

    #[test]
    fn store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.toml"));
        assert!(store.load().is_none());

        let session = AuthSession {
            token: "abc.def.ghi".into(),
            username: "admin".into(),
            role: Role::Admin,
            persona_id: Some(12),
        };
        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        assert!(SessionStore::new(path).load().is_none());
    }
}
