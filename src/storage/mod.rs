// src/storage/mod.rs

use crate::error::{RegistrarError, Result};
use crate::model::ResolvedCourse;
use crate::portal::PortalSession;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::info;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub user_id: String,
}

/// Contents of `config.json`. Keys this tool does not know about are kept
/// and written back untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistrarConfig {
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub user_info: UserInfo,
    #[serde(default)]
    pub courses_to_register: Vec<ResolvedCourse>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Local JSON files: the user config and the saved portal session.
pub struct LocalStorage {
    config_file: PathBuf,
    session_file: PathBuf,
}

impl LocalStorage {
    pub fn new(config_file: impl Into<PathBuf>, session_file: impl Into<PathBuf>) -> Self {
        Self {
            config_file: config_file.into(),
            session_file: session_file.into(),
        }
    }

    pub fn load_config(&self) -> Result<RegistrarConfig> {
        load_json(&self.config_file)
    }

    /// Replaces `courses_to_register`, leaving the rest of the config as is.
    pub fn update_courses(&self, courses: &[ResolvedCourse]) -> Result<()> {
        info!("💾 Updating '{}' with {} courses", self.config_file.display(), courses.len());
        let mut config = self.load_config()?;
        config.courses_to_register = courses.to_vec();
        save_json(&self.config_file, &config)?;
        info!("✅ Config updated");
        Ok(())
    }

    pub fn save_session(&self, session: &PortalSession) -> Result<()> {
        info!("💾 Saving session data to '{}'", self.session_file.display());
        save_json(&self.session_file, session)
    }

    /// Loads the saved session. With `max_age`, a file older than that is
    /// refused as stale.
    pub fn load_session(&self, max_age: Option<Duration>) -> Result<PortalSession> {
        if let Some(max_age) = max_age {
            let age = self.session_age()?;
            if age > max_age {
                return Err(RegistrarError::StaleSession {
                    age_secs: age.as_secs(),
                    max_age_secs: max_age.as_secs(),
                });
            }
            info!("✅ Session data is fresh (created {}s ago)", age.as_secs());
        }
        load_json(&self.session_file)
    }

    fn session_age(&self) -> Result<Duration> {
        let metadata = std::fs::metadata(&self.session_file).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => RegistrarError::MissingInput(self.session_file.clone()),
            _ => RegistrarError::Io(e),
        })?;
        let modified = metadata.modified()?;
        Ok(SystemTime::now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO))
    }
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RegistrarError::MissingInput(path.to_path_buf()),
        _ => RegistrarError::Io(e),
    })?;
    serde_json::from_str(&text).map_err(|e| {
        RegistrarError::Config(format!("Error parsing '{}': {}", path.display(), e))
    })
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json)?;
    Ok(())
}
