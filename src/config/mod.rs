use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::Person;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Startup configuration handed to the app. Replaces the server URL and
/// current user that would otherwise be baked into the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// The person bookings are made for
    #[serde(default = "default_user")]
    pub user: Person,
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,
}

fn default_server_url() -> String {
    DEFAULT_SERVER_URL.to_string()
}

fn default_user() -> Person {
    Person::new(1, "Guest", "User")
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            user: default_user(),
            font_scale: default_font_scale(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .context("Failed to read config file")?;
            serde_json::from_str(&contents)
                .context("Failed to parse config file")
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "coach-calendar", "coach-calendar")
            .context("Could not determine config directory")?;
        Ok(proj_dirs.config_dir().join("config.json"))
    }

    /// Server URL without trailing slashes; falls back to the default when
    /// left blank
    pub fn base_url(&self) -> String {
        let url = self.server_url.trim().trim_end_matches('/');
        if url.is_empty() {
            DEFAULT_SERVER_URL.to_string()
        } else if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("coach-calendar-test-{}-{}", std::process::id(), name))
            .join("config.json")
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: Config = serde_json::from_str(r#"{"server_url": "http://sched.local:8080/"}"#).unwrap();
        assert_eq!(config.user, Person::new(1, "Guest", "User"));
        assert_eq!(config.font_scale, 1.0);
        assert_eq!(config.base_url(), "http://sched.local:8080");
    }

    #[test]
    fn base_url_normalizes_input() {
        let mut config = Config::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:5000");

        config.server_url = "  ".to_string();
        assert_eq!(config.base_url(), DEFAULT_SERVER_URL);

        config.server_url = "localhost:5000//".to_string();
        assert_eq!(config.base_url(), "http://localhost:5000");
    }

    #[test]
    fn missing_file_is_default() {
        let path = scratch_path("missing");
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn save_then_load() {
        let path = scratch_path("roundtrip");
        let config = Config {
            server_url: "http://10.0.0.2:5000".to_string(),
            user: Person::new(9, "Ada", "Lovelace"),
            font_scale: 1.25,
        };
        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        let _ = fs::remove_dir_all(path.parent().unwrap());
        assert_eq!(loaded, config);
    }

    #[test]
    fn broken_file_is_an_error() {
        let path = scratch_path("broken");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{not json").unwrap();
        let result = Config::load_from(&path);
        let _ = fs::remove_dir_all(path.parent().unwrap());
        assert!(result.is_err());
    }
}
