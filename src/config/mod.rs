//! Configuration for charfinder
//!
//! Settings mirror a small YAML settings file and can be overridden with
//! `CHARFINDER_*` environment variables.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::DATABASE_FILE_NAME;

/// Canonical source of the character database
pub const CANONICAL_URL: &str = "https://www.unicode.org/Public/UNIDATA/UnicodeData.txt";

/// Fallback mirror serving the same file, best-effort availability
pub const MIRROR_URL: &str = "http://turing.com.br/etc/UnicodeData.txt";

/// Main settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (CHARFINDER_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("CHARFINDER_UCD_PATH") {
            self.database.path = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("CHARFINDER_UCD_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("CHARFINDER_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("CHARFINDER_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
    }
}

/// Local database location and remote source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Override path for the local database file
    pub path: Option<PathBuf>,
    /// URL the database is downloaded from when missing locally
    pub url: String,
    /// Alternate download URL, selected with `--mirror`
    pub mirror_url: String,
    /// Connect timeout for the download, in seconds
    pub connect_timeout: f64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: None,
            url: CANONICAL_URL.to_string(),
            mirror_url: MIRROR_URL.to_string(),
            connect_timeout: 10.0,
        }
    }
}

impl DatabaseSettings {
    /// Resolve the local database path: the configured override wins,
    /// otherwise the canonical file name under `home`.
    ///
    /// Pure; the caller supplies the home directory so path resolution is
    /// deterministic under test.
    pub fn resolve_path(&self, home: Option<&Path>) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(path.clone()),
            None => home.map(|home| home.join(DATABASE_FILE_NAME)),
        }
    }
}

/// Web mode bind settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to
    pub bind_address: String,
    /// Port to listen on
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.database.url, CANONICAL_URL);
        assert_eq!(settings.database.path, None);
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_resolve_path_prefers_override() {
        let settings = DatabaseSettings {
            path: Some(PathBuf::from("/data/ucd.txt")),
            ..DatabaseSettings::default()
        };
        let resolved = settings.resolve_path(Some(Path::new("/home/user")));
        assert_eq!(resolved, Some(PathBuf::from("/data/ucd.txt")));
    }

    #[test]
    fn test_resolve_path_defaults_to_home() {
        let settings = DatabaseSettings::default();
        let resolved = settings.resolve_path(Some(Path::new("/home/user")));
        assert_eq!(resolved, Some(PathBuf::from("/home/user/UnicodeData.txt")));
    }

    #[test]
    fn test_resolve_path_without_home_or_override() {
        let settings = DatabaseSettings::default();
        assert_eq!(settings.resolve_path(None), None);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charfinder.yml");
        std::fs::write(
            &path,
            "database:\n  path: /data/ucd.txt\nserver:\n  port: 9090\n",
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.database.path, Some(PathBuf::from("/data/ucd.txt")));
        // Unset fields keep their defaults.
        assert_eq!(settings.database.url, CANONICAL_URL);
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.server.bind_address, "127.0.0.1");
    }
}
