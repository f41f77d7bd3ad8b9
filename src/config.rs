//! Configuration
//!
//! Connection settings are layered, later sources winning:
//! built-in defaults, a `config.json` file, `TDNS_*` environment variables
//! and finally command-line flags. Environment and flags arrive together
//! through clap (`env = "TDNS_TOKEN"` etc.), so this module only handles
//! defaults and files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_HOST: &str = "http://localhost:5380";
pub const CONFIG_FILE: &str = "config.json";
pub const CONFIG_DIR: &str = ".tdns";

/// Connection settings for the DNS server API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API token
    pub token: String,
    /// Base URL of the web service, e.g. `http://localhost:5380`
    pub host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            token: String::new(),
            host: DEFAULT_HOST.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `explicit` or, failing that, the default locations.
    ///
    /// An explicitly requested file must exist. The default locations are
    /// optional; when none exists the built-in defaults are used.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => Self::load_first(&default_paths()),
        }
    }

    /// Load the first of `candidates` that exists, or the defaults when none does
    pub fn load_first(candidates: &[PathBuf]) -> Result<Self> {
        match candidates.iter().find(|path| path.is_file()) {
            Some(path) => Self::from_file(path),
            None => {
                debug!("Config not loaded: no config.json found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Read a single config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let body = std::fs::read_to_string(path)
            .with_context(|| format!("Config not loaded: cannot read {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&body)
            .with_context(|| format!("Config not loaded: invalid JSON in {}", path.display()))?;

        if config.host.trim().is_empty() {
            config.host = DEFAULT_HOST.to_string();
        }

        debug!(path = %path.display(), host = %config.host, "Loaded config file");
        Ok(config)
    }

    /// Apply values from flags or the environment
    pub fn with_overrides(mut self, token: Option<String>, host: Option<String>) -> Self {
        if let Some(token) = token {
            self.token = token;
        }
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.host = host;
        }
        self
    }

    /// Host without a trailing slash
    pub fn host(&self) -> &str {
        self.host.trim_end_matches('/')
    }
}

/// Default config file locations, in lookup order
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE)];
    if let Some(path) = global_path() {
        paths.push(path);
    }
    paths
}

/// `$HOME/.tdns/config.json`
pub fn global_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
}

/// Result of writing an initial config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    Created(PathBuf),
    AlreadyExists(PathBuf),
}

/// Write a starter config file at `path`, never overwriting an existing one
pub fn write_initial(path: &Path) -> Result<InitOutcome> {
    if path.exists() {
        return Ok(InitOutcome::AlreadyExists(path.to_path_buf()));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Error creating directory {}", parent.display()))?;
    }

    let mut body = serde_json::to_string_pretty(&Config::default())
        .context("Error encoding JSON")?;
    body.push('\n');

    std::fs::write(path, body)
        .with_context(|| format!("Error creating file {}", path.display()))?;

    let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    Ok(InitOutcome::Created(absolute))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(config.token.is_empty());
    }

    #[test]
    fn test_from_file_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"token": "abc"}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.token, "abc");
        assert_eq!(config.host, DEFAULT_HOST);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/tdns.json"))).unwrap_err();
        assert!(err.to_string().contains("Config not loaded"));
    }

    #[test]
    fn test_load_first_existing_candidate_wins() {
        let local = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        let local_path = local.path().join(CONFIG_FILE);
        let global_path = home.path().join(CONFIG_DIR).join(CONFIG_FILE);

        std::fs::create_dir_all(global_path.parent().unwrap()).unwrap();
        std::fs::write(&global_path, r#"{"token": "global"}"#).unwrap();

        let candidates = vec![local_path.clone(), global_path.clone()];
        assert_eq!(Config::load_first(&candidates).unwrap().token, "global");

        std::fs::write(&local_path, r#"{"token": "local", "host": "http://dns.local:5380"}"#)
            .unwrap();
        let config = Config::load_first(&candidates).unwrap();
        assert_eq!(config.token, "local");
        assert_eq!(config.host, "http://dns.local:5380");
    }

    #[test]
    fn test_load_first_without_files_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let candidates = vec![
            dir.path().join(CONFIG_FILE),
            dir.path().join(CONFIG_DIR).join(CONFIG_FILE),
        ];
        assert_eq!(Config::load_first(&candidates).unwrap(), Config::default());
        assert_eq!(Config::load_first(&[]).unwrap(), Config::default());
    }

    #[test]
    fn test_default_paths_order() {
        let paths = default_paths();
        assert_eq!(paths[0], PathBuf::from(CONFIG_FILE));
        if let Some(global) = global_path() {
            assert_eq!(paths[1], global);
            assert!(global.ends_with(Path::new(CONFIG_DIR).join(CONFIG_FILE)));
        }
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{token").unwrap();

        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(
            Some("flag-token".to_string()),
            Some("https://dns.example:53443/".to_string()),
        );
        assert_eq!(config.token, "flag-token");
        assert_eq!(config.host(), "https://dns.example:53443");

        let untouched = Config::default().with_overrides(None, Some("  ".to_string()));
        assert_eq!(untouched.host, DEFAULT_HOST);
    }

    #[test]
    fn test_write_initial_creates_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_DIR).join(CONFIG_FILE);

        let outcome = write_initial(&path).unwrap();
        assert!(matches!(outcome, InitOutcome::Created(_)));

        let written: Config =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written, Config::default());
        assert!(std::fs::read_to_string(&path)
            .unwrap()
            .contains("  \"host\": \"http://localhost:5380\""));

        std::fs::write(&path, r#"{"token": "keep"}"#).unwrap();
        let outcome = write_initial(&path).unwrap();
        assert_eq!(outcome, InitOutcome::AlreadyExists(path.clone()));
        assert!(std::fs::read_to_string(&path).unwrap().contains("keep"));
    }
}
