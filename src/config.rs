use crate::error::{MirrorError, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MIRRORLIST_URL: &str = "https://xmirror.voidlinux.org/v0/mirrors.json";
pub const DEFAULT_PACKAGE: &str = "runit-2.2.0_2.x86_64.xbps";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_MAX_REDIRECTS: u32 = 3;

/// Runtime settings for fetching and benchmarking.
///
/// Every key is optional in the config file; missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mirrorlist_url: String,
    /// Package file fetched from `<mirror>/current/` to measure throughput
    pub package: String,
    pub timeout_secs: u64,
    /// Upper bound on requests per probe, redirects included
    pub max_redirects: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mirrorlist_url: DEFAULT_MIRRORLIST_URL.to_string(),
            package: DEFAULT_PACKAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }
}

impl Config {
    /// Load the configuration.
    /// Strategy:
    /// 1. An explicit path must exist and parse
    /// 2. Otherwise try ~/.config/xrankmirror/config.toml
    /// 3. Fallback to built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(MirrorError::Config("timeout_secs must be greater than 0".into()));
        }
        if self.max_redirects == 0 {
            return Err(MirrorError::Config("max_redirects must be greater than 0".into()));
        }
        if self.package.trim().is_empty() {
            return Err(MirrorError::Config("package must not be empty".into()));
        }
        crate::http::parse_http_url(&self.mirrorlist_url)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Path appended to each mirror's base URL
    pub fn package_path(&self) -> String {
        format!("/current/{}", self.package.trim_start_matches('/'))
    }
}

fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "xrankmirror").map(|dirs| dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.package_path(), "/current/runit-2.2.0_2.x86_64.xbps");
    }

    #[test]
    fn test_partial_file_keeps_defaults() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_redirects = 5\npackage = \"xbps-0.59_1.x86_64.xbps\"\n")?;

        let config = Config::load(Some(&path))?;
        assert_eq!(config.max_redirects, 5);
        assert_eq!(config.package, "xbps-0.59_1.x86_64.xbps");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.mirrorlist_url, DEFAULT_MIRRORLIST_URL);
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let dir = tempdir().unwrap();
        let res = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(res, Err(MirrorError::Io(_))));
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "timeout_secs = \"soon\"").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(MirrorError::TomlDe(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_timeout = Config {
            timeout_secs: 0,
            ..Config::default()
        };
        assert!(matches!(zero_timeout.validate(), Err(MirrorError::Config(_))));

        let zero_redirects = Config {
            max_redirects: 0,
            ..Config::default()
        };
        assert!(matches!(zero_redirects.validate(), Err(MirrorError::Config(_))));

        let ftp = Config {
            mirrorlist_url: "ftp://example.org/mirrors.json".into(),
            ..Config::default()
        };
        assert!(matches!(ftp.validate(), Err(MirrorError::UnsupportedScheme(_))));
    }
}
