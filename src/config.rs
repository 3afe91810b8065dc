//! Configuration for commit-html.
//!
//! Settings are read from `~/.config/commit-html/config.toml`. Every field is
//! optional; command line flags take precedence over the file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const APP_NAME: &str = "commit-html";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the viewer assets are cached. Defaults to the user cache dir.
    pub asset_dir: Option<PathBuf>,
    /// Bounded wait for static rendering.
    pub render_timeout_ms: u64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Chrome/Chromium binary. Auto-detected when unset.
    pub chrome_path: Option<PathBuf>,
    /// Chrome refuses to start sandboxed as root; containers and CI
    /// usually need this off.
    pub chrome_sandbox: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_dir: None,
            render_timeout_ms: 5000,
            viewport_width: 1280,
            viewport_height: 900,
            chrome_path: None,
            chrome_sandbox: true,
        }
    }
}

impl Config {
    /// Asset cache directory, falling back to `<cache dir>/commit-html/assets`
    pub fn asset_dir(&self) -> PathBuf {
        self.asset_dir.clone().unwrap_or_else(default_asset_dir)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_millis(self.render_timeout_ms)
    }
}

/// Returns the path to the config file: `~/.config/commit-html/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME).join("config.toml"))
}

fn default_asset_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join("assets")
}

/// Load configuration from disk. Returns default if file is missing or invalid.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => parse(&contents).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid config {}: {}", path.display(), e);
            Config::default()
        }),
        Err(_) => Config::default(),
    }
}

fn parse(contents: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render_timeout(), Duration::from_secs(5));
        assert_eq!(config.viewport_width, 1280);
        assert!(config.chrome_path.is_none());
        assert!(config.chrome_sandbox);
        assert!(config.asset_dir().ends_with("commit-html/assets"));
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = Config {
            asset_dir: Some(PathBuf::from("/tmp/assets")),
            render_timeout_ms: 750,
            viewport_width: 800,
            viewport_height: 600,
            chrome_path: Some(PathBuf::from("/usr/bin/chromium")),
            chrome_sandbox: false,
        };

        let toml_str = toml::to_string(&config).unwrap();
        let parsed = parse(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let partial = r#"
            asset_dir = "/opt/commit-html"
        "#;

        let config = parse(partial).unwrap();
        assert_eq!(config.asset_dir(), PathBuf::from("/opt/commit-html"));
        assert_eq!(config.render_timeout_ms, 5000);
        assert_eq!(config.viewport_height, 900);
    }

    #[test]
    fn test_sandbox_can_be_disabled() {
        let config = parse("chrome_sandbox = false").unwrap();
        assert!(!config.chrome_sandbox);
        assert_eq!(config.render_timeout_ms, 5000);
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        assert!(parse("this is not valid toml {{{{").is_err());
    }
}
