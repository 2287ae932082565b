// SPDX-License-Identifier: MPL-2.0
//! This module handles the client's configuration, loading user preferences
//! from a `settings.toml` file.
//!
//! # Configuration Sections
//!
//! - `[general]` - Interface language
//! - `[server]` - Base URL and request timeouts
//! - `[similarity]` - Default similarity lookup
//! - `[downloads]` - Where downloaded images are written
//! - `[notifications]` - Toast display duration
//!
//! Every field is optional. Missing values fall back to [`defaults`], and
//! out-of-range values are clamped when read through the accessors.
//!
//! # Examples
//!
//! ```no_run
//! use gallery_lens::config;
//!
//! // Load existing configuration (returns tuple with optional warning)
//! let (config, _warning) = config::load();
//!
//! let settings = config.server.client_settings();
//! println!("{}", settings.base_url);
//! ```

pub mod defaults;

use crate::app::paths;
use crate::domain::notification::keys;
use crate::domain::similarity::{Descriptor, SimilarityQuery};
use crate::error::Result;
use crate::infrastructure::http::ClientSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use defaults::*;

const CONFIG_FILE: &str = "settings.toml";

// =============================================================================
// Section Structs
// =============================================================================

/// General client settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GeneralConfig {
    /// UI language code (e.g., "en-US", "fr").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Image service connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address of the image service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Timeout of metadata requests, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// Timeout of filter and object requests, in seconds. Unset means none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_timeout_secs: Option<u64>,
}

impl ServerConfig {
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        let ms = self
            .timeout_ms
            .unwrap_or(DEFAULT_TIMEOUT_MS)
            .clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS);
        Duration::from_millis(ms)
    }

    #[must_use]
    pub fn processing_timeout(&self) -> Option<Duration> {
        self.processing_timeout_secs.map(|secs| {
            Duration::from_secs(
                secs.clamp(MIN_PROCESSING_TIMEOUT_SECS, MAX_PROCESSING_TIMEOUT_SECS),
            )
        })
    }

    /// Settings for [`crate::infrastructure::http::RemoteClient::new`].
    #[must_use]
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.base_url().to_string(),
            timeout: self.timeout(),
            processing_timeout: self.processing_timeout(),
        }
    }
}

/// Default similarity lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimilarityConfig {
    /// Number of similar images requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,

    /// Histogram compared by the lookup (`hshist` or `rgbhist`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descriptor: Option<Descriptor>,
}

impl SimilarityConfig {
    #[must_use]
    pub fn query(&self) -> SimilarityQuery {
        SimilarityQuery {
            count: self
                .count
                .unwrap_or(DEFAULT_SIMILAR_COUNT)
                .clamp(MIN_SIMILAR_COUNT, MAX_SIMILAR_COUNT),
            descriptor: self.descriptor.unwrap_or_default(),
        }
    }
}

/// Download destination.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadsConfig {
    /// Directory downloads are written into.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

impl DownloadsConfig {
    /// Resolved download directory, honoring CLI and environment overrides.
    #[must_use]
    pub fn directory(&self) -> PathBuf {
        paths::get_download_dir(self.directory.clone())
    }
}

/// Toast settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationsConfig {
    /// Seconds a toast stays visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toast_secs: Option<u64>,
}

impl NotificationsConfig {
    #[must_use]
    pub fn toast_duration(&self) -> Duration {
        Duration::from_secs(
            self.toast_secs
                .unwrap_or(DEFAULT_TOAST_SECS)
                .clamp(MIN_TOAST_SECS, MAX_TOAST_SECS),
        )
    }
}

/// Complete client configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub similarity: SimilarityConfig,
    #[serde(default)]
    pub downloads: DownloadsConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// =============================================================================
// Config Path Resolution
// =============================================================================

/// Returns the config file path with an optional override.
fn get_config_path_with_override(base_dir: Option<PathBuf>) -> Option<PathBuf> {
    paths::get_app_config_dir_with_override(base_dir).map(|mut path| {
        path.push(CONFIG_FILE);
        path
    })
}

// =============================================================================
// Load Functions
// =============================================================================

/// Loads the configuration from the default path.
///
/// Returns a tuple of (config, optional_warning). If loading fails, returns
/// the default config with the message key of the warning to show.
pub fn load() -> (Config, Option<String>) {
    load_with_override(None)
}

/// Loads the configuration from a custom directory.
pub fn load_with_override(base_dir: Option<PathBuf>) -> (Config, Option<String>) {
    if let Some(path) = get_config_path_with_override(base_dir) {
        if path.exists() {
            match load_from_path(&path) {
                Ok(config) => return (config, None),
                Err(err) => {
                    log::warn!("Ignoring {}: {err}", path.display());
                    return (Config::default(), Some(keys::CONFIG_LOAD_ERROR.to_string()));
                }
            }
        }
    }
    (Config::default(), None)
}

/// Loads the configuration from an explicit file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn load_from_path_reads_every_section() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(
            &config_path,
            r#"
[general]
language = "fr"

[server]
base_url = "http://gallery.local:9000/api/"
timeout_ms = 2000
processing_timeout_secs = 120

[similarity]
count = 12
descriptor = "rgbhist"

[downloads]
directory = "/tmp/gallery"

[notifications]
toast_secs = 5
"#,
        )
        .expect("write file");

        let config = Config {
            general: GeneralConfig {
                language: Some("fr".to_string()),
            },
            server: ServerConfig {
                base_url: Some("http://gallery.local:9000/api/".to_string()),
                timeout_ms: Some(2_000),
                processing_timeout_secs: Some(120),
            },
            similarity: SimilarityConfig {
                count: Some(12),
                descriptor: Some(Descriptor::Rgb),
            },
            downloads: DownloadsConfig {
                directory: Some(PathBuf::from("/tmp/gallery")),
            },
            notifications: NotificationsConfig {
                toast_secs: Some(5),
            },
        };

        let loaded = load_from_path(&config_path).expect("load should succeed");

        assert_eq!(loaded, config);
    }

    #[test]
    fn load_from_path_invalid_toml_errors() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "this is not valid toml").expect("write file");

        assert!(matches!(load_from_path(&config_path), Err(Error::Config(_))));
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_sections() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let config_path = temp_dir.path().join("settings.toml");
        fs::write(&config_path, "[similarity]\ndescriptor = \"rgbhist\"\n").expect("write file");

        let loaded = load_from_path(&config_path).expect("load should succeed");
        assert_eq!(loaded.server, ServerConfig::default());
        assert_eq!(
            loaded.similarity.query(),
            SimilarityQuery {
                count: DEFAULT_SIMILAR_COUNT,
                descriptor: Descriptor::Rgb,
            }
        );
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        let settings = config.server.client_settings();

        assert_eq!(settings.base_url, DEFAULT_BASE_URL);
        assert_eq!(settings.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(settings.processing_timeout, None);
        assert_eq!(config.similarity.query(), SimilarityQuery::default());
        assert_eq!(
            config.notifications.toast_duration(),
            Duration::from_secs(DEFAULT_TOAST_SECS)
        );
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let server = ServerConfig {
            base_url: Some("   ".to_string()),
            timeout_ms: Some(1),
            processing_timeout_secs: Some(u64::MAX),
        };
        assert_eq!(server.base_url(), DEFAULT_BASE_URL);
        assert_eq!(server.timeout(), Duration::from_millis(MIN_TIMEOUT_MS));
        assert_eq!(
            server.processing_timeout(),
            Some(Duration::from_secs(MAX_PROCESSING_TIMEOUT_SECS))
        );

        let similarity = SimilarityConfig {
            count: Some(0),
            descriptor: None,
        };
        assert_eq!(similarity.query().count, MIN_SIMILAR_COUNT);

        let notifications = NotificationsConfig {
            toast_secs: Some(600),
        };
        assert_eq!(
            notifications.toast_duration(),
            Duration::from_secs(MAX_TOAST_SECS)
        );
    }

    #[test]
    fn load_with_override_reads_settings_file() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        fs::write(base_dir.join("settings.toml"), "[server]\ntimeout_ms = 4000\n")
            .expect("write file");

        let (loaded, warning) = load_with_override(Some(base_dir));
        assert!(warning.is_none(), "load should succeed without warning");
        assert_eq!(loaded.server.timeout_ms, Some(4_000));
    }

    #[test]
    fn load_with_override_from_empty_directory_returns_default() {
        let temp_dir = tempdir().expect("failed to create temp dir");

        let (config, warning) = load_with_override(Some(temp_dir.path().to_path_buf()));
        assert!(warning.is_none(), "should not warn for missing file");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_with_override_from_corrupted_file_returns_default_with_warning() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let base_dir = temp_dir.path().to_path_buf();
        fs::write(base_dir.join("settings.toml"), "not = valid = toml").expect("write file");

        let (config, warning) = load_with_override(Some(base_dir));
        assert_eq!(warning.as_deref(), Some("notification-config-load-error"));
        assert_eq!(config, Config::default());
    }
}
