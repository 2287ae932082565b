// SPDX-License-Identifier: MPL-2.0
//! Centralized path management for application directories.
//!
//! # Path Resolution Order
//!
//! Paths are resolved in the following priority order:
//! 1. **Explicit override** - parameter to `_with_override()` functions (for tests)
//! 2. **CLI arguments** (`--config-dir`, `--download-dir`) - set via [`init_cli_overrides`]
//! 3. **Environment variables** (`GALLERY_LENS_CONFIG_DIR`, `GALLERY_LENS_DOWNLOAD_DIR`)
//! 4. **Settings file** - `[downloads] directory` (download directory only)
//! 5. **Platform default** - via `dirs` crate
//!
//! # Usage
//!
//! CLI overrides should be initialized once at startup:
//! ```ignore
//! paths::init_cli_overrides(flags.config_dir, flags.download_dir);
//! ```

use std::path::PathBuf;
use std::sync::OnceLock;

/// Application name used for directory naming.
const APP_NAME: &str = "GalleryLens";

/// Environment variable to override the config directory.
pub const ENV_CONFIG_DIR: &str = "GALLERY_LENS_CONFIG_DIR";

/// Environment variable to override the download directory.
pub const ENV_DOWNLOAD_DIR: &str = "GALLERY_LENS_DOWNLOAD_DIR";

/// Global CLI override for config directory (set once at startup).
static CLI_CONFIG_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Global CLI override for download directory (set once at startup).
static CLI_DOWNLOAD_DIR: OnceLock<Option<PathBuf>> = OnceLock::new();

/// Initializes CLI overrides for config and download directories.
///
/// Only the first call has an effect; later calls are logged and ignored.
pub fn init_cli_overrides(config_dir: Option<String>, download_dir: Option<String>) {
    if CLI_CONFIG_DIR.set(config_dir.map(PathBuf::from)).is_err() {
        log::warn!("CLI config dir override already initialized");
    }
    if CLI_DOWNLOAD_DIR.set(download_dir.map(PathBuf::from)).is_err() {
        log::warn!("CLI download dir override already initialized");
    }
}

fn get_cli_config_dir() -> Option<PathBuf> {
    CLI_CONFIG_DIR.get().and_then(Clone::clone)
}

fn get_cli_download_dir() -> Option<PathBuf> {
    CLI_DOWNLOAD_DIR.get().and_then(Clone::clone)
}

fn env_dir(name: &str) -> Option<PathBuf> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Returns the application config directory path.
///
/// - Linux: `~/.config/GalleryLens/`
/// - macOS: `~/Library/Application Support/GalleryLens/`
/// - Windows: `C:\Users\<User>\AppData\Roaming\GalleryLens\`
///
/// Returns `None` if the config directory cannot be determined.
pub fn get_app_config_dir() -> Option<PathBuf> {
    get_app_config_dir_with_override(None)
}

/// Returns the application config directory path with an optional override.
pub fn get_app_config_dir_with_override(override_path: Option<PathBuf>) -> Option<PathBuf> {
    override_path
        .or_else(get_cli_config_dir)
        .or_else(|| env_dir(ENV_CONFIG_DIR))
        .or_else(|| {
            dirs::config_dir().map(|mut path| {
                path.push(APP_NAME);
                path
            })
        })
}

/// Returns the directory downloads are saved into.
///
/// `configured` is the `[downloads] directory` setting. When nothing else
/// applies, the platform download directory is used, or `./downloads` if
/// the platform has none.
pub fn get_download_dir(configured: Option<PathBuf>) -> PathBuf {
    get_download_dir_with_override(None, configured)
}

/// Returns the download directory with an optional override.
pub fn get_download_dir_with_override(
    override_path: Option<PathBuf>,
    configured: Option<PathBuf>,
) -> PathBuf {
    override_path
        .or_else(get_cli_download_dir)
        .or_else(|| env_dir(ENV_DOWNLOAD_DIR))
        .or(configured)
        .or_else(|| {
            dirs::download_dir().map(|mut path| {
                path.push(APP_NAME);
                path
            })
        })
        .unwrap_or_else(|| PathBuf::from("downloads"))
}
