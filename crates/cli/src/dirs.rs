//! Platform-specific directory utilities

use std::path::PathBuf;

/// Get the platform-specific config directory for sheet tools
///
/// Follows platform conventions:
/// - macOS: `~/Library/Application Support/sheet`
/// - Linux: `~/.config/sheet` (or `$XDG_CONFIG_HOME/sheet`)
/// - Windows: `%APPDATA%\sheet\config`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "sheet").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default location of the config file, if the platform has a config dir.
pub fn default_config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}
