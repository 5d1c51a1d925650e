//! Config file resolution.

use anyhow::Result;
use sheet_content::ConfigLoader;
use sheet_core::SheetConfig;
use std::path::{Path, PathBuf};

use crate::dirs;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "SHEET_CONFIG";

/// Load the config: `--config`, then `$SHEET_CONFIG`, then the platform file
/// when present, else defaults.
pub fn resolve(flag: Option<&Path>) -> Result<SheetConfig> {
    let env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    resolve_from(flag, env.as_deref(), dirs::default_config_file().as_deref())
}

fn resolve_from(
    flag: Option<&Path>,
    env: Option<&Path>,
    platform: Option<&Path>,
) -> Result<SheetConfig> {
    if let Some(path) = flag.or(env) {
        tracing::debug!(path = %path.display(), "Loading config");
        return ConfigLoader::load(path);
    }
    match platform {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading platform config");
            ConfigLoader::load(path)
        }
        _ => Ok(SheetConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn config_file(floor: i32) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "limitation_floor_percent = {floor}").unwrap();
        file
    }

    #[test]
    fn flag_wins_over_env() {
        let flag = config_file(-50);
        let env = config_file(-70);
        let config = resolve_from(Some(flag.path()), Some(env.path()), None).unwrap();
        assert_eq!(config.limitation_floor_percent, -50);
    }

    #[test]
    fn env_wins_over_platform() {
        let env = config_file(-70);
        let platform = config_file(-90);
        let config = resolve_from(None, Some(env.path()), Some(platform.path())).unwrap();
        assert_eq!(config.limitation_floor_percent, -70);
    }

    #[test]
    fn absent_platform_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.toml");
        let config = resolve_from(None, None, Some(&missing)).unwrap();
        assert_eq!(config, SheetConfig::default());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(resolve_from(Some(&missing), None, None).is_err());
    }
}
