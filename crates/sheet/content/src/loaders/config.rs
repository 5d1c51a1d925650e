//! Sheet configuration loader.

use std::path::Path;

use sheet_core::SheetConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`SheetConfig`] from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> LoadResult<SheetConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<SheetConfig> {
        let config: SheetConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("limitation_floor_percent = -75\n").unwrap();
        assert_eq!(config.limitation_floor_percent, -75);
        assert_eq!(config.indent_width, SheetConfig::DEFAULT_INDENT_WIDTH);
    }

    #[test]
    fn empty_config_is_default() {
        assert_eq!(ConfigLoader::parse("").unwrap(), SheetConfig::default());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = ConfigLoader::parse("indent_width = \"wide\"").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config TOML"));
    }
}
