// Layered configuration loading

use std::path::Path;

use config::{Config, File, FileFormat};

use crate::error::{ConfigError, ConfigResult};
use crate::{PadTomlConfig, validate_config};

/// Built-in defaults, the user file is merged on top of it
pub const DEFAULT_PAD_TOML: &str = include_str!("default_config/pad.toml");

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate a pad configuration.
    ///
    /// The user file is first parsed alone so that syntax errors point to
    /// the user's file, then merged over [`DEFAULT_PAD_TOML`].
    ///
    /// ```no_run
    /// use cuepad_config::ConfigLoader;
    ///
    /// let config = ConfigLoader::load("pad.toml").unwrap();
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<PadTomlConfig> {
        let path = path.as_ref();
        Self::check_user_config(path)?;
        let config = Self::merge_configs(DEFAULT_PAD_TOML, path)?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Parse the user file on its own
    fn check_user_config(path: &Path) -> ConfigResult<PadTomlConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
            path: path.display().to_string(),
            message: e.message().to_string(),
        })
    }

    /// Merge defaults with the user file
    fn merge_configs(default_str: &str, user_path: &Path) -> ConfigResult<PadTomlConfig> {
        Config::builder()
            .add_source(File::from_str(default_str, FileFormat::Toml))
            .add_source(File::from(user_path).format(FileFormat::Toml))
            .build()
            .map_err(|e| ConfigError::Merge { message: e.to_string() })?
            .try_deserialize()
            .map_err(|e| ConfigError::Merge { message: e.to_string() })
    }
}
