use std::{
    fs::{OpenOptions, create_dir_all, read_to_string},
    io::Write,
    path::{Path, PathBuf},
};

use camwin_bridge::Config;
use directories::ProjectDirs;

/// Errors that can occur while loading or resolving application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to determine the user's configuration directory. This usually
    /// occurs when required environment variables are missing (e.g., `$HOME`
    /// on Unix or `%APPDATA%` on Windows).
    #[error("failed to obtain user's directories")]
    DirectoriesNotFound,
    /// An I/O error occurred while reading or writing the configuration file.
    #[error("failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    /// The configuration file contains invalid TOML or does not match the
    /// expected structure.
    #[error("failed to deserialize config: {0}")]
    DeserializeError(#[from] toml::de::Error),
    /// Failed to serialize the configuration to TOML.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Path of `config.toml` in the user's configuration directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    match ProjectDirs::from("dev", "camwin", "camwin") {
        Some(dirs) => Ok(dirs.config_dir().join("config.toml")),
        None => Err(ConfigError::DirectoriesNotFound),
    }
}

/// Loads the configuration from `path`, or from the user's configuration
/// directory when `path` is `None`. A missing file is created with default
/// values. Returns the loaded config and the path it belongs to.
pub fn load_config(path: Option<&Path>) -> Result<(Config, PathBuf), ConfigError> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    log::info!("Loading configuration from {config_path:?}");
    if config_path.exists() {
        let contents = read_to_string(&config_path)?;
        let mut config: Config = toml::from_str(&contents)?;
        normalize(&mut config);
        return Ok((config, config_path));
    }

    let config = Config::default();
    if let Some(parent) = config_path.parent() {
        create_dir_all(parent)?;
    }

    let contents = toml::to_string_pretty(&config)?;
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&config_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    Ok((config, config_path))
}

/// Saves `config` as pretty-printed TOML to `path`, overwriting any
/// existing file.
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    let contents = toml::to_string_pretty(config)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;

    log::info!("Saved configuration to {path:?}");
    Ok(())
}

/// Raises values the driver cannot work with to their smallest usable value.
pub fn normalize(config: &mut Config) {
    if config.capture.interval_seconds == 0 {
        log::warn!("Caption interval of 0 seconds is not allowed, using 1 second");
        config.capture.interval_seconds = 1;
    }
    if config.display.max_captions == 0 {
        log::warn!("max_captions of 0 is not allowed, keeping 1 caption");
        config.display.max_captions = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("camwin-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = scratch_dir("create");
        let path = dir.join("nested").join("config.toml");

        let (config, loaded_from) = load_config(Some(&path)).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(loaded_from, path);
        assert!(path.exists());

        // the second load reads the file that was just written
        let (again, _) = load_config(Some(&path)).unwrap();
        assert_eq!(again, config);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn saved_values_are_loaded_back() {
        let dir = scratch_dir("save");
        let path = dir.join("config.toml");

        let mut config = Config::default();
        config.capture.camera_index = 2;
        config.capture.dual_text = true;
        config.display.font_size = 32;
        save_config(&config, &path).unwrap();

        let (loaded, _) = load_config(Some(&path)).unwrap();
        assert_eq!(loaded, config);
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = scratch_dir("invalid");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[capture\ninterval_seconds = ").unwrap();

        assert!(matches!(
            load_config(Some(&path)),
            Err(ConfigError::DeserializeError(_))
        ));
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn zero_values_are_raised() {
        let mut config = Config::default();
        config.capture.interval_seconds = 0;
        config.display.max_captions = 0;
        normalize(&mut config);
        assert_eq!(config.capture.interval_seconds, 1);
        assert_eq!(config.display.max_captions, 1);
    }
}
