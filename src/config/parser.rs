use crate::config::types::Settings;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(Settings)` - Successfully loaded and validated settings
/// * `Err(ConfigError)` - Failed to read, parse, or validate the settings
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use urlsdigest::config::load_settings;
///
/// let settings = load_settings(Path::new("urlsdigest.toml")).unwrap();
/// println!("Engine: {:?}", settings.crawler.engine);
/// ```
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let settings: Settings = toml::from_str(&content)?;

    validate(&settings)?;

    Ok(settings)
}
