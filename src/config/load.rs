use super::{default_settings_path, ConfigError, Settings};
use std::path::Path;

/// Loads and validates settings. An explicit path must exist; the default
/// path falls back to built-in defaults when absent.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, ConfigError> {
    let settings = match explicit {
        Some(path) => Settings::from_path(path)?,
        None => {
            let path = default_settings_path()?;
            if path.exists() {
                Settings::from_path(&path)?
            } else {
                Settings::default()
            }
        }
    };
    settings.validate()?;
    Ok(settings)
}
