use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one satellite profile, no duplicate NORAD ids
/// - The three color channels extract distinct APIDs
/// - Stager buffer size is not 0
/// - Compositor path is not empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.satellites.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one [[satellites]] entry is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for profile in &config.satellites {
        if !seen.insert(profile.norad_id) {
            return Err(ConfigError::ValidationError(format!(
                "satellite {} is configured more than once",
                profile.norad_id
            )));
        }
    }

    if !config.channels.has_distinct_apids() {
        return Err(ConfigError::ValidationError(
            "channels.red_apid, green_apid and blue_apid must differ".to_string(),
        ));
    }

    if config.stager.buffer_size == 0 {
        return Err(ConfigError::ValidationError(
            "stager.buffer_size cannot be 0".to_string(),
        ));
    }

    if config.tools.compositor.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "tools.compositor cannot be empty".to_string(),
        ));
    }

    Ok(())
}
