//! Configuration validation utilities.

use std::collections::HashSet;

use vessel_core::BUILTIN_EXTRACTORS;

use super::error::{ConfigError, ConfigResult};
use super::schema::{ExtractorsConfig, LogOutput, LoggingConfig, VesselConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &VesselConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_extractors_config(&config.extractors)?;
    Ok(())
}

/// Validates logging settings.
fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File {
        if logging.file_path.is_none() {
            return Err(ConfigError::missing_field("logging.file_path"));
        }
        if logging.max_files == 0 {
            return Err(ConfigError::validation("logging.max_files must be greater than 0"));
        }
    }

    if let Some(module) = logging.filters.keys().find(|module| module.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Empty module name in logging.filters: {module:?}"
        )));
    }

    Ok(())
}

/// Disabled names must match a built-in extractor, each at most once.
fn validate_extractors_config(extractors: &ExtractorsConfig) -> ConfigResult<()> {
    let mut seen = HashSet::new();

    for name in &extractors.disabled {
        if !BUILTIN_EXTRACTORS.iter().any(|builtin| builtin.name() == name) {
            return Err(ConfigError::UnknownExtractor(name.clone()));
        }
        if !seen.insert(name.as_str()) {
            return Err(ConfigError::validation(format!(
                "Extractor '{name}' is disabled more than once"
            )));
        }
    }

    Ok(())
}
