//! Loading evaluation specs from YAML files

use super::schema::EvalSpec;
use super::validate::validate_spec;
use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Load and validate an evaluation spec from a YAML file
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<EvalSpec> {
    let yaml_content = fs::read_to_string(config_path.as_ref()).map_err(|e| {
        Error::ConfigError(format!(
            "Failed to read config file {}: {}",
            config_path.as_ref().display(),
            e
        ))
    })?;

    let spec: EvalSpec = serde_yaml::from_str(&yaml_content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse YAML config: {e}")))?;

    validate_spec(&spec).map_err(|e| Error::ConfigError(format!("Invalid config: {e}")))?;

    log::debug!(
        "loaded eval spec for task {} from {}",
        spec.task,
        config_path.as_ref().display()
    );
    Ok(spec)
}
