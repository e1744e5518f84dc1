//! JSON configuration files
//!
//! Any field may be left out and takes its built-in default, so a file
//! only needs the values it changes:
//!
//! ```json
//! {
//!   "thermal": { "capacitance": 12.5 },
//!   "thresholds": { "high_watermark": 80.0, "low_watermark": 72.0 },
//!   "policy": { "restore_on_shutdown": true }
//! }
//! ```
//!
//! The result is validated before it is returned.

use std::fs;
use std::path::Path;

use log::info;
use thermguard_core::ControllerConfig;

use crate::{ConnectorError, ConnectorResult};

/// Read, parse and validate a config file
pub fn load_config(path: impl AsRef<Path>) -> ConnectorResult<ControllerConfig> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|err| ConnectorError::io(path, err))?;
    let config = parse_config(&raw).map_err(|err| match err {
        ConnectorError::Parse { message, .. } => ConnectorError::parse(path, message),
        other => other,
    })?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parse and validate config JSON
pub fn parse_config(json: &str) -> ConnectorResult<ControllerConfig> {
    let config: ControllerConfig = serde_json::from_str(json)
        .map_err(|err| ConnectorError::parse(Path::new("<config>"), err.to_string()))?;
    config
        .validate()
        .map_err(|err| ConnectorError::Config(err.to_string()))?;
    Ok(config)
}
