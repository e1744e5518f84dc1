//! Host Connectors for ThermGuard
//!
//! ## Overview
//!
//! `thermguard-core` only talks to the outside world through its port
//! traits. This crate backs those ports with the Linux interfaces a stock
//! kernel exposes:
//!
//! | Port          | Backing file                                              | Unit          |
//! |---------------|-----------------------------------------------------------|---------------|
//! | temperature   | `/sys/class/thermal/thermal_zone0/temp`                   | millidegree C |
//! | frequency     | `/sys/devices/system/cpu/cpu0/cpufreq/scaling_cur_freq`   | kHz           |
//! | ceiling (r/w) | `/sys/devices/system/cpu/cpu0/cpufreq/scaling_max_freq`   | kHz           |
//!
//! Every path can be redirected, which is how the tests run against a fake
//! sysfs tree in a temp directory.
//!
//! It also holds the JSON config file loader used by the `thermguard`
//! daemon.
//!
//! ## Errors
//!
//! Connector failures carry owned context ([`ConnectorError`]) and are
//! logged where they happen. At the port boundary they collapse into the
//! core's [`ControlError`] kinds, which only carry a static reason.
//!
//! ## Example Usage
//!
//! ```no_run
//! use thermguard_connectors::sysfs::{SysfsActuator, SysfsSensor};
//! use thermguard_core::{time::MonotonicClock, ConstantUtilization, ControlLoop, ControllerConfig};
//!
//! let control = ControlLoop::new(
//!     ControllerConfig::default(),
//!     SysfsSensor::default(),
//!     SysfsActuator::default(),
//!     ConstantUtilization::default(),
//!     MonotonicClock::new(),
//! )?;
//! # Ok::<(), thermguard_core::ConfigError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config_file;
pub mod sysfs;

pub use config_file::load_config;
pub use sysfs::{SysfsActuator, SysfsPaths, SysfsSensor};

use std::path::{Path, PathBuf};

use thermguard_core::{ControlError, SensorChannel};
use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// File could not be opened, read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File contents were not what the kernel interface promises
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },

    /// Configuration rejected
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConnectorError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn parse(path: &Path, message: impl Into<String>) -> Self {
        Self::Parse { path: path.to_path_buf(), message: message.into() }
    }

    /// Static reason used when handing the error to the core
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Io { source, .. } => match source.kind() {
                std::io::ErrorKind::NotFound => "file not found",
                std::io::ErrorKind::PermissionDenied => "permission denied",
                _ => "i/o error",
            },
            Self::Parse { .. } => "unparseable value",
            Self::Config(_) => "invalid configuration",
        }
    }

    /// As a sensor failure on `channel`
    pub fn into_sensor_error(self, channel: SensorChannel) -> ControlError {
        ControlError::SensorUnavailable { channel, reason: self.reason() }
    }
}

/// Result alias for connector operations
pub type ConnectorResult<T> = Result<T, ConnectorError>;
