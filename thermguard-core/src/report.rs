//! Per-tick status report
//!
//! One report per control tick, whether or not the sensors answered. The
//! text form is for humans and logs; the serde form (feature `serde`) is
//! what the daemon prints with `--json`. Field meaning is stable, the
//! text layout is not.

use core::fmt;

use crate::controller::{HoldReason, MitigationPhase, TransitionOutcome};
use crate::errors::ControlError;
use crate::time::Timestamp;

/// What happened during one tick
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusReport {
    /// Controller time when the decision was taken (ms)
    pub timestamp: Timestamp,
    /// Measured temperature (°C), if it was readable
    pub temperature: Option<f32>,
    /// Measured frequency (GHz), if it was readable
    pub frequency_ghz: Option<f32>,
    /// Utilization fed to the power model, after clamping
    pub utilization: Option<f32>,
    /// Estimated power (W)
    pub power: Option<f32>,
    /// Predicted temperature one interval ahead (°C)
    pub predicted: Option<f32>,
    /// Measured minus last tick's prediction (°C)
    pub prediction_error: Option<f32>,
    /// State after this tick
    pub phase: MitigationPhase,
    /// Prediction above the critical watermark
    pub critical: bool,
    /// What the controller did
    pub outcome: TransitionOutcome,
    /// Sensor or actuator failure seen this tick
    pub error: Option<ControlError>,
}

impl StatusReport {
    /// True when the tick ran the model (sensors answered)
    pub fn has_prediction(&self) -> bool {
        self.predicted.is_some()
    }
}

impl fmt::Display for MitigationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => f.write_str("normal"),
            Self::Mitigating => f.write_str("mitigating"),
        }
    }
}

impl fmt::Display for HoldReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeadBand => f.write_str("dead band"),
            Self::Cooldown { remaining_ms } => write!(f, "cooldown {} ms", remaining_ms),
        }
    }
}

impl fmt::Display for TransitionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => f.write_str("steady"),
            Self::Held(reason) => write!(f, "held ({})", reason),
            Self::Enabled { original_khz, reduced_khz } => {
                write!(f, "ENABLED {} -> {} kHz", original_khz, reduced_khz)
            }
            Self::Disabled { restored_khz: Some(khz) } => write!(f, "DISABLED, restored {} kHz", khz),
            Self::Disabled { restored_khz: None } => f.write_str("DISABLED, nothing to restore"),
            Self::Failed(err) => write!(f, "failed ({})", err),
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.temperature, self.predicted) {
            (Some(t), Some(p)) => write!(f, "T={:.2}°C | T_pred={:.2}°C", t, p)?,
            (Some(t), None) => write!(f, "T={:.2}°C | T_pred=n/a", t)?,
            (None, _) => f.write_str("T=n/a | T_pred=n/a")?,
        }
        match self.frequency_ghz {
            Some(freq) => write!(f, " | f={:.2} GHz", freq)?,
            None => f.write_str(" | f=n/a")?,
        }
        if let Some(power) = self.power {
            write!(f, " | P={:.2} W", power)?;
        }
        write!(f, " | {} | {}", self.phase, self.outcome)?;
        if self.critical {
            f.write_str(" | CRITICAL")?;
        }
        // Actuator failures are already printed by the outcome
        if let Some(err) = self.error.filter(ControlError::is_sensor) {
            write!(f, " | safe mode: {}", err)?;
        }
        Ok(())
    }
}
