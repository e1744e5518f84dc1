//! Mitigation State Machine
//!
//! ## States
//!
//! ```text
//!              predicted > high  &&  cooldown elapsed
//!   Normal  ─────────────────────────────────────────────▶  Mitigating
//!           ◀─────────────────────────────────────────────
//!              predicted < low   &&  cooldown elapsed
//!              (or sensor failure / non-finite prediction)
//! ```
//!
//! Inside `[low, high]` nothing happens: the dead band is what keeps the
//! controller from chattering when temperature hovers near one threshold.
//!
//! ## Rules
//!
//! - Enabling reads the current ceiling first. A failed or non-positive read
//!   aborts the enable; nothing derived from an invalid base is ever written.
//! - The pre-mitigation ceiling is stored on enable and never overwritten
//!   while mitigating. It is cleared only after a successful restore.
//! - A failed write never completes a transition: a failed enable stays
//!   `Normal`, a failed restore stays `Mitigating` and is retried later.
//! - No two actuator writes happen closer together than the cooldown. Every
//!   write attempt, successful or not, starts a new cooldown window; a
//!   transition that writes nothing leaves the window alone. The shutdown
//!   [`MitigationController::release`] is the one exception.
//! - Sensor failure forces a de-mitigation attempt, still gated by cooldown.
//! - Crossing the critical watermark is report-only.

use crate::config::{MitigationPolicy, SafetyThresholds};
use crate::errors::ControlError;
use crate::ports::ActuatorPort;
use crate::time::{elapsed_ms, Timestamp};

/// Which side of the state machine the controller is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MitigationPhase {
    /// Ceiling untouched by us
    Normal,
    /// Ceiling capped at the reduced value
    Mitigating,
}

/// Controller-owned mitigation state
///
/// Lives as long as the controller. Only the enable/disable transitions
/// mutate it; callers can take it out and hand it back, which is how tests
/// and multiple independent controllers avoid shared globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MitigationState {
    active: bool,
    original_ceiling_khz: Option<u32>,
    last_action: Option<Timestamp>,
}

impl MitigationState {
    /// Not mitigating, no stored ceiling, never acted
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> MitigationPhase {
        if self.active {
            MitigationPhase::Mitigating
        } else {
            MitigationPhase::Normal
        }
    }

    /// Ceiling to restore, if one is held
    pub fn original_ceiling_khz(&self) -> Option<u32> {
        self.original_ceiling_khz
    }

    /// Time of the last actuator write attempt; `None` means never
    pub fn last_action(&self) -> Option<Timestamp> {
        self.last_action
    }
}

/// Why a requested transition did not happen this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "reason", rename_all = "snake_case"))]
pub enum HoldReason {
    /// Prediction sits inside `[low, high]`
    DeadBand,
    /// Last write was too recent
    Cooldown {
        /// Time until the next write is allowed
        remaining_ms: u64,
    },
}

/// What a controller step did
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "action", rename_all = "snake_case"))]
pub enum TransitionOutcome {
    /// Already in the requested state
    Unchanged,
    /// A transition was possible but did not happen
    Held(HoldReason),
    /// Ceiling capped
    Enabled {
        /// Ceiling before mitigation
        original_khz: u32,
        /// Ceiling written
        reduced_khz: u32,
    },
    /// Mitigation released
    Disabled {
        /// Ceiling written back, `None` when no valid one was held
        restored_khz: Option<u32>,
    },
    /// The actuator failed; state did not change
    Failed(ControlError),
}

impl TransitionOutcome {
    /// True when this step wrote to the actuator successfully
    pub fn is_transition(&self) -> bool {
        matches!(self, Self::Enabled { .. } | Self::Disabled { .. })
    }

    pub fn error(&self) -> Option<ControlError> {
        match self {
            Self::Failed(err) => Some(*err),
            _ => None,
        }
    }
}

fn read_failure(err: ControlError) -> ControlError {
    match err {
        ControlError::ActuatorReadFailed { .. } => err,
        _ => ControlError::ActuatorReadFailed { reason: "ceiling read failed" },
    }
}

fn write_failure(err: ControlError, ceiling_khz: u32) -> ControlError {
    match err {
        ControlError::ActuatorWriteFailed { .. } => err,
        _ => ControlError::ActuatorWriteFailed { ceiling_khz, reason: "ceiling write failed" },
    }
}

/// Hysteresis + cooldown controller for the frequency cap
#[derive(Debug, Clone)]
pub struct MitigationController {
    thresholds: SafetyThresholds,
    policy: MitigationPolicy,
    cooldown_ms: u64,
    state: MitigationState,
}

impl MitigationController {
    pub fn new(thresholds: SafetyThresholds, policy: MitigationPolicy) -> Self {
        Self {
            cooldown_ms: thresholds.cooldown_ms(),
            thresholds,
            policy,
            state: MitigationState::new(),
        }
    }

    /// Resume from a previously taken state
    pub fn with_state(mut self, state: MitigationState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &MitigationState {
        &self.state
    }

    /// Give the state back to the caller
    pub fn into_state(self) -> MitigationState {
        self.state
    }

    pub fn thresholds(&self) -> &SafetyThresholds {
        &self.thresholds
    }

    /// Whether the cooldown since the last write has elapsed
    pub fn can_act(&self, now: Timestamp) -> bool {
        self.cooldown_remaining_ms(now) == 0
    }

    /// Time left before the next write is allowed
    pub fn cooldown_remaining_ms(&self, now: Timestamp) -> u64 {
        match self.state.last_action {
            None => 0,
            Some(last) => self.cooldown_ms.saturating_sub(elapsed_ms(last, now)),
        }
    }

    /// Report-only severity flag
    pub fn is_critical(&self, predicted: f32) -> bool {
        predicted > self.thresholds.critical_watermark
    }

    /// Feed one prediction through the state machine
    ///
    /// A non-finite prediction is treated as missing data and takes the
    /// fail-safe path.
    pub fn evaluate<A: ActuatorPort + ?Sized>(
        &mut self,
        predicted: f32,
        now: Timestamp,
        actuator: &mut A,
    ) -> TransitionOutcome {
        if !predicted.is_finite() {
            log_warn!("Prediction unavailable ({}), falling back to fail-safe", predicted);
            return self.fail_safe(now, actuator);
        }

        let wants_mitigation = if predicted > self.thresholds.high_watermark {
            true
        } else if predicted < self.thresholds.low_watermark {
            false
        } else {
            return TransitionOutcome::Held(HoldReason::DeadBand);
        };

        if wants_mitigation == self.state.active {
            return TransitionOutcome::Unchanged;
        }

        if let Some(held) = self.cooldown_hold(now) {
            return held;
        }

        if wants_mitigation {
            self.enable(now, actuator)
        } else {
            self.disable(now, actuator)
        }
    }

    /// Sensor data missing: drop mitigation as soon as the cooldown allows
    pub fn fail_safe<A: ActuatorPort + ?Sized>(
        &mut self,
        now: Timestamp,
        actuator: &mut A,
    ) -> TransitionOutcome {
        if !self.state.active {
            return TransitionOutcome::Unchanged;
        }
        if let Some(held) = self.cooldown_hold(now) {
            return held;
        }
        self.disable(now, actuator)
    }

    /// Restore the original ceiling immediately, ignoring the cooldown
    ///
    /// Used on clean shutdown only. The minimum spacing between writes is
    /// waived here: this restore may land inside the window opened by the
    /// previous write.
    pub fn release<A: ActuatorPort + ?Sized>(
        &mut self,
        now: Timestamp,
        actuator: &mut A,
    ) -> TransitionOutcome {
        if !self.state.active {
            return TransitionOutcome::Unchanged;
        }
        self.disable(now, actuator)
    }

    fn cooldown_hold(&self, now: Timestamp) -> Option<TransitionOutcome> {
        let remaining_ms = self.cooldown_remaining_ms(now);
        if remaining_ms == 0 {
            return None;
        }
        log_debug!("Transition held by cooldown, {} ms left", remaining_ms);
        Some(TransitionOutcome::Held(HoldReason::Cooldown { remaining_ms }))
    }

    fn enable<A: ActuatorPort + ?Sized>(
        &mut self,
        now: Timestamp,
        actuator: &mut A,
    ) -> TransitionOutcome {
        let original_khz = match actuator.read_ceiling_khz() {
            Ok(khz) if khz > 0 => khz,
            Ok(_) => {
                return self.failed(ControlError::ActuatorReadFailed {
                    reason: "ceiling is not positive",
                })
            }
            Err(err) => return self.failed(read_failure(err)),
        };

        let reduced_khz = self.policy.reduced_ceiling(original_khz);
        if reduced_khz == 0 {
            return self.failed(ControlError::ActuatorReadFailed {
                reason: "ceiling too small to reduce",
            });
        }

        self.state.last_action = Some(now);
        if let Err(err) = actuator.write_ceiling_khz(reduced_khz) {
            return self.failed(write_failure(err, reduced_khz));
        }

        self.state.original_ceiling_khz = Some(original_khz);
        self.state.active = true;
        log_info!("Mitigation ENABLED: ceiling {} -> {} kHz", original_khz, reduced_khz);

        TransitionOutcome::Enabled { original_khz, reduced_khz }
    }

    fn disable<A: ActuatorPort + ?Sized>(
        &mut self,
        now: Timestamp,
        actuator: &mut A,
    ) -> TransitionOutcome {
        let restored_khz = match self.state.original_ceiling_khz.filter(|&khz| khz > 0) {
            Some(original_khz) => {
                self.state.last_action = Some(now);
                if let Err(err) = actuator.write_ceiling_khz(original_khz) {
                    return self.failed(write_failure(err, original_khz));
                }
                Some(original_khz)
            }
            None => None,
        };

        self.state.original_ceiling_khz = None;
        self.state.active = false;
        if let Some(khz) = restored_khz {
            log_info!("Mitigation DISABLED: ceiling restored to {} kHz", khz);
        } else {
            log_warn!("Mitigation DISABLED without a valid ceiling to restore");
        }

        TransitionOutcome::Disabled { restored_khz }
    }

    fn failed(&self, err: ControlError) -> TransitionOutcome {
        log_warn!("Mitigation transition failed: {}", err);
        TransitionOutcome::Failed(err)
    }
}
