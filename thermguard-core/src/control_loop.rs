//! The Control Loop
//!
//! Ties sensors, models, controller and actuator together at a fixed
//! cadence. One logical thread of control: each tick runs to completion,
//! including any actuator transition it starts, before the stop flag is
//! looked at again.
//!
//! ## One Tick
//!
//! 1. Read temperature and frequency. Each read is timed against the I/O
//!    budget and checked for plausibility; a slow or implausible reading
//!    counts as a failed read.
//! 2. On any failure: fail-safe de-mitigation attempt, no prediction.
//! 3. Otherwise: utilization (clamped to [0, 1]) -> power -> prediction ->
//!    controller decision, plus the report-only critical check.
//! 4. Produce a [`StatusReport`].
//!
//! Nothing here aborts. Sensor and actuator errors end up in the report and
//! the stats, and the next tick runs on schedule.

use crate::config::ControllerConfig;
use crate::controller::{HoldReason, MitigationController, MitigationState, TransitionOutcome};
use crate::errors::{ConfigError, ControlError, SensorChannel};
use crate::ports::{ActuatorPort, Sample, SensorPort, UtilizationSource};
use crate::power::PowerEstimator;
use crate::predictor::ThermalPredictor;
use crate::report::StatusReport;
use crate::time::{elapsed_ms, TimeSource, Timestamp};
use crate::validators::{FrequencyValidator, TemperatureValidator, Validator};

/// Counters kept across ticks
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ControlStats {
    /// Ticks executed
    pub ticks: u64,
    /// Ticks where a sensor channel failed
    pub sensor_failures: u64,
    /// Actuator reads or writes that failed
    pub actuator_failures: u64,
    /// Successful mitigation enables
    pub enables: u64,
    /// Successful mitigation releases
    pub disables: u64,
    /// Ticks with a critical prediction
    pub critical_ticks: u64,
    /// Requested transitions deferred by the cooldown
    pub cooldown_holds: u64,
}

impl ControlStats {
    fn record(&mut self, outcome: &TransitionOutcome) {
        match outcome {
            TransitionOutcome::Enabled { .. } => self.enables += 1,
            TransitionOutcome::Disabled { .. } => self.disables += 1,
            TransitionOutcome::Failed(_) => self.actuator_failures += 1,
            TransitionOutcome::Held(HoldReason::Cooldown { .. }) => self.cooldown_holds += 1,
            TransitionOutcome::Held(HoldReason::DeadBand) | TransitionOutcome::Unchanged => {}
        }
    }
}

/// Map utilization into [0, 1]; NaN is treated as fully busy
fn clamp_utilization(utilization: f32) -> f32 {
    if utilization.is_nan() {
        1.0
    } else {
        utilization.clamp(0.0, 1.0)
    }
}

/// Keep sensor-side failures on the sensor side, whatever the port returned
fn sensor_failure(err: ControlError, channel: SensorChannel) -> ControlError {
    match err {
        ControlError::SensorUnavailable { .. } => err,
        _ => ControlError::SensorUnavailable { channel, reason: "sensor port error" },
    }
}

/// Fixed-interval prediction and mitigation loop
pub struct ControlLoop<S, A, U, T> {
    config: ControllerConfig,
    sensor: S,
    actuator: A,
    utilization: U,
    clock: T,
    power: PowerEstimator,
    predictor: ThermalPredictor,
    controller: MitigationController,
    temperature_check: TemperatureValidator,
    frequency_check: FrequencyValidator,
    last_prediction: Option<f32>,
    stats: ControlStats,
}

impl<S, A, U, T> ControlLoop<S, A, U, T>
where
    S: SensorPort,
    A: ActuatorPort,
    U: UtilizationSource,
    T: TimeSource,
{
    /// Build a loop; the config is validated first
    pub fn new(
        config: ControllerConfig,
        sensor: S,
        actuator: A,
        utilization: U,
        clock: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            power: PowerEstimator::new(config.power),
            predictor: ThermalPredictor::new(config.thermal),
            controller: MitigationController::new(config.thresholds, config.policy),
            temperature_check: TemperatureValidator::from_limits(&config.sensors),
            frequency_check: FrequencyValidator::from_limits(&config.sensors),
            config,
            sensor,
            actuator,
            utilization,
            clock,
            last_prediction: None,
            stats: ControlStats::default(),
        })
    }

    /// Resume with a previously taken mitigation state
    pub fn with_state(mut self, state: MitigationState) -> Self {
        self.controller = self.controller.with_state(state);
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn controller(&self) -> &MitigationController {
        &self.controller
    }

    pub fn state(&self) -> &MitigationState {
        self.controller.state()
    }

    pub fn stats(&self) -> &ControlStats {
        &self.stats
    }

    pub fn predictor(&self) -> &ThermalPredictor {
        &self.predictor
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    pub fn actuator_mut(&mut self) -> &mut A {
        &mut self.actuator
    }

    pub fn clock(&self) -> &T {
        &self.clock
    }

    /// Tear down, handing back the ports and the mitigation state
    pub fn into_parts(self) -> (S, A, MitigationState) {
        (self.sensor, self.actuator, self.controller.into_state())
    }

    /// Read both channels with the I/O budget and plausibility checks applied
    pub fn acquire(&mut self) -> Sample {
        let budget = self.config.io_timeout_ms;

        let started = self.clock.now();
        let temperature = self.sensor.read_temperature_celsius();
        let temperature = if elapsed_ms(started, self.clock.now()) > budget {
            Err(ControlError::temperature("read timed out"))
        } else {
            temperature
                .map_err(|err| sensor_failure(err, SensorChannel::Temperature))
                .and_then(|t| self.temperature_check.validate(t))
        };

        let started = self.clock.now();
        let frequency = self.sensor.read_frequency_ghz();
        let frequency = if elapsed_ms(started, self.clock.now()) > budget {
            Err(ControlError::frequency("read timed out"))
        } else {
            frequency
                .map_err(|err| sensor_failure(err, SensorChannel::Frequency))
                .and_then(|f| self.frequency_check.validate(f))
        };

        Sample { temperature, frequency }
    }

    /// Run one control iteration
    pub fn tick(&mut self) -> StatusReport {
        let sample = self.acquire();
        let now = self.clock.now();
        self.stats.ticks += 1;

        let (temperature, frequency_ghz) = match sample.values() {
            Ok(values) => values,
            Err(err) => return self.fail_safe_tick(now, sample, err),
        };

        let utilization = clamp_utilization(self.utilization.estimate_utilization());
        let power = self.power.estimate(utilization, frequency_ghz);
        let predicted = self.predictor.predict(temperature, power);

        let prediction_error = self.last_prediction.map(|previous| temperature - previous);
        self.last_prediction = Some(predicted).filter(|p| p.is_finite());

        let critical = self.controller.is_critical(predicted);
        if critical {
            self.stats.critical_ticks += 1;
            log_warn!(
                "CRITICAL predicted temperature {:.2}°C, strong throttling advised",
                predicted
            );
        }

        let outcome = self.controller.evaluate(predicted, now, &mut self.actuator);
        self.stats.record(&outcome);

        StatusReport {
            timestamp: now,
            temperature: Some(temperature),
            frequency_ghz: Some(frequency_ghz),
            utilization: Some(utilization),
            power: Some(power),
            predicted: self.last_prediction,
            prediction_error,
            phase: self.controller.state().phase(),
            critical,
            outcome,
            error: outcome.error(),
        }
    }

    fn fail_safe_tick(&mut self, now: Timestamp, sample: Sample, err: ControlError) -> StatusReport {
        self.stats.sensor_failures += 1;
        self.last_prediction = None;
        log_warn!("{}, entering safe mode", err);

        let outcome = self.controller.fail_safe(now, &mut self.actuator);
        self.stats.record(&outcome);

        StatusReport {
            timestamp: now,
            temperature: sample.temperature.ok(),
            frequency_ghz: sample.frequency.ok(),
            utilization: None,
            power: None,
            predicted: None,
            prediction_error: None,
            phase: self.controller.state().phase(),
            critical: false,
            outcome,
            error: Some(err),
        }
    }

    /// Clean shutdown hook
    ///
    /// Restores the original ceiling only when the policy asks for it;
    /// otherwise the ceiling stays as last written. Returns what was done,
    /// `None` when the policy left the ceiling alone.
    pub fn shutdown(&mut self) -> Option<TransitionOutcome> {
        if !self.config.policy.restore_on_shutdown {
            if self.controller.state().is_active() {
                log_info!("Exiting with the ceiling still capped");
            }
            return None;
        }

        let now = self.clock.now();
        let outcome = self.controller.release(now, &mut self.actuator);
        self.stats.record(&outcome);
        Some(outcome)
    }

    /// Tick at the configured interval until `stop` is set or `max_ticks` ran
    ///
    /// The stop flag is checked once per tick, between ticks. Sleeps target
    /// fixed interval boundaries; a tick that overruns its slot re-anchors
    /// the schedule instead of bursting to catch up. Calls [`Self::shutdown`]
    /// before returning.
    #[cfg(feature = "std")]
    pub fn run<F>(
        &mut self,
        stop: &std::sync::atomic::AtomicBool,
        max_ticks: Option<u64>,
        mut on_report: F,
    ) -> ControlStats
    where
        F: FnMut(&StatusReport),
    {
        use std::sync::atomic::Ordering;
        use std::time::{Duration, Instant};

        let interval = Duration::from_millis(self.config.interval_ms());
        let mut deadline = Instant::now();
        let mut executed = 0u64;

        log_info!(
            "Control loop started: interval {} ms, band [{}, {}]°C, cooldown {} s",
            self.config.interval_ms(),
            self.config.thresholds.low_watermark,
            self.config.thresholds.high_watermark,
            self.config.thresholds.cooldown_s
        );

        while !stop.load(Ordering::SeqCst) && max_ticks.map_or(true, |max| executed < max) {
            let report = self.tick();
            on_report(&report);
            executed += 1;

            deadline += interval;
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            } else {
                deadline = now;
            }
        }

        if let Some(outcome) = self.shutdown() {
            log_info!("Shutdown: {}", outcome);
        }
        self.stats
    }
}
