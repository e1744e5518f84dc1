//! Common test fakes for integration tests
//!
//! This module provides:
//! - A scripted sensor that replays a per-tick sequence of readings,
//!   including injected failures and slow reads
//! - A recording actuator that logs every write with its timestamp and can
//!   fail reads or writes on demand
//! - Helpers to build a loop on a shared manual clock

#![allow(dead_code)]

use std::collections::VecDeque;

use thermguard_core::{
    time::{SharedTime, TimeSource, Timestamp},
    ActuatorPort, ConstantUtilization, ControlError, ControlLoop, ControlResult, ControllerConfig,
    SensorPort,
};

/// One tick's worth of sensor behaviour
#[derive(Debug, Clone, Copy)]
pub enum Reading {
    /// Both channels answer
    Ok { temperature: f32, frequency: f32 },
    /// Temperature channel fails
    TemperatureDown,
    /// Frequency channel fails
    FrequencyDown,
    /// Temperature answers but the read takes this long (ms)
    Slow { temperature: f32, frequency: f32, delay_ms: u64 },
}

/// Sensor replaying a script; repeats the last entry when exhausted
pub struct ScriptedSensor {
    script: VecDeque<Reading>,
    current: Reading,
    clock: SharedTime,
}

impl ScriptedSensor {
    pub fn new(clock: SharedTime, script: impl IntoIterator<Item = Reading>) -> Self {
        let script: VecDeque<Reading> = script.into_iter().collect();
        let current = script
            .front()
            .copied()
            .unwrap_or(Reading::Ok { temperature: 50.0, frequency: 2.0 });
        Self { script, current, clock }
    }

    /// Steady readings forever
    pub fn steady(clock: SharedTime, temperature: f32, frequency: f32) -> Self {
        Self::new(clock, [Reading::Ok { temperature, frequency }])
    }

    pub fn push(&mut self, reading: Reading) {
        self.script.push_back(reading);
    }
}

impl SensorPort for ScriptedSensor {
    // The temperature read advances the script; frequency reuses the tick's entry
    fn read_temperature_celsius(&mut self) -> ControlResult<f32> {
        if let Some(next) = self.script.pop_front() {
            self.current = next;
        }
        match self.current {
            Reading::Ok { temperature, .. } => Ok(temperature),
            Reading::FrequencyDown => Ok(60.0),
            Reading::TemperatureDown => Err(ControlError::temperature("injected")),
            Reading::Slow { temperature, delay_ms, .. } => {
                self.clock.advance(delay_ms);
                Ok(temperature)
            }
        }
    }

    fn read_frequency_ghz(&mut self) -> ControlResult<f32> {
        match self.current {
            Reading::Ok { frequency, .. } | Reading::Slow { frequency, .. } => Ok(frequency),
            Reading::TemperatureDown => Ok(2.0),
            Reading::FrequencyDown => Err(ControlError::frequency("injected")),
        }
    }
}

/// Actuator that records every write attempt
pub struct RecordingActuator {
    pub ceiling_khz: u32,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// (time, ceiling, succeeded) for every write attempt
    pub writes: Vec<(Timestamp, u32, bool)>,
    clock: SharedTime,
}

impl RecordingActuator {
    pub fn new(clock: SharedTime, ceiling_khz: u32) -> Self {
        Self { ceiling_khz, fail_reads: false, fail_writes: false, writes: Vec::new(), clock }
    }

    pub fn successful_writes(&self) -> usize {
        self.writes.iter().filter(|(_, _, ok)| *ok).count()
    }
}

impl ActuatorPort for RecordingActuator {
    fn read_ceiling_khz(&mut self) -> ControlResult<u32> {
        if self.fail_reads {
            return Err(ControlError::ActuatorReadFailed { reason: "injected" });
        }
        Ok(self.ceiling_khz)
    }

    fn write_ceiling_khz(&mut self, ceiling_khz: u32) -> ControlResult<()> {
        let ok = !self.fail_writes;
        self.writes.push((self.clock.now(), ceiling_khz, ok));
        if !ok {
            return Err(ControlError::ActuatorWriteFailed { ceiling_khz, reason: "injected" });
        }
        self.ceiling_khz = ceiling_khz;
        Ok(())
    }
}

pub type TestLoop = ControlLoop<ScriptedSensor, RecordingActuator, ConstantUtilization, SharedTime>;

/// Stock ceiling for a 3.0 GHz part
pub const STOCK_CEILING_KHZ: u32 = 3_000_000;
/// Stock ceiling times the default reduction factor (checked against the
/// policy in `capped_fixture_matches_default_policy`)
pub const CAPPED_CEILING_KHZ: u32 = 2_100_000;

/// Loop on a shared clock starting at t=0
pub fn build_loop(config: ControllerConfig, script: Vec<Reading>) -> (TestLoop, SharedTime) {
    let clock = SharedTime::new(0);
    let sensor = ScriptedSensor::new(clock.clone(), script);
    let actuator = RecordingActuator::new(clock.clone(), STOCK_CEILING_KHZ);
    let control = ControlLoop::new(config, sensor, actuator, ConstantUtilization(0.7), clock.clone())
        .expect("test config is valid");
    (control, clock)
}

/// Temperature whose one-step prediction lands well above the high watermark
pub const HOT: Reading = Reading::Ok { temperature: 95.0, frequency: 2.0 };
/// Temperature whose one-step prediction lands well below the low watermark
pub const COOL: Reading = Reading::Ok { temperature: 50.0, frequency: 2.0 };
/// Temperature whose one-step prediction lands inside the dead band
pub const WARM: Reading = Reading::Ok { temperature: 76.0, frequency: 2.0 };
