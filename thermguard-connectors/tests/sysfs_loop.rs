//! End-to-end loop runs against a fake sysfs tree
//!
//! The tree lives in a temp directory; the tests rewrite its files between
//! ticks the way the kernel would, and drive time through a shared manual
//! clock.

use std::fs;

use tempfile::TempDir;
use thermguard_connectors::sysfs::{SysfsActuator, SysfsPaths, SysfsSensor};
use thermguard_core::time::SharedTime;
use thermguard_core::{
    ConstantUtilization, ControlError, ControlLoop, ControllerConfig, MitigationPhase,
    MitigationPolicy, SensorChannel, TransitionOutcome,
};

type SysfsLoop = ControlLoop<SysfsSensor, SysfsActuator, ConstantUtilization, SharedTime>;

struct FakeSysfs {
    _dir: TempDir,
    paths: SysfsPaths,
}

impl FakeSysfs {
    fn new(millidegrees: i64, cur_khz: u32, max_khz: u32) -> Self {
        let dir = TempDir::new().unwrap();
        let zone = dir.path().join("class/thermal/thermal_zone0");
        let cpu = dir.path().join("devices/system/cpu/cpu0");
        fs::create_dir_all(&zone).unwrap();
        fs::create_dir_all(cpu.join("cpufreq")).unwrap();

        let fake = Self { paths: SysfsPaths::from_dirs(&zone, &cpu), _dir: dir };
        fake.set_temperature(millidegrees);
        fs::write(&fake.paths.current_freq, format!("{}\n", cur_khz)).unwrap();
        fs::write(&fake.paths.max_freq, format!("{}\n", max_khz)).unwrap();
        fake
    }

    fn set_temperature(&self, millidegrees: i64) {
        fs::write(&self.paths.temperature, format!("{}\n", millidegrees)).unwrap();
    }

    fn ceiling(&self) -> u32 {
        fs::read_to_string(&self.paths.max_freq).unwrap().trim().parse().unwrap()
    }

    fn build(&self, config: ControllerConfig) -> (SysfsLoop, SharedTime) {
        let clock = SharedTime::new(0);
        let control = ControlLoop::new(
            config,
            SysfsSensor::new(self.paths.clone()),
            SysfsActuator::new(&self.paths),
            ConstantUtilization(0.7),
            clock.clone(),
        )
        .unwrap();
        (control, clock)
    }
}

#[test]
fn hot_zone_caps_then_cool_zone_restores() {
    let sysfs = FakeSysfs::new(95_000, 2_000_000, 3_000_000);
    let (mut control, clock) = sysfs.build(ControllerConfig::default());

    let report = control.tick();
    assert_eq!(
        report.outcome,
        TransitionOutcome::Enabled { original_khz: 3_000_000, reduced_khz: 2_100_000 }
    );
    assert_eq!(sysfs.ceiling(), 2_100_000);

    sysfs.set_temperature(50_000);
    clock.advance(5_000);
    let report = control.tick();
    assert_eq!(report.outcome, TransitionOutcome::Disabled { restored_khz: Some(3_000_000) });
    assert_eq!(report.phase, MitigationPhase::Normal);
    assert_eq!(sysfs.ceiling(), 3_000_000);
}

#[test]
fn vanished_thermal_zone_triggers_fail_safe() {
    let sysfs = FakeSysfs::new(95_000, 2_000_000, 3_000_000);
    let (mut control, clock) = sysfs.build(ControllerConfig::default());
    control.tick();

    fs::remove_file(&sysfs.paths.temperature).unwrap();
    clock.advance(6_000);
    let report = control.tick();

    assert_eq!(
        report.error,
        Some(ControlError::SensorUnavailable {
            channel: SensorChannel::Temperature,
            reason: "file not found",
        })
    );
    assert_eq!(report.outcome, TransitionOutcome::Disabled { restored_khz: Some(3_000_000) });
    assert_eq!(sysfs.ceiling(), 3_000_000);
}

#[test]
fn implausible_reading_counts_as_sensor_failure() {
    // driver reports "no reading" as a negative millidegree value
    let sysfs = FakeSysfs::new(-1, 2_000_000, 3_000_000);
    let (mut control, _clock) = sysfs.build(ControllerConfig::default());

    let report = control.tick();
    assert!(report.error.map_or(false, |err| err.is_sensor()));
    assert!(!report.has_prediction());
    assert_eq!(sysfs.ceiling(), 3_000_000);
}

#[test]
fn shutdown_restores_when_enabled() {
    let sysfs = FakeSysfs::new(95_000, 2_000_000, 3_000_000);
    let config = ControllerConfig::default()
        .with_policy(MitigationPolicy { restore_on_shutdown: true, ..Default::default() });
    let (mut control, _clock) = sysfs.build(config);

    control.tick();
    assert_eq!(sysfs.ceiling(), 2_100_000);

    control.shutdown();
    assert_eq!(sysfs.ceiling(), 3_000_000);
}

#[test]
fn shutdown_leaves_cap_by_default() {
    let sysfs = FakeSysfs::new(95_000, 2_000_000, 3_000_000);
    let (mut control, _clock) = sysfs.build(ControllerConfig::default());

    control.tick();
    assert_eq!(control.shutdown(), None);
    assert_eq!(sysfs.ceiling(), 2_100_000);
}

#[test]
fn report_serializes_to_json() {
    let sysfs = FakeSysfs::new(95_000, 2_000_000, 3_000_000);
    let (mut control, _clock) = sysfs.build(ControllerConfig::default());

    let report = control.tick();
    let value = serde_json::to_value(report).unwrap();

    assert_eq!(value["phase"], "mitigating");
    assert_eq!(value["critical"], true);
    assert_eq!(value["outcome"]["action"], "enabled");
    assert_eq!(value["outcome"]["reduced_khz"], 2_100_000);
    assert!(value["error"].is_null());
}
