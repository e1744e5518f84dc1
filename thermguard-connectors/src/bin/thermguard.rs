//! thermguard daemon
//!
//! Runs the predictive control loop against the local machine's sysfs
//! thermal zone and cpufreq files until interrupted.
//!
//! ```text
//! sudo RUST_LOG=info thermguard --config /etc/thermguard.json --restore-on-exit
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{info, warn};

use thermguard_connectors::sysfs::{SysfsActuator, SysfsPaths, SysfsSensor, DEFAULT_CPU, DEFAULT_THERMAL_ZONE};
use thermguard_connectors::load_config;
use thermguard_core::constants::thermal::DEFAULT_UTILIZATION;
use thermguard_core::time::MonotonicClock;
use thermguard_core::{ConstantUtilization, ControlLoop, ControllerConfig, StatusReport};

#[derive(Parser, Debug)]
#[clap(about, version, long_about = None)]
struct Args {
    /// JSON configuration file; built-in defaults when omitted
    #[clap(long)]
    config: Option<PathBuf>,

    /// Thermal zone directory
    #[clap(long = "thermal-zone", default_value = DEFAULT_THERMAL_ZONE)]
    thermal_zone: PathBuf,

    /// CPU directory holding `cpufreq/`
    #[clap(long, default_value = DEFAULT_CPU)]
    cpu: PathBuf,

    /// Assumed CPU utilization in [0, 1]
    #[clap(long, default_value_t = DEFAULT_UTILIZATION)]
    utilization: f32,

    /// Print one JSON status object per tick on stdout
    #[clap(long)]
    json: bool,

    /// Restore the original frequency ceiling on exit
    #[clap(long = "restore-on-exit")]
    restore_on_exit: bool,

    /// Stop after this many ticks
    #[clap(long)]
    ticks: Option<u64>,
}

fn print_report(report: &StatusReport, json: bool) {
    if !json {
        info!("{}", report);
        return;
    }
    match serde_json::to_string(report) {
        Ok(line) => println!("{}", line),
        Err(err) => warn!("Could not encode status report: {}", err),
    }
}

fn main() -> anyhow::Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ControllerConfig::default(),
    };
    if args.restore_on_exit {
        config.policy.restore_on_shutdown = true;
    }

    let paths = SysfsPaths::from_dirs(&args.thermal_zone, &args.cpu);
    info!(
        "Sensors: {} and {}; ceiling: {}",
        paths.temperature.display(),
        paths.current_freq.display(),
        paths.max_freq.display()
    );

    let mut control = ControlLoop::new(
        config,
        SysfsSensor::new(paths.clone()),
        SysfsActuator::new(&paths),
        ConstantUtilization(args.utilization),
        MonotonicClock::new(),
    )
    .map_err(|err| anyhow!("invalid configuration: {}", err))?;

    let stop = Arc::new(AtomicBool::new(false));
    let flag = stop.clone();
    ctrlc::set_handler(move || {
        flag.store(true, Ordering::SeqCst);
    })
    .context("installing signal handler")?;

    let json = args.json;
    let stats = control.run(&stop, args.ticks, |report| print_report(report, json));

    info!(
        "Stopped after {} ticks: {} enables, {} disables, {} sensor failures, {} actuator failures, {} critical",
        stats.ticks,
        stats.enables,
        stats.disables,
        stats.sensor_failures,
        stats.actuator_failures,
        stats.critical_ticks
    );
    if control.state().is_active() {
        warn!(
            "Exiting with mitigation active; ceiling left at reduced value (original {} kHz)",
            control.state().original_ceiling_khz().unwrap_or_default()
        );
    }
    Ok(())
}
