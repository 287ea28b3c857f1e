// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::sync::Arc;
use std::time::Instant;

use clap::Parser;

use freezy::device::sim::{SimBus, SimGyro};
use freezy::device::ActuatorInterface;
use freezy::system::{DriveSystem, MechanismSystem, Systems};
use freezy::telemetry::LogSink;
use freezy::{Mode, Runtime};

pub(crate) mod consts {
    /// Left drive leader controller id.
    pub const ID_DRIVE_LEFT: u32 = 1;
    /// Left drive follower controller id.
    pub const ID_DRIVE_LEFT_FOLLOWER: u32 = 2;
    /// Right drive leader controller id.
    pub const ID_DRIVE_RIGHT: u32 = 3;
    /// Right drive follower controller id.
    pub const ID_DRIVE_RIGHT_FOLLOWER: u32 = 4;
    /// Upper lift controller id.
    pub const ID_LIFT_UPPER: u32 = 5;
    /// Lower lift controller id.
    pub const ID_LIFT_LOWER: u32 = 6;
    /// Left collector roller controller id.
    pub const ID_COLLECTOR_LEFT: u32 = 7;
    /// Right collector roller controller id.
    pub const ID_COLLECTOR_RIGHT: u32 = 8;
    /// Lift brake motor controller id.
    pub const ID_BRAKE: u32 = 9;
    /// Flipper relay controller id.
    pub const ID_FLIPPER: u32 = 10;
}

#[derive(Parser)]
#[command(author = "Copyright (C) 2024 Freezy Robotics")]
#[command(version, propagate_version = true)]
#[command(about = "Freezy robot control daemon", long_about = None)]
struct Args {
    /// Configuration file.
    #[arg(
        short = 'c',
        long = "config",
        alias = "conf",
        default_value = "/etc/freezy.conf",
        value_name = "FILE"
    )]
    config: std::path::PathBuf,
    /// Autonomous routine id, overrides the configuration.
    #[arg(short = 'r', long, value_name = "ID")]
    routine: Option<i32>,
    /// Quiet output (no logging).
    #[arg(long)]
    quiet: bool,
    /// Daemonize the service.
    #[arg(short = 'D', long)]
    daemon: bool,
    /// Level of verbosity.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use log::LevelFilter;

    let args = Args::parse();

    let mut config = if args.config.exists() {
        freezy::from_file(&args.config)?
    } else {
        freezy::Config::default()
    };

    if let Some(routine) = args.routine {
        config.runtime.routine = routine;
    }

    let mut log_config = simplelog::ConfigBuilder::new();
    if args.daemon {
        log_config.set_time_level(LevelFilter::Off);
        log_config.set_thread_level(LevelFilter::Off);
    }

    log_config.set_target_level(LevelFilter::Off);
    log_config.set_location_level(LevelFilter::Off);
    log_config.add_filter_ignore_str("mio");

    let log_level = if args.daemon {
        LevelFilter::Info
    } else if args.quiet {
        LevelFilter::Off
    } else {
        match args.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let color_choice = if args.daemon {
        simplelog::ColorChoice::Never
    } else {
        simplelog::ColorChoice::Auto
    };

    simplelog::TermLogger::init(
        log_level,
        log_config.build(),
        simplelog::TerminalMode::Mixed,
        color_choice,
    )?;

    if args.daemon {
        log::debug!("Running service as daemon");
    }

    log::trace!("{:#?}", config);

    log::info!("Starting freezy runtime {}", freezy::consts::VERSION);

    run(config).await
}

/// Drive the mode state machine over the simulator bus.
///
/// The match timeline runs autonomous for the configured period, then
/// teleop until shutdown is requested.
async fn run(config: freezy::Config) -> anyhow::Result<()> {
    use freezy_core::input::ControlSnapshot;
    use std::time::Duration;

    let bus = SimBus::new();
    let gyro = SimGyro::new();
    let telemetry = Arc::new(LogSink);

    let mut make = |id: u32| -> Box<dyn ActuatorInterface> { Box::new(bus.actuator(id)) };

    let drive = DriveSystem::new(
        &mut make,
        consts::ID_DRIVE_LEFT,
        consts::ID_DRIVE_LEFT_FOLLOWER,
        consts::ID_DRIVE_RIGHT,
        consts::ID_DRIVE_RIGHT_FOLLOWER,
        Box::new(gyro.clone()),
        config.drive.clone(),
        telemetry.clone(),
    )?;
    let mechanism = MechanismSystem::new(
        &mut make,
        consts::ID_LIFT_UPPER,
        consts::ID_LIFT_LOWER,
        consts::ID_COLLECTOR_LEFT,
        consts::ID_COLLECTOR_RIGHT,
        consts::ID_BRAKE,
        consts::ID_FLIPPER,
        config.mechanism.clone(),
        telemetry,
    )?;

    let tick = Duration::from_millis(config.runtime.tick_ms);
    let auto_period = Duration::from_secs(config.runtime.auto_seconds);

    let mut runtime = Runtime::new(Systems::new(drive, mechanism), config);
    log::info!("Selected routine: {}", runtime.routine());

    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    let auto_start = Instant::now();
    runtime.auto_init(auto_start);

    while runtime.mode() == Mode::Autonomous {
        interval.tick().await;
        let now = Instant::now();

        if now.duration_since(auto_start) >= auto_period || runtime.auto_periodic(now) {
            runtime.auto_stop(now);
            break;
        }

        bus.step();
    }

    runtime.teleop_init(Instant::now());

    loop {
        tokio::select! {
            _ = interval.tick() => {
                // No operator station is attached; the neutral snapshot
                // keeps every mechanism safed each tick.
                runtime.teleop_periodic(&ControlSnapshot::neutral(), Instant::now());
                bus.step();
            }
            _ = tokio::signal::ctrl_c() => {
                log::info!("Termination requested");
                break;
            }
        }
    }

    runtime.disabled_init(Instant::now());
    log::info!("Runtime stopped");

    Ok(())
}
