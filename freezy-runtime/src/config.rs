// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::path::Path;

use serde::{Deserialize, Serialize};

use freezy_core::control::{MotionProfile, PidGains};

/// Runtime-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Control loop period in milliseconds.
    pub tick_ms: u64,
    /// Length of the autonomous period in seconds.
    pub auto_seconds: u64,
    /// Autonomous routine id, as reported by the external chooser.
    pub routine: i32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: crate::consts::DEFAULT_TICK_MS,
            auto_seconds: crate::consts::DEFAULT_AUTO_SECONDS,
            routine: 1,
        }
    }
}

/// Drive base settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Stick dead zone; values at or below it snap to zero.
    pub dead_zone: f64,
    /// Teleop output scale.
    pub teleop_factor: f64,
    /// Encoder ticks per inch of travel.
    pub ticks_per_inch: f64,
    /// Encoder ticks per 100 ms per rpm.
    pub rpm_to_ticks: f64,
    pub gains: PidGains,
    pub aligned_sensor: bool,
    pub invert_left: bool,
    pub invert_right: bool,
    /// Profile limits for autonomous straight drives.
    pub profile: MotionProfile,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            dead_zone: 0.05,
            teleop_factor: 1.0,
            // Grayhill 63R on a 6 inch wheel.
            ticks_per_inch: 40.7,
            rpm_to_ticks: 1.28,
            gains: PidGains::new(1.0, 0.0, 0.0, 0.0),
            aligned_sensor: true,
            invert_left: false,
            invert_right: true,
            profile: MotionProfile {
                speed_rpm: 900,
                accel_rpm: 450,
            },
        }
    }
}

/// Cube mechanism settings: lift, collector, brake and flipper in one
/// structure so a season only retunes numbers, not code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanismConfig {
    /// Fixed collector intake strength applied above the dead zone.
    pub collector_in_strength: f64,
    /// Fixed collector eject strength.
    pub collector_out_strength: f64,
    pub collector_dead_zone: f64,
    pub invert_left_collector: bool,
    pub invert_right_collector: bool,

    /// Teleop lift axis scale.
    pub lift_factor: f64,
    pub lift_dead_zone: f64,
    /// Encoder ticks for each lift level, lowest first.
    pub lift_levels: Vec<i32>,
    pub gains: PidGains,
    pub aligned_sensor: bool,
    pub rpm_to_ticks: f64,
    pub profile: MotionProfile,
    pub invert_upper_lift: bool,
    pub invert_lower_lift: bool,

    pub brake_on_strength: f64,
    pub brake_off_strength: f64,
    pub invert_brake: bool,
    /// Minimum time between brake transitions in milliseconds.
    pub brake_interval_ms: u64,
    /// Brake motor settle time in milliseconds.
    pub brake_dwell_ms: u64,

    pub flipper_strength: f64,
    pub invert_flipper: bool,
    pub flipper_interval_ms: u64,
    pub flipper_dwell_ms: u64,
}

impl Default for MechanismConfig {
    fn default() -> Self {
        Self {
            collector_in_strength: 0.75,
            collector_out_strength: -1.0,
            collector_dead_zone: 0.05,
            invert_left_collector: true,
            invert_right_collector: false,

            lift_factor: 0.25,
            lift_dead_zone: 0.1,
            lift_levels: vec![30, 140, 280],
            gains: PidGains::new(1.0, 0.0, 0.0, 0.0),
            aligned_sensor: true,
            rpm_to_ticks: 1.28,
            profile: MotionProfile {
                speed_rpm: 900,
                accel_rpm: 450,
            },
            invert_upper_lift: false,
            invert_lower_lift: false,

            brake_on_strength: 0.5,
            brake_off_strength: -0.5,
            invert_brake: false,
            brake_interval_ms: 500,
            brake_dwell_ms: 500,

            flipper_strength: 1.0,
            invert_flipper: false,
            flipper_interval_ms: 500,
            flipper_dwell_ms: 1_000,
        }
    }
}

/// Robot configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub drive: DriveConfig,
    pub mechanism: MechanismConfig,
}

/// Load configuration from a TOML file.
pub fn from_file(path: impl AsRef<Path>) -> crate::runtime::Result<Config> {
    let contents = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.runtime.tick_ms, 20);
        assert_eq!(config.mechanism.lift_levels, vec![30, 140, 280]);
        assert_eq!(config.mechanism.collector_in_strength, 0.75);
    }

    #[test]
    fn partial_document_overrides_one_table() {
        let config: Config = toml::from_str(
            r#"
            [mechanism]
            collector_in_strength = 0.6
            lift_levels = [25, 120]
            "#,
        )
        .unwrap();

        assert_eq!(config.mechanism.collector_in_strength, 0.6);
        assert_eq!(config.mechanism.lift_levels, vec![25, 120]);
        assert_eq!(config.drive.dead_zone, 0.05);
    }
}
