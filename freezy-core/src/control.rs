// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use serde::{Deserialize, Serialize};

/// Closed-loop gain set for a position-controlled actuator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Feedforward gain.
    pub kf: f64,
}

impl PidGains {
    pub const fn new(kp: f64, ki: f64, kd: f64, kf: f64) -> Self {
        Self { kp, ki, kd, kf }
    }
}

/// Velocity and acceleration limits shaping the approach to a profiled
/// position target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Cruise velocity in revolutions per minute.
    pub speed_rpm: i32,
    /// Acceleration in revolutions per minute per second.
    pub accel_rpm: i32,
}

/// Wiring polarity of a limit switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitSwitchPolarity {
    NormallyOpen,
    NormallyClosed,
}

/// Snap a control value inside the dead zone to zero.
///
/// A value exactly at the threshold counts as inside the zone.
pub fn apply_dead_zone(value: f64, threshold: f64) -> f64 {
    if value.abs() > threshold {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dead_zone_passes_live_values() {
        assert_eq!(apply_dead_zone(0.9, 0.05), 0.9);
        assert_eq!(apply_dead_zone(-0.9, 0.05), -0.9);
    }

    #[test]
    fn dead_zone_snaps_small_values() {
        assert_eq!(apply_dead_zone(0.04, 0.05), 0.0);
        assert_eq!(apply_dead_zone(-0.04, 0.05), 0.0);
    }

    #[test]
    fn dead_zone_boundary_is_inside_the_zone() {
        // A value exactly at the threshold produces zero output.
        assert_eq!(apply_dead_zone(0.05, 0.05), 0.0);
        assert_eq!(apply_dead_zone(-0.05, 0.05), 0.0);
    }
}
