// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::sync::Arc;
use std::time::Instant;

use freezy_core::control::{apply_dead_zone, LimitSwitchPolarity};
use freezy_core::input::{Axis, Button, ControlSnapshot};
use freezy_core::telemetry::TelemetrySink;

use super::System;
use crate::channel::ActuatorChannel;
use crate::config::DriveConfig;
use crate::device::{ActuatorInterface, HeadingSource, Result};

/// Tank drive base: two closed-loop leader channels, each with a coupled
/// follower, plus a gyro heading source.
///
/// The encoder zero is established exactly once, at the first autonomous
/// init, when the robot sits at its known reference position; it is never
/// re-zeroed during a match.
pub struct DriveSystem {
    left: ActuatorChannel,
    left_follower: ActuatorChannel,
    right: ActuatorChannel,
    right_follower: ActuatorChannel,
    heading: Box<dyn HeadingSource>,
    config: DriveConfig,
    zeroed: bool,
    telemetry: Arc<dyn TelemetrySink>,
}

impl DriveSystem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        make: &mut dyn FnMut(u32) -> Box<dyn ActuatorInterface>,
        left_id: u32,
        left_follower_id: u32,
        right_id: u32,
        right_follower_id: u32,
        heading: Box<dyn HeadingSource>,
        config: DriveConfig,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self> {
        let left = ActuatorChannel::closed_loop(
            "drive/left",
            make(left_id),
            config.invert_left,
            config.aligned_sensor,
            &config.gains,
            LimitSwitchPolarity::NormallyOpen,
            telemetry.clone(),
        )?;
        let left_follower = ActuatorChannel::follower(
            "drive/left_follower",
            make(left_follower_id),
            &left,
            config.invert_left,
            telemetry.clone(),
        )?;
        let right = ActuatorChannel::closed_loop(
            "drive/right",
            make(right_id),
            config.invert_right,
            config.aligned_sensor,
            &config.gains,
            LimitSwitchPolarity::NormallyOpen,
            telemetry.clone(),
        )?;
        let right_follower = ActuatorChannel::follower(
            "drive/right_follower",
            make(right_follower_id),
            &right,
            config.invert_right,
            telemetry.clone(),
        )?;

        debug!(
            "drive followers: {} mirrors {}, {} mirrors {}",
            left_follower.name(),
            left.name(),
            right_follower.name(),
            right.name()
        );

        Ok(Self {
            left,
            left_follower,
            right,
            right_follower,
            heading,
            config,
            zeroed: false,
            telemetry,
        })
    }

    /// Capture the heading reference for an autonomous maneuver.
    ///
    /// Resets the gyro when asked, in which case the reference is 0.0;
    /// otherwise returns the heading as it stands.
    pub fn prepare_heading(&mut self, reset_gyro: bool) -> f64 {
        if reset_gyro {
            self.heading.reset();
            0.0
        } else {
            self.heading.angle()
        }
    }

    pub fn heading(&self) -> f64 {
        self.heading.angle()
    }

    pub fn left_position(&self) -> i32 {
        self.left.sensor_position()
    }

    pub fn right_position(&self) -> i32 {
        self.right.sensor_position()
    }

    /// One profiled straight-drive setpoint; the hardware profile tracks it
    /// from here without further per-tick commands.
    pub fn drive_to(&mut self, target_inches: f64, speed_rpm: i32, accel_rpm: i32) {
        let ticks = (target_inches * self.config.ticks_per_inch).round() as i32;
        let cruise = (speed_rpm as f64 * self.config.rpm_to_ticks).round() as i32;
        let accel = (accel_rpm as f64 * self.config.rpm_to_ticks).round() as i32;

        self.left.set_profiled_target(ticks, cruise, accel);
        self.right.set_profiled_target(ticks, cruise, accel);
        self.telemetry.put_double("drive/target_inches", target_inches);
    }

    /// Rotate toward closing `delta` degrees; re-issued every tick by the
    /// owning action, which also decides doneness.
    pub fn rotate_to(&mut self, delta: f64, speed: f64) {
        if delta > 0.0 {
            self.rotate_right(speed);
        } else {
            self.rotate_left(speed);
        }
    }

    pub fn rotate_right(&mut self, speed: f64) {
        self.run_open_loop(speed, -speed);
    }

    pub fn rotate_left(&mut self, speed: f64) {
        self.run_open_loop(-speed, speed);
    }

    pub fn run_open_loop(&mut self, left: f64, right: f64) {
        self.left.set_open_loop(left);
        self.right.set_open_loop(right);
    }

    fn safe(&mut self) {
        self.run_open_loop(0.0, 0.0);
    }
}

impl System for DriveSystem {
    fn name(&self) -> &'static str {
        "drive"
    }

    fn auto_init(&mut self, _now: Instant) {
        self.safe();

        if !self.zeroed {
            // Canonical zero position moment.
            self.left.reset_sensor_position(0);
            self.right.reset_sensor_position(0);
            self.zeroed = true;
            info!("drive encoders zeroed");
        }
    }

    fn auto_stop(&mut self, _now: Instant) {
        self.safe();
    }

    fn disabled_init(&mut self, _now: Instant) {
        self.safe();
    }

    fn teleop_init(&mut self, _now: Instant) {
        self.safe();
    }

    fn teleop_periodic(&mut self, input: &ControlSnapshot, _now: Instant) {
        let throttle = apply_dead_zone(input.axis(Axis::Throttle), self.config.dead_zone);
        let steering = apply_dead_zone(input.axis(Axis::Steering), self.config.dead_zone);

        // Quick turn pivots in place on the steering axis alone.
        let (left, right) = if input.button(Button::QuickTurn) {
            (steering, -steering)
        } else {
            (throttle + steering, throttle - steering)
        };
        self.run_open_loop(
            left.clamp(-1.0, 1.0) * self.config.teleop_factor,
            right.clamp(-1.0, 1.0) * self.config.teleop_factor,
        );

        self.telemetry.put_double("drive/heading", self.heading.angle());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::{fixture, ids};

    #[test]
    fn encoders_zeroed_exactly_once() {
        let mut f = fixture();
        let now = Instant::now();

        f.bus.set_position(ids::DRIVE_LEFT, 1_234);
        f.systems.drive.auto_init(now);
        assert_eq!(f.bus.position(ids::DRIVE_LEFT), 0);

        // A later auto init must not re-establish the zero.
        f.bus.set_position(ids::DRIVE_LEFT, 500);
        f.systems.drive.auto_init(now);
        assert_eq!(f.bus.position(ids::DRIVE_LEFT), 500);
    }

    #[test]
    fn drive_to_converts_units_and_targets_both_sides() {
        let mut f = fixture();

        f.systems.drive.drive_to(72.0, 900, 450);

        let ticks = (72.0 * f.config.drive.ticks_per_inch).round() as i32;
        let cruise = (900.0 * f.config.drive.rpm_to_ticks).round() as i32;
        let accel = (450.0 * f.config.drive.rpm_to_ticks).round() as i32;
        assert_eq!(
            f.bus.profiled_target(ids::DRIVE_LEFT),
            Some((ticks, cruise, accel))
        );
        assert_eq!(
            f.bus.profiled_target(ids::DRIVE_RIGHT),
            Some((ticks, cruise, accel))
        );
    }

    #[test]
    fn teleop_arcade_with_dead_zone() {
        let mut f = fixture();
        let now = Instant::now();

        let input = ControlSnapshot::neutral()
            .with_axis(Axis::Throttle, 0.5)
            .with_axis(Axis::Steering, 0.25);
        f.systems.drive.teleop_periodic(&input, now);
        assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), 0.75);
        assert_eq!(f.bus.effective_output(ids::DRIVE_RIGHT), 0.25);

        // Values at the dead zone threshold produce no motion.
        let input = ControlSnapshot::neutral().with_axis(Axis::Throttle, 0.05);
        f.systems.drive.teleop_periodic(&input, now);
        assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), 0.0);
        assert_eq!(f.bus.effective_output(ids::DRIVE_RIGHT), 0.0);
    }

    #[test]
    fn quick_turn_pivots_on_steering_alone() {
        let mut f = fixture();
        let now = Instant::now();

        let input = ControlSnapshot::neutral()
            .with_axis(Axis::Throttle, 0.5)
            .with_axis(Axis::Steering, 0.4)
            .with_button(Button::QuickTurn);
        f.systems.drive.teleop_periodic(&input, now);
        assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), 0.4);
        assert_eq!(f.bus.effective_output(ids::DRIVE_RIGHT), -0.4);
    }
}
