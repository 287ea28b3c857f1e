// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::sync::Arc;
use std::time::{Duration, Instant};

use freezy_core::control::LimitSwitchPolarity;
use freezy_core::input::{Axis, Button, ControlSnapshot};
use freezy_core::telemetry::TelemetrySink;

use super::System;
use crate::channel::ActuatorChannel;
use crate::config::MechanismConfig;
use crate::device::{ActuatorInterface, Result};
use crate::interlock::Interlock;

/// Game-piece mechanism: closed-loop lift with a coupled follower, paired
/// open-loop collector rollers, a pulsed lift brake and a pulsed flipper
/// relay.
///
/// One controller covers every season variant of this mechanism; the
/// differences live in [`MechanismConfig`].
pub struct MechanismSystem {
    lift: ActuatorChannel,
    lift_follower: ActuatorChannel,
    collector_left: ActuatorChannel,
    collector_right: ActuatorChannel,
    brake: Interlock,
    flipper: Interlock,
    config: MechanismConfig,
    zeroed: bool,
    telemetry: Arc<dyn TelemetrySink>,
}

impl MechanismSystem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        make: &mut dyn FnMut(u32) -> Box<dyn ActuatorInterface>,
        lift_id: u32,
        lift_follower_id: u32,
        collector_left_id: u32,
        collector_right_id: u32,
        brake_id: u32,
        flipper_id: u32,
        config: MechanismConfig,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self> {
        let lift = ActuatorChannel::closed_loop(
            "lift/upper",
            make(lift_id),
            config.invert_upper_lift,
            config.aligned_sensor,
            &config.gains,
            LimitSwitchPolarity::NormallyOpen,
            telemetry.clone(),
        )?;
        let lift_follower = ActuatorChannel::follower(
            "lift/lower",
            make(lift_follower_id),
            &lift,
            config.invert_lower_lift,
            telemetry.clone(),
        )?;
        let collector_left = ActuatorChannel::open_loop(
            "collector/left",
            make(collector_left_id),
            config.invert_left_collector,
            telemetry.clone(),
        );
        let collector_right = ActuatorChannel::open_loop(
            "collector/right",
            make(collector_right_id),
            config.invert_right_collector,
            telemetry.clone(),
        );

        let brake = Interlock::new(
            "lift/brake",
            ActuatorChannel::open_loop(
                "lift/brake_motor",
                make(brake_id),
                config.invert_brake,
                telemetry.clone(),
            ),
            config.brake_on_strength,
            config.brake_off_strength,
            Duration::from_millis(config.brake_interval_ms),
            Duration::from_millis(config.brake_dwell_ms),
        );
        let flipper = Interlock::new(
            "flipper/deployed",
            ActuatorChannel::open_loop(
                "flipper/relay",
                make(flipper_id),
                config.invert_flipper,
                telemetry.clone(),
            ),
            config.flipper_strength,
            0.0,
            Duration::from_millis(config.flipper_interval_ms),
            Duration::from_millis(config.flipper_dwell_ms),
        );

        debug!("lift follower: {} mirrors {}", lift_follower.name(), lift.name());

        Ok(Self {
            lift,
            lift_follower,
            collector_left,
            collector_right,
            brake,
            flipper,
            config,
            zeroed: false,
            telemetry,
        })
    }

    pub fn collect(&mut self) {
        self.set_collector(self.config.collector_in_strength);
    }

    pub fn deposit(&mut self) {
        self.set_collector(self.config.collector_out_strength);
    }

    /// Fixed collector strength on both rollers.
    pub fn set_collector(&mut self, strength: f64) {
        self.collector_left.set_open_loop(strength);
        self.collector_right.set_open_loop(strength);
        self.telemetry.put_double("collector/strength", strength);
    }

    /// Manual lift command; refused while the brake is engaged so the
    /// motors never fight the brake.
    pub fn run_lift_open_loop(&mut self, strength: f64) {
        if self.brake.is_engaged() {
            return;
        }
        self.lift.set_open_loop(strength);
    }

    /// Profiled lift move to a configured level.
    ///
    /// Releases the brake first; a move requested while the brake is still
    /// inside its holdoff window is refused outright, so the lift motors
    /// never fight the engaged brake. Out-of-range levels clamp to the top
    /// entry.
    pub fn go_to_level(&mut self, level: usize, now: Instant) {
        if self.brake.is_engaged() && !self.brake.release(now) {
            warn!("lift move to level {} refused, brake in holdoff", level);
            return;
        }

        let levels = &self.config.lift_levels;
        let ticks = levels
            .get(level)
            .or_else(|| levels.last())
            .copied()
            .unwrap_or(0);
        let cruise = (self.config.profile.speed_rpm as f64 * self.config.rpm_to_ticks).round() as i32;
        let accel = (self.config.profile.accel_rpm as f64 * self.config.rpm_to_ticks).round() as i32;

        self.lift.set_profiled_target(ticks, cruise, accel);
        self.telemetry.put_double("lift/target_level", level as f64);
    }

    pub fn lift_position(&self) -> i32 {
        self.lift.sensor_position()
    }

    pub fn deploy(&mut self, now: Instant) -> bool {
        self.flipper.engage(now)
    }

    pub fn brake_on(&mut self, now: Instant) -> bool {
        self.brake.engage(now)
    }

    pub fn brake_off(&mut self, now: Instant) -> bool {
        self.brake.release(now)
    }

    pub fn brake_engaged(&self) -> bool {
        self.brake.is_engaged()
    }

    pub fn flipper_deployed(&self) -> bool {
        self.flipper.is_engaged()
    }

    fn safe(&mut self) {
        self.set_collector(0.0);
        self.lift.set_open_loop(0.0);
    }
}

impl System for MechanismSystem {
    fn name(&self) -> &'static str {
        "mechanism"
    }

    fn auto_init(&mut self, now: Instant) {
        self.safe();

        if !self.zeroed {
            // Lift sits at its base position at power-up; zero here, once.
            self.lift.reset_sensor_position(0);
            self.zeroed = true;
            info!("lift encoder zeroed");
        }

        self.brake_on(now);
    }

    fn auto_stop(&mut self, now: Instant) {
        self.safe();
        self.brake_on(now);
    }

    fn disabled_init(&mut self, _now: Instant) {
        self.safe();
    }

    /// Safes the motors only; the brake and flipper retain their last
    /// commanded state across the mode transition.
    fn teleop_init(&mut self, _now: Instant) {
        self.safe();
    }

    fn teleop_periodic(&mut self, input: &ControlSnapshot, now: Instant) {
        // Collector: the axis is a trigger, not a proportional input. Above
        // the dead zone the fixed configured strength applies.
        let axis = input.axis(Axis::CollectorIn);
        let strength = if axis.abs() > self.config.collector_dead_zone {
            self.config.collector_in_strength
        } else if input.button(Button::CollectorOut) {
            self.config.collector_out_strength
        } else {
            0.0
        };
        self.set_collector(strength);

        // Brake toggle; the interlock holds off rapid re-triggers.
        if input.button(Button::BrakeToggle) {
            self.brake.toggle(now);
        }

        // Lift axis, scaled; suppressed while the brake holds.
        let lift_axis = input.axis(Axis::Lift);
        let lift_strength = if lift_axis.abs() > self.config.lift_dead_zone {
            lift_axis * self.config.lift_factor
        } else {
            0.0
        };
        self.run_lift_open_loop(lift_strength);

        if input.button(Button::FlipperDeploy) {
            self.deploy(now);
        }
    }

    fn tick(&mut self, now: Instant) {
        self.brake.tick(now);

        // The relay pulse is one-shot: once the dwell write lands, return
        // the toggle to released so a later deploy is accepted. The forced
        // release re-arms even when the dwell undercuts the holdoff.
        if self.flipper.tick(now) {
            self.flipper.force_release(now);
        }
    }
}
