// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use freezy_core::control::{LimitSwitchPolarity, PidGains};

use super::{
    ActuatorInterface, DeviceError, ErrorKind, HeadingSource, LimitDirection, NeutralBehavior,
    Result,
};

const DEVICE_NAME: &str = "sim";

#[derive(Debug, Default, Clone)]
struct MotorState {
    inverted: bool,
    output: f64,
    target: Option<i32>,
    cruise: i32,
    accel: i32,
    profile_writes: u32,
    position: i32,
    follower_of: Option<u32>,
    forward_limit: bool,
    reverse_limit: bool,
}

/// In-memory actuator bus standing in for the real motor controllers.
///
/// Every [`SimActuator`] handle shares one bus so that follower topology,
/// limit switches and sensor positions behave like the coupled hardware.
/// Doubles as the test double for the whole device layer.
#[derive(Clone, Default)]
pub struct SimBus {
    motors: Arc<Mutex<HashMap<u32, MotorState>>>,
}

impl SimBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a handle for one actuator, creating it on first use.
    pub fn actuator(&self, id: u32) -> SimActuator {
        self.motors.lock().unwrap().entry(id).or_default();
        SimActuator {
            id,
            bus: self.clone(),
        }
    }

    fn with<R>(&self, id: u32, f: impl FnOnce(&mut MotorState) -> R) -> R {
        let mut motors = self.motors.lock().unwrap();
        f(motors.entry(id).or_default())
    }

    /// Effective output of an actuator after follower mirroring, polarity
    /// and limit switches are applied.
    pub fn effective_output(&self, id: u32) -> f64 {
        let motors = self.motors.lock().unwrap();
        let motor = match motors.get(&id) {
            Some(motor) => motor,
            None => return 0.0,
        };

        let raw = match motor.follower_of {
            Some(leader) => motors.get(&leader).map(|m| m.output).unwrap_or(0.0),
            None => motor.output,
        };
        let value = if motor.inverted { -raw } else { raw };

        // The output stage opens when the switch in the direction of travel closes.
        if (value > 0.0 && motor.forward_limit) || (value < 0.0 && motor.reverse_limit) {
            0.0
        } else {
            value
        }
    }

    pub fn position(&self, id: u32) -> i32 {
        self.with(id, |m| m.position)
    }

    pub fn set_position(&self, id: u32, ticks: i32) {
        self.with(id, |m| m.position = ticks);
    }

    pub fn set_limit(&self, id: u32, direction: LimitDirection, pressed: bool) {
        self.with(id, |m| match direction {
            LimitDirection::Forward => m.forward_limit = pressed,
            LimitDirection::Reverse => m.reverse_limit = pressed,
        });
    }

    /// Active profiled target as `(ticks, cruise, accel)`.
    pub fn profiled_target(&self, id: u32) -> Option<(i32, i32, i32)> {
        self.with(id, |m| m.target.map(|t| (t, m.cruise, m.accel)))
    }

    /// Number of motion profile reconfigurations seen by an actuator.
    pub fn profile_writes(&self, id: u32) -> u32 {
        self.with(id, |m| m.profile_writes)
    }

    /// Advance every profiled motor one tick toward its target.
    pub fn step(&self) {
        let mut motors = self.motors.lock().unwrap();
        for motor in motors.values_mut() {
            if let Some(target) = motor.target {
                let step = motor.cruise.max(1);
                let delta = (target - motor.position).clamp(-step, step);
                motor.position += delta;
            }
        }
    }
}

/// Simulated motor controller handle.
pub struct SimActuator {
    id: u32,
    bus: SimBus,
}

impl ActuatorInterface for SimActuator {
    fn id(&self) -> u32 {
        self.id
    }

    fn set_inverted(&mut self, inverted: bool) {
        self.bus.with(self.id, |m| m.inverted = inverted);
    }

    fn set_output(&mut self, percent: f64) {
        self.bus.with(self.id, |m| {
            m.output = percent;
            m.target = None;
        });
    }

    fn configure_profile(&mut self, cruise: i32, accel: i32) {
        self.bus.with(self.id, |m| {
            m.cruise = cruise;
            m.accel = accel;
            m.profile_writes += 1;
        });
    }

    fn set_profiled_target(&mut self, ticks: i32) {
        self.bus.with(self.id, |m| {
            m.target = Some(ticks);
            m.output = 0.0;
        });
    }

    fn configure_feedback_sensor(&mut self, _aligned: bool) -> Result<()> {
        Ok(())
    }

    fn configure_limit_switch(
        &mut self,
        _direction: LimitDirection,
        _polarity: LimitSwitchPolarity,
    ) -> Result<()> {
        Ok(())
    }

    fn configure_pid(&mut self, _gains: &PidGains) -> Result<()> {
        Ok(())
    }

    fn set_neutral_behavior(&mut self, _behavior: NeutralBehavior) -> Result<()> {
        Ok(())
    }

    fn set_follower(&mut self, leader: u32) -> Result<()> {
        let mut motors = self.bus.motors.lock().unwrap();

        let leader_state = motors.get(&leader).ok_or_else(|| {
            DeviceError::new(DEVICE_NAME, ErrorKind::UnknownActuator(leader))
        })?;
        if leader_state.follower_of == Some(self.id) || leader == self.id {
            return Err(DeviceError::new(
                DEVICE_NAME,
                ErrorKind::FollowerCycle(self.id),
            ));
        }

        motors.entry(self.id).or_default().follower_of = Some(leader);
        Ok(())
    }

    fn sensor_position(&self) -> i32 {
        self.bus.position(self.id)
    }

    fn reset_sensor_position(&mut self, value: i32) {
        self.bus.set_position(self.id, value);
    }
}

/// Simulated gyro with an externally settable heading.
#[derive(Clone, Default)]
pub struct SimGyro {
    angle: Arc<Mutex<f64>>,
}

impl SimGyro {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_angle(&self, degrees: f64) {
        *self.angle.lock().unwrap() = degrees;
    }
}

impl HeadingSource for SimGyro {
    fn angle(&self) -> f64 {
        *self.angle.lock().unwrap()
    }

    fn reset(&mut self) {
        *self.angle.lock().unwrap() = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follower_mirrors_leader_for_any_history() {
        let bus = SimBus::new();
        let mut leader = bus.actuator(1);
        let mut follower = bus.actuator(2);

        follower.set_follower(1).unwrap();
        follower.set_inverted(true);

        for value in [0.0, 0.5, -1.0, 0.25, 0.0, -0.125, 1.0] {
            leader.set_output(value);
            assert_eq!(bus.effective_output(1), value);
            assert_eq!(bus.effective_output(2), -value);
        }
    }

    #[test]
    fn follower_rejects_unknown_leader_and_cycles() {
        let bus = SimBus::new();
        let mut a = bus.actuator(1);
        let mut b = bus.actuator(2);

        assert!(a.set_follower(9).is_err());

        b.set_follower(1).unwrap();
        assert!(a.set_follower(2).is_err());
        assert!(a.set_follower(1).is_err());
    }

    #[test]
    fn limit_switch_opens_output_stage() {
        let bus = SimBus::new();
        let mut motor = bus.actuator(1);

        motor.set_output(0.6);
        bus.set_limit(1, LimitDirection::Forward, true);
        assert_eq!(bus.effective_output(1), 0.0);

        motor.set_output(-0.6);
        assert_eq!(bus.effective_output(1), -0.6);
    }

    #[test]
    fn profiled_motor_tracks_target() {
        let bus = SimBus::new();
        let mut motor = bus.actuator(1);

        motor.configure_profile(100, 50);
        motor.set_profiled_target(250);

        bus.step();
        bus.step();
        bus.step();
        assert_eq!(bus.position(1), 250);
    }
}
