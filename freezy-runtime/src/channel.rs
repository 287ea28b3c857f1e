// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::sync::Arc;

use freezy_core::control::{LimitSwitchPolarity, PidGains};
use freezy_core::telemetry::TelemetrySink;

use crate::device::{ActuatorInterface, LimitDirection, NeutralBehavior, Result};

/// Role of a channel in a leader/follower pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Leader,
    Follower { leader: u32 },
}

/// Control capability of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    /// Percent-of-maximum output only.
    OpenLoop,
    /// Percent output and profiled position targets.
    ClosedLoop,
}

/// A single physical output with its safety configuration.
///
/// Every command issued through a channel is mirrored to the telemetry
/// sink under the channel's path name. A follower channel mirrors its
/// leader in hardware and never accepts a direct command; sending one is a
/// programming error and panics.
pub struct ActuatorChannel {
    name: String,
    actuator: Box<dyn ActuatorInterface>,
    role: Role,
    mode: ControlMode,
    last_profile: Option<(i32, i32)>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl ActuatorChannel {
    /// Open-loop channel without feedback.
    pub fn open_loop(
        name: impl Into<String>,
        mut actuator: Box<dyn ActuatorInterface>,
        inverted: bool,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        actuator.set_inverted(inverted);

        Self {
            name: name.into(),
            actuator,
            role: Role::Leader,
            mode: ControlMode::OpenLoop,
            last_profile: None,
            telemetry,
        }
    }

    /// Closed-loop channel: feedback sensor, limit switches on both travel
    /// directions, gains and brake-on-idle.
    pub fn closed_loop(
        name: impl Into<String>,
        mut actuator: Box<dyn ActuatorInterface>,
        inverted: bool,
        aligned_sensor: bool,
        gains: &PidGains,
        limit_polarity: LimitSwitchPolarity,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self> {
        actuator.set_inverted(inverted);
        actuator.configure_feedback_sensor(aligned_sensor)?;
        actuator.configure_limit_switch(LimitDirection::Forward, limit_polarity)?;
        actuator.configure_limit_switch(LimitDirection::Reverse, limit_polarity)?;
        actuator.configure_pid(gains)?;
        actuator.set_neutral_behavior(NeutralBehavior::Brake)?;

        Ok(Self {
            name: name.into(),
            actuator,
            role: Role::Leader,
            mode: ControlMode::ClosedLoop,
            last_profile: None,
            telemetry,
        })
    }

    /// Follower channel mirroring `leader`, scaled by its own polarity.
    pub fn follower(
        name: impl Into<String>,
        mut actuator: Box<dyn ActuatorInterface>,
        leader: &ActuatorChannel,
        inverted: bool,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Result<Self> {
        actuator.set_inverted(inverted);
        actuator.set_follower(leader.id())?;

        Ok(Self {
            name: name.into(),
            actuator,
            role: Role::Follower {
                leader: leader.id(),
            },
            mode: ControlMode::OpenLoop,
            last_profile: None,
            telemetry,
        })
    }

    pub fn id(&self) -> u32 {
        self.actuator.id()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn telemetry(&self) -> &Arc<dyn TelemetrySink> {
        &self.telemetry
    }

    fn reject_follower_command(&self) {
        if let Role::Follower { leader } = self.role {
            panic!(
                "channel {} follows actuator {}; direct commands are a logic bug",
                self.name, leader
            );
        }
    }

    /// Percent output in `-1.0..1.0`; out-of-range values are clamped.
    pub fn set_open_loop(&mut self, strength: f64) {
        self.reject_follower_command();

        let strength = strength.clamp(-1.0, 1.0);
        self.actuator.set_output(strength);
        self.telemetry.put_double(&self.name, strength);
    }

    /// Profiled position target in sensor ticks.
    ///
    /// Cruise and acceleration are rewritten only when they differ from the
    /// previous call, so repeated targets cost one hardware write.
    pub fn set_profiled_target(&mut self, ticks: i32, cruise: i32, accel: i32) {
        self.reject_follower_command();
        if self.mode != ControlMode::ClosedLoop {
            panic!("channel {} has no feedback sensor", self.name);
        }

        if self.last_profile != Some((cruise, accel)) {
            self.actuator.configure_profile(cruise, accel);
            self.last_profile = Some((cruise, accel));
        }
        self.actuator.set_profiled_target(ticks);
        self.telemetry
            .put_double(&format!("{}/target", self.name), ticks as f64);
    }

    pub fn sensor_position(&self) -> i32 {
        self.actuator.sensor_position()
    }

    /// Re-establish the sensor zero point.
    pub fn reset_sensor_position(&mut self, value: i32) {
        self.actuator.reset_sensor_position(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::sim::SimBus;
    use freezy_core::telemetry::NullSink;

    fn sink() -> Arc<dyn TelemetrySink> {
        Arc::new(NullSink)
    }

    fn closed_loop_channel(bus: &SimBus, id: u32) -> ActuatorChannel {
        ActuatorChannel::closed_loop(
            "test/motor",
            Box::new(bus.actuator(id)),
            false,
            true,
            &PidGains::new(1.0, 0.0, 0.0, 0.0),
            LimitSwitchPolarity::NormallyOpen,
            sink(),
        )
        .unwrap()
    }

    #[test]
    fn open_loop_command_reaches_hardware() {
        let bus = SimBus::new();
        let mut channel =
            ActuatorChannel::open_loop("test/motor", Box::new(bus.actuator(1)), false, sink());

        channel.set_open_loop(0.75);
        assert_eq!(bus.effective_output(1), 0.75);

        channel.set_open_loop(1.5);
        assert_eq!(bus.effective_output(1), 1.0);
    }

    #[test]
    fn profile_rewritten_only_on_change() {
        let bus = SimBus::new();
        let mut channel = closed_loop_channel(&bus, 1);

        channel.set_profiled_target(100, 900, 450);
        channel.set_profiled_target(200, 900, 450);
        assert_eq!(bus.profile_writes(1), 1);

        channel.set_profiled_target(200, 450, 450);
        assert_eq!(bus.profile_writes(1), 2);
        assert_eq!(bus.profiled_target(1), Some((200, 450, 450)));
    }

    #[test]
    #[should_panic(expected = "direct commands")]
    fn follower_rejects_direct_command() {
        let bus = SimBus::new();
        let leader = closed_loop_channel(&bus, 1);
        let mut follower = ActuatorChannel::follower(
            "test/follower",
            Box::new(bus.actuator(2)),
            &leader,
            false,
            sink(),
        )
        .unwrap();

        follower.set_open_loop(0.5);
    }

    #[test]
    #[should_panic(expected = "no feedback sensor")]
    fn open_loop_channel_rejects_profiled_target() {
        let bus = SimBus::new();
        let mut channel =
            ActuatorChannel::open_loop("test/motor", Box::new(bus.actuator(1)), false, sink());

        channel.set_profiled_target(100, 900, 450);
    }
}
