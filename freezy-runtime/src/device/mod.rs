// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

mod error;
pub mod sim;

pub use error::{DeviceError, ErrorKind, Result};

use freezy_core::control::{LimitSwitchPolarity, PidGains};

/// Travel direction guarded by a limit switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitDirection {
    Forward,
    Reverse,
}

/// Output stage behavior when the commanded value is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NeutralBehavior {
    Brake,
    Coast,
}

/// Hardware motor controller interface.
///
/// Configuration calls return a result; a failure here is fatal at startup
/// and the process must not proceed with a misconfigured actuator. Command
/// calls are fire and forget.
pub trait ActuatorInterface: Send {
    /// Stable hardware identifier of this actuator.
    fn id(&self) -> u32;

    fn set_inverted(&mut self, inverted: bool);

    /// Open-loop output as percent of maximum, in `-1.0..1.0`.
    fn set_output(&mut self, percent: f64);

    /// Reconfigure the motion profile limits in sensor ticks per unit time.
    fn configure_profile(&mut self, cruise: i32, accel: i32);

    /// Closed-loop profiled position target in sensor ticks.
    fn set_profiled_target(&mut self, ticks: i32);

    fn configure_feedback_sensor(&mut self, aligned: bool) -> Result<()>;

    fn configure_limit_switch(
        &mut self,
        direction: LimitDirection,
        polarity: LimitSwitchPolarity,
    ) -> Result<()>;

    fn configure_pid(&mut self, gains: &PidGains) -> Result<()>;

    fn set_neutral_behavior(&mut self, behavior: NeutralBehavior) -> Result<()>;

    /// Mirror another actuator's output from here on.
    fn set_follower(&mut self, leader: u32) -> Result<()>;

    fn sensor_position(&self) -> i32;

    fn reset_sensor_position(&mut self, value: i32);
}

/// Heading feedback source.
pub trait HeadingSource: Send {
    /// Accumulated heading in degrees since the last reset.
    fn angle(&self) -> f64;

    /// Re-establish the zero heading reference.
    fn reset(&mut self);
}
