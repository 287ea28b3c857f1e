// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::time::Instant;

use super::{Action, ActionKind};
use crate::system::Systems;

/// Profiled straight drive to a linear position.
///
/// Issues a single profiled setpoint at initialize; the closed-loop
/// controller tracks it in hardware, so `process` has nothing to do.
/// Completion is owned by the sequencer time box.
pub struct DriveToPositionAction {
    name: String,
    target_inches: f64,
    speed_rpm: i32,
    accel_rpm: i32,
    reset_gyro: bool,
}

impl DriveToPositionAction {
    pub fn new(target_inches: f64, speed_rpm: i32, accel_rpm: i32, reset_gyro: bool) -> Self {
        Self::named(
            "drive to position",
            target_inches,
            speed_rpm,
            accel_rpm,
            reset_gyro,
        )
    }

    pub fn named(
        name: impl Into<String>,
        target_inches: f64,
        speed_rpm: i32,
        accel_rpm: i32,
        reset_gyro: bool,
    ) -> Self {
        Self {
            name: name.into(),
            target_inches,
            speed_rpm,
            accel_rpm,
            reset_gyro,
        }
    }
}

impl Action for DriveToPositionAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, systems: &mut Systems, _now: Instant) {
        systems.drive.prepare_heading(self.reset_gyro);
        systems
            .drive
            .drive_to(self.target_inches, self.speed_rpm, self.accel_rpm);
    }

    fn process(&mut self, _systems: &mut Systems, _now: Instant) {
        // The profile tracks the setpoint in hardware.
    }

    fn cleanup(&mut self, systems: &mut Systems, now: Instant) {
        use crate::system::System;
        systems.drive.auto_stop(now);
    }

    fn kind(&self) -> ActionKind {
        ActionKind::DriveToPosition {
            target_inches: self.target_inches,
            speed_rpm: self.speed_rpm,
            accel_rpm: self.accel_rpm,
            reset_gyro: self.reset_gyro,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::{fixture, ids};

    #[test]
    fn single_setpoint_at_initialize() {
        let mut f = fixture();
        let now = Instant::now();
        let mut action = DriveToPositionAction::new(72.0, 900, 450, true);

        action.initialize(&mut f.systems, now);
        let target = f.bus.profiled_target(ids::DRIVE_LEFT);
        assert!(target.is_some());

        // Further ticks do not disturb the setpoint.
        action.process(&mut f.systems, now);
        assert_eq!(f.bus.profiled_target(ids::DRIVE_LEFT), target);
        assert_eq!(f.bus.profile_writes(ids::DRIVE_LEFT), 1);

        action.cleanup(&mut f.systems, now);
        assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), 0.0);
    }
}
