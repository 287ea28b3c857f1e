// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::time::Instant;

use super::{Action, ActionKind};
use crate::system::Systems;

/// Point turn at a fixed speed.
///
/// Captures the heading reference at initialize (0.0 after a gyro reset)
/// and commands rotation in the sign direction of the remaining angle each
/// tick. Completion is owned by the sequencer time box.
pub struct TurnAction {
    name: String,
    angle_to_turn: f64,
    speed: f64,
    reset_gyro: bool,
    initial_heading: f64,
}

impl TurnAction {
    pub fn new(angle_to_turn: f64, speed: f64, reset_gyro: bool) -> Self {
        Self::named("turn", angle_to_turn, speed, reset_gyro)
    }

    pub fn named(name: impl Into<String>, angle_to_turn: f64, speed: f64, reset_gyro: bool) -> Self {
        Self {
            name: name.into(),
            angle_to_turn,
            speed,
            reset_gyro,
            initial_heading: 0.0,
        }
    }

    pub fn initial_heading(&self) -> f64 {
        self.initial_heading
    }
}

impl Action for TurnAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, systems: &mut Systems, _now: Instant) {
        self.initial_heading = systems.drive.prepare_heading(self.reset_gyro);
    }

    fn process(&mut self, systems: &mut Systems, _now: Instant) {
        let delta = self.angle_to_turn - self.initial_heading;
        systems.drive.rotate_to(delta, self.speed);
    }

    fn cleanup(&mut self, systems: &mut Systems, now: Instant) {
        use crate::system::System;
        systems.drive.auto_stop(now);
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Turn {
            angle_to_turn: self.angle_to_turn,
            speed: self.speed,
            reset_gyro: self.reset_gyro,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::{fixture, ids};

    #[test]
    fn turn_scenario_rotates_right_until_stopped() {
        let mut f = fixture();
        let now = Instant::now();
        let mut action = TurnAction::new(45.0, 0.3, true);

        f.gyro.set_angle(12.0);
        action.initialize(&mut f.systems, now);

        // Gyro reset means the captured reference is zero.
        assert_eq!(action.initial_heading(), 0.0);

        for _ in 0..3 {
            action.process(&mut f.systems, now);
            assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), 0.3);
            assert_eq!(f.bus.effective_output(ids::DRIVE_RIGHT), -0.3);
        }

        action.cleanup(&mut f.systems, now);
        assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), 0.0);
        assert_eq!(f.bus.effective_output(ids::DRIVE_RIGHT), 0.0);
    }

    #[test]
    fn negative_angle_rotates_left() {
        let mut f = fixture();
        let now = Instant::now();
        let mut action = TurnAction::new(-30.0, 0.3, true);

        action.initialize(&mut f.systems, now);
        action.process(&mut f.systems, now);
        assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), -0.3);
        assert_eq!(f.bus.effective_output(ids::DRIVE_RIGHT), 0.3);
    }

    #[test]
    fn without_reset_the_current_heading_is_the_reference() {
        let mut f = fixture();
        let now = Instant::now();
        let mut action = TurnAction::new(45.0, 0.3, false);

        f.gyro.set_angle(50.0);
        action.initialize(&mut f.systems, now);
        assert_eq!(action.initial_heading(), 50.0);

        // Remaining angle is negative, so the turn goes left.
        action.process(&mut f.systems, now);
        assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), -0.3);
    }
}
