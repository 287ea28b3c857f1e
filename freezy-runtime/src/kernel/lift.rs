// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::time::Instant;

use super::{Action, ActionKind};
use crate::system::Systems;

/// Profiled lift move to a configured level index.
pub struct LiftAction {
    name: String,
    level: usize,
}

impl LiftAction {
    pub fn new(level: usize) -> Self {
        Self::named("lift to level", level)
    }

    pub fn named(name: impl Into<String>, level: usize) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

impl Action for LiftAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, systems: &mut Systems, now: Instant) {
        systems.mechanism.go_to_level(self.level, now);
    }

    fn process(&mut self, _systems: &mut Systems, _now: Instant) {
        // The profile tracks the level setpoint in hardware.
    }

    fn cleanup(&mut self, _systems: &mut Systems, _now: Instant) {
        // The closed loop holds the reached level; nothing to safe.
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Lift { level: self.level }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::{fixture, ids};
    use crate::system::System;
    use std::time::Duration;

    #[test]
    fn initialize_releases_the_brake_before_the_move() {
        let mut f = fixture();
        let t0 = Instant::now();

        // Autonomous init leaves the brake engaged.
        f.systems.mechanism.auto_init(t0);
        assert!(f.systems.mechanism.brake_engaged());

        // By the time the lift entry starts, the preceding entry's time box
        // has cleared the brake holdoff.
        let mut action = LiftAction::new(1);
        action.initialize(&mut f.systems, t0 + Duration::from_millis(600));

        assert!(!f.systems.mechanism.brake_engaged());
        let (ticks, _, _) = f.bus.profiled_target(ids::LIFT_UPPER).unwrap();
        assert_eq!(ticks, 140);
    }
}
