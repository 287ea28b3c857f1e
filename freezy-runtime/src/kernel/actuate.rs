// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::time::Instant;

use super::{Action, ActionKind};
use crate::system::Systems;

/// Run the collector rollers at a fixed strength for the action's time box.
///
/// Positive strength collects, negative ejects.
pub struct ActuateAction {
    name: String,
    strength: f64,
}

impl ActuateAction {
    pub fn new(strength: f64) -> Self {
        Self::named("actuate collector", strength)
    }

    pub fn named(name: impl Into<String>, strength: f64) -> Self {
        Self {
            name: name.into(),
            strength,
        }
    }
}

impl Action for ActuateAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, systems: &mut Systems, _now: Instant) {
        systems.mechanism.set_collector(self.strength);
    }

    fn process(&mut self, systems: &mut Systems, _now: Instant) {
        systems.mechanism.set_collector(self.strength);
    }

    fn cleanup(&mut self, systems: &mut Systems, _now: Instant) {
        systems.mechanism.set_collector(0.0);
    }

    fn kind(&self) -> ActionKind {
        ActionKind::Actuate {
            strength: self.strength,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::{fixture, ids};

    #[test]
    fn rollers_run_until_cleanup() {
        let mut f = fixture();
        let now = Instant::now();
        let mut action = ActuateAction::new(-1.0);

        action.initialize(&mut f.systems, now);
        assert_eq!(f.bus.effective_output(ids::COLLECTOR_LEFT), -1.0);
        assert_eq!(f.bus.effective_output(ids::COLLECTOR_RIGHT), -1.0);

        action.cleanup(&mut f.systems, now);
        assert_eq!(f.bus.effective_output(ids::COLLECTOR_LEFT), 0.0);
    }
}
