// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::time::Instant;

use super::{Action, ActionKind};
use crate::system::Systems;

/// Deliberate pause; holds the sequence for its time box.
pub struct IdleAction {
    name: String,
}

impl IdleAction {
    pub fn new() -> Self {
        Self::named("idle")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for IdleAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for IdleAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _systems: &mut Systems, _now: Instant) {}

    fn process(&mut self, _systems: &mut Systems, _now: Instant) {}

    fn cleanup(&mut self, _systems: &mut Systems, _now: Instant) {}

    fn kind(&self) -> ActionKind {
        ActionKind::Idle
    }
}
