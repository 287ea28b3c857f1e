// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

mod drive;
mod mechanism;

pub use drive::DriveSystem;
pub use mechanism::MechanismSystem;

use std::time::Instant;

use freezy_core::input::ControlSnapshot;

/// Mode-scoped entry points of a mechanism controller.
///
/// The host calls `*_init` hooks exactly once per mode transition and the
/// periodic hooks once per tick. `tick` runs in every mode and services
/// per-subsystem housekeeping such as interlock dwell deadlines.
pub trait System {
    fn name(&self) -> &'static str;

    /// Force a known-safe configuration, establish the sensor zero if this
    /// is the canonical reference moment, engage safety interlocks.
    fn auto_init(&mut self, now: Instant);

    /// Safe the actuators without touching sensor zeros.
    fn auto_stop(&mut self, now: Instant);

    fn disabled_init(&mut self, now: Instant);

    fn teleop_init(&mut self, now: Instant);

    /// Derive actuator commands from the raw control snapshot.
    fn teleop_periodic(&mut self, input: &ControlSnapshot, now: Instant);

    fn tick(&mut self, _now: Instant) {}
}

/// All mechanism controllers of the robot.
///
/// Constructed once at startup and passed by reference to every action and
/// to the sequencer; replaces process-wide mechanism singletons so the
/// initialization order is explicit.
pub struct Systems {
    pub drive: DriveSystem,
    pub mechanism: MechanismSystem,
}

impl Systems {
    pub fn new(drive: DriveSystem, mechanism: MechanismSystem) -> Self {
        Self { drive, mechanism }
    }

    pub(crate) fn auto_init(&mut self, now: Instant) {
        self.drive.auto_init(now);
        self.mechanism.auto_init(now);
    }

    pub(crate) fn auto_stop(&mut self, now: Instant) {
        self.drive.auto_stop(now);
        self.mechanism.auto_stop(now);
    }

    pub(crate) fn disabled_init(&mut self, now: Instant) {
        self.drive.disabled_init(now);
        self.mechanism.disabled_init(now);
    }

    pub(crate) fn teleop_init(&mut self, now: Instant) {
        self.drive.teleop_init(now);
        self.mechanism.teleop_init(now);
    }

    pub(crate) fn teleop_periodic(&mut self, input: &ControlSnapshot, now: Instant) {
        self.drive.teleop_periodic(input, now);
        self.mechanism.teleop_periodic(input, now);
    }

    pub(crate) fn tick(&mut self, now: Instant) {
        self.drive.tick(now);
        self.mechanism.tick(now);
    }
}
