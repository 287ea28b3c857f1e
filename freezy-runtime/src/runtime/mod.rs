// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Mode coordinator.
//!
//! The host drives [`Runtime`] from a single periodic loop: one init call
//! on every mode transition, one periodic call per tick. The runtime fans
//! those out to the subsystem controllers and, in autonomous, to the action
//! sequencer. Time-based housekeeping always runs before new commands are
//! issued within a tick, so a pending interlock write can never clobber a
//! command from the same tick.

mod error;

pub use error::Error;

use std::time::Instant;

use freezy_core::input::ControlSnapshot;

use crate::config::Config;
use crate::kernel::chooser::{self, Routine};
use crate::kernel::ActionSequencer;
use crate::system::Systems;

pub type Result<T = ()> = std::result::Result<T, Error>;

/// Competition mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Disabled,
    Autonomous,
    Teleop,
}

pub struct Runtime {
    systems: Systems,
    config: Config,
    routine: Routine,
    sequencer: Option<ActionSequencer>,
    mode: Mode,
}

impl Runtime {
    pub fn new(systems: Systems, config: Config) -> Self {
        let routine = Routine::from_id(config.runtime.routine);

        Self {
            systems,
            config,
            routine,
            sequencer: None,
            mode: Mode::Disabled,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn routine(&self) -> Routine {
        self.routine
    }

    pub fn systems(&mut self) -> &mut Systems {
        &mut self.systems
    }

    /// Override the configured routine; takes effect at the next auto init.
    pub fn select_routine(&mut self, routine: Routine) {
        info!("routine selected: {}", routine);
        self.routine = routine;
    }

    /// Enter autonomous: reset the subsystems and expand the selected
    /// routine into a fresh sequence.
    pub fn auto_init(&mut self, now: Instant) {
        info!("autonomous init, routine: {}", self.routine);

        self.systems.auto_init(now);
        self.sequencer = Some(chooser::build_routine(self.routine, &self.config));
        self.mode = Mode::Autonomous;
    }

    /// One autonomous tick; returns `true` once the routine has completed.
    pub fn auto_periodic(&mut self, now: Instant) -> bool {
        self.systems.tick(now);

        match self.sequencer.as_mut() {
            Some(sequencer) => sequencer.step(&mut self.systems, now),
            None => true,
        }
    }

    pub fn auto_done(&self) -> bool {
        self.sequencer
            .as_ref()
            .map(|sequencer| sequencer.is_complete())
            .unwrap_or(true)
    }

    /// Leave autonomous: abort whatever is still running and safe the
    /// subsystems.
    pub fn auto_stop(&mut self, now: Instant) {
        info!("autonomous stop");

        self.abort_sequence(now);
        self.systems.auto_stop(now);
        self.mode = Mode::Disabled;
    }

    pub fn teleop_init(&mut self, now: Instant) {
        info!("teleop init");

        self.abort_sequence(now);
        self.systems.teleop_init(now);
        self.mode = Mode::Teleop;
    }

    /// One teleop tick against the latest operator input.
    pub fn teleop_periodic(&mut self, input: &ControlSnapshot, now: Instant) {
        self.systems.tick(now);
        self.systems.teleop_periodic(input, now);
    }

    pub fn disabled_init(&mut self, now: Instant) {
        info!("disabled init");

        self.abort_sequence(now);
        self.systems.disabled_init(now);
        self.mode = Mode::Disabled;
    }

    fn abort_sequence(&mut self, now: Instant) {
        if let Some(sequencer) = self.sequencer.as_mut() {
            sequencer.abort(&mut self.systems, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::testing::{fixture, ids};
    use std::time::Duration;

    #[test]
    fn teleop_init_aborts_a_running_routine() {
        let f = fixture();
        let mut runtime = Runtime::new(f.systems, f.config);
        runtime.select_routine(Routine::TurningForever);

        let t0 = Instant::now();
        runtime.auto_init(t0);
        assert_eq!(runtime.mode(), Mode::Autonomous);

        runtime.auto_periodic(t0 + Duration::from_millis(20));
        assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), 0.3);

        runtime.teleop_init(t0 + Duration::from_millis(40));
        assert_eq!(runtime.mode(), Mode::Teleop);
        assert_eq!(f.bus.effective_output(ids::DRIVE_LEFT), 0.0);
        assert!(runtime.auto_done());
    }

    #[test]
    fn routine_runs_to_completion() {
        let f = fixture();
        let mut runtime = Runtime::new(f.systems, f.config);
        runtime.select_routine(Routine::DoNothing);

        let t0 = Instant::now();
        runtime.auto_init(t0);
        assert!(!runtime.auto_periodic(t0));
        assert!(runtime.auto_periodic(t0 + Duration::from_secs(15)));
        assert!(runtime.auto_done());
    }

    #[test]
    fn auto_before_init_reports_done() {
        let f = fixture();
        let mut runtime = Runtime::new(f.systems, f.config);
        assert!(runtime.auto_done());
        assert!(runtime.auto_periodic(Instant::now()));
    }

    #[test]
    fn configured_routine_id_is_honored() {
        let f = fixture();
        let mut config = f.config.clone();
        config.runtime.routine = 2;

        let runtime = Runtime::new(f.systems, config);
        assert_eq!(runtime.routine(), Routine::LiftAndDeposit);
    }
}
