// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Autonomous action kernel.
//!
//! An action is a unit of autonomous work with a uniform lifecycle:
//! `initialize` once, `process` once per tick while running, `cleanup`
//! exactly once on the way out. The sequencer executes an ordered list of
//! actions strictly one at a time and owns every lifecycle transition.

mod actuate;
mod drive;
mod idle;
mod lift;
mod turn;

pub mod chooser;
pub mod persist;
mod sequencer;

pub use actuate::ActuateAction;
pub use chooser::Routine;
pub use drive::DriveToPositionAction;
pub use idle::IdleAction;
pub use lift::LiftAction;
pub use persist::{ActionKind, ActionRecord};
pub use sequencer::ActionSequencer;
pub use turn::TurnAction;

use std::time::Instant;

use crate::system::Systems;

/// Lifecycle state of one sequenced action; strictly forward, no re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionState {
    Idle,
    Running,
    Done,
}

/// A unit of autonomous work.
///
/// Parameters are captured at construction and immutable afterwards. The
/// sequencer calls `initialize` exactly once, `process` once per tick while
/// the action runs, and `cleanup` exactly once, whether the action completes
/// or the sequence is aborted. Variants without a completion predicate
/// leave `is_done` at its default and rely on the sequencer time box.
pub trait Action: Send {
    fn name(&self) -> &str;

    /// Capture one-time reference values and issue the first command.
    fn initialize(&mut self, systems: &mut Systems, now: Instant);

    /// Re-issue or update the subsystem command.
    fn process(&mut self, systems: &mut Systems, now: Instant);

    /// Leave every touched mechanism in a safe state.
    fn cleanup(&mut self, systems: &mut Systems, now: Instant);

    /// Optional self-completion predicate.
    fn is_done(&self) -> bool {
        false
    }

    /// Serializable description of this action's parameters.
    fn kind(&self) -> ActionKind;
}
