// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Routine selection.
//!
//! A routine is selected by numeric identifier before the autonomous phase
//! begins, then expanded into an action sequence against the active
//! configuration. Unknown identifiers fall back to the do-nothing routine
//! so a miskeyed selector can never command motion.

use std::time::Duration;

use super::{
    ActionSequencer, ActuateAction, DriveToPositionAction, IdleAction, LiftAction, TurnAction,
};
use crate::config::Config;

/// Selectable autonomous routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routine {
    DoNothing,
    DriveForward,
    LiftAndDeposit,
    TurningForever,
    PacingForever,
}

impl Routine {
    pub fn from_id(id: i32) -> Self {
        match id {
            1 => Routine::DriveForward,
            2 => Routine::LiftAndDeposit,
            3 => Routine::TurningForever,
            4 => Routine::PacingForever,
            _ => Routine::DoNothing,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            Routine::DoNothing => 0,
            Routine::DriveForward => 1,
            Routine::LiftAndDeposit => 2,
            Routine::TurningForever => 3,
            Routine::PacingForever => 4,
        }
    }
}

impl std::fmt::Display for Routine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Routine::DoNothing => write!(f, "do nothing"),
            Routine::DriveForward => write!(f, "drive forward"),
            Routine::LiftAndDeposit => write!(f, "lift and deposit"),
            Routine::TurningForever => write!(f, "turning forever"),
            Routine::PacingForever => write!(f, "pacing forever"),
        }
    }
}

/// Expand a routine into its action sequence.
///
/// Pure with respect to hardware; the sequence is data until stepped.
pub fn build_routine(routine: Routine, config: &Config) -> ActionSequencer {
    let speed_rpm = config.drive.profile.speed_rpm;
    let accel_rpm = config.drive.profile.accel_rpm;

    match routine {
        Routine::DoNothing => {
            ActionSequencer::new().then(Box::new(IdleAction::new()), Duration::from_secs(15))
        }
        Routine::DriveForward => ActionSequencer::new()
            .then(Box::new(IdleAction::new()), Duration::from_millis(500))
            .then(
                Box::new(DriveToPositionAction::new(
                    120.0, speed_rpm, accel_rpm, true,
                )),
                Duration::from_secs(5),
            ),
        Routine::LiftAndDeposit => ActionSequencer::new()
            .then(
                Box::new(DriveToPositionAction::new(
                    96.0, speed_rpm, accel_rpm, true,
                )),
                Duration::from_secs(4),
            )
            .then(Box::new(LiftAction::new(1)), Duration::from_secs(3))
            .then(
                Box::new(ActuateAction::new(
                    config.mechanism.collector_out_strength,
                )),
                Duration::from_secs(2),
            ),
        Routine::TurningForever => {
            let mut sequencer = ActionSequencer::new();
            for _ in 0..4 {
                sequencer.push(
                    Box::new(TurnAction::new(90.0, 0.3, true)),
                    Duration::from_millis(2_500),
                );
                sequencer.push(Box::new(IdleAction::new()), Duration::from_millis(500));
            }
            sequencer
        }
        Routine::PacingForever => {
            let mut sequencer = ActionSequencer::new();
            for _ in 0..3 {
                sequencer.push(
                    Box::new(DriveToPositionAction::new(36.0, speed_rpm, accel_rpm, true)),
                    Duration::from_secs(2),
                );
                sequencer.push(
                    Box::new(DriveToPositionAction::new(-36.0, speed_rpm, accel_rpm, true)),
                    Duration::from_secs(2),
                );
            }
            sequencer
        }
    }
}
