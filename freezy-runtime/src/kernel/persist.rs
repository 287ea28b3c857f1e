// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Routine persistence.
//!
//! A sequence serializes to an ordered list of records, one per action,
//! each carrying the action class, its parameters and its time box. Files
//! written on one robot load on another as long as the classes match.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{
    Action, ActionSequencer, ActuateAction, DriveToPositionAction, IdleAction, LiftAction,
    TurnAction,
};

/// Action class plus parameters; the `class` tag selects the variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class")]
pub enum ActionKind {
    Turn {
        angle_to_turn: f64,
        speed: f64,
        reset_gyro: bool,
    },
    DriveToPosition {
        target_inches: f64,
        speed_rpm: i32,
        accel_rpm: i32,
        reset_gyro: bool,
    },
    Actuate {
        strength: f64,
    },
    Lift {
        level: usize,
    },
    Idle,
}

impl ActionKind {
    /// Construct the runnable action this record describes.
    pub fn build(&self, name: &str) -> Box<dyn Action> {
        match *self {
            ActionKind::Turn {
                angle_to_turn,
                speed,
                reset_gyro,
            } => Box::new(TurnAction::named(name, angle_to_turn, speed, reset_gyro)),
            ActionKind::DriveToPosition {
                target_inches,
                speed_rpm,
                accel_rpm,
                reset_gyro,
            } => Box::new(DriveToPositionAction::named(
                name,
                target_inches,
                speed_rpm,
                accel_rpm,
                reset_gyro,
            )),
            ActionKind::Actuate { strength } => Box::new(ActuateAction::named(name, strength)),
            ActionKind::Lift { level } => Box::new(LiftAction::named(name, level)),
            ActionKind::Idle => Box::new(IdleAction::named(name)),
        }
    }
}

/// One persisted sequence slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub ordinal: usize,
    pub name: String,
    pub timeout_ms: u64,
    #[serde(flatten)]
    pub kind: ActionKind,
}

/// Rebuild a sequence from its records; slots execute in ordinal order
/// regardless of file order.
pub fn from_records(mut records: Vec<ActionRecord>) -> ActionSequencer {
    records.sort_by_key(|record| record.ordinal);

    let mut sequencer = ActionSequencer::new();
    for record in &records {
        sequencer.push(
            record.kind.build(&record.name),
            Duration::from_millis(record.timeout_ms),
        );
    }
    sequencer
}

pub fn save_routine(path: impl AsRef<Path>, sequencer: &ActionSequencer) -> crate::runtime::Result {
    let doc = serde_json::to_string_pretty(&sequencer.records())?;
    fs::write(path, doc)?;

    Ok(())
}

pub fn load_routine(path: impl AsRef<Path>) -> crate::runtime::Result<ActionSequencer> {
    let doc = fs::read_to_string(path)?;
    let records: Vec<ActionRecord> = serde_json::from_str(&doc)?;

    Ok(from_records(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routine_round_trips_through_a_file() {
        let sequencer = ActionSequencer::new()
            .then(
                Box::new(TurnAction::new(30.0, 0.3, true)),
                Duration::from_millis(2_500),
            )
            .then(
                Box::new(DriveToPositionAction::new(72.0, 900, 450, false)),
                Duration::from_millis(4_000),
            )
            .then(
                Box::new(ActuateAction::new(0.75)),
                Duration::from_millis(1_000),
            );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("routine.json");

        save_routine(&path, &sequencer).unwrap();
        let loaded = load_routine(&path).unwrap();

        assert_eq!(loaded.records(), sequencer.records());
    }

    #[test]
    fn slots_execute_in_ordinal_order_regardless_of_file_order() {
        let records = vec![
            ActionRecord {
                ordinal: 1,
                name: "second".to_owned(),
                timeout_ms: 1_000,
                kind: ActionKind::Idle,
            },
            ActionRecord {
                ordinal: 0,
                name: "first".to_owned(),
                timeout_ms: 1_000,
                kind: ActionKind::Actuate { strength: 0.75 },
            },
        ];

        let sequencer = from_records(records);
        let names: Vec<String> = sequencer
            .records()
            .into_iter()
            .map(|record| record.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn record_carries_the_class_tag() {
        let record = ActionRecord {
            ordinal: 0,
            name: "turn".to_owned(),
            timeout_ms: 2_500,
            kind: ActionKind::Turn {
                angle_to_turn: 30.0,
                speed: 0.3,
                reset_gyro: true,
            },
        };

        let doc = serde_json::to_string(&record).unwrap();
        assert!(doc.contains("\"class\":\"Turn\""));

        let parsed: ActionRecord = serde_json::from_str(&doc).unwrap();
        assert_eq!(parsed, record);
    }
}
