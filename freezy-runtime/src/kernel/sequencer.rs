// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::time::{Duration, Instant};

use super::{Action, ActionRecord, ActionState};
use crate::system::Systems;

struct Entry {
    action: Box<dyn Action>,
    time_box: Duration,
    state: ActionState,
    started: Option<Instant>,
}

/// Ordered autonomous sequence; at most one action runs at a time.
///
/// The sequencer owns every lifecycle transition: it initializes an action
/// exactly once when it becomes active, processes it each step, and cleans
/// it up exactly once when its completion predicate fires, its time box
/// expires, or the whole sequence is aborted.
pub struct ActionSequencer {
    entries: Vec<Entry>,
    cursor: usize,
}

impl ActionSequencer {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
        }
    }

    /// Append an action with its time box; builder style.
    pub fn then(mut self, action: Box<dyn Action>, time_box: Duration) -> Self {
        self.push(action, time_box);
        self
    }

    pub fn push(&mut self, action: Box<dyn Action>, time_box: Duration) {
        self.entries.push(Entry {
            action,
            time_box,
            state: ActionState::Idle,
            started: None,
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every action has finished its lifecycle.
    pub fn is_complete(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Number of actions currently in the running state; never exceeds one.
    pub fn running_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.state == ActionState::Running)
            .count()
    }

    /// Advance the sequence by one step.
    ///
    /// Returns `true` once the sequence has run to completion.
    pub fn step(&mut self, systems: &mut Systems, now: Instant) -> bool {
        let Some(entry) = self.entries.get_mut(self.cursor) else {
            return true;
        };

        if entry.state == ActionState::Idle {
            debug!("action start: {}", entry.action.name());
            entry.action.initialize(systems, now);
            entry.state = ActionState::Running;
            entry.started = Some(now);
        }

        entry.action.process(systems, now);

        let expired = entry
            .started
            .map(|started| now.duration_since(started) >= entry.time_box)
            .unwrap_or(false);
        if entry.action.is_done() || expired {
            debug!("action stop: {}", entry.action.name());
            entry.action.cleanup(systems, now);
            entry.state = ActionState::Done;
            self.cursor += 1;
        }

        self.is_complete()
    }

    /// Terminate the sequence early.
    ///
    /// The running action, if any, is cleaned up; actions that never started
    /// stay untouched and the sequence reports complete.
    pub fn abort(&mut self, systems: &mut Systems, now: Instant) {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            if entry.state == ActionState::Running {
                debug!("action abort: {}", entry.action.name());
                entry.action.cleanup(systems, now);
                entry.state = ActionState::Done;
            }
        }
        self.cursor = self.entries.len();
    }

    /// Rewind the sequence for a fresh run.
    ///
    /// Every entry returns to idle; the next `step` starts the first action
    /// over with a fresh `initialize`.
    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.state = ActionState::Idle;
            entry.started = None;
        }
        self.cursor = 0;
    }

    /// Serializable description of the sequence, in order.
    pub fn records(&self) -> Vec<ActionRecord> {
        self.entries
            .iter()
            .enumerate()
            .map(|(ordinal, entry)| ActionRecord {
                ordinal,
                name: entry.action.name().to_owned(),
                timeout_ms: entry.time_box.as_millis() as u64,
                kind: entry.action.kind(),
            })
            .collect()
    }
}

impl Default for ActionSequencer {
    fn default() -> Self {
        Self::new()
    }
}
