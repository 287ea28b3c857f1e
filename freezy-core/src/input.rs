// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

/// Logical control axes.
///
/// Axes are indirectly mapped to input peripherals. The mapping from a
/// physical stick or trigger to an axis lives with the input collaborator,
/// not in the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Throttle = 0,
    Steering = 1,
    Lift = 2,
    CollectorIn = 3,
}

/// Logical control buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    QuickTurn = 0,
    CollectorOut = 1,
    BrakeToggle = 2,
    FlipperDeploy = 3,
}

pub const AXIS_COUNT: usize = 4;
pub const BUTTON_COUNT: usize = 4;

/// Per-tick snapshot of the raw control inputs.
///
/// Polled exactly once per tick by the host; axis values are normalized
/// to `-1.0..1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSnapshot {
    axes: [f64; AXIS_COUNT],
    buttons: [bool; BUTTON_COUNT],
}

impl ControlSnapshot {
    /// Snapshot with all axes centered and no buttons held.
    pub fn neutral() -> Self {
        Self {
            axes: [0.0; AXIS_COUNT],
            buttons: [false; BUTTON_COUNT],
        }
    }

    pub fn axis(&self, axis: Axis) -> f64 {
        self.axes[axis as usize]
    }

    pub fn button(&self, button: Button) -> bool {
        self.buttons[button as usize]
    }

    pub fn with_axis(mut self, axis: Axis, value: f64) -> Self {
        self.axes[axis as usize] = value.clamp(-1.0, 1.0);
        self
    }

    pub fn with_button(mut self, button: Button) -> Self {
        self.buttons[button as usize] = true;
        self
    }
}

impl Default for ControlSnapshot {
    fn default() -> Self {
        Self::neutral()
    }
}
