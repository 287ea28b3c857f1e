// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Shared types for the Freezy robot control stack.
//!
//! This crate carries the types that cross the boundary between the control
//! runtime and its collaborators: control-input snapshots, telemetry values
//! and the telemetry sink trait, and the closed-loop tuning structures.

pub mod control;
pub mod input;
pub mod telemetry;
