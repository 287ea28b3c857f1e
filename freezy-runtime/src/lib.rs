// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

//! Control runtime for the Freezy competition robot.
//!
//! The runtime coordinates two halves of the robot program. The first is a
//! set of closed-loop mechanism controllers (drive base, lift, collector)
//! that run under both autonomous and manual control and own every actuator
//! output. The second is the autonomous state machine: a short ordered
//! program of actions (turn, drive to position, actuate) executed strictly
//! one at a time, with a uniform lifecycle and guaranteed cleanup on exit.
//!
//! Everything is driven by a single periodic cooperative loop. The host
//! calls the mode hooks on [`Runtime`] once per mode transition or once per
//! tick; no operation inside a tick blocks, and no actuator state is shared
//! across threads.

#[macro_use]
extern crate log;

pub mod channel;
pub mod device;
pub mod interlock;
pub mod kernel;
pub mod system;
pub mod telemetry;

mod config;

pub use self::config::*;

pub mod runtime;
pub use self::runtime::Error;
pub use self::runtime::{Mode, Runtime};

/// Runtime module containing various constants.
pub mod consts {
    /// Runtime version.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    /// Default control loop period in milliseconds.
    pub const DEFAULT_TICK_MS: u64 = 20;
    /// Default length of the autonomous period in seconds.
    pub const DEFAULT_AUTO_SECONDS: u64 = 15;
}
