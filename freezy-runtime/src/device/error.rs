// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::{error, fmt};

#[derive(Debug)]
pub enum ErrorKind {
    /// Actuator id is not present on the bus.
    UnknownActuator(u32),
    /// Follower topology loops back on itself.
    FollowerCycle(u32),
    /// Configuration was rejected by the hardware.
    Configuration(String),
}

/// Fatal device fault raised during subsystem bring-up.
#[derive(Debug)]
pub struct DeviceError {
    /// Name of the device at fault.
    pub device: String,
    /// Cause of the fault.
    pub kind: ErrorKind,
}

impl DeviceError {
    pub fn new(device: impl ToString, kind: ErrorKind) -> Self {
        Self {
            device: device.to_string(),
            kind,
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::UnknownActuator(id) => {
                write!(f, "{}: unknown actuator {}", self.device, id)
            }
            ErrorKind::FollowerCycle(id) => {
                write!(f, "{}: follower cycle through actuator {}", self.device, id)
            }
            ErrorKind::Configuration(reason) => {
                write!(f, "{}: configuration rejected: {}", self.device, reason)
            }
        }
    }
}

impl error::Error for DeviceError {}

pub type Result<T> = std::result::Result<T, DeviceError>;
