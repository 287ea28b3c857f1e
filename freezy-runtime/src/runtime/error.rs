// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use crate::device::DeviceError;

#[derive(Debug)]
pub enum Error {
    /// Actuator wiring or configuration fault.
    Device(DeviceError),
    /// Filesystem fault.
    Io(std::io::Error),
    /// Configuration document fault.
    Config(toml::de::Error),
    /// Persisted routine fault.
    Routine(serde_json::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Device(e) => write!(f, "device: {}", e),
            Error::Io(e) => write!(f, "io: {}", e),
            Error::Config(e) => write!(f, "config: {}", e),
            Error::Routine(e) => write!(f, "routine: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Device(e) => Some(e),
            Error::Io(e) => Some(e),
            Error::Config(e) => Some(e),
            Error::Routine(e) => Some(e),
        }
    }
}

impl From<DeviceError> for Error {
    fn from(value: DeviceError) -> Self {
        Error::Device(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value)
    }
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Error::Config(value)
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::Routine(value)
    }
}
