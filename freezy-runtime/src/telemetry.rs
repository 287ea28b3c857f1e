// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use freezy_core::telemetry::{TelemetrySink, Value};

/// Telemetry sink that forwards every record to the log at debug level.
///
/// Stands in for a dashboard transport; the logging verbosity switches
/// decide whether the records are visible.
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn publish(&self, key: &str, value: Value) {
        match value {
            Value::Double(v) => debug!("telemetry {}: {:.3}", key, v),
            Value::Bool(v) => debug!("telemetry {}: {}", key, v),
            Value::Text(v) => debug!("telemetry {}: {}", key, v),
        }
    }
}
