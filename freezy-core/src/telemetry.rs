// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::sync::Mutex;

/// Telemetry sample value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    Bool(bool),
    Text(String),
}

/// One-way telemetry publisher keyed by a stable path name.
///
/// Publishing is best effort, expects no acknowledgement and must never
/// block the control tick.
pub trait TelemetrySink: Send + Sync {
    fn publish(&self, key: &str, value: Value);

    fn put_double(&self, key: &str, value: f64) {
        self.publish(key, Value::Double(value));
    }

    fn put_bool(&self, key: &str, value: bool) {
        self.publish(key, Value::Bool(value));
    }

    fn put_text(&self, key: &str, value: &str) {
        self.publish(key, Value::Text(value.to_owned()));
    }
}

/// Sink that discards every sample.
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn publish(&self, _key: &str, _value: Value) {}
}

/// Sink that retains samples in memory for later inspection.
///
/// Used by the simulator and by tests to observe what the runtime
/// published.
#[derive(Default)]
pub struct BufferSink {
    records: Mutex<Vec<(String, Value)>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All samples published so far, in publish order.
    pub fn records(&self) -> Vec<(String, Value)> {
        self.records.lock().unwrap().clone()
    }

    /// Most recent sample published under `key`.
    pub fn last(&self, key: &str) -> Option<Value> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Drain the retained samples.
    pub fn take(&self) -> Vec<(String, Value)> {
        std::mem::take(&mut self.records.lock().unwrap())
    }
}

impl TelemetrySink for BufferSink {
    fn publish(&self, key: &str, value: Value) {
        self.records.lock().unwrap().push((key.to_owned(), value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_retains_in_order() {
        let sink = BufferSink::new();
        sink.put_double("lift/upper", 0.25);
        sink.put_bool("lift/brake", true);

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ("lift/upper".to_owned(), Value::Double(0.25)));
        assert_eq!(sink.last("lift/brake"), Some(Value::Bool(true)));
    }
}
