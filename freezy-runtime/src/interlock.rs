// Copyright (C) 2024 Freezy Robotics
// All rights reserved.
//
// This software may be modified and distributed under the terms
// of the included license.  See the LICENSE file for details.

use std::time::{Duration, Instant};

use crate::channel::ActuatorChannel;

/// Debounced two-state toggle over a pulsed actuator.
///
/// Guards time-sensitive transitions such as the lift brake and the flipper
/// relay. A transition request inside the re-trigger window is ignored
/// entirely, not queued. Every accepted transition drives the actuator at
/// the configured strength and arms a single owned deadline; once the dwell
/// expires the owning subsystem's `tick` writes the actuator back to
/// neutral. The neutral write is idempotent and never touches the
/// engaged flag, which is owned by `engage`/`release` alone.
pub struct Interlock {
    name: String,
    channel: ActuatorChannel,
    engaged: bool,
    engage_strength: f64,
    release_strength: f64,
    min_interval: Duration,
    dwell: Duration,
    last_transition: Option<Instant>,
    pending_deadline: Option<Instant>,
}

impl Interlock {
    pub fn new(
        name: impl Into<String>,
        channel: ActuatorChannel,
        engage_strength: f64,
        release_strength: f64,
        min_interval: Duration,
        dwell: Duration,
    ) -> Self {
        Self {
            name: name.into(),
            channel,
            engaged: false,
            engage_strength,
            release_strength,
            min_interval,
            dwell,
            last_transition: None,
            pending_deadline: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    fn within_holdoff(&self, now: Instant) -> bool {
        self.last_transition
            .map_or(false, |last| now.duration_since(last) < self.min_interval)
    }

    fn apply(&mut self, strength: f64, now: Instant) {
        self.channel.set_open_loop(strength);
        self.last_transition = Some(now);
        self.pending_deadline = Some(now + self.dwell);
        self.channel.telemetry().put_bool(&self.name, self.engaged);
    }

    /// Request the engaged state.
    ///
    /// No-op when already engaged or inside the re-trigger window. Returns
    /// whether a transition happened.
    pub fn engage(&mut self, now: Instant) -> bool {
        if self.engaged || self.within_holdoff(now) {
            return false;
        }

        self.engaged = true;
        self.apply(self.engage_strength, now);
        true
    }

    /// Request the released state; symmetric to [`Interlock::engage`].
    pub fn release(&mut self, now: Instant) -> bool {
        if !self.engaged || self.within_holdoff(now) {
            return false;
        }

        self.engaged = false;
        self.apply(self.release_strength, now);
        true
    }

    /// Release regardless of the re-trigger window.
    ///
    /// Flag-only: the actuator is not driven, for use after the dwell write
    /// has already returned it to neutral. A short dwell would otherwise
    /// leave the flag stuck engaged behind its own holdoff.
    pub fn force_release(&mut self, now: Instant) -> bool {
        if !self.engaged {
            return false;
        }

        self.engaged = false;
        self.last_transition = Some(now);
        self.channel.telemetry().put_bool(&self.name, self.engaged);
        true
    }

    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.engaged {
            self.release(now)
        } else {
            self.engage(now)
        }
    }

    /// Drive the actuator back to neutral once the dwell expires.
    ///
    /// Called once per tick by the owning subsystem. Returns whether the
    /// neutral write fired this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.pending_deadline {
            Some(deadline) if now >= deadline => {
                self.pending_deadline = None;
                self.channel.set_open_loop(0.0);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ActuatorChannel;
    use crate::device::sim::SimBus;
    use freezy_core::telemetry::{BufferSink, Value};
    use std::sync::Arc;

    fn brake() -> (Interlock, SimBus, Arc<BufferSink>) {
        let bus = SimBus::new();
        let sink = Arc::new(BufferSink::new());
        let channel = ActuatorChannel::open_loop(
            "lift/brake_motor",
            Box::new(bus.actuator(1)),
            false,
            sink.clone(),
        );
        let interlock = Interlock::new(
            "lift/brake",
            channel,
            0.5,
            -0.5,
            Duration::from_millis(500),
            Duration::from_millis(500),
        );
        (interlock, bus, sink)
    }

    fn neutral_writes(sink: &BufferSink) -> usize {
        sink.records()
            .iter()
            .filter(|(key, value)| key == "lift/brake_motor" && *value == Value::Double(0.0))
            .count()
    }

    #[test]
    fn double_engage_within_interval_is_one_transition() {
        let (mut brake, bus, sink) = brake();
        let t0 = Instant::now();

        assert!(brake.engage(t0));
        assert!(!brake.engage(t0 + Duration::from_millis(100)));
        assert!(brake.is_engaged());
        assert_eq!(bus.effective_output(1), 0.5);

        // Exactly one deferred neutral write, regardless of how often the
        // deadline is polled afterwards.
        assert!(!brake.tick(t0 + Duration::from_millis(499)));
        assert!(brake.tick(t0 + Duration::from_millis(500)));
        assert!(!brake.tick(t0 + Duration::from_millis(600)));
        assert_eq!(neutral_writes(&sink), 1);
        assert_eq!(bus.effective_output(1), 0.0);
        assert!(brake.is_engaged());
    }

    #[test]
    fn release_is_suppressed_inside_the_window() {
        let (mut brake, bus, _sink) = brake();
        let t0 = Instant::now();

        brake.engage(t0);
        assert!(!brake.release(t0 + Duration::from_millis(250)));
        assert!(brake.is_engaged());

        assert!(brake.release(t0 + Duration::from_millis(500)));
        assert!(!brake.is_engaged());
        assert_eq!(bus.effective_output(1), -0.5);
    }

    #[test]
    fn superseding_transition_does_not_resurrect_stale_state() {
        let (mut brake, bus, _sink) = brake();
        let t0 = Instant::now();

        brake.engage(t0);
        // New transition before the first dwell deadline fires.
        brake.release(t0 + Duration::from_millis(500));

        // The old deadline has long passed; the single owned deadline was
        // replaced, so the neutral write lands after the second dwell and
        // the flag stays with the release.
        assert!(!brake.tick(t0 + Duration::from_millis(750)));
        assert!(brake.tick(t0 + Duration::from_millis(1_000)));
        assert!(!brake.is_engaged());
        assert_eq!(bus.effective_output(1), 0.0);
    }

    #[test]
    fn forced_release_ignores_the_retrigger_window() {
        let bus = SimBus::new();
        let sink = Arc::new(BufferSink::new());
        let channel = ActuatorChannel::open_loop(
            "flipper/relay",
            Box::new(bus.actuator(1)),
            false,
            sink.clone(),
        );
        // Dwell shorter than the re-trigger window.
        let mut pulse = Interlock::new(
            "flipper/deployed",
            channel,
            1.0,
            0.0,
            Duration::from_millis(500),
            Duration::from_millis(200),
        );
        let t0 = Instant::now();

        pulse.engage(t0);
        assert!(pulse.tick(t0 + Duration::from_millis(200)));

        // A plain release is still inside the holdoff; the forced variant
        // clears the flag without driving the actuator again.
        assert!(!pulse.release(t0 + Duration::from_millis(200)));
        assert!(pulse.force_release(t0 + Duration::from_millis(200)));
        assert!(!pulse.is_engaged());
        assert_eq!(bus.effective_output(1), 0.0);

        // The next engage still respects the window from the forced release.
        assert!(!pulse.engage(t0 + Duration::from_millis(400)));
        assert!(pulse.engage(t0 + Duration::from_millis(750)));
    }

    #[test]
    fn release_when_already_released_is_a_no_op() {
        let (mut brake, _bus, sink) = brake();
        let t0 = Instant::now();

        assert!(!brake.release(t0));
        assert!(sink.records().is_empty());
    }
}
