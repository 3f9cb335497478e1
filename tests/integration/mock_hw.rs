//! Mock hardware and collaborators for integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without touching real GPIO/PWM registers.

use std::cell::Cell;

use smarttrap::app::events::AppEvent;
use smarttrap::app::ports::{
    ActuatorPort, ClockPort, ConnectivityPort, DistancePort, EventSink, StatusReporter,
};
use smarttrap::sensors::DistanceSample;
use smarttrap::status::StatusSnapshot;

/// Chamber depth used by the mock sensor.
pub const MAX_MM: f32 = 100.0;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActuatorCall {
    FanDuty(u32),
    Light(bool),
}

// ── MockBoard ─────────────────────────────────────────────────

/// One sensor plus both actuators, like the real board.
pub struct MockBoard {
    /// Raw reading the next `measure()` returns, before normalisation.
    pub distance_mm: f32,
    pub calls: Vec<ActuatorCall>,
    pub measurements: u32,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new(distance_mm: f32) -> Self {
        Self {
            distance_mm,
            calls: Vec::new(),
            measurements: 0,
        }
    }

    pub fn fan_duty(&self) -> Option<u32> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::FanDuty(d) => Some(*d),
            _ => None,
        })
    }

    pub fn light(&self) -> Option<bool> {
        self.calls.iter().rev().find_map(|c| match c {
            ActuatorCall::Light(on) => Some(*on),
            _ => None,
        })
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl DistancePort for MockBoard {
    fn measure(&mut self) -> DistanceSample {
        self.measurements += 1;
        DistanceSample::normalized(self.distance_mm, MAX_MM)
    }
}

impl ActuatorPort for MockBoard {
    fn set_fan_duty(&mut self, duty: u32) {
        self.calls.push(ActuatorCall::FanDuty(duty));
    }

    fn set_light(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Light(on));
    }
}

// ── Network ───────────────────────────────────────────────────

pub struct MockNet {
    up: Cell<bool>,
}

#[allow(dead_code)]
impl MockNet {
    pub fn new(up: bool) -> Self {
        Self { up: Cell::new(up) }
    }

    pub fn set(&self, up: bool) {
        self.up.set(up);
    }
}

impl ConnectivityPort for MockNet {
    fn is_connected(&self) -> bool {
        self.up.get()
    }
}

// ── Clock ─────────────────────────────────────────────────────

/// Manually advanced clock, shared by reference between the scheduler
/// and the service.
#[derive(Default)]
pub struct MockClock {
    us: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ms(&self, ms: u64) {
        self.us.set(ms * 1000);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.us.set(self.us.get() + ms * 1000);
    }
}

impl ClockPort for MockClock {
    fn uptime_us(&self) -> u64 {
        self.us.get()
    }
}

// ── Reporter / sink ───────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub snapshots: Vec<StatusSnapshot>,
}

impl StatusReporter for RecordingReporter {
    fn report(&mut self, snapshot: &StatusSnapshot) {
        self.snapshots.push(*snapshot);
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
