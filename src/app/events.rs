//! Outbound application events.
//!
//! The [`TrapService`](super::service::TrapService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them (log to serial, forward upstream, etc.).

use crate::control::actuator::ActuatorState;
use crate::control::classifier::FullnessState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Baseline actuators applied; the loop is about to start.
    Started(ActuatorState),

    /// A tick measured the chamber.
    Measured {
        distance_mm: f32,
        fullness: FullnessState,
        /// The reading was a timeout or out of range and was clamped.
        clamped: bool,
        /// No echo arrived before the timeout.
        timed_out: bool,
    },

    /// The fullness classification differs from the previous tick.
    FullnessChanged {
        from: FullnessState,
        to: FullnessState,
    },

    /// New actuator outputs were commanded.
    ActuatorsApplied(ActuatorState),

    /// No decision this tick (trap not full and offline); outputs held.
    ActuatorsHeld(ActuatorState),

    /// A status snapshot was handed to the reporter.
    Reported { uptime_ms: u64 },

    /// Reporting skipped because the network is down.
    ReportSkipped,
}
