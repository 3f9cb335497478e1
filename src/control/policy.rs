//! Per-tick actuator decision policy.
//!
//! Evaluated in order:
//!
//! | Fullness        | Connected | Decision                   |
//! |-----------------|-----------|----------------------------|
//! | FULL            | any       | fan OFF, light OFF         |
//! | EMPTY / FILLING | yes       | fan HIGH, light ON         |
//! | EMPTY / FILLING | no        | none, previous state held  |
//!
//! A full trap always suppresses airflow and UV, network or not.

use super::actuator::{ActuatorState, FanMode};
use super::classifier::FullnessState;

/// Outputs commanded when the trap is full.
pub const TRAP_FULL: ActuatorState = ActuatorState {
    fan: FanMode::Off,
    light_on: false,
};

/// Outputs commanded during normal connected operation.
pub const ATTRACT: ActuatorState = ActuatorState {
    fan: FanMode::High,
    light_on: true,
};

/// Decide the actuator outputs for this tick.  `None` means leave the
/// actuators as they are.
pub fn decide(fullness: FullnessState, connected: bool) -> Option<ActuatorState> {
    match fullness {
        FullnessState::Full => Some(TRAP_FULL),
        _ if connected => Some(ATTRACT),
        _ => None,
    }
}
