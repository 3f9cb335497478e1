//! Status snapshot and its wire payload.
//!
//! A [`StatusSnapshot`] is built once per connected tick, handed to the
//! [`StatusReporter`](crate::app::ports::StatusReporter), and dropped.
//! [`StatusPayload`] is the JSON shape the remote store expects:
//!
//! ```json
//! { "fan_speed": "HIGH", "trap_status": "FILLING",
//!   "uv_status": "ON", "last_updated": "30012" }
//! ```

use serde::{Deserialize, Serialize};

use crate::control::actuator::{ActuatorState, FanMode};
use crate::control::classifier::FullnessState;

/// Immutable point-in-time view of the trap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub fan: FanMode,
    pub fullness: FullnessState,
    pub light_on: bool,
    /// Milliseconds since boot.
    pub uptime_ms: u64,
}

impl StatusSnapshot {
    pub fn new(actuators: ActuatorState, fullness: FullnessState, uptime_ms: u64) -> Self {
        Self {
            fan: actuators.fan,
            fullness,
            light_on: actuators.light_on,
            uptime_ms,
        }
    }

    pub fn to_payload(&self) -> StatusPayload {
        StatusPayload {
            fan_speed: self.fan.as_str().into(),
            trap_status: self.fullness.as_str().into(),
            uv_status: if self.light_on { "ON" } else { "OFF" }.into(),
            last_updated: self.uptime_ms.to_string(),
        }
    }
}

/// Wire form of a [`StatusSnapshot`].  Every field is a string, including
/// the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusPayload {
    pub fan_speed: String,
    pub trap_status: String,
    pub uv_status: String,
    pub last_updated: String,
}

impl StatusPayload {
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
