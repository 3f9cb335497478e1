//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ TrapService (domain)
//! ```
//!
//! Driven adapters (sensor, actuators, network, reporter, storage)
//! implement these traits.  The [`TrapService`](super::service::TrapService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::config::SystemConfig;
use crate::sensors::DistanceSample;
use crate::status::StatusSnapshot;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: one normalised distance per call.
///
/// Implementations never fail.  A timeout or out-of-range echo is
/// reported as the maximum distance.
pub trait DistancePort {
    fn measure(&mut self) -> DistanceSample;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port.  Writes are assumed infallible at this level.
pub trait ActuatorPort {
    /// Set the raw fan PWM duty (scale set by the configured resolution).
    fn set_fan_duty(&mut self, duty: u32);

    /// Switch the UV attractant light.
    fn set_light(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Connectivity port (network state, queried once per tick)
// ───────────────────────────────────────────────────────────────

/// The core only ever asks whether the network is up.  Joining and
/// reconnecting belong to the adapter.
pub trait ConnectivityPort {
    fn is_connected(&self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time since boot.
pub trait ClockPort {
    fn uptime_us(&self) -> u64;

    fn uptime_ms(&self) -> u64 {
        self.uptime_us() / 1000
    }
}

impl<C: ClockPort + ?Sized> ClockPort for &C {
    fn uptime_us(&self) -> u64 {
        (**self).uptime_us()
    }
}

// ───────────────────────────────────────────────────────────────
// Status reporter (domain → remote store)
// ───────────────────────────────────────────────────────────────

/// Fire-and-forget status delivery.  The core hands off a snapshot and
/// never inspects the outcome; retry and error policy belong to the
/// implementation.
pub trait StatusReporter {
    fn report(&mut self, snapshot: &StatusSnapshot);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST call [`SystemConfig::validate`] before persisting.
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`SystemConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate (decouples scheduler from the service)
// ───────────────────────────────────────────────────────────────

/// Callback the [`PeriodicScheduler`](crate::scheduler::PeriodicScheduler)
/// invokes when a period has elapsed.  The tick runs to completion
/// inside this call.
pub trait SchedulerDelegate {
    fn on_tick(&mut self, tick_no: u64);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations and config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Underlying storage is full.
    StorageFull,
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::StorageFull => write!(f, "storage full"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
