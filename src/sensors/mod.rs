//! Sensor subsystem: the HC-SR04 ultrasonic range driver and the
//! normalised [`DistanceSample`] it produces.
//!
//! The trap never treats a bad reading as an error.  A missing echo and an
//! out-of-range echo both collapse to the empty-chamber distance, so a
//! faulty sensor reads as an empty trap rather than stopping the loop.

pub mod ultrasonic;

/// Speed of sound (340 m/s) in millimetres per microsecond.
pub const SOUND_MM_PER_US: f32 = 0.34;

/// A distance measurement in millimetres, already normalised.
///
/// Invariant: `0 < mm() <= max_mm` for the `max_mm` it was built with.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct DistanceSample {
    mm: f32,
    clamped: bool,
    timed_out: bool,
}

impl DistanceSample {
    /// Build a sample from a raw distance, clamping zero, negative, NaN or
    /// over-range values to `max_mm`.
    pub fn normalized(raw_mm: f32, max_mm: f32) -> Self {
        if raw_mm > 0.0 && raw_mm <= max_mm {
            Self {
                mm: raw_mm,
                clamped: false,
                timed_out: false,
            }
        } else {
            Self {
                mm: max_mm,
                clamped: true,
                timed_out: false,
            }
        }
    }

    /// Convert an echo high-time to a sample.  A zero duration (timeout)
    /// maps to `max_mm`.
    pub fn from_echo_us(duration_us: u32, max_mm: f32) -> Self {
        Self {
            timed_out: duration_us == 0,
            ..Self::normalized(echo_to_distance_mm(duration_us), max_mm)
        }
    }

    pub fn mm(&self) -> f32 {
        self.mm
    }

    /// `true` if the raw reading was a timeout or out of range and the
    /// value was clamped to the maximum.
    pub fn was_clamped(&self) -> bool {
        self.clamped
    }

    /// `true` if no echo arrived at all.  An empty chamber still echoes,
    /// so this points at the sensor rather than the trap.
    pub fn timed_out(&self) -> bool {
        self.timed_out
    }
}

/// Round-trip echo time to one-way distance.
pub fn echo_to_distance_mm(duration_us: u32) -> f32 {
    duration_us as f32 * SOUND_MM_PER_US / 2.0
}
