//! Trap fullness classifier.
//!
//! A step function over distance: the closer the catch surface is to the
//! sensor, the fuller the trap.  Boundaries are inclusive toward the fuller
//! state.  There is no hysteresis band, so a reading sitting exactly on a
//! threshold can flip state from one tick to the next.

use core::fmt;

use crate::config::DistanceThresholds;

/// Discrete trap capacity.  Ordered from emptiest to fullest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FullnessState {
    Empty,
    Filling,
    Full,
}

impl FullnessState {
    /// Wire name used in status payloads.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "EMPTY",
            Self::Filling => "FILLING",
            Self::Full => "FULL",
        }
    }
}

impl fmt::Display for FullnessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a distance reading onto a [`FullnessState`].
#[derive(Debug, Clone, Copy)]
pub struct FullnessClassifier {
    full_mm: f32,
    filling_mm: f32,
}

impl FullnessClassifier {
    pub fn new(thresholds: &DistanceThresholds) -> Self {
        Self {
            full_mm: thresholds.full_mm,
            filling_mm: thresholds.filling_mm,
        }
    }

    pub fn classify(&self, distance_mm: f32) -> FullnessState {
        if distance_mm <= self.full_mm {
            FullnessState::Full
        } else if distance_mm <= self.filling_mm {
            FullnessState::Filling
        } else {
            FullnessState::Empty
        }
    }
}

impl Default for FullnessClassifier {
    fn default() -> Self {
        Self::new(&DistanceThresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_inclusive_toward_fuller_state() {
        let c = FullnessClassifier::default();
        assert_eq!(c.classify(30.0), FullnessState::Full);
        assert_eq!(c.classify(30.0001), FullnessState::Filling);
        assert_eq!(c.classify(60.0), FullnessState::Filling);
        assert_eq!(c.classify(60.0001), FullnessState::Empty);
    }

    #[test]
    fn empty_chamber_reads_empty() {
        let c = FullnessClassifier::default();
        assert_eq!(c.classify(100.0), FullnessState::Empty);
    }

    #[test]
    fn tiny_distance_is_full() {
        let c = FullnessClassifier::default();
        assert_eq!(c.classify(0.17), FullnessState::Full);
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let c = FullnessClassifier::new(&DistanceThresholds {
            full_mm: 10.0,
            filling_mm: 20.0,
            max_mm: 40.0,
        });
        assert_eq!(c.classify(15.0), FullnessState::Filling);
        assert_eq!(c.classify(25.0), FullnessState::Empty);
    }

    #[test]
    fn wire_names() {
        assert_eq!(FullnessState::Empty.to_string(), "EMPTY");
        assert_eq!(FullnessState::Filling.as_str(), "FILLING");
        assert_eq!(FullnessState::Full.as_str(), "FULL");
    }
}
