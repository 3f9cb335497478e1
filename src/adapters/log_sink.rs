//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{Level, debug, info, log};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Only a missing echo is worth a warning.  Over-range readings are what
/// an empty chamber normally returns.
fn measured_level(timed_out: bool) -> Level {
    if timed_out {
        Level::Warn
    } else {
        Level::Debug
    }
}

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | fan={} light={}", state.fan, state.light_on);
            }
            AppEvent::Measured {
                distance_mm,
                fullness,
                clamped,
                timed_out,
            } => {
                let level = measured_level(*timed_out);
                if *timed_out {
                    log!(level, "SENSE | no echo, using {:.1}mm ({})", distance_mm, fullness);
                } else if *clamped {
                    log!(level, "SENSE | over range, using {:.1}mm ({})", distance_mm, fullness);
                } else {
                    log!(level, "SENSE | {:.1}mm ({})", distance_mm, fullness);
                }
            }
            AppEvent::FullnessChanged { from, to } => {
                info!("TRAP  | {} -> {}", from, to);
            }
            AppEvent::ActuatorsApplied(state) => {
                info!("ACT   | fan={} light={}", state.fan, state.light_on);
            }
            AppEvent::ActuatorsHeld(state) => {
                debug!("ACT   | offline, holding fan={} light={}", state.fan, state.light_on);
            }
            AppEvent::Reported { uptime_ms } => {
                debug!("REPORT| snapshot at {}ms", uptime_ms);
            }
            AppEvent::ReportSkipped => {
                debug!("REPORT| skipped, network down");
            }
        }
    }
}
