//! Application service: the hexagonal core.
//!
//! [`TrapService`] owns the classifier, the actuator controller, and the
//! last observed fullness.  It exposes a clean, hardware-agnostic API.
//! All I/O flows through port traits injected at call sites, making the
//! entire service testable with mock adapters.
//!
//! ```text
//!   DistancePort ──▶ ┌────────────────────────────┐ ──▶ EventSink
//!                    │        TrapService          │
//!   ActuatorPort ◀── │ classify · decide · actuate │ ──▶ StatusReporter
//!                    └────────────────────────────┘
//!                          ▲               ▲
//!                 ConnectivityPort     ClockPort
//! ```

use log::info;

use crate::config::SystemConfig;
use crate::control::actuator::{ActuatorController, ActuatorState};
use crate::control::classifier::{FullnessClassifier, FullnessState};
use crate::control::policy;
use crate::status::StatusSnapshot;

use super::events::AppEvent;
use super::ports::{
    ActuatorPort, ClockPort, ConfigError, ConnectivityPort, DistancePort, EventSink,
    SchedulerDelegate, StatusReporter,
};

/// What one tick did, for callers and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickOutcome {
    pub distance_mm: f32,
    pub fullness: FullnessState,
    /// `Some` if actuators were commanded this tick.
    pub applied: Option<ActuatorState>,
    pub reported: bool,
}

/// The application service orchestrates all domain logic.
pub struct TrapService {
    config: SystemConfig,
    classifier: FullnessClassifier,
    actuators: ActuatorController,
    /// Classification from the most recent tick (EMPTY before the first).
    fullness: FullnessState,
    tick_count: u64,
    report_count: u64,
}

impl TrapService {
    /// Construct the service from configuration.
    ///
    /// Does **not** drive any hardware; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            classifier: FullnessClassifier::new(&config.thresholds),
            actuators: ActuatorController::new(config.fan_duty),
            fullness: FullnessState::Empty,
            tick_count: 0,
            report_count: 0,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Force the actuators to the boot baseline (fan LOW, light ON),
    /// independent of any sensor reading.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        self.actuators.apply_state(ActuatorState::BASELINE, hw);
        let state = self.actuators.state();
        sink.emit(&AppEvent::Started(state));
        info!("TrapService started: fan={} light={}", state.fan, on_off(state.light_on));
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full cycle: sense → classify → decide → actuate → report.
    ///
    /// Every step either succeeds or is a silent no-op, so the tick has no
    /// failure outcome.  The `hw` parameter satisfies **both**
    /// [`DistancePort`] and [`ActuatorPort`], mirroring the one physical
    /// board behind them.
    pub fn tick(
        &mut self,
        hw: &mut (impl DistancePort + ActuatorPort),
        net: &impl ConnectivityPort,
        clock: &impl ClockPort,
        reporter: &mut impl StatusReporter,
        sink: &mut impl EventSink,
    ) -> TickOutcome {
        self.tick_count += 1;

        // 1. Sense
        let sample = hw.measure();

        // 2. Classify
        let fullness = self.classifier.classify(sample.mm());
        info!(
            "Trap distance: {:.2} mm, status: {}",
            sample.mm(),
            fullness
        );
        sink.emit(&AppEvent::Measured {
            distance_mm: sample.mm(),
            fullness,
            clamped: sample.was_clamped(),
            timed_out: sample.timed_out(),
        });
        if fullness != self.fullness {
            sink.emit(&AppEvent::FullnessChanged {
                from: self.fullness,
                to: fullness,
            });
            self.fullness = fullness;
        }

        // 3. Decide. Connectivity is sampled once so actuation and
        //    reporting agree within a tick.
        let connected = net.is_connected();
        let applied = policy::decide(fullness, connected);

        // 4. Actuate
        match applied {
            Some(target) => {
                self.actuators.apply_state(target, hw);
                sink.emit(&AppEvent::ActuatorsApplied(target));
            }
            None => sink.emit(&AppEvent::ActuatorsHeld(self.actuators.state())),
        }

        // 5. Report
        let reported = if connected {
            let snapshot = self.snapshot(clock.uptime_ms());
            reporter.report(&snapshot);
            self.report_count += 1;
            sink.emit(&AppEvent::Reported {
                uptime_ms: snapshot.uptime_ms,
            });
            true
        } else {
            sink.emit(&AppEvent::ReportSkipped);
            false
        };

        TickOutcome {
            distance_mm: sample.mm(),
            fullness,
            applied,
            reported,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a status snapshot from the current actuator state and the
    /// last classification.
    pub fn snapshot(&self, uptime_ms: u64) -> StatusSnapshot {
        StatusSnapshot::new(self.actuators.state(), self.fullness, uptime_ms)
    }

    pub fn actuator_state(&self) -> ActuatorState {
        self.actuators.state()
    }

    pub fn fullness(&self) -> FullnessState {
        self.fullness
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Snapshots handed to the reporter since startup.
    pub fn report_count(&self) -> u64 {
        self.report_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    // ── Runtime configuration ─────────────────────────────────

    /// Hot-reload thresholds and the fan duty table.  Outputs are not
    /// re-driven until the next decision.  Pin, PWM, network and timing
    /// values are only read by whoever builds drivers from [`config`](Self::config).
    pub fn update_config(&mut self, config: SystemConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.classifier = FullnessClassifier::new(&config.thresholds);
        self.actuators.set_duty_table(config.fan_duty);
        self.config = config;
        info!("Configuration updated at runtime");
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Scheduler binding
// ───────────────────────────────────────────────────────────────

/// Borrows the service and every port it needs for one poll of the
/// [`PeriodicScheduler`](crate::scheduler::PeriodicScheduler), so the
/// scheduler can run a tick without knowing what a tick is.
pub struct ServiceTick<'a, H, N, C, R, S> {
    pub app: &'a mut TrapService,
    pub hw: &'a mut H,
    pub net: &'a N,
    pub clock: &'a C,
    pub reporter: &'a mut R,
    pub sink: &'a mut S,
    /// Outcome of the tick run during this poll, if any.
    pub outcome: Option<TickOutcome>,
}

impl<H, N, C, R, S> SchedulerDelegate for ServiceTick<'_, H, N, C, R, S>
where
    H: DistancePort + ActuatorPort,
    N: ConnectivityPort,
    C: ClockPort,
    R: StatusReporter,
    S: EventSink,
{
    fn on_tick(&mut self, _tick_no: u64) {
        let outcome = self.app.tick(
            &mut *self.hw,
            self.net,
            self.clock,
            &mut *self.reporter,
            &mut *self.sink,
        );
        self.outcome = Some(outcome);
    }
}

fn on_off(on: bool) -> &'static str {
    if on { "ON" } else { "OFF" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::actuator::FanMode;
    use crate::sensors::DistanceSample;

    struct Board {
        distance: f32,
        duties: Vec<u32>,
        light: Option<bool>,
    }
    impl DistancePort for Board {
        fn measure(&mut self) -> DistanceSample {
            DistanceSample::normalized(self.distance, 100.0)
        }
    }
    impl ActuatorPort for Board {
        fn set_fan_duty(&mut self, duty: u32) {
            self.duties.push(duty);
        }
        fn set_light(&mut self, on: bool) {
            self.light = Some(on);
        }
    }
    struct Net(bool);
    impl ConnectivityPort for Net {
        fn is_connected(&self) -> bool {
            self.0
        }
    }
    struct FixedClock(u64);
    impl ClockPort for FixedClock {
        fn uptime_us(&self) -> u64 {
            self.0 * 1000
        }
    }
    #[derive(Default)]
    struct Reports(Vec<StatusSnapshot>);
    impl StatusReporter for Reports {
        fn report(&mut self, s: &StatusSnapshot) {
            self.0.push(*s);
        }
    }
    struct NullSink;
    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    #[test]
    fn snapshot_reflects_last_tick() {
        let mut app = TrapService::new(SystemConfig::default());
        let mut board = Board { distance: 45.0, duties: vec![], light: None };
        let mut reports = Reports::default();
        app.start(&mut board, &mut NullSink);
        app.tick(&mut board, &Net(true), &FixedClock(31_000), &mut reports, &mut NullSink);

        let s = reports.0[0];
        assert_eq!(s.fan, FanMode::High);
        assert_eq!(s.fullness, FullnessState::Filling);
        assert!(s.light_on);
        assert_eq!(s.uptime_ms, 31_000);
    }

    #[test]
    fn update_config_rejects_invalid_and_keeps_old() {
        let mut app = TrapService::new(SystemConfig::default());
        let mut bad = SystemConfig::default();
        bad.thresholds.filling_mm = 10.0;
        assert!(app.update_config(bad).is_err());
        assert!((app.config().thresholds.filling_mm - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn update_config_moves_thresholds() {
        let mut app = TrapService::new(SystemConfig::default());
        let mut cfg = SystemConfig::default();
        cfg.thresholds.full_mm = 50.0;
        cfg.thresholds.filling_mm = 70.0;
        app.update_config(cfg).unwrap();

        let mut board = Board { distance: 45.0, duties: vec![], light: None };
        let out = app.tick(&mut board, &Net(false), &FixedClock(0), &mut Reports::default(), &mut NullSink);
        assert_eq!(out.fullness, FullnessState::Full);
        assert_eq!(board.light, Some(false));
    }
}
