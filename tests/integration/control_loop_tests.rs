//! Integration tests for the sense → classify → decide → actuate → report
//! pipeline, driven through `TrapService::tick` against mock adapters.

use crate::mock_hw::{ActuatorCall, MockBoard, MockClock, MockNet, RecordingReporter, RecordingSink};

use smarttrap::app::events::AppEvent;
use smarttrap::app::service::TrapService;
use smarttrap::config::SystemConfig;
use smarttrap::control::actuator::{ActuatorState, FanMode};
use smarttrap::control::classifier::FullnessState;

const DUTY_OFF: u32 = 0;
const DUTY_LOW: u32 = 400;
const DUTY_HIGH: u32 = 900;

struct Rig {
    app: TrapService,
    board: MockBoard,
    net: MockNet,
    clock: MockClock,
    reporter: RecordingReporter,
    sink: RecordingSink,
}

impl Rig {
    fn started(distance_mm: f32, connected: bool) -> Self {
        let mut rig = Self {
            app: TrapService::new(SystemConfig::default()),
            board: MockBoard::new(distance_mm),
            net: MockNet::new(connected),
            clock: MockClock::new(),
            reporter: RecordingReporter::default(),
            sink: RecordingSink::default(),
        };
        rig.app.start(&mut rig.board, &mut rig.sink);
        rig
    }

    fn tick(&mut self) -> smarttrap::app::service::TickOutcome {
        self.clock.advance_ms(30_000);
        self.app.tick(
            &mut self.board,
            &self.net,
            &self.clock,
            &mut self.reporter,
            &mut self.sink,
        )
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_drives_baseline_outputs() {
    let rig = Rig::started(100.0, false);
    assert_eq!(
        rig.board.calls,
        vec![ActuatorCall::FanDuty(DUTY_LOW), ActuatorCall::Light(true)]
    );
    assert_eq!(rig.app.actuator_state(), ActuatorState::BASELINE);
    assert_eq!(rig.board.measurements, 0, "start must not read the sensor");
    assert!(matches!(rig.sink.events[0], AppEvent::Started(_)));
}

// ── Decision table ────────────────────────────────────────────

#[test]
fn full_and_connected_turns_everything_off() {
    let mut rig = Rig::started(20.0, true);
    let out = rig.tick();
    assert_eq!(out.fullness, FullnessState::Full);
    assert_eq!(rig.board.fan_duty(), Some(DUTY_OFF));
    assert_eq!(rig.board.light(), Some(false));
}

#[test]
fn full_and_disconnected_turns_everything_off() {
    let mut rig = Rig::started(20.0, false);
    rig.tick();
    assert_eq!(rig.board.fan_duty(), Some(DUTY_OFF));
    assert_eq!(rig.board.light(), Some(false));
    assert_eq!(
        rig.app.actuator_state(),
        ActuatorState { fan: FanMode::Off, light_on: false }
    );
}

#[test]
fn not_full_and_connected_runs_high_with_light() {
    for d in [45.0, 80.0] {
        let mut rig = Rig::started(d, true);
        rig.tick();
        assert_eq!(rig.board.fan_duty(), Some(DUTY_HIGH), "distance {d}");
        assert_eq!(rig.board.light(), Some(true), "distance {d}");
    }
}

#[test]
fn not_full_and_disconnected_touches_nothing() {
    for d in [45.0, 80.0] {
        let mut rig = Rig::started(d, false);
        rig.board.clear_calls();
        let out = rig.tick();
        assert!(out.applied.is_none());
        assert!(rig.board.calls.is_empty(), "distance {d}: {:?}", rig.board.calls);
        assert_eq!(rig.app.actuator_state(), ActuatorState::BASELINE);
    }
}

#[test]
fn offline_hold_keeps_previous_full_state() {
    let mut rig = Rig::started(80.0, false);

    rig.board.distance_mm = 20.0;
    rig.tick();
    assert_eq!(rig.app.actuator_state().fan, FanMode::Off);

    // Emptied while still offline: outputs stay off until the network returns.
    rig.board.distance_mm = 80.0;
    rig.tick();
    assert_eq!(rig.app.actuator_state().fan, FanMode::Off);
    assert!(!rig.app.actuator_state().light_on);

    rig.net.set(true);
    rig.tick();
    assert_eq!(rig.app.actuator_state(), ActuatorState { fan: FanMode::High, light_on: true });
}

#[test]
fn sensor_timeout_reads_as_empty() {
    let mut rig = Rig::started(0.0, true);
    let out = rig.tick();
    assert!((out.distance_mm - 100.0).abs() < f32::EPSILON);
    assert_eq!(out.fullness, FullnessState::Empty);
    assert_eq!(rig.board.fan_duty(), Some(DUTY_HIGH));
}

#[test]
fn over_range_reads_as_empty() {
    let mut rig = Rig::started(250.0, true);
    let out = rig.tick();
    assert!((out.distance_mm - 100.0).abs() < f32::EPSILON);
    assert_eq!(out.fullness, FullnessState::Empty);
    // Clamped, but an echo did arrive.
    assert!(rig.sink.events.contains(&AppEvent::Measured {
        distance_mm: 100.0,
        fullness: FullnessState::Empty,
        clamped: true,
        timed_out: false,
    }));
}

#[test]
fn repeated_identical_ticks_are_idempotent() {
    let mut rig = Rig::started(45.0, true);
    rig.tick();
    let after_one = rig.app.actuator_state();
    rig.tick();
    assert_eq!(rig.app.actuator_state(), after_one);
    assert_eq!(rig.board.fan_duty(), Some(DUTY_HIGH));
}

// ── Reporting ─────────────────────────────────────────────────

#[test]
fn reports_exactly_once_per_connected_tick() {
    let mut rig = Rig::started(45.0, true);
    rig.tick();
    rig.tick();
    rig.net.set(false);
    rig.tick();
    rig.net.set(true);
    rig.tick();

    assert_eq!(rig.reporter.snapshots.len(), 3);
    assert_eq!(rig.app.report_count(), 3);
    assert_eq!(rig.app.tick_count(), 4);
}

#[test]
fn never_reports_while_offline() {
    let mut rig = Rig::started(20.0, false);
    for _ in 0..5 {
        rig.tick();
    }
    assert!(rig.reporter.snapshots.is_empty());
    assert!(rig.sink.events.iter().any(|e| *e == AppEvent::ReportSkipped));
}

#[test]
fn snapshot_carries_post_decision_state_and_time() {
    let mut rig = Rig::started(20.0, true);
    rig.tick();

    let snap = rig.reporter.snapshots[0];
    assert_eq!(snap.fan, FanMode::Off);
    assert!(!snap.light_on);
    assert_eq!(snap.fullness, FullnessState::Full);
    assert_eq!(snap.uptime_ms, 30_000);

    let payload = snap.to_payload();
    assert_eq!(payload.fan_speed, "OFF");
    assert_eq!(payload.trap_status, "FULL");
    assert_eq!(payload.uv_status, "OFF");
    assert_eq!(payload.last_updated, "30000");
}

// ── Events ────────────────────────────────────────────────────

#[test]
fn fullness_change_is_announced_once() {
    let mut rig = Rig::started(80.0, true);
    rig.tick();
    rig.board.distance_mm = 45.0;
    rig.tick();
    rig.tick();

    let changes: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::FullnessChanged { .. }))
        .collect();
    assert_eq!(
        changes,
        vec![&AppEvent::FullnessChanged {
            from: FullnessState::Empty,
            to: FullnessState::Filling,
        }]
    );
}
