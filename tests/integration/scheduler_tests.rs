//! Integration tests for the periodic scheduler driving the service
//! through `ServiceTick`.

use crate::mock_hw::{MockBoard, MockClock, MockNet, RecordingReporter, RecordingSink};

use smarttrap::app::service::{ServiceTick, TrapService};
use smarttrap::config::SystemConfig;
use smarttrap::scheduler::PeriodicScheduler;

struct Loop {
    app: TrapService,
    board: MockBoard,
    net: MockNet,
    clock: MockClock,
    reporter: RecordingReporter,
    sink: RecordingSink,
    scheduler: PeriodicScheduler,
}

impl Loop {
    fn new() -> Self {
        let config = SystemConfig::default();
        let mut l = Self {
            scheduler: PeriodicScheduler::new(config.timing.tick_period_ms),
            app: TrapService::new(config),
            board: MockBoard::new(45.0),
            net: MockNet::new(true),
            clock: MockClock::new(),
            reporter: RecordingReporter::default(),
            sink: RecordingSink::default(),
        };
        l.app.start(&mut l.board, &mut l.sink);
        l
    }

    /// One main-loop iteration.  Returns whether a tick ran.
    fn poll(&mut self) -> bool {
        let mut tick = ServiceTick {
            app: &mut self.app,
            hw: &mut self.board,
            net: &self.net,
            clock: &self.clock,
            reporter: &mut self.reporter,
            sink: &mut self.sink,
            outcome: None,
        };
        let ran = self.scheduler.poll(&self.clock, &mut tick);
        assert_eq!(ran, tick.outcome.is_some());
        ran
    }
}

#[test]
fn no_tick_before_first_period() {
    let mut l = Loop::new();
    for ms in (0..30_000).step_by(10) {
        l.clock.set_ms(ms);
        assert!(!l.poll(), "ticked early at {ms} ms");
    }
    assert_eq!(l.board.measurements, 0);
}

#[test]
fn ticks_every_period_when_polled_often() {
    let mut l = Loop::new();
    let mut tick_times = Vec::new();
    // Five minutes of 10 ms polls.
    for ms in (0..=300_000).step_by(10) {
        l.clock.set_ms(ms);
        if l.poll() {
            tick_times.push(ms);
        }
    }
    assert_eq!(tick_times.len(), 10);
    for pair in tick_times.windows(2) {
        assert!(pair[1] - pair[0] >= 30_000);
    }
    assert_eq!(l.app.tick_count(), 10);
    assert_eq!(l.reporter.snapshots.len(), 10);
}

#[test]
fn sparse_polling_never_bursts() {
    let mut l = Loop::new();
    l.clock.set_ms(95_000);
    assert!(l.poll());
    assert!(!l.poll());
    l.clock.set_ms(124_999);
    assert!(!l.poll());
    l.clock.set_ms(125_000);
    assert!(l.poll());
    assert_eq!(l.board.measurements, 2);
}
