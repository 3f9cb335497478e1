//! Non-blocking periodic scheduler.
//!
//! The main loop polls the scheduler as often as it likes; the scheduler
//! compares elapsed monotonic time against the configured period and,
//! when due, notifies a [`SchedulerDelegate`].  Between polls the loop is
//! free to run other work (WiFi reconnect, watchdog feed).
//!
//! ```text
//!   main loop ──poll()──▶ PeriodicScheduler ──on_tick()──▶ delegate
//!       ▲                        │                          (TrapService.tick)
//!       └──── other work ◀───────┘ not due
//! ```
//!
//! The period is measured from the end of the previous tick, so ticks are
//! always at least one period apart.  The first tick fires one full period
//! after boot.

use crate::app::ports::{ClockPort, SchedulerDelegate};
use log::{debug, info};

pub struct PeriodicScheduler {
    period_ms: u64,
    /// Clock value when the last tick completed.
    last_tick_ms: u64,
    ticks: u64,
}

impl PeriodicScheduler {
    pub fn new(period_ms: u32) -> Self {
        info!("Scheduler: period {} ms", period_ms);
        Self {
            period_ms: u64::from(period_ms),
            last_tick_ms: 0,
            ticks: 0,
        }
    }

    /// `true` once a full period has elapsed since the last completed tick.
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_tick_ms) >= self.period_ms
    }

    /// Check the clock and run the delegate if a tick is due.
    ///
    /// Returns `true` if a tick ran.  The delegate runs to completion
    /// before the tick timestamp is refreshed, so a slow tick pushes the
    /// next one back rather than causing a catch-up burst.
    pub fn poll(&mut self, clock: &impl ClockPort, delegate: &mut dyn SchedulerDelegate) -> bool {
        if !self.is_due(clock.uptime_ms()) {
            return false;
        }

        self.ticks += 1;
        debug!("Scheduler: tick {}", self.ticks);
        delegate.on_tick(self.ticks);
        self.last_tick_ms = clock.uptime_ms();
        true
    }

    /// Ticks run since boot.
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    pub fn last_tick_ms(&self) -> u64 {
        self.last_tick_ms
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct ManualClock(Rc<Cell<u64>>);

    impl ManualClock {
        fn new() -> Self {
            Self(Rc::new(Cell::new(0)))
        }
        fn set_ms(&self, ms: u64) {
            self.0.set(ms * 1000);
        }
        fn advance_ms(&self, ms: u64) {
            self.0.set(self.0.get() + ms * 1000);
        }
    }

    impl ClockPort for ManualClock {
        fn uptime_us(&self) -> u64 {
            self.0.get()
        }
    }

    /// Test delegate that records ticks and optionally burns clock time.
    struct RecordingDelegate {
        ticks: Vec<u64>,
        clock: ManualClock,
        work_ms: u64,
    }

    impl SchedulerDelegate for RecordingDelegate {
        fn on_tick(&mut self, tick_no: u64) {
            self.ticks.push(tick_no);
            self.clock.advance_ms(self.work_ms);
        }
    }

    fn setup(work_ms: u64) -> (PeriodicScheduler, ManualClock, RecordingDelegate) {
        let clock = ManualClock::new();
        let delegate = RecordingDelegate {
            ticks: Vec::new(),
            clock: clock.clone(),
            work_ms,
        };
        (PeriodicScheduler::new(30_000), clock, delegate)
    }

    #[test]
    fn first_tick_waits_one_period() {
        let (mut sched, clock, mut delegate) = setup(0);
        clock.set_ms(29_999);
        assert!(!sched.poll(&clock, &mut delegate));
        clock.set_ms(30_000);
        assert!(sched.poll(&clock, &mut delegate));
        assert_eq!(delegate.ticks, vec![1]);
    }

    #[test]
    fn polling_between_periods_is_a_no_op() {
        let (mut sched, clock, mut delegate) = setup(0);
        clock.set_ms(30_000);
        sched.poll(&clock, &mut delegate);
        for _ in 0..100 {
            clock.advance_ms(100);
            sched.poll(&clock, &mut delegate);
        }
        // 10 s after the tick, still only one.
        assert_eq!(delegate.ticks.len(), 1);
    }

    #[test]
    fn period_measured_from_end_of_tick() {
        let (mut sched, clock, mut delegate) = setup(50);
        clock.set_ms(30_000);
        sched.poll(&clock, &mut delegate);
        assert_eq!(sched.last_tick_ms(), 30_050);

        clock.set_ms(60_040);
        assert!(!sched.poll(&clock, &mut delegate));
        clock.set_ms(60_050);
        assert!(sched.poll(&clock, &mut delegate));
    }

    #[test]
    fn late_poll_does_not_burst() {
        let (mut sched, clock, mut delegate) = setup(0);
        clock.set_ms(100_000);
        assert!(sched.poll(&clock, &mut delegate));
        assert!(!sched.poll(&clock, &mut delegate));
        assert_eq!(sched.tick_count(), 1);
        assert!(!sched.is_due(129_999));
        assert!(sched.is_due(130_000));
    }
}
