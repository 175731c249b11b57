//! Tick sources.
//!
//! A driver calls its tick callback at a fixed period, one call at a time, on
//! a single thread. That alone rules out overlapping ticks; the voice's
//! control queue takes care of the event side.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::{Duration, Instant},
};

use tracing::{debug, trace};

/// Returned by the tick callback to keep the timer running or end it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    Continue,
    Stop,
}

/// Periodic invocation of a tick callback.
pub trait TimerDriver {
    fn period(&self) -> Duration;

    /// Call `on_tick` once per period until it returns [`TickControl::Stop`]
    /// or the driver is stopped by other means.
    fn run(&mut self, on_tick: &mut dyn FnMut() -> TickControl);
}

/// Cross-thread stop flag for a running timer.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Wall-clock timer on the current thread.
///
/// Deadlines are absolute, so sleep jitter does not accumulate. When the
/// thread falls behind, the late ticks fire back-to-back instead of being
/// skipped: the sink must see every sample.
pub struct PeriodicTimer {
    period: Duration,
    stop: StopHandle,
}

impl PeriodicTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            stop: StopHandle::new(),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }
}

impl TimerDriver for PeriodicTimer {
    fn period(&self) -> Duration {
        self.period
    }

    fn run(&mut self, on_tick: &mut dyn FnMut() -> TickControl) {
        debug!(period = ?self.period, "periodic timer started");
        let mut deadline = Instant::now();
        let mut ticks: u64 = 0;

        while !self.stop.is_stopped() {
            if on_tick() == TickControl::Stop {
                break;
            }
            ticks += 1;

            deadline += self.period;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            } else {
                trace!(behind = ?(now - deadline), "timer running late");
            }
        }

        debug!(ticks, "periodic timer stopped");
    }
}

/// Fires a fixed number of ticks as fast as possible (tests, offline renders).
pub struct CountedTimer {
    ticks: u64,
}

impl CountedTimer {
    pub fn new(ticks: u64) -> Self {
        Self { ticks }
    }
}

impl TimerDriver for CountedTimer {
    fn period(&self) -> Duration {
        Duration::ZERO
    }

    fn run(&mut self, on_tick: &mut dyn FnMut() -> TickControl) {
        for _ in 0..self.ticks {
            if on_tick() == TickControl::Stop {
                break;
            }
        }
    }
}
