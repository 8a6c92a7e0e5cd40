//! Elapsed-time tracking for a round.

use std::time::{Duration, Instant};

/// Stopwatch-like clock owned by the engine.
///
/// Redundant `start`/`stop` calls are no-ops. `reset` zeroes the accumulator
/// whether or not the clock is running.
pub trait GameClock {
    fn start(&mut self);
    fn stop(&mut self);
    fn reset(&mut self);
    fn elapsed(&self) -> Duration;
    fn is_running(&self) -> bool;
}

/// Monotonic stopwatch built on `Instant`.
#[derive(Debug, Clone, Default)]
pub struct Stopwatch {
    accumulated: Duration,
    started_at: Option<Instant>,
}

impl Stopwatch {
    pub fn new() -> Self { Self::default() }
}

impl GameClock for Stopwatch {
    fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
    }

    fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
        if self.started_at.is_some() {
            self.started_at = Some(Instant::now());
        }
    }

    fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(started) => self.accumulated + started.elapsed(),
            None => self.accumulated,
        }
    }

    fn is_running(&self) -> bool { self.started_at.is_some() }
}

/// Hand-driven clock for tests: time moves only through `advance`, and
/// start/stop transitions are counted.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    elapsed: Duration,
    running: bool,
    starts: u32,
    stops: u32,
}

impl ManualClock {
    pub fn new() -> Self { Self::default() }

    /// Adds `by` to the elapsed total if the clock is running.
    pub fn advance(&mut self, by: Duration) {
        if self.running {
            self.elapsed += by;
        }
    }

    /// Number of stopped-to-running transitions.
    pub fn start_count(&self) -> u32 { self.starts }

    /// Number of running-to-stopped transitions.
    pub fn stop_count(&self) -> u32 { self.stops }
}

impl GameClock for ManualClock {
    fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.starts += 1;
        }
    }

    fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.stops += 1;
        }
    }

    fn reset(&mut self) { self.elapsed = Duration::ZERO; }

    fn elapsed(&self) -> Duration { self.elapsed }

    fn is_running(&self) -> bool { self.running }
}
