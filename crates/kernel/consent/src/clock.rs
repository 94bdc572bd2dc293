use chrono::Utc;

/// Source of the current time, epoch seconds.
///
/// `check` reads the clock exactly once per call, so a fixed clock makes
/// every verdict deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// Wall-clock time via chrono.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// A clock pinned to a single instant, for tests and replay.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
