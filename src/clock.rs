use std::time::Instant;

/// Milliseconds on a free-running monotonic timeline.
pub type Millis = u64;

/// Source of monotonic timestamps fed into the engine
pub trait TimeSource {
    fn now_ms(&self) -> Millis;
}

/// Production time source anchored at construction
#[derive(Debug, Clone, Copy)]
pub struct MonotonicTimeSource {
    origin: Instant,
}

impl MonotonicTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTimeSource {
    fn now_ms(&self) -> Millis {
        self.origin.elapsed().as_millis() as Millis
    }
}

/// Session countdown. The only place remaining time is derived from.
///
/// Remaining time never increases between `start` calls: every update is
/// clamped against the previous value, so a repeated or out-of-order frame
/// timestamp cannot move the countdown backwards.
#[derive(Debug, Clone)]
pub struct Clock {
    duration_ms: Millis,
    epoch: Option<Millis>,
    remaining_ms: Millis,
    running: bool,
}

impl Clock {
    pub fn new(duration_ms: Millis) -> Self {
        Self {
            duration_ms,
            epoch: None,
            remaining_ms: duration_ms,
            running: false,
        }
    }

    /// Bind a fresh epoch and refill the countdown.
    pub fn start(&mut self, now: Millis) {
        self.epoch = Some(now);
        self.remaining_ms = self.duration_ms;
        self.running = true;
    }

    /// Recompute remaining time from `now - epoch`. A stopped clock keeps
    /// its last value.
    pub fn update(&mut self, now: Millis) -> Millis {
        if !self.running {
            return self.remaining_ms;
        }
        let computed = self.duration_ms.saturating_sub(self.elapsed_ms(now));
        self.remaining_ms = self.remaining_ms.min(computed);
        self.remaining_ms
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Whether a running countdown reaches zero by `at`. Does not update.
    pub fn expires_by(&self, at: Millis) -> bool {
        self.running && self.elapsed_ms(at) >= self.duration_ms
    }

    pub fn elapsed_ms(&self, now: Millis) -> Millis {
        self.epoch.map_or(0, |epoch| now.saturating_sub(epoch))
    }

    pub fn remaining_ms(&self) -> Millis {
        self.remaining_ms
    }

    pub fn started_at(&self) -> Option<Millis> {
        self.epoch
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
