use crate::clock::Millis;
use crate::item::Category;
use crate::random::RandomSource;
use crate::timers::TimerId;

/// Floor for the gap between two passes
pub const MIN_PASS_DELAY_MS: Millis = 1;

/// Pacing constants for the spawn scheduler
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPolicy {
    pub concurrency_cap: usize,
    pub good_probability: f64,
    pub min_delay_ms: Millis,
    pub max_delay_ms: Millis,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            concurrency_cap: 2,
            good_probability: 0.65,
            min_delay_ms: 1_000,
            max_delay_ms: 1_700,
        }
    }
}

/// Result of one scheduling pass
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnPass {
    /// Category to spawn, or None when the conveyor is at capacity
    pub spawn: Option<Category>,
    pub next_delay_ms: Millis,
}

/// Decides when new items enter the conveyor.
///
/// The scheduler holds no items. The session reports how many are active on
/// each pass and keeps the handle of the pending pass here so that
/// deactivation can cancel it.
#[derive(Debug)]
pub struct SpawnScheduler {
    policy: SpawnPolicy,
    active: bool,
    pending: Option<TimerId>,
    next_spawn_delay_ms: Millis,
}

impl SpawnScheduler {
    pub fn new(policy: SpawnPolicy) -> Self {
        Self {
            policy,
            active: false,
            pending: None,
            next_spawn_delay_ms: policy.min_delay_ms,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.pending = None;
    }

    /// Stop scheduling. Returns the pending pass so the caller can cancel it.
    pub fn deactivate(&mut self) -> Option<TimerId> {
        self.active = false;
        self.pending.take()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_pending(&mut self, timer: TimerId) {
        self.pending = Some(timer);
    }

    /// Forget the pending pass once it has fired
    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<TimerId> {
        self.pending
    }

    pub fn next_spawn_delay_ms(&self) -> Millis {
        self.next_spawn_delay_ms
    }

    pub fn has_capacity(&self, active_items: usize) -> bool {
        active_items < self.policy.concurrency_cap
    }

    /// One scheduling decision. The category is drawn first, and only when
    /// there is room; the delay is redrawn on every pass, including passes
    /// that hit the cap.
    pub fn pass<G: RandomSource + ?Sized>(&mut self, active_items: usize, rng: &mut G) -> SpawnPass {
        let spawn = if self.active && self.has_capacity(active_items) {
            Some(self.draw_category(rng))
        } else {
            None
        };
        self.next_spawn_delay_ms = self.draw_delay(rng);
        SpawnPass {
            spawn,
            next_delay_ms: self.next_spawn_delay_ms,
        }
    }

    fn draw_category<G: RandomSource + ?Sized>(&self, rng: &mut G) -> Category {
        if rng.next_unit() < self.policy.good_probability {
            Category::Good
        } else {
            Category::Bad
        }
    }

    /// Never zero: a pass always lands strictly after the one that drew it
    fn draw_delay<G: RandomSource + ?Sized>(&self, rng: &mut G) -> Millis {
        let span = self.policy.max_delay_ms.saturating_sub(self.policy.min_delay_ms);
        let delay = self.policy.min_delay_ms + (rng.next_unit() * span as f64) as Millis;
        delay.max(MIN_PASS_DELAY_MS)
    }
}
