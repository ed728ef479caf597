//! The timed sorting session.
//!
//! All mutation happens through a handful of short synchronous calls made
//! from one event loop: `start`, `retry`, `advance`/`tick` on every frame,
//! and `on_pointer` for input. Delayed work (spawn passes, transit timeouts,
//! exit animations) lives in the session's own timer queue and is fired from
//! `advance` in deadline order, so the whole session is deterministic for a
//! given sequence of timestamps, pointer events and random draws.
//!
//! When a session ends, the pending spawn pass is cancelled and the frame
//! countdown stops. Items still on the conveyor finish their transit
//! visually and are removed when their timer fires, without being scored.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::clock::{Clock, Millis};
use crate::feedback::{AmbientFeedback, FeedbackError};
use crate::gesture::{
    CaptureToken, GestureClassifier, PointerEvent, PointerKind, PointerTracker, SwipeDirection,
};
use crate::item::{Category, Item, ItemId, Outcome};
use crate::random::RandomSource;
use crate::render::{Renderer, VisualHandle};
use crate::scheduler::{SpawnPolicy, SpawnScheduler};
use crate::scoring::{ScoreBoard, Summary};
use crate::timers::TimerQueue;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Idle,
    Running,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub duration_ms: Millis,
    pub transit_ms: Millis,
    pub exit_animation_ms: Millis,
    pub miss_flash_ms: Millis,
    pub swipe_threshold: f64,
    pub spawn: SpawnPolicy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_ms: 30_000,
            transit_ms: 4_000,
            exit_animation_ms: 230,
            miss_flash_ms: 260,
            swipe_threshold: 30.0,
            spawn: SpawnPolicy::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timer {
    SpawnPass,
    TransitComplete(ItemId),
    VisualDone(VisualHandle),
}

pub struct Session<R: Renderer, A: AmbientFeedback, G: RandomSource> {
    config: SessionConfig,
    state: SessionState,
    clock: Clock,
    scheduler: SpawnScheduler,
    scores: ScoreBoard,
    items: BTreeMap<ItemId, Item>,
    by_handle: HashMap<VisualHandle, ItemId>,
    timers: TimerQueue<Timer>,
    classifier: GestureClassifier,
    tracker: PointerTracker,
    next_item_id: ItemId,
    ended_at: Option<Millis>,
    final_summary: Option<Summary>,
    renderer: R,
    feedback: A,
    rng: G,
}

impl<R: Renderer, A: AmbientFeedback, G: RandomSource> Session<R, A, G> {
    pub fn new(config: SessionConfig, renderer: R, feedback: A, rng: G) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            clock: Clock::new(config.duration_ms),
            scheduler: SpawnScheduler::new(config.spawn),
            scores: ScoreBoard::new(),
            items: BTreeMap::new(),
            by_handle: HashMap::new(),
            timers: TimerQueue::new(),
            classifier: GestureClassifier::new(config.swipe_threshold),
            tracker: PointerTracker::new(),
            next_item_id: 0,
            ended_at: None,
            final_summary: None,
            renderer,
            feedback,
            rng,
        }
    }

    /// Enter `Running` from `Idle` or `Ended`. Returns false (and does
    /// nothing) when already running.
    pub fn start(&mut self, now: Millis) -> bool {
        if self.state == SessionState::Running {
            debug!("start ignored: session already running");
            return false;
        }

        self.clear_scene();
        self.scores.reset();
        self.final_summary = None;
        self.ended_at = None;
        self.clock.start(now);
        self.state = SessionState::Running;

        contain("reset", self.feedback.reset());
        contain("play", self.feedback.play());

        self.scheduler.activate();
        info!(duration_ms = self.config.duration_ms, "session started");

        // first pass runs immediately, the rest are paced by the scheduler
        self.on_spawn_pass(now);
        true
    }

    /// Leave the results for the start screen. Only valid from `Ended`.
    pub fn retry(&mut self) -> bool {
        if self.state != SessionState::Ended {
            debug!(state = %self.state, "retry ignored");
            return false;
        }
        self.clear_scene();
        self.state = SessionState::Idle;
        true
    }

    /// Frame callback: fire every timer due by `now` in deadline order,
    /// then update the countdown.
    ///
    /// The countdown is updated once per call. Before each timer runs the
    /// session only checks whether time ran out by that timer's deadline;
    /// if so it ends there, so a spawn pass scheduled after the session's
    /// last millisecond sees the session as ended.
    pub fn advance(&mut self, now: Millis) {
        while let Some((_, at, timer)) = self.timers.pop_due(now) {
            self.end_if_expired(at);
            match timer {
                Timer::SpawnPass => {
                    self.scheduler.clear_pending();
                    self.on_spawn_pass(at);
                }
                Timer::TransitComplete(id) => {
                    self.on_transit_complete(id, at);
                }
                Timer::VisualDone(handle) => self.renderer.remove(handle),
            }
        }
        self.tick(now);
    }

    /// Recompute remaining time; ends the session at zero. No-op unless running.
    pub fn tick(&mut self, now: Millis) {
        if self.state != SessionState::Running {
            return;
        }
        if self.clock.update(now) == 0 {
            self.end(now);
        }
    }

    fn end_if_expired(&mut self, at: Millis) {
        if self.state == SessionState::Running && self.clock.expires_by(at) {
            self.tick(at);
        }
    }

    /// Stop the session and produce the summary. Idempotent: only the
    /// first call from `Running` has any effect.
    pub fn end(&mut self, now: Millis) -> Option<Summary> {
        if self.state != SessionState::Running {
            return None;
        }

        if let Some(pending) = self.scheduler.deactivate() {
            self.timers.cancel(pending);
        }
        self.clock.stop();
        self.tracker.clear();
        self.state = SessionState::Ended;
        self.ended_at = Some(now);

        contain("pause", self.feedback.pause());

        let summary = self.scores.summary();
        self.final_summary = Some(summary);
        info!(
            correct = summary.correct,
            wrong = summary.wrong,
            accuracy = summary.accuracy,
            in_transit = self.items.len(),
            "session ended"
        );
        Some(summary)
    }

    /// One scheduling pass. Re-checks the current state, so a pass that was
    /// already dispatched when the session ended spawns nothing.
    pub fn on_spawn_pass(&mut self, now: Millis) -> Option<ItemId> {
        if self.state != SessionState::Running || !self.scheduler.is_active() {
            return None;
        }
        // never keep two pass loops alive
        if let Some(pending) = self.scheduler.pending() {
            self.timers.cancel(pending);
            self.scheduler.clear_pending();
        }

        let pass = self.scheduler.pass(self.items.len(), &mut self.rng);
        let spawned = pass.spawn.map(|category| self.spawn_item(category, now));

        let next = self
            .timers
            .schedule(now.saturating_add(pass.next_delay_ms), Timer::SpawnPass);
        self.scheduler.set_pending(next);
        spawned
    }

    /// Transit timer for `id` fired. Scores a miss if the item is still
    /// unresolved and the session is running.
    pub fn on_transit_complete(&mut self, id: ItemId, now: Millis) -> Option<Outcome> {
        if self.state != SessionState::Running {
            // drained after the session ended: visual only, never scored
            let item = self.take_item(id)?;
            self.renderer.remove(item.handle());
            return None;
        }

        let item = self.resolve(id, Outcome::Missed)?;
        self.renderer.mark_missed(item.handle(), now);
        self.timers.schedule(
            now.saturating_add(self.config.miss_flash_ms),
            Timer::VisualDone(item.handle()),
        );
        Some(Outcome::Missed)
    }

    /// Pointer input. Down opens a capture on an active item, the matching
    /// up classifies the gesture. Ignored entirely unless running.
    pub fn on_pointer(&mut self, event: PointerEvent, now: Millis) -> Option<Outcome> {
        if self.state != SessionState::Running {
            return None;
        }
        if event.kind == PointerKind::Down && !self.by_handle.contains_key(&event.handle) {
            return None;
        }

        let gesture = self.tracker.on_event(&event)?;
        let direction = self.classifier.classify(gesture.down, gesture.up)?;
        let id = *self.by_handle.get(&gesture.handle)?;
        self.on_swipe(id, direction, now)
    }

    /// Forget a capture whose release will never arrive
    pub fn cancel_pointer(&mut self, capture: CaptureToken) -> bool {
        self.tracker.cancel(capture)
    }

    /// A recognized swipe over `id`
    pub fn on_swipe(
        &mut self,
        id: ItemId,
        direction: SwipeDirection,
        now: Millis,
    ) -> Option<Outcome> {
        if self.state != SessionState::Running {
            return None;
        }
        let category = self.items.get(&id)?.category();
        let outcome = Outcome::for_swipe(category, direction);

        let item = self.resolve(id, outcome)?;
        self.renderer.play_exit_animation(item.handle(), direction, now);
        self.timers.schedule(
            now.saturating_add(self.config.exit_animation_ms),
            Timer::VisualDone(item.handle()),
        );
        Some(outcome)
    }

    fn spawn_item(&mut self, category: Category, now: Millis) -> ItemId {
        self.next_item_id += 1;
        let id = self.next_item_id;

        let handle = self.renderer.spawn_visual(category);
        self.renderer.animate(handle, self.config.transit_ms, now);

        let mut item = Item::new(id, category, handle, now, self.config.transit_ms);
        let timer = self
            .timers
            .schedule(item.expires_at(), Timer::TransitComplete(id));
        item.attach_transit_timer(timer);

        self.by_handle.insert(handle, id);
        self.items.insert(id, item);
        debug!(item = id, %category, active = self.items.len(), "spawned item");
        id
    }

    /// The single check-and-set shared by both resolution paths. The winner
    /// scores the item and removes it from the active set.
    fn resolve(&mut self, id: ItemId, outcome: Outcome) -> Option<Item> {
        let item = self.items.get_mut(&id)?;
        if !item.try_resolve(outcome) {
            debug!(item = id, %outcome, "late resolution ignored");
            return None;
        }
        let item = self.take_item(id)?;
        self.scores.record(outcome);
        debug!(
            item = id,
            %outcome,
            correct = self.scores.correct(),
            wrong = self.scores.wrong(),
            "resolved item"
        );
        Some(item)
    }

    fn take_item(&mut self, id: ItemId) -> Option<Item> {
        let mut item = self.items.remove(&id)?;
        self.by_handle.remove(&item.handle());
        if let Some(timer) = item.take_transit_timer() {
            self.timers.cancel(timer);
        }
        Some(item)
    }

    /// Drop every item, pending timer and lingering visual
    fn clear_scene(&mut self) {
        while let Some((_, _, timer)) = self.timers.pop_due(Millis::MAX) {
            if let Timer::VisualDone(handle) = timer {
                self.renderer.remove(handle);
            }
        }
        for item in std::mem::take(&mut self.items).into_values() {
            self.renderer.remove(item.handle());
        }
        self.by_handle.clear();
        self.tracker.clear();
        self.scheduler.deactivate();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SessionState::Running
    }

    pub fn remaining_ms(&self) -> Millis {
        self.clock.remaining_ms()
    }

    pub fn started_at(&self) -> Option<Millis> {
        self.clock.started_at()
    }

    pub fn ended_at(&self) -> Option<Millis> {
        self.ended_at
    }

    pub fn correct_count(&self) -> u32 {
        self.scores.correct()
    }

    pub fn wrong_count(&self) -> u32 {
        self.scores.wrong()
    }

    /// Summary produced by the last `end`, kept until the next `start`
    pub fn summary(&self) -> Option<Summary> {
        self.final_summary
    }

    pub fn active_count(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn next_spawn_delay_ms(&self) -> Millis {
        self.scheduler.next_spawn_delay_ms()
    }

    pub fn has_pending_spawn(&self) -> bool {
        self.scheduler.pending().is_some()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn feedback(&self) -> &A {
        &self.feedback
    }
}

/// Ambient feedback never affects gameplay
fn contain(action: &str, result: Result<(), FeedbackError>) {
    if let Err(err) = result {
        warn!(action, error = %err, "ambient feedback failed");
    }
}
