use crate::clock::Millis;
use crate::gesture::SwipeDirection;
use crate::item::Category;

/// Opaque reference to a visual owned by the renderer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VisualHandle(pub u64);

/// Rendering collaborator. Write-only from the engine's point of view:
/// nothing here is ever read back into game state.
///
/// Completion of `animate` and `play_exit_animation` is not reported back;
/// the session owns the timers that decide when a transit or exit is over.
pub trait Renderer {
    fn spawn_visual(&mut self, category: Category) -> VisualHandle;
    fn animate(&mut self, handle: VisualHandle, duration_ms: Millis, now: Millis);
    fn play_exit_animation(&mut self, handle: VisualHandle, direction: SwipeDirection, now: Millis);
    /// Brief flash for an item that ran off the conveyor unsorted
    fn mark_missed(&mut self, _handle: VisualHandle, _now: Millis) {}
    fn remove(&mut self, handle: VisualHandle);
}

/// Calls received by a [`RecordingRenderer`]
#[derive(Clone, Debug, PartialEq)]
pub enum RenderCall {
    Spawn(VisualHandle, Category),
    Animate(VisualHandle, Millis),
    Exit(VisualHandle, SwipeDirection),
    Missed(VisualHandle),
    Remove(VisualHandle),
}

/// Headless renderer that records every call, for tests and dry runs
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next_handle: u64,
    pub calls: Vec<RenderCall>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawned(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, RenderCall::Spawn(..)))
            .count()
    }

    pub fn removed(&self) -> Vec<VisualHandle> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::Remove(h) => Some(*h),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for RecordingRenderer {
    fn spawn_visual(&mut self, category: Category) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.calls.push(RenderCall::Spawn(handle, category));
        handle
    }

    fn animate(&mut self, handle: VisualHandle, duration_ms: Millis, _now: Millis) {
        self.calls.push(RenderCall::Animate(handle, duration_ms));
    }

    fn play_exit_animation(&mut self, handle: VisualHandle, direction: SwipeDirection, _now: Millis) {
        self.calls.push(RenderCall::Exit(handle, direction));
    }

    fn mark_missed(&mut self, handle: VisualHandle, _now: Millis) {
        self.calls.push(RenderCall::Missed(handle));
    }

    fn remove(&mut self, handle: VisualHandle) {
        self.calls.push(RenderCall::Remove(handle));
    }
}
