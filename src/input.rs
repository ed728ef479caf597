use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::gesture::{CaptureToken, PointerEvent};
use crate::render::VisualHandle;

/// Terminal cells are scaled to pixel-like units so swipe thresholds keep
/// their meaning.
pub const CELL_WIDTH_PX: f64 = 8.0;
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// Centre of a terminal cell in pointer units
pub fn cell_to_point(column: u16, row: u16) -> (f64, f64) {
    (
        (column as f64 + 0.5) * CELL_WIDTH_PX,
        (row as f64 + 0.5) * CELL_HEIGHT_PX,
    )
}

/// Turns crossterm mouse events into captured pointer events.
///
/// A left-button press over a visual opens a capture; the release closes
/// it with the same token and visual, wherever the pointer is by then.
/// Presses over empty space open nothing. A press while a capture is still
/// open (a lost release) abandons the old capture; its token is handed out
/// once through `take_abandoned`.
#[derive(Debug, Default)]
pub struct PointerMapper {
    next_token: u64,
    captured: Option<(CaptureToken, VisualHandle)>,
    abandoned: Option<CaptureToken>,
}

impl PointerMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map<F>(&mut self, mouse: &MouseEvent, hit_test: F) -> Option<PointerEvent>
    where
        F: FnOnce(u16, u16) -> Option<VisualHandle>,
    {
        let (x, y) = cell_to_point(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some((stale, _)) = self.captured.take() {
                    self.abandoned = Some(stale);
                }
                let handle = hit_test(mouse.column, mouse.row)?;
                self.next_token += 1;
                let token = CaptureToken(self.next_token);
                self.captured = Some((token, handle));
                Some(PointerEvent::down(handle, x, y, token))
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (token, handle) = self.captured.take()?;
                Some(PointerEvent::up(handle, x, y, token))
            }
            _ => None,
        }
    }

    pub fn is_capturing(&self) -> bool {
        self.captured.is_some()
    }

    /// Token of a capture dropped by a re-press, if any
    pub fn take_abandoned(&mut self) -> Option<CaptureToken> {
        self.abandoned.take()
    }

    /// Forget an open capture, e.g. when leaving the game screen
    pub fn release(&mut self) {
        self.captured = None;
        self.abandoned = None;
    }
}
