//! Swipe classification from pointer down/up pairs.
//!
//! Pointer events arrive tagged with a capture token. A down event opens a
//! capture for the item under the pointer; the matching up event closes it
//! wherever the pointer ends up, so leaving the item mid-drag does not lose
//! the gesture and does not resolve any other item.

use std::collections::HashMap;

use crate::render::VisualHandle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum SwipeDirection {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Up,
}

/// Identifies one down/up pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CaptureToken(pub u64);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub handle: VisualHandle,
    pub kind: PointerKind,
    pub position: Point,
    pub capture: CaptureToken,
}

impl PointerEvent {
    pub fn down(handle: VisualHandle, x: f64, y: f64, capture: CaptureToken) -> Self {
        Self {
            handle,
            kind: PointerKind::Down,
            position: Point::new(x, y),
            capture,
        }
    }

    pub fn up(handle: VisualHandle, x: f64, y: f64, capture: CaptureToken) -> Self {
        Self {
            handle,
            kind: PointerKind::Up,
            position: Point::new(x, y),
            capture,
        }
    }
}

/// Turns a displacement into a horizontal swipe, or nothing
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureClassifier {
    threshold: f64,
}

impl GestureClassifier {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// A swipe needs a horizontal primary axis (`|dx| >= |dy|`) and at
    /// least `threshold` of horizontal travel. Non-finite input is no swipe.
    pub fn classify(&self, down: Point, up: Point) -> Option<SwipeDirection> {
        if !down.is_finite() || !up.is_finite() {
            return None;
        }
        let dx = up.x - down.x;
        let dy = up.y - down.y;

        if dx.abs() < dy.abs() || dx.abs() < self.threshold {
            return None;
        }

        Some(if dx > 0.0 {
            SwipeDirection::Right
        } else {
            SwipeDirection::Left
        })
    }
}

/// A completed down/up pair for one visual
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletedGesture {
    pub handle: VisualHandle,
    pub down: Point,
    pub up: Point,
}

/// Open captures, keyed by token
#[derive(Debug, Default)]
pub struct PointerTracker {
    open: HashMap<CaptureToken, (VisualHandle, Point)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one event. Returns the pair once the up event closes a capture.
    /// An up without a matching down is dropped. A new down on a visual
    /// replaces any capture still open on it.
    pub fn on_event(&mut self, event: &PointerEvent) -> Option<CompletedGesture> {
        match event.kind {
            PointerKind::Down => {
                self.open.retain(|_, (handle, _)| *handle != event.handle);
                self.open
                    .insert(event.capture, (event.handle, event.position));
                None
            }
            PointerKind::Up => {
                let (handle, down) = self.open.remove(&event.capture)?;
                Some(CompletedGesture {
                    handle,
                    down,
                    up: event.position,
                })
            }
        }
    }

    pub fn open_captures(&self) -> usize {
        self.open.len()
    }

    /// Drop one open capture without completing it
    pub fn cancel(&mut self, capture: CaptureToken) -> bool {
        self.open.remove(&capture).is_some()
    }

    pub fn clear(&mut self) {
        self.open.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(dx: f64, dy: f64) -> Option<SwipeDirection> {
        GestureClassifier::new(30.0).classify(
            Point::new(100.0, 100.0),
            Point::new(100.0 + dx, 100.0 + dy),
        )
    }

    #[test]
    fn test_right_swipe() {
        assert_eq!(classify(40.0, 5.0), Some(SwipeDirection::Right));
    }

    #[test]
    fn test_left_swipe() {
        assert_eq!(classify(-45.0, -10.0), Some(SwipeDirection::Left));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(classify(30.0, 0.0), Some(SwipeDirection::Right));
        assert_eq!(classify(29.9, 0.0), None);
    }

    #[test]
    fn test_vertical_primary_axis_is_ignored() {
        assert_eq!(classify(40.0, 41.0), None);
        assert_eq!(classify(-40.0, -80.0), None);
    }

    #[test]
    fn test_diagonal_tie_counts_as_horizontal() {
        assert_eq!(classify(40.0, 40.0), Some(SwipeDirection::Right));
    }

    #[test]
    fn test_non_finite_coordinates_are_no_gesture() {
        let classifier = GestureClassifier::new(30.0);
        assert_eq!(
            classifier.classify(Point::new(f64::NAN, 0.0), Point::new(50.0, 0.0)),
            None
        );
        assert_eq!(
            classifier.classify(Point::new(0.0, 0.0), Point::new(f64::INFINITY, 0.0)),
            None
        );
    }

    #[test]
    fn test_tracker_pairs_down_and_up_by_token() {
        let mut tracker = PointerTracker::new();
        let token = CaptureToken(1);

        assert_eq!(
            tracker.on_event(&PointerEvent::down(VisualHandle(3), 10.0, 10.0, token)),
            None
        );
        assert_eq!(tracker.open_captures(), 1);

        // the up lands elsewhere but stays bound to the captured visual
        let done = tracker
            .on_event(&PointerEvent::up(VisualHandle(9), 60.0, 12.0, token))
            .unwrap();
        assert_eq!(done.handle, VisualHandle(3));
        assert_eq!(done.down, Point::new(10.0, 10.0));
        assert_eq!(done.up, Point::new(60.0, 12.0));
        assert_eq!(tracker.open_captures(), 0);
    }

    #[test]
    fn test_tracker_drops_unmatched_up() {
        let mut tracker = PointerTracker::new();
        assert_eq!(
            tracker.on_event(&PointerEvent::up(VisualHandle(1), 0.0, 0.0, CaptureToken(5))),
            None
        );
    }

    #[test]
    fn test_tracker_repress_replaces_capture_on_same_visual() {
        let mut tracker = PointerTracker::new();
        tracker.on_event(&PointerEvent::down(VisualHandle(1), 0.0, 0.0, CaptureToken(1)));
        tracker.on_event(&PointerEvent::down(VisualHandle(1), 20.0, 0.0, CaptureToken(2)));
        assert_eq!(tracker.open_captures(), 1);

        assert_eq!(
            tracker.on_event(&PointerEvent::up(VisualHandle(1), 90.0, 0.0, CaptureToken(1))),
            None
        );
        let done = tracker
            .on_event(&PointerEvent::up(VisualHandle(1), 90.0, 0.0, CaptureToken(2)))
            .unwrap();
        assert_eq!(done.down, Point::new(20.0, 0.0));
        assert_eq!(tracker.open_captures(), 0);
    }

    #[test]
    fn test_tracker_cancel_drops_one_capture() {
        let mut tracker = PointerTracker::new();
        tracker.on_event(&PointerEvent::down(VisualHandle(1), 0.0, 0.0, CaptureToken(1)));
        tracker.on_event(&PointerEvent::down(VisualHandle(2), 0.0, 0.0, CaptureToken(2)));

        assert!(tracker.cancel(CaptureToken(1)));
        assert!(!tracker.cancel(CaptureToken(1)));
        assert_eq!(tracker.open_captures(), 1);
    }

    #[test]
    fn test_tracker_keeps_tokens_apart() {
        let mut tracker = PointerTracker::new();
        tracker.on_event(&PointerEvent::down(VisualHandle(1), 0.0, 0.0, CaptureToken(1)));
        tracker.on_event(&PointerEvent::down(VisualHandle(2), 5.0, 0.0, CaptureToken(2)));

        let second = tracker
            .on_event(&PointerEvent::up(VisualHandle(2), 50.0, 0.0, CaptureToken(2)))
            .unwrap();
        assert_eq!(second.handle, VisualHandle(2));
        assert_eq!(tracker.open_captures(), 1);
    }
}
