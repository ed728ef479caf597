use std::collections::BTreeMap;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use sortline::clock::Millis;
use sortline::gesture::SwipeDirection;
use sortline::item::Category;
use sortline::render::{Renderer, VisualHandle};

pub const CARD_WIDTH: u16 = 8;
pub const CARD_HEIGHT: u16 = 3;

#[derive(Debug, Clone, Copy)]
struct Motion {
    started_at: Millis,
    duration_ms: Millis,
}

#[derive(Debug, Clone, Copy)]
struct Exit {
    direction: SwipeDirection,
    started_at: Millis,
}

#[derive(Debug, Clone)]
struct Visual {
    category: Category,
    motion: Option<Motion>,
    exit: Option<Exit>,
    missed: bool,
}

impl Visual {
    /// Fraction of the conveyor covered; frozen once the card leaves it
    fn travel(&self, now: Millis) -> f64 {
        if self.missed {
            return 1.0;
        }
        let Some(motion) = self.motion else {
            return 0.0;
        };
        let at = self.exit.map_or(now, |e| e.started_at.min(now));
        if motion.duration_ms == 0 {
            return 1.0;
        }
        (at.saturating_sub(motion.started_at) as f64 / motion.duration_ms as f64).clamp(0.0, 1.0)
    }
}

/// A card positioned inside the lane for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedCard {
    pub handle: VisualHandle,
    pub category: Category,
    pub area: Rect,
    pub exiting: bool,
    pub missed: bool,
}

/// Terminal renderer for the conveyor. Cards move from the top of the
/// lane to the bottom over their transit time and slide out sideways
/// when swiped.
#[derive(Debug)]
pub struct Scene {
    next_handle: u64,
    exit_ms: Millis,
    visuals: BTreeMap<VisualHandle, Visual>,
}

impl Scene {
    pub fn new(exit_ms: Millis) -> Self {
        Self {
            next_handle: 0,
            exit_ms,
            visuals: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    /// Cards in spawn order, clipped to `lane`. Cards that have slid fully
    /// out of the lane are skipped.
    pub fn layout(&self, lane: Rect, now: Millis) -> Vec<PlacedCard> {
        let width = CARD_WIDTH.min(lane.width);
        let height = CARD_HEIGHT.min(lane.height);
        let rest_x = lane.x as i32 + (lane.width.saturating_sub(width) / 2) as i32;
        let span_y = lane.height.saturating_sub(height) as f64;

        self.visuals
            .iter()
            .filter_map(|(&handle, visual)| {
                let y = lane.y + (visual.travel(now) * span_y).round() as u16;
                let x = rest_x + self.exit_offset(visual, lane, now);
                let area = clip(lane, x, y, width, height)?;
                Some(PlacedCard {
                    handle,
                    category: visual.category,
                    area,
                    exiting: visual.exit.is_some(),
                    missed: visual.missed,
                })
            })
            .collect()
    }

    /// Topmost live card under a terminal cell
    pub fn hit_test(
        &self,
        lane: Rect,
        column: u16,
        row: u16,
        now: Millis,
    ) -> Option<VisualHandle> {
        self.layout(lane, now)
            .into_iter()
            .rev()
            .filter(|card| !card.exiting && !card.missed)
            .find(|card| {
                column >= card.area.x
                    && column < card.area.right()
                    && row >= card.area.y
                    && row < card.area.bottom()
            })
            .map(|card| card.handle)
    }

    fn exit_offset(&self, visual: &Visual, lane: Rect, now: Millis) -> i32 {
        let Some(exit) = visual.exit else {
            return 0;
        };
        let progress = if self.exit_ms == 0 {
            1.0
        } else {
            (now.saturating_sub(exit.started_at) as f64 / self.exit_ms as f64).min(1.0)
        };
        let distance = (lane.width / 2 + CARD_WIDTH) as f64 * progress;
        match exit.direction {
            SwipeDirection::Left => -(distance.round() as i32),
            SwipeDirection::Right => distance.round() as i32,
        }
    }

    pub fn render(&self, lane: Rect, now: Millis, buf: &mut Buffer) {
        for card in self.layout(lane, now) {
            let (label, color) = match card.category {
                Category::Good => ("OK", Color::Green),
                Category::Bad => ("NG", Color::Red),
            };
            let mut style = Style::default().fg(color).add_modifier(Modifier::BOLD);
            if card.missed {
                style = style.add_modifier(Modifier::REVERSED);
            } else if card.exiting {
                style = style.add_modifier(Modifier::DIM);
            }

            Paragraph::new(Span::styled(label, style))
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded)
                        .border_style(style),
                )
                .render(card.area, buf);
        }
    }
}

impl Renderer for Scene {
    fn spawn_visual(&mut self, category: Category) -> VisualHandle {
        self.next_handle += 1;
        let handle = VisualHandle(self.next_handle);
        self.visuals.insert(
            handle,
            Visual {
                category,
                motion: None,
                exit: None,
                missed: false,
            },
        );
        handle
    }

    fn animate(&mut self, handle: VisualHandle, duration_ms: Millis, now: Millis) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.motion = Some(Motion {
                started_at: now,
                duration_ms,
            });
        }
    }

    fn play_exit_animation(&mut self, handle: VisualHandle, direction: SwipeDirection, now: Millis) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.exit = Some(Exit {
                direction,
                started_at: now,
            });
        }
    }

    fn mark_missed(&mut self, handle: VisualHandle, _now: Millis) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.missed = true;
        }
    }

    fn remove(&mut self, handle: VisualHandle) {
        self.visuals.remove(&handle);
    }
}

fn clip(lane: Rect, x: i32, y: u16, width: u16, height: u16) -> Option<Rect> {
    let left = x.max(lane.x as i32);
    let right = (x + width as i32).min(lane.right() as i32);
    if right <= left || height == 0 {
        return None;
    }
    Some(Rect::new(left as u16, y, (right - left) as u16, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LANE: Rect = Rect {
        x: 10,
        y: 2,
        width: 40,
        height: 23,
    };

    fn spawn(scene: &mut Scene, category: Category, now: Millis) -> VisualHandle {
        let handle = scene.spawn_visual(category);
        scene.animate(handle, 4_000, now);
        handle
    }

    #[test]
    fn test_card_travels_down_the_lane() {
        let mut scene = Scene::new(230);
        spawn(&mut scene, Category::Good, 0);

        let top = scene.layout(LANE, 0)[0].area;
        assert_eq!(top, Rect::new(26, 2, CARD_WIDTH, CARD_HEIGHT));

        let middle = scene.layout(LANE, 2_000)[0].area;
        assert_eq!(middle.y, 12);

        let bottom = scene.layout(LANE, 9_000)[0].area;
        assert_eq!(bottom.bottom(), LANE.bottom());
    }

    #[test]
    fn test_hit_test_finds_card() {
        let mut scene = Scene::new(230);
        let handle = spawn(&mut scene, Category::Bad, 0);

        assert_eq!(scene.hit_test(LANE, 28, 3, 0), Some(handle));
        assert_eq!(scene.hit_test(LANE, 12, 3, 0), None);
        assert_eq!(scene.hit_test(LANE, 28, 20, 0), None);
    }

    #[test]
    fn test_exit_slides_out_and_is_not_hittable() {
        let mut scene = Scene::new(230);
        let handle = spawn(&mut scene, Category::Good, 0);
        scene.play_exit_animation(handle, SwipeDirection::Right, 1_000);

        let frozen_y = scene.layout(LANE, 1_000)[0].area.y;
        let halfway = scene.layout(LANE, 1_115)[0];
        assert!(halfway.exiting);
        assert_eq!(halfway.area.y, frozen_y);
        assert!(halfway.area.x > 26);
        assert_eq!(scene.hit_test(LANE, halfway.area.x, halfway.area.y, 1_115), None);

        // fully outside the lane once the exit completes
        assert!(scene.layout(LANE, 1_230).is_empty());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_left_exit_clips_at_lane_edge() {
        let mut scene = Scene::new(200);
        let handle = spawn(&mut scene, Category::Bad, 0);
        scene.play_exit_animation(handle, SwipeDirection::Left, 0);

        let card = scene.layout(LANE, 150)[0];
        assert_eq!(card.area.x, LANE.x);
        assert!(card.area.width < CARD_WIDTH);
    }

    #[test]
    fn test_missed_card_sits_at_bottom() {
        let mut scene = Scene::new(230);
        let handle = spawn(&mut scene, Category::Good, 0);
        scene.mark_missed(handle, 4_000);

        let card = scene.layout(LANE, 4_000)[0];
        assert!(card.missed);
        assert_eq!(card.area.bottom(), LANE.bottom());
        assert_eq!(scene.hit_test(LANE, 28, card.area.y, 4_000), None);
    }

    #[test]
    fn test_remove_drops_visual() {
        let mut scene = Scene::new(230);
        let handle = spawn(&mut scene, Category::Good, 0);
        scene.remove(handle);
        assert!(scene.is_empty());
        // unknown handles are ignored
        scene.remove(handle);
        scene.animate(handle, 10, 0);
        assert!(scene.layout(LANE, 0).is_empty());
    }

    #[test]
    fn test_render_draws_labels() {
        let mut scene = Scene::new(230);
        spawn(&mut scene, Category::Good, 0);

        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 30));
        scene.render(LANE, 0, &mut buf);
        let content: String = buf.content.iter().map(|c| c.symbol()).collect();
        assert!(content.contains("OK"));
    }

    #[test]
    fn test_tiny_lane_does_not_panic() {
        let mut scene = Scene::new(230);
        spawn(&mut scene, Category::Bad, 0);
        let lane = Rect::new(0, 0, 3, 1);
        let cards = scene.layout(lane, 2_000);
        assert_eq!(cards[0].area, Rect::new(0, 0, 3, 1));
    }
}
