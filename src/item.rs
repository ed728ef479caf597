use crate::clock::Millis;
use crate::gesture::SwipeDirection;
use crate::render::VisualHandle;
use crate::timers::TimerId;

pub type ItemId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum_macros::Display)]
pub enum Category {
    Good,
    Bad,
}

impl Category {
    /// The only swipe that sorts this category correctly
    pub fn expected_direction(self) -> SwipeDirection {
        match self {
            Category::Good => SwipeDirection::Right,
            Category::Bad => SwipeDirection::Left,
        }
    }
}

/// Final result of an item. `Unresolved` until exactly one resolution path wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum Outcome {
    Unresolved,
    CorrectSwipe,
    WrongSwipe,
    Missed,
}

impl Outcome {
    pub fn for_swipe(category: Category, direction: SwipeDirection) -> Self {
        if category.expected_direction() == direction {
            Outcome::CorrectSwipe
        } else {
            Outcome::WrongSwipe
        }
    }
}

/// A single sortable entity travelling across the conveyor
#[derive(Clone, Debug)]
pub struct Item {
    id: ItemId,
    category: Category,
    handle: VisualHandle,
    spawned_at: Millis,
    transit_ms: Millis,
    outcome: Outcome,
    transit_timer: Option<TimerId>,
}

impl Item {
    pub fn new(
        id: ItemId,
        category: Category,
        handle: VisualHandle,
        spawned_at: Millis,
        transit_ms: Millis,
    ) -> Self {
        Self {
            id,
            category,
            handle,
            spawned_at,
            transit_ms,
            outcome: Outcome::Unresolved,
            transit_timer: None,
        }
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn handle(&self) -> VisualHandle {
        self.handle
    }

    pub fn spawned_at(&self) -> Millis {
        self.spawned_at
    }

    /// When the item's own transit timer fires
    pub fn expires_at(&self) -> Millis {
        self.spawned_at.saturating_add(self.transit_ms)
    }

    pub fn attach_transit_timer(&mut self, timer: TimerId) {
        self.transit_timer = Some(timer);
    }

    pub fn take_transit_timer(&mut self) -> Option<TimerId> {
        self.transit_timer.take()
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_resolved(&self) -> bool {
        self.outcome != Outcome::Unresolved
    }

    /// Check-and-set of the resolution. Returns false, leaving the item
    /// untouched, when another path already resolved it.
    pub fn try_resolve(&mut self, outcome: Outcome) -> bool {
        debug_assert_ne!(outcome, Outcome::Unresolved);
        if self.is_resolved() || outcome == Outcome::Unresolved {
            return false;
        }
        self.outcome = outcome;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(category: Category) -> Item {
        Item::new(1, category, VisualHandle(7), 1_000, 4_000)
    }

    #[test]
    fn test_expected_direction() {
        assert_eq!(Category::Good.expected_direction(), SwipeDirection::Right);
        assert_eq!(Category::Bad.expected_direction(), SwipeDirection::Left);
    }

    #[test]
    fn test_outcome_for_swipe() {
        assert_eq!(
            Outcome::for_swipe(Category::Good, SwipeDirection::Right),
            Outcome::CorrectSwipe
        );
        assert_eq!(
            Outcome::for_swipe(Category::Good, SwipeDirection::Left),
            Outcome::WrongSwipe
        );
        assert_eq!(
            Outcome::for_swipe(Category::Bad, SwipeDirection::Left),
            Outcome::CorrectSwipe
        );
        assert_eq!(
            Outcome::for_swipe(Category::Bad, SwipeDirection::Right),
            Outcome::WrongSwipe
        );
    }

    #[test]
    fn test_new_item_is_unresolved() {
        let item = item(Category::Good);
        assert!(!item.is_resolved());
        assert_eq!(item.outcome(), Outcome::Unresolved);
        assert_eq!(item.expires_at(), 5_000);
    }

    #[test]
    fn test_first_resolution_wins() {
        let mut item = item(Category::Bad);

        assert!(item.try_resolve(Outcome::Missed));
        assert!(!item.try_resolve(Outcome::CorrectSwipe));
        assert!(!item.try_resolve(Outcome::WrongSwipe));

        assert!(item.is_resolved());
        assert_eq!(item.outcome(), Outcome::Missed);
    }

    #[test]
    fn test_zero_transit_expires_at_spawn() {
        let item = Item::new(1, Category::Good, VisualHandle(1), 10, 0);
        assert_eq!(item.expires_at(), 10);
    }

    #[test]
    fn test_display() {
        assert_eq!(Category::Good.to_string(), "Good");
        assert_eq!(Outcome::Missed.to_string(), "Missed");
    }
}
