use crate::item::Outcome;

/// Which end-of-session comment applies
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
pub enum CommentTier {
    NoAttempts,
    Top,
    High,
    Mid,
    Baseline,
}

impl CommentTier {
    /// First matching rule wins
    pub fn select(total: u32, accuracy: u32) -> Self {
        if total == 0 {
            CommentTier::NoAttempts
        } else if accuracy >= 90 && total >= 20 {
            CommentTier::Top
        } else if accuracy >= 70 {
            CommentTier::High
        } else if accuracy >= 40 {
            CommentTier::Mid
        } else {
            CommentTier::Baseline
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            CommentTier::NoAttempts => "Let's just say you worked today.",
            CommentTier::Top => "Legendary line-worker level. Thanks for your hard work.",
            CommentTier::High => "A first-rate inspector. See you tomorrow.",
            CommentTier::Mid => "Well... we're short-staffed, so this helps.",
            CommentTier::Baseline => "You showed up today, and that's what counts.",
        }
    }
}

/// End-of-session summary. Derived from the counts, never stored separately.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Summary {
    pub total: u32,
    pub correct: u32,
    pub wrong: u32,
    /// Integer percent, rounded half up
    pub accuracy: u32,
    pub comment: CommentTier,
}

/// Pure summary of a pair of counts
pub fn summarize(correct: u32, wrong: u32) -> Summary {
    let total = correct + wrong;
    let accuracy = accuracy_percent(correct, total);
    Summary {
        total,
        correct,
        wrong,
        accuracy,
        comment: CommentTier::select(total, accuracy),
    }
}

fn accuracy_percent(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    // round(100 * correct / total) in integers
    let (correct, total) = (correct as u64, total as u64);
    ((correct * 200 + total) / (total * 2)) as u32
}

/// Running tally of resolved items
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    correct: u32,
    wrong: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one resolution. A miss counts as wrong.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::CorrectSwipe => self.correct += 1,
            Outcome::WrongSwipe | Outcome::Missed => self.wrong += 1,
            Outcome::Unresolved => {}
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn wrong(&self) -> u32 {
        self.wrong
    }

    pub fn summary(&self) -> Summary {
        summarize(self.correct, self.wrong)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_tier_needs_volume() {
        let s = summarize(18, 2);
        assert_eq!(s.total, 20);
        assert_eq!(s.accuracy, 90);
        assert_eq!(s.comment, CommentTier::Top);

        // same accuracy, too few attempts
        let s = summarize(9, 1);
        assert_eq!(s.accuracy, 90);
        assert_eq!(s.comment, CommentTier::High);
    }

    #[test]
    fn test_no_attempts() {
        let s = summarize(0, 0);
        assert_eq!(s.total, 0);
        assert_eq!(s.accuracy, 0);
        assert_eq!(s.comment, CommentTier::NoAttempts);
    }

    #[test]
    fn test_baseline_falls_through() {
        let s = summarize(5, 10);
        assert_eq!(s.total, 15);
        assert_eq!(s.accuracy, 33);
        assert_eq!(s.comment, CommentTier::Baseline);
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(summarize(7, 3).comment, CommentTier::High);
        assert_eq!(summarize(69, 31).comment, CommentTier::Mid);
        assert_eq!(summarize(2, 3).comment, CommentTier::Mid);
        assert_eq!(summarize(39, 61).comment, CommentTier::Baseline);
        assert_eq!(summarize(0, 4).comment, CommentTier::Baseline);
    }

    #[test]
    fn test_accuracy_rounds_half_up() {
        assert_eq!(summarize(1, 7).accuracy, 13); // 12.5
        assert_eq!(summarize(1, 2).accuracy, 33); // 33.3
        assert_eq!(summarize(2, 1).accuracy, 67); // 66.7
        assert_eq!(summarize(3, 0).accuracy, 100);
    }

    #[test]
    fn test_summary_is_idempotent() {
        let board = ScoreBoard {
            correct: 12,
            wrong: 5,
        };
        assert_eq!(board.summary(), board.summary());
        assert_eq!(board.summary(), summarize(12, 5));
    }

    #[test]
    fn test_scoreboard_records_outcomes() {
        let mut board = ScoreBoard::new();
        board.record(Outcome::CorrectSwipe);
        board.record(Outcome::WrongSwipe);
        board.record(Outcome::Missed);
        board.record(Outcome::Unresolved);

        assert_eq!(board.correct(), 1);
        assert_eq!(board.wrong(), 2);

        board.reset();
        assert_eq!(board, ScoreBoard::new());
    }

    #[test]
    fn test_messages_are_distinct() {
        let tiers = [
            CommentTier::NoAttempts,
            CommentTier::Top,
            CommentTier::High,
            CommentTier::Mid,
            CommentTier::Baseline,
        ];
        for (i, a) in tiers.iter().enumerate() {
            for b in &tiers[i + 1..] {
                assert_ne!(a.message(), b.message());
            }
        }
    }
}
