use serde::Serialize;

use super::judge::{Judgment, JudgmentResult};
use super::rank::Rank;

/// Combo at which hits start paying `BASE_POINTS * combo` and the combo indicator shows.
pub const COMBO_BONUS_THRESHOLD: u32 = 5;
pub const BASE_POINTS: u64 = 10;

/// Aggregate result of one play session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreState {
    pub score: u64,
    pub current_combo: u32,
    pub highest_combo: u32,
    /// Hits that landed at or above the bonus threshold.
    pub total_combo: u32,
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
    pub total_notes: u32,
}

impl ScoreState {
    /// Value shown by the combo indicator; hidden (0) below the bonus threshold.
    pub fn combo_display(&self) -> u32 {
        if self.current_combo >= COMBO_BONUS_THRESHOLD {
            self.current_combo
        } else {
            0
        }
    }

    pub fn hits(&self) -> u32 {
        self.perfect + self.great + self.good
    }

    pub fn rank(&self) -> Rank {
        Rank::from_score(self.score)
    }
}

/// Sole writer of a session's [`ScoreState`].
#[derive(Debug, Clone, Default)]
pub struct ScoreAggregator {
    state: ScoreState,
}

impl ScoreAggregator {
    pub fn new(total_notes: u32) -> Self {
        Self {
            state: ScoreState {
                total_notes,
                ..ScoreState::default()
            },
        }
    }

    pub fn state(&self) -> &ScoreState {
        &self.state
    }

    /// Clears everything for a new session.
    pub fn reset(&mut self, total_notes: u32) {
        *self = Self::new(total_notes);
    }

    /// Applies one judgment and returns the points it earned.
    pub fn apply(&mut self, result: &JudgmentResult) -> u64 {
        let s = &mut self.state;
        match result.judgment {
            Judgment::Perfect => s.perfect += 1,
            Judgment::Great => s.great += 1,
            Judgment::Good => s.good += 1,
            Judgment::MissInput | Judgment::MissTimeout => {
                s.miss += 1;
                s.current_combo = 0;
                return 0;
            }
        }

        s.current_combo += 1;
        s.highest_combo = s.highest_combo.max(s.current_combo);

        let points = if s.current_combo >= COMBO_BONUS_THRESHOLD {
            s.total_combo += 1;
            BASE_POINTS * s.current_combo as u64
        } else {
            BASE_POINTS
        };
        s.score += points;
        points
    }

    pub fn summary(&self) -> ResultSummary {
        ResultSummary::from(&self.state)
    }
}

/// Figures shown on the results screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
    pub score: u64,
    pub highest_combo: u32,
    pub total_notes: u32,
    pub rank: Rank,
}

impl From<&ScoreState> for ResultSummary {
    fn from(s: &ScoreState) -> Self {
        Self {
            perfect: s.perfect,
            great: s.great,
            good: s.good,
            miss: s.miss,
            score: s.score,
            highest_combo: s.highest_combo,
            total_notes: s.total_notes,
            rank: s.rank(),
        }
    }
}
