use std::fmt;

use serde::Serialize;

/// End-of-song letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rank {
    F,
    E,
    D,
    C,
    B,
    A,
    S,
}

impl Rank {
    /// Minimum score of each rank above F, best first.
    const THRESHOLDS: [(u64, Rank); 6] = [
        (70_000, Rank::S),
        (60_000, Rank::A),
        (50_000, Rank::B),
        (40_000, Rank::C),
        (30_000, Rank::D),
        (20_000, Rank::E),
    ];

    pub fn from_score(score: u64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map_or(Rank::F, |&(_, rank)| rank)
    }

    pub fn letter(self) -> char {
        match self {
            Rank::F => 'F',
            Rank::E => 'E',
            Rank::D => 'D',
            Rank::C => 'C',
            Rank::B => 'B',
            Rank::A => 'A',
            Rank::S => 'S',
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}
