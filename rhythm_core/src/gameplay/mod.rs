pub mod judge;
pub mod lane;
pub mod note;
pub mod rank;
pub mod score;

pub use self::judge::{JudgeMachine, Judgment, JudgmentResult};
pub use self::lane::Lane;
pub use self::note::{NoteEvent, VisualState};
pub use self::rank::Rank;
pub use self::score::{ResultSummary, ScoreAggregator, ScoreState};
