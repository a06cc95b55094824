pub mod chart;
pub mod config;
pub mod error;
pub mod gameplay;
pub mod input;
pub mod session;
pub mod time;

pub use chart::{Chart, LaneId, SongChart};
pub use config::{LaneConfig, SessionConfig};
pub use error::{CoreError, CoreErrorKind};
pub use session::{EventSink, Session, SessionEvent};
