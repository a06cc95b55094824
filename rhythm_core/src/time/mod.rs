pub mod clock;

pub use self::clock::{AudioClock, ClockSource, ManualClock, Monotonic};
