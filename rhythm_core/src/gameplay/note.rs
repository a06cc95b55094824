use serde::Serialize;

use crate::chart::LaneId;
use crate::config::Playfield;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VisualState {
    Approaching,
    Hit,
    Missed,
}

/// A spawned note travelling down its lane.
///
/// The host renders it together with its decorative companion; both share this
/// lifetime and only the note itself is ever judged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NoteEvent {
    pub lane: LaneId,
    /// Index into the lane's chart.
    pub index: usize,
    pub assigned_timestamp: f64,
    pub visual_state: VisualState,
}

impl NoteEvent {
    pub fn new(lane: LaneId, index: usize, assigned_timestamp: f64) -> Self {
        Self {
            lane,
            index,
            assigned_timestamp,
            visual_state: VisualState::Approaching,
        }
    }

    /// Normalized travel over a `2 * lead_time` window; 0.5 is the hit line.
    pub fn progress(&self, clock_time: f64, lead_time: f64) -> f64 {
        (clock_time - (self.assigned_timestamp - lead_time)) / (2.0 * lead_time)
    }

    pub fn position(&self, clock_time: f64, lead_time: f64, playfield: &Playfield) -> f64 {
        playfield.position(self.progress(clock_time, lead_time))
    }

    pub fn is_expired(&self, clock_time: f64, lead_time: f64) -> bool {
        self.progress(clock_time, lead_time) > 1.0
    }
}
