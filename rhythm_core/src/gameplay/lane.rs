use std::collections::VecDeque;

use crate::chart::{Chart, LaneId};

use super::note::{NoteEvent, VisualState};

/// Runtime state of one input column.
///
/// `spawn_cursor` and `input_cursor` both walk the chart forward and never go back.
/// They move independently: the scheduler advances the first, the judge the second.
#[derive(Debug, Clone)]
pub struct Lane {
    chart: Chart,
    spawn_cursor: usize,
    input_cursor: usize,
    cooldown_remaining: f64,
    active: VecDeque<NoteEvent>,
}

impl Lane {
    pub fn new(chart: Chart) -> Self {
        Self {
            chart,
            spawn_cursor: 0,
            input_cursor: 0,
            cooldown_remaining: 0.0,
            active: VecDeque::new(),
        }
    }

    pub fn id(&self) -> LaneId {
        self.chart.lane_id()
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn spawn_cursor(&self) -> usize {
        self.spawn_cursor
    }

    pub fn input_cursor(&self) -> usize {
        self.input_cursor
    }

    pub fn cooldown_remaining(&self) -> f64 {
        self.cooldown_remaining
    }

    pub fn in_cooldown(&self) -> bool {
        self.cooldown_remaining > 0.0
    }

    /// Notes currently on screen, oldest first.
    pub fn active_notes(&self) -> impl Iterator<Item = &NoteEvent> {
        self.active.iter()
    }

    /// Expected time of the next note to judge.
    pub fn next_expected(&self) -> Option<f64> {
        self.chart.get(self.input_cursor)
    }

    pub fn is_exhausted(&self) -> bool {
        self.input_cursor >= self.chart.len()
    }

    /// Spawns every note whose lead window has opened by `clock_time`.
    pub fn spawn_due(&mut self, clock_time: f64, lead_time: f64) -> Vec<NoteEvent> {
        let mut spawned = Vec::new();
        while let Some(ts) = self.chart.get(self.spawn_cursor) {
            if clock_time < ts - lead_time {
                break;
            }
            let note = NoteEvent::new(self.id(), self.spawn_cursor, ts);
            log::trace!("{}: spawned note {} for {:.3}s", self.id(), self.spawn_cursor, ts);
            self.active.push_back(note);
            spawned.push(note);
            self.spawn_cursor += 1;
        }
        spawned
    }

    /// Marks the note under the input cursor as judged and moves past it.
    ///
    /// A hit note leaves the screen immediately; a missed one keeps travelling until it
    /// expires.
    pub(crate) fn consume(&mut self, outcome: VisualState) -> usize {
        let index = self.input_cursor;
        debug_assert!(index < self.chart.len());
        debug_assert!(index < self.spawn_cursor, "judged note {index} before it spawned");

        if let Some(pos) = self.active.iter().position(|n| n.index == index) {
            match outcome {
                VisualState::Hit => {
                    self.active.remove(pos);
                }
                state => self.active[pos].visual_state = state,
            }
        }
        self.input_cursor += 1;
        index
    }

    pub(crate) fn start_cooldown(&mut self, duration: f64) {
        self.cooldown_remaining = duration;
    }

    pub(crate) fn decay_cooldown(&mut self, elapsed: f64) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - elapsed).max(0.0);
        }
    }

    /// Drops notes that travelled past the end of the lane.
    pub fn expire(&mut self, clock_time: f64, lead_time: f64) -> Vec<NoteEvent> {
        let mut expired = Vec::new();
        self.active.retain(|note| {
            if note.is_expired(clock_time, lead_time) {
                expired.push(*note);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Discards everything on screen without judging it.
    pub(crate) fn clear_active(&mut self) -> usize {
        let n = self.active.len();
        self.active.clear();
        n
    }
}
