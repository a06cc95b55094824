use chart_schema::{TempoChange, Tick, DEFAULT_MICROS_PER_QUARTER};

use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Segment {
    tick: Tick,
    micros_per_quarter: u32,
    start_seconds: f64,
}

impl Segment {
    // Multiply before dividing so whole-beat positions come out exact.
    fn seconds_for(&self, ticks: f64, ticks_per_quarter: u16) -> f64 {
        ticks * self.micros_per_quarter as f64 / (ticks_per_quarter as f64 * 1_000_000.0)
    }

    fn ticks_for(&self, seconds: f64, ticks_per_quarter: u16) -> f64 {
        seconds * ticks_per_quarter as f64 * 1_000_000.0 / self.micros_per_quarter as f64
    }
}

/// Piecewise-constant tempo map converting MIDI ticks to seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TempoMap {
    ticks_per_quarter: u16,
    segments: Vec<Segment>,
}

impl TempoMap {
    pub fn new(ticks_per_quarter: u16, changes: &[TempoChange]) -> Result<Self, CoreError> {
        if ticks_per_quarter == 0 {
            return Err(CoreError::new("E1003", "ticks_per_quarter must be > 0"));
        }

        let mut sorted = changes.to_vec();
        // Stable sort keeps file order for equal ticks, so the last one wins below.
        sorted.sort_by_key(|c| c.tick);

        let mut segments: Vec<Segment> = Vec::with_capacity(sorted.len() + 1);
        if sorted.first().map_or(true, |c| c.tick > 0) {
            segments.push(Segment {
                tick: 0,
                micros_per_quarter: DEFAULT_MICROS_PER_QUARTER,
                start_seconds: 0.0,
            });
        }

        for change in sorted {
            if change.micros_per_quarter == 0 {
                return Err(CoreError::new(
                    "E1003",
                    format!("tempo change at tick {} has zero micros_per_quarter", change.tick),
                ));
            }
            match segments.last_mut() {
                Some(last) if last.tick == change.tick => {
                    last.micros_per_quarter = change.micros_per_quarter;
                }
                Some(last) => {
                    let start_seconds = last.start_seconds
                        + last.seconds_for((change.tick - last.tick) as f64, ticks_per_quarter);
                    segments.push(Segment {
                        tick: change.tick,
                        micros_per_quarter: change.micros_per_quarter,
                        start_seconds,
                    });
                }
                None => segments.push(Segment {
                    tick: change.tick,
                    micros_per_quarter: change.micros_per_quarter,
                    start_seconds: 0.0,
                }),
            }
        }

        Ok(Self { ticks_per_quarter, segments })
    }

    /// Constant-tempo map.
    pub fn constant(ticks_per_quarter: u16, micros_per_quarter: u32) -> Result<Self, CoreError> {
        Self::new(ticks_per_quarter, &[TempoChange { tick: 0, micros_per_quarter }])
    }

    pub fn ticks_per_quarter(&self) -> u16 {
        self.ticks_per_quarter
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn ticks_to_seconds(&self, tick: Tick) -> f64 {
        let idx = self.segments.partition_point(|s| s.tick <= tick).saturating_sub(1);
        let seg = &self.segments[idx];
        seg.start_seconds + seg.seconds_for((tick - seg.tick) as f64, self.ticks_per_quarter)
    }

    /// Inverse of [`ticks_to_seconds`](Self::ticks_to_seconds); fractional ticks are kept.
    pub fn seconds_to_ticks(&self, seconds: f64) -> f64 {
        let idx = self
            .segments
            .partition_point(|s| s.start_seconds <= seconds)
            .saturating_sub(1);
        let seg = &self.segments[idx];
        seg.tick as f64 + seg.ticks_for(seconds - seg.start_seconds, self.ticks_per_quarter)
    }
}
