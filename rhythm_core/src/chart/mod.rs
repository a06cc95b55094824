pub mod load;
pub mod tempo;

use std::fmt;

use chart_schema::NoteDump;
use serde::{Deserialize, Serialize};

use crate::config::LaneConfig;
use crate::CoreError;

pub use self::load::{load_note_dump, load_song};
pub use self::tempo::TempoMap;

/// Identifier of one playable input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LaneId(pub u32);

impl fmt::Display for LaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lane {}", self.0)
    }
}

/// Expected hit times of one lane, in seconds. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Chart {
    lane_id: LaneId,
    timestamps: Vec<f64>,
}

impl Chart {
    /// Builds a chart from already converted timestamps.
    ///
    /// Timestamps must be finite, non-negative and non-decreasing; ties are allowed.
    pub fn from_timestamps(lane_id: LaneId, timestamps: Vec<f64>) -> Result<Self, CoreError> {
        for (i, &t) in timestamps.iter().enumerate() {
            if !t.is_finite() || t < 0.0 {
                return Err(CoreError::new("E2004", format!("invalid timestamp {t}"))
                    .with_lane(lane_id)
                    .with_index(i));
            }
            if i > 0 && t < timestamps[i - 1] {
                return Err(CoreError::new(
                    "E2003",
                    format!("timestamps must be non-decreasing ({} then {t})", timestamps[i - 1]),
                )
                .with_lane(lane_id)
                .with_index(i));
            }
        }
        Ok(Self { lane_id, timestamps })
    }

    pub fn lane_id(&self) -> LaneId {
        self.lane_id
    }

    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.timestamps.get(index).copied()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Treat a lane without matching notes as a load failure instead of an empty chart.
    pub require_notes: bool,
}

/// All lane charts of one song.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongChart {
    pub title: String,
    pub lanes: Vec<Chart>,
    /// Note count of the whole source track, including notes no lane plays.
    pub total_notes: u32,
}

impl SongChart {
    pub fn lane(&self, id: LaneId) -> Option<&Chart> {
        self.lanes.iter().find(|c| c.lane_id == id)
    }

    /// Notes actually playable across all lanes.
    pub fn playable_notes(&self) -> usize {
        self.lanes.iter().map(Chart::len).sum()
    }
}

/// Splits decoded note data into per-lane charts, selecting notes by pitch class.
pub fn build_charts(
    dump: &NoteDump,
    lanes: &[LaneConfig],
    options: BuildOptions,
) -> Result<SongChart, CoreError> {
    let tempo = TempoMap::new(dump.meta.ticks_per_quarter, &dump.tempo_changes)?;

    let mut charts = Vec::with_capacity(lanes.len());
    for lane in lanes {
        let mut ticks: Vec<_> = dump
            .notes
            .iter()
            .filter(|n| n.pitch_class() == lane.pitch)
            .map(|n| n.tick)
            .collect();
        ticks.sort_unstable();

        if ticks.is_empty() {
            if options.require_notes {
                return Err(CoreError::new(
                    "E1004",
                    format!("no notes match pitch {:?}", lane.pitch),
                )
                .with_lane(lane.id));
            }
            log::warn!("{} ({:?}) has no notes in '{}'", lane.id, lane.pitch, dump.meta.title);
        }

        let timestamps = ticks.into_iter().map(|t| tempo.ticks_to_seconds(t)).collect();
        charts.push(Chart::from_timestamps(lane.id, timestamps)?);
    }

    let total_notes = u32::try_from(dump.notes.len())
        .map_err(|_| CoreError::new("E1002", "note count exceeds u32"))?;

    log::info!(
        "built {} lane chart(s) for '{}' ({} playable of {} notes)",
        charts.len(),
        dump.meta.title,
        charts.iter().map(Chart::len).sum::<usize>(),
        total_notes
    );

    Ok(SongChart {
        title: dump.meta.title.clone(),
        lanes: charts,
        total_notes,
    })
}
