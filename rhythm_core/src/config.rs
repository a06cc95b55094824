use std::{collections::HashSet, fs, path::Path};

pub use chart_schema::PitchClass;
use serde::{Deserialize, Serialize};

use crate::chart::LaneId;
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaneConfig {
    pub id: LaneId,
    pub pitch: PitchClass,
}

/// Vertical travel of a note: it appears at `spawn_y`, crosses `tap_y` at its hit
/// time and leaves at the mirror point below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub spawn_y: f64,
    pub tap_y: f64,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            spawn_y: 20.0,
            tap_y: 0.0,
        }
    }
}

impl Playfield {
    pub fn despawn_y(&self) -> f64 {
        self.tap_y - (self.spawn_y - self.tap_y)
    }

    /// Position at normalized progress `t` (0 = spawn, 0.5 = hit line, 1 = despawn).
    pub fn position(&self, t: f64) -> f64 {
        self.spawn_y + (self.despawn_y() - self.spawn_y) * t
    }

    /// Distance from the hit line of a note that is `delta` seconds away from its hit time.
    pub fn offset_for_delta(&self, delta: f64, lead_time: f64) -> f64 {
        delta * (self.spawn_y - self.tap_y).abs() / lead_time
    }
}

/// Offset limits (in playfield units) for the accuracy tiers. Anything beyond `great`
/// that was still accepted is Good.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierThresholds {
    pub perfect: f64,
    pub great: f64,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            perfect: 0.5,
            great: 1.0,
        }
    }
}

/// Per-session constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Half-width of the acceptance window, seconds.
    pub margin_of_error: f64,
    pub input_delay_ms: i32,
    /// Seconds a note is spawned before its hit time.
    pub lead_time: f64,
    /// Wait before playback starts, seconds.
    pub song_delay: f64,
    /// Wrong-input penalty duration, seconds.
    pub cooldown: f64,
    pub playfield: Playfield,
    pub tiers: TierThresholds,
    pub lanes: Vec<LaneConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            margin_of_error: 0.1,
            input_delay_ms: 0,
            lead_time: 1.0,
            song_delay: 0.0,
            cooldown: 0.5,
            playfield: Playfield::default(),
            tiers: TierThresholds::default(),
            lanes: Vec::new(),
        }
    }
}

impl SessionConfig {
    pub fn with_lanes(lanes: Vec<LaneConfig>) -> Self {
        Self {
            lanes,
            ..Self::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|e| {
            CoreError::new("E2006", format!("failed to read config: {e}"))
                .with_path(path.display().to_string())
        })?;
        let config: Self = serde_json::from_str(&src).map_err(|e| {
            CoreError::new("E2007", format!("failed to parse config json: {e}"))
                .with_path(path.display().to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn input_delay_seconds(&self) -> f64 {
        self.input_delay_ms as f64 / 1000.0
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.lanes.is_empty() {
            return Err(CoreError::new("E2001", "at least one lane is required"));
        }
        let mut seen = HashSet::new();
        for lane in &self.lanes {
            if !seen.insert(lane.id) {
                return Err(CoreError::new("E2002", format!("duplicate {}", lane.id)).with_lane(lane.id));
            }
        }

        let invalid = |message: String| -> Result<(), CoreError> { Err(CoreError::new("E2005", message)) };
        if !(self.margin_of_error > 0.0) {
            return invalid(format!("margin_of_error must be > 0 (got {})", self.margin_of_error));
        }
        if !(self.lead_time > 0.0) {
            return invalid(format!("lead_time must be > 0 (got {})", self.lead_time));
        }
        if self.input_delay_ms < 0 {
            return invalid(format!("input_delay_ms must be >= 0 (got {})", self.input_delay_ms));
        }
        // A note must be on screen from before its window opens until after it closes.
        if self.margin_of_error + self.input_delay_seconds() > self.lead_time {
            return invalid(format!(
                "margin_of_error ({}) plus input delay ({}ms) must not exceed lead_time ({})",
                self.margin_of_error, self.input_delay_ms, self.lead_time
            ));
        }
        if !(self.cooldown >= 0.0) {
            return invalid(format!("cooldown must be >= 0 (got {})", self.cooldown));
        }
        if !(self.song_delay >= 0.0) {
            return invalid(format!("song_delay must be >= 0 (got {})", self.song_delay));
        }
        if !(self.playfield.spawn_y.is_finite() && self.playfield.tap_y.is_finite())
            || self.playfield.spawn_y == self.playfield.tap_y
        {
            return invalid("playfield spawn_y and tap_y must be finite and distinct".to_string());
        }
        if !(self.tiers.perfect > 0.0 && self.tiers.perfect <= self.tiers.great) {
            return invalid(format!(
                "tier thresholds must satisfy 0 < perfect <= great (got {} / {})",
                self.tiers.perfect, self.tiers.great
            ));
        }
        Ok(())
    }
}
