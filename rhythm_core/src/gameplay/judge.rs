use serde::Serialize;

use crate::chart::LaneId;
use crate::config::{Playfield, SessionConfig, TierThresholds};

use super::lane::Lane;
use super::note::VisualState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Judgment {
    Perfect,
    Great,
    Good,
    /// Press that matched no note. Does not consume the note.
    MissInput,
    /// Note scrolled past the acceptance window unplayed.
    MissTimeout,
}

impl Judgment {
    pub fn is_hit(self) -> bool {
        matches!(self, Judgment::Perfect | Judgment::Great | Judgment::Good)
    }

    pub fn is_miss(self) -> bool {
        !self.is_hit()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JudgmentResult {
    pub lane: LaneId,
    /// Chart index of the note under the input cursor when the judgment was made.
    pub index: usize,
    pub judgment: Judgment,
    /// Compensated audio time minus expected time; negative means early.
    pub delta: f64,
}

/// Timing judgment for all lanes of a session.
#[derive(Debug, Clone)]
pub struct JudgeMachine {
    pub margin_of_error: f64,
    pub input_delay: f64,
    pub cooldown: f64,
    pub lead_time: f64,
    pub playfield: Playfield,
    pub tiers: TierThresholds,
}

impl JudgeMachine {
    pub fn from_config(config: &SessionConfig) -> Self {
        Self {
            margin_of_error: config.margin_of_error,
            input_delay: config.input_delay_seconds(),
            cooldown: config.cooldown,
            lead_time: config.lead_time,
            playfield: config.playfield,
            tiers: config.tiers,
        }
    }

    /// Clock time corrected for input latency.
    pub fn audio_time(&self, clock_time: f64) -> f64 {
        clock_time - self.input_delay
    }

    /// Accuracy tier of an accepted press.
    ///
    /// The tier follows the note's distance from the hit line, which is an affine
    /// function of the timing delta.
    pub fn tier(&self, delta: f64) -> Judgment {
        let offset = self.playfield.offset_for_delta(delta, self.lead_time).abs();
        if offset <= self.tiers.perfect {
            Judgment::Perfect
        } else if offset <= self.tiers.great {
            Judgment::Great
        } else {
            Judgment::Good
        }
    }

    /// Judges a press on `lane` at `clock_time`.
    ///
    /// Returns `None` when nothing happens: the lane is exhausted, or the press missed
    /// while the lane's wrong-input cooldown is still running.
    pub fn press(&self, lane: &mut Lane, clock_time: f64) -> Option<JudgmentResult> {
        let expected = lane.next_expected()?;
        let delta = self.audio_time(clock_time) - expected;

        if delta.abs() < self.margin_of_error {
            let judgment = self.tier(delta);
            let index = lane.consume(VisualState::Hit);
            log::debug!("{}: {:?} on note {} ({:+.3}s)", lane.id(), judgment, index, delta);
            return Some(JudgmentResult {
                lane: lane.id(),
                index,
                judgment,
                delta,
            });
        }

        if lane.in_cooldown() {
            return None;
        }
        lane.start_cooldown(self.cooldown);
        log::debug!(
            "{}: inaccurate press on note {} with {:.3}s delay",
            lane.id(),
            lane.input_cursor(),
            delta.abs()
        );
        Some(JudgmentResult {
            lane: lane.id(),
            index: lane.input_cursor(),
            judgment: Judgment::MissInput,
            delta,
        })
    }

    /// Consumes every note whose acceptance window has fully passed.
    pub fn sweep(&self, lane: &mut Lane, clock_time: f64) -> Vec<JudgmentResult> {
        let audio_time = self.audio_time(clock_time);
        let mut missed = Vec::new();
        while let Some(expected) = lane.next_expected() {
            if expected + self.margin_of_error > audio_time {
                break;
            }
            let index = lane.consume(VisualState::Missed);
            log::debug!("{}: missed note {}", lane.id(), index);
            missed.push(JudgmentResult {
                lane: lane.id(),
                index,
                judgment: Judgment::MissTimeout,
                delta: audio_time - expected,
            });
        }
        missed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Chart;

    fn judge() -> JudgeMachine {
        JudgeMachine::from_config(&SessionConfig::default())
    }

    fn spawned_lane(ts: &[f64]) -> Lane {
        let mut lane = Lane::new(Chart::from_timestamps(LaneId(0), ts.to_vec()).unwrap());
        lane.spawn_due(f64::MAX, 1.0);
        lane
    }

    #[test]
    fn tiers_follow_hit_line_offset() {
        let j = judge();
        // 20 units per second with the default playfield and lead time.
        assert_eq!(j.tier(0.0), Judgment::Perfect);
        assert_eq!(j.tier(0.02), Judgment::Perfect);
        assert_eq!(j.tier(-0.02), Judgment::Perfect);
        assert_eq!(j.tier(0.04), Judgment::Great);
        assert_eq!(j.tier(-0.045), Judgment::Great);
        assert_eq!(j.tier(0.06), Judgment::Good);
        assert_eq!(j.tier(-0.09), Judgment::Good);
    }

    #[test]
    fn press_inside_window_hits_and_advances() {
        let j = judge();
        let mut lane = spawned_lane(&[1.0, 2.0]);

        let result = j.press(&mut lane, 1.02).unwrap();
        assert_eq!(result.judgment, Judgment::Perfect);
        assert_eq!(result.index, 0);
        assert!((result.delta - 0.02).abs() < 1e-9);
        assert_eq!(lane.input_cursor(), 1);
    }

    #[test]
    fn press_outside_window_is_input_miss() {
        let j = judge();
        let mut lane = spawned_lane(&[1.0]);
        let result = j.press(&mut lane, 1.125).unwrap();
        assert_eq!(result.judgment, Judgment::MissInput);
        assert_eq!(lane.input_cursor(), 0);
    }

    #[test]
    fn wrong_press_starts_cooldown_and_keeps_note() {
        let j = judge();
        let mut lane = spawned_lane(&[1.0]);

        let result = j.press(&mut lane, 0.5).unwrap();
        assert_eq!(result.judgment, Judgment::MissInput);
        assert_eq!(result.index, 0);
        assert_eq!(lane.input_cursor(), 0);
        assert_eq!(lane.cooldown_remaining(), 0.5);

        // Still cooling down: swallowed.
        assert!(j.press(&mut lane, 0.6).is_none());

        lane.decay_cooldown(0.5);
        assert_eq!(j.press(&mut lane, 0.7).unwrap().judgment, Judgment::MissInput);
    }

    #[test]
    fn cooldown_does_not_block_hits() {
        let j = judge();
        let mut lane = spawned_lane(&[1.0]);
        j.press(&mut lane, 0.5);
        assert!(lane.in_cooldown());
        assert_eq!(j.press(&mut lane, 1.0).unwrap().judgment, Judgment::Perfect);
    }

    #[test]
    fn input_delay_shifts_audio_time() {
        let mut config = SessionConfig::default();
        config.input_delay_ms = 50;
        let j = JudgeMachine::from_config(&config);
        let mut lane = spawned_lane(&[1.0]);

        let result = j.press(&mut lane, 1.06).unwrap();
        assert_eq!(result.judgment, Judgment::Perfect);
        assert!((result.delta - 0.01).abs() < 1e-9);
    }

    #[test]
    fn press_on_exhausted_lane_is_noop() {
        let j = judge();
        let mut lane = spawned_lane(&[1.0]);
        j.press(&mut lane, 1.0);

        assert!(j.press(&mut lane, 1.5).is_none());
        assert_eq!(lane.input_cursor(), 1);
        assert!(!lane.in_cooldown());
    }

    #[test]
    fn sweep_misses_once_window_closed() {
        let j = judge();
        let mut lane = spawned_lane(&[1.0, 2.0, 3.0]);

        assert!(j.sweep(&mut lane, 1.05).is_empty());
        let missed = j.sweep(&mut lane, 1.11);
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].judgment, Judgment::MissTimeout);
        assert_eq!(missed[0].index, 0);

        // Not reported twice.
        assert!(j.sweep(&mut lane, 1.2).is_empty());

        // A long stall misses several at once, each exactly once.
        let missed = j.sweep(&mut lane, 5.0);
        assert_eq!(missed.iter().map(|r| r.index).collect::<Vec<_>>(), vec![1, 2]);
        assert!(lane.is_exhausted());
    }
}
