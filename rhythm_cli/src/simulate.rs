use std::{fs, path::Path};

use anyhow::{bail, Context};
use rhythm_core::chart::{LaneId, SongChart};
use rhythm_core::gameplay::ResultSummary;
use rhythm_core::input::events::InputEvent;
use rhythm_core::input::InputQueue;
use rhythm_core::session::{NullSink, Phase, Session};
use rhythm_core::time::ManualClock;
use rhythm_core::SessionConfig;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ScriptedInput {
    /// Song time in seconds.
    pub time: f64,
    pub lane: LaneId,
    #[serde(default = "default_pressed")]
    pub pressed: bool,
}

fn default_pressed() -> bool {
    true
}

pub fn load_inputs(path: &Path) -> anyhow::Result<Vec<ScriptedInput>> {
    let src = fs::read_to_string(path)
        .with_context(|| format!("failed to read inputs: {}", path.display()))?;
    let mut inputs: Vec<ScriptedInput> = serde_json::from_str(&src)
        .with_context(|| format!("failed to parse inputs json: {}", path.display()))?;
    inputs.sort_by(|a, b| a.time.total_cmp(&b.time));
    log::info!("loaded {} scripted input(s) from {}", inputs.len(), path.display());
    Ok(inputs)
}

/// Plays `song` with a fixed tick step. Each scripted input is applied on the first
/// tick at or after its time.
pub fn run_simulation(
    song: SongChart,
    config: SessionConfig,
    inputs: &[ScriptedInput],
    step: f64,
) -> anyhow::Result<ResultSummary> {
    if !(step.is_finite() && step > 0.0) {
        bail!("tick must be a finite number > 0 (got {step})");
    }

    let title = song.title.clone();
    let playable = song.playable_notes();
    let clock = ManualClock::new(0.0);
    let mut session = Session::new(song, config, clock.clone(), NullSink)?;

    println!("Simulation Start: '{}' ({} notes, {} lanes)", title, playable, session.lanes().len());

    let mut countdown_ticks = 0u64;
    while matches!(session.phase(), Phase::Countdown { .. }) {
        session.advance_countdown(step);
        countdown_ticks += 1;
    }
    if countdown_ticks > 0 {
        println!("Countdown: {:.3}s", countdown_ticks as f64 * step);
    }

    println!("Time(s)  | Lane | Judgment    | Delta(ms)");
    println!("---------|------|-------------|----------");

    let queue = InputQueue::new();
    let mut pending = inputs.iter().peekable();
    let mut tick = 0u64;
    while !session.is_complete() {
        let now = tick as f64 * step;
        clock.set(now);

        while let Some(input) = pending.next_if(|i| i.time <= now) {
            queue.push(InputEvent {
                lane: input.lane,
                pressed: input.pressed,
            });
        }

        let report = session.tick(queue.drain());
        for r in &report.judgments {
            println!(
                "{:8.3} | {:4} | {:11} | {:+9.1}",
                report.time,
                r.lane.0,
                format!("{:?}", r.judgment),
                r.delta * 1000.0
            );
        }
        tick += 1;
    }
    session.end();

    let summary = session.summary();
    println!(
        "Result: score={} rank={} perfect={} great={} good={} miss={} highest_combo={} total_notes={}",
        summary.score,
        summary.rank,
        summary.perfect,
        summary.great,
        summary.good,
        summary.miss,
        summary.highest_combo,
        summary.total_notes
    );
    Ok(summary)
}
