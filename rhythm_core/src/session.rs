use crossbeam_channel::Sender;
use serde::Serialize;

use crate::chart::{LaneId, SongChart};
use crate::config::SessionConfig;
use crate::gameplay::{
    JudgeMachine, JudgmentResult, Lane, NoteEvent, ResultSummary, ScoreAggregator, ScoreState,
};
use crate::input::events::InputEvent;
use crate::time::ClockSource;
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SessionEvent {
    NoteSpawned(NoteEvent),
    Judged(JudgmentResult),
    /// A note left the screen. Hit notes leave immediately and are not reported here.
    NoteDespawned(NoteEvent),
}

/// Receiver of everything the presentation layer needs to draw and play feedback.
pub trait EventSink {
    fn emit(&mut self, event: SessionEvent);
}

impl EventSink for Vec<SessionEvent> {
    fn emit(&mut self, event: SessionEvent) {
        self.push(event);
    }
}

/// Forwards events to another thread.
///
/// Once the receiving side is gone, events are dropped; the first drop is logged.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: Sender<SessionEvent>,
    disconnected: bool,
}

impl ChannelSink {
    pub fn new(sender: Sender<SessionEvent>) -> Self {
        Self {
            sender,
            disconnected: false,
        }
    }

    pub fn is_disconnected(&self) -> bool {
        self.disconnected
    }
}

impl From<Sender<SessionEvent>> for ChannelSink {
    fn from(sender: Sender<SessionEvent>) -> Self {
        Self::new(sender)
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: SessionEvent) {
        if self.sender.send(event).is_err() && !self.disconnected {
            self.disconnected = true;
            log::warn!("event receiver disconnected; dropping session events");
        }
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: SessionEvent) {
        (**self).emit(event);
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: SessionEvent) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Waiting out the song delay; input is ignored.
    Countdown { remaining: f64 },
    Playing,
    Ended,
}

/// What one tick did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub time: f64,
    pub spawned: usize,
    pub judgments: Vec<JudgmentResult>,
}

/// One play-through of a song.
pub struct Session<C, S> {
    title: String,
    config: SessionConfig,
    judge: JudgeMachine,
    lanes: Vec<Lane>,
    score: ScoreAggregator,
    clock: C,
    sink: S,
    phase: Phase,
    last_time: Option<f64>,
}

impl<C: ClockSource, S: EventSink> Session<C, S> {
    pub fn new(song: SongChart, config: SessionConfig, clock: C, sink: S) -> Result<Self, CoreError> {
        config.validate()?;

        let mut charts = song.lanes;
        let mut lanes = Vec::with_capacity(config.lanes.len());
        for lane_config in &config.lanes {
            let pos = charts
                .iter()
                .position(|c| c.lane_id() == lane_config.id)
                .ok_or_else(|| CoreError::new("E2008", "no chart for lane").with_lane(lane_config.id))?;
            lanes.push(Lane::new(charts.swap_remove(pos)));
        }

        let phase = if config.song_delay > 0.0 {
            Phase::Countdown { remaining: config.song_delay }
        } else {
            Phase::Playing
        };
        log::info!("session '{}' ready with {} lane(s)", song.title, lanes.len());

        Ok(Self {
            title: song.title,
            judge: JudgeMachine::from_config(&config),
            config,
            lanes,
            score: ScoreAggregator::new(song.total_notes),
            clock,
            sink,
            phase,
            last_time: None,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane(&self, id: LaneId) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.id() == id)
    }

    pub fn score(&self) -> &ScoreState {
        self.score.state()
    }

    pub fn summary(&self) -> ResultSummary {
        self.score.summary()
    }

    /// Every note of every lane has been judged.
    pub fn is_complete(&self) -> bool {
        self.lanes.iter().all(Lane::is_exhausted)
    }

    /// Counts down the song delay by `host_elapsed` seconds of wall time.
    ///
    /// Returns true exactly once, when the delay runs out and the host should start
    /// audio playback.
    pub fn advance_countdown(&mut self, host_elapsed: f64) -> bool {
        let Phase::Countdown { remaining } = self.phase else {
            return false;
        };
        let remaining = remaining - host_elapsed;
        if remaining > 0.0 {
            self.phase = Phase::Countdown { remaining };
            return false;
        }
        self.start();
        true
    }

    /// Skips whatever is left of the countdown.
    pub fn start(&mut self) {
        if let Phase::Countdown { .. } = self.phase {
            self.phase = Phase::Playing;
            log::info!("session '{}' started", self.title);
        }
    }

    /// Stops scheduling and judgment. Notes still on screen are dropped unjudged.
    pub fn end(&mut self) {
        if self.phase == Phase::Ended {
            return;
        }
        self.phase = Phase::Ended;
        let dropped: usize = self.lanes.iter_mut().map(Lane::clear_active).sum();
        let s = self.score.state();
        log::info!(
            "session '{}' ended: score {} ({}), {} note(s) dropped",
            self.title,
            s.score,
            s.rank(),
            dropped
        );
    }

    /// Advances the session to the current clock time.
    ///
    /// Order within a tick: cooldown decay, spawns, `inputs` in arrival order, timeout
    /// sweep, expiry. Each press samples the clock when it is processed.
    pub fn tick<I>(&mut self, inputs: I) -> TickReport
    where
        I: IntoIterator<Item = InputEvent>,
    {
        let now = self.clock.now();
        if self.phase != Phase::Playing {
            let ignored = inputs.into_iter().count();
            if ignored > 0 {
                log::trace!("ignored {ignored} input(s) outside play");
            }
            return TickReport { time: now, ..TickReport::default() };
        }

        let elapsed = self.last_time.map_or(0.0, |last| (now - last).max(0.0));
        self.last_time = Some(now);

        let lead_time = self.config.lead_time;
        let mut report = TickReport { time: now, ..TickReport::default() };

        for lane in &mut self.lanes {
            lane.decay_cooldown(elapsed);
        }

        for lane in &mut self.lanes {
            for note in lane.spawn_due(now, lead_time) {
                self.sink.emit(SessionEvent::NoteSpawned(note));
                report.spawned += 1;
            }
        }

        for event in inputs {
            let Some(lane) = self.lanes.iter_mut().find(|l| l.id() == event.lane) else {
                log::warn!("input for unknown {}", event.lane);
                continue;
            };
            if !event.pressed {
                continue;
            }
            let at = self.clock.now();
            for note in lane.spawn_due(at, lead_time) {
                self.sink.emit(SessionEvent::NoteSpawned(note));
                report.spawned += 1;
            }
            if let Some(result) = self.judge.press(lane, at) {
                report.judgments.push(result);
            }
        }

        for lane in &mut self.lanes {
            report.judgments.extend(self.judge.sweep(lane, now));
            for note in lane.expire(now, lead_time) {
                self.sink.emit(SessionEvent::NoteDespawned(note));
            }
        }

        for result in &report.judgments {
            self.score.apply(result);
            self.sink.emit(SessionEvent::Judged(*result));
        }

        report
    }
}
