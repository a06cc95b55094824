use serde::{Deserialize, Serialize};

pub type Tick = u64;

/// MIDI default tempo (120 BPM) used when a file carries no tempo event at tick 0.
pub const DEFAULT_MICROS_PER_QUARTER: u32 = 500_000;

/// Decoded note data of a single song, as produced by a MIDI decoder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NoteDump {
    pub meta: DumpMeta,
    #[serde(default)]
    pub tempo_changes: Vec<TempoChange>,
    pub notes: Vec<NoteOn>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DumpMeta {
    pub title: String,
    #[serde(default)]
    pub artist: String,
    pub ticks_per_quarter: u16,
}

/// MIDI "Set Tempo" meta event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TempoChange {
    pub tick: Tick,
    pub micros_per_quarter: u32,
}

impl TempoChange {
    pub fn bpm(&self) -> f64 {
        60_000_000.0 / self.micros_per_quarter as f64
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoteOn {
    pub tick: Tick,
    /// MIDI key number (0-127, 60 = middle C).
    pub key: u8,
    #[serde(default)]
    pub length: Tick,
    #[serde(default)]
    pub channel: u8,
}

impl NoteOn {
    pub fn pitch_class(&self) -> PitchClass {
        PitchClass::of_key(self.key)
    }
}

/// Note name without octave. Lanes select their notes by pitch class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PitchClass {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::CSharp,
        PitchClass::D,
        PitchClass::DSharp,
        PitchClass::E,
        PitchClass::F,
        PitchClass::FSharp,
        PitchClass::G,
        PitchClass::GSharp,
        PitchClass::A,
        PitchClass::ASharp,
        PitchClass::B,
    ];

    pub fn of_key(key: u8) -> Self {
        Self::ALL[(key % 12) as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_class_ignores_octave() {
        assert_eq!(PitchClass::of_key(60), PitchClass::C);
        assert_eq!(PitchClass::of_key(72), PitchClass::C);
        assert_eq!(PitchClass::of_key(61), PitchClass::CSharp);
        assert_eq!(PitchClass::of_key(71), PitchClass::B);
        assert_eq!(PitchClass::of_key(127), PitchClass::G);
    }

    #[test]
    fn note_on_optional_fields_default() {
        let v = serde_json::json!({ "tick": 960, "key": 64 });

        let note: NoteOn = serde_json::from_value(v).unwrap();
        assert_eq!(note.tick, 960);
        assert_eq!(note.length, 0);
        assert_eq!(note.channel, 0);
        assert_eq!(note.pitch_class(), PitchClass::E);
    }

    #[test]
    fn dump_without_tempo_changes_parses() {
        let v = serde_json::json!({
            "meta": { "title": "t", "ticks_per_quarter": 480 },
            "notes": [{ "tick": 0, "key": 60 }]
        });

        let dump: NoteDump = serde_json::from_value(v).unwrap();
        assert!(dump.tempo_changes.is_empty());
        assert_eq!(dump.meta.artist, "");
        assert_eq!(dump.notes.len(), 1);
    }

    #[test]
    fn pitch_class_uses_variant_names() {
        let json = serde_json::to_string(&PitchClass::FSharp).unwrap();
        assert_eq!(json, "\"FSharp\"");
    }

    #[test]
    fn tempo_change_reports_bpm() {
        let t = TempoChange { tick: 0, micros_per_quarter: DEFAULT_MICROS_PER_QUARTER };
        assert!((t.bpm() - 120.0).abs() < 1e-9);
    }
}
