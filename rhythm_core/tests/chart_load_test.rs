use std::fs;

use chart_schema::PitchClass;
use rhythm_core::chart::{build_charts, load_note_dump, load_song, BuildOptions, LaneId, TempoMap};
use rhythm_core::config::{LaneConfig, SessionConfig};

fn config() -> SessionConfig {
    SessionConfig::with_lanes(vec![
        LaneConfig { id: LaneId(0), pitch: PitchClass::C },
        LaneConfig { id: LaneId(1), pitch: PitchClass::E },
    ])
}

const DUMP: &str = r#"{
  "meta": { "title": "Etude", "artist": "A", "ticks_per_quarter": 96 },
  "tempo_changes": [{ "tick": 0, "micros_per_quarter": 600000 }],
  "notes": [
    { "tick": 0, "key": 60, "length": 48 },
    { "tick": 48, "key": 64 },
    { "tick": 96, "key": 72 },
    { "tick": 130, "key": 52 },
    { "tick": 200, "key": 62 }
  ]
}"#;

#[test]
fn load_song_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("etude.json");
    fs::write(&path, DUMP).unwrap();

    let song = load_song(&path, &config(), BuildOptions::default()).unwrap();
    assert_eq!(song.title, "Etude");
    assert_eq!(song.total_notes, 5);

    let c = song.lane(LaneId(0)).unwrap().timestamps();
    assert_eq!(c.len(), 2);
    assert!((c[0] - 0.0).abs() < 1e-12);
    assert!((c[1] - 0.6).abs() < 1e-12);

    let e = song.lane(LaneId(1)).unwrap().timestamps();
    assert_eq!(e.len(), 2);
    assert!((e[0] - 0.3).abs() < 1e-12);
    assert!((e[1] - 130.0 * 0.6 / 96.0).abs() < 1e-12);
}

#[test]
fn missing_file_is_chart_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_note_dump(dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.code, "E1001");
    assert!(err.is_chart_load());
    assert!(err.path.unwrap().ends_with("missing.json"));
}

#[test]
fn malformed_file_is_chart_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, "{ not json").unwrap();

    let err = load_note_dump(&path).unwrap_err();
    assert_eq!(err.code, "E1002");
    assert!(err.is_chart_load());
}

#[test]
fn invalid_config_is_rejected_before_loading() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_song(dir.path().join("missing.json"), &SessionConfig::default(), BuildOptions::default())
        .unwrap_err();
    assert_eq!(err.code, "E2001");
}

#[test]
fn constant_tempo_round_trip_is_exact_within_a_microsecond() {
    let dump: chart_schema::NoteDump = serde_json::from_str(DUMP).unwrap();
    let song = build_charts(&dump, &config().lanes, BuildOptions::default()).unwrap();
    let tempo = TempoMap::new(dump.meta.ticks_per_quarter, &dump.tempo_changes).unwrap();

    for chart in &song.lanes {
        for &t in chart.timestamps() {
            let ticks = tempo.seconds_to_ticks(t);
            let back = tempo.ticks_to_seconds(ticks.round() as u64);
            assert!((back - t).abs() < 1e-6, "{t} -> {ticks} -> {back}");
        }
    }
}
