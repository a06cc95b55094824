use std::{fs, io, path::Path};

use chart_schema::NoteDump;

use super::{build_charts, BuildOptions, SongChart};
use crate::{CoreError, SessionConfig};

/// Reads a decoded note dump from disk.
pub fn load_note_dump(path: impl AsRef<Path>) -> Result<NoteDump, CoreError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| {
        let err = if e.kind() == io::ErrorKind::NotFound {
            CoreError::new("E1001", "chart file not found")
        } else {
            CoreError::new("E1002", format!("failed to read chart file: {e}"))
        };
        err.with_path(path.display().to_string())
    })?;
    let dump: NoteDump = serde_json::from_slice(&bytes).map_err(|e| {
        CoreError::new("E1002", format!("failed to parse chart json: {e}"))
            .with_path(path.display().to_string())
    })?;
    log::info!("loaded '{}' from {}", dump.meta.title, path.display());
    Ok(dump)
}

/// Loads a note dump and splits it into the lanes of `config`.
pub fn load_song(
    path: impl AsRef<Path>,
    config: &SessionConfig,
    options: BuildOptions,
) -> Result<SongChart, CoreError> {
    let path = path.as_ref();
    config.validate()?;
    let dump = load_note_dump(path)?;
    build_charts(&dump, &config.lanes, options).map_err(|e| e.with_path(path.display().to_string()))
}
