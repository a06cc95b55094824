use thiserror::Error;

use crate::chart::LaneId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoreErrorKind {
    /// Song data could not be loaded; fatal to starting a session.
    ChartLoad,
    /// Session setup or chart contents violate an ingestion invariant.
    Configuration,
}

impl CoreErrorKind {
    pub(crate) fn from_code(code: &'static str) -> Self {
        match code {
            // ChartLoad
            "E1001" | "E1002" | "E1003" | "E1004" => Self::ChartLoad,

            // Configuration
            "E2001" | "E2002" | "E2003" | "E2004" | "E2005" | "E2006" | "E2007" | "E2008" => {
                Self::Configuration
            }

            _ => Self::Configuration,
        }
    }
}

#[derive(Debug, Error, Clone)]
#[error("{code}: {message}")]
pub struct CoreError {
    pub code: &'static str,
    pub kind: CoreErrorKind,
    pub message: String,

    pub lane: Option<LaneId>,
    pub index: Option<usize>,
    pub path: Option<String>,
}

impl CoreError {
    pub(crate) fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            kind: CoreErrorKind::from_code(code),
            message: message.into(),

            lane: None,
            index: None,
            path: None,
        }
    }

    pub fn with_lane(mut self, lane: LaneId) -> Self {
        self.lane = Some(lane);
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn is_chart_load(&self) -> bool {
        self.kind == CoreErrorKind::ChartLoad
    }

    pub fn is_configuration(&self) -> bool {
        self.kind == CoreErrorKind::Configuration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_to_kinds() {
        assert_eq!(CoreErrorKind::from_code("E1001"), CoreErrorKind::ChartLoad);
        assert_eq!(CoreErrorKind::from_code("E1004"), CoreErrorKind::ChartLoad);
        assert_eq!(CoreErrorKind::from_code("E2001"), CoreErrorKind::Configuration);
        assert_eq!(CoreErrorKind::from_code("E2005"), CoreErrorKind::Configuration);
    }

    #[test]
    fn display_is_code_and_message() {
        let err = CoreError::new("E2003", "timestamps must be non-decreasing")
            .with_lane(LaneId(2))
            .with_index(7);
        assert_eq!(err.to_string(), "E2003: timestamps must be non-decreasing");
        assert_eq!(err.lane, Some(LaneId(2)));
        assert_eq!(err.index, Some(7));
        assert!(err.is_configuration());
    }
}
