//! Scenario documents
//!
//! A scenario is a JSON document holding either a timeline or a diagram:
//!
//! ```json
//! {"kind": "timeline", "steps": [ ... ]}
//! {"kind": "diagram", "blocks": [ ... ], "functions": [ ... ]}
//! ```
//!
//! Only data-model constraints are checked here (positive durations). Block
//! graphs are taken as given.

use crate::model::{DiagramBlock, FunctionDefinition, TimelineStep};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while reading a scenario document
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),

    #[error("step '{id}' (#{index}) has a zero duration")]
    ZeroDuration { index: usize, id: String },
}

/// A replayable input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Scenario {
    Timeline {
        steps: Vec<TimelineStep>,
    },
    Diagram {
        blocks: Vec<DiagramBlock>,
        #[serde(default)]
        functions: Vec<FunctionDefinition>,
    },
}

impl Scenario {
    pub fn from_json(text: &str) -> Result<Self, LoadError> {
        let scenario: Scenario = serde_json::from_str(text)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), LoadError> {
        if let Scenario::Timeline { steps } = self {
            if let Some((index, step)) = steps.iter().enumerate().find(|(_, s)| s.duration == 0) {
                return Err(LoadError::ZeroDuration {
                    index,
                    id: step.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Number of steps the scenario replays
    pub fn len(&self) -> usize {
        match self {
            Scenario::Timeline { steps } => steps.len(),
            Scenario::Diagram { blocks, .. } => blocks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Scenario::Timeline { .. } => "timeline",
            Scenario::Diagram { .. } => "diagram",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockType;

    #[test]
    fn test_load_timeline() {
        let scenario = Scenario::from_json(
            r#"{"kind": "timeline", "steps": [
                {"id": "a", "name": "start", "duration": 1000, "frames": []},
                {"id": "b", "name": "call", "duration": 800}
            ]}"#,
        )
        .unwrap();
        assert_eq!(scenario.kind(), "timeline");
        assert_eq!(scenario.len(), 2);
    }

    #[test]
    fn test_load_diagram_without_functions() {
        let scenario = Scenario::from_json(
            r#"{"kind": "diagram", "blocks": [
                {"index": 0, "blockType": "start", "content": "begin"},
                {"index": 1, "blockType": "end", "content": "done"}
            ]}"#,
        )
        .unwrap();
        match scenario {
            Scenario::Diagram { blocks, functions } => {
                assert_eq!(blocks[1].block_type, BlockType::End);
                assert!(functions.is_empty());
            }
            other => panic!("expected diagram, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_duration_rejected() {
        let err = Scenario::from_json(
            r#"{"kind": "timeline", "steps": [{"id": "z", "name": "zero", "duration": 0}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::ZeroDuration { index: 0, .. }));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        assert!(matches!(
            Scenario::from_json(r#"{"kind": "movie"}"#),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Scenario::from_path(Path::new("/nonexistent/scenario.json")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
