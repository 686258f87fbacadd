use std::path::PathBuf;

use serde::Serialize;

/// Recording state machine.
///
/// State transitions:
/// ```text
/// idle ──start──▶ recording ──stop──▶ stopping ──completion──▶ idle
///                     │                                          ▲
///                     └──────── output finished on its own ──────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RecorderState {
    Idle,
    Recording { output_path: PathBuf },
    Stopping { output_path: PathBuf },
}

impl RecorderState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    pub fn is_stopping(&self) -> bool {
        matches!(self, Self::Stopping { .. })
    }

    /// File currently being written, if any.
    pub fn output_path(&self) -> Option<&PathBuf> {
        match self {
            Self::Recording { output_path } | Self::Stopping { output_path } => Some(output_path),
            Self::Idle => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording { .. } => "recording",
            Self::Stopping { .. } => "stopping",
        }
    }
}
