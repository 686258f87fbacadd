use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::CaptureError;
use super::format::FrameDuration;

/// Resolution tier requested by the caller.
///
/// Only two tiers are recognised. Unknown labels fall back to 720p.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResolutionTier {
    #[default]
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    Hd1080,
}

impl ResolutionTier {
    /// Parse a tier label. Anything other than `"1080p"` is 720p.
    pub fn from_label(label: &str) -> Self {
        match label {
            "1080p" => Self::Hd1080,
            _ => Self::Hd720,
        }
    }

    /// Minimum `(width, height)` a format must reach for this tier.
    pub fn min_dimensions(self) -> (i32, i32) {
        match self {
            Self::Hd720 => (1280, 720),
            Self::Hd1080 => (1920, 1080),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Hd720 => "720p",
            Self::Hd1080 => "1080p",
        }
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A caller's capture request: frame rate plus resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureTarget {
    pub fps: u32,
    pub resolution: ResolutionTier,
}

impl CaptureTarget {
    pub fn new(fps: u32, resolution: ResolutionTier) -> Self {
        Self { fps, resolution }
    }

    pub fn min_width(&self) -> i32 {
        self.resolution.min_dimensions().0
    }

    pub fn min_height(&self) -> i32 {
        self.resolution.min_dimensions().1
    }

    /// Argument checks that must pass before any hardware is touched.
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.fps == 0 {
            return Err(CaptureError::InvalidArguments("fps must be positive".into()));
        }
        if i32::try_from(self.fps).is_err() {
            return Err(CaptureError::InvalidArguments(format!(
                "fps out of range: {}",
                self.fps
            )));
        }
        Ok(())
    }

    /// Duration each frame is pinned to: exactly `1/fps` seconds.
    pub fn frame_duration(&self) -> Result<FrameDuration, CaptureError> {
        self.validate()?;
        FrameDuration::per_frame(self.fps)
    }
}
