use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// Backend-assigned identifier for a device format.
///
/// Opaque to the core: it is handed back to the device when the format is
/// applied and never interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatHandle(pub u64);

/// A closed range of frame rates a format can run at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRateRange {
    pub min_frame_rate: f64,
    pub max_frame_rate: f64,
}

impl FrameRateRange {
    pub fn new(min_frame_rate: f64, max_frame_rate: f64) -> Self {
        Self {
            min_frame_rate,
            max_frame_rate,
        }
    }

    /// Whether the range can reach `fps`. The lower bound is deliberately
    /// ignored: the device is pinned to an exact duration afterwards.
    pub fn reaches(&self, fps: u32) -> bool {
        self.max_frame_rate >= f64::from(fps)
    }
}

/// A capture format advertised by a camera device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureDeviceFormat {
    pub handle: FormatHandle,
    pub width: i32,
    pub height: i32,
    pub frame_rate_ranges: Vec<FrameRateRange>,
}

impl CaptureDeviceFormat {
    pub fn covers(&self, min_width: i32, min_height: i32) -> bool {
        self.width >= min_width && self.height >= min_height
    }

    /// Highest frame rate any of this format's ranges reaches.
    pub fn max_frame_rate(&self) -> f64 {
        self.frame_rate_ranges
            .iter()
            .map(|r| r.max_frame_rate)
            .fold(0.0, f64::max)
    }
}

impl fmt::Display for CaptureDeviceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} @ max {:.0} fps (#{})",
            self.width,
            self.height,
            self.max_frame_rate(),
            self.handle.0
        )
    }
}

/// Rational frame duration, `value / timescale` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameDuration {
    pub value: i64,
    pub timescale: i32,
}

impl FrameDuration {
    /// `1/fps` seconds.
    pub fn per_frame(fps: u32) -> Result<Self, CaptureError> {
        let timescale = i32::try_from(fps)
            .ok()
            .filter(|t| *t > 0)
            .ok_or_else(|| CaptureError::InvalidArguments(format!("invalid fps: {}", fps)))?;
        Ok(Self { value: 1, timescale })
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.value as f64 / f64::from(self.timescale)
    }

    /// Frame rate this duration corresponds to.
    pub fn frames_per_second(&self) -> f64 {
        f64::from(self.timescale) / self.value as f64
    }
}
