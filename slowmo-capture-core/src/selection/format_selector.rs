//! First-sufficient capture format selection.
//!
//! Formats are scanned in the device's enumeration order and the first
//! `(format, frame-rate range)` pair that satisfies the request wins. There is
//! no ranking: a device listing several qualifying formats gets whichever it
//! listed first, so callers get a *sufficient* format, not the *best* one.

use crate::models::error::CaptureError;
use crate::models::format::{CaptureDeviceFormat, FrameDuration, FrameRateRange};

/// A format and the frame-rate range within it that reaches the request.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatSelection {
    pub format: CaptureDeviceFormat,
    pub frame_rate_range: FrameRateRange,
    pub fps: u32,
}

impl FormatSelection {
    /// Duration the device should be pinned to, `1/fps`.
    pub fn frame_duration(&self) -> Result<FrameDuration, CaptureError> {
        FrameDuration::per_frame(self.fps)
    }

    pub fn into_pair(self) -> (CaptureDeviceFormat, FrameRateRange) {
        (self.format, self.frame_rate_range)
    }
}

/// Pick the first format at least `min_width`×`min_height` with a range whose
/// maximum reaches `target_fps`.
///
/// Returns `None` when nothing qualifies; that is the normal answer for a
/// camera that cannot do what was asked.
pub fn select_format(
    formats: &[CaptureDeviceFormat],
    target_fps: u32,
    min_width: i32,
    min_height: i32,
) -> Option<FormatSelection> {
    let selection = formats
        .iter()
        .filter(|format| format.covers(min_width, min_height))
        .find_map(|format| {
            format
                .frame_rate_ranges
                .iter()
                .find(|range| range.reaches(target_fps))
                .map(|range| FormatSelection {
                    format: format.clone(),
                    frame_rate_range: *range,
                    fps: target_fps,
                })
        });

    match &selection {
        Some(s) => log::debug!(
            "selected format {} (range {}-{} fps) for {} fps at >= {}x{}",
            s.format,
            s.frame_rate_range.min_frame_rate,
            s.frame_rate_range.max_frame_rate,
            target_fps,
            min_width,
            min_height
        ),
        None => log::debug!(
            "no format among {} reaches {} fps at >= {}x{}",
            formats.len(),
            target_fps,
            min_width,
            min_height
        ),
    }
    selection
}
