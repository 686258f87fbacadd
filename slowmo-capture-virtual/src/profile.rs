//! Simulated hardware descriptions.

use std::collections::HashSet;

use slowmo_capture_core::models::format::{CaptureDeviceFormat, FormatHandle, FrameRateRange};

/// What the virtual device looks like and how it misbehaves.
#[derive(Debug, Clone, PartialEq)]
pub struct VirtualCameraProfile {
    /// Reported by `getPlatformVersion`.
    pub platform: String,
    pub has_camera: bool,
    pub has_microphone: bool,
    /// Camera formats in enumeration order.
    pub formats: Vec<CaptureDeviceFormat>,
    /// The camera refuses every configuration lock.
    pub refuse_lock: bool,
    /// Sessions reject every input.
    pub reject_inputs: bool,
    /// Recordings fail at finish with this message.
    pub fail_output: Option<String>,
}

fn format(handle: u64, width: i32, height: i32, ranges: &[(f64, f64)]) -> CaptureDeviceFormat {
    CaptureDeviceFormat {
        handle: FormatHandle(handle),
        width,
        height,
        frame_rate_ranges: ranges
            .iter()
            .map(|&(min, max)| FrameRateRange::new(min, max))
            .collect(),
    }
}

impl VirtualCameraProfile {
    /// A rear camera with the usual phone format ladder, up to 240 fps at
    /// 720p and 1080p.
    pub fn iphone_like() -> Self {
        Self {
            platform: "VirtualOS 17.0".into(),
            has_camera: true,
            has_microphone: true,
            formats: vec![
                format(1, 640, 480, &[(1.0, 30.0)]),
                format(2, 1280, 720, &[(1.0, 60.0)]),
                format(3, 1280, 720, &[(1.0, 240.0)]),
                format(4, 1920, 1080, &[(1.0, 30.0)]),
                format(5, 1920, 1080, &[(1.0, 60.0)]),
                format(6, 1920, 1080, &[(1.0, 120.0)]),
                format(7, 1920, 1080, &[(1.0, 240.0)]),
                format(8, 3840, 2160, &[(1.0, 30.0), (1.0, 60.0)]),
            ],
            refuse_lock: false,
            reject_inputs: false,
            fail_output: None,
        }
    }

    pub fn no_camera() -> Self {
        Self {
            has_camera: false,
            formats: Vec::new(),
            ..Self::iphone_like()
        }
    }

    pub fn no_microphone() -> Self {
        Self {
            has_microphone: false,
            ..Self::iphone_like()
        }
    }

    /// Check the profile describes hardware that could exist.
    pub fn validate(&self) -> Result<(), String> {
        if self.has_camera && self.formats.is_empty() {
            return Err("camera must expose at least one format".into());
        }
        let mut seen = HashSet::new();
        for f in &self.formats {
            if !seen.insert(f.handle) {
                return Err(format!("duplicate format handle {}", f.handle.0));
            }
            if f.width <= 0 || f.height <= 0 {
                return Err(format!("format {} has non-positive dimensions", f));
            }
            if f.frame_rate_ranges.is_empty() {
                return Err(format!("format {} has no frame rate ranges", f));
            }
            if f
                .frame_rate_ranges
                .iter()
                .any(|r| r.min_frame_rate <= 0.0 || r.min_frame_rate > r.max_frame_rate)
            {
                return Err(format!("format {} has an invalid frame rate range", f));
            }
        }
        Ok(())
    }
}

impl Default for VirtualCameraProfile {
    fn default() -> Self {
        Self::iphone_like()
    }
}
