use serde::{Deserialize, Serialize};

/// Physical orientation reported by the device's orientation notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceOrientation {
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

/// Orientation applied to a video connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VideoOrientation {
    Portrait,
    PortraitUpsideDown,
    LandscapeRight,
    LandscapeLeft,
}

impl VideoOrientation {
    /// Rotation of the video in degrees, measured from landscape-right.
    pub fn rotation_angle(self) -> f64 {
        match self {
            Self::LandscapeRight => 0.0,
            Self::Portrait => 90.0,
            Self::LandscapeLeft => 180.0,
            Self::PortraitUpsideDown => 270.0,
        }
    }
}

impl DeviceOrientation {
    /// Video orientation matching this device orientation.
    ///
    /// Landscape left/right are swapped: the device's left is the video's
    /// right. Flat or unknown orientations give `None` (keep the current one).
    pub fn video_orientation(self) -> Option<VideoOrientation> {
        match self {
            Self::Portrait => Some(VideoOrientation::Portrait),
            Self::LandscapeLeft => Some(VideoOrientation::LandscapeRight),
            Self::LandscapeRight => Some(VideoOrientation::LandscapeLeft),
            Self::PortraitUpsideDown => Some(VideoOrientation::PortraitUpsideDown),
            Self::FaceUp | Self::FaceDown | Self::Unknown => None,
        }
    }
}
