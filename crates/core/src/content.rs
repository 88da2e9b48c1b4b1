//! Ad content assigned to a single display face.

use serde::{Deserialize, Serialize};

/// How a face renders its content URL.
///
/// The backend sends free-form strings; anything other than `video` is drawn
/// as a still image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    /// Static texture (jpeg/png).
    Image,
    /// Looping video stream (mp4).
    Video,
}

impl ContentType {
    /// Wire spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Whether this content needs a video player.
    pub const fn is_video(self) -> bool {
        matches!(self, Self::Video)
    }
}

impl From<&str> for ContentType {
    fn from(value: &str) -> Self {
        if value == "video" {
            Self::Video
        } else {
            Self::Image
        }
    }
}

impl From<String> for ContentType {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<ContentType> for String {
    fn from(value: ContentType) -> Self {
        value.as_str().to_string()
    }
}

/// One face's worth of ad content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdContent {
    /// Rendering mode.
    #[serde(rename = "type")]
    pub content_type: ContentType,
    /// Texture or video source.
    pub url: String,
}

impl AdContent {
    /// Convenience constructor for image content.
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Image,
            url: url.into(),
        }
    }

    /// Convenience constructor for video content.
    pub fn video(url: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::Video,
            url: url.into(),
        }
    }
}
