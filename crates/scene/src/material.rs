//! Mesh, material and video bindings understood by the host.

use crate::EntityId;
use serde::Serialize;

/// Built-in mesh shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mesh {
    /// Unit quad facing +Z.
    Plane,
}

/// Texture source of a material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Texture {
    /// Static image fetched from `src`.
    Image {
        /// Image URL.
        src: String,
    },
    /// Frames of the video player attached to an entity.
    Video {
        /// Entity that owns the [`VideoPlayer`].
        video_player_entity: EntityId,
    },
}

/// Physically based material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PbrMaterial {
    /// Albedo texture.
    pub texture: Texture,
    /// 0.0 (mirror) to 1.0 (fully rough).
    pub roughness: f32,
    /// Specular highlight strength.
    pub specular_intensity: f32,
    /// 0.0 (dielectric) to 1.0 (metal).
    pub metallic: f32,
}

impl PbrMaterial {
    /// Fully rough, non-specular, non-metallic material: shows the texture
    /// without highlights.
    pub fn matte(texture: Texture) -> Self {
        Self {
            texture,
            roughness: 1.0,
            specular_intensity: 0.0,
            metallic: 0.0,
        }
    }
}

/// Video source attached to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoPlayer {
    /// Stream URL.
    pub src: String,
    /// Whether playback starts immediately.
    pub playing: bool,
}

impl VideoPlayer {
    /// A player that starts as soon as it is attached.
    pub fn playing(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            playing: true,
        }
    }
}
