//! Entity placement.

use crate::EntityId;
use glam::{Quat, Vec3};
use serde::Serialize;

/// Position, scale and orientation of an entity, optionally relative to a
/// parent entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    /// Offset from the parent origin, or world position without a parent.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
    /// Entity this transform is relative to.
    pub parent: Option<EntityId>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            parent: None,
        }
    }
}

impl Transform {
    /// Unrotated, unit-scale transform at `position`.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Replace the scale.
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Replace the rotation.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Place relative to `parent`.
    pub fn with_parent(mut self, parent: EntityId) -> Self {
        self.parent = Some(parent);
        self
    }
}
