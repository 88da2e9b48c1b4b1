//! Geometry catalog.
//!
//! Each billboard kind maps to one frame model plus an ordered list of faces.
//! Face order matters: face `i` shows the backend's `side_{i + 1}` content.
//! Adding a kind is a table change here and a variant in [`BillboardType`].

use crate::BillboardType;
use glam::{EulerRot, Quat, Vec3};

/// Placement of a single display face, relative to the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLayout {
    /// Offset of the face centre from the frame origin.
    pub position: Vec3,
    /// Plane scale (width, height, depth).
    pub size: Vec3,
    /// Euler angles in degrees (pitch, yaw, roll).
    pub rotation_degrees: Vec3,
}

impl FaceLayout {
    const fn yawed(position: Vec3, size: Vec3, yaw: f32) -> Self {
        Self {
            position,
            size,
            rotation_degrees: Vec3::new(0.0, yaw, 0.0),
        }
    }

    /// Orientation of the face as a quaternion.
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation_degrees.y.to_radians(),
            self.rotation_degrees.x.to_radians(),
            self.rotation_degrees.z.to_radians(),
        )
    }
}

/// Frame model and faces for one billboard kind.
#[derive(Debug, PartialEq)]
pub struct BillboardLayout {
    /// The kind this entry describes.
    pub kind: BillboardType,
    /// Path of the frame model inside the scene's asset tree.
    pub model: &'static str,
    /// Faces in content order.
    pub faces: &'static [FaceLayout],
}

impl BillboardLayout {
    /// Number of faces on this frame.
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

const DOUBLE_SIZE: Vec3 = Vec3::new(5.1, 2.9, 4.0);
const TRIPLE_SIZE: Vec3 = Vec3::new(3.54, 2.5, 2.0);
const QUADRUPLE_SIZE: Vec3 = Vec3::new(3.2, 2.5, 2.0);

const DOUBLE_FACES: [FaceLayout; 2] = [
    FaceLayout::yawed(Vec3::new(-0.05, 4.8, 0.3), DOUBLE_SIZE, 90.0),
    FaceLayout::yawed(Vec3::new(0.05, 4.8, 0.3), DOUBLE_SIZE, 270.0),
];

const TRIPLE_FACES: [FaceLayout; 3] = [
    FaceLayout::yawed(Vec3::new(2.837, 4.04, 0.34), TRIPLE_SIZE, -101.4),
    FaceLayout::yawed(Vec3::new(1.152, 4.04, 0.89), TRIPLE_SIZE, 138.65),
    FaceLayout::yawed(Vec3::new(1.5, 4.04, -0.846), TRIPLE_SIZE, 18.7),
];

const QUADRUPLE_FACES: [FaceLayout; 4] = [
    FaceLayout::yawed(Vec3::new(1.85, 4.15, 1.78), QUADRUPLE_SIZE, 180.0),
    FaceLayout::yawed(Vec3::new(1.85, 4.15, -1.55), QUADRUPLE_SIZE, 0.0),
    FaceLayout::yawed(Vec3::new(3.5, 4.15, 0.14), QUADRUPLE_SIZE, -90.0),
    FaceLayout::yawed(Vec3::new(0.18, 4.15, 0.14), QUADRUPLE_SIZE, 90.0),
];

// Same footprint as the double, mounted two metres lower.
const PANEL_FACES: [FaceLayout; 2] = [
    FaceLayout::yawed(Vec3::new(-0.05, 2.8, 0.3), DOUBLE_SIZE, 90.0),
    FaceLayout::yawed(Vec3::new(0.05, 2.8, 0.3), DOUBLE_SIZE, 270.0),
];

static CATALOG: [BillboardLayout; 4] = [
    BillboardLayout {
        kind: BillboardType::Double,
        model: "models/MetaViu/MetaViuDouble.glb",
        faces: &DOUBLE_FACES,
    },
    BillboardLayout {
        kind: BillboardType::Triple,
        model: "models/MetaViu/MetaViuTriple.glb",
        faces: &TRIPLE_FACES,
    },
    BillboardLayout {
        kind: BillboardType::Quadruple,
        model: "models/MetaViu/MetaViuQuadruple.glb",
        faces: &QUADRUPLE_FACES,
    },
    BillboardLayout {
        kind: BillboardType::Panel,
        model: "models/MetaViu/MetaViuPanel.glb",
        faces: &PANEL_FACES,
    },
];

/// Look up the frame model and faces for a billboard kind.
pub fn layout(kind: BillboardType) -> &'static BillboardLayout {
    match kind {
        BillboardType::Double => &CATALOG[0],
        BillboardType::Triple => &CATALOG[1],
        BillboardType::Quadruple => &CATALOG[2],
        BillboardType::Panel => &CATALOG[3],
    }
}
