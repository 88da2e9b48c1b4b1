#![warn(missing_docs)]
//! Core primitives shared across the workspace: billboard kinds, their face
//! geometry and the ad content that gets projected onto each face.

pub mod billboard_type;
pub mod content;
pub mod layout;
pub mod viewer;

pub use billboard_type::{BillboardType, UnknownBillboardType};
pub use content::{AdContent, ContentType};
pub use layout::{layout, BillboardLayout, FaceLayout};
pub use viewer::{ContentMapping, SceneInfo, UserData};

/// Identifier assigned to a billboard by the scene author.
pub type BillboardId = i64;
