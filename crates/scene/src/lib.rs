#![warn(missing_docs)]
//! Host scene capabilities consumed by billboards.
//!
//! The engine owns entities, meshes, materials, pointer input and the
//! player-presence event source. This crate names the slice of that surface a
//! billboard needs, plus an in-memory [`HeadlessScene`] that records every
//! call for simulation and tests.
//!
//! # Example
//!
//! ```rust
//! use metaviu_scene::{HeadlessScene, SceneHost, Transform};
//! use glam::Vec3;
//!
//! let scene = HeadlessScene::new();
//! let frame = scene.add_entity();
//! scene.set_model(frame, "models/frame.glb");
//! scene.set_transform(frame, Transform::new(Vec3::new(8.0, 0.0, 8.0)));
//! assert_eq!(scene.entity(frame).and_then(|e| e.model), Some("models/frame.glb".to_string()));
//! ```

mod entity;
mod headless;
mod host;
mod material;
mod presence;
mod transform;

pub use entity::EntityId;
pub use headless::{EntityRecord, HeadlessScene, StaticViewer};
pub use host::{
    IdentityProvider, InputAction, PointerCallback, PointerEvent, PointerOptions, SceneHost,
    SceneInfoProvider, UrlOpener,
};
pub use material::{Mesh, PbrMaterial, Texture, VideoPlayer};
pub use presence::{PlayerPresence, PresenceCallback, PresenceHub, PresenceKind, Subscription};
pub use transform::Transform;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mutex, recovering the data if a panicking holder poisoned it.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
