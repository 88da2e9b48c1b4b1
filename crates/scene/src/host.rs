//! Capability traits implemented by the host engine.

use crate::{EntityId, Mesh, PbrMaterial, Transform, VideoPlayer};
use async_trait::async_trait;
use metaviu_core::{SceneInfo, UserData};

/// Input button a pointer handler listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Primary pointer (mouse button / trigger).
    Pointer,
    /// `E` key or equivalent.
    Primary,
    /// `F` key or equivalent.
    Secondary,
}

/// How a pointer handler presents itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerOptions {
    /// Button that triggers the handler.
    pub button: InputAction,
    /// Tooltip shown while hovering the entity.
    pub hover_text: String,
}

impl PointerOptions {
    /// Primary pointer with an "Interact" tooltip.
    pub fn interact() -> Self {
        Self {
            button: InputAction::Pointer,
            hover_text: "Interact".to_string(),
        }
    }
}

/// Pointer-down delivered to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerEvent {
    /// Entity under the pointer.
    pub entity: EntityId,
    /// Button that was pressed.
    pub button: InputAction,
}

/// Handler invoked on pointer-down.
pub type PointerCallback = Box<dyn Fn(&PointerEvent) + Send + Sync>;

/// Entity, component and input surface of the engine.
///
/// Calls are synchronous and infallible from the caller's side: a bad model
/// path or texture URL is the engine's problem to report.
pub trait SceneHost: Send + Sync {
    /// Allocate a new empty entity.
    fn add_entity(&self) -> EntityId;

    /// Attach a glTF model. An empty `src` leaves the entity without geometry.
    fn set_model(&self, entity: EntityId, src: &str);

    /// Place the entity.
    fn set_transform(&self, entity: EntityId, transform: Transform);

    /// Attach a built-in mesh.
    fn set_mesh(&self, entity: EntityId, mesh: Mesh);

    /// Attach a video source.
    fn set_video_player(&self, entity: EntityId, player: VideoPlayer);

    /// Bind a material.
    fn set_material(&self, entity: EntityId, material: PbrMaterial);

    /// Register the pointer-down handler of an entity, replacing any previous one.
    fn on_pointer_down(&self, entity: EntityId, options: PointerOptions, callback: PointerCallback);

    /// Drop the pointer-down handler of an entity.
    fn remove_pointer_events(&self, entity: EntityId);
}

/// Hands a URL to the host so the viewer can open it outside the scene.
pub trait UrlOpener: Send + Sync {
    /// Ask the viewer to open `url`.
    fn open_external_url(&self, url: &str);
}

/// Looks up who is running the scene.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` when the host cannot tell (e.g. still loading the profile).
    async fn user_data(&self) -> Option<UserData>;
}

/// Looks up the deployment metadata of the running scene.
#[async_trait]
pub trait SceneInfoProvider: Send + Sync {
    /// `None` when the host has no metadata for the scene.
    async fn scene_info(&self) -> Option<SceneInfo>;
}
