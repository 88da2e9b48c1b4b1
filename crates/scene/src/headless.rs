//! In-memory scene host.
//!
//! Records every component write so simulations and tests can inspect what a
//! billboard built, and dispatches pointer clicks on demand.

use crate::host::{
    IdentityProvider, PointerCallback, PointerEvent, PointerOptions, SceneHost, SceneInfoProvider,
    UrlOpener,
};
use crate::{lock, EntityId, Mesh, PbrMaterial, Transform, VideoPlayer};
use async_trait::async_trait;
use metaviu_core::{SceneInfo, UserData};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

type SharedPointerCallback = Arc<dyn Fn(&PointerEvent) + Send + Sync>;

/// Components recorded for one entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityRecord {
    /// Model path; `Some("")` when set to nothing.
    pub model: Option<String>,
    /// Last transform set.
    pub transform: Option<Transform>,
    /// Attached mesh.
    pub mesh: Option<Mesh>,
    /// Bound material.
    pub material: Option<PbrMaterial>,
    /// Attached video source.
    pub video: Option<VideoPlayer>,
    /// Hover text of the registered pointer handler, if any.
    pub pointer: Option<String>,
}

#[derive(Default)]
struct HeadlessState {
    next_entity: u32,
    entities: BTreeMap<EntityId, EntityRecord>,
    pointer_handlers: HashMap<EntityId, (PointerOptions, SharedPointerCallback)>,
    opened_urls: Vec<String>,
}

impl HeadlessState {
    fn record_mut(&mut self, entity: EntityId) -> &mut EntityRecord {
        self.entities.entry(entity).or_default()
    }
}

/// Scene host that keeps everything in memory.
#[derive(Default)]
pub struct HeadlessScene {
    state: Mutex<HeadlessState>,
}

impl HeadlessScene {
    /// Empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one entity's components.
    pub fn entity(&self, entity: EntityId) -> Option<EntityRecord> {
        lock(&self.state).entities.get(&entity).cloned()
    }

    /// Number of entities created.
    pub fn entity_count(&self) -> usize {
        lock(&self.state).entities.len()
    }

    /// Entities parented to `parent`, in creation order.
    pub fn children_of(&self, parent: EntityId) -> Vec<EntityId> {
        lock(&self.state)
            .entities
            .iter()
            .filter(|(_, record)| record.transform.and_then(|t| t.parent) == Some(parent))
            .map(|(id, _)| *id)
            .collect()
    }

    /// All entities in creation order.
    pub fn snapshot(&self) -> Vec<(EntityId, EntityRecord)> {
        lock(&self.state)
            .entities
            .iter()
            .map(|(id, record)| (*id, record.clone()))
            .collect()
    }

    /// Whether `entity` has a pointer-down handler.
    pub fn has_pointer_handler(&self, entity: EntityId) -> bool {
        lock(&self.state).pointer_handlers.contains_key(&entity)
    }

    /// Simulate a pointer-down on `entity`. Returns `false` when nothing is
    /// listening.
    pub fn click(&self, entity: EntityId) -> bool {
        let handler = lock(&self.state)
            .pointer_handlers
            .get(&entity)
            .map(|(options, callback)| (options.button, Arc::clone(callback)));
        match handler {
            Some((button, callback)) => {
                debug!(%entity, "pointer down");
                callback(&PointerEvent { entity, button });
                true
            }
            None => false,
        }
    }

    /// URLs handed to [`UrlOpener::open_external_url`], oldest first.
    pub fn opened_urls(&self) -> Vec<String> {
        lock(&self.state).opened_urls.clone()
    }
}

impl SceneHost for HeadlessScene {
    fn add_entity(&self) -> EntityId {
        let mut state = lock(&self.state);
        let entity = EntityId(state.next_entity);
        state.next_entity += 1;
        state.entities.insert(entity, EntityRecord::default());
        entity
    }

    fn set_model(&self, entity: EntityId, src: &str) {
        lock(&self.state).record_mut(entity).model = Some(src.to_string());
    }

    fn set_transform(&self, entity: EntityId, transform: Transform) {
        lock(&self.state).record_mut(entity).transform = Some(transform);
    }

    fn set_mesh(&self, entity: EntityId, mesh: Mesh) {
        lock(&self.state).record_mut(entity).mesh = Some(mesh);
    }

    fn set_video_player(&self, entity: EntityId, player: VideoPlayer) {
        lock(&self.state).record_mut(entity).video = Some(player);
    }

    fn set_material(&self, entity: EntityId, material: PbrMaterial) {
        lock(&self.state).record_mut(entity).material = Some(material);
    }

    fn on_pointer_down(&self, entity: EntityId, options: PointerOptions, callback: PointerCallback) {
        let mut state = lock(&self.state);
        state.record_mut(entity).pointer = Some(options.hover_text.clone());
        state
            .pointer_handlers
            .insert(entity, (options, Arc::from(callback)));
    }

    fn remove_pointer_events(&self, entity: EntityId) {
        let mut state = lock(&self.state);
        state.pointer_handlers.remove(&entity);
        if let Some(record) = state.entities.get_mut(&entity) {
            record.pointer = None;
        }
    }
}

impl UrlOpener for HeadlessScene {
    fn open_external_url(&self, url: &str) {
        info!(url, "open external url");
        lock(&self.state).opened_urls.push(url.to_string());
    }
}

/// Identity and scene metadata fixed up front.
#[derive(Debug, Clone, Default)]
pub struct StaticViewer {
    /// Returned by [`IdentityProvider::user_data`].
    pub user: Option<UserData>,
    /// Returned by [`SceneInfoProvider::scene_info`].
    pub scene: Option<SceneInfo>,
}

impl StaticViewer {
    /// Viewer with both identity and scene metadata available.
    pub fn new(user: UserData, scene: SceneInfo) -> Self {
        Self {
            user: Some(user),
            scene: Some(scene),
        }
    }
}

#[async_trait]
impl IdentityProvider for StaticViewer {
    async fn user_data(&self) -> Option<UserData> {
        self.user.clone()
    }
}

#[async_trait]
impl SceneInfoProvider for StaticViewer {
    async fn scene_info(&self) -> Option<SceneInfo> {
        self.scene.clone()
    }
}
