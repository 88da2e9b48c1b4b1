//! Headless run of a configured scene.
//!
//! Builds every billboard against an in-memory host, resolves their ads
//! concurrently and replays scripted presence and click events.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use metaviu_billboard::{BillboardController, BillboardState, SceneServices};
use metaviu_core::BillboardId;
use metaviu_net::AdBackend;
use metaviu_scene::{
    EntityId, EntityRecord, HeadlessScene, PlayerPresence, PresenceHub, PresenceKind, StaticViewer,
};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};
use tracing::{info, warn};

/// One line of an events file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum ScriptedEvent {
    Enter { player: String },
    Leave { player: String },
    Click { billboard_id: BillboardId },
}

/// Parse a JSON-lines events file. Blank lines are skipped.
pub fn load_events(path: &Path) -> Result<Vec<ScriptedEvent>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read events from {}", path.display()))?;
    parse_events(&contents).with_context(|| format!("invalid events file {}", path.display()))
}

fn parse_events(contents: &str) -> Result<Vec<ScriptedEvent>> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).with_context(|| format!("line {}", index + 1))
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct BillboardReport {
    pub id: BillboardId,
    pub state: String,
    pub frame: EntityId,
    pub monitors: Vec<EntityId>,
    pub redirect_url: String,
}

#[derive(Debug, Serialize)]
pub struct EntityReport {
    pub id: EntityId,
    #[serde(flatten)]
    pub record: EntityRecord,
}

/// What the scene looks like after a run.
#[derive(Debug, Serialize)]
pub struct SceneReport {
    pub billboards: Vec<BillboardReport>,
    pub entities: Vec<EntityReport>,
    pub opened_urls: Vec<String>,
}

pub struct Simulation {
    scene: Arc<HeadlessScene>,
    presence: PresenceHub,
    billboards: Vec<BillboardController>,
}

impl Simulation {
    /// Place every configured billboard. Frames and click handlers exist as
    /// soon as this returns; ads are not requested yet.
    pub fn new(config: &AppConfig, backend: Arc<dyn AdBackend>) -> Self {
        let scene = Arc::new(HeadlessScene::new());
        let presence = PresenceHub::new();
        let viewer = Arc::new(StaticViewer {
            user: config.viewer.user.clone(),
            scene: config.viewer.scene.clone(),
        });
        let services = SceneServices {
            host: scene.clone(),
            presence: presence.clone(),
            identity: viewer.clone(),
            scene_info: viewer,
            url_opener: scene.clone(),
            backend,
            default_redirect_url: config.client.default_redirect_url.clone(),
        };

        let billboards = config
            .billboards
            .iter()
            .map(|entry| BillboardController::new(entry.placement(), services.clone()))
            .collect();

        Self {
            scene,
            presence,
            billboards,
        }
    }

    pub fn billboards(&self) -> &[BillboardController] {
        &self.billboards
    }

    /// Resolve every billboard's ad concurrently on the current runtime.
    pub async fn resolve_all(&mut self) -> Result<()> {
        let handles: Vec<_> = self
            .billboards
            .drain(..)
            .map(BillboardController::spawn_resolution)
            .collect();

        for handle in handles {
            let billboard = handle.await.context("billboard resolution task panicked")?;
            self.billboards.push(billboard);
        }

        let resolved = self
            .billboards
            .iter()
            .filter(|b| b.state() == BillboardState::AdResolved)
            .count();
        info!(
            resolved,
            failed = self.billboards.len() - resolved,
            "ad resolution finished"
        );
        Ok(())
    }

    /// Deliver one event. Returns `false` when nothing handled it.
    pub fn apply(&self, event: &ScriptedEvent) -> bool {
        match event {
            ScriptedEvent::Enter { player } => {
                self.presence
                    .emit(PresenceKind::Enter, &PlayerPresence::new(player.as_str()))
                    > 0
            }
            ScriptedEvent::Leave { player } => {
                self.presence
                    .emit(PresenceKind::Leave, &PlayerPresence::new(player.as_str()))
                    > 0
            }
            ScriptedEvent::Click { billboard_id } => {
                let Some(billboard) = self.billboards.iter().find(|b| b.id() == *billboard_id)
                else {
                    warn!(billboard_id, "click on unknown billboard ignored");
                    return false;
                };
                self.scene.click(billboard.frame())
            }
        }
    }

    pub fn report(&self) -> SceneReport {
        SceneReport {
            billboards: self
                .billboards
                .iter()
                .map(|b| BillboardReport {
                    id: b.id(),
                    state: format!("{:?}", b.state()),
                    frame: b.frame(),
                    monitors: b.monitors().to_vec(),
                    redirect_url: b.redirect_url(),
                })
                .collect(),
            entities: self
                .scene
                .snapshot()
                .into_iter()
                .map(|(id, record)| EntityReport { id, record })
                .collect(),
            opened_urls: self.scene.opened_urls(),
        }
    }
}
