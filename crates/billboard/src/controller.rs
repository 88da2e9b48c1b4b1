//! Billboard controller.
//!
//! Construction builds the frame and wires click handling synchronously.
//! [`BillboardController::resolve_ad`] then runs the single awaited ad
//! request and places monitors:
//!
//! ```text
//! Created -> FrameBuilt -> AdPending -> AdResolved
//!                                   \-> AdFailed
//! ```
//!
//! Every failure degrades the billboard instead of surfacing: the worst case
//! is an empty frame whose click opens the default redirect URL.

use crate::monitor::create_monitor;
use crate::registry::RedirectRegistry;
use crate::report::{spawn_report, Engagement};
use glam::Vec3;
use metaviu_core::{layout, BillboardId, BillboardType};
use metaviu_net::{AdBackend, AdResponse, PresenceDirection, ViewerContext};
use metaviu_scene::{
    EntityId, IdentityProvider, PlayerPresence, PointerEvent, PointerOptions, PresenceHub,
    PresenceKind, SceneHost, SceneInfoProvider, Subscription, Transform, UrlOpener,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

/// Client id sent with every click report.
///
/// The deployed integration reports clicks with this literal instead of the
/// `client_id` of the resolved ad, so clicks are not tied to an assignment.
/// Kept until the backend owners confirm which value they expect.
pub const CLICK_CLIENT_ID_PLACEHOLDER: &str = "str";

/// Lifecycle of a billboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillboardState {
    /// Nothing built yet.
    Created,
    /// Frame placed and click handler registered.
    FrameBuilt,
    /// Waiting on viewer context or the ad backend.
    AdPending,
    /// Monitors placed and presence reporting active.
    AdResolved,
    /// No ad; the frame stays empty.
    AdFailed,
}

impl BillboardState {
    /// Whether ad resolution has finished, successfully or not.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::AdResolved | Self::AdFailed)
    }
}

/// Where and what to build.
#[derive(Debug, Clone, PartialEq)]
pub struct BillboardPlacement {
    /// Scene author's billboard id.
    pub id: BillboardId,
    /// Kind as written by the scene author; matched case-insensitively.
    pub kind: String,
    /// World position of the frame origin.
    pub position: Vec3,
}

impl BillboardPlacement {
    /// Describe a billboard of `kind` at `position`.
    pub fn new(id: BillboardId, kind: impl Into<String>, position: Vec3) -> Self {
        Self {
            id,
            kind: kind.into(),
            position,
        }
    }
}

/// Host services and backend a billboard talks to.
#[derive(Clone)]
pub struct SceneServices {
    /// Entity and input surface.
    pub host: Arc<dyn SceneHost>,
    /// Scene-wide enter/leave events.
    pub presence: PresenceHub,
    /// Current viewer lookup.
    pub identity: Arc<dyn IdentityProvider>,
    /// Current scene metadata lookup.
    pub scene_info: Arc<dyn SceneInfoProvider>,
    /// External link handler.
    pub url_opener: Arc<dyn UrlOpener>,
    /// Ad-serving backend.
    pub backend: Arc<dyn AdBackend>,
    /// Click destination before an ad resolves.
    pub default_redirect_url: String,
}

/// Drives one billboard from frame construction to a resolved or failed ad.
pub struct BillboardController {
    id: BillboardId,
    kind_name: String,
    kind: Option<BillboardType>,
    frame: EntityId,
    state: BillboardState,
    services: SceneServices,
    redirects: Arc<Mutex<RedirectRegistry>>,
    monitors: Vec<EntityId>,
    presence_subscriptions: Vec<Subscription>,
}

impl BillboardController {
    /// Build the frame and register click handling.
    ///
    /// An unknown kind is logged and yields a frame without a model; clicks
    /// and ad resolution still work.
    pub fn new(placement: BillboardPlacement, services: SceneServices) -> Self {
        let kind_name = placement.kind.trim().to_lowercase();
        let kind = match BillboardType::parse(&kind_name) {
            Ok(kind) => Some(kind),
            Err(err) => {
                error!(billboard_id = placement.id, %err, "billboard frame has no model");
                None
            }
        };

        let frame = build_frame(services.host.as_ref(), kind, placement.position);
        let redirects = Arc::new(Mutex::new(RedirectRegistry::new(
            services.default_redirect_url.clone(),
        )));

        let mut controller = Self {
            id: placement.id,
            kind_name,
            kind,
            frame,
            state: BillboardState::Created,
            services,
            redirects,
            monitors: Vec::new(),
            presence_subscriptions: Vec::new(),
        };
        controller.register_click();
        controller.state = BillboardState::FrameBuilt;

        debug!(
            billboard_id = controller.id,
            kind = %controller.kind_name,
            frame = %controller.frame,
            "billboard frame built"
        );
        controller
    }

    /// Billboard id.
    pub fn id(&self) -> BillboardId {
        self.id
    }

    /// Recognized kind, `None` when the placement named an unknown one.
    pub fn kind(&self) -> Option<BillboardType> {
        self.kind
    }

    /// Frame entity.
    pub fn frame(&self) -> EntityId {
        self.frame
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BillboardState {
        self.state
    }

    /// Monitor entities in face order (skipped faces leave no gap).
    pub fn monitors(&self) -> &[EntityId] {
        &self.monitors
    }

    /// Number of live presence listeners owned by this billboard.
    pub fn presence_handler_count(&self) -> usize {
        self.presence_subscriptions.len()
    }

    /// Where a click would currently lead.
    pub fn redirect_url(&self) -> String {
        lock(&self.redirects).resolve(self.id).to_string()
    }

    fn register_click(&self) {
        let billboard_id = self.id;
        let backend = Arc::clone(&self.services.backend);
        let opener = Arc::clone(&self.services.url_opener);
        let redirects = Arc::clone(&self.redirects);

        self.services.host.on_pointer_down(
            self.frame,
            PointerOptions::interact(),
            Box::new(move |_event: &PointerEvent| {
                let backend = Arc::clone(&backend);
                spawn_report(Engagement::Click, billboard_id, async move {
                    backend
                        .report_click(billboard_id, CLICK_CLIENT_ID_PLACEHOLDER)
                        .await
                });

                let url = lock(&redirects).resolve(billboard_id).to_string();
                info!(billboard_id, %url, "billboard clicked");
                opener.open_external_url(&url);
            }),
        );
    }

    /// Request an ad and build the monitors it describes.
    ///
    /// Runs once; later calls return the current state untouched.
    pub async fn resolve_ad(&mut self) -> BillboardState {
        if self.state != BillboardState::FrameBuilt {
            warn!(billboard_id = self.id, state = ?self.state, "ad resolution already ran");
            return self.state;
        }
        self.state = BillboardState::AdPending;

        let (user, scene) = tokio::join!(
            self.services.identity.user_data(),
            self.services.scene_info.scene_info()
        );
        let Some(user) = user else {
            error!(billboard_id = self.id, "missing viewer identity, skipping ad request");
            return self.fail();
        };
        let Some(scene_data) = scene else {
            error!(billboard_id = self.id, "missing scene metadata, skipping ad request");
            return self.fail();
        };

        let context = ViewerContext { scene_data, user };
        let response = match self
            .services
            .backend
            .fetch_ad(self.id, &self.kind_name, &context)
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!(billboard_id = self.id, %err, "ad request failed");
                return self.fail();
            }
        };

        self.apply(response);
        self.state
    }

    /// Run [`Self::resolve_ad`] as a detached task on the current runtime and
    /// hand the controller back when it finishes.
    pub fn spawn_resolution(mut self) -> tokio::task::JoinHandle<Self> {
        tokio::spawn(async move {
            self.resolve_ad().await;
            self
        })
    }

    fn fail(&mut self) -> BillboardState {
        self.state = BillboardState::AdFailed;
        self.state
    }

    fn apply(&mut self, response: AdResponse) {
        lock(&self.redirects).register(self.id, response.redirect_url.as_str());

        match self.kind {
            Some(kind) => {
                for (index, face) in layout(kind).faces.iter().enumerate() {
                    let content = match response.side(index) {
                        Ok(content) => content,
                        Err(err) => {
                            error!(
                                billboard_id = self.id,
                                side = index + 1,
                                %err,
                                "no usable content for face"
                            );
                            continue;
                        }
                    };
                    let monitor = create_monitor(
                        self.services.host.as_ref(),
                        self.frame,
                        face,
                        content.content_type,
                        &content.url,
                    );
                    self.monitors.push(monitor);
                }
            }
            None => {
                error!(
                    billboard_id = self.id,
                    kind = %self.kind_name,
                    "unknown billboard type, no monitors placed"
                );
            }
        }

        self.watch_presence(&response.client_id);
        self.state = BillboardState::AdResolved;

        info!(
            billboard_id = self.id,
            client_id = %response.client_id,
            monitors = self.monitors.len(),
            "ad resolved"
        );
    }

    /// Report enter/leave of any player against this ad assignment.
    ///
    /// The request's `billboard_id` field carries the player's id, matching
    /// what the backend currently receives.
    fn watch_presence(&mut self, client_id: &str) {
        let watches = [
            (PresenceKind::Enter, PresenceDirection::In, Engagement::Enter),
            (PresenceKind::Leave, PresenceDirection::Out, Engagement::Leave),
        ];

        for (kind, direction, engagement) in watches {
            let billboard_id = self.id;
            let backend = Arc::clone(&self.services.backend);
            let client_id = client_id.to_string();

            let subscription = self.services.presence.subscribe(
                kind,
                Arc::new(move |player: &PlayerPresence| {
                    let backend = Arc::clone(&backend);
                    let client_id = client_id.clone();
                    let player_id = player.user_id.clone();
                    spawn_report(engagement, billboard_id, async move {
                        backend
                            .report_presence(&player_id, &client_id, direction)
                            .await
                    });
                }),
            );
            self.presence_subscriptions.push(subscription);
        }
    }

    /// Remove this billboard's presence listeners and click handler.
    ///
    /// Entities are left to the engine.
    pub fn teardown(&mut self) {
        for subscription in self.presence_subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        self.services.host.remove_pointer_events(self.frame);
        debug!(billboard_id = self.id, "billboard handlers removed");
    }
}

fn build_frame(host: &dyn SceneHost, kind: Option<BillboardType>, position: Vec3) -> EntityId {
    let frame = host.add_entity();
    let model = kind.map(|kind| layout(kind).model).unwrap_or_default();
    host.set_model(frame, model);
    host.set_transform(frame, Transform::new(position).with_scale(Vec3::ONE));
    frame
}

fn lock(registry: &Mutex<RedirectRegistry>) -> MutexGuard<'_, RedirectRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}
