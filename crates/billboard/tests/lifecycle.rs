use glam::Vec3;
use metaviu_billboard::{
    BillboardController, BillboardPlacement, BillboardState, SceneServices,
    CLICK_CLIENT_ID_PLACEHOLDER,
};
use metaviu_core::{layout, AdContent, BillboardType};
use metaviu_net::{AdClient, ClientConfig, PresenceDirection, DEFAULT_REDIRECT_URL};
use metaviu_scene::{
    HeadlessScene, Mesh, PlayerPresence, PresenceHub, PresenceKind, StaticViewer, Texture,
};
use metaviu_testkit::{
    ad_response, sample_scene, sample_user, settle, MockAdBackend, StubBackendServer,
};
use serde_json::{json, Value};
use std::sync::Arc;

const BRAND_URL: &str = "https://brand.example/landing";

struct Harness {
    scene: Arc<HeadlessScene>,
    presence: PresenceHub,
    backend: MockAdBackend,
    viewer: StaticViewer,
}

impl Harness {
    fn new(backend: MockAdBackend) -> Self {
        Self {
            scene: Arc::new(HeadlessScene::new()),
            presence: PresenceHub::new(),
            backend,
            viewer: StaticViewer::new(sample_user(), sample_scene()),
        }
    }

    fn services(&self) -> SceneServices {
        let viewer = Arc::new(self.viewer.clone());
        SceneServices {
            host: self.scene.clone(),
            presence: self.presence.clone(),
            identity: viewer.clone(),
            scene_info: viewer,
            url_opener: self.scene.clone(),
            backend: Arc::new(self.backend.clone()),
            default_redirect_url: DEFAULT_REDIRECT_URL.to_string(),
        }
    }

    fn billboard(&self, id: i64, kind: &str) -> BillboardController {
        BillboardController::new(
            BillboardPlacement::new(id, kind, Vec3::new(8.0, 0.0, 8.0)),
            self.services(),
        )
    }
}

fn images(count: usize) -> Vec<AdContent> {
    (1..=count)
        .map(|side| AdContent::image(format!("https://cdn.example/{side}.png")))
        .collect()
}

#[tokio::test]
async fn double_with_two_images_builds_two_image_monitors() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-1", BRAND_URL, &images(2))));
    let mut billboard = harness.billboard(42, "double");

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdResolved);

    let monitors = billboard.monitors().to_vec();
    assert_eq!(monitors.len(), 2);
    let faces = layout(BillboardType::Double).faces;
    for (index, monitor) in monitors.iter().enumerate() {
        let record = harness.scene.entity(*monitor).expect("monitor exists");
        assert_eq!(record.mesh, Some(Mesh::Plane));
        assert_eq!(record.video, None);
        let transform = record.transform.expect("placed");
        assert_eq!(transform.parent, Some(billboard.frame()));
        assert_eq!(transform.position, faces[index].position);
        assert_eq!(transform.rotation, faces[index].rotation());
        let material = record.material.expect("material bound");
        assert_eq!(
            material.texture,
            Texture::Image {
                src: format!("https://cdn.example/{}.png", index + 1)
            }
        );
    }
    assert_eq!(harness.scene.children_of(billboard.frame()), monitors);
    assert_eq!(billboard.redirect_url(), BRAND_URL);

    let fetches = harness.backend.fetch_calls();
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].billboard_id, 42);
    assert_eq!(fetches[0].billboard_type, "double");
    assert_eq!(fetches[0].context.user, sample_user());
    assert_eq!(fetches[0].context.scene_data, sample_scene());
}

#[tokio::test]
async fn frame_carries_model_position_and_click_handler() {
    let harness = Harness::new(MockAdBackend::failing());
    let billboard = harness.billboard(1, "Quadruple");

    assert_eq!(billboard.state(), BillboardState::FrameBuilt);
    assert_eq!(billboard.kind(), Some(BillboardType::Quadruple));
    let frame = harness.scene.entity(billboard.frame()).expect("frame exists");
    assert_eq!(frame.model.as_deref(), Some("models/MetaViu/MetaViuQuadruple.glb"));
    let transform = frame.transform.expect("placed");
    assert_eq!(transform.position, Vec3::new(8.0, 0.0, 8.0));
    assert_eq!(transform.scale, Vec3::ONE);
    assert_eq!(transform.parent, None);
    assert_eq!(frame.pointer.as_deref(), Some("Interact"));
}

#[tokio::test]
async fn triple_missing_third_side_skips_only_that_face() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-3", BRAND_URL, &images(2))));
    let mut billboard = harness.billboard(3, "triple");

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdResolved);

    let faces = layout(BillboardType::Triple).faces;
    let positions: Vec<Vec3> = billboard
        .monitors()
        .iter()
        .map(|m| harness.scene.entity(*m).and_then(|r| r.transform).expect("placed").position)
        .collect();
    assert_eq!(positions, vec![faces[0].position, faces[1].position]);
    assert_eq!(billboard.presence_handler_count(), 2);
    assert_eq!(billboard.redirect_url(), BRAND_URL);
}

#[tokio::test]
async fn null_and_malformed_sides_skip_only_their_faces() {
    let mut response = ad_response("assign-n", BRAND_URL, &images(2));
    response.content.insert("side_3".to_string(), Value::Null);
    let harness = Harness::new(MockAdBackend::serving(response.clone()));
    let mut triple = harness.billboard(15, "triple");

    assert_eq!(triple.resolve_ad().await, BillboardState::AdResolved);
    assert_eq!(triple.monitors().len(), 2);
    assert_eq!(triple.presence_handler_count(), 2);

    response
        .content
        .insert("side_1".to_string(), json!({"type": "image"}));
    harness.backend.set_ad(Some(response));
    let mut double = harness.billboard(16, "double");

    assert_eq!(double.resolve_ad().await, BillboardState::AdResolved);
    let faces = layout(BillboardType::Double).faces;
    let only = harness.scene.entity(double.monitors()[0]).and_then(|r| r.transform);
    assert_eq!(double.monitors().len(), 1);
    assert_eq!(only.map(|t| t.position), Some(faces[1].position));
}

#[tokio::test]
async fn http_backend_with_null_side_still_resolves() {
    let server = StubBackendServer::start().await.expect("stub starts");
    server.respond_json(
        "show_ad",
        &json!({
            "client_id": "assign-h",
            "redirect_url": BRAND_URL,
            "content": {
                "side_1": {"type": "image", "url": "https://cdn.example/1.png"},
                "side_2": {"type": "video", "url": "https://cdn.example/2.mp4"},
                "side_3": null
            }
        }),
    );
    let client = AdClient::new(ClientConfig::with_base_url(server.base_url())).expect("client");
    let harness = Harness::new(MockAdBackend::failing());
    let mut services = harness.services();
    services.backend = Arc::new(client);
    let mut billboard = BillboardController::new(
        BillboardPlacement::new(17, "triple", Vec3::ZERO),
        services,
    );

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdResolved);
    assert_eq!(billboard.monitors().len(), 2);
    assert_eq!(billboard.redirect_url(), BRAND_URL);
}

#[tokio::test]
async fn missing_redirect_url_keeps_default() {
    let mut response = ad_response("assign-d", "", &images(2));
    let harness = Harness::new(MockAdBackend::serving(response));
    let mut billboard = harness.billboard(18, "panel");

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdResolved);
    assert_eq!(billboard.monitors().len(), 2);
    assert_eq!(billboard.redirect_url(), DEFAULT_REDIRECT_URL);
}

#[tokio::test]
async fn video_side_gets_a_playing_player() {
    let sides = [
        AdContent::video("https://cdn.example/spot.mp4"),
        AdContent::image("https://cdn.example/2.png"),
    ];
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-v", BRAND_URL, &sides)));
    let mut billboard = harness.billboard(5, "panel");
    billboard.resolve_ad().await;

    let first = harness.scene.entity(billboard.monitors()[0]).expect("monitor");
    let video = first.video.expect("video attached");
    assert_eq!(video.src, "https://cdn.example/spot.mp4");
    assert!(video.playing);
    assert_eq!(
        first.material.map(|m| m.texture),
        Some(Texture::Video {
            video_player_entity: billboard.monitors()[0]
        })
    );
    let second = harness.scene.entity(billboard.monitors()[1]).expect("monitor");
    assert_eq!(second.video, None);
}

#[tokio::test]
async fn failed_fetch_leaves_frame_empty_and_unobserved() {
    let harness = Harness::new(MockAdBackend::failing());
    let mut billboard = harness.billboard(7, "double");

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdFailed);

    assert!(billboard.monitors().is_empty());
    assert!(harness.scene.children_of(billboard.frame()).is_empty());
    assert_eq!(billboard.presence_handler_count(), 0);
    assert_eq!(harness.presence.listener_count(PresenceKind::Enter), 0);
    assert_eq!(harness.presence.listener_count(PresenceKind::Leave), 0);
    assert_eq!(billboard.redirect_url(), DEFAULT_REDIRECT_URL);
    assert_eq!(harness.backend.fetch_calls().len(), 1);
}

#[tokio::test]
async fn missing_viewer_identity_skips_the_backend() {
    let mut harness = Harness::new(MockAdBackend::serving(ad_response("a", BRAND_URL, &images(2))));
    harness.viewer.user = None;
    let mut billboard = harness.billboard(8, "double");

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdFailed);
    assert!(harness.backend.fetch_calls().is_empty());
    assert!(billboard.monitors().is_empty());
}

#[tokio::test]
async fn missing_scene_metadata_skips_the_backend() {
    let mut harness = Harness::new(MockAdBackend::serving(ad_response("a", BRAND_URL, &images(2))));
    harness.viewer.scene = None;
    let mut billboard = harness.billboard(9, "double");

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdFailed);
    assert!(harness.backend.fetch_calls().is_empty());
    assert_eq!(harness.presence.listener_count(PresenceKind::Enter), 0);
}

#[tokio::test]
async fn bogus_type_builds_empty_frame_and_still_clicks_through() {
    let harness = Harness::new(MockAdBackend::failing());
    let mut billboard = harness.billboard(11, "bogus");

    assert_eq!(billboard.kind(), None);
    let frame = harness.scene.entity(billboard.frame()).expect("frame exists");
    assert_eq!(frame.model.as_deref(), Some(""));

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdFailed);
    assert!(harness.scene.click(billboard.frame()));
    settle().await;

    assert_eq!(harness.scene.opened_urls(), vec![DEFAULT_REDIRECT_URL.to_string()]);
    let clicks = harness.backend.click_calls();
    assert_eq!(clicks.len(), 1);
    assert_eq!(clicks[0].billboard_id, 11);
}

#[tokio::test]
async fn bogus_type_with_an_ad_places_no_monitors_but_reports_presence() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-b", BRAND_URL, &images(2))));
    let mut billboard = harness.billboard(12, "Bogus");

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdResolved);
    assert_eq!(harness.backend.fetch_calls()[0].billboard_type, "bogus");
    assert!(billboard.monitors().is_empty());
    assert_eq!(billboard.presence_handler_count(), 2);
    assert_eq!(billboard.redirect_url(), BRAND_URL);
}

#[tokio::test]
async fn click_before_and_after_resolution() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-c", BRAND_URL, &images(2))));
    let mut billboard = harness.billboard(13, "double");

    harness.scene.click(billboard.frame());
    billboard.resolve_ad().await;
    harness.scene.click(billboard.frame());
    settle().await;

    assert_eq!(
        harness.scene.opened_urls(),
        vec![DEFAULT_REDIRECT_URL.to_string(), BRAND_URL.to_string()]
    );
    let clicks = harness.backend.click_calls();
    assert_eq!(clicks.len(), 2);
    for click in clicks {
        assert_eq!(click.billboard_id, 13);
        assert_eq!(click.client_id, CLICK_CLIENT_ID_PLACEHOLDER);
    }
}

#[tokio::test]
async fn click_while_fetch_is_pending_uses_default() {
    let backend = MockAdBackend::serving(ad_response("assign-p", BRAND_URL, &images(2)));
    let gate = backend.hold_fetches();
    let harness = Harness::new(backend);
    let billboard = harness.billboard(14, "double");
    let frame = billboard.frame();

    let resolution = billboard.spawn_resolution();
    settle().await;
    assert_eq!(harness.backend.fetch_calls().len(), 1);

    harness.scene.click(frame);
    gate.notify_one();
    let billboard = resolution.await.expect("resolution task finished");
    assert_eq!(billboard.state(), BillboardState::AdResolved);
    harness.scene.click(frame);

    assert_eq!(
        harness.scene.opened_urls(),
        vec![DEFAULT_REDIRECT_URL.to_string(), BRAND_URL.to_string()]
    );
}

#[tokio::test]
async fn redirects_are_scoped_to_their_billboard() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-r", BRAND_URL, &images(2))));
    let mut resolved = harness.billboard(20, "double");
    resolved.resolve_ad().await;

    harness.backend.set_ad(None);
    let mut unresolved = harness.billboard(21, "double");
    unresolved.resolve_ad().await;

    harness.scene.click(unresolved.frame());
    harness.scene.click(resolved.frame());
    assert_eq!(
        harness.scene.opened_urls(),
        vec![DEFAULT_REDIRECT_URL.to_string(), BRAND_URL.to_string()]
    );
}

#[tokio::test]
async fn presence_reports_carry_player_id_and_client_id() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-e", BRAND_URL, &images(2))));
    let mut billboard = harness.billboard(30, "double");
    billboard.resolve_ad().await;

    harness.presence.emit(PresenceKind::Enter, &PlayerPresence::new("0xalice"));
    harness.presence.emit(PresenceKind::Leave, &PlayerPresence::new("0xbob"));
    settle().await;

    let calls = harness.backend.presence_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].billboard_id, "0xalice");
    assert_eq!(calls[0].client_id, "assign-e");
    assert_eq!(calls[0].direction, PresenceDirection::In);
    assert_eq!(calls[1].billboard_id, "0xbob");
    assert_eq!(calls[1].direction, PresenceDirection::Out);
}

#[tokio::test]
async fn presence_failures_do_not_block_later_reports() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-f", BRAND_URL, &images(2))));
    let mut billboard = harness.billboard(31, "double");
    billboard.resolve_ad().await;
    harness.backend.fail_reports(true);

    assert_eq!(harness.presence.emit(PresenceKind::Enter, &PlayerPresence::new("p1")), 1);
    settle().await;
    assert_eq!(harness.presence.emit(PresenceKind::Leave, &PlayerPresence::new("p1")), 1);
    assert_eq!(harness.presence.emit(PresenceKind::Enter, &PlayerPresence::new("p2")), 1);
    settle().await;

    assert_eq!(harness.backend.presence_calls().len(), 3);
    assert_eq!(billboard.state(), BillboardState::AdResolved);
}

#[tokio::test]
async fn click_report_failure_still_opens_url() {
    let harness = Harness::new(MockAdBackend::failing());
    harness.backend.fail_reports(true);
    let billboard = harness.billboard(32, "panel");

    assert!(harness.scene.click(billboard.frame()));
    settle().await;
    assert_eq!(harness.scene.opened_urls(), vec![DEFAULT_REDIRECT_URL.to_string()]);
    assert_eq!(harness.backend.click_calls().len(), 1);
}

#[tokio::test]
async fn each_billboard_reports_its_own_assignment() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-x", BRAND_URL, &images(2))));
    let mut first = harness.billboard(40, "double");
    first.resolve_ad().await;
    harness
        .backend
        .set_ad(Some(ad_response("assign-y", "https://other.example", &images(4))));
    let mut second = harness.billboard(41, "quadruple");
    second.resolve_ad().await;
    assert_eq!(second.monitors().len(), 4);

    harness.presence.emit(PresenceKind::Enter, &PlayerPresence::new("p"));
    settle().await;

    let mut client_ids: Vec<String> = harness
        .backend
        .presence_calls()
        .into_iter()
        .map(|call| call.client_id)
        .collect();
    client_ids.sort();
    assert_eq!(client_ids, vec!["assign-x".to_string(), "assign-y".to_string()]);
}

#[tokio::test]
async fn teardown_removes_handlers() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-t", BRAND_URL, &images(2))));
    let mut billboard = harness.billboard(50, "double");
    billboard.resolve_ad().await;
    assert_eq!(harness.presence.listener_count(PresenceKind::Enter), 1);

    billboard.teardown();

    assert_eq!(billboard.presence_handler_count(), 0);
    assert_eq!(harness.presence.listener_count(PresenceKind::Enter), 0);
    assert_eq!(harness.presence.listener_count(PresenceKind::Leave), 0);
    assert!(!harness.scene.click(billboard.frame()));
    let frame = harness.scene.entity(billboard.frame()).expect("frame survives teardown");
    assert_eq!(frame.model.as_deref(), Some("models/MetaViu/MetaViuDouble.glb"));
}

#[tokio::test]
async fn resolution_runs_once() {
    let harness = Harness::new(MockAdBackend::serving(ad_response("assign-o", BRAND_URL, &images(2))));
    let mut billboard = harness.billboard(60, "double");

    assert_eq!(billboard.resolve_ad().await, BillboardState::AdResolved);
    assert_eq!(billboard.resolve_ad().await, BillboardState::AdResolved);
    assert_eq!(harness.backend.fetch_calls().len(), 1);
    assert_eq!(billboard.monitors().len(), 2);
    assert_eq!(billboard.presence_handler_count(), 2);
}
