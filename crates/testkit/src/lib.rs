#![warn(missing_docs)]
//! Test surfaces: a scripted in-process ad backend, a loopback HTTP stub of
//! the real backend, and helpers for letting fire-and-forget tasks finish.

mod mock_backend;
mod stub_server;

pub use mock_backend::{ClickCall, FetchCall, MockAdBackend, PresenceCall};
pub use stub_server::{unreachable_base_url, RecordedRequest, StubBackendServer};

use metaviu_core::{AdContent, SceneInfo, UserData};
use metaviu_net::AdResponse;
use serde_json::json;
use std::time::Duration;

/// Yield to the scheduler enough times for spawned report tasks that never
/// touch real I/O to run to completion.
pub async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

/// Poll `condition` until it holds or `timeout` passes. Returns the final value.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

/// A viewer identity with recognizable values.
pub fn sample_user() -> UserData {
    UserData {
        user_id: "0xviewer".to_string(),
        display_name: "viewer".to_string(),
        public_key: Some("0xviewer".to_string()),
        has_connected_web3: true,
        version: 1,
    }
}

/// Scene metadata with recognizable values.
pub fn sample_scene() -> SceneInfo {
    SceneInfo {
        cid: "bafkreiexample".to_string(),
        metadata: r#"{"display":{"title":"Plaza"}}"#.to_string(),
        base_url: "https://peer.example/content/contents/".to_string(),
        contents: Vec::new(),
    }
}

/// An ad response carrying `sides` entries, `side_1` upward.
pub fn ad_response(client_id: &str, redirect_url: &str, sides: &[AdContent]) -> AdResponse {
    AdResponse {
        client_id: client_id.to_string(),
        redirect_url: redirect_url.to_string(),
        content: sides
            .iter()
            .enumerate()
            .map(|(index, content)| {
                let entry = json!({"type": content.content_type.as_str(), "url": content.url});
                (metaviu_net::protocol::side_key(index), entry)
            })
            .collect(),
    }
}
