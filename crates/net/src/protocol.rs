//! JSON message definitions for the ad-serving backend.
//!
//! Every endpoint is a `POST` with a JSON body; responses other than
//! `/show_ad` are ignored.

use metaviu_core::{AdContent, BillboardId, SceneInfo, UserData};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Ad selection endpoint.
pub const SHOW_AD_PATH: &str = "show_ad";
/// Presence (enter/leave) reporting endpoint.
pub const SCENE_OBSERVABLE_PATH: &str = "set_scene_observable";
/// Click reporting endpoint.
pub const LINK_CLICK_PATH: &str = "set_client_link_click";

/// Content kinds a billboard can render.
pub const ACCEPTED_CONTENT_TYPES: [&str; 2] = ["image", "video"];
/// Encodings a billboard can render.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "video/mp4"];

/// Scene and viewer context sent with every ad request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerContext {
    /// Metadata of the hosting scene.
    pub scene_data: SceneInfo,
    /// The viewer the ad is selected for.
    pub user: UserData,
}

/// Body of `POST /show_ad`.
#[derive(Debug, Clone, Serialize)]
pub struct ShowAdRequest<'a> {
    /// Lower-cased kind string, passed through even when unknown locally.
    pub billboard_type: &'a str,
    /// Scene author's billboard id.
    pub billboard_id: BillboardId,
    /// Content kinds accepted.
    #[serde(rename = "type")]
    pub content_types: &'a [&'a str],
    /// Encodings accepted.
    pub mime_type: &'a [&'a str],
    /// Scene and viewer context.
    pub context: &'a ViewerContext,
    /// Integration vendor tag.
    pub vendor: &'a str,
    /// Integration protocol version tag.
    pub version: &'a str,
}

/// Body returned by `POST /show_ad`.
///
/// Sides stay raw JSON until a face asks for one, so a broken entry only
/// costs that face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdResponse {
    /// Session token for this ad assignment.
    pub client_id: String,
    /// Destination opened when the billboard is clicked; blank when absent.
    #[serde(default)]
    pub redirect_url: String,
    /// Per-face content keyed `side_1`..`side_4`.
    #[serde(default)]
    pub content: BTreeMap<String, Value>,
}

/// Why a face has no usable content.
#[derive(Debug, Error)]
pub enum SideError {
    /// No entry, or an explicit `null`.
    #[error("no `{key}` entry")]
    Missing {
        /// Wire key of the face.
        key: String,
    },
    /// The entry is not a `{type, url}` object.
    #[error("malformed `{key}` entry: {source}")]
    Malformed {
        /// Wire key of the face.
        key: String,
        /// Decode failure.
        #[source]
        source: serde_json::Error,
    },
}

impl AdResponse {
    /// Content for the zero-based face index.
    pub fn side(&self, face_index: usize) -> Result<AdContent, SideError> {
        let key = side_key(face_index);
        match self.content.get(&key) {
            None | Some(Value::Null) => Err(SideError::Missing { key }),
            Some(value) => AdContent::deserialize(value)
                .map_err(|source| SideError::Malformed { key, source }),
        }
    }
}

/// Wire key for a zero-based face index.
pub fn side_key(face_index: usize) -> String {
    format!("side_{}", face_index + 1)
}

/// Direction of a presence change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceDirection {
    /// A viewer entered the scene.
    In,
    /// A viewer left the scene.
    Out,
}

impl PresenceDirection {
    /// Wire spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

/// Body of `POST /set_scene_observable`.
///
/// The deployed integration fills `billboard_id` with the id of the player
/// that entered or left, not the billboard's id. The field keeps that content
/// until the backend owners say which one they expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRequest {
    /// Player id of the presence event.
    pub billboard_id: String,
    /// Ad assignment token from `/show_ad`.
    pub client_id: String,
    /// Enter or leave.
    #[serde(rename = "type")]
    pub direction: PresenceDirection,
}

/// Body of `POST /set_client_link_click`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRequest {
    /// Clicked billboard.
    pub billboard_id: BillboardId,
    /// Session token reported with the click.
    pub client_id: String,
}
