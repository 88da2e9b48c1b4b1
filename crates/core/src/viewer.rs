//! Viewer and scene context forwarded to the ad backend.
//!
//! Field names follow the host's camelCase JSON so the backend receives the
//! same shape the host hands out.

use serde::{Deserialize, Serialize};

/// Identity of the viewer currently running the scene.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    /// Stable user identifier (wallet address or guest id).
    pub user_id: String,
    /// Name shown above the avatar.
    pub display_name: String,
    /// Wallet public key, absent for guests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Whether the viewer signed in with a wallet.
    #[serde(default)]
    pub has_connected_web3: bool,
    /// Profile version.
    #[serde(default)]
    pub version: u32,
}

/// One deployed file of the scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMapping {
    /// Path inside the scene.
    pub file: String,
    /// Content hash.
    pub hash: String,
}

/// Metadata of the scene hosting the billboards.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneInfo {
    /// Content id of the deployment.
    pub cid: String,
    /// Raw scene.json as a string.
    pub metadata: String,
    /// Base URL content hashes resolve against.
    pub base_url: String,
    /// Deployed files.
    #[serde(default)]
    pub contents: Vec<ContentMapping>,
}
