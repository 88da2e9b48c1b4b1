use glam::Vec3;
use metaviu_billboard::BillboardPlacement;
use metaviu_core::{BillboardId, SceneInfo, UserData};
use metaviu_net::ClientConfig;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/billboards.toml";

/// Everything the headless runner needs: backend settings, the billboards
/// placed in the scene and the viewer the host would report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub viewer: ViewerConfig,
    pub billboards: Vec<BillboardEntry>,
}

/// Identity and scene metadata handed out by the headless host. A missing
/// table makes every ad request fail the way a real host without that data
/// would.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub user: Option<UserData>,
    pub scene: Option<SceneInfo>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BillboardEntry {
    pub id: BillboardId,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Vec3,
}

impl BillboardEntry {
    pub fn placement(&self) -> BillboardPlacement {
        BillboardPlacement::new(self.id, self.kind.clone(), self.position)
    }
}

impl AppConfig {
    /// Load from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AppConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AppConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Billboard config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                AppConfig::default()
            }
        }
    }
}
