use metaviu_core::BillboardId;
use std::collections::HashMap;
use tracing::warn;

/// Click destinations per billboard, with a fixed fallback.
#[derive(Debug, Clone)]
pub struct RedirectRegistry {
    default_url: String,
    entries: HashMap<BillboardId, String>,
}

impl RedirectRegistry {
    /// Empty registry answering `default_url` for every lookup.
    pub fn new(default_url: impl Into<String>) -> Self {
        Self {
            default_url: default_url.into(),
            entries: HashMap::new(),
        }
    }

    /// Set the destination of a billboard. Blank URLs are ignored so a lookup
    /// never yields an empty destination.
    pub fn register(&mut self, billboard_id: BillboardId, url: impl Into<String>) {
        let url = url.into();
        if url.trim().is_empty() {
            warn!(billboard_id, "ignoring blank redirect url");
            return;
        }
        self.entries.insert(billboard_id, url);
    }

    /// Destination for a billboard, or the default when none is registered.
    pub fn resolve(&self, billboard_id: BillboardId) -> &str {
        self.entries
            .get(&billboard_id)
            .map(String::as_str)
            .unwrap_or(&self.default_url)
    }

    /// Whether a backend-provided destination exists for a billboard.
    pub fn contains(&self, billboard_id: BillboardId) -> bool {
        self.entries.contains_key(&billboard_id)
    }

    /// The fallback destination.
    pub fn default_url(&self) -> &str {
        &self.default_url
    }
}
