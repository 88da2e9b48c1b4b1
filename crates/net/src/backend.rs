use crate::protocol::{AdResponse, PresenceDirection, ViewerContext};
use crate::AdClientError;
use async_trait::async_trait;
use metaviu_core::BillboardId;

/// Operations offered by the ad-serving backend.
///
/// Implementations make exactly one attempt per call. Errors are returned,
/// never retried; callers decide how to log and degrade.
#[async_trait]
pub trait AdBackend: Send + Sync {
    /// Ask the backend which ad to show on a billboard.
    async fn fetch_ad(
        &self,
        billboard_id: BillboardId,
        billboard_type: &str,
        context: &ViewerContext,
    ) -> Result<AdResponse, AdClientError>;

    /// Report a viewer entering or leaving the scene.
    ///
    /// `billboard_id` carries whatever id the caller puts in the request's
    /// `billboard_id` field; see [`crate::PresenceRequest`].
    async fn report_presence(
        &self,
        billboard_id: &str,
        client_id: &str,
        direction: PresenceDirection,
    ) -> Result<(), AdClientError>;

    /// Report a click on a billboard.
    async fn report_click(
        &self,
        billboard_id: BillboardId,
        client_id: &str,
    ) -> Result<(), AdClientError>;
}
