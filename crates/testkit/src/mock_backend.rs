use async_trait::async_trait;
use metaviu_core::BillboardId;
use metaviu_net::{AdBackend, AdClientError, AdResponse, PresenceDirection, ViewerContext};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// A recorded `fetch_ad` call.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchCall {
    /// Billboard the ad was requested for.
    pub billboard_id: BillboardId,
    /// Kind string as sent.
    pub billboard_type: String,
    /// Context as sent.
    pub context: ViewerContext,
}

/// A recorded `report_presence` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceCall {
    /// Value of the request's `billboard_id` field.
    pub billboard_id: String,
    /// Assignment token.
    pub client_id: String,
    /// Enter or leave.
    pub direction: PresenceDirection,
}

/// A recorded `report_click` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickCall {
    /// Clicked billboard.
    pub billboard_id: BillboardId,
    /// Token sent with the click.
    pub client_id: String,
}

#[derive(Default)]
struct MockState {
    ad: Option<AdResponse>,
    fail_reports: bool,
    gate: Option<Arc<Notify>>,
    fetches: Vec<FetchCall>,
    presence: Vec<PresenceCall>,
    clicks: Vec<ClickCall>,
}

/// Scripted [`AdBackend`] that records every call.
///
/// With no ad configured, `fetch_ad` fails as if the backend were down.
#[derive(Clone, Default)]
pub struct MockAdBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockAdBackend {
    /// Backend whose fetches fail.
    pub fn failing() -> Self {
        Self::default()
    }

    /// Backend that answers every fetch with `response`.
    pub fn serving(response: AdResponse) -> Self {
        let backend = Self::default();
        backend.set_ad(Some(response));
        backend
    }

    /// Replace the fetch answer; `None` makes fetches fail.
    pub fn set_ad(&self, response: Option<AdResponse>) {
        self.lock().ad = response;
    }

    /// Make presence and click reports fail (they are still recorded).
    pub fn fail_reports(&self, fail: bool) {
        self.lock().fail_reports = fail;
    }

    /// Hold every fetch until the returned notifier fires.
    pub fn hold_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.lock().gate = Some(Arc::clone(&gate));
        gate
    }

    /// Fetch calls so far.
    pub fn fetch_calls(&self) -> Vec<FetchCall> {
        self.lock().fetches.clone()
    }

    /// Presence reports so far.
    pub fn presence_calls(&self) -> Vec<PresenceCall> {
        self.lock().presence.clone()
    }

    /// Click reports so far.
    pub fn click_calls(&self) -> Vec<ClickCall> {
        self.lock().clicks.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn unavailable(endpoint: &'static str) -> AdClientError {
    AdClientError::Status {
        endpoint,
        status: 503,
        body: "mock backend unavailable".to_string(),
    }
}

#[async_trait]
impl AdBackend for MockAdBackend {
    async fn fetch_ad(
        &self,
        billboard_id: BillboardId,
        billboard_type: &str,
        context: &ViewerContext,
    ) -> Result<AdResponse, AdClientError> {
        let gate = {
            let mut state = self.lock();
            state.fetches.push(FetchCall {
                billboard_id,
                billboard_type: billboard_type.to_string(),
                context: context.clone(),
            });
            state.gate.clone()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.lock().ad.clone().ok_or_else(|| unavailable("show_ad"))
    }

    async fn report_presence(
        &self,
        billboard_id: &str,
        client_id: &str,
        direction: PresenceDirection,
    ) -> Result<(), AdClientError> {
        let mut state = self.lock();
        state.presence.push(PresenceCall {
            billboard_id: billboard_id.to_string(),
            client_id: client_id.to_string(),
            direction,
        });
        if state.fail_reports {
            return Err(unavailable("set_scene_observable"));
        }
        Ok(())
    }

    async fn report_click(
        &self,
        billboard_id: BillboardId,
        client_id: &str,
    ) -> Result<(), AdClientError> {
        let mut state = self.lock();
        state.clicks.push(ClickCall {
            billboard_id,
            client_id: client_id.to_string(),
        });
        if state.fail_reports {
            return Err(unavailable("set_client_link_click"));
        }
        Ok(())
    }
}
