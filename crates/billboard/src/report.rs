//! Fire-and-forget engagement reporting.
//!
//! Report calls run as detached tasks. Their `Result` ends here: success is
//! traced, failure is logged, and nothing reaches the event that triggered
//! the report.

use metaviu_core::BillboardId;
use metaviu_net::AdClientError;
use std::future::Future;
use tokio::runtime::Handle;
use tracing::{debug, error, warn};

/// Engagement event sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Engagement {
    /// A viewer entered the scene.
    Enter,
    /// A viewer left the scene.
    Leave,
    /// The billboard was clicked.
    Click,
}

impl Engagement {
    /// Label used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Enter => "enter",
            Self::Leave => "leave",
            Self::Click => "click",
        }
    }
}

pub(crate) fn spawn_report<F>(engagement: Engagement, billboard_id: BillboardId, report: F)
where
    F: Future<Output = Result<(), AdClientError>> + Send + 'static,
{
    let Ok(runtime) = Handle::try_current() else {
        warn!(
            billboard_id,
            engagement = engagement.as_str(),
            "no async runtime, engagement not reported"
        );
        return;
    };
    runtime.spawn(log_outcome(engagement, billboard_id, report));
}

async fn log_outcome<F>(engagement: Engagement, billboard_id: BillboardId, report: F) -> bool
where
    F: Future<Output = Result<(), AdClientError>>,
{
    match report.await {
        Ok(()) => {
            debug!(billboard_id, engagement = engagement.as_str(), "engagement reported");
            true
        }
        Err(err) => {
            error!(
                billboard_id,
                engagement = engagement.as_str(),
                %err,
                "failed to report engagement"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn failures_are_absorbed() {
        let failed = log_outcome(Engagement::Click, 1, async {
            Err(AdClientError::Status {
                endpoint: "set_client_link_click",
                status: 502,
                body: String::new(),
            })
        })
        .await;
        assert!(!failed);
        assert!(log_outcome(Engagement::Enter, 1, async { Ok(()) }).await);
    }

    #[test]
    fn missing_runtime_does_not_panic() {
        spawn_report(Engagement::Leave, 1, async { Ok(()) });
    }
}
