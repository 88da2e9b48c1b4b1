#![warn(missing_docs)]
//! Billboard lifecycle: frame placement, ad resolution, monitor creation and
//! engagement reporting.

mod controller;
mod monitor;
mod registry;
mod report;

pub use controller::{
    BillboardController, BillboardPlacement, BillboardState, SceneServices,
    CLICK_CLIENT_ID_PLACEHOLDER,
};
pub use monitor::create_monitor;
pub use registry::RedirectRegistry;
pub use report::Engagement;
