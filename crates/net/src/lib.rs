#![warn(missing_docs)]
//! Ad-serving backend client.
//!
//! The backend is treated as unreliable and slow: every call is a single
//! attempt, and every failure comes back as an [`AdClientError`] for the
//! caller to log and degrade on.

mod backend;
mod client;
mod config;
mod error;
pub mod protocol;

pub use backend::AdBackend;
pub use client::AdClient;
pub use config::{ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_REDIRECT_URL};
pub use error::AdClientError;
pub use protocol::{
    AdResponse, ClickRequest, PresenceDirection, PresenceRequest, ShowAdRequest, SideError,
    ViewerContext,
};
