//! Notifier trait — the abstraction over push notification services.
//!
//! A Notifier delivers a short alert to the owner's device. The turn
//! processor fires one when a visitor request looks irrelevant to the
//! profile; delivery failures are logged and swallowed at the call site,
//! never shown to the visitor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// A push notification payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    pub title: String,
}

impl Notification {
    pub fn new(message: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            title: title.into(),
        }
    }
}

/// The core Notifier trait.
///
/// Implementations handle service-specific delivery (Pushover today).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable service name (e.g., "pushover").
    fn name(&self) -> &str;

    /// Whether credentials are present. An unconfigured notifier logs the
    /// would-be message instead of delivering it.
    fn is_configured(&self) -> bool;

    /// Deliver the notification. Success means the service accepted it
    /// (HTTP 200); anything else is a NotifyError.
    async fn notify(&self, notification: &Notification) -> std::result::Result<(), NotifyError>;
}
