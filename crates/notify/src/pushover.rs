//! Pushover notification adapter.
//!
//! Delivers alerts to the owner's devices through the Pushover messages
//! API: an HTTP POST with `token`, `user`, `message`, and `title` form
//! fields. Success = HTTP 200. Without credentials the adapter logs the
//! would-be message and reports NotConfigured.

use async_trait::async_trait;
use concierge_core::error::NotifyError;
use concierge_core::notify::{Notification, Notifier};
use tracing::{info, warn};

const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Pushover credentials and endpoint.
#[derive(Clone)]
pub struct PushoverSettings {
    /// Application token from the Pushover dashboard.
    pub api_token: Option<String>,
    /// User (or group) key identifying the recipient.
    pub user_key: Option<String>,
    /// Endpoint override, used by tests.
    pub api_url: String,
}

impl std::fmt::Debug for PushoverSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(s: &Option<String>) -> &'static str {
            match s {
                Some(_) => "[REDACTED]",
                None => "None",
            }
        }
        f.debug_struct("PushoverSettings")
            .field("api_token", &redact(&self.api_token))
            .field("user_key", &redact(&self.user_key))
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Default for PushoverSettings {
    fn default() -> Self {
        Self {
            api_token: None,
            user_key: None,
            api_url: PUSHOVER_API_URL.into(),
        }
    }
}

impl PushoverSettings {
    pub fn from_config(config: &concierge_config::PushoverConfig) -> Self {
        Self {
            api_token: config.api_token.clone(),
            user_key: config.user_key.clone(),
            api_url: PUSHOVER_API_URL.into(),
        }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.api_token.as_deref().filter(|t| !t.is_empty())?;
        let user = self.user_key.as_deref().filter(|u| !u.is_empty())?;
        Some((token, user))
    }
}

/// Pushover notification adapter.
pub struct PushoverNotifier {
    settings: PushoverSettings,
    client: reqwest::Client,
}

impl PushoverNotifier {
    pub fn new(settings: PushoverSettings) -> Self {
        Self {
            settings,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(config: &concierge_config::PushoverConfig) -> Self {
        Self::new(PushoverSettings::from_config(config))
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    fn is_configured(&self) -> bool {
        self.settings.credentials().is_some()
    }

    async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
        let Some((token, user)) = self.settings.credentials() else {
            info!(
                title = %notification.title,
                message = %notification.message,
                "Pushover notification would be sent (credentials missing)"
            );
            return Err(NotifyError::NotConfigured(
                "PUSHOVER_API_TOKEN / PUSHOVER_USER_KEY missing".into(),
            ));
        };

        let form = [
            ("token", token),
            ("user", user),
            ("message", notification.message.as_str()),
            ("title", notification.title.as_str()),
        ];

        let response = self
            .client
            .post(&self.settings.api_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            warn!(status, body = %body, "Pushover rejected the notification");
            return Err(NotifyError::DeliveryFailed {
                service: "pushover".into(),
                reason: format!("HTTP {status}: {body}"),
            });
        }

        info!(title = %notification.title, "Push notification sent");
        Ok(())
    }
}
