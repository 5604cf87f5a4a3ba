//! Error types for the Concierge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all Concierge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Notification errors ---
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    // --- Ingestion errors ---
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    #[error("Notifier not configured: {0}")]
    NotConfigured(String),

    #[error("Delivery failed via {service}: {reason}")]
    DeliveryFailed { service: String, reason: String },

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    #[error("Failed to read source: {0}")]
    Read(String),
}

impl IngestError {
    /// The benign string shown in the profile panel when ingestion fails.
    /// Ingestion errors never propagate past the upload call site.
    pub fn display_message(&self) -> String {
        format!("Error reading PDF: {self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn notify_error_displays_correctly() {
        let err = Error::Notify(NotifyError::DeliveryFailed {
            service: "pushover".into(),
            reason: "HTTP 400".into(),
        });
        assert!(err.to_string().contains("pushover"));
        assert!(err.to_string().contains("HTTP 400"));
    }

    #[test]
    fn ingest_error_display_message() {
        let err = IngestError::Parse("unexpected EOF".into());
        let msg = err.display_message();
        assert!(msg.starts_with("Error reading PDF:"));
        assert!(msg.contains("unexpected EOF"));
    }
}
