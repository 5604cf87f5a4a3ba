//! # Concierge Core
//!
//! Domain types, traits, and error definitions for the Concierge profile
//! assistant. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The external services (the LLM API, the push notification API) are
//! defined as traits here. Implementations live in their respective crates.
//! This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod notify;
pub mod profile;
pub mod provider;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use error::{Error, IngestError, NotifyError, ProviderError, Result};
pub use notify::{Notification, Notifier};
pub use profile::ProfileContext;
pub use provider::{ChatMessage, Provider, ProviderRequest, ProviderResponse, Role, Usage};
pub use session::{ChatTurn, Session, SessionId, Transcript};
