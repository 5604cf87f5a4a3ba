//! Push notification adapters for Concierge.
//!
//! All notifiers implement the `concierge_core::Notifier` trait. The turn
//! processor fires one when a visitor request looks irrelevant to the
//! profile; the caller swallows delivery failures.

pub mod pushover;

pub use pushover::{PushoverNotifier, PushoverSettings};
