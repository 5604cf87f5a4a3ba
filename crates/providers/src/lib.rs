//! LLM provider implementations for Concierge.
//!
//! All providers implement the `concierge_core::Provider` trait.
//! `build_from_config` selects and constructs the configured backend.

pub mod builder;
pub mod openai_compat;

pub use builder::build_from_config;
pub use openai_compat::OpenAiCompatProvider;
