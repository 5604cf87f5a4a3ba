//! Turn processing for the Concierge profile assistant.
//!
//! One visitor submission flows through a fixed sequence: whitespace
//! no-op, owner dictation side channel, LLM relevance check, conditional
//! push notification, grounded LLM answer, transcript append. All external
//! failures are converted to benign strings at this layer; nothing below
//! the gateway ever sees an error from a turn.

pub mod prompts;
pub mod turn;

pub use turn::{TurnOutcome, TurnProcessor};
