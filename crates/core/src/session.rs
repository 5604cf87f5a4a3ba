//! Session, Transcript, and ChatTurn domain types.
//!
//! A Session owns the profile context and the visible chat history for one
//! UI session. The transcript is append-only; only the explicit clear
//! operation empties it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::profile::ProfileContext;

/// Unique identifier for a UI session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One completed exchange: what the visitor asked and what was answered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub user_message: String,
    pub answer: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatTurn {
    pub fn new(user_message: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            answer: answer.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only ordered sequence of chat turns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    /// Drop all turns. The only non-append mutation.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// The explicitly owned per-session state: one profile context and one
/// transcript. The gateway holds exactly one of these behind a lock and
/// passes it by reference into the turn processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub profile: ProfileContext,
    pub transcript: Transcript,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            profile: ProfileContext::new(),
            transcript: Transcript::new(),
            created_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_appends_in_order() {
        let mut t = Transcript::new();
        t.push(ChatTurn::new("first?", "one"));
        t.push(ChatTurn::new("second?", "two"));
        assert_eq!(t.len(), 2);
        assert_eq!(t.turns()[0].user_message, "first?");
        assert_eq!(t.turns()[1].answer, "two");
    }

    #[test]
    fn transcript_clear_empties() {
        let mut t = Transcript::new();
        t.push(ChatTurn::new("q", "a"));
        t.clear();
        assert!(t.is_empty());
    }

    #[test]
    fn new_session_starts_clean() {
        let s = Session::new();
        assert!(s.transcript.is_empty());
        assert!(s.profile.is_placeholder());
    }

    #[test]
    fn session_ids_unique() {
        assert_ne!(SessionId::new().0, SessionId::new().0);
    }

    #[test]
    fn chat_turn_serialization_roundtrip() {
        let turn = ChatTurn::new("hello", "hi there");
        let json = serde_json::to_string(&turn).unwrap();
        let back: ChatTurn = serde_json::from_str(&json).unwrap();
        assert_eq!(back.user_message, "hello");
        assert_eq!(back.answer, "hi there");
    }
}
