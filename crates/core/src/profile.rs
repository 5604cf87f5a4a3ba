//! ProfileContext — the text the answering model is grounded on.
//!
//! A process-lifetime mutable value: an ordered list of free-text facts.
//! A resume upload replaces the whole list with one fact; owner dictation
//! appends one fact at a time. Invariant: the context is never empty — a
//! placeholder fact fills it before the first upload, and clearing restores
//! that placeholder.

use serde::{Deserialize, Serialize};

/// Shown until the owner uploads a resume or dictates a first fact.
pub const PLACEHOLDER_FACT: &str =
    "No resume PDF uploaded yet. Please upload your resume to initialize the profile context.";

/// The ordered set of profile facts grounding every answer.
///
/// No persistence; lost on restart. Owned by a [`crate::Session`] and
/// passed by reference — there is no global context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileContext {
    facts: Vec<String>,
}

impl ProfileContext {
    /// Create a context holding only the placeholder fact.
    pub fn new() -> Self {
        Self {
            facts: vec![PLACEHOLDER_FACT.to_string()],
        }
    }

    /// Replace the entire context with a single fact (resume upload path).
    ///
    /// A blank replacement restores the placeholder instead of leaving the
    /// context empty.
    pub fn replace(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.facts.clear();
        if text.trim().is_empty() {
            self.facts.push(PLACEHOLDER_FACT.to_string());
        } else {
            self.facts.push(text);
        }
    }

    /// Append one fact (owner dictation path).
    ///
    /// The first real fact evicts the placeholder. Blank facts are ignored.
    pub fn push_fact(&mut self, fact: impl Into<String>) {
        let fact = fact.into();
        if fact.trim().is_empty() {
            return;
        }
        if self.is_placeholder() {
            self.facts.clear();
        }
        self.facts.push(fact);
    }

    /// All facts joined for prompt embedding.
    pub fn grounding_text(&self) -> String {
        self.facts.join("\n")
    }

    /// First `max_chars` characters of the grounding text, with an ellipsis
    /// when truncated. Used by the profile summary panel.
    pub fn summary(&self, max_chars: usize) -> String {
        let text = self.grounding_text();
        if text.chars().count() <= max_chars {
            text
        } else {
            let truncated: String = text.chars().take(max_chars).collect();
            format!("{truncated}...")
        }
    }

    /// Whether the context still holds only the initial placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.facts.len() == 1 && self.facts[0] == PLACEHOLDER_FACT
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn facts(&self) -> &[String] {
        &self.facts
    }
}

impl Default for ProfileContext {
    fn default() -> Self {
        Self::new()
    }
}
