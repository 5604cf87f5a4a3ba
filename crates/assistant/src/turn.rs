//! The Turn Processor.
//!
//! Sequence per submission:
//! 1. Empty/whitespace message: no-op.
//! 2. Sender name matches the owner: append the raw message to the profile
//!    context, confirm, skip every external call.
//! 3. Relevance check (one LLM call, capped at `relevance_max_tokens`).
//! 4. Verdict: irrelevant only when the lowercased reply contains "no" and
//!    not "yes". Anything else is inconclusive and never notifies.
//! 5. Irrelevant: one push notification attempt; failures logged, swallowed.
//! 6. Answer (one LLM call, capped at `answer_max_tokens`); failures become
//!    an apologetic string.
//! 7. Append (message, answer) to the transcript.
//!
//! No retries, no streaming, no concurrency inside a turn.

use std::sync::Arc;

use concierge_core::notify::{Notification, Notifier};
use concierge_core::provider::{Provider, ProviderRequest};
use concierge_core::session::{ChatTurn, Session};
use tracing::{debug, info, warn};

use crate::prompts;

/// What a processed submission produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank submission; nothing changed.
    Ignored,
    /// Owner dictation; the message became a profile fact.
    OwnerNote { reply: String },
    /// Regular visitor turn.
    Answered { answer: String, notified: bool },
}

impl TurnOutcome {
    /// The reply shown in the chat panel, if any.
    pub fn reply(&self) -> Option<&str> {
        match self {
            TurnOutcome::Ignored => None,
            TurnOutcome::OwnerNote { reply } => Some(reply),
            TurnOutcome::Answered { answer, .. } => Some(answer),
        }
    }

    pub fn notified(&self) -> bool {
        matches!(self, TurnOutcome::Answered { notified: true, .. })
    }
}

/// Runs the fixed turn sequence against a session.
pub struct TurnProcessor {
    provider: Option<Arc<dyn Provider>>,
    notifier: Arc<dyn Notifier>,
    model: String,
    temperature: f32,
    relevance_max_tokens: u32,
    answer_max_tokens: u32,
    owner_name: String,
}

impl TurnProcessor {
    /// Create a processor. `provider` may be `None` (no API key); turns
    /// then produce the documented fallback strings instead of answers.
    pub fn new(
        provider: Option<Arc<dyn Provider>>,
        notifier: Arc<dyn Notifier>,
        model: impl Into<String>,
        owner_name: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            notifier,
            model: model.into(),
            temperature: 0.7,
            relevance_max_tokens: 100,
            answer_max_tokens: 300,
            owner_name: owner_name.into(),
        }
    }

    /// Build a processor from loaded configuration.
    pub fn from_config(
        provider: Option<Arc<dyn Provider>>,
        notifier: Arc<dyn Notifier>,
        config: &concierge_config::AppConfig,
    ) -> Self {
        Self {
            provider,
            notifier,
            model: config.model.clone(),
            temperature: config.temperature,
            relevance_max_tokens: config.relevance_max_tokens,
            answer_max_tokens: config.answer_max_tokens,
            owner_name: config.owner_name.clone(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_token_limits(mut self, relevance: u32, answer: u32) -> Self {
        self.relevance_max_tokens = relevance;
        self.answer_max_tokens = answer;
        self
    }

    /// Process one submission against the session, mutating its profile
    /// and transcript in place.
    pub async fn process_turn(
        &self,
        message: &str,
        sender_name: Option<&str>,
        session: &mut Session,
    ) -> TurnOutcome {
        if message.trim().is_empty() {
            debug!("Blank submission ignored");
            return TurnOutcome::Ignored;
        }

        if self.is_owner(sender_name) {
            session.profile.push_fact(message);
            let reply = prompts::owner_confirmation(&self.owner_name);
            info!(facts = session.profile.fact_count(), "Owner fact recorded");
            session.transcript.push(ChatTurn::new(message, reply.clone()));
            return TurnOutcome::OwnerNote { reply };
        }

        let grounding = session.profile.grounding_text();

        let relevance = self.check_relevance(message, &grounding).await;
        let irrelevant = is_irrelevant(&relevance);

        let notified = if irrelevant {
            self.send_alert(message, &relevance).await
        } else {
            false
        };

        let answer = self.answer(message, &grounding).await;
        session
            .transcript
            .push(ChatTurn::new(message, answer.clone()));

        TurnOutcome::Answered { answer, notified }
    }

    fn is_owner(&self, sender_name: Option<&str>) -> bool {
        let Some(sender) = sender_name else {
            return false;
        };
        let sender = sender.trim();
        !sender.is_empty() && sender.eq_ignore_ascii_case(self.owner_name.trim())
    }

    /// Ask the model whether the request is relevant to the profile.
    /// Always returns a reply string; failures become fixed inconclusive
    /// strings that never match the irrelevance heuristic.
    async fn check_relevance(&self, message: &str, grounding: &str) -> String {
        let Some(provider) = &self.provider else {
            return prompts::RELEVANCE_UNAVAILABLE.to_string();
        };

        let request = ProviderRequest::single_prompt(
            &self.model,
            prompts::relevance_prompt(grounding, message),
            self.temperature,
            self.relevance_max_tokens,
        );

        match provider.complete(request).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(error = %e, "Relevance check failed");
                prompts::RELEVANCE_FAILED.to_string()
            }
        }
    }

    /// One notification attempt. Returns whether delivery succeeded;
    /// failures are logged and swallowed, never shown to the visitor.
    async fn send_alert(&self, message: &str, relevance: &str) -> bool {
        let notification = Notification::new(
            prompts::irrelevant_alert(message, relevance),
            prompts::ALERT_TITLE,
        );

        match self.notifier.notify(&notification).await {
            Ok(()) => {
                info!("Push notification sent");
                true
            }
            Err(e) => {
                warn!(error = %e, "Push notification failed");
                false
            }
        }
    }

    /// Answer the request grounded on the profile. Always returns a
    /// user-facing string.
    async fn answer(&self, message: &str, grounding: &str) -> String {
        let Some(provider) = &self.provider else {
            return prompts::ANSWER_UNCONFIGURED.to_string();
        };

        let request = ProviderRequest::single_prompt(
            &self.model,
            prompts::answer_prompt(grounding, message),
            self.temperature,
            self.answer_max_tokens,
        );

        match provider.complete(request).await {
            Ok(response) => response.content,
            Err(e) => {
                warn!(error = %e, "Answer call failed");
                prompts::answer_error(&e)
            }
        }
    }
}

/// The verdict heuristic: irrelevant only on "no" without "yes".
fn is_irrelevant(relevance_reply: &str) -> bool {
    let lower = relevance_reply.to_lowercase();
    lower.contains("no") && !lower.contains("yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::error::{NotifyError, ProviderError};
    use concierge_core::provider::{ProviderResponse, Usage};
    use std::sync::Mutex;

    // ── Scripted provider ────────────────────────────────────────────

    /// Returns a fixed sequence of results, one per `complete` call.
    /// Panics if called more times than scripted.
    struct ScriptedProvider {
        replies: Mutex<Vec<Result<String, ProviderError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(0),
            }
        }

        fn texts(replies: &[&str]) -> Self {
            Self::new(replies.iter().map(|r| Ok(r.to_string())).collect())
        }

        fn none_scripted() -> Self {
            Self::new(Vec::new())
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            let mut calls = self.calls.lock().unwrap();
            let replies = self.replies.lock().unwrap();
            if *calls >= replies.len() {
                panic!(
                    "ScriptedProvider exhausted: call #{}, have {}",
                    *calls,
                    replies.len()
                );
            }
            let reply = replies[*calls].clone();
            *calls += 1;
            reply.map(|content| ProviderResponse {
                content,
                usage: Some(Usage {
                    prompt_tokens: 10,
                    completion_tokens: 5,
                    total_tokens: 15,
                }),
                model: "mock".into(),
            })
        }
    }

    // ── Recording notifier ───────────────────────────────────────────

    struct RecordingNotifier {
        attempts: Mutex<Vec<Notification>>,
        fail: bool,
    }

    impl RecordingNotifier {
        fn new() -> Self {
            Self {
                attempts: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                attempts: Mutex::new(Vec::new()),
                fail: true,
            }
        }

        fn attempts(&self) -> usize {
            self.attempts.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl Notifier for RecordingNotifier {
        fn name(&self) -> &str {
            "recording"
        }

        fn is_configured(&self) -> bool {
            !self.fail
        }

        async fn notify(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.attempts.lock().unwrap().push(notification.clone());
            if self.fail {
                Err(NotifyError::DeliveryFailed {
                    service: "recording".into(),
                    reason: "HTTP 500".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn processor(
        provider: &Arc<ScriptedProvider>,
        notifier: &Arc<RecordingNotifier>,
    ) -> TurnProcessor {
        TurnProcessor::new(
            Some(provider.clone() as Arc<dyn Provider>),
            notifier.clone() as Arc<dyn Notifier>,
            "mock-model",
            "David",
        )
    }

    // ── Verdict heuristic ────────────────────────────────────────────

    #[test]
    fn verdict_no_without_yes_is_irrelevant() {
        assert!(is_irrelevant("No, this has nothing to do with the profile"));
        assert!(is_irrelevant("no"));
    }

    #[test]
    fn verdict_yes_suppresses() {
        assert!(!is_irrelevant("Yes, clearly about the resume"));
        assert!(!is_irrelevant("Yes and no, it depends"));
    }

    #[test]
    fn verdict_neither_token_is_inconclusive() {
        assert!(!is_irrelevant("Maybe. Hard to tell."));
        assert!(!is_irrelevant(""));
        assert!(!is_irrelevant(prompts::RELEVANCE_FAILED));
        assert!(!is_irrelevant(prompts::RELEVANCE_UNAVAILABLE));
    }

    #[test]
    fn verdict_matches_no_inside_words() {
        // Substring heuristic by contract: "nothing", "not" etc. count.
        assert!(is_irrelevant("There is nothing relevant here"));
    }

    // ── Turn sequence ────────────────────────────────────────────────

    #[tokio::test]
    async fn blank_message_is_a_no_op() {
        let provider = Arc::new(ScriptedProvider::none_scripted());
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        let outcome = p.process_turn("   \t ", Some("Alice"), &mut session).await;

        assert_eq!(outcome, TurnOutcome::Ignored);
        assert!(session.transcript.is_empty());
        assert!(session.profile.is_placeholder());
        assert_eq!(provider.calls(), 0);
        assert_eq!(notifier.attempts(), 0);
    }

    #[tokio::test]
    async fn irrelevant_reply_notifies_once_and_still_answers() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "no, this request is unrelated to the profile",
            "I can only speak to the profile context.",
        ]));
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        let outcome = p
            .process_turn("What's the weather like?", Some("Alice"), &mut session)
            .await;

        assert!(outcome.notified());
        assert_eq!(notifier.attempts(), 1);
        assert_eq!(provider.calls(), 2);
        assert_eq!(session.transcript.len(), 1);
        assert_eq!(
            outcome.reply(),
            Some("I can only speak to the profile context.")
        );
    }

    #[tokio::test]
    async fn relevant_reply_never_notifies() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "Yes, this asks about the candidate's skills",
            "The candidate knows Rust and Python.",
        ]));
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        let outcome = p
            .process_turn("What languages?", Some("Alice"), &mut session)
            .await;

        assert!(!outcome.notified());
        assert_eq!(notifier.attempts(), 0);
        assert_eq!(session.transcript.len(), 1);
    }

    #[tokio::test]
    async fn yes_and_no_together_suppress_notification() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "Yes and no: partially related",
            "answer",
        ]));
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        p.process_turn("hmm", Some("Alice"), &mut session).await;

        assert_eq!(notifier.attempts(), 0);
    }

    #[tokio::test]
    async fn notification_failure_is_swallowed() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "no, unrelated",
            "the answer regardless",
        ]));
        let notifier = Arc::new(RecordingNotifier::failing());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        let outcome = p.process_turn("off topic", Some("Alice"), &mut session).await;

        // Attempted once, failed, swallowed; the answer path is untouched.
        assert_eq!(notifier.attempts(), 1);
        assert_eq!(
            outcome,
            TurnOutcome::Answered {
                answer: "the answer regardless".into(),
                notified: false,
            }
        );
        assert_eq!(session.transcript.len(), 1);
    }

    #[tokio::test]
    async fn relevance_failure_is_inconclusive_and_answer_proceeds() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::Network("connection refused".into())),
            Ok("still answered".into()),
        ]));
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        let outcome = p.process_turn("question", Some("Alice"), &mut session).await;

        assert_eq!(notifier.attempts(), 0);
        assert_eq!(outcome.reply(), Some("still answered"));
    }

    #[tokio::test]
    async fn answer_failure_becomes_apologetic_string() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok("yes, relevant".into()),
            Err(ProviderError::ApiError {
                status_code: 500,
                message: "upstream down".into(),
            }),
        ]));
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        let outcome = p.process_turn("question", Some("Alice"), &mut session).await;

        let reply = outcome.reply().unwrap();
        assert!(reply.starts_with("Sorry, I encountered an error:"));
        assert_eq!(session.transcript.len(), 1);
        assert_eq!(session.transcript.turns()[0].answer, reply);
    }

    #[tokio::test]
    async fn owner_message_becomes_a_fact_without_llm_calls() {
        let provider = Arc::new(ScriptedProvider::none_scripted());
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        let outcome = p
            .process_turn("I shipped a Rust book in 2024", Some("David"), &mut session)
            .await;

        assert!(matches!(outcome, TurnOutcome::OwnerNote { .. }));
        assert_eq!(provider.calls(), 0);
        assert_eq!(notifier.attempts(), 0);
        assert!(!session.profile.is_placeholder());
        assert_eq!(
            session.profile.facts(),
            &["I shipped a Rust book in 2024".to_string()]
        );
        // The confirmation exchange is still visible in the chat panel.
        assert_eq!(session.transcript.len(), 1);
    }

    #[tokio::test]
    async fn owner_match_is_case_insensitive_and_trimmed() {
        let provider = Arc::new(ScriptedProvider::none_scripted());
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        let outcome = p
            .process_turn("another fact", Some("  david "), &mut session)
            .await;

        assert!(matches!(outcome, TurnOutcome::OwnerNote { .. }));
    }

    #[tokio::test]
    async fn empty_sender_is_never_the_owner() {
        let provider = Arc::new(ScriptedProvider::texts(&["yes", "answer"]));
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        let outcome = p.process_turn("question", Some("  "), &mut session).await;

        assert!(matches!(outcome, TurnOutcome::Answered { .. }));
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn missing_provider_yields_fallback_strings_and_no_notification() {
        let notifier = Arc::new(RecordingNotifier::new());
        let p = TurnProcessor::new(
            None,
            notifier.clone() as Arc<dyn Notifier>,
            "mock-model",
            "David",
        );
        let mut session = Session::new();

        let outcome = p.process_turn("question", Some("Alice"), &mut session).await;

        assert_eq!(outcome.reply(), Some(prompts::ANSWER_UNCONFIGURED));
        assert!(!outcome.notified());
        assert_eq!(notifier.attempts(), 0);
        assert_eq!(session.transcript.len(), 1);
    }

    #[tokio::test]
    async fn transcript_grows_by_exactly_one_per_submission() {
        let provider = Arc::new(ScriptedProvider::texts(&[
            "yes", "answer one", "yes", "answer two",
        ]));
        let notifier = Arc::new(RecordingNotifier::new());
        let p = processor(&provider, &notifier);
        let mut session = Session::new();

        p.process_turn("first", Some("Alice"), &mut session).await;
        assert_eq!(session.transcript.len(), 1);
        p.process_turn("second", Some("Alice"), &mut session).await;
        assert_eq!(session.transcript.len(), 2);
        assert_eq!(session.transcript.turns()[1].user_message, "second");
    }
}
