//! Prompt templates and fixed reply strings.
//!
//! The relevance fallback strings must contain neither "yes" nor "no":
//! the irrelevance verdict is a substring check over the reply, and a
//! failed or unconfigured check has to read as inconclusive.

/// Template for the relevance-check call (token cap 100 by default).
pub fn relevance_prompt(grounding: &str, request: &str) -> String {
    format!(
        "Profile context: {grounding}\n\n\
         Request: {request}\n\n\
         Is this request relevant to the profile context? \
         Reply 'yes' or 'no' and explain why."
    )
}

/// Template for the answer call (token cap 300 by default).
pub fn answer_prompt(grounding: &str, request: &str) -> String {
    format!(
        "Profile context: {grounding}\n\n\
         User request: {request}\n\n\
         Answer the request as best as possible based on the profile context. \
         If the information is available in the context, use it; otherwise say so politely."
    )
}

/// Relevance reply when the provider is missing. Reads as inconclusive.
pub const RELEVANCE_UNAVAILABLE: &str = "Relevance check skipped: missing API key";

/// Relevance reply when the provider call fails. Reads as inconclusive.
pub const RELEVANCE_FAILED: &str = "Relevance check failed";

/// Answer shown when the provider is missing.
pub const ANSWER_UNCONFIGURED: &str =
    "No language model API key is configured. Ask the owner to set OPENAI_API_KEY \
     (or api_key in config.toml) to enable answers.";

/// Answer shown when the provider call fails.
pub fn answer_error(error: &impl std::fmt::Display) -> String {
    format!("Sorry, I encountered an error: {error}")
}

/// Reply to the owner after a dictated fact is stored.
pub fn owner_confirmation(owner_name: &str) -> String {
    format!("Got it, {owner_name}. I've added that to your profile context.")
}

/// Body of the push alert fired for an irrelevant request.
pub fn irrelevant_alert(request: &str, relevance: &str) -> String {
    format!(
        "\u{1F6A8} Irrelevant info request detected!\n\n\
         Request: {request}\n\n\
         Relevance check: {relevance}"
    )
}

/// Title of every push alert.
pub const ALERT_TITLE: &str = "Concierge Alert";
