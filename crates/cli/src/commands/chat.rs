//! `concierge chat` — Run one message through the turn sequence.
//!
//! Creates a fresh session, so the profile context is the placeholder
//! unless the message itself is owner dictation. Useful for smoke-testing
//! credentials without starting the gateway.

use std::sync::Arc;

use concierge_assistant::{TurnOutcome, TurnProcessor};
use concierge_config::AppConfig;
use concierge_core::session::Session;
use concierge_notify::PushoverNotifier;

pub async fn run(message: String, name: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = concierge_providers::build_from_config(&config)?;
    let notifier = Arc::new(PushoverNotifier::from_config(&config.pushover));
    let processor = TurnProcessor::from_config(provider, notifier, &config);

    let mut session = Session::new();
    let outcome = processor
        .process_turn(&message, name.as_deref(), &mut session)
        .await;

    match outcome {
        TurnOutcome::Ignored => println!("(blank message, nothing to do)"),
        TurnOutcome::OwnerNote { reply } => println!("{reply}"),
        TurnOutcome::Answered { answer, notified } => {
            println!("{answer}");
            if notified {
                eprintln!("\n[alert] Push notification sent to the owner");
            }
        }
    }

    Ok(())
}
