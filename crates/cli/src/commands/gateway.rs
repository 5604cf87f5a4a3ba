//! `concierge gateway` — Start the web UI and HTTP API server.

use concierge_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🤖 Concierge Gateway");
    println!(
        "   Open http://{}:{} in a browser",
        config.gateway.host, config.gateway.port
    );
    if config.api_key.is_none() && config.provider != "ollama" {
        println!("   ⚠️  No LLM API key configured — answers will use the fallback message");
    }
    if !config.pushover.is_configured() {
        println!("   ⚠️  Pushover credentials missing — alerts will be logged, not delivered");
    }

    concierge_gateway::start(config).await?;

    Ok(())
}
