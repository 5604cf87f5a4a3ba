//! `concierge status` — Show configuration status.

use concierge_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("🤖 Concierge Status");
    println!("===================");
    println!("  Config dir:  {}", AppConfig::config_dir().display());
    println!("  Provider:    {}", config.provider);
    println!("  Model:       {}", config.model);
    println!("  Owner:       {}", config.owner_name);
    println!(
        "  Gateway:     {}:{}",
        config.gateway.host, config.gateway.port
    );
    println!(
        "  LLM key:     {}",
        if config.has_api_key() || config.provider == "ollama" {
            "configured"
        } else {
            "missing (answers use the fallback message)"
        }
    );
    println!(
        "  Pushover:    {}",
        if config.pushover.is_configured() {
            "configured"
        } else {
            "missing (alerts are logged, not delivered)"
        }
    );

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file — run `concierge onboard` first");
    }

    Ok(())
}
