//! Narration setup check

use std::io::Write;

use anyhow::{Context, Result};
use lumen_core::config::default_config_path;
use lumen_core::{resolve_credential, BackendKind, NarrationBackend, NarrationClient, NarrationConfig};

/// Show resolved config and credential, then ping the endpoint
pub async fn cmd_check() -> Result<()> {
    println!("🔍 Checking narration setup...\n");

    let config = NarrationConfig::load().context("Failed to load narration config")?;

    println!("  Backend:     {}", config.backend);
    println!("  Endpoint:    {}", config.url);
    println!("  Model:       {}", config.model);
    println!("  Timeout:     {}s", config.timeout.as_secs());
    println!(
        "  Sampling:    temperature {}, top_p {}, max_tokens {}",
        config.temperature, config.top_p, config.max_tokens
    );
    match default_config_path() {
        Some(path) if path.exists() => println!("  Override:    {}", path.display()),
        Some(path) => println!("  Override:    none ({} not found)", path.display()),
        None => println!("  Override:    (data directory not available)"),
    }

    let credential = resolve_credential();
    match &credential {
        Some(c) => println!("  API key:     {} from {}", c.redacted(), c.source()),
        None if config.backend == BackendKind::Mock => println!("  API key:     (not needed)"),
        None => {
            println!("  API key:     ⚠️  not configured");
            println!("\n  Answers will use built-in fallback narration. To enable the model:");
            println!("    export LUMEN_API_KEY=<your key>   (or GROQ_API_KEY, or a .env file)");
        }
    }
    println!();

    let client = NarrationClient::from_config(&config, credential)?;

    print!("Checking endpoint availability... ");
    std::io::stdout().flush()?;
    if client.health_check().await {
        println!("✅ Reachable");
    } else {
        println!("❌ Unreachable");
        println!("\n⚠️  Could not reach {}", client.endpoint());
        println!("   Set LUMEN_NARRATION_URL to point at another OpenAI-compatible server,");
        println!("   or LUMEN_BACKEND=mock for offline demos.");
    }

    Ok(())
}
