//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use lumen_core::NarrationBackend;

use super::open_pipeline;

pub async fn cmd_serve(
    data: Option<&Path>,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    allowed_origins: Vec<String>,
) -> Result<()> {
    let pipeline = open_pipeline(data)?;

    println!("🚀 Starting Lumen web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Dashboard: {}", dir.display());
    }
    if !allowed_origins.is_empty() {
        println!("   CORS origins: {}", allowed_origins.join(", "));
    }
    let client = pipeline.narrator().client();
    println!("   Narration: {} ({})", client.endpoint(), client.model());
    println!();
    println!("   Press Ctrl+C to stop");

    let static_dir = static_dir
        .map(|p| p.to_str().context("Static dir path must be valid UTF-8"))
        .transpose()?;

    let config = lumen_server::ServerConfig { allowed_origins };
    lumen_server::serve_with_config(pipeline, host, port, static_dir, config).await
}
