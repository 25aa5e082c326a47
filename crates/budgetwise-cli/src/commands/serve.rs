//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use budgetwise_core::GenerationConfig;
use budgetwise_server::ServerConfig;

pub async fn cmd_serve(
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    generation: GenerationConfig,
) -> Result<()> {
    println!("🚀 Starting Budgetwise web server...");
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = ServerConfig::from_env();
    if config.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only (set BUDGETWISE_ALLOWED_ORIGINS to allow more)");
    } else {
        println!("   🌐 CORS origins: {}", config.allowed_origins.join(", "));
    }
    println!(
        "   ⏱️  Narrative timeout: {}s",
        generation.request_timeout.as_secs()
    );
    println!();

    let static_dir = static_dir.map(|d| d.to_string_lossy().into_owned());
    budgetwise_server::serve_with_config(host, port, static_dir.as_deref(), config, generation)
        .await
        .context("Server failed")
}
