//! Status command

use std::path::Path;

use anyhow::Result;
use budgetwise_core::config::default_config_path;
use budgetwise_core::{AIBackend, GenerationConfig, Task};

use super::ai_from_env;

pub async fn cmd_status(config_path: Option<&Path>, generation: &GenerationConfig) -> Result<()> {
    println!();
    println!("📊 Budgetwise Status");
    println!("   ─────────────────────────────────────────────────────────────");

    let env_path = std::env::var("BUDGETWISE_CONFIG").ok();
    match (config_path, env_path.as_deref(), default_config_path()) {
        (Some(path), _, _) => println!("   Config: {}", path.display()),
        (None, Some(path), _) if !path.trim().is_empty() => {
            println!("   Config: {} (BUDGETWISE_CONFIG)", path.trim())
        }
        (None, _, Some(path)) if path.exists() => println!("   Config: {}", path.display()),
        _ => println!("   Config: built-in defaults"),
    }
    println!(
        "   Request timeout: {}s",
        generation.request_timeout.as_secs()
    );
    for task in Task::all() {
        let settings = generation.task(*task);
        println!(
            "   {:<16} max_tokens={} temperature={} structured={}",
            task.as_str(),
            settings.max_output_tokens,
            settings.temperature,
            settings.structured_output
        );
    }

    println!();
    match ai_from_env(generation) {
        Some(client) => {
            let info = client.info();
            println!("   Backend: {} ({})", info.backend, info.model);
            println!("   Host: {}", info.host);
            if client.health_check().await {
                println!("   ✅ Reachable");
            } else {
                println!("   ⚠️  Configured but not responding");
            }
        }
        None => {
            println!("   Backend: not configured");
            println!("   Set GEMINI_API_KEY to enable generated narratives, chat and explanations.");
        }
    }
    Ok(())
}
