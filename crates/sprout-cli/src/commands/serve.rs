//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};

use sprout_core::{catalog, Catalog};

pub async fn cmd_serve(
    data_dir: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🌱 Starting Sprout web server...");
    println!("   Data directory: {}", data_dir.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    // Extra CORS origins from environment (comma-separated)
    let allowed_origins: Vec<String> = std::env::var("SPROUT_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let mut config = sprout_server::ServerConfig::default();
    if !allowed_origins.is_empty() {
        println!(
            "   CORS origins: {} (SPROUT_ALLOWED_ORIGINS)",
            allowed_origins.join(", ")
        );
        config.allowed_origins = allowed_origins;
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let catalog = Catalog::load(data_dir).context("Failed to load catalog data")?;
    let profile =
        catalog::load_seed_profile(data_dir).context("Failed to load seed profile")?;

    let static_dir_str =
        static_dir.map(|p| p.to_str().expect("static_dir path must be valid UTF-8"));
    sprout_server::serve_with_config(
        catalog,
        profile,
        data_dir.to_path_buf(),
        host,
        port,
        static_dir_str,
        config,
    )
    .await?;

    Ok(())
}
