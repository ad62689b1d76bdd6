//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use pennywise_server::ServerConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
) -> Result<()> {
    let config = ServerConfig::from_env().context("Server configuration is incomplete")?;

    println!("🚀 Starting Pennywise web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }
    println!(
        "   🔑 Token lifetime: {} hours ({})",
        config.token_ttl_hours,
        pennywise_server::TOKEN_TTL_ENV
    );
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 CORS origins: {} ({})",
            config.allowed_origins.join(", "),
            pennywise_server::ALLOWED_ORIGINS_ENV
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let static_dir_str = match static_dir {
        Some(p) => Some(p.to_str().context("static_dir path must be valid UTF-8")?),
        None => None,
    };
    pennywise_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
