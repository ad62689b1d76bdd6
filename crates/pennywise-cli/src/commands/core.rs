//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `resolve_user` - Look up the user a command acts for
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use pennywise_core::db::Database;
use pennywise_core::models::User;
use tracing::debug;

/// Open database with encryption by default, or unencrypted if --no-encrypt
pub fn open_db(db_path: &Path, no_encrypt: bool) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .context("Database path must be valid UTF-8")?;
    debug!("Opening database at {} (encrypted: {})", path_str, !no_encrypt);
    if no_encrypt {
        Database::new_unencrypted(path_str).context("Failed to open database (unencrypted)")
    } else {
        Database::new(path_str).context("Failed to open database")
    }
}

/// Find a user by email or explain how to create one
pub fn resolve_user(db: &Database, email: &str) -> Result<User> {
    db.get_user_by_email(email)?.ok_or_else(|| {
        anyhow::anyhow!(
            "No user with email {}. Create one with: pennywise users add --name <NAME> --email {} --password <PASSWORD>",
            email,
            email
        )
    })
}

pub fn cmd_init(db_path: &Path, no_encrypt: bool) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path, no_encrypt)?;
    let users = db.list_users().context("Failed to read users")?;
    println!("   Schema ready ({} users)", users.len());

    if no_encrypt || !db.is_encrypted()? {
        println!("   ⚠️  Encryption: DISABLED");
    } else {
        println!("   🔒 Encryption: ENABLED");
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a user: pennywise users add --name Ada --email ada@example.com --password ...");
    println!("  2. Start the API: pennywise serve");

    Ok(())
}
