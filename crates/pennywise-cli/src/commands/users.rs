//! User command implementations

use anyhow::Result;
use pennywise_core::auth::register_user;
use pennywise_core::db::Database;
use pennywise_core::models::NewUser;

pub fn cmd_users_add(db: &Database, name: &str, email: &str, password: &str) -> Result<()> {
    let user = register_user(
        db,
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        },
    )?;

    println!("✅ Registered user {} <{}> (id {})", user.name, user.email, user.id);
    Ok(())
}

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Add one with:");
        println!("  pennywise users add --name Ada --email ada@example.com --password ...");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────────────────────────────────────");
    for user in users {
        println!(
            "   [{}] {} <{}> │ since {}",
            user.id,
            user.name,
            user.email,
            user.created_at.format("%Y-%m-%d")
        );
    }

    Ok(())
}
