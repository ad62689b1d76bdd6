//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db, resolve_user)
//! - `prompts` - Prompt library management commands
//! - `quotes` - Daily quote command
//! - `reports` - Summary and insight reports
//! - `serve` - Web server command
//! - `transactions` - Transaction commands (list, add)
//! - `users` - User commands (add, list)

pub mod core;
pub mod prompts;
pub mod quotes;
pub mod reports;
pub mod serve;
pub mod transactions;
pub mod users;

// Re-export command functions for main.rs
pub use self::core::*;
pub use prompts::*;
pub use quotes::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;
pub use users::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
