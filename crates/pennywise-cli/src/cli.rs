//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pennywise - Track income and expenses, get insights
#[derive(Parser)]
#[command(name = "pennywise")]
#[command(about = "Self-hosted personal finance tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "pennywise.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set PENNYWISE_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    ///
    /// Requires PENNYWISE_JWT_SECRET for signing login tokens.
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory of static files to serve alongside the API
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// List or record transactions
    Transactions {
        #[command(subcommand)]
        action: TransactionsAction,
    },

    /// Show income, expenses, savings rate, and spending by category
    Summary {
        /// User email
        #[arg(short, long)]
        user: String,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
    },

    /// Generate financial insights (AI when configured, rules otherwise)
    Insights {
        /// User email
        #[arg(short, long)]
        user: String,

        /// Start date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the daily financial quote
    Quote {
        /// Generate a new quote even if the current one is fresh
        #[arg(long)]
        refresh: bool,
    },

    /// Manage AI prompts
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// Register a local user
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// At least 6 characters
        #[arg(long)]
        password: String,
    },

    /// List registered users
    List,
}

#[derive(Subcommand)]
pub enum TransactionsAction {
    /// List a user's transactions, newest first
    List {
        /// User email
        #[arg(short, long)]
        user: String,

        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Record a transaction for a user
    Add {
        /// User email
        #[arg(short, long)]
        user: String,

        /// income or expense
        #[arg(long)]
        kind: String,

        /// Category valid for the kind (e.g. salary, groceries, rent)
        #[arg(long)]
        category: String,

        #[arg(long)]
        amount: f64,

        #[arg(long)]
        description: String,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (analyze_finances, daily_quote)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}
