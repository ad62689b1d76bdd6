//! Pennywise CLI - Personal finance tracker
//!
//! Usage:
//!   pennywise init                               Initialize database
//!   pennywise users add --name N --email E ...   Register a user
//!   pennywise summary --user E                   Show totals for a user
//!   pennywise insights --user E                  Generate financial insights
//!   pennywise serve --port 3000                  Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => {
            commands::cmd_serve(&cli.db, &host, port, cli.no_encrypt, static_dir.as_deref())
                .await
        }
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add {
                    name,
                    email,
                    password,
                }) => commands::cmd_users_add(&db, &name, &email, &password),
            }
        }
        Commands::Transactions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                TransactionsAction::List { user, limit } => {
                    commands::cmd_transactions_list(&db, &user, limit)
                }
                TransactionsAction::Add {
                    user,
                    kind,
                    category,
                    amount,
                    description,
                    date,
                    notes,
                } => commands::cmd_transactions_add(
                    &db,
                    &user,
                    &kind,
                    &category,
                    amount,
                    &description,
                    date.as_deref(),
                    notes,
                ),
            }
        }
        Commands::Summary { user, from, to } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_summary(&db, &user, from.as_deref(), to.as_deref())
        }
        Commands::Insights {
            user,
            from,
            to,
            json,
        } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let generator = commands::insight_generator_from_env();
            commands::cmd_insights(&db, &generator, &user, from.as_deref(), to.as_deref(), json)
                .await
        }
        Commands::Quote { refresh } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_quote(&db, pennywise_core::AIClient::from_env(), refresh).await
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
    }
}
