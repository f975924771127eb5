//! SubTrack CLI - Subscription cost tracker
//!
//! Usage:
//!   subtrack init                                   Initialize database
//!   subtrack subscriptions add --user U --service S --price P --start MM-YYYY
//!   subtrack subscriptions sum --user U --from MM-YYYY --to MM-YYYY
//!   subtrack serve --port 3000                      Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use subtrack_core::SystemClock;
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
        Commands::Status => commands::cmd_status(&cli.db, cli.no_encrypt),
        Commands::Serve { port, host } => {
            commands::cmd_serve(&cli.db, &host, port, cli.no_encrypt).await
        }
        Commands::Subscriptions { action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let clock = SystemClock;
            match action {
                SubscriptionsAction::Add {
                    user,
                    service,
                    price,
                    start,
                    end,
                } => commands::cmd_subscriptions_add(
                    &db,
                    &clock,
                    &user,
                    &service,
                    price,
                    &start,
                    end.as_deref(),
                ),
                SubscriptionsAction::List {
                    user,
                    service,
                    from,
                    to,
                    limit,
                    offset,
                } => commands::cmd_subscriptions_list(
                    &db,
                    &clock,
                    &user,
                    service.as_deref(),
                    from.as_deref(),
                    to.as_deref(),
                    limit,
                    offset,
                ),
                SubscriptionsAction::Sum {
                    user,
                    service,
                    from,
                    to,
                    monthly,
                } => commands::cmd_subscriptions_sum(
                    &db,
                    &clock,
                    &user,
                    service.as_deref(),
                    from.as_deref(),
                    to.as_deref(),
                    monthly,
                ),
                SubscriptionsAction::Show { id } => {
                    commands::cmd_subscriptions_show(&db, &clock, &id)
                }
                SubscriptionsAction::Update {
                    id,
                    user,
                    service,
                    price,
                    start,
                    end,
                    ongoing,
                } => commands::cmd_subscriptions_update(
                    &db,
                    &clock,
                    &id,
                    commands::SubscriptionChanges {
                        user: user.as_deref(),
                        service: service.as_deref(),
                        price,
                        start: start.as_deref(),
                        end: end.as_deref(),
                        ongoing,
                    },
                ),
                SubscriptionsAction::Delete { id } => {
                    commands::cmd_subscriptions_delete(&db, &clock, &id)
                }
            }
        }
    }
}
