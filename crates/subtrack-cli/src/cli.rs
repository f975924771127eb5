//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// SubTrack - Track what your subscriptions cost
#[derive(Parser)]
#[command(name = "subtrack")]
#[command(about = "Self-hosted subscription cost tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "subtrack.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set SUBTRACK_DB_KEY environment variable with your passphrase.
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

    /// Show database status
    Status,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Manage subscriptions (add, list, sum, show, update, delete)
    Subscriptions {
        #[command(subcommand)]
        action: SubscriptionsAction,
    },
}

#[derive(Subcommand)]
pub enum SubscriptionsAction {
    /// Record a subscription
    Add {
        /// Owner's user id (UUID)
        #[arg(short, long)]
        user: String,

        /// Service name (case-sensitive)
        #[arg(short, long)]
        service: String,

        /// Monthly price in the smallest currency unit
        #[arg(short, long)]
        price: i64,

        /// First active month (MM-YYYY)
        #[arg(long)]
        start: String,

        /// Last active month (MM-YYYY); omit for an ongoing subscription
        #[arg(long)]
        end: Option<String>,
    },

    /// List a user's subscriptions
    List {
        /// Owner's user id (UUID)
        #[arg(short, long)]
        user: String,

        /// Only this service (exact match)
        #[arg(short, long)]
        service: Option<String>,

        /// Window start (MM-YYYY)
        #[arg(long)]
        from: Option<String>,

        /// Window end (MM-YYYY)
        #[arg(long)]
        to: Option<String>,

        /// Page size (1-100, anything else falls back to 10)
        #[arg(short, long, allow_negative_numbers = true)]
        limit: Option<i64>,

        /// Number of subscriptions to skip (negative counts as 0)
        #[arg(long, allow_negative_numbers = true)]
        offset: Option<i64>,
    },

    /// Total cost of a user's subscriptions over a window
    Sum {
        /// Owner's user id (UUID)
        #[arg(short, long)]
        user: String,

        /// Only this service (exact match)
        #[arg(short, long)]
        service: Option<String>,

        /// Window start (MM-YYYY)
        #[arg(long)]
        from: Option<String>,

        /// Window end (MM-YYYY, defaults to the current month)
        #[arg(long)]
        to: Option<String>,

        /// Show the per-month breakdown
        #[arg(long)]
        monthly: bool,
    },

    /// Show a single subscription
    Show {
        /// Subscription id (UUID)
        id: String,
    },

    /// Change fields of a subscription
    Update {
        /// Subscription id (UUID)
        id: String,

        /// New owner's user id (UUID)
        #[arg(short, long)]
        user: Option<String>,

        /// New service name
        #[arg(short, long)]
        service: Option<String>,

        /// New monthly price
        #[arg(short, long)]
        price: Option<i64>,

        /// New first active month (MM-YYYY)
        #[arg(long)]
        start: Option<String>,

        /// New last active month (MM-YYYY)
        #[arg(long, conflicts_with = "ongoing")]
        end: Option<String>,

        /// Clear the end month
        #[arg(long)]
        ongoing: bool,
    },

    /// Delete a subscription
    Delete {
        /// Subscription id (UUID)
        id: String,
    },
}
