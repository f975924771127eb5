//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `serve` - Web server command
//! - `status` - Status command
//! - `subscriptions` - Subscription management and cost queries

pub mod core;
pub mod serve;
pub mod status;
pub mod subscriptions;

// Re-export command functions for main.rs
pub use core::*;
pub use serve::*;
pub use status::*;
pub use subscriptions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
