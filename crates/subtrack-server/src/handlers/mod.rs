//! HTTP request handlers organized by domain

pub mod subscriptions;

// Re-export all handlers for use in router
pub use subscriptions::*;
