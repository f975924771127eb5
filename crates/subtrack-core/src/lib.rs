//! SubTrack Core Library
//!
//! Shared functionality for the SubTrack subscription tracker:
//! - Calendar-month arithmetic and intervals
//! - Per-month cost aggregation over subscriptions
//! - Subscription filtering, ordering and pagination
//! - Database access and migrations

pub mod billing;
pub mod clock;
pub mod db;
pub mod error;
pub mod filter;
pub mod models;
pub mod month;
pub mod service;
pub mod store;

/// Test utilities including an in-memory store
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::Database;
pub use error::{Error, Result};
pub use filter::{Pagination, SubscriptionFilter, SubscriptionQuery};
pub use models::{
    MonthlyCost, NewSubscription, Subscription, SubscriptionPage, SubscriptionStats,
};
pub use month::{Month, MonthInterval, MonthRange, MonthWindow};
pub use service::SubscriptionService;
pub use store::SubscriptionStore;
