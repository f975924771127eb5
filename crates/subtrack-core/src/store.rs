//! Persistence boundary for subscriptions

use uuid::Uuid;

use crate::error::Result;
use crate::filter::SubscriptionFilter;
use crate::models::{NewSubscription, Subscription};

/// Storage for subscriptions
///
/// Implemented by [`crate::db::Database`] and, for tests, by
/// `test_utils::MemoryStore`. Lookups of unknown ids in `update` and
/// `delete` return `Error::NotFound`.
pub trait SubscriptionStore: Send + Sync {
    /// All subscriptions selected by `filter`, in no particular order
    fn fetch_candidates(&self, filter: &SubscriptionFilter<'_>) -> Result<Vec<Subscription>>;

    /// Insert a new subscription and return the stored record
    fn create(&self, new: &NewSubscription) -> Result<Subscription>;

    fn get(&self, id: Uuid) -> Result<Option<Subscription>>;

    /// Replace the mutable fields; `id` and `created_at` are preserved
    fn update(&self, id: Uuid, changes: &NewSubscription) -> Result<Subscription>;

    fn delete(&self, id: Uuid) -> Result<()>;
}
