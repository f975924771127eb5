//! Test utilities for subtrack-core
//!
//! An in-memory `SubscriptionStore` and small fixture builders, so services
//! can be exercised without SQLite.

use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::filter::SubscriptionFilter;
use crate::models::{NewSubscription, Subscription};
use crate::month::Month;
use crate::store::SubscriptionStore;

/// Parse `MM-YYYY`, panicking on bad fixtures
pub fn month(s: &str) -> Month {
    s.parse()
        .unwrap_or_else(|e| panic!("bad month fixture {:?}: {}", s, e))
}

/// Build a create/update payload
pub fn new_subscription(
    user_id: Uuid,
    service_name: &str,
    price: i64,
    start: &str,
    end: Option<&str>,
) -> NewSubscription {
    NewSubscription {
        service_name: service_name.to_string(),
        price,
        user_id,
        start: month(start),
        end: end.map(month),
    }
}

/// Build a stored subscription with a fresh id
pub fn subscription(
    user_id: Uuid,
    service_name: &str,
    price: i64,
    start: &str,
    end: Option<&str>,
) -> Subscription {
    let now = Utc::now();
    Subscription {
        id: Uuid::new_v4(),
        service_name: service_name.to_string(),
        price,
        user_id,
        start: month(start),
        end: end.map(month),
        created_at: now,
        updated_at: now,
    }
}

/// Vec-backed store; `fetch_candidates` applies the filter predicate directly
#[derive(Default)]
pub struct MemoryStore {
    subscriptions: Mutex<Vec<Subscription>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscription>> {
        self.subscriptions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SubscriptionStore for MemoryStore {
    fn fetch_candidates(&self, filter: &SubscriptionFilter<'_>) -> Result<Vec<Subscription>> {
        Ok(self
            .lock()
            .iter()
            .filter(|sub| filter.matches(sub))
            .cloned()
            .collect())
    }

    fn create(&self, new: &NewSubscription) -> Result<Subscription> {
        let now = Utc::now();
        let sub = Subscription {
            id: Uuid::new_v4(),
            service_name: new.service_name.clone(),
            price: new.price,
            user_id: new.user_id,
            start: new.start,
            end: new.end,
            created_at: now,
            updated_at: now,
        };
        self.lock().push(sub.clone());
        Ok(sub)
    }

    fn get(&self, id: Uuid) -> Result<Option<Subscription>> {
        Ok(self.lock().iter().find(|sub| sub.id == id).cloned())
    }

    fn update(&self, id: Uuid, changes: &NewSubscription) -> Result<Subscription> {
        let mut subs = self.lock();
        let sub = subs
            .iter_mut()
            .find(|sub| sub.id == id)
            .ok_or_else(|| Error::NotFound(format!("subscription {}", id)))?;
        sub.service_name = changes.service_name.clone();
        sub.price = changes.price;
        sub.user_id = changes.user_id;
        sub.start = changes.start;
        sub.end = changes.end;
        sub.updated_at = Utc::now();
        Ok(sub.clone())
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        let mut subs = self.lock();
        let before = subs.len();
        subs.retain(|sub| sub.id != id);
        if subs.len() == before {
            return Err(Error::NotFound(format!("subscription {}", id)));
        }
        Ok(())
    }
}
