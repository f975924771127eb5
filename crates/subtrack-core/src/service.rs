//! Subscription queries and writes over an injected store and clock
//!
//! `SubscriptionService` borrows its collaborators for the duration of a
//! request; it holds no state between calls.

use std::collections::BTreeMap;

use tracing::{debug, info};
use uuid::Uuid;

use crate::billing;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::filter::{listing_order, Pagination, SubscriptionFilter};
use crate::models::{MonthlyCost, NewSubscription, Subscription, SubscriptionPage};
use crate::month::Month;
use crate::store::SubscriptionStore;

pub struct SubscriptionService<'a, S: ?Sized, C: ?Sized> {
    store: &'a S,
    clock: &'a C,
}

impl<'a, S, C> SubscriptionService<'a, S, C>
where
    S: SubscriptionStore + ?Sized,
    C: Clock + ?Sized,
{
    pub fn new(store: &'a S, clock: &'a C) -> Self {
        Self { store, clock }
    }

    /// Validate and store a new subscription
    pub fn create(&self, new: &NewSubscription) -> Result<Subscription> {
        new.validate()?;
        let sub = self.store.create(new)?;
        info!(
            subscription_id = %sub.id,
            user_id = %sub.user_id,
            service = %sub.service_name,
            "Subscription created"
        );
        Ok(sub)
    }

    pub fn get(&self, id: Uuid) -> Result<Subscription> {
        self.store
            .get(id)?
            .ok_or_else(|| Error::NotFound(format!("subscription {}", id)))
    }

    /// Validate and replace the mutable fields of an existing subscription
    pub fn update(&self, id: Uuid, changes: &NewSubscription) -> Result<Subscription> {
        changes.validate()?;
        let sub = self.store.update(id, changes)?;
        info!(subscription_id = %id, "Subscription updated");
        Ok(sub)
    }

    pub fn delete(&self, id: Uuid) -> Result<()> {
        self.store.delete(id)?;
        info!(subscription_id = %id, "Subscription deleted");
        Ok(())
    }

    /// One ordered page of matching subscriptions
    ///
    /// Ordering happens before pagination; `total` counts every match.
    pub fn list(
        &self,
        filter: &SubscriptionFilter<'_>,
        pagination: Pagination,
    ) -> Result<SubscriptionPage> {
        let mut candidates = self.candidates(filter)?;
        candidates.sort_by(listing_order);
        let total = candidates.len() as i64;

        Ok(SubscriptionPage {
            subscriptions: pagination.apply(candidates),
            total,
            limit: pagination.limit,
            offset: pagination.offset,
        })
    }

    /// Total billed across the filter's window
    pub fn sum(&self, filter: &SubscriptionFilter<'_>) -> Result<i64> {
        Ok(billing::summarize(&self.costs_by_month(filter)?))
    }

    /// Per-month costs behind `sum`, ascending by month
    pub fn monthly(&self, filter: &SubscriptionFilter<'_>) -> Result<Vec<MonthlyCost>> {
        Ok(billing::to_entries(&self.costs_by_month(filter)?))
    }

    fn costs_by_month(&self, filter: &SubscriptionFilter<'_>) -> Result<BTreeMap<Month, i64>> {
        let as_of = self.clock.current_month();
        let window = filter.window.with_end_or(as_of);
        let filter = filter.window(window);

        let candidates = self.candidates(&filter)?;
        Ok(billing::monthly_costs(&candidates, &window, as_of))
    }

    fn candidates(&self, filter: &SubscriptionFilter<'_>) -> Result<Vec<Subscription>> {
        if filter.window.is_empty() {
            debug!(user_id = %filter.user_id, "Inverted window, no candidates");
            return Ok(Vec::new());
        }

        let mut candidates = self.store.fetch_candidates(filter)?;
        candidates.retain(|sub| filter.matches(sub));
        debug!(
            user_id = %filter.user_id,
            service = ?filter.service_name,
            count = candidates.len(),
            "Fetched candidate subscriptions"
        );
        Ok(candidates)
    }
}
