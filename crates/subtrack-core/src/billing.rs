//! Month-by-month cost aggregation
//!
//! Billing model: within a calendar month, overlapping subscriptions to the
//! same service are billed once at the highest price; different services are
//! billed independently. The total for a window is the sum over its months.
//!
//! The pipeline has three stages:
//! 1. `expand` - one subscription into the months it covers
//! 2. `monthly_costs` - max per (month, service), summed per month
//! 3. `summarize` - fold the monthly totals into one number

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{MonthlyCost, Subscription};
use crate::month::{Month, MonthInterval, MonthRange, MonthWindow};

/// Months covered by an interval, through `as_of` when open-ended
pub fn expand(interval: &MonthInterval, as_of: Month) -> MonthRange {
    MonthRange::new(interval.start, interval.resolved_end(as_of))
}

/// Cost per month for a set of candidate subscriptions
///
/// An absent window end resolves to `as_of`, so nothing after the current
/// month is billed. Months with no active subscription are omitted.
pub fn monthly_costs(
    candidates: &[Subscription],
    window: &MonthWindow,
    as_of: Month,
) -> BTreeMap<Month, i64> {
    let window = window.with_end_or(as_of);

    let mut service_max: BTreeMap<(Month, &str), i64> = BTreeMap::new();
    for sub in candidates {
        for month in expand(&sub.interval(), as_of).clip(&window) {
            let price = service_max
                .entry((month, sub.service_name.as_str()))
                .or_insert(sub.price);
            if sub.price > *price {
                *price = sub.price;
            }
        }
    }

    let mut totals: BTreeMap<Month, i64> = BTreeMap::new();
    for ((month, _service), price) in service_max {
        let total = totals.entry(month).or_insert(0);
        *total = total.saturating_add(price);
    }

    debug!(
        candidates = candidates.len(),
        months = totals.len(),
        "Aggregated monthly costs"
    );
    totals
}

/// Total over all months; zero for an empty mapping
pub fn summarize(costs: &BTreeMap<Month, i64>) -> i64 {
    costs.values().fold(0i64, |acc, cost| acc.saturating_add(*cost))
}

/// Flatten the mapping into ascending entries
pub fn to_entries(costs: &BTreeMap<Month, i64>) -> Vec<MonthlyCost> {
    costs
        .iter()
        .map(|(month, cost)| MonthlyCost {
            month: *month,
            cost: *cost,
        })
        .collect()
}
