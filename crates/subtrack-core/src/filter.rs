//! Subscription selection, ordering and pagination
//!
//! A `SubscriptionFilter` is the single definition of "which subscriptions
//! does this query see". Stores translate it to their own query language
//! (see `db::subscription_filter` for SQL), and the service re-checks every
//! candidate with `matches` so the predicate does not depend on the store.

use std::cmp::Ordering;

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::Subscription;
use crate::month::{Month, MonthWindow};

/// Page size used when the requested limit is out of range
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size honored as given
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Selection criteria for one user's subscriptions
///
/// The lifetime `'query` is how long the borrowed service name must live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionFilter<'query> {
    pub user_id: Uuid,
    /// Exact, case-sensitive match
    pub service_name: Option<&'query str>,
    pub window: MonthWindow,
}

impl<'query> SubscriptionFilter<'query> {
    /// Every subscription belonging to `user_id`
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            service_name: None,
            window: MonthWindow::unbounded(),
        }
    }

    /// Set service name filter
    pub fn service_name(mut self, name: Option<&'query str>) -> Self {
        self.service_name = name;
        self
    }

    /// Set overlap window
    pub fn window(mut self, window: MonthWindow) -> Self {
        self.window = window;
        self
    }

    /// Whether a subscription is selected by this filter
    pub fn matches(&self, sub: &Subscription) -> bool {
        sub.user_id == self.user_id
            && self
                .service_name
                .map_or(true, |name| sub.service_name == name)
            && sub.interval().overlaps(&self.window)
    }
}

/// Owned, validated query parameters as received at a boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionQuery {
    pub user_id: Uuid,
    pub service_name: Option<String>,
    pub window: MonthWindow,
}

impl SubscriptionQuery {
    /// Parse raw text parameters
    ///
    /// An empty service name means "no filter". Months use `MM-YYYY`.
    pub fn parse(
        user_id: &str,
        service_name: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self> {
        let user_id = Uuid::parse_str(user_id.trim())
            .map_err(|_| Error::InvalidData("invalid user_id".to_string()))?;

        let start = parse_optional_month(start, "start_date")?;
        let end = parse_optional_month(end, "end_date")?;

        Ok(Self {
            user_id,
            service_name: service_name
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string()),
            window: MonthWindow::new(start, end),
        })
    }

    /// Borrow as a filter
    pub fn filter(&self) -> SubscriptionFilter<'_> {
        SubscriptionFilter::for_user(self.user_id)
            .service_name(self.service_name.as_deref())
            .window(self.window)
    }
}

fn parse_optional_month(value: Option<&str>, field: &str) -> Result<Option<Month>> {
    match value.map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => s
            .parse::<Month>()
            .map(Some)
            .map_err(|_| Error::InvalidData(format!("invalid {}", field))),
        None => Ok(None),
    }
}

/// Listing order: start month, then service name, then id
pub fn listing_order(a: &Subscription, b: &Subscription) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| a.service_name.cmp(&b.service_name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Effective limit/offset after clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Clamp requested values: a limit outside 1..=100 falls back to the
    /// default, an offset below 1 becomes 0
    pub fn clamped(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(l) if (1..=MAX_PAGE_LIMIT).contains(&l) => l,
            _ => DEFAULT_PAGE_LIMIT,
        };
        let offset = match offset {
            Some(o) if o >= 1 => o,
            _ => 0,
        };
        Self { limit, offset }
    }

    /// Take this page out of an already ordered list
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .skip(self.offset as usize)
            .take(self.limit as usize)
            .collect()
    }
}
