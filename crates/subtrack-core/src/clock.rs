//! Source of "now" at month granularity
//!
//! The current month bounds open-ended subscriptions and fills in an absent
//! query end when summing. It is injected so tests can pin it.

use chrono::Utc;

use crate::month::Month;

pub trait Clock: Send + Sync {
    /// The month treated as "now"
    fn current_month(&self) -> Month;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_month(&self) -> Month {
        Month::from_date(Utc::now().date_naive())
    }
}

/// Clock pinned to a single month
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Month);

impl Clock for FixedClock {
    fn current_month(&self) -> Month {
        self.0
    }
}
