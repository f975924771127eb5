//! Domain models for SubTrack

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::month::{Month, MonthInterval};

/// A user's recurring subscription to a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: Uuid,
    /// Case-sensitive service name ("Netflix" and "netflix" are distinct)
    pub service_name: String,
    /// Monthly price in the smallest currency unit
    pub price: i64,
    pub user_id: Uuid,
    /// First active month (inclusive)
    #[serde(rename = "start_date")]
    pub start: Month,
    /// Last active month (inclusive); `None` while the subscription is ongoing
    #[serde(rename = "end_date")]
    pub end: Option<Month>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Subscription {
    /// The subscription's active span
    pub fn interval(&self) -> MonthInterval {
        MonthInterval {
            start: self.start,
            end: self.end,
        }
    }
}

/// Input for creating or replacing a subscription
///
/// Identity and timestamps are assigned by the store and cannot be supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubscription {
    pub service_name: String,
    pub price: i64,
    pub user_id: Uuid,
    #[serde(rename = "start_date")]
    pub start: Month,
    #[serde(rename = "end_date", default)]
    pub end: Option<Month>,
}

impl NewSubscription {
    /// Check field invariants before anything is written
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(Error::InvalidData(
                "service_name must not be empty".to_string(),
            ));
        }
        if self.price < 0 {
            return Err(Error::InvalidData(format!(
                "price must be non-negative, got {}",
                self.price
            )));
        }
        if self.user_id.is_nil() {
            return Err(Error::InvalidData("user_id must not be nil".to_string()));
        }
        MonthInterval::new(self.start, self.end)?;
        Ok(())
    }
}

/// Store-wide counts across all users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubscriptionStats {
    pub total: i64,
    /// Distinct user ids
    pub users: i64,
    /// Subscriptions without an end month
    pub ongoing: i64,
    pub earliest_start: Option<Month>,
}

impl SubscriptionStats {
    pub fn ended(&self) -> i64 {
        self.total - self.ongoing
    }
}

/// Cost billed for one calendar month (derived, never stored)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCost {
    pub month: Month,
    pub cost: i64,
}

/// One page of a subscription listing
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionPage {
    pub subscriptions: Vec<Subscription>,
    /// Number of matches before pagination
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_sub() -> NewSubscription {
        NewSubscription {
            service_name: "Netflix".to_string(),
            price: 500,
            user_id: Uuid::new_v4(),
            start: "01-2025".parse().unwrap(),
            end: None,
        }
    }

    #[test]
    fn test_validate_accepts_open_subscription() {
        assert!(new_sub().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut sub = new_sub();
        sub.price = -1;
        assert!(matches!(sub.validate().unwrap_err(), Error::InvalidData(_)));

        let mut sub = new_sub();
        sub.service_name = "   ".to_string();
        assert!(sub.validate().is_err());

        let mut sub = new_sub();
        sub.end = Some("12-2024".parse().unwrap());
        assert!(sub.validate().is_err());

        let mut sub = new_sub();
        sub.user_id = Uuid::nil();
        assert!(sub.validate().is_err());
    }

    #[test]
    fn test_new_subscription_json_shape() {
        let json = serde_json::json!({
            "service_name": "Yandex Plus",
            "price": 400,
            "user_id": "60601fee-2bf1-4721-ae6f-7636e79a0cba",
            "start_date": "07-2025"
        });
        let sub: NewSubscription = serde_json::from_value(json).unwrap();
        assert_eq!(sub.start.to_string(), "07-2025");
        assert!(sub.end.is_none());
    }
}
