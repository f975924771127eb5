//! Subscription operations

use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;
use uuid::Uuid;

use super::Database;
use crate::error::{Error, Result};
use crate::filter::SubscriptionFilter;
use crate::models::{NewSubscription, Subscription, SubscriptionStats};
use crate::month::Month;
use crate::store::SubscriptionStore;

const SUBSCRIPTION_COLUMNS: &str =
    "s.id, s.service_name, s.price, s.user_id, s.start_month, s.end_month, s.created_at, s.updated_at";

fn conversion_error(
    index: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_uuid(row: &Row, index: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(index)?;
    Uuid::parse_str(&s).map_err(|e| conversion_error(index, e))
}

fn parse_month(s: &str, index: usize) -> rusqlite::Result<Month> {
    Month::from_date_string(s).map_err(|e| conversion_error(index, e))
}

/// `CURRENT_TIMESTAMP` text (`YYYY-MM-DD HH:MM:SS`, UTC)
fn parse_timestamp(row: &Row, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(index)?;
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .map_err(|e| conversion_error(index, e))
}

fn row_to_subscription(row: &Row) -> rusqlite::Result<Subscription> {
    let start_str: String = row.get(4)?;
    let end_str: Option<String> = row.get(5)?;

    Ok(Subscription {
        id: parse_uuid(row, 0)?,
        service_name: row.get(1)?,
        price: row.get(2)?,
        user_id: parse_uuid(row, 3)?,
        start: parse_month(&start_str, 4)?,
        end: end_str.as_deref().map(|s| parse_month(s, 5)).transpose()?,
        created_at: parse_timestamp(row, 6)?,
        updated_at: parse_timestamp(row, 7)?,
    })
}

impl Database {
    /// Insert a subscription with a freshly generated id
    pub fn create_subscription(&self, new: &NewSubscription) -> Result<Subscription> {
        let conn = self.conn()?;
        let id = Uuid::new_v4();

        conn.execute(
            r#"
            INSERT INTO subscriptions (id, user_id, service_name, price, start_month, end_month)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
            params![
                id.to_string(),
                new.user_id.to_string(),
                new.service_name,
                new.price,
                new.start.to_date_string(),
                new.end.map(|m| m.to_date_string()),
            ],
        )?;

        self.get_subscription(id)?
            .ok_or_else(|| Error::NotFound(format!("subscription {}", id)))
    }

    /// Get a subscription by id
    pub fn get_subscription(&self, id: Uuid) -> Result<Option<Subscription>> {
        let conn = self.conn()?;
        let sub = conn
            .query_row(
                &format!(
                    "SELECT {} FROM subscriptions s WHERE s.id = ?",
                    SUBSCRIPTION_COLUMNS
                ),
                params![id.to_string()],
                row_to_subscription,
            )
            .optional()?;
        Ok(sub)
    }

    /// Replace the mutable fields of a subscription and bump `updated_at`
    pub fn update_subscription(&self, id: Uuid, changes: &NewSubscription) -> Result<Subscription> {
        let conn = self.conn()?;
        let updated = conn.execute(
            r#"
            UPDATE subscriptions
            SET user_id = ?, service_name = ?, price = ?, start_month = ?, end_month = ?,
                updated_at = CURRENT_TIMESTAMP
            WHERE id = ?
            "#,
            params![
                changes.user_id.to_string(),
                changes.service_name,
                changes.price,
                changes.start.to_date_string(),
                changes.end.map(|m| m.to_date_string()),
                id.to_string(),
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("subscription {}", id)));
        }

        self.get_subscription(id)?
            .ok_or_else(|| Error::NotFound(format!("subscription {}", id)))
    }

    /// Delete a subscription
    pub fn delete_subscription(&self, id: Uuid) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM subscriptions WHERE id = ?",
            params![id.to_string()],
        )?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("subscription {}", id)));
        }
        Ok(())
    }

    /// Subscriptions selected by `filter`, in listing order
    pub fn find_subscriptions(&self, filter: &SubscriptionFilter<'_>) -> Result<Vec<Subscription>> {
        let conn = self.conn()?;
        let sql = filter.to_sql();

        let query = format!(
            "SELECT {} FROM subscriptions s {} {}",
            SUBSCRIPTION_COLUMNS, sql.where_clause, sql.order_clause
        );

        let mut stmt = conn.prepare(&query)?;
        let subscriptions = stmt
            .query_map(sql.params_refs().as_slice(), row_to_subscription)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(count = subscriptions.len(), "Loaded subscriptions");
        Ok(subscriptions)
    }

    /// Totals across every user, for `subtrack status`
    pub fn subscription_stats(&self) -> Result<SubscriptionStats> {
        let conn = self.conn()?;
        let (total, users, ongoing, earliest): (i64, i64, i64, Option<String>) = conn.query_row(
            r#"
            SELECT COUNT(*),
                   COUNT(DISTINCT user_id),
                   COALESCE(SUM(end_month IS NULL), 0),
                   MIN(start_month)
            FROM subscriptions
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
        )?;

        Ok(SubscriptionStats {
            total,
            users,
            ongoing,
            earliest_start: earliest
                .as_deref()
                .map(Month::from_date_string)
                .transpose()?,
        })
    }
}

impl SubscriptionStore for Database {
    fn fetch_candidates(&self, filter: &SubscriptionFilter<'_>) -> Result<Vec<Subscription>> {
        self.find_subscriptions(filter)
    }

    fn create(&self, new: &NewSubscription) -> Result<Subscription> {
        self.create_subscription(new)
    }

    fn get(&self, id: Uuid) -> Result<Option<Subscription>> {
        self.get_subscription(id)
    }

    fn update(&self, id: Uuid, changes: &NewSubscription) -> Result<Subscription> {
        self.update_subscription(id, changes)
    }

    fn delete(&self, id: Uuid) -> Result<()> {
        self.delete_subscription(id)
    }
}
