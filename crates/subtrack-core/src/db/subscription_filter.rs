//! SQL translation of `SubscriptionFilter`
//!
//! Produces the WHERE/ORDER BY fragments and bound parameters for the
//! select in `subscriptions`.

use crate::filter::SubscriptionFilter;

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: &'static str,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl SubscriptionFilter<'_> {
    /// Build the filter components
    ///
    /// Window overlap mirrors `MonthInterval::overlaps`: an open end never
    /// falls before the window start.
    pub fn to_sql(&self) -> FilterResult {
        let mut conditions = vec!["s.user_id = ?".to_string()];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(self.user_id.to_string())];

        // Exact match; SQLite's default BINARY collation keeps it case-sensitive
        if let Some(name) = self.service_name {
            conditions.push("s.service_name = ?".to_string());
            params.push(Box::new(name.to_string()));
        }

        if self.window.is_empty() {
            conditions.push("0 = 1".to_string());
        } else {
            if let Some(end) = self.window.end {
                conditions.push("s.start_month <= ?".to_string());
                params.push(Box::new(end.to_date_string()));
            }
            if let Some(start) = self.window.start {
                conditions.push("(s.end_month IS NULL OR s.end_month >= ?)".to_string());
                params.push(Box::new(start.to_date_string()));
            }
        }

        FilterResult {
            where_clause: format!("WHERE {}", conditions.join(" AND ")),
            order_clause: "ORDER BY s.start_month ASC, s.service_name ASC, s.id ASC",
            params,
        }
    }
}

impl FilterResult {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
