//! Subscription command implementations

use anyhow::{Context, Result};
use subtrack_core::{
    Clock, Database, Month, NewSubscription, Pagination, Subscription, SubscriptionQuery,
    SubscriptionService,
};
use uuid::Uuid;

use super::truncate;

/// Optional field overrides for `subscriptions update`
#[derive(Debug, Default)]
pub struct SubscriptionChanges<'a> {
    pub user: Option<&'a str>,
    pub service: Option<&'a str>,
    pub price: Option<i64>,
    pub start: Option<&'a str>,
    pub end: Option<&'a str>,
    /// Clear the end month
    pub ongoing: bool,
}

fn parse_uuid(value: &str, what: &str) -> Result<Uuid> {
    Uuid::parse_str(value.trim())
        .with_context(|| format!("Invalid {} '{}' (expected a UUID)", what, value))
}

fn parse_month(value: &str, flag: &str) -> Result<Month> {
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid {} '{}' (use MM-YYYY)", flag, value))
}

fn print_subscription(sub: &Subscription) {
    let end = sub
        .end
        .map(|m| m.to_string())
        .unwrap_or_else(|| "ongoing".to_string());
    println!(
        "   {:20} │ {:>8} │ {} → {:7} │ {}",
        truncate(&sub.service_name, 20),
        sub.price,
        sub.start,
        end,
        sub.id
    );
}

pub fn cmd_subscriptions_add(
    db: &Database,
    clock: &dyn Clock,
    user: &str,
    service: &str,
    price: i64,
    start: &str,
    end: Option<&str>,
) -> Result<()> {
    let new = NewSubscription {
        service_name: service.to_string(),
        price,
        user_id: parse_uuid(user, "--user")?,
        start: parse_month(start, "--start")?,
        end: end.map(|e| parse_month(e, "--end")).transpose()?,
    };

    let sub = SubscriptionService::new(db, clock).create(&new)?;

    println!("✅ Subscription added (ID: {})", sub.id);
    print_subscription(&sub);

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn cmd_subscriptions_list(
    db: &Database,
    clock: &dyn Clock,
    user: &str,
    service: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    limit: Option<i64>,
    offset: Option<i64>,
) -> Result<()> {
    let query = SubscriptionQuery::parse(user, service, from, to)?;
    let pagination = Pagination::clamped(limit, offset);

    let page = SubscriptionService::new(db, clock).list(&query.filter(), pagination)?;

    if page.subscriptions.is_empty() {
        if page.total > 0 {
            println!(
                "No subscriptions on this page ({} total, offset {}).",
                page.total, page.offset
            );
        } else {
            println!("No subscriptions found. Add one with:");
            println!(
                "  subtrack subscriptions add --user {} --service <name> --price <n> --start MM-YYYY",
                query.user_id
            );
        }
        return Ok(());
    }

    println!();
    println!("📋 Subscriptions");
    println!("   ─────────────────────────────────────────────────────────────");

    for sub in &page.subscriptions {
        print_subscription(sub);
    }

    println!();
    println!(
        "   Showing {}-{} of {}",
        page.offset + 1,
        page.offset + page.subscriptions.len() as i64,
        page.total
    );

    Ok(())
}

pub fn cmd_subscriptions_sum(
    db: &Database,
    clock: &dyn Clock,
    user: &str,
    service: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    monthly: bool,
) -> Result<()> {
    let query = SubscriptionQuery::parse(user, service, from, to)?;
    let tracker = SubscriptionService::new(db, clock);

    println!();
    if monthly {
        let months = tracker.monthly(&query.filter())?;
        println!("📅 Monthly Costs");
        println!("   ─────────────────────────────");
        for entry in &months {
            println!("   {} │ {:>10}", entry.month, entry.cost);
        }
        println!("   ─────────────────────────────");
        let total: i64 = months.iter().map(|m| m.cost).sum();
        println!("   Total   │ {:>10}", total);
    } else {
        let sum = tracker.sum(&query.filter())?;
        println!("💰 Total cost: {}", sum);
    }

    Ok(())
}

pub fn cmd_subscriptions_show(db: &Database, clock: &dyn Clock, id: &str) -> Result<()> {
    let id = parse_uuid(id, "subscription id")?;
    let sub = SubscriptionService::new(db, clock).get(id)?;

    println!();
    println!("📄 Subscription {}", sub.id);
    println!("   Service:  {}", sub.service_name);
    println!("   Price:    {}", sub.price);
    println!("   User:     {}", sub.user_id);
    println!("   Start:    {}", sub.start);
    match sub.end {
        Some(end) => println!("   End:      {}", end),
        None => println!("   End:      (ongoing)"),
    }
    println!("   Created:  {}", sub.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("   Updated:  {}", sub.updated_at.format("%Y-%m-%d %H:%M:%S"));

    Ok(())
}

pub fn cmd_subscriptions_update(
    db: &Database,
    clock: &dyn Clock,
    id: &str,
    changes: SubscriptionChanges<'_>,
) -> Result<()> {
    let id = parse_uuid(id, "subscription id")?;
    let service = SubscriptionService::new(db, clock);
    let existing = service.get(id)?;

    let end = if changes.ongoing {
        None
    } else {
        match changes.end {
            Some(end) => Some(parse_month(end, "--end")?),
            None => existing.end,
        }
    };

    let updated = NewSubscription {
        service_name: changes
            .service
            .map(str::to_string)
            .unwrap_or(existing.service_name),
        price: changes.price.unwrap_or(existing.price),
        user_id: match changes.user {
            Some(user) => parse_uuid(user, "--user")?,
            None => existing.user_id,
        },
        start: match changes.start {
            Some(start) => parse_month(start, "--start")?,
            None => existing.start,
        },
        end,
    };

    let sub = service.update(id, &updated)?;

    println!("✅ Subscription updated");
    print_subscription(&sub);

    Ok(())
}

pub fn cmd_subscriptions_delete(db: &Database, clock: &dyn Clock, id: &str) -> Result<()> {
    let id = parse_uuid(id, "subscription id")?;
    SubscriptionService::new(db, clock).delete(id)?;

    println!("✅ Subscription deleted (ID: {})", id);

    Ok(())
}
