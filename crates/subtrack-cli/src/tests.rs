//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use subtrack_core::{Database, FixedClock, Month, SubscriptionFilter};
use uuid::Uuid;

use crate::commands::{self, format_size, truncate, SubscriptionChanges};

const USER: &str = "123e4567-e89b-12d3-a456-426614174000";

fn setup_test_db() -> Database {
    Database::in_memory().unwrap()
}

fn clock() -> FixedClock {
    FixedClock(Month::new(2025, 12).unwrap())
}

fn user_id() -> Uuid {
    Uuid::parse_str(USER).unwrap()
}

fn only_subscription(db: &Database) -> subtrack_core::Subscription {
    let mut subs = db
        .find_subscriptions(&SubscriptionFilter::for_user(user_id()))
        .unwrap();
    assert_eq!(subs.len(), 1);
    subs.remove(0)
}

// ========== Add Command Tests ==========

#[test]
fn test_cmd_subscriptions_add() {
    let db = setup_test_db();
    commands::cmd_subscriptions_add(&db, &clock(), USER, "Netflix", 500, "01-2025", None)
        .unwrap();

    let sub = only_subscription(&db);
    assert_eq!(sub.service_name, "Netflix");
    assert_eq!(sub.price, 500);
    assert_eq!(sub.start, Month::new(2025, 1).unwrap());
    assert!(sub.end.is_none());
}

#[test]
fn test_cmd_subscriptions_add_rejects_bad_month() {
    let db = setup_test_db();
    let result =
        commands::cmd_subscriptions_add(&db, &clock(), USER, "Netflix", 500, "2025-01", None);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("--start"));
    assert_eq!(db.subscription_stats().unwrap().total, 0);
}

#[test]
fn test_cmd_subscriptions_add_rejects_bad_user() {
    let db = setup_test_db();
    let result =
        commands::cmd_subscriptions_add(&db, &clock(), "bob", "Netflix", 500, "01-2025", None);
    assert!(result.is_err());
}

#[test]
fn test_cmd_subscriptions_add_rejects_negative_price() {
    let db = setup_test_db();
    let result = commands::cmd_subscriptions_add(
        &db,
        &clock(),
        USER,
        "Netflix",
        -1,
        "01-2025",
        Some("03-2025"),
    );
    assert!(result.is_err());
    assert_eq!(db.subscription_stats().unwrap().total, 0);
}

// ========== Query Command Tests ==========

#[test]
fn test_cmd_subscriptions_list() {
    let db = setup_test_db();
    commands::cmd_subscriptions_add(&db, &clock(), USER, "Netflix", 500, "01-2025", None)
        .unwrap();

    let result = commands::cmd_subscriptions_list(
        &db,
        &clock(),
        USER,
        None,
        Some("01-2025"),
        Some("12-2025"),
        None,
        None,
    );
    assert!(result.is_ok());
}

#[test]
fn test_cmd_subscriptions_list_empty_page() {
    let db = setup_test_db();
    let result = commands::cmd_subscriptions_list(
        &db,
        &clock(),
        USER,
        Some("Netflix"),
        None,
        None,
        Some(5),
        Some(50),
    );
    assert!(result.is_ok());
}

#[test]
fn test_list_accepts_negative_paging() {
    use clap::Parser;
    use subtrack_core::{Pagination, SubscriptionService};

    use crate::cli::{Cli, Commands, SubscriptionsAction};

    let cli = Cli::try_parse_from([
        "subtrack",
        "subscriptions",
        "list",
        "--user",
        USER,
        "--limit",
        "-5",
        "--offset",
        "-3",
    ])
    .unwrap();
    let Commands::Subscriptions {
        action: SubscriptionsAction::List { limit, offset, .. },
    } = cli.command
    else {
        panic!("expected subscriptions list");
    };
    assert_eq!(limit, Some(-5));
    assert_eq!(offset, Some(-3));

    let db = setup_test_db();
    for i in 0..12 {
        let service = format!("Service {:02}", i);
        commands::cmd_subscriptions_add(&db, &clock(), USER, &service, 100, "01-2025", None)
            .unwrap();
    }
    assert!(
        commands::cmd_subscriptions_list(&db, &clock(), USER, None, None, None, limit, offset)
            .is_ok()
    );

    let pagination = Pagination::clamped(limit, offset);
    assert_eq!((pagination.limit, pagination.offset), (10, 0));
    let clock = clock();
    let page = SubscriptionService::new(&db, &clock)
        .list(&SubscriptionFilter::for_user(user_id()), pagination)
        .unwrap();
    assert_eq!(page.subscriptions.len(), 10);
    assert_eq!(page.subscriptions[0].service_name, "Service 00");
}

#[test]
fn test_cmd_subscriptions_sum() {
    let db = setup_test_db();
    commands::cmd_subscriptions_add(&db, &clock(), USER, "Spotify", 200, "01-2025", None)
        .unwrap();

    let result = commands::cmd_subscriptions_sum(
        &db,
        &clock(),
        USER,
        None,
        Some("01-2025"),
        Some("09-2025"),
        false,
    );
    assert!(result.is_ok());

    let result = commands::cmd_subscriptions_sum(&db, &clock(), USER, None, None, None, true);
    assert!(result.is_ok());
}

#[test]
fn test_cmd_subscriptions_sum_rejects_bad_window() {
    let db = setup_test_db();
    let result = commands::cmd_subscriptions_sum(
        &db,
        &clock(),
        USER,
        None,
        Some("13-2025"),
        None,
        false,
    );
    assert!(result.is_err());
}

// ========== Show/Update/Delete Command Tests ==========

#[test]
fn test_cmd_subscriptions_show() {
    let db = setup_test_db();
    commands::cmd_subscriptions_add(&db, &clock(), USER, "Netflix", 500, "01-2025", None)
        .unwrap();
    let sub = only_subscription(&db);

    assert!(commands::cmd_subscriptions_show(&db, &clock(), &sub.id.to_string()).is_ok());
    assert!(
        commands::cmd_subscriptions_show(&db, &clock(), &Uuid::new_v4().to_string()).is_err()
    );
    assert!(commands::cmd_subscriptions_show(&db, &clock(), "nope").is_err());
}

#[test]
fn test_cmd_subscriptions_update_merges_fields() {
    let db = setup_test_db();
    commands::cmd_subscriptions_add(
        &db,
        &clock(),
        USER,
        "Netflix",
        500,
        "01-2025",
        Some("06-2025"),
    )
    .unwrap();
    let before = only_subscription(&db);

    commands::cmd_subscriptions_update(
        &db,
        &clock(),
        &before.id.to_string(),
        SubscriptionChanges {
            price: Some(700),
            ..Default::default()
        },
    )
    .unwrap();

    let after = only_subscription(&db);
    assert_eq!(after.id, before.id);
    assert_eq!(after.price, 700);
    assert_eq!(after.service_name, "Netflix");
    assert_eq!(after.end, Some(Month::new(2025, 6).unwrap()));

    commands::cmd_subscriptions_update(
        &db,
        &clock(),
        &before.id.to_string(),
        SubscriptionChanges {
            ongoing: true,
            ..Default::default()
        },
    )
    .unwrap();
    assert!(only_subscription(&db).end.is_none());
}

#[test]
fn test_cmd_subscriptions_update_rejects_end_before_start() {
    let db = setup_test_db();
    commands::cmd_subscriptions_add(&db, &clock(), USER, "Netflix", 500, "06-2025", None)
        .unwrap();
    let sub = only_subscription(&db);

    let result = commands::cmd_subscriptions_update(
        &db,
        &clock(),
        &sub.id.to_string(),
        SubscriptionChanges {
            end: Some("01-2025"),
            ..Default::default()
        },
    );
    assert!(result.is_err());
    assert!(only_subscription(&db).end.is_none());
}

#[test]
fn test_cmd_subscriptions_delete() {
    let db = setup_test_db();
    commands::cmd_subscriptions_add(&db, &clock(), USER, "Netflix", 500, "01-2025", None)
        .unwrap();
    let sub = only_subscription(&db);

    commands::cmd_subscriptions_delete(&db, &clock(), &sub.id.to_string()).unwrap();
    assert_eq!(db.subscription_stats().unwrap().total, 0);

    assert!(commands::cmd_subscriptions_delete(&db, &clock(), &sub.id.to_string()).is_err());
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init_and_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtrack.db");

    commands::cmd_init(&path, true).unwrap();
    assert!(path.exists());
    assert!(commands::cmd_status(&path, true).is_ok());
}

#[test]
fn test_open_db_requires_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtrack.db");

    if std::env::var(subtrack_core::db::DB_KEY_ENV).is_err() {
        assert!(commands::open_db(&path, false).is_err());
    }
    assert!(commands::open_db(&path, true).is_ok());
}

// ========== Utility Tests ==========

#[test]
fn test_format_size() {
    assert_eq!(format_size(512), "512 B");
    assert_eq!(format_size(2048), "2.0 KB");
    assert_eq!(format_size(3 * 1024 * 1024 + 512 * 1024), "3.5 MB");
}

#[test]
fn test_cmd_status_reports_stats() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("subtrack.db");

    assert!(commands::cmd_status(&path, true).is_ok());

    let db = commands::open_db(&path, true).unwrap();
    commands::cmd_subscriptions_add(&db, &clock(), USER, "Netflix", 500, "01-2025", None)
        .unwrap();
    commands::cmd_subscriptions_add(&db, &clock(), USER, "Spotify", 200, "02-2025", Some("04-2025"))
        .unwrap();
    let stats = db.subscription_stats().unwrap();
    assert_eq!((stats.total, stats.users, stats.ongoing), (2, 1, 1));
    drop(db);

    assert!(commands::cmd_status(&path, true).is_ok());
}

#[test]
fn test_truncate() {
    assert_eq!(truncate("Netflix", 20), "Netflix");
    assert_eq!(truncate("A very long service name", 10), "A very ...");
    assert_eq!(truncate("Музыка без границ", 8), "Музык...");
}
