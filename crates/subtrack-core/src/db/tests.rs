//! Database tests

use super::*;
use crate::filter::SubscriptionFilter;
use crate::models::SubscriptionStats;
use crate::month::MonthWindow;
use crate::test_utils::{month, new_subscription};
use uuid::Uuid;

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.subscription_stats().unwrap(), SubscriptionStats::default());
}

#[test]
fn test_in_memory_db_removes_its_file() {
    let db = Database::in_memory().unwrap();
    let path = db
        ._scratch
        .as_ref()
        .map(|p| p.to_path_buf())
        .unwrap();
    assert!(path.exists());

    let clone = db.clone();
    drop(db);
    assert!(path.exists(), "file must outlive remaining clones");

    drop(clone);
    assert!(!path.exists());
}

#[test]
fn test_subscription_stats() {
    let db = Database::in_memory().unwrap();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();

    db.create_subscription(&new_subscription(alice, "Netflix", 500, "03-2025", None))
        .unwrap();
    db.create_subscription(&new_subscription(alice, "Spotify", 200, "01-2024", Some("06-2024")))
        .unwrap();
    db.create_subscription(&new_subscription(bob, "Netflix", 500, "07-2025", None))
        .unwrap();

    let stats = db.subscription_stats().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.users, 2);
    assert_eq!(stats.ongoing, 2);
    assert_eq!(stats.ended(), 1);
    assert_eq!(stats.earliest_start, Some(month("01-2024")));
}

#[test]
fn test_subscriptions_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let result: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('subscriptions') WHERE name IN ('id', 'user_id', 'service_name', 'price', 'start_month', 'end_month', 'created_at', 'updated_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(result, 8, "subscriptions table should have 8 expected columns");
}

#[test]
fn test_subscription_crud() {
    let db = Database::in_memory().unwrap();
    let user = Uuid::new_v4();

    let created = db
        .create_subscription(&new_subscription(user, "Netflix", 500, "01-2025", None))
        .unwrap();
    assert_eq!(created.service_name, "Netflix");
    assert_eq!(created.start, month("01-2025"));
    assert!(created.end.is_none());

    let fetched = db.get_subscription(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);

    let updated = db
        .update_subscription(
            created.id,
            &new_subscription(user, "Netflix", 700, "01-2025", Some("06-2025")),
        )
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
    assert_eq!(updated.price, 700);
    assert_eq!(updated.end, Some(month("06-2025")));

    db.delete_subscription(created.id).unwrap();
    assert!(db.get_subscription(created.id).unwrap().is_none());
    assert_eq!(db.subscription_stats().unwrap().total, 0);
}

#[test]
fn test_unknown_id_is_not_found() {
    let db = Database::in_memory().unwrap();
    let id = Uuid::new_v4();

    assert!(db.get_subscription(id).unwrap().is_none());
    assert!(matches!(
        db.update_subscription(
            id,
            &new_subscription(Uuid::new_v4(), "Netflix", 1, "01-2025", None)
        ),
        Err(Error::NotFound(_))
    ));
    assert!(matches!(db.delete_subscription(id), Err(Error::NotFound(_))));
}

#[test]
fn test_negative_price_rejected_by_schema() {
    let db = Database::in_memory().unwrap();
    let result = db.create_subscription(&new_subscription(
        Uuid::new_v4(),
        "Netflix",
        -1,
        "01-2025",
        None,
    ));
    assert!(matches!(result, Err(Error::Database(_))));
}

#[test]
fn test_find_subscriptions_filters_and_orders() {
    let db = Database::in_memory().unwrap();
    let user = Uuid::new_v4();
    let other = Uuid::new_v4();

    for (name, start, end) in [
        ("Spotify", "01-2025", Some("12-2025")),
        ("Apple", "02-2025", None),
        ("Netflix", "01-2025", None),
        ("Old", "01-2023", Some("12-2023")),
    ] {
        db.create_subscription(&new_subscription(user, name, 100, start, end))
            .unwrap();
    }
    db.create_subscription(&new_subscription(other, "Netflix", 100, "01-2025", None))
        .unwrap();

    let all = db
        .find_subscriptions(&SubscriptionFilter::for_user(user))
        .unwrap();
    let names: Vec<&str> = all.iter().map(|s| s.service_name.as_str()).collect();
    assert_eq!(names, vec!["Old", "Netflix", "Spotify", "Apple"]);

    let window = MonthWindow::new(Some(month("01-2025")), Some(month("01-2025")));
    let filter = SubscriptionFilter::for_user(user).window(window);
    let names: Vec<String> = db
        .find_subscriptions(&filter)
        .unwrap()
        .into_iter()
        .map(|s| s.service_name)
        .collect();
    assert_eq!(names, vec!["Netflix", "Spotify"]);

    let filter = SubscriptionFilter::for_user(user).service_name(Some("netflix"));
    assert!(db.find_subscriptions(&filter).unwrap().is_empty());
}

#[test]
fn test_open_subscription_overlaps_future_window() {
    let db = Database::in_memory().unwrap();
    let user = Uuid::new_v4();
    db.create_subscription(&new_subscription(user, "Netflix", 500, "01-2020", None))
        .unwrap();

    let filter = SubscriptionFilter::for_user(user)
        .window(MonthWindow::new(Some(month("06-2030")), None));
    assert_eq!(db.find_subscriptions(&filter).unwrap().len(), 1);
}

#[test]
fn test_inverted_window_selects_nothing() {
    let db = Database::in_memory().unwrap();
    let user = Uuid::new_v4();
    db.create_subscription(&new_subscription(user, "Netflix", 500, "01-2025", None))
        .unwrap();

    let filter = SubscriptionFilter::for_user(user).window(MonthWindow::new(
        Some(month("06-2025")),
        Some(month("03-2025")),
    ));
    assert!(db.find_subscriptions(&filter).unwrap().is_empty());
}

#[test]
fn test_service_over_database() {
    use crate::clock::FixedClock;
    use crate::service::SubscriptionService;

    let db = Database::in_memory().unwrap();
    let clock = FixedClock(month("12-2025"));
    let service = SubscriptionService::new(&db, &clock);
    let user = Uuid::new_v4();

    service
        .create(&new_subscription(user, "Spotify", 300, "01-2025", Some("03-2025")))
        .unwrap();
    service
        .create(&new_subscription(user, "Spotify", 400, "02-2025", Some("02-2025")))
        .unwrap();

    let window = MonthWindow::new(Some(month("01-2025")), Some(month("03-2025")));
    let filter = SubscriptionFilter::for_user(user).window(window);
    assert_eq!(service.sum(&filter).unwrap(), 300 + 400 + 300);
}

#[test]
fn test_database_encryption_with_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encrypted.db");
    let path = path.to_string_lossy();

    let user = Uuid::new_v4();
    {
        let db = Database::new_with_key(&path, Some("correct horse")).unwrap();
        db.create_subscription(&new_subscription(user, "Netflix", 500, "01-2025", None))
            .unwrap();
    }

    let db = Database::new_with_key(&path, Some("correct horse")).unwrap();
    assert_eq!(db.subscription_stats().unwrap().total, 1);

    assert!(Database::new_with_key(&path, Some("wrong passphrase")).is_err());
}
