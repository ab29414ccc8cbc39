//! Report store tests
//!
//! Integration tests against SQLite for:
//! - Insert then read back
//! - Newest-first ordering and limit bounds
//! - Unique ids under concurrent inserts
//! - Persistence across reopen
//! - Storage failures after the pool is closed

use rust_decimal::Decimal;
use shared::{NewReport, NutrientLevel, SoilSample};
use soil_advisor::db;
use soil_advisor::services::ReportStore;
use tokio_test::{assert_err, assert_ok};

async fn memory_store() -> ReportStore {
    let pool = db::connect_url("sqlite::memory:", 1, 1).await.unwrap();
    ReportStore::new(pool)
}

fn report(name: &str, ph: i64) -> NewReport {
    NewReport::new(
        name,
        SoilSample::new(
            Decimal::new(ph, 1),
            NutrientLevel::Low,
            NutrientLevel::Medium,
            NutrientLevel::High,
            NutrientLevel::Medium,
        ),
    )
}

// ============================================================================
// Insert and Read Back
// ============================================================================

#[tokio::test]
async fn test_insert_then_read_back() {
    let store = memory_store().await;
    let new_report = report("Ramlal", 65);

    let id = assert_ok!(store.insert(&new_report).await);
    let recent = assert_ok!(store.recent_reports(1).await);

    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, id);
    assert_eq!(recent[0].farmer_name, "Ramlal");
    assert_eq!(recent[0].sample, new_report.sample);
}

#[tokio::test]
async fn test_empty_store() {
    let store = memory_store().await;
    assert!(assert_ok!(store.recent_reports(5).await).is_empty());
    assert_eq!(assert_ok!(store.count().await), 0);
}

#[tokio::test]
async fn test_ph_precision_preserved() {
    let store = memory_store().await;
    let mut new_report = report("Sita", 0);
    new_report.sample.ph_level = "6.75".parse().unwrap();

    assert_ok!(store.insert(&new_report).await);
    let recent = assert_ok!(store.recent_reports(1).await);
    assert_eq!(recent[0].sample.ph_level, "6.75".parse::<Decimal>().unwrap());
}

// ============================================================================
// Ordering and Limits
// ============================================================================

#[tokio::test]
async fn test_recent_reports_newest_first_and_bounded() {
    let store = memory_store().await;
    let mut ids = Vec::new();
    for i in 0..7 {
        ids.push(assert_ok!(store.insert(&report(&format!("farmer {}", i), 60 + i)).await));
    }

    let recent = assert_ok!(store.recent_reports(5).await);
    assert_eq!(recent.len(), 5);
    let got: Vec<i64> = recent.iter().map(|r| r.id).collect();
    let expected: Vec<i64> = ids.iter().rev().take(5).copied().collect();
    assert_eq!(got, expected);

    // Limit larger than the table returns everything
    assert_eq!(assert_ok!(store.recent_reports(100).await).len(), 7);
    assert_eq!(assert_ok!(store.count().await), 7);
}

#[tokio::test]
async fn test_zero_limit_returns_nothing() {
    let store = memory_store().await;
    assert_ok!(store.insert(&report("Mohan", 70)).await);
    assert!(assert_ok!(store.recent_reports(0).await).is_empty());
}

#[tokio::test]
async fn test_ids_strictly_increase() {
    let store = memory_store().await;
    let first = assert_ok!(store.insert(&report("a", 70)).await);
    let second = assert_ok!(store.insert(&report("b", 70)).await);
    assert!(second > first);
}

#[tokio::test]
async fn test_empty_farmer_name_accepted() {
    let store = memory_store().await;
    assert_ok!(store.insert(&report("", 70)).await);
    let recent = assert_ok!(store.recent_reports(1).await);
    assert_eq!(recent[0].farmer_name, "");
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_inserts_get_distinct_ids() {
    let store = memory_store().await;

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.insert(&report(&format!("f{}", i), 70)).await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        ids.push(assert_ok!(handle.await.unwrap()));
    }
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 10);
    assert_eq!(assert_ok!(store.count().await), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_inserts_across_connections_get_distinct_ids() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("reports.db").display());
    let store = ReportStore::new(db::connect_url(&url, 5, 5).await.unwrap());

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let mut ids = Vec::new();
                for j in 0..5 {
                    ids.push(store.insert(&report(&format!("f{}-{}", i, j), 70)).await);
                }
                ids
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            ids.push(assert_ok!(id));
        }
    }
    ids.sort_unstable();
    ids.dedup();

    assert_eq!(ids.len(), 100);
    assert_eq!(assert_ok!(store.count().await), 100);

    let recent = assert_ok!(store.recent_reports(100).await);
    assert!(recent.windows(2).all(|pair| pair[0].id > pair[1].id));
    store.close().await;
}

// ============================================================================
// Persistence and Failure
// ============================================================================

#[tokio::test]
async fn test_reports_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("reports.db").display());

    let store = ReportStore::new(db::connect_url(&url, 1, 1).await.unwrap());
    let first = assert_ok!(store.insert(&report("Ramlal", 65)).await);
    store.close().await;

    let reopened = ReportStore::new(db::connect_url(&url, 1, 1).await.unwrap());
    let recent = assert_ok!(reopened.recent_reports(5).await);
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].id, first);

    let second = assert_ok!(reopened.insert(&report("Sita", 70)).await);
    assert!(second > first);
    reopened.close().await;
}

#[tokio::test]
async fn test_closed_store_reports_unavailable() {
    let store = memory_store().await;
    store.close().await;

    let err = assert_err!(store.insert(&report("Ramlal", 65)).await);
    assert!(err.is_storage_unavailable());

    let err = assert_err!(store.recent_reports(5).await);
    assert!(err.is_storage_unavailable());
}

// ============================================================================
// CSV Export
// ============================================================================

#[tokio::test]
async fn test_export_csv() {
    let store = memory_store().await;
    assert_ok!(store.insert(&report("Ramlal", 65)).await);
    assert_ok!(store.insert(&report("Sita", 72)).await);

    let csv = assert_ok!(store.export_csv(5).await);
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("id,farmer"));
    assert!(lines[1].contains("Sita"));
    assert!(lines[1].contains("7.2"));
    assert!(lines[2].contains("Ramlal"));
}
