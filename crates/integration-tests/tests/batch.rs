//! Batch runner behavior: failure isolation and aggregate reporting.

#![allow(clippy::unwrap_used)]

use rust_decimal::dec;

use cedar_core::UserId;
use cedar_sync::stats::PassResult;
use cedar_sync::store::OrderStore;
use cedar_sync::{SyncConfig, SyncService};

use cedar_integration_tests::{InMemoryStore, ScriptedReader, integration, product, row};

#[tokio::test]
async fn one_failing_integration_never_stops_the_rest() {
    let healthy = integration(1, 1, "sheet-healthy");
    let broken = integration(2, 2, "sheet-broken");
    let trailing = integration(3, 1, "sheet-trailing");

    let reader = ScriptedReader::new()
        .with_sheet("sheet-healthy", vec![row(1, "100", "70111111", "ABC")])
        .with_denied("sheet-broken")
        .with_sheet("sheet-trailing", vec![row(1, "200", "70222222", "ABC")]);
    let store = InMemoryStore::new()
        .with_integration(healthy.clone())
        .with_integration(broken.clone())
        .with_integration(trailing.clone())
        .with_product(UserId::new(1), product(10, "ABC", dec!(5)));

    let service = SyncService::new(reader, store, &SyncConfig::default());
    let report = service
        .run_all(&[healthy.clone(), broken.clone(), trailing.clone()])
        .await;

    assert_eq!(report.total_integrations, 3);
    assert_eq!(report.successful, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.details.len(), 3);

    // Outcomes stay in run order
    let failed = report.details.get(1).unwrap();
    assert_eq!(failed.integration_id, broken.id);
    match &failed.result {
        PassResult::Failed { error } => assert!(error.contains("access")),
        PassResult::Completed { .. } => panic!("expected the denied sheet to fail"),
    }

    // Bookkeeping only moved for the passes that completed
    assert!(service.store().last_sync_of(healthy.id).is_some());
    assert!(service.store().last_sync_of(broken.id).is_none());
    assert!(service.store().last_sync_of(trailing.id).is_some());
}

#[tokio::test]
async fn batch_runs_only_auto_sync_integrations() {
    let auto = integration(1, 1, "sheet-auto");
    let mut manual = integration(2, 1, "sheet-manual");
    manual.auto_sync = false;

    let reader = ScriptedReader::new()
        .with_sheet("sheet-auto", vec![row(1, "100", "70111111", "ABC")])
        .with_sheet("sheet-manual", vec![row(1, "200", "70222222", "ABC")]);
    let store = InMemoryStore::new()
        .with_integration(auto.clone())
        .with_integration(manual)
        .with_product(UserId::new(1), product(10, "ABC", dec!(5)));

    let service = SyncService::new(reader, store, &SyncConfig::default());
    let targets = service.store().list_auto_sync_integrations().await.unwrap();
    let report = service.run_all(&targets).await;

    assert_eq!(report.total_integrations, 1);
    assert_eq!(
        report.details.first().unwrap().integration_id,
        auto.id
    );
}

#[tokio::test]
async fn report_serializes_with_tagged_outcomes() {
    let ok = integration(1, 1, "sheet-ok");
    let bad = integration(2, 2, "sheet-bad");

    let reader = ScriptedReader::new()
        .with_sheet("sheet-ok", vec![row(1, "100", "70111111", "ABC")])
        .with_denied("sheet-bad");
    let store = InMemoryStore::new()
        .with_integration(ok.clone())
        .with_integration(bad.clone())
        .with_product(UserId::new(1), product(10, "ABC", dec!(5)));

    let service = SyncService::new(reader, store, &SyncConfig::default());
    let report = service.run_all(&[ok, bad]).await;

    let json = serde_json::to_value(&report).unwrap();
    let details = json.get("details").and_then(|d| d.as_array()).unwrap();
    assert_eq!(
        details.first().unwrap().get("status").unwrap(),
        "completed"
    );
    assert_eq!(details.get(1).unwrap().get("status").unwrap(), "failed");
    assert!(details.first().unwrap().get("stats").is_some());
}

#[tokio::test]
async fn empty_integration_list_yields_empty_report() {
    let service = SyncService::new(
        ScriptedReader::new(),
        InMemoryStore::new(),
        &SyncConfig::default(),
    );
    let report = service.run_all(&[]).await;

    assert_eq!(report.total_integrations, 0);
    assert_eq!(report.successful, 0);
    assert_eq!(report.failed, 0);
    assert!(report.details.is_empty());
}
