mod common;

use common::TestApp;
use rust_decimal_macros::dec;
use warehouse_inventory::{
    audit::{current_auditor, scope_auditor, Auditor},
    entities::category,
};

#[tokio::test]
async fn writes_inside_a_scope_record_the_auditor() {
    let app = TestApp::new().await;
    let categories = app.services.categories.clone();

    let created = scope_auditor(Auditor::new("alice"), async {
        categories.save(category::Model::new("Hardware")).await
    })
    .await
    .unwrap();
    assert_eq!(created.created_by.as_deref(), Some("alice"));
    assert!(created.last_modified_by.is_none());

    let mut edited = created.clone();
    edited.description = Some("Fasteners".to_string());
    let updated = scope_auditor(Auditor::new("bob"), async {
        categories.save(edited).await
    })
    .await
    .unwrap();

    assert_eq!(updated.created_by.as_deref(), Some("alice"));
    assert_eq!(updated.created_date, created.created_date);
    assert_eq!(updated.last_modified_by.as_deref(), Some("bob"));
    assert!(updated.last_modified_date.is_some());
}

#[tokio::test]
async fn caller_supplied_creation_stamps_are_overwritten() {
    let app = TestApp::new().await;
    let mut forged = category::Model::new("Hardware");
    forged.created_by = Some("mallory".to_string());

    let saved = app.services.categories.save(forged).await.unwrap();
    assert!(saved.created_by.is_none());

    let mut forged_update = saved.clone();
    forged_update.created_by = Some("mallory".to_string());
    let updated = app.services.categories.save(forged_update).await.unwrap();
    assert!(updated.created_by.is_none());
}

#[tokio::test]
async fn stock_operations_are_attributed() {
    let app = TestApp::new().await;
    let bolt = app.product("Bolt", dec!(0.35)).await;
    let dock = app.location("Dock").await;
    let inventory = app.services.inventory.clone();

    scope_auditor(Auditor::new("receiving"), async {
        assert_eq!(current_auditor(), Some(Auditor::new("receiving")));
        inventory.receive_stock(bolt.id, dock.id, 5, None).await
    })
    .await
    .unwrap();

    let movements = app
        .services
        .stock_movements
        .find_by_product(bolt.id)
        .await
        .unwrap();
    assert_eq!(movements[0].created_by.as_deref(), Some("receiving"));
    assert!(current_auditor().is_none());
}
