// catalog-client/tests/store_sync.rs
// 本地状态同步：只应用后端确认的变更

mod common;

use catalog_client::store::LOAD_FAILED;
use catalog_client::{LoadState, ProductStore, Session};
use common::{FakeGateway, product};
use shared::models::{CategoryCreate, ProductCreate, ProductUpdate};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tokio::sync::Notify;

fn store(gateway: &Arc<FakeGateway>) -> ProductStore<FakeGateway> {
    ProductStore::new(gateway.clone(), Session::with_token("admin-token"))
}

fn seeded() -> Arc<FakeGateway> {
    Arc::new(FakeGateway::with_products(vec![
        product("p1", "Red Shoe"),
        product("p2", "Blue Shoe"),
        product("p3", "Green Hat"),
    ]))
}

#[tokio::test]
async fn test_load_fetches_products_and_categories() {
    let gateway = seeded();
    let store = store(&gateway);
    assert_eq!(store.load_state().await, LoadState::Idle);

    let state = store.load().await;
    assert_eq!(state, LoadState::Loaded);
    assert_eq!(store.products().await.len(), 3);
    assert_eq!(store.categories().await[0].name, "Shoes");
    assert_eq!(gateway.count_calls("list_products"), 1);
    assert_eq!(gateway.count_calls("list_categories"), 1);
}

#[tokio::test]
async fn test_rejected_listing_surfaces_backend_message() {
    let gateway = seeded();
    gateway.reject_product_list.store(true, Ordering::SeqCst);
    let store = store(&gateway);

    let state = store.load().await;
    assert_eq!(state.error(), Some("Database unavailable"));
    assert!(store.products().await.is_empty());
    // 分类仍然可用
    assert_eq!(store.categories().await.len(), 1);
}

#[tokio::test]
async fn test_category_rejection_keeps_products() {
    let gateway = seeded();
    gateway.reject_category_list.store(true, Ordering::SeqCst);
    let store = store(&gateway);

    assert_eq!(store.load().await, LoadState::Loaded);
    assert_eq!(store.products().await.len(), 3);
    assert!(store.categories().await.is_empty());
}

#[tokio::test]
async fn test_transport_failure_errors_both_collections() {
    let gateway = seeded();
    let store = store(&gateway);
    store.load().await;

    gateway.offline.store(true, Ordering::SeqCst);
    let state = store.load().await;
    assert_eq!(state.error(), Some(LOAD_FAILED));
    assert!(store.products().await.is_empty());
    assert!(store.categories().await.is_empty());
}

#[tokio::test]
async fn test_delete_applies_only_after_confirmation() {
    let gateway = seeded();
    gateway.reject_delete("p2", "Product has pending orders");
    let store = store(&gateway);
    store.load().await;

    let ok = store.delete_product("p1").await;
    assert!(ok.success);
    assert!(store.product("p1").await.is_none());

    let rejected = store.delete_product("p2").await;
    assert!(!rejected.success);
    assert_eq!(rejected.message, "Product has pending orders");
    assert!(store.product("p2").await.is_some());
    assert!(!store.is_deleting("p2").await);
}

#[tokio::test]
async fn test_delete_transport_error_keeps_item() {
    let gateway = seeded();
    let store = store(&gateway);
    store.load().await;

    gateway.offline.store(true, Ordering::SeqCst);
    let outcome = store.delete_product("p1").await;
    assert!(!outcome.success);
    assert_eq!(outcome.message, "An error occurred while deleting the product");
    assert!(store.product("p1").await.is_some());
}

#[tokio::test]
async fn test_deleting_set_visible_while_in_flight() {
    let gateway = seeded();
    let gate = Arc::new(Notify::new());
    *gateway.delete_gate.lock().unwrap() = Some(gate.clone());
    let store = Arc::new(store(&gateway));
    store.load().await;

    let task = tokio::spawn({
        let store = store.clone();
        async move { store.delete_product("p3").await }
    });

    while !store.is_deleting("p3").await {
        tokio::task::yield_now().await;
    }
    assert_eq!(store.deleting().await, vec!["p3".to_string()]);
    assert!(store.product("p3").await.is_some());

    gate.notify_one();
    let outcome = task.await.unwrap();
    assert!(outcome.success);
    assert!(!store.is_deleting("p3").await);
    assert!(store.product("p3").await.is_none());
}

#[tokio::test]
async fn test_overlapping_deletes_keep_id_marked() {
    let gateway = seeded();
    let gate = Arc::new(Notify::new());
    *gateway.delete_gate.lock().unwrap() = Some(gate.clone());
    let store = Arc::new(store(&gateway));
    store.load().await;

    let single = tokio::spawn({
        let store = store.clone();
        async move { store.delete_product("p1").await }
    });
    let bulk = tokio::spawn({
        let store = store.clone();
        async move { store.bulk_delete(&["p1".to_string()]).await }
    });
    while gateway.count_calls("delete_product:p1") < 2 {
        tokio::task::yield_now().await;
    }

    // 先完成的那个请求不能清掉另一个请求的标记
    gate.notify_one();
    while !single.is_finished() && !bulk.is_finished() {
        tokio::task::yield_now().await;
    }
    assert!(store.is_deleting("p1").await);

    gate.notify_one();
    single.await.unwrap();
    bulk.await.unwrap();
    assert!(!store.is_deleting("p1").await);
    assert!(store.product("p1").await.is_none());
}

#[tokio::test]
async fn test_reload_prunes_stale_selection() {
    let gateway = seeded();
    let store = store(&gateway);
    store.load().await;

    store.select("p1").await;
    store.select("p3").await;
    assert!(!store.select("missing").await);

    // 其他客户端删除了 p3
    gateway.products.lock().unwrap().retain(|p| p.id != "p3");
    store.load().await;
    assert_eq!(store.selected().await, vec!["p1".to_string()]);
}

#[tokio::test]
async fn test_create_and_update_use_backend_copy() {
    let gateway = seeded();
    let store = store(&gateway);
    store.load().await;

    let created = store
        .create_product(&ProductCreate {
            name: "Yellow Scarf".into(),
            ..Default::default()
        })
        .await;
    assert!(created.success);
    let new_id = created.item.unwrap().id;
    assert_eq!(store.products().await[0].id, new_id);

    let updated = store
        .update_product(
            "p2",
            &ProductUpdate {
                stock: Some(0),
                ..Default::default()
            },
        )
        .await;
    assert!(updated.success);
    assert_eq!(store.product("p2").await.unwrap().stock, 0);

    let missing = store
        .update_product("nope", &ProductUpdate::default())
        .await;
    assert!(!missing.success);
    assert_eq!(missing.message, "Not found");
}

#[tokio::test]
async fn test_bulk_update_reports_partial_failure() {
    let gateway = seeded();
    let store = store(&gateway);
    store.load().await;

    let patch = ProductUpdate {
        stock: Some(5),
        ..Default::default()
    };
    let report = store
        .bulk_update(&[
            ("p1".to_string(), patch.clone()),
            ("ghost".to_string(), patch.clone()),
        ])
        .await;
    assert!(!report.success);
    assert_eq!(report.updated.len(), 1);
    assert_eq!(report.failed[0].id, "ghost");
    assert_eq!(report.message, "Some products failed to update");
    assert_eq!(store.product("p1").await.unwrap().stock, 5);
}

#[tokio::test]
async fn test_category_rejection_leaves_list_untouched() {
    let gateway = seeded();
    let store = store(&gateway);
    store.load().await;

    let duplicate = store
        .create_category(&CategoryCreate {
            name: "Shoes".into(),
            ..Default::default()
        })
        .await;
    assert!(!duplicate.success);
    assert_eq!(duplicate.message, "Category already exists");
    assert_eq!(store.categories().await.len(), 1);

    let hats = store
        .create_category(&CategoryCreate {
            name: "Hats".into(),
            ..Default::default()
        })
        .await;
    assert!(hats.success);
    assert_eq!(store.categories().await.len(), 2);
}

#[tokio::test]
async fn test_changes_are_published() {
    let gateway = seeded();
    let store = store(&gateway);
    let mut changes = store.subscribe();
    let before = *changes.borrow_and_update();

    store.load().await;
    assert!(changes.has_changed().unwrap());
    assert!(*changes.borrow_and_update() > before);
}
