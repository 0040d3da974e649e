//! Integration tests for the market sync engine

use std::sync::Arc;

use market_sync::auth::LoginRequest;
use market_sync::sync::{spawn_engine, BulkUpdate, ClientUpdate};
use market_sync::{AuthError, Broadcaster, EngineHandle, SeedConfig, StateStore, SyncError};
use serde_json::{json, Value};

fn setup_engine() -> (EngineHandle, Arc<Broadcaster>) {
    let store = StateStore::seeded(&SeedConfig {
        user_count: 5,
        ..Default::default()
    });
    let broadcaster = Arc::new(Broadcaster::new(32));
    let engine = spawn_engine(store, broadcaster.clone(), 64);
    (engine, broadcaster)
}

fn client_update(value: Value) -> ClientUpdate {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_balance_update_reaches_every_session() {
    let (engine, broadcaster) = setup_engine();
    let mut sessions: Vec<_> = (0..3).map(|_| broadcaster.subscribe()).collect();

    let before = engine.document().await.unwrap();
    assert_eq!(before.users["user1"].get("balance"), Some(&json!(100)));

    engine
        .apply_client_update(client_update(json!({
            "currentUser": "user1",
            "userData": { "balance": 80 },
            "shopItems": before.shop_items,
            "teams": []
        })))
        .await
        .unwrap();

    let user1 = engine.get_user("user1").await.unwrap().unwrap();
    assert_eq!(user1.get("balance"), Some(&json!(80)));

    for session in sessions.iter_mut() {
        let update = session.recv().await.unwrap();
        let message: Value = serde_json::from_str(&update.json).unwrap();
        assert_eq!(message["type"], json!("full_update"));
        assert_eq!(message["payload"]["user"]["user1"]["balance"], json!(80));
        assert!(session.try_recv().is_err(), "exactly one full_update per change");
    }
}

#[tokio::test]
async fn test_merge_leaves_other_fields_and_users_alone() {
    let (engine, _broadcaster) = setup_engine();
    let before = engine.document().await.unwrap();

    engine
        .apply_client_update(client_update(json!({
            "currentUser": "user2",
            "userData": { "totalSent": 40 }
        })))
        .await
        .unwrap();

    let after = engine.document().await.unwrap();
    let mut expected = before.users["user2"].fields().clone();
    expected.insert("totalSent".to_string(), json!(40));
    assert_eq!(after.users["user2"].fields(), &expected);

    for (name, user) in &before.users {
        if name != "user2" {
            assert_eq!(&after.users[name], user);
        }
    }
    assert_eq!(after.shop_items, before.shop_items);
}

#[tokio::test]
async fn test_concurrent_catalog_replacements_last_write_wins() {
    let (engine, broadcaster) = setup_engine();
    let mut session = broadcaster.subscribe();

    let a = json!([{ "id": 10, "name": "A1", "price": 1 }, { "id": 11, "name": "A2", "price": 2 }]);
    let b = json!([{ "id": 20, "name": "B1", "price": 3 }]);

    let first = engine.clone();
    let second = engine.clone();
    let update_a = client_update(json!({ "currentUser": "user1", "userData": {}, "shopItems": a, "teams": [] }));
    let update_b = client_update(json!({ "currentUser": "user2", "userData": {}, "shopItems": b, "teams": [] }));

    let (ra, rb) = tokio::join!(
        tokio::spawn(async move { first.apply_client_update(update_a).await }),
        tokio::spawn(async move { second.apply_client_update(update_b).await }),
    );
    ra.unwrap().unwrap();
    rb.unwrap().unwrap();

    let first_seen: Value = serde_json::from_str(&session.recv().await.unwrap().json).unwrap();
    let last_seen: Value = serde_json::from_str(&session.recv().await.unwrap().json).unwrap();
    let final_items = engine.document().await.unwrap().shop_items;

    // Whichever landed last is reflected in full, never a mix of both
    let names: Vec<&str> = final_items.iter().filter_map(|item| item["name"].as_str()).collect();
    assert!(names == vec!["A1", "A2"] || names == vec!["B1"], "unexpected catalog {:?}", names);
    assert_eq!(last_seen["payload"]["shopItems"].as_array().unwrap().len(), final_items.len());
    assert_ne!(first_seen["payload"]["shopItems"], last_seen["payload"]["shopItems"]);
}

#[tokio::test]
async fn test_bulk_update_broadcasts_once() {
    let (engine, broadcaster) = setup_engine();
    let mut session = broadcaster.subscribe();

    let bulk: BulkUpdate = serde_json::from_value(json!({
        "user": {
            "user1": { "balance": 1 },
            "user2": { "balance": 2 },
            "user3": { "balance": 3 }
        },
        "shopItems": []
    }))
    .unwrap();
    let outcome = engine.apply_bulk_update(bulk).await.unwrap();

    assert_eq!(outcome.merged.len(), 3);
    assert!(outcome.shop_items_replaced);
    assert!(!outcome.teams_replaced);

    let update = session.recv().await.unwrap();
    let message: Value = serde_json::from_str(&update.json).unwrap();
    assert_eq!(message["payload"]["user"]["user3"]["balance"], json!(3));
    assert_eq!(message["payload"]["shopItems"], json!([]));
    assert!(session.try_recv().is_err());
}

#[tokio::test]
async fn test_quiescent_broadcasts_are_identical() {
    let (engine, broadcaster) = setup_engine();
    let mut session = broadcaster.subscribe();

    engine.broadcast_all().await.unwrap();
    engine.broadcast_all().await.unwrap();

    let first = session.recv().await.unwrap();
    let second = session.recv().await.unwrap();
    assert_eq!(first.json, second.json);
}

#[tokio::test]
async fn test_authentication_scenarios() {
    let (engine, _broadcaster) = setup_engine();

    let admin = engine.authenticate(LoginRequest::new("admin", "admin123")).await.unwrap();
    assert!(admin.is_admin);

    let wrong = engine.authenticate(LoginRequest::new("admin", "wrong")).await;
    assert!(matches!(wrong, Err(SyncError::Auth(AuthError::Unauthorized))));

    engine
        .apply_client_update(client_update(json!({
            "currentUser": "user4",
            "userData": { "isBlocked": true }
        })))
        .await
        .unwrap();
    let blocked = engine.authenticate(LoginRequest::new("user4", "pass4")).await;
    assert!(matches!(blocked, Err(SyncError::Auth(AuthError::Forbidden))));
}

#[tokio::test]
async fn test_list_users_never_contains_admin() {
    let (engine, _broadcaster) = setup_engine();

    engine
        .apply_client_update(client_update(json!({
            "currentUser": "admin",
            "userData": { "balance": 5 }
        })))
        .await
        .unwrap();

    let users = engine.list_users().await.unwrap();
    assert_eq!(users.len(), 5);
    assert!(!users.contains_key("admin"));
}
