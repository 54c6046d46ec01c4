//! Integration tests for presence tracking across sessions.

mod helpers;

use helpers::{TestApp, eventually};
use serde_json::json;

use votehub_core::traits::store::SyncStore;
use votehub_store::paths;

#[tokio::test]
async fn test_joined_voters_see_each_other_live() {
    let app = TestApp::new();
    let ana = app.join("Ana").await.unwrap();
    let luis = app.join("Luis").await.unwrap();

    eventually(|| ana.live_users().contains("Luis")).await;
    assert!(luis.live_users().contains("Ana"));
    assert_eq!(ana.standings().live_users, 2);

    ana.close().await;
    luis.close().await;
}

#[tokio::test]
async fn test_stale_and_malformed_entries_are_not_live() {
    let app = TestApp::with_tree(json!({
        "activeUsers": {
            "Old": {"name": "Old", "lastActive": 1_000},
            "Nameless": {"lastActive": "yesterday"}
        }
    }));
    let luis = app.join("Luis").await.unwrap();

    let live = luis.live_users();
    assert!(live.contains("Luis"));
    assert!(!live.contains("Old"));
    assert!(!live.contains("Nameless"));
    assert_eq!(luis.standings().live_users, 1);

    luis.close().await;
}

#[tokio::test]
async fn test_presence_keeps_display_name() {
    let app = TestApp::new();
    let session = app.join("Ana María").await.unwrap();

    let stored = app.store.read(&paths::presence("Ana María")).await.unwrap();
    assert_eq!(stored["name"], "Ana María");
    assert!(stored["lastActive"].as_i64().unwrap() >= session.joined_at());

    session.close().await;
}

#[tokio::test]
async fn test_closed_session_stops_listening_but_leaves_last_seen() {
    let app = TestApp::new();
    let session = app.join("Ana").await.unwrap();
    assert!(session.heartbeat().unwrap().beats() >= 1);
    assert_eq!(app.store.subscribed_paths(), 4);

    session.close().await;
    let luis = app.join("Luis").await.unwrap();
    assert_eq!(app.store.subscribed_paths(), 4);
    assert!(luis.live_users().contains("Ana"));

    luis.close().await;
    assert_eq!(app.store.subscribed_paths(), 0);
}
