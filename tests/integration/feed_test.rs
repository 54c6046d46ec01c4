//! Integration tests for the activity feed and celebrations.

mod helpers;

use std::time::Duration;

use helpers::{TestApp, eventually, key, wait_for};

use votehub_entity::NotificationKind;
use votehub_realtime::SessionUpdate;

#[tokio::test]
async fn test_events_before_joining_are_not_recent() {
    let app = TestApp::new();
    let ana = app.join("Ana").await.unwrap();
    ana.toggle_vote(&key("hispanic-ConversaFlow")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let luis = app.join("Luis").await.unwrap();
    assert!(
        luis.recent_activity()
            .iter()
            .all(|n| n.message != "Ana voted for \"ConversaFlow\"")
    );

    tokio::time::sleep(Duration::from_millis(5)).await;
    ana.toggle_vote(&key("hispanic-AmigaAI")).await.unwrap();
    eventually(|| {
        luis.recent_activity()
            .iter()
            .any(|n| n.message == "Ana voted for \"AmigaAI\"")
    })
    .await;

    ana.close().await;
    luis.close().await;
}

#[tokio::test]
async fn test_recent_activity_is_capped_newest_first() {
    let app = TestApp::new();
    let luis = app.join("Luis").await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let ana = app.join("Ana").await.unwrap();

    let category = app.catalog.require("hispanic").unwrap().clone();
    for item in category.seed_keys() {
        ana.toggle_vote(&item).await.unwrap();
    }
    ana.toggle_vote(&key("speed-VelocIA")).await.unwrap();
    ana.toggle_vote(&key("speed-TurboFlow")).await.unwrap();

    eventually(|| {
        luis.recent_activity()
            .first()
            .is_some_and(|n| n.message == "Ana voted for \"TurboFlow\"")
    })
    .await;

    let recent = luis.recent_activity();
    assert_eq!(recent.len(), 10);
    assert!(recent.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
    assert!(recent.iter().all(|n| n.kind == NotificationKind::Vote));

    ana.close().await;
    luis.close().await;
}

#[tokio::test]
async fn test_only_vote_events_trigger_celebration() {
    let app = TestApp::new();
    let luis = app.join("Luis").await.unwrap();
    let mut updates = luis.updates();
    tokio::time::sleep(Duration::from_millis(5)).await;

    let ana = app.join("Ana").await.unwrap();
    ana.submit("futuristic", "Nebula", None).await.unwrap();
    ana.toggle_vote(&key("futuristic-user-Nebula")).await.unwrap();

    let update = wait_for(&mut updates, |u| matches!(u, SessionUpdate::Celebrate { .. })).await;
    let SessionUpdate::Celebrate { notification } = update else {
        unreachable!()
    };
    assert_eq!(notification.kind, NotificationKind::Vote);
    assert_eq!(notification.message, "Ana voted for \"Nebula\"");

    ana.close().await;
    luis.close().await;
}
