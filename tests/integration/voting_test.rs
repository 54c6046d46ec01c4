//! Integration tests for voting, submissions and aggregation across sessions.

mod helpers;

use helpers::{TestApp, eventually, key};
use serde_json::{Value, json};

use votehub_core::config::{AppConfig, RateLimitPolicy};
use votehub_core::error::ErrorKind;
use votehub_core::traits::store::SyncStore;
use votehub_realtime::Badge;
use votehub_store::paths;

#[tokio::test]
async fn test_two_voters_rank_a_category() {
    let app = TestApp::new();
    let ana = app.join("Ana").await.unwrap();
    let luis = app.join("Luis").await.unwrap();

    ana.toggle_vote(&key("hispanic-ConversaFlow")).await.unwrap();
    luis.toggle_vote(&key("hispanic-ConversaFlow")).await.unwrap();
    ana.toggle_vote(&key("hispanic-AmigaAI")).await.unwrap();

    eventually(|| luis.standings().voters == 2 && luis.ledger().get_ballot("Ana").total() == 2)
        .await;

    let ranking = luis.ranking("hispanic").unwrap();
    assert_eq!(ranking[0].key, key("hispanic-ConversaFlow"));
    assert_eq!(ranking[0].popularity.count, 2);
    assert_eq!(ranking[0].popularity.percentage, 100);
    assert_eq!(ranking[0].badge, Badge::Favorite);
    assert_eq!(ranking[1].key, key("hispanic-AmigaAI"));
    assert_eq!(ranking[1].popularity.percentage, 50);
    assert_eq!(ranking[1].badge, Badge::Popular);
    assert!(ranking[2..].iter().all(|r| r.badge == Badge::None));

    let totals = luis.with_aggregator(|agg| agg.voter_totals("Ana"));
    assert_eq!(totals, 2);

    ana.close().await;
    luis.close().await;
}

#[tokio::test]
async fn test_retracting_last_vote_drops_voter_from_denominator() {
    let app = TestApp::new();
    let ana = app.join("Ana").await.unwrap();
    let luis = app.join("Luis").await.unwrap();

    ana.toggle_vote(&key("speed-TurboFlow")).await.unwrap();
    luis.toggle_vote(&key("speed-FlashFlow")).await.unwrap();
    eventually(|| ana.standings().voters == 2).await;

    luis.toggle_vote(&key("speed-FlashFlow")).await.unwrap();
    eventually(|| ana.standings().voters == 1).await;

    let popularity = ana.with_aggregator(|agg| agg.item_popularity(&key("speed-TurboFlow")));
    assert_eq!(popularity.percentage, 100);
    assert_eq!(popularity.supporting_voters, vec!["Ana".to_string()]);

    ana.close().await;
    luis.close().await;
}

#[tokio::test]
async fn test_offline_vote_is_rolled_back() {
    let app = TestApp::new();
    let ana = app.join("Ana").await.unwrap();

    app.store.set_offline(true);
    let err = ana.toggle_vote(&key("modular-PolyFlow")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::WriteFailed);
    assert!(!ana.ballot().get(&key("modular-PolyFlow")));
    app.store.set_offline(false);

    assert_eq!(app.store.read(&paths::votes()).await.unwrap(), Value::Null);
    ana.close().await;
}

#[tokio::test]
async fn test_submitted_item_is_votable_by_others() {
    let app = TestApp::new();
    let ana = app.join("Ana").await.unwrap();
    let luis = app.join("Luis").await.unwrap();

    let entry = luis.submit("hispanic", "PuenteVivo", None).await.unwrap();
    let item = entry.item_key();
    assert_eq!(item.to_string(), "hispanic-user-PuenteVivo");

    eventually(|| ana.submissions().total() == 1).await;
    ana.toggle_vote(&item).await.unwrap();
    eventually(|| ana.ledger().get_ballot("Ana").get(&item)).await;

    let ranking = ana.ranking("hispanic").unwrap();
    let row = ranking.iter().find(|r| r.key == item).unwrap();
    assert_eq!(row.submitter.as_deref(), Some("Luis"));
    assert_eq!(row.popularity.count, 1);
    assert_eq!(ranking[0].key, item);

    ana.close().await;
    luis.close().await;
}

#[tokio::test]
async fn test_withdrawn_submission_leaves_ranking() {
    let app = TestApp::new();
    let ana = app.join("Ana").await.unwrap();
    let luis = app.join("Luis").await.unwrap();

    let entry = ana.submit("speed", "Rayo", None).await.unwrap();
    eventually(|| luis.submissions().total() == 1).await;

    let err = luis.withdraw("speed", &entry.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    ana.withdraw("speed", &entry.id).await.unwrap();
    eventually(|| luis.submissions().total() == 0).await;
    let ranking = luis.ranking("speed").unwrap();
    assert!(ranking.iter().all(|r| r.key != entry.item_key()));

    let err = ana.withdraw("speed", &entry.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    ana.close().await;
    luis.close().await;
}

#[tokio::test]
async fn test_vote_rate_limit_is_per_voter() {
    let mut config = AppConfig::default();
    config.rate_limit.vote = RateLimitPolicy::new(2, 60_000);
    let app = TestApp::with_config(config);
    let ana = app.join("Ana").await.unwrap();
    let luis = app.join("Luis").await.unwrap();

    ana.toggle_vote(&key("modular-OmniFlow")).await.unwrap();
    ana.toggle_vote(&key("modular-OmniFlow")).await.unwrap();
    let err = ana.toggle_vote(&key("modular-OmniFlow")).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::RateLimit);

    luis.toggle_vote(&key("modular-OmniFlow")).await.unwrap();

    ana.close().await;
    luis.close().await;
}

#[tokio::test]
async fn test_malformed_ballots_are_skipped() {
    let app = TestApp::with_tree(json!({
        "votes": {
            "Ana": {"speed-TurboFlow": true},
            "Broken": "not a ballot",
            "Odd": {"speed-TurboFlow": "yes"}
        }
    }));
    let luis = app.join("Luis").await.unwrap();

    assert_eq!(luis.standings().voters, 1);
    let popularity = luis.with_aggregator(|agg| agg.item_popularity(&key("speed-TurboFlow")));
    assert_eq!(popularity.count, 1);
    assert_eq!(popularity.percentage, 100);

    luis.close().await;
}
