//! Tallies computed from one consistent set of snapshots.
//!
//! Nothing here mutates its inputs or reads the clock, so recomputing on
//! every store update is always safe.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use votehub_core::result::AppResult;
use votehub_entity::{Catalog, ItemKey, LedgerSnapshot, SubmissionSnapshot};

use super::badge::{Badge, popularity_badge};

/// Support for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Popularity {
    /// Voters who selected the item.
    pub count: usize,
    /// `count` as a rounded share of all voters with any vote, 0..=100.
    pub percentage: u32,
    /// Who selected it, in identity order.
    pub supporting_voters: Vec<String>,
}

/// One row of a category ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    /// The item.
    pub key: ItemKey,
    /// Its support.
    pub popularity: Popularity,
    /// Its badge.
    pub badge: Badge,
    /// Who submitted it; `None` for seed items.
    pub submitter: Option<String>,
}

/// Headline numbers for the whole vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standings {
    /// Voters with at least one selected item.
    pub voters: usize,
    /// Voters whose presence is fresh.
    pub live_users: usize,
    /// Submitted items across all categories.
    pub total_submissions: usize,
}

/// `count / total * 100`, rounded half up; 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let count = count.min(total) as u64;
    let total = total as u64;
    ((200 * count + total) / (2 * total)) as u32
}

/// Read-only view over ledger, catalog and submissions.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    ledger: &'a LedgerSnapshot,
    catalog: &'a Catalog,
    submissions: &'a SubmissionSnapshot,
}

impl<'a> Aggregator<'a> {
    /// Create an aggregator over the given snapshots.
    pub fn new(
        ledger: &'a LedgerSnapshot,
        catalog: &'a Catalog,
        submissions: &'a SubmissionSnapshot,
    ) -> Self {
        Self {
            ledger,
            catalog,
            submissions,
        }
    }

    /// Voters whose ballot has at least one `true` entry.
    pub fn voters_with_any_vote(&self) -> BTreeSet<String> {
        self.ledger
            .iter()
            .filter(|(_, ballot)| ballot.has_any_vote())
            .map(|(voter, _)| voter.to_string())
            .collect()
    }

    /// Support for `item_key`.
    pub fn item_popularity(&self, item_key: &ItemKey) -> Popularity {
        let raw = item_key.to_string();
        let mut voters = 0;
        let mut supporting_voters = Vec::new();

        for (voter, ballot) in self.ledger.iter() {
            if !ballot.has_any_vote() {
                continue;
            }
            voters += 1;
            if ballot.get_raw(&raw) {
                supporting_voters.push(voter.to_string());
            }
        }

        let count = supporting_voters.len();
        Popularity {
            count,
            percentage: percentage(count, voters),
            supporting_voters,
        }
    }

    /// Badge for `item_key`.
    pub fn item_badge(&self, item_key: &ItemKey) -> Badge {
        let popularity = self.item_popularity(item_key);
        popularity_badge(popularity.count, popularity.percentage)
    }

    /// Number of items `voter` has selected.
    pub fn voter_totals(&self, voter: &str) -> usize {
        self.ledger.ballot(voter).map_or(0, |b| b.total())
    }

    /// Number of items `voter` has selected in one category.
    pub fn category_votes(&self, voter: &str, category_id: &str) -> usize {
        self.ledger.ballot(voter).map_or(0, |ballot| {
            ballot
                .selected()
                .filter(|key| {
                    key.split_once('-')
                        .is_some_and(|(category, _)| category == category_id)
                })
                .count()
        })
    }

    /// Items `voter` has selected, in key order. Unparseable keys are skipped.
    pub fn favorites(&self, voter: &str) -> Vec<ItemKey> {
        self.ledger.ballot(voter).map_or_else(Vec::new, |ballot| {
            ballot
                .selected()
                .filter_map(|key| ItemKey::parse(key).ok())
                .collect()
        })
    }

    /// Submitted items across all categories.
    pub fn total_submissions(&self) -> usize {
        self.submissions.total()
    }

    /// Every votable item of a category ranked by support.
    ///
    /// Seeds come before submissions in catalog order, and ties keep that
    /// order. Submissions sharing a name share one row.
    pub fn ranked_items(&self, category_id: &str) -> AppResult<Vec<RankedItem>> {
        let category = self.catalog.require(category_id)?;

        let mut rows: Vec<RankedItem> = Vec::new();
        let mut seen = BTreeSet::new();

        let seeds = category.seed_keys().map(|key| (key, None));
        let contributed = self
            .submissions
            .for_category(category_id)
            .iter()
            .map(|entry| (entry.item_key(), Some(entry.submission.submitter.clone())));

        for (key, submitter) in seeds.chain(contributed) {
            if !seen.insert(key.clone()) {
                continue;
            }
            let popularity = self.item_popularity(&key);
            let badge = popularity_badge(popularity.count, popularity.percentage);
            rows.push(RankedItem {
                key,
                popularity,
                badge,
                submitter,
            });
        }

        rows.sort_by(|a, b| b.popularity.count.cmp(&a.popularity.count));
        Ok(rows)
    }

    /// Headline numbers, given how many voters are currently live.
    pub fn standings(&self, live_users: usize) -> Standings {
        Standings {
            voters: self.voters_with_any_vote().len(),
            live_users,
            total_submissions: self.total_submissions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ledger(value: serde_json::Value) -> LedgerSnapshot {
        LedgerSnapshot::from_value(&value).unwrap().value
    }

    fn key(raw: &str) -> ItemKey {
        ItemKey::parse(raw).unwrap()
    }

    #[test]
    fn test_percentage_rounds_half_up() {
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(0, 0), 0);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn test_two_voter_scenario() {
        let catalog = Catalog::seeded();
        let submissions = SubmissionSnapshot::new();
        let ledger = ledger(json!({
            "Ana": {"hispanic-ConversaFlow": true, "hispanic-AmigaAI": true},
            "Luis": {"hispanic-ConversaFlow": true},
        }));
        let agg = Aggregator::new(&ledger, &catalog, &submissions);

        let voters: Vec<_> = agg.voters_with_any_vote().into_iter().collect();
        assert_eq!(voters, vec!["Ana", "Luis"]);

        let flow = agg.item_popularity(&key("hispanic-ConversaFlow"));
        assert_eq!((flow.count, flow.percentage), (2, 100));
        assert_eq!(flow.supporting_voters, vec!["Ana", "Luis"]);

        let amiga = agg.item_popularity(&key("hispanic-AmigaAI"));
        assert_eq!((amiga.count, amiga.percentage), (1, 50));

        assert_eq!(agg.voter_totals("Ana"), 2);
        assert_eq!(agg.voter_totals("Luis"), 1);
        assert_eq!(agg.voter_totals("Nadie"), 0);
    }

    #[test]
    fn test_retracted_only_ballot_is_not_a_voter() {
        let catalog = Catalog::seeded();
        let submissions = SubmissionSnapshot::new();
        let ledger = ledger(json!({
            "Ana": {"speed-TurboFlow": true},
            "Luis": {"speed-TurboFlow": false},
        }));
        let agg = Aggregator::new(&ledger, &catalog, &submissions);
        assert_eq!(agg.voters_with_any_vote().len(), 1);
        assert_eq!(agg.item_popularity(&key("speed-TurboFlow")).percentage, 100);
    }

    #[test]
    fn test_percentage_stays_in_bounds() {
        let catalog = Catalog::seeded();
        let submissions = SubmissionSnapshot::new();
        let empty = LedgerSnapshot::new();
        let agg = Aggregator::new(&empty, &catalog, &submissions);
        assert_eq!(agg.item_popularity(&key("speed-TurboFlow")).percentage, 0);

        let ledger = ledger(json!({
            "A": {"speed-TurboFlow": true},
            "B": {"speed-Other": true},
            "C": {"speed-TurboFlow": true, "speed-Other": true},
        }));
        let agg = Aggregator::new(&ledger, &catalog, &submissions);
        for raw in ["speed-TurboFlow", "speed-Other", "speed-Missing"] {
            let p = agg.item_popularity(&key(raw)).percentage;
            assert!(p <= 100);
        }
    }

    #[test]
    fn test_category_votes_and_favorites() {
        let catalog = Catalog::seeded();
        let submissions = SubmissionSnapshot::new();
        let ledger = ledger(json!({
            "Ana": {
                "speed-TurboFlow": true,
                "speed-user-Rayo-X": true,
                "hispanic-AmigaAI": true,
                "hispanic-ConversaFlow": false,
            },
        }));
        let agg = Aggregator::new(&ledger, &catalog, &submissions);
        assert_eq!(agg.category_votes("Ana", "speed"), 2);
        assert_eq!(agg.category_votes("Ana", "hispanic"), 1);
        assert_eq!(agg.category_votes("Ana", "modular"), 0);

        let favorites: Vec<String> = agg.favorites("Ana").iter().map(|k| k.to_string()).collect();
        assert_eq!(
            favorites,
            vec!["hispanic-AmigaAI", "speed-TurboFlow", "speed-user-Rayo-X"]
        );
    }

    #[test]
    fn test_ranked_items_orders_by_count_with_stable_ties() {
        let catalog = Catalog::seeded();
        let category = catalog.get("hispanic").unwrap();
        let first = category.seed_names[0].clone();
        let third = category.seed_names[2].clone();

        let submissions = SubmissionSnapshot::from_value(&json!({
            "hispanic": {
                "-a": {"name": "Nuevo", "submitter": "Ana", "timestamp": 1},
                "-b": {"name": "Nuevo", "submitter": "Luis", "timestamp": 2},
            }
        }))
        .unwrap()
        .value;
        let ledger = ledger(json!({
            "Ana": {format!("hispanic-{third}"): true, "hispanic-user-Nuevo": true},
            "Luis": {format!("hispanic-{third}"): true},
        }));
        let agg = Aggregator::new(&ledger, &catalog, &submissions);
        let rows = agg.ranked_items("hispanic").unwrap();

        assert_eq!(rows.len(), category.seed_names.len() + 1);
        assert_eq!(rows[0].key.display_name(), third);
        assert_eq!(rows[0].badge, Badge::Favorite);
        assert_eq!(rows[1].key.to_string(), "hispanic-user-Nuevo");
        assert_eq!(rows[1].submitter.as_deref(), Some("Ana"));
        assert_eq!(rows[1].badge, Badge::Popular);
        assert_eq!(rows[2].key.display_name(), first);
        assert_eq!(rows[2].badge, Badge::None);
    }

    #[test]
    fn test_ranked_items_unknown_category() {
        let catalog = Catalog::seeded();
        let submissions = SubmissionSnapshot::new();
        let empty = LedgerSnapshot::new();
        let agg = Aggregator::new(&empty, &catalog, &submissions);
        let err = agg.ranked_items("nope").unwrap_err();
        assert_eq!(err.kind, votehub_core::error::ErrorKind::UnknownCategory);
    }

    #[test]
    fn test_standings() {
        let catalog = Catalog::seeded();
        let submissions = SubmissionSnapshot::from_value(&json!({
            "speed": {"-a": {"name": "Rayo", "submitter": "Ana", "timestamp": 1}},
            "modular": {"-b": {"name": "Lego", "submitter": "Luis", "timestamp": 2}},
        }))
        .unwrap()
        .value;
        let ledger = ledger(json!({"Ana": {"speed-user-Rayo": true}}));
        let agg = Aggregator::new(&ledger, &catalog, &submissions);
        assert_eq!(
            agg.standings(3),
            Standings {
                voters: 1,
                live_users: 3,
                total_submissions: 2
            }
        );
    }
}
