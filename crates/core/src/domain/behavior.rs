use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::ProductId;

/// One recorded search, newest entries kept at the tail of the history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub term: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-user behavioral signal counters. Created lazily on the first recorded
/// event; counters only ever grow. Absent entries read as zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBehaviorProfile {
    #[serde(default)]
    pub views: HashMap<ProductId, u64>,
    #[serde(default)]
    pub clicks: HashMap<ProductId, u64>,
    #[serde(default)]
    pub purchases: HashMap<ProductId, u64>,
    #[serde(default)]
    pub searches: Vec<SearchRecord>,
    pub last_activity: DateTime<Utc>,
}

impl UserBehaviorProfile {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            views: HashMap::new(),
            clicks: HashMap::new(),
            purchases: HashMap::new(),
            searches: Vec::new(),
            last_activity: now,
        }
    }

    /// Total views across every product, the signal behind the
    /// "popular choice" trigger.
    pub fn total_views(&self) -> u64 {
        self.views.values().sum()
    }

    /// Append a search, evicting the oldest entries beyond `cap`.
    pub fn record_search(&mut self, term: String, now: DateTime<Utc>, cap: usize) {
        self.searches.push(SearchRecord { term, timestamp: now });
        if self.searches.len() > cap {
            let excess = self.searches.len() - cap;
            self.searches.drain(..excess);
        }
    }
}

/// Behavior event kinds accepted by the engine. Serialized with the wire
/// names the storefront clients send.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BehaviorAction {
    View,
    Click,
    Purchase,
    Search,
}

/// Optional per-event payload: purchase quantity or search term.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorMetadata {
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub term: Option<String>,
}

impl BehaviorMetadata {
    pub fn quantity(quantity: i64) -> Self {
        Self { quantity: Some(quantity), term: None }
    }

    pub fn term(term: impl Into<String>) -> Self {
        Self { quantity: None, term: Some(term.into()) }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::UserBehaviorProfile;

    #[test]
    fn search_history_is_capped_to_most_recent() {
        let now = Utc::now();
        let mut profile = UserBehaviorProfile::new(now);

        for i in 0..25 {
            profile.record_search(format!("term-{i}"), now, 20);
        }

        assert_eq!(profile.searches.len(), 20);
        assert_eq!(profile.searches.first().map(|s| s.term.as_str()), Some("term-5"));
        assert_eq!(profile.searches.last().map(|s| s.term.as_str()), Some("term-24"));
    }

    #[test]
    fn total_views_sums_all_products() {
        let now = Utc::now();
        let mut profile = UserBehaviorProfile::new(now);
        profile.views.insert("p1".into(), 3);
        profile.views.insert("p2".into(), 4);

        assert_eq!(profile.total_views(), 7);
    }
}
