//! Selling-psychology trigger rules.
//!
//! Each rule is evaluated independently; a product may accumulate several
//! triggers. Rules append in a fixed order so annotated output is
//! deterministic.

use chrono::{DateTime, Utc};

use crate::config::TriggerRules;
use crate::domain::product::Product;

use super::types::{Trigger, TriggerKind, TriggerLevel};

/// Evaluate every trigger rule for one product. `total_user_views` is the
/// sum of the requesting user's view counters across all products.
pub fn triggers_for(
    product: &Product,
    total_user_views: u64,
    rules: &TriggerRules,
    freshness_window_days: i64,
    now: DateTime<Utc>,
) -> Vec<Trigger> {
    let mut triggers = Vec::new();

    if product.stock < rules.low_stock_threshold {
        triggers.push(Trigger {
            kind: TriggerKind::Urgency,
            message: format!("Only {} left in stock!", product.stock),
            level: TriggerLevel::High,
        });
    }

    if product.is_new(now, freshness_window_days) {
        triggers.push(Trigger {
            kind: TriggerKind::Urgency,
            message: "New arrival!".to_string(),
            level: TriggerLevel::Medium,
        });
    }

    if total_user_views > rules.popular_view_total {
        triggers.push(Trigger {
            kind: TriggerKind::SocialProof,
            message: "Popular choice among shoppers".to_string(),
            level: TriggerLevel::Medium,
        });
    }

    if product.tags.iter().any(|tag| tag == &rules.bestseller_tag) {
        triggers.push(Trigger {
            kind: TriggerKind::SocialProof,
            message: "Bestseller".to_string(),
            level: TriggerLevel::High,
        });
    }

    if product.tags.iter().any(|tag| tag == &rules.limited_tag) {
        triggers.push(Trigger {
            kind: TriggerKind::Scarcity,
            message: "Limited edition".to_string(),
            level: TriggerLevel::High,
        });
    }

    if product.price < rules.value_price_threshold {
        triggers.push(Trigger {
            kind: TriggerKind::Value,
            message: "Great value".to_string(),
            level: TriggerLevel::Low,
        });
    }

    triggers
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::config::TriggerRules;
    use crate::domain::product::{Product, ProductId};
    use crate::recommendations::types::{TriggerKind, TriggerLevel};

    use super::triggers_for;

    fn product() -> Product {
        Product {
            id: ProductId::from("p1"),
            name: "Desk Lamp".to_string(),
            description: String::new(),
            price: 120.0,
            previous_price: None,
            stock: 50,
            tags: Vec::new(),
            categories: Vec::new(),
            created_at: None,
        }
    }

    #[test]
    fn quiet_product_gets_no_triggers() {
        let triggers = triggers_for(&product(), 0, &TriggerRules::default(), 7, Utc::now());
        assert!(triggers.is_empty());
    }

    #[test]
    fn all_matching_rules_fire_in_fixed_order() {
        let now = Utc::now();
        let mut candidate = product();
        candidate.stock = 4;
        candidate.created_at = Some(now - Duration::days(2));
        candidate.tags = vec!["bestseller".to_string()];
        candidate.price = 30.0;

        let triggers = triggers_for(&candidate, 0, &TriggerRules::default(), 7, now);

        let kinds: Vec<_> = triggers.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TriggerKind::Urgency,
                TriggerKind::Urgency,
                TriggerKind::SocialProof,
                TriggerKind::Value,
            ]
        );
        assert_eq!(triggers[0].message, "Only 4 left in stock!");
        assert_eq!(triggers[0].level, TriggerLevel::High);
        assert_eq!(triggers[1].message, "New arrival!");
        assert_eq!(triggers[1].level, TriggerLevel::Medium);
        assert_eq!(triggers[2].message, "Bestseller");
        assert_eq!(triggers[2].level, TriggerLevel::High);
        assert_eq!(triggers[3].message, "Great value");
        assert_eq!(triggers[3].level, TriggerLevel::Low);
    }

    #[test]
    fn popular_choice_needs_more_than_threshold_views() {
        let rules = TriggerRules::default();
        let now = Utc::now();

        let at_threshold = triggers_for(&product(), 100, &rules, 7, now);
        assert!(at_threshold.is_empty());

        let above = triggers_for(&product(), 101, &rules, 7, now);
        assert_eq!(above.len(), 1);
        assert_eq!(above[0].kind, TriggerKind::SocialProof);
        assert_eq!(above[0].message, "Popular choice among shoppers");
    }

    #[test]
    fn limited_tag_is_matched_case_sensitively() {
        let now = Utc::now();
        let mut candidate = product();
        candidate.tags = vec!["Limited".to_string()];
        assert!(triggers_for(&candidate, 0, &TriggerRules::default(), 7, now).is_empty());

        candidate.tags = vec!["limited".to_string()];
        let triggers = triggers_for(&candidate, 0, &TriggerRules::default(), 7, now);
        assert_eq!(triggers.len(), 1);
        assert_eq!(triggers[0].kind, TriggerKind::Scarcity);
    }

    #[test]
    fn annotation_is_idempotent() {
        let now = Utc::now();
        let mut candidate = product();
        candidate.stock = 3;
        candidate.tags = vec!["limited".to_string()];

        let first = triggers_for(&candidate, 0, &TriggerRules::default(), 7, now);
        let second = triggers_for(&candidate, 0, &TriggerRules::default(), 7, now);
        assert_eq!(first, second);
    }
}
