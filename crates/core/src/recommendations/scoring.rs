//! Affinity and similarity scoring.

use std::collections::{HashMap, HashSet};

use crate::config::{ScoringWeights, SessionWeights};
use crate::domain::behavior::UserBehaviorProfile;
use crate::domain::product::{Product, ProductId};

use super::types::SessionContext;

/// Deterministic weighted-sum scorer. Pure computation over its inputs:
/// the same profile and candidate list always produce the same scores.
#[derive(Clone, Copy, Debug, Default)]
pub struct AffinityScorer {
    weights: ScoringWeights,
    session: SessionWeights,
}

impl AffinityScorer {
    pub fn new(weights: ScoringWeights, session: SessionWeights) -> Self {
        Self { weights, session }
    }

    /// Per-product affinity for one user: a linear sum of view, click and
    /// purchase counters, plus a flat bonus per distinct past search term
    /// matching the product text, plus a category-affinity term fed by views
    /// of other products sharing at least one category. Scores are rounded
    /// to two decimals. An unknown user scores zero everywhere.
    pub fn compute_affinity(
        &self,
        profile: Option<&UserBehaviorProfile>,
        products: &[Product],
    ) -> HashMap<ProductId, f64> {
        let Some(profile) = profile else {
            return products.iter().map(|product| (product.id.clone(), 0.0)).collect();
        };

        let search_terms: HashSet<String> =
            profile.searches.iter().map(|record| record.term.to_lowercase()).collect();

        // Viewed products are cross-referenced against the candidate list
        // once up front; ids no longer in the catalog contribute nothing.
        let viewed: Vec<(&ProductId, &[String], u64)> = products
            .iter()
            .filter_map(|product| {
                profile
                    .views
                    .get(&product.id)
                    .map(|count| (&product.id, product.categories.as_slice(), *count))
            })
            .collect();

        let mut scores = HashMap::with_capacity(products.len());
        for product in products {
            let mut score = 0.0;

            score += count_for(&profile.views, &product.id) * self.weights.view;
            score += count_for(&profile.clicks, &product.id) * self.weights.click;
            score += count_for(&profile.purchases, &product.id) * self.weights.purchase;

            let corpus = product.search_corpus();
            for term in &search_terms {
                if corpus.contains(term.as_str()) {
                    score += self.weights.search_match;
                }
            }

            let category_views: u64 = viewed
                .iter()
                .filter(|(viewed_id, categories, _)| {
                    *viewed_id != &product.id && shares_category(categories, &product.categories)
                })
                .map(|(_, _, count)| *count)
                .sum();
            score += category_views as f64 * self.weights.category_view;

            scores.insert(product.id.clone(), round2(score));
        }

        scores
    }

    /// Session score for one candidate: similarity to every product the
    /// session has viewed, plus a flat bonus per session search term found
    /// in the candidate's name + description. Viewed ids missing from the
    /// catalog are skipped silently.
    pub fn session_score(
        &self,
        session: &SessionContext,
        candidate: &Product,
        catalog: &HashMap<&str, &Product>,
    ) -> f64 {
        let mut score = 0.0;

        for viewed_id in &session.viewed_products {
            let Some(viewed) = catalog.get(viewed_id.as_str()) else {
                continue;
            };
            score += self.session.viewed_similarity * self.similarity(viewed, candidate);
        }

        let text = candidate.display_text();
        for term in &session.search_terms {
            if text.contains(&term.to_lowercase()) {
                score += self.session.search_match;
            }
        }

        score
    }

    /// Pairwise product similarity: shared categories, shared tags, and a
    /// flat bonus when prices sit within the configured relative band. The
    /// price test is skipped when the average price is not positive.
    pub fn similarity(&self, a: &Product, b: &Product) -> f64 {
        let shared_categories =
            a.categories.iter().filter(|category| b.categories.contains(category)).count();
        let shared_tags = a.tags.iter().filter(|tag| b.tags.contains(tag)).count();

        let mut similarity = shared_categories as f64 * self.session.shared_category
            + shared_tags as f64 * self.session.shared_tag;

        let avg_price = (a.price + b.price) / 2.0;
        if avg_price > 0.0 && (a.price - b.price).abs() / avg_price < self.session.price_band {
            similarity += self.session.price_bonus;
        }

        similarity
    }
}

fn count_for(counters: &HashMap<ProductId, u64>, id: &ProductId) -> f64 {
    counters.get(id).copied().unwrap_or(0) as f64
}

fn shares_category(a: &[String], b: &[String]) -> bool {
    a.iter().any(|category| b.contains(category))
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
