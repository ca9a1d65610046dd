//! Recommendation engine: behavior tracking plus the scoring, annotation
//! and boosting pipeline.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::domain::behavior::{BehaviorAction, BehaviorMetadata, UserBehaviorProfile};
use crate::domain::product::{Product, ProductId};
use crate::errors::{DomainError, EngineError};
use crate::repository::{AnalyticsSource, ProfileRepository};

use super::scoring::AffinityScorer;
use super::triggers::triggers_for;
use super::types::{ScoredProduct, SessionContext, Trigger};
use super::RecResult;

type ProfileMap = HashMap<String, UserBehaviorProfile>;

/// The recommendation and ranking engine. Owns the in-process profile map
/// and persists it through the injected repository after every recorded
/// event. All scoring is synchronous, pure computation; only persistence
/// and the analytics fetch are async.
pub struct RecommendationEngine {
    config: EngineConfig,
    scorer: AffinityScorer,
    profiles: RwLock<ProfileMap>,
    repository: Arc<dyn ProfileRepository>,
}

impl RecommendationEngine {
    /// Load persisted profiles and build an engine with default tuning.
    /// A load failure is recoverable: the engine logs it and starts empty.
    pub async fn new(repository: Arc<dyn ProfileRepository>) -> Self {
        Self::with_config(EngineConfig::default(), repository).await
    }

    pub async fn with_config(config: EngineConfig, repository: Arc<dyn ProfileRepository>) -> Self {
        let profiles = match repository.load().await {
            Ok(profiles) => profiles,
            Err(err) => {
                warn!(error = %err, "failed to load behavior profiles, starting empty");
                ProfileMap::new()
            }
        };

        let scorer = AffinityScorer::new(config.weights, config.session);
        Self { config, scorer, profiles: RwLock::new(profiles), repository }
    }

    /// Record one behavior event for a user, creating the profile on first
    /// contact. The in-memory update always sticks; a persistence failure is
    /// reported to the caller but never rolled back, since the in-memory map
    /// is the source of truth for the rest of the process lifetime.
    pub async fn record_behavior(
        &self,
        user_id: &str,
        product_id: &str,
        action: BehaviorAction,
        metadata: Option<BehaviorMetadata>,
    ) -> RecResult<()> {
        if user_id.trim().is_empty() {
            return Err(DomainError::MissingField("user_id").into());
        }
        if product_id.trim().is_empty() {
            return Err(DomainError::MissingField("product_id").into());
        }

        let metadata = metadata.unwrap_or_default();
        let search_term = match action {
            BehaviorAction::Search => {
                Some(metadata.term.clone().ok_or(DomainError::MissingSearchTerm)?)
            }
            _ => None,
        };

        let now = Utc::now();
        let snapshot = {
            let mut profiles = self.write_profiles();
            let profile = profiles
                .entry(user_id.to_owned())
                .or_insert_with(|| UserBehaviorProfile::new(now));
            profile.last_activity = now;

            let product_id = ProductId::from(product_id);
            match action {
                BehaviorAction::View => {
                    *profile.views.entry(product_id).or_insert(0) += 1;
                }
                BehaviorAction::Click => {
                    *profile.clicks.entry(product_id).or_insert(0) += 1;
                }
                BehaviorAction::Purchase => {
                    // Malformed or absent quantity falls back to 1.
                    let quantity =
                        metadata.quantity.filter(|qty| *qty > 0).unwrap_or(1) as u64;
                    *profile.purchases.entry(product_id).or_insert(0) += quantity;
                }
                BehaviorAction::Search => {
                    let term = search_term.unwrap_or_default();
                    profile.record_search(term, now, self.config.limits.search_history);
                }
            }

            profiles.clone()
        };

        if let Err(err) = self.repository.save(&snapshot).await {
            warn!(user_id, error = %err, "failed to persist behavior profiles");
            return Err(EngineError::Persistence(err));
        }

        Ok(())
    }

    /// Per-product affinity scores for one user (spec'd weighted sum).
    pub fn compute_affinity(
        &self,
        user_id: &str,
        products: &[Product],
    ) -> HashMap<ProductId, f64> {
        let profiles = self.read_profiles();
        self.scorer.compute_affinity(profiles.get(user_id), products)
    }

    /// Attach psychology triggers to every candidate. Pure: reads only the
    /// user's aggregate view total, never mutates behavior state.
    pub fn annotate(&self, products: &[Product], user_id: &str) -> Vec<ScoredProduct> {
        let total_views = self.total_views(user_id);
        let now = Utc::now();
        products
            .iter()
            .map(|product| {
                let mut scored = ScoredProduct::from_product(product.clone());
                scored.psychology_triggers = self.triggers_at(&scored.product, total_views, now);
                scored
            })
            .collect()
    }

    /// Apply the freshness/scarcity boosts and re-sort descending by the
    /// boosted score. The sort is stable: ties keep input order.
    pub fn boost(&self, mut scored: Vec<ScoredProduct>) -> Vec<ScoredProduct> {
        let now = Utc::now();
        self.boost_in_place(&mut scored, now);
        scored
    }

    /// Full personalized pipeline: affinity → sort → annotate → boost →
    /// truncate. Deterministic for a fixed profile, product list and time.
    pub async fn generate_recommendations(
        &self,
        user_id: &str,
        all_products: &[Product],
        limit: Option<usize>,
    ) -> Vec<ScoredProduct> {
        let limit = limit.unwrap_or(self.config.limits.recommendations);
        let now = Utc::now();

        let scores = self.compute_affinity(user_id, all_products);
        let mut scored: Vec<ScoredProduct> = all_products
            .iter()
            .map(|product| {
                let mut item = ScoredProduct::from_product(product.clone());
                item.affinity_score = scores.get(&product.id).copied().unwrap_or(0.0);
                item
            })
            .collect();
        sort_desc_by(&mut scored, |item| item.affinity_score);

        let total_views = self.total_views(user_id);
        for item in &mut scored {
            item.psychology_triggers = self.triggers_at(&item.product, total_views, now);
        }

        self.boost_in_place(&mut scored, now);
        scored.truncate(limit);

        debug!(user_id, candidates = all_products.len(), returned = scored.len(), "generated recommendations");
        scored
    }

    /// Same-session, stateless ranking. Never touches behavior profiles;
    /// viewed ids missing from the catalog contribute nothing.
    pub fn session_recommendations(
        &self,
        session: &SessionContext,
        all_products: &[Product],
        limit: Option<usize>,
    ) -> Vec<ScoredProduct> {
        let limit = limit.unwrap_or(self.config.limits.session);
        let catalog: HashMap<&str, &Product> =
            all_products.iter().map(|product| (product.id.as_str(), product)).collect();

        let mut scored: Vec<ScoredProduct> = all_products
            .iter()
            .map(|product| {
                let mut item = ScoredProduct::from_product(product.clone());
                item.session_score = self.scorer.session_score(session, product, &catalog);
                item
            })
            .collect();

        sort_desc_by(&mut scored, |item| item.session_score);
        scored.truncate(limit);
        scored
    }

    /// Trending ranking over externally-maintained counters: sales weighted
    /// above search mentions of the product's name + description.
    pub async fn trending_products(
        &self,
        all_products: &[Product],
        analytics: &dyn AnalyticsSource,
        limit: Option<usize>,
    ) -> Vec<ScoredProduct> {
        let limit = limit.unwrap_or(self.config.limits.trending);
        let search_hits = analytics.search_hits().await;

        let mut scored = Vec::with_capacity(all_products.len());
        for product in all_products {
            let sales = analytics.sales_count(&product.id).await;
            let text = product.display_text();
            let mentions: u64 = search_hits
                .iter()
                .filter(|(term, _)| text.contains(&term.to_lowercase()))
                .map(|(_, count)| *count)
                .sum();

            let mut item = ScoredProduct::from_product(product.clone());
            item.sales_count = sales;
            item.search_mentions = mentions;
            item.trending_score = self.config.trending.sales * sales as f64 + mentions as f64;
            scored.push(item);
        }

        sort_desc_by(&mut scored, |item| item.trending_score);
        scored.truncate(limit);
        scored
    }

    /// Products created within the freshness window, annotated and boosted.
    pub fn new_arrivals(
        &self,
        user_id: &str,
        all_products: &[Product],
        limit: Option<usize>,
    ) -> Vec<ScoredProduct> {
        let limit = limit.unwrap_or(self.config.limits.new_arrivals);
        let now = Utc::now();
        let window = self.config.freshness_window_days;

        let fresh: Vec<Product> = all_products
            .iter()
            .filter(|product| product.is_new(now, window))
            .cloned()
            .collect();

        let mut scored = self.annotate(&fresh, user_id);
        self.boost_in_place(&mut scored, now);
        scored.truncate(limit);
        scored
    }

    /// Snapshot of one user's profile, mainly for inspection and tests.
    pub fn profile(&self, user_id: &str) -> Option<UserBehaviorProfile> {
        self.read_profiles().get(user_id).cloned()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn triggers_at(
        &self,
        product: &Product,
        total_views: u64,
        now: DateTime<Utc>,
    ) -> Vec<Trigger> {
        triggers_for(
            product,
            total_views,
            &self.config.triggers,
            self.config.freshness_window_days,
            now,
        )
    }

    fn boost_in_place(&self, scored: &mut [ScoredProduct], now: DateTime<Utc>) {
        let window = self.config.freshness_window_days;
        for item in scored.iter_mut() {
            let mut boost = 1.0;
            if item.product.is_new(now, window) {
                boost *= self.config.boosts.new_product;
            }
            if item.product.stock < self.config.boosts.low_stock_threshold {
                boost *= self.config.boosts.low_stock;
            }
            item.boosted_score = item.affinity_score * boost;
        }
        sort_desc_by(scored, |item| item.boosted_score);
    }

    fn total_views(&self, user_id: &str) -> u64 {
        self.read_profiles().get(user_id).map(UserBehaviorProfile::total_views).unwrap_or(0)
    }

    fn read_profiles(&self) -> RwLockReadGuard<'_, ProfileMap> {
        // Counters are plain data; a poisoned lock is still consistent.
        self.profiles.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_profiles(&self) -> RwLockWriteGuard<'_, ProfileMap> {
        self.profiles.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn sort_desc_by(items: &mut [ScoredProduct], score: impl Fn(&ScoredProduct) -> f64) {
    items.sort_by(|a, b| score(b).partial_cmp(&score(a)).unwrap_or(Ordering::Equal));
}
