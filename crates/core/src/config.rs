//! Engine tuning knobs.
//!
//! Every threshold and weight in the scoring pipeline is configuration, not
//! a hard-coded literal, but the defaults are the canonical hand-tuned
//! values and should not be changed without a new business requirement.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not parse engine config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

/// Weights for the per-user affinity sum. Purchase signal dominates click
/// dominates view; an explicit search-term hit is the strongest signal.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub view: f64,
    pub click: f64,
    pub purchase: f64,
    pub search_match: f64,
    pub category_view: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self { view: 0.5, click: 2.0, purchase: 5.0, search_match: 10.0, category_view: 0.3 }
    }
}

/// Weights for the anonymous-session scoring path.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionWeights {
    pub viewed_similarity: f64,
    pub search_match: f64,
    pub shared_category: f64,
    pub shared_tag: f64,
    /// Relative price distance below which two products count as
    /// similarly priced.
    pub price_band: f64,
    pub price_bonus: f64,
}

impl Default for SessionWeights {
    fn default() -> Self {
        Self {
            viewed_similarity: 2.0,
            search_match: 5.0,
            shared_category: 2.0,
            shared_tag: 1.5,
            price_band: 0.2,
            price_bonus: 3.0,
        }
    }
}

/// Thresholds for the persuasive-messaging trigger rules.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TriggerRules {
    pub low_stock_threshold: u32,
    pub popular_view_total: u64,
    pub bestseller_tag: String,
    pub limited_tag: String,
    pub value_price_threshold: f64,
}

impl Default for TriggerRules {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
            popular_view_total: 100,
            bestseller_tag: "bestseller".to_string(),
            limited_tag: "limited".to_string(),
            value_price_threshold: 50.0,
        }
    }
}

/// Multiplicative boosts applied after affinity scoring.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BoostRules {
    pub new_product: f64,
    pub low_stock: f64,
    pub low_stock_threshold: u32,
}

impl Default for BoostRules {
    fn default() -> Self {
        Self { new_product: 1.5, low_stock: 1.3, low_stock_threshold: 5 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrendingWeights {
    /// Sales are weighted more heavily than search mentions.
    pub sales: f64,
}

impl Default for TrendingWeights {
    fn default() -> Self {
        Self { sales: 2.0 }
    }
}

/// Default result counts and the search-history cap.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub recommendations: usize,
    pub session: usize,
    pub trending: usize,
    pub new_arrivals: usize,
    pub search_history: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self { recommendations: 12, session: 8, trending: 12, new_arrivals: 8, search_history: 20 }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window (in days) within which a product counts as newly listed, used
    /// by both the "New arrival!" trigger and the recency boost.
    pub freshness_window_days: i64,
    pub weights: ScoringWeights,
    pub session: SessionWeights,
    pub triggers: TriggerRules,
    pub boosts: BoostRules,
    pub trending: TrendingWeights,
    pub limits: Limits,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            freshness_window_days: 7,
            weights: ScoringWeights::default(),
            session: SessionWeights::default(),
            triggers: TriggerRules::default(),
            boosts: BoostRules::default(),
            trending: TrendingWeights::default(),
            limits: Limits::default(),
        }
    }
}

impl EngineConfig {
    /// Parse a TOML patch over the defaults. Sections and fields may be
    /// omitted; anything absent keeps its default value.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.freshness_window_days <= 0 {
            return Err(ConfigError::Validation(
                "freshness_window_days must be greater than zero".to_string(),
            ));
        }

        let weights = [
            self.weights.view,
            self.weights.click,
            self.weights.purchase,
            self.weights.search_match,
            self.weights.category_view,
            self.session.viewed_similarity,
            self.session.search_match,
            self.session.shared_category,
            self.session.shared_tag,
            self.session.price_bonus,
            self.boosts.new_product,
            self.boosts.low_stock,
            self.trending.sales,
        ];
        if weights.iter().any(|weight| !weight.is_finite() || *weight < 0.0) {
            return Err(ConfigError::Validation(
                "scoring weights must be finite and non-negative".to_string(),
            ));
        }

        if !(0.0..1.0).contains(&self.session.price_band) || self.session.price_band == 0.0 {
            return Err(ConfigError::Validation(
                "session.price_band must be in range (0, 1)".to_string(),
            ));
        }

        if self.limits.search_history == 0 {
            return Err(ConfigError::Validation(
                "limits.search_history must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};

    #[test]
    fn defaults_carry_canonical_constants() {
        let config = EngineConfig::default();

        assert_eq!(config.weights.view, 0.5);
        assert_eq!(config.weights.click, 2.0);
        assert_eq!(config.weights.purchase, 5.0);
        assert_eq!(config.weights.search_match, 10.0);
        assert_eq!(config.weights.category_view, 0.3);
        assert_eq!(config.freshness_window_days, 7);
        assert_eq!(config.triggers.popular_view_total, 100);
        assert_eq!(config.boosts.new_product, 1.5);
        assert_eq!(config.boosts.low_stock, 1.3);
        assert_eq!(config.limits.recommendations, 12);
        assert_eq!(config.limits.session, 8);
        assert_eq!(config.limits.search_history, 20);
    }

    #[test]
    fn toml_patch_keeps_unspecified_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
freshness_window_days = 14

[weights]
purchase = 8.0
"#,
        )
        .expect("patch should parse");

        assert_eq!(config.freshness_window_days, 14);
        assert_eq!(config.weights.purchase, 8.0);
        assert_eq!(config.weights.view, 0.5);
        assert_eq!(config.limits.session, 8);
    }

    #[test]
    fn negative_weight_fails_validation() {
        let result = EngineConfig::from_toml_str(
            r#"
[weights]
click = -1.0
"#,
        );

        assert!(matches!(result, Err(ConfigError::Validation(ref message)) if message.contains("non-negative")));
    }

    #[test]
    fn out_of_range_price_band_fails_validation() {
        let result = EngineConfig::from_toml_str(
            r#"
[session]
price_band = 1.5
"#,
        );

        assert!(matches!(result, Err(ConfigError::Validation(ref message)) if message.contains("price_band")));
    }
}
