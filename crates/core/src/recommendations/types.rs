//! Types for the recommendation pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId};

/// A persuasive-messaging annotation attached to a product for display.
/// Purely descriptive; carries no state of its own.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    #[serde(rename = "type")]
    pub kind: TriggerKind,
    pub message: String,
    pub level: TriggerLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerKind {
    Urgency,
    SocialProof,
    Scarcity,
    Value,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TriggerLevel {
    Low,
    Medium,
    High,
}

/// A product annotated with derived ranking fields. Only the fields relevant
/// to the invoked operation are populated; the rest stay zero/empty.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Product,
    pub affinity_score: f64,
    pub boosted_score: f64,
    pub session_score: f64,
    pub trending_score: f64,
    pub sales_count: u64,
    pub search_mentions: u64,
    pub psychology_triggers: Vec<Trigger>,
}

impl ScoredProduct {
    pub fn from_product(product: Product) -> Self {
        Self {
            product,
            affinity_score: 0.0,
            boosted_score: 0.0,
            session_score: 0.0,
            trending_score: 0.0,
            sales_count: 0,
            search_mentions: 0,
            psychology_triggers: Vec::new(),
        }
    }

    pub fn id(&self) -> &ProductId {
        &self.product.id
    }
}

/// Anonymous, short-lived interaction context. Not tied to a persisted
/// profile; the session path never reads or writes behavior state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    #[serde(default)]
    pub viewed_products: Vec<ProductId>,
    #[serde(default)]
    pub search_terms: Vec<String>,
}
