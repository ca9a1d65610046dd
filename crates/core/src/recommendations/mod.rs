//! Recommendation & ranking engine.
//!
//! Converts raw behavior signals (views, clicks, purchases, searches) and
//! catalog metadata (stock, tags, recency, price) into a ranked, annotated
//! product list, with session-based and trending variants of the same
//! pipeline.

mod engine;
mod scoring;
mod triggers;
mod types;

pub use engine::RecommendationEngine;
pub use scoring::AffinityScorer;
pub use triggers::triggers_for;
pub use types::{ScoredProduct, SessionContext, Trigger, TriggerKind, TriggerLevel};

use crate::errors::EngineError;

/// Result type for recommendation operations.
pub type RecResult<T> = Result<T, EngineError>;
