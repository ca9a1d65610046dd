pub mod cache;
pub mod config;
pub mod domain;
pub mod errors;
pub mod recommendations;
pub mod repository;

pub use cache::{Clock, SystemClock, TtlCache};
pub use config::{
    BoostRules, ConfigError, EngineConfig, Limits, ScoringWeights, SessionWeights, TrendingWeights,
    TriggerRules,
};
pub use domain::behavior::{BehaviorAction, BehaviorMetadata, SearchRecord, UserBehaviorProfile};
pub use domain::product::{Product, ProductId};
pub use errors::{DomainError, EngineError, StoreError};
pub use recommendations::{
    AffinityScorer, RecResult, RecommendationEngine, ScoredProduct, SessionContext, Trigger,
    TriggerKind, TriggerLevel,
};
pub use repository::{AnalyticsSource, ProfileRepository};
