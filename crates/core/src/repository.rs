use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::behavior::UserBehaviorProfile;
use crate::domain::product::ProductId;
use crate::errors::StoreError;

/// Persistence collaborator for behavior profiles. Loaded once at engine
/// construction, saved after every recorded event. Implementations live in
/// `vitrine-store`; the engine only requires the contract.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn load(&self) -> Result<HashMap<String, UserBehaviorProfile>, StoreError>;

    async fn save(
        &self,
        profiles: &HashMap<String, UserBehaviorProfile>,
    ) -> Result<(), StoreError>;
}

/// Externally-maintained sales and search counters feeding the trending
/// ranking. The engine only sums these; it never writes them.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn sales_count(&self, product: &ProductId) -> u64;

    async fn search_hits(&self) -> HashMap<String, u64>;
}
