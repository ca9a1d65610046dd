//! Profile persistence for the vitrine recommendation engine.
//!
//! The storefront keeps behavior profiles in a single flat JSON document
//! keyed by user id. [`JsonFileProfileRepository`] reproduces that format;
//! [`InMemoryProfileRepository`] backs tests and ephemeral deployments.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;

use vitrine_core::{ProfileRepository, StoreError, UserBehaviorProfile};

type ProfileMap = HashMap<String, UserBehaviorProfile>;

/// Whole-file JSON persistence. A missing file loads as an empty map, so a
/// fresh deployment needs no seeding step.
pub struct JsonFileProfileRepository {
    path: PathBuf,
}

impl JsonFileProfileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProfileRepository for JsonFileProfileRepository {
    async fn load(&self) -> Result<ProfileMap, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ProfileMap::new());
            }
            Err(err) => return Err(err.into()),
        };

        Ok(serde_json::from_str(&raw)?)
    }

    async fn save(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(profiles)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

/// In-memory store for tests and single-run tooling.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    profiles: RwLock<ProfileMap>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profiles(profiles: ProfileMap) -> Self {
        Self { profiles: RwLock::new(profiles) }
    }

    pub async fn snapshot(&self) -> ProfileMap {
        self.profiles.read().await.clone()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn load(&self) -> Result<ProfileMap, StoreError> {
        Ok(self.profiles.read().await.clone())
    }

    async fn save(&self, profiles: &ProfileMap) -> Result<(), StoreError> {
        let mut stored = self.profiles.write().await;
        *stored = profiles.clone();
        Ok(())
    }
}
