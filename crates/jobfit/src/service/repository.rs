//! Persistence seam. The engine never touches storage directly; it loads a profile snapshot
//! once and hands every committed batch of `KeywordChange`s to the repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::keywords::KeywordChange;
use crate::models::filters::Filters;
use crate::models::keyword::Keyword;

/// Everything the engine needs to rebuild a user's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub keywords: Vec<Keyword>,
    pub filters: Filters,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// An unknown user yields an empty snapshot, not an error.
    async fn load_profile(&self, user_id: Uuid) -> Result<ProfileSnapshot>;
    /// Persists one committed batch. All or nothing from the engine's point of view.
    async fn persist_keywords(&self, user_id: Uuid, changes: &[KeywordChange]) -> Result<()>;
    async fn persist_filters(&self, user_id: Uuid, filters: &Filters) -> Result<()>;
}

/// Process-local repository for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemoryProfileRepository {
    profiles: Mutex<HashMap<Uuid, ProfileSnapshot>>,
    fail_writes: AtomicBool,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user_id: Uuid, snapshot: ProfileSnapshot) {
        self.profiles.lock().await.insert(user_id, snapshot);
    }

    pub async fn snapshot(&self, user_id: Uuid) -> Option<ProfileSnapshot> {
        self.profiles.lock().await.get(&user_id).cloned()
    }

    /// Makes every subsequent write fail, simulating an unavailable backend.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("profile store unavailable");
        }
        Ok(())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn load_profile(&self, user_id: Uuid) -> Result<ProfileSnapshot> {
        Ok(self.snapshot(user_id).await.unwrap_or_default())
    }

    async fn persist_keywords(&self, user_id: Uuid, changes: &[KeywordChange]) -> Result<()> {
        self.check_writable()?;
        let mut profiles = self.profiles.lock().await;
        let keywords = &mut profiles.entry(user_id).or_default().keywords;

        for change in changes {
            match change {
                KeywordChange::Added(keyword) => keywords.push(keyword.clone()),
                KeywordChange::WeightChanged { id, new_weight, .. } => {
                    if let Some(kw) = keywords.iter_mut().find(|k| k.id == *id) {
                        kw.weight = *new_weight;
                    }
                }
                KeywordChange::CategoryChanged { id, to, .. } => {
                    if let Some(kw) = keywords.iter_mut().find(|k| k.id == *id) {
                        kw.category = *to;
                    }
                }
                KeywordChange::Removed(keyword) => keywords.retain(|k| k.id != keyword.id),
            }
        }
        Ok(())
    }

    async fn persist_filters(&self, user_id: Uuid, filters: &Filters) -> Result<()> {
        self.check_writable()?;
        self.profiles.lock().await.entry(user_id).or_default().filters = filters.clone();
        Ok(())
    }
}
