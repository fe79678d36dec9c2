//! Relevance Service: the async, per-user surface over the engine.
//!
//! Each user's profile lives behind its own locks; there is no global lock on the hot path.
//! Mutations run on a staged clone that replaces the live state only after the repository
//! accepts the change set. A failed write leaves memory untouched.

pub mod repository;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::{self, AppliedAnalysis, JdAnalysis, SkillLexicon, StaticLexicon};
use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use crate::keywords::KeywordStore;
use crate::learning::{self, Insights, RetrainPlan};
use crate::models::application::{Application, Feedback};
use crate::models::filters::Filters;
use crate::models::job::{Job, JobEvaluation};
use crate::models::keyword::{Category, Keyword, KeywordSource};
use crate::scoring::{self, KeywordWeightScorer, RankedJob, RelevanceScorer};

pub use repository::{InMemoryProfileRepository, ProfileRepository, ProfileSnapshot};

/// One user's live state.
pub struct UserProfile {
    store: RwLock<KeywordStore>,
    filters: RwLock<Filters>,
    /// Serializes retrains so only one plan is in flight per user.
    retrain_gate: Mutex<()>,
}

impl UserProfile {
    fn from_snapshot(snapshot: ProfileSnapshot) -> Self {
        Self {
            store: RwLock::new(KeywordStore::from_keywords(snapshot.keywords)),
            filters: RwLock::new(snapshot.filters.normalized()),
            retrain_gate: Mutex::new(()),
        }
    }
}

pub struct RelevanceService {
    repository: Arc<dyn ProfileRepository>,
    lexicon: Arc<dyn SkillLexicon>,
    /// Pluggable scorer. Default: KeywordWeightScorer.
    scorer: Arc<dyn RelevanceScorer>,
    config: EngineConfig,
    profiles: RwLock<HashMap<Uuid, Arc<UserProfile>>>,
}

impl RelevanceService {
    pub fn new(repository: Arc<dyn ProfileRepository>, config: EngineConfig) -> Self {
        Self {
            repository,
            lexicon: Arc::new(StaticLexicon::default()),
            scorer: Arc::new(KeywordWeightScorer),
            config,
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_lexicon(mut self, lexicon: Arc<dyn SkillLexicon>) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_scorer(mut self, scorer: Arc<dyn RelevanceScorer>) -> Self {
        self.scorer = scorer;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ────────────────────────────────────────────────────────────────────────
    // Profile registry
    // ────────────────────────────────────────────────────────────────────────

    async fn profile(&self, user_id: Uuid) -> EngineResult<Arc<UserProfile>> {
        if let Some(profile) = self.profiles.read().await.get(&user_id) {
            return Ok(Arc::clone(profile));
        }

        let snapshot = self.repository.load_profile(user_id).await?;
        let mut profiles = self.profiles.write().await;
        // Another task may have loaded the same user while we were awaiting.
        let profile = profiles
            .entry(user_id)
            .or_insert_with(|| {
                info!(user_id = %user_id, keywords = snapshot.keywords.len(), "loaded user profile");
                Arc::new(UserProfile::from_snapshot(snapshot))
            })
            .clone();
        Ok(profile)
    }

    /// Runs `mutate` on a staged copy of the store and swaps it in once the resulting
    /// changes are persisted.
    async fn mutate_keywords<T, F>(&self, user_id: Uuid, mutate: F) -> EngineResult<T>
    where
        F: FnOnce(&mut KeywordStore) -> EngineResult<T>,
    {
        let profile = self.profile(user_id).await?;
        let mut store = profile.store.write().await;
        let mut staged = store.clone();
        let output = mutate(&mut staged)?;
        self.persist_staged(user_id, &mut staged).await?;
        *store = staged;
        Ok(output)
    }

    async fn persist_staged(&self, user_id: Uuid, staged: &mut KeywordStore) -> EngineResult<()> {
        let changes = staged.take_changes();
        if changes.is_empty() {
            return Ok(());
        }
        if let Err(e) = self.repository.persist_keywords(user_id, &changes).await {
            warn!(user_id = %user_id, changes = changes.len(), error = %e, "persisting keyword changes failed; batch discarded");
            return Err(EngineError::Repository(e));
        }
        Ok(())
    }

    // ────────────────────────────────────────────────────────────────────────
    // Keywords
    // ────────────────────────────────────────────────────────────────────────

    /// Keywords of one category, alphabetically.
    pub async fn list_keywords(&self, user_id: Uuid, category: Category) -> EngineResult<Vec<Keyword>> {
        let profile = self.profile(user_id).await?;
        let mut keywords = profile.store.read().await.list_by_category(category);
        keywords.sort_by(|a, b| a.text.cmp(&b.text));
        Ok(keywords)
    }

    pub async fn add_keyword(
        &self,
        user_id: Uuid,
        text: &str,
        category: Category,
        weight: Option<f64>,
    ) -> EngineResult<Keyword> {
        let keyword = self
            .mutate_keywords(user_id, |store| {
                store.add(text, category, weight, KeywordSource::Manual)
            })
            .await?;
        info!(user_id = %user_id, keyword = %keyword.text, %category, "keyword added");
        Ok(keyword)
    }

    pub async fn set_weight(&self, user_id: Uuid, keyword_id: Uuid, weight: f64) -> EngineResult<()> {
        self.mutate_keywords(user_id, |store| store.set_weight(keyword_id, weight))
            .await?;
        info!(user_id = %user_id, %keyword_id, weight, "keyword weight set");
        Ok(())
    }

    pub async fn set_category(
        &self,
        user_id: Uuid,
        keyword_id: Uuid,
        category: Category,
    ) -> EngineResult<()> {
        self.mutate_keywords(user_id, |store| store.set_category(keyword_id, category))
            .await?;
        info!(user_id = %user_id, %keyword_id, %category, "keyword category set");
        Ok(())
    }

    pub async fn remove_keyword(&self, user_id: Uuid, keyword_id: Uuid) -> EngineResult<Keyword> {
        let removed = self
            .mutate_keywords(user_id, |store| store.remove(keyword_id))
            .await?;
        info!(user_id = %user_id, keyword = %removed.text, "keyword removed");
        Ok(removed)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Filters
    // ────────────────────────────────────────────────────────────────────────

    pub async fn filters(&self, user_id: Uuid) -> EngineResult<Filters> {
        let profile = self.profile(user_id).await?;
        let filters = profile.filters.read().await.clone();
        Ok(filters)
    }

    /// Normalizes and persists new filter settings, returning what was stored.
    pub async fn update_filters(&self, user_id: Uuid, filters: Filters) -> EngineResult<Filters> {
        let profile = self.profile(user_id).await?;
        let staged = filters.normalized();
        let mut current = profile.filters.write().await;
        if let Err(e) = self.repository.persist_filters(user_id, &staged).await {
            warn!(user_id = %user_id, error = %e, "persisting filters failed");
            return Err(EngineError::Repository(e));
        }
        *current = staged.clone();
        info!(user_id = %user_id, "filters updated");
        Ok(staged)
    }

    // ────────────────────────────────────────────────────────────────────────
    // Scoring
    // ────────────────────────────────────────────────────────────────────────

    /// Gate and score every job with the current profile, rejected jobs included.
    pub async fn evaluate_jobs(&self, user_id: Uuid, jobs: &[Job]) -> EngineResult<Vec<JobEvaluation>> {
        let profile = self.profile(user_id).await?;
        let filters = profile.filters.read().await;
        let store = profile.store.read().await;
        Ok(scoring::evaluate_all(jobs, &filters, &store, self.scorer.as_ref()))
    }

    /// The default listing: admitted jobs, best first.
    pub async fn rank_jobs(&self, user_id: Uuid, jobs: &[Job]) -> EngineResult<Vec<RankedJob>> {
        let profile = self.profile(user_id).await?;
        let filters = profile.filters.read().await;
        let store = profile.store.read().await;
        Ok(scoring::rank(jobs, &filters, &store, self.scorer.as_ref()))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Analysis
    // ────────────────────────────────────────────────────────────────────────

    pub async fn analyze_description(&self, user_id: Uuid, text: &str) -> EngineResult<JdAnalysis> {
        let profile = self.profile(user_id).await?;
        let store = profile.store.read().await;
        Ok(analysis::analyze(text, &store, self.lexicon.as_ref()))
    }

    pub async fn apply_analysis(
        &self,
        user_id: Uuid,
        add_boost: &[String],
        remove_exclude: &[String],
    ) -> EngineResult<AppliedAnalysis> {
        let applied = self
            .mutate_keywords(user_id, |store| analysis::apply(store, add_boost, remove_exclude))
            .await?;
        info!(
            user_id = %user_id,
            added = applied.added.len(),
            removed = applied.removed.len(),
            "applied description analysis"
        );
        Ok(applied)
    }

    pub async fn extract_resume_keywords(&self, user_id: Uuid, resume_text: &str) -> EngineResult<Vec<String>> {
        let profile = self.profile(user_id).await?;
        let store = profile.store.read().await;
        Ok(analysis::extract_resume_keywords(resume_text, &store, self.lexicon.as_ref()))
    }

    pub async fn apply_resume_keywords(&self, user_id: Uuid, terms: &[String]) -> EngineResult<Vec<Keyword>> {
        let added = self
            .mutate_keywords(user_id, |store| analysis::apply_resume_keywords(store, terms))
            .await?;
        info!(user_id = %user_id, added = added.len(), "resume keywords tracked");
        Ok(added)
    }

    pub async fn suggest_from_application(&self, user_id: Uuid, job: &Job) -> EngineResult<Vec<String>> {
        let profile = self.profile(user_id).await?;
        let store = profile.store.read().await;
        Ok(learning::suggest_from_application(job, &store, self.lexicon.as_ref()))
    }

    pub async fn suggest_from_dismissal(&self, user_id: Uuid, notes: &str) -> EngineResult<Vec<String>> {
        let profile = self.profile(user_id).await?;
        let store = profile.store.read().await;
        Ok(learning::suggest_from_dismissal(notes, &store))
    }

    // ────────────────────────────────────────────────────────────────────────
    // Learning
    // ────────────────────────────────────────────────────────────────────────

    /// Computes a retrain plan from the current snapshot without applying it.
    pub async fn plan_retrain(
        &self,
        user_id: Uuid,
        applications: &[Application],
        feedbacks: &[Feedback],
    ) -> EngineResult<RetrainPlan> {
        let profile = self.profile(user_id).await?;
        let store = profile.store.read().await;
        Ok(learning::retrain(applications, feedbacks, &store, &self.config.retrain))
    }

    /// Applies a previously computed plan. Fails with `StaleSnapshot` if any keyword
    /// changed after the plan was made.
    pub async fn commit_retrain(&self, user_id: Uuid, plan: &RetrainPlan) -> EngineResult<()> {
        let profile = self.profile(user_id).await?;
        let _gate = profile.retrain_gate.lock().await;
        self.commit_plan(user_id, &profile, plan).await
    }

    /// Plans and commits in one step, one retrain per user at a time.
    pub async fn retrain(
        &self,
        user_id: Uuid,
        applications: &[Application],
        feedbacks: &[Feedback],
    ) -> EngineResult<RetrainPlan> {
        let profile = self.profile(user_id).await?;
        let _gate = profile.retrain_gate.lock().await;

        let plan = {
            let store = profile.store.read().await;
            learning::retrain(applications, feedbacks, &store, &self.config.retrain)
        };
        if plan.is_empty() {
            info!(user_id = %user_id, "retrain found nothing to change");
            return Ok(plan);
        }

        self.commit_plan(user_id, &profile, &plan).await?;
        Ok(plan)
    }

    async fn commit_plan(&self, user_id: Uuid, profile: &UserProfile, plan: &RetrainPlan) -> EngineResult<()> {
        let mut store = profile.store.write().await;
        let mut staged = store.clone();
        if let Err(e) = plan.commit(&mut staged) {
            warn!(user_id = %user_id, error = %e, "retrain plan rejected");
            return Err(e);
        }
        self.persist_staged(user_id, &mut staged).await?;
        *store = staged;

        info!(
            user_id = %user_id,
            weight_updates = plan.weight_updates.len(),
            new_keywords = plan.new_keywords.len(),
            positive_jobs = plan.positive_jobs_count,
            ignored_jobs = plan.ignored_jobs_count,
            "retrain committed"
        );
        Ok(())
    }

    pub async fn insights(
        &self,
        user_id: Uuid,
        applications: &[Application],
        total_jobs: usize,
        total_feedbacks: usize,
    ) -> EngineResult<Insights> {
        let profile = self.profile(user_id).await?;
        let store = profile.store.read().await;
        Ok(learning::keyword_insights(&store, applications, total_jobs, total_feedbacks))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
