//! Keyword Store: the per-user set of tracked keywords.
//!
//! Every successful mutation bumps `revision` and appends a `KeywordChange` to the
//! journal, which the persistence layer drains and replays.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EngineError, EngineResult};
use crate::models::keyword::{
    is_valid_weight, normalize_text, Category, Keyword, KeywordSource, DEFAULT_WEIGHT,
};

/// One persisted mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KeywordChange {
    Added(Keyword),
    WeightChanged {
        id: Uuid,
        old_weight: f64,
        new_weight: f64,
    },
    CategoryChanged {
        id: Uuid,
        from: Category,
        to: Category,
    },
    Removed(Keyword),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeywordStore {
    keywords: Vec<Keyword>,
    revision: u64,
    #[serde(skip)]
    journal: Vec<KeywordChange>,
}

impl KeywordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a store from a persisted snapshot. Texts are re-normalized; rows that
    /// collide on (text, category) or carry an unusable weight are dropped.
    pub fn from_keywords(keywords: Vec<Keyword>) -> Self {
        let mut store = Self::new();
        for mut kw in keywords {
            kw.text = normalize_text(&kw.text);
            if kw.text.is_empty() || store.find(&kw.text, kw.category).is_some() {
                tracing::warn!(keyword = %kw.text, "dropping duplicate or blank keyword from snapshot");
                continue;
            }
            if !is_valid_weight(kw.weight) {
                kw.weight = DEFAULT_WEIGHT;
            }
            store.keywords.push(kw);
        }
        store
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    pub fn get(&self, id: Uuid) -> Option<&Keyword> {
        self.keywords.iter().find(|k| k.id == id)
    }

    /// Looks a keyword up by (text, category); `text` is normalized first.
    pub fn find(&self, text: &str, category: Category) -> Option<&Keyword> {
        let text = normalize_text(text);
        self.keywords
            .iter()
            .find(|k| k.category == category && k.text == text)
    }

    /// Whether the text is tracked under either category.
    pub fn contains_text(&self, text: &str) -> bool {
        let text = normalize_text(text);
        self.keywords.iter().any(|k| k.text == text)
    }

    /// Current snapshot of one category. Order carries no meaning.
    pub fn list_by_category(&self, category: Category) -> Vec<Keyword> {
        self.keywords
            .iter()
            .filter(|k| k.category == category)
            .cloned()
            .collect()
    }

    pub fn add(
        &mut self,
        text: &str,
        category: Category,
        weight: Option<f64>,
        source: KeywordSource,
    ) -> EngineResult<Keyword> {
        let text = normalize_text(text);
        if text.is_empty() {
            return Err(EngineError::EmptyKeyword);
        }
        let weight = weight.unwrap_or(DEFAULT_WEIGHT);
        if !is_valid_weight(weight) {
            return Err(EngineError::InvalidWeight(weight));
        }
        if self.find(&text, category).is_some() {
            return Err(EngineError::DuplicateKeyword { text, category });
        }

        let keyword = Keyword {
            id: Uuid::new_v4(),
            text,
            category,
            weight,
            source,
            created_at: Utc::now(),
        };
        self.keywords.push(keyword.clone());
        self.record(KeywordChange::Added(keyword.clone()));
        Ok(keyword)
    }

    /// Flips a keyword between boost and exclude. The weight is kept as-is.
    pub fn set_category(&mut self, id: Uuid, category: Category) -> EngineResult<()> {
        let current = self.get(id).ok_or(EngineError::NotFound(id))?;
        if current.category == category {
            return Ok(());
        }
        if self.find(&current.text, category).is_some() {
            return Err(EngineError::DuplicateKeyword {
                text: current.text.clone(),
                category,
            });
        }

        let from = current.category;
        self.get_mut(id)?.category = category;
        self.record(KeywordChange::CategoryChanged {
            id,
            from,
            to: category,
        });
        Ok(())
    }

    pub fn set_weight(&mut self, id: Uuid, weight: f64) -> EngineResult<()> {
        if !is_valid_weight(weight) {
            return Err(EngineError::InvalidWeight(weight));
        }
        let keyword = self.get_mut(id)?;
        let old_weight = keyword.weight;
        keyword.weight = weight;
        self.record(KeywordChange::WeightChanged {
            id,
            old_weight,
            new_weight: weight,
        });
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> EngineResult<Keyword> {
        let index = self
            .keywords
            .iter()
            .position(|k| k.id == id)
            .ok_or(EngineError::NotFound(id))?;
        let removed = self.keywords.remove(index);
        self.record(KeywordChange::Removed(removed.clone()));
        Ok(removed)
    }

    /// Drains the journal of changes made since the last call.
    pub fn take_changes(&mut self) -> Vec<KeywordChange> {
        std::mem::take(&mut self.journal)
    }

    pub fn pending_changes(&self) -> &[KeywordChange] {
        &self.journal
    }

    fn get_mut(&mut self, id: Uuid) -> EngineResult<&mut Keyword> {
        self.keywords
            .iter_mut()
            .find(|k| k.id == id)
            .ok_or(EngineError::NotFound(id))
    }

    fn record(&mut self, change: KeywordChange) {
        self.revision += 1;
        self.journal.push(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_normalizes_and_defaults_weight() {
        let mut store = KeywordStore::new();
        let kw = store
            .add("  Power BI ", Category::Boost, None, KeywordSource::Manual)
            .unwrap();
        assert_eq!(kw.text, "power bi");
        assert_eq!(kw.weight, 1.0);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_add_duplicate_in_same_category_fails() {
        let mut store = KeywordStore::new();
        store
            .add("python", Category::Boost, None, KeywordSource::Manual)
            .unwrap();
        let err = store
            .add("PYTHON", Category::Boost, Some(2.0), KeywordSource::Resume)
            .unwrap_err();
        assert!(matches!(err, EngineError::DuplicateKeyword { .. }));
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_same_text_allowed_in_both_categories() {
        let mut store = KeywordStore::new();
        store
            .add("remote", Category::Boost, None, KeywordSource::Manual)
            .unwrap();
        store
            .add("remote", Category::Exclude, None, KeywordSource::Manual)
            .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_add_rejects_bad_weight_and_blank_text() {
        let mut store = KeywordStore::new();
        assert!(matches!(
            store.add("sql", Category::Boost, Some(0.0), KeywordSource::Manual),
            Err(EngineError::InvalidWeight(_))
        ));
        assert!(matches!(
            store.add("   ", Category::Boost, None, KeywordSource::Manual),
            Err(EngineError::EmptyKeyword)
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_weight_validates() {
        let mut store = KeywordStore::new();
        let kw = store
            .add("sql", Category::Boost, None, KeywordSource::Manual)
            .unwrap();
        assert!(matches!(
            store.set_weight(kw.id, -0.5),
            Err(EngineError::InvalidWeight(_))
        ));
        store.set_weight(kw.id, 2.5).unwrap();
        assert_eq!(store.get(kw.id).unwrap().weight, 2.5);
    }

    #[test]
    fn test_set_category_preserves_weight() {
        let mut store = KeywordStore::new();
        let kw = store
            .add("sales", Category::Boost, Some(3.0), KeywordSource::Manual)
            .unwrap();
        store.set_category(kw.id, Category::Exclude).unwrap();
        let flipped = store.get(kw.id).unwrap();
        assert_eq!(flipped.category, Category::Exclude);
        assert_eq!(flipped.weight, 3.0);
        assert!(store.list_by_category(Category::Boost).is_empty());
    }

    #[test]
    fn test_set_category_into_existing_pair_fails() {
        let mut store = KeywordStore::new();
        let boost = store
            .add("remote", Category::Boost, None, KeywordSource::Manual)
            .unwrap();
        store
            .add("remote", Category::Exclude, None, KeywordSource::Manual)
            .unwrap();
        assert!(matches!(
            store.set_category(boost.id, Category::Exclude),
            Err(EngineError::DuplicateKeyword { .. })
        ));
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut store = KeywordStore::new();
        let id = Uuid::new_v4();
        assert!(matches!(store.remove(id), Err(EngineError::NotFound(_))));
        assert!(matches!(store.set_weight(id, 1.0), Err(EngineError::NotFound(_))));
        assert!(matches!(
            store.set_category(id, Category::Exclude),
            Err(EngineError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_then_readd() {
        let mut store = KeywordStore::new();
        let kw = store
            .add("tableau", Category::Boost, None, KeywordSource::Resume)
            .unwrap();
        store.remove(kw.id).unwrap();
        assert!(store.get(kw.id).is_none());
        store
            .add("tableau", Category::Boost, None, KeywordSource::Manual)
            .unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_journal_records_every_mutation_in_order() {
        let mut store = KeywordStore::new();
        let kw = store
            .add("sql", Category::Boost, None, KeywordSource::Manual)
            .unwrap();
        store.set_weight(kw.id, 2.0).unwrap();
        store.remove(kw.id).unwrap();

        let changes = store.take_changes();
        assert_eq!(changes.len(), 3);
        assert!(matches!(changes[0], KeywordChange::Added(_)));
        assert!(matches!(
            changes[1],
            KeywordChange::WeightChanged { old_weight, new_weight, .. }
                if old_weight == 1.0 && new_weight == 2.0
        ));
        assert!(matches!(changes[2], KeywordChange::Removed(_)));
        assert!(store.take_changes().is_empty());
        assert_eq!(store.revision(), 3);
    }

    #[test]
    fn test_from_keywords_drops_collisions() {
        let mut source = KeywordStore::new();
        let a = source
            .add("sql", Category::Boost, None, KeywordSource::Manual)
            .unwrap();
        let mut b = a.clone();
        b.id = Uuid::new_v4();
        b.text = " SQL ".to_string();

        let store = KeywordStore::from_keywords(vec![a, b]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), 0);
        assert!(store.pending_changes().is_empty());
    }
}
