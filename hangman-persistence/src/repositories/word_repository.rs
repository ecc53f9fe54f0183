use anyhow::Result;
use rand::seq::SliceRandom;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use tracing::{debug, warn};

use crate::entities::{prelude::*, words};
use hangman_core::builtin_words;
use hangman_types::{DrawnWord, WordEntry};

/// Read-only word bank, seeded once.
pub struct WordRepository {
    db: DatabaseConnection,
}

impl WordRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> Result<u64> {
        Ok(Words::find().count(&self.db).await?)
    }

    /// Load the built-in word list into an empty bank.
    pub async fn seed_defaults(&self) -> Result<usize> {
        self.seed(builtin_words()).await
    }

    /// Insert `entries` only if the bank is empty. Returns how many rows
    /// were written; `0` when the bank already had data.
    /// Blank words are skipped.
    pub async fn seed(&self, entries: Vec<WordEntry>) -> Result<usize> {
        let (entries, blank): (Vec<_>, Vec<_>) = entries
            .into_iter()
            .partition(|entry| !entry.word.trim().is_empty());
        if !blank.is_empty() {
            warn!("Skipping {} blank words while seeding", blank.len());
        }

        if entries.is_empty() || self.count().await? > 0 {
            return Ok(0);
        }

        let inserted = entries.len();
        let models = entries.into_iter().map(|entry| words::ActiveModel {
            id: ActiveValue::NotSet,
            word: ActiveValue::Set(entry.word.trim().to_uppercase()),
            category: ActiveValue::Set(entry.category),
            hint: ActiveValue::Set(entry.hint),
        });

        Words::insert_many(models).exec(&self.db).await?;
        Ok(inserted)
    }

    /// Distinct categories in ascending order.
    pub async fn list_categories(&self) -> Result<Vec<String>> {
        let categories = Words::find()
            .select_only()
            .column(words::Column::Category)
            .distinct()
            .order_by_asc(words::Column::Category)
            .into_tuple::<String>()
            .all(&self.db)
            .await?;

        Ok(categories)
    }

    /// Uniformly pick one word, from `category` when given. `None` when
    /// there is nothing to pick from.
    pub async fn pick_random(&self, category: Option<&str>) -> Result<Option<DrawnWord>> {
        let mut query = Words::find();
        if let Some(category) = category {
            query = query.filter(words::Column::Category.eq(category));
        }
        let mut candidates = query.all(&self.db).await?;
        // A blank word would count as solved before the first guess
        candidates.retain(|model| !model.word.trim().is_empty());

        let picked = candidates
            .choose(&mut rand::thread_rng())
            .map(|model| DrawnWord {
                word: model.word.clone(),
                hint: model.hint.clone(),
            });

        if picked.is_none() {
            debug!("No words available for category {:?}", category);
        }

        Ok(picked)
    }
}
