pub mod keys;
pub mod migrate;
pub mod operations;
pub mod trees;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use thiserror::Error;

#[derive(Debug)]
pub struct Store {
    db: Db,
    pub users: sled::Tree,
    pub quizzes: sled::Tree,
    pub answers: sled::Tree,
    pub merge_requests: sled::Tree,
    pub user_profiles: sled::Tree,
    pub skill_stats: sled::Tree,
    pub growth_milestones: sled::Tree,
    pub config_versions: sled::Tree,
    // Secondary index trees
    pub answers_by_quiz: sled::Tree,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: String, key: String },
    #[error("conflict: entity={entity}, key={key}")]
    Conflict { entity: String, key: String },
    #[error("CAS retry exhausted after {attempts} attempts: entity={entity}, key={key}")]
    CasRetryExhausted {
        entity: String,
        key: String,
        attempts: u32,
    },
    #[error("validation error: {0}")]
    Validation(String),
    #[error("migration error at version {version}: {message}")]
    Migration { version: u32, message: String },
}

impl StoreError {
    pub fn not_found(entity: &str, key: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }

    pub fn conflict(entity: &str, key: &str) -> Self {
        Self::Conflict {
            entity: entity.to_string(),
            key: key.to_string(),
        }
    }
}

impl Store {
    pub fn open(sled_path: &str) -> Result<Self, StoreError> {
        let db = sled::open(sled_path)?;
        let users = db.open_tree(trees::USERS)?;
        let quizzes = db.open_tree(trees::QUIZZES)?;
        let answers = db.open_tree(trees::ANSWERS)?;
        let merge_requests = db.open_tree(trees::MERGE_REQUESTS)?;
        let user_profiles = db.open_tree(trees::USER_PROFILES)?;
        let skill_stats = db.open_tree(trees::SKILL_STATS)?;
        let growth_milestones = db.open_tree(trees::GROWTH_MILESTONES)?;
        let config_versions = db.open_tree(trees::CONFIG_VERSIONS)?;
        let answers_by_quiz = db.open_tree(trees::ANSWERS_BY_QUIZ)?;

        Ok(Self {
            db,
            users,
            quizzes,
            answers,
            merge_requests,
            user_profiles,
            skill_stats,
            growth_milestones,
            config_versions,
            answers_by_quiz,
        })
    }

    pub fn run_migrations(&self) -> Result<(), StoreError> {
        migrate::run(self)
    }

    pub fn flush(&self) -> Result<(), StoreError> {
        self.db.flush()?;
        Ok(())
    }

    pub fn raw_db(&self) -> &Db {
        &self.db
    }

    pub(crate) fn serialize<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
        Ok(serde_json::to_vec(value)?)
    }

    pub(crate) fn deserialize<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Deserializes every value under `prefix`, in key order, stopping at `limit`.
    pub(crate) fn scan_docs<T: DeserializeOwned>(
        tree: &sled::Tree,
        prefix: &str,
        limit: Option<usize>,
    ) -> Result<Vec<T>, StoreError> {
        let mut out = Vec::new();
        for item in tree.scan_prefix(prefix.as_bytes()) {
            if limit.is_some_and(|max| out.len() >= max) {
                break;
            }
            let (_, value) = item?;
            out.push(Self::deserialize::<T>(&value)?);
        }
        Ok(out)
    }

    /// Removes every key under `prefix`, returning how many were removed.
    pub(crate) fn remove_prefix(tree: &sled::Tree, prefix: &str) -> Result<usize, StoreError> {
        let mut batch = sled::Batch::default();
        let mut removed = 0usize;
        for item in tree.scan_prefix(prefix.as_bytes()) {
            let (key, _) = item?;
            batch.remove(key);
            removed += 1;
        }
        tree.apply_batch(batch)?;
        Ok(removed)
    }
}
