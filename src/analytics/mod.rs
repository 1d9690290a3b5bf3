//! Skill analytics: reconciles the aggregate projection with the raw answer
//! log, classifies per-category trends, flags weak categories and formats
//! breakdowns for reporting.
//!
//! Every entry point is a pure computation over the data read for a single
//! account; nothing is cached between calls.

pub mod history;
pub mod projection;
pub mod taxonomy;
pub mod trend;
pub mod user_stats;
pub mod weak_categories;

use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;
use crate::validation;

pub use projection::{SkillDataSource, StatsSource};

#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Rejected before the store is touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
    /// A computed report could not be rendered as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Outcome of an account-scoped query. A missing account is a normal
/// answer, not an error, so callers can render a friendly message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Lookup<T> {
    Found(T),
    NotFound(NotFound),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotFound {
    pub found: bool,
    pub message: String,
}

impl NotFound {
    pub fn user(account_id: &str) -> Self {
        Self {
            found: false,
            message: format!("User with accountId \"{account_id}\" not found"),
        }
    }

    pub fn profile(account_id: &str) -> Self {
        Self {
            found: false,
            message: format!("User profile for accountId \"{account_id}\" not found"),
        }
    }
}

/// `round(correct / total * 100)`, or 0 for an empty sample.
pub fn accuracy_percent(correct: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = correct.min(total) as f64 / total as f64;
    (ratio * 100.0).round() as u32
}

pub(crate) fn require_account_id(account_id: &str) -> Result<(), AnalyticsError> {
    validation::validate_account_id(account_id)
        .map_err(|msg| AnalyticsError::InvalidInput(msg.to_string()))
}
