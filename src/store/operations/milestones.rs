use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::taxonomy::{Category, MilestoneType};
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMilestone {
    pub milestone_id: String,
    pub account_id: String,
    #[serde(rename = "type")]
    pub kind: MilestoneType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub achievement: String,
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub achieved_at: DateTime<Utc>,
}

impl Store {
    pub fn create_milestone(&self, milestone: &GrowthMilestone) -> Result<(), StoreError> {
        let key = keys::milestone_key(
            &milestone.account_id,
            milestone.achieved_at.timestamp_millis(),
            &milestone.milestone_id,
        )?;
        self.growth_milestones
            .insert(key.as_bytes(), Self::serialize(milestone)?)?;
        Ok(())
    }

    /// Milestones of one account, most recently achieved first.
    pub fn get_milestones_by_user(
        &self,
        account_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<GrowthMilestone>, StoreError> {
        let prefix = keys::milestone_prefix(account_id)?;
        Self::scan_docs(&self.growth_milestones, &prefix, limit)
    }

    pub fn delete_milestones_for_account(&self, account_id: &str) -> Result<usize, StoreError> {
        Self::remove_prefix(&self.growth_milestones, &keys::milestone_prefix(account_id)?)
    }
}
