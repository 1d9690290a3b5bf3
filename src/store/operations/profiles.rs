use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::taxonomy::Category;
use crate::store::keys;
use crate::store::{Store, StoreError};

/// Self-declared learner context, used to tailor recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub account_id: String,
    #[serde(default)]
    pub career_goal: Option<String>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub years_of_experience: Option<u32>,
    #[serde(default)]
    pub focus_areas: Vec<Category>,
    /// 1 (weak) to 5 (strong) per category.
    #[serde(default)]
    pub self_assessment: BTreeMap<Category, u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Store {
    pub fn get_user_profile(&self, account_id: &str) -> Result<Option<UserProfile>, StoreError> {
        let key = keys::user_profile_key(account_id)?;
        match self.user_profiles.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn put_user_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        if let Some((category, score)) = profile
            .self_assessment
            .iter()
            .find(|(_, score)| !(1..=5).contains(*score))
        {
            return Err(StoreError::Validation(format!(
                "selfAssessment.{category} must be within 1..=5, got {score}"
            )));
        }
        let key = keys::user_profile_key(&profile.account_id)?;
        self.user_profiles
            .insert(key.as_bytes(), Self::serialize(profile)?)?;
        Ok(())
    }

    pub fn delete_user_profile(&self, account_id: &str) -> Result<bool, StoreError> {
        let key = keys::user_profile_key(account_id)?;
        Ok(self.user_profiles.remove(key.as_bytes())?.is_some())
    }
}
