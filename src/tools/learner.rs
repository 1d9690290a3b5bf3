use serde::Serialize;

use crate::analytics::{require_account_id, AnalyticsError, Lookup, NotFound};
use crate::config::AnalyticsConfig;
use crate::store::operations::milestones::GrowthMilestone;
use crate::store::operations::profiles::UserProfile;
use crate::store::Store;
use crate::validation::resolve_limit;

#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub found: bool,
    pub profile: UserProfile,
}

pub fn user_profile(store: &Store, account_id: &str) -> Result<Lookup<ProfileView>, AnalyticsError> {
    require_account_id(account_id)?;
    tracing::info!(account_id, "Executing get_user_profile");

    let Some(profile) = store.get_user_profile(account_id)? else {
        return Ok(Lookup::NotFound(NotFound::profile(account_id)));
    };

    tracing::info!(account_id, "get_user_profile completed");
    Ok(Lookup::Found(ProfileView {
        found: true,
        profile,
    }))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MilestoneList {
    pub account_id: String,
    pub count: usize,
    pub milestones: Vec<GrowthMilestone>,
}

/// Most recent first. An unknown account simply has no milestones.
pub fn growth_milestones(
    store: &Store,
    account_id: &str,
    limit: Option<usize>,
    limits: &AnalyticsConfig,
) -> Result<MilestoneList, AnalyticsError> {
    require_account_id(account_id)?;
    let limit = resolve_limit(limit, limits.history_default_limit, limits.max_limit)
        .map_err(AnalyticsError::InvalidInput)?;
    tracing::info!(account_id, "Executing get_growth_milestones");

    let milestones = store.get_milestones_by_user(account_id, Some(limit))?;

    tracing::info!(account_id, count = milestones.len(), "get_growth_milestones completed");
    Ok(MilestoneList {
        account_id: account_id.to_string(),
        count: milestones.len(),
        milestones,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::{Duration, Utc};
    use tempfile::tempdir;

    use super::*;
    use crate::analytics::taxonomy::{Category, MilestoneType};

    fn milestone(account_id: &str, achievement: &str, age_hours: i64) -> GrowthMilestone {
        GrowthMilestone {
            milestone_id: uuid::Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            kind: MilestoneType::Streak,
            category: None,
            achievement: achievement.to_string(),
            metadata: serde_json::Map::new(),
            achieved_at: Utc::now() - Duration::hours(age_hours),
        }
    }

    #[test]
    fn missing_profile_reports_not_found() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();

        let lookup = user_profile(&store, "bob").unwrap();
        let json = serde_json::to_value(&lookup).unwrap();
        assert_eq!(json["found"], false);
        assert_eq!(json["message"], "User profile for accountId \"bob\" not found");
    }

    #[test]
    fn stored_profile_is_returned() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        let now = Utc::now();
        store
            .put_user_profile(&UserProfile {
                account_id: "bob".to_string(),
                career_goal: Some("Staff engineer".to_string()),
                experience_level: None,
                years_of_experience: Some(4),
                focus_areas: vec![Category::Security],
                self_assessment: BTreeMap::from([(Category::Security, 3)]),
                created_at: now,
                updated_at: now,
            })
            .unwrap();

        let json = serde_json::to_value(user_profile(&store, "bob").unwrap()).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["profile"]["focusAreas"][0], "security");
        assert_eq!(json["profile"]["selfAssessment"]["security"], 3);
    }

    #[test]
    fn milestones_newest_first_and_limited() {
        let dir = tempdir().unwrap();
        let store = Store::open(dir.path().join("db").to_str().unwrap()).unwrap();
        store.create_milestone(&milestone("bob", "old", 5)).unwrap();
        store.create_milestone(&milestone("bob", "new", 1)).unwrap();
        store.create_milestone(&milestone("carol", "other", 0)).unwrap();

        let list = growth_milestones(&store, "bob", Some(1), &AnalyticsConfig::default()).unwrap();
        assert_eq!(list.count, 1);
        assert_eq!(list.milestones[0].achievement, "new");

        let empty = growth_milestones(&store, "nobody", None, &AnalyticsConfig::default()).unwrap();
        assert_eq!(empty.count, 0);
    }
}
