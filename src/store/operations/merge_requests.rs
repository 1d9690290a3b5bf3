use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::taxonomy::{MergeRequestStatus, Platform};
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub merge_request_id: String,
    pub platform: Platform,
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub author_account_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
    #[serde(default)]
    pub files_changed: Vec<String>,
    pub status: MergeRequestStatus,
    pub created_at: DateTime<Utc>,
}

impl MergeRequest {
    /// `{platform}_{owner}_{repo}_{number}`, stable across re-deliveries of the same PR/MR.
    pub fn make_id(platform: Platform, owner: &str, repo: &str, number: u64) -> String {
        format!("{platform}_{owner}_{repo}_{number}")
    }

    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MergeRequestFilter {
    pub platform: Option<Platform>,
    pub owner: Option<String>,
    pub repo: Option<String>,
    pub author_account_id: Option<String>,
    pub status: Option<MergeRequestStatus>,
    pub limit: Option<usize>,
}

impl MergeRequestFilter {
    fn matches(&self, mr: &MergeRequest) -> bool {
        self.platform.map_or(true, |p| mr.platform == p)
            && self.owner.as_deref().map_or(true, |o| mr.owner == o)
            && self.repo.as_deref().map_or(true, |r| mr.repo == r)
            && self
                .author_account_id
                .as_deref()
                .map_or(true, |a| mr.author_account_id == a)
            && self.status.map_or(true, |s| mr.status == s)
    }
}

impl Store {
    pub fn put_merge_request(&self, mr: &MergeRequest) -> Result<(), StoreError> {
        let key = keys::merge_request_key(&mr.merge_request_id)?;
        self.merge_requests
            .insert(key.as_bytes(), Self::serialize(mr)?)?;
        Ok(())
    }

    pub fn get_merge_request(
        &self,
        merge_request_id: &str,
    ) -> Result<Option<MergeRequest>, StoreError> {
        let key = keys::merge_request_key(merge_request_id)?;
        match self.merge_requests.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Newest merge requests first.
    pub fn query_merge_requests(
        &self,
        filter: &MergeRequestFilter,
    ) -> Result<Vec<MergeRequest>, StoreError> {
        let mut out = Vec::new();
        for item in self.merge_requests.iter() {
            let (_, value) = item?;
            let mr: MergeRequest = Self::deserialize(&value)?;
            if filter.matches(&mr) {
                out.push(mr);
            }
        }
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            out.truncate(limit);
        }
        Ok(out)
    }

    pub fn delete_merge_requests_by_author(&self, account_id: &str) -> Result<usize, StoreError> {
        let owned = self.query_merge_requests(&MergeRequestFilter {
            author_account_id: Some(account_id.to_string()),
            ..MergeRequestFilter::default()
        })?;
        let mut batch = sled::Batch::default();
        for mr in &owned {
            batch.remove(keys::merge_request_key(&mr.merge_request_id)?.as_bytes());
        }
        self.merge_requests.apply_batch(batch)?;
        Ok(owned.len())
    }
}
