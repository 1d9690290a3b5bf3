use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::taxonomy::Platform;
use crate::constants::MAX_CAS_RETRIES;
use crate::store::keys;
use crate::store::{Store, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub account_id: String,
    pub platform: Platform,
    pub total_quizzes: u64,
    pub correct_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(account_id: &str, platform: Platform) -> Self {
        let now = Utc::now();
        Self {
            account_id: account_id.to_string(),
            platform,
            total_quizzes: 0,
            correct_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Store {
    pub fn get_user_by_id(&self, account_id: &str) -> Result<Option<User>, StoreError> {
        let key = keys::user_key(account_id)?;
        match self.users.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn put_user(&self, user: &User) -> Result<(), StoreError> {
        let key = keys::user_key(&user.account_id)?;
        self.users.insert(key.as_bytes(), Self::serialize(user)?)?;
        Ok(())
    }

    pub fn get_or_create_user(
        &self,
        account_id: &str,
        platform: Platform,
    ) -> Result<User, StoreError> {
        let key = keys::user_key(account_id)?;
        let fresh = User::new(account_id, platform);
        let cas = self.users.compare_and_swap(
            key.as_bytes(),
            None::<&[u8]>,
            Some(Self::serialize(&fresh)?),
        )?;
        match cas {
            Ok(()) => {
                tracing::info!(account_id, %platform, "Created user");
                Ok(fresh)
            }
            Err(existing) => match existing.current {
                Some(raw) => Self::deserialize(&raw),
                None => Err(StoreError::not_found("user", account_id)),
            },
        }
    }

    /// Bumps the lifetime counters of an existing user and returns the new state.
    pub fn record_user_answer(&self, account_id: &str, is_correct: bool) -> Result<User, StoreError> {
        let key = keys::user_key(account_id)?;
        for _ in 0..MAX_CAS_RETRIES {
            let current = self
                .users
                .get(key.as_bytes())?
                .ok_or_else(|| StoreError::not_found("user", account_id))?;
            let mut user: User = Self::deserialize(&current)?;
            user.total_quizzes += 1;
            if is_correct {
                user.correct_count += 1;
            }
            user.updated_at = Utc::now();

            let swapped = self.users.compare_and_swap(
                key.as_bytes(),
                Some(current),
                Some(Self::serialize(&user)?),
            )?;
            if swapped.is_ok() {
                return Ok(user);
            }
        }

        Err(StoreError::CasRetryExhausted {
            entity: "user".to_string(),
            key: account_id.to_string(),
            attempts: MAX_CAS_RETRIES,
        })
    }

    pub fn delete_user(&self, account_id: &str) -> Result<bool, StoreError> {
        let key = keys::user_key(account_id)?;
        Ok(self.users.remove(key.as_bytes())?.is_some())
    }
}
