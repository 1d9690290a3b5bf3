use crate::analytics::taxonomy::Category;
use crate::store::StoreError;

/// Key segments are joined with `:`, so an identifier must not contain one.
fn segment<'a>(kind: &str, value: &'a str) -> Result<&'a str, StoreError> {
    if value.is_empty() {
        return Err(StoreError::Validation(format!("{kind} must not be empty")));
    }
    if value.contains(':') {
        return Err(StoreError::Validation(format!(
            "{kind} must not contain ':' (got {value:?})"
        )));
    }
    Ok(value)
}

fn reverse_ts(timestamp_ms: i64) -> u64 {
    u64::MAX - timestamp_ms.max(0) as u64
}

pub fn user_key(account_id: &str) -> Result<String, StoreError> {
    Ok(segment("accountId", account_id)?.to_string())
}

pub fn user_profile_key(account_id: &str) -> Result<String, StoreError> {
    user_key(account_id)
}

pub fn quiz_key(quiz_id: &str) -> Result<String, StoreError> {
    Ok(segment("quizId", quiz_id)?.to_string())
}

pub fn merge_request_key(merge_request_id: &str) -> Result<String, StoreError> {
    Ok(segment("mergeRequestId", merge_request_id)?.to_string())
}

/// Newest answers sort first within an account prefix.
pub fn answer_key(
    account_id: &str,
    timestamp_ms: i64,
    answer_id: &str,
) -> Result<String, StoreError> {
    Ok(format!(
        "{}:{:020}:{}",
        segment("accountId", account_id)?,
        reverse_ts(timestamp_ms),
        segment("answerId", answer_id)?
    ))
}

pub fn answer_prefix(account_id: &str) -> Result<String, StoreError> {
    Ok(format!("{}:", segment("accountId", account_id)?))
}

pub fn answer_quiz_index_key(quiz_id: &str) -> Result<String, StoreError> {
    quiz_key(quiz_id)
}

pub fn skill_stats_key(account_id: &str, category: Category) -> Result<String, StoreError> {
    Ok(format!("{}:{}", segment("accountId", account_id)?, category))
}

pub fn skill_stats_prefix(account_id: &str) -> Result<String, StoreError> {
    answer_prefix(account_id)
}

pub fn milestone_key(
    account_id: &str,
    timestamp_ms: i64,
    milestone_id: &str,
) -> Result<String, StoreError> {
    Ok(format!(
        "{}:{:020}:{}",
        segment("accountId", account_id)?,
        reverse_ts(timestamp_ms),
        segment("milestoneId", milestone_id)?
    ))
}

pub fn milestone_prefix(account_id: &str) -> Result<String, StoreError> {
    answer_prefix(account_id)
}
