/// Shared input checks for tools and routes.
/// Each check runs before any store access.

/// Platform usernames: non-empty, at most 100 characters, no control
/// characters and no `:` (the store's key separator).
pub fn validate_account_id(account_id: &str) -> Result<(), &'static str> {
    if account_id.trim().is_empty() {
        return Err("accountId must not be empty");
    }
    if account_id.chars().count() > 100 {
        return Err("accountId must be at most 100 characters");
    }
    if account_id.chars().any(|c| c.is_control() || c == ':') {
        return Err("accountId contains invalid characters");
    }
    Ok(())
}

/// `minAnswers` must be a positive integer.
pub fn validate_min_answers(min_answers: u32) -> Result<(), &'static str> {
    if min_answers == 0 {
        return Err("minAnswers must be a positive integer");
    }
    Ok(())
}

/// Resolves an optional list limit to `1..=max`, falling back to `default`.
pub fn resolve_limit(limit: Option<usize>, default: usize, max: usize) -> Result<usize, String> {
    match limit {
        None => Ok(default.min(max)),
        Some(0) => Err("limit must be a positive integer".to_string()),
        Some(n) if n > max => Err(format!("limit must be at most {max}")),
        Some(n) => Ok(n),
    }
}
