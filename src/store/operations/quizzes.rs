use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analytics::taxonomy::{Category, Difficulty, QuizStatus};
use crate::store::keys;
use crate::store::{Store, StoreError};

pub const QUIZ_OPTION_COUNT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub quiz_id: String,
    pub merge_request_id: String,
    pub account_id: String,
    pub question_text: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub options: Vec<String>,
    pub correct_answer_index: u8,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff_reference: Option<String>,
    pub status: QuizStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct QuizFilter {
    pub category: Option<Category>,
    pub difficulty: Option<Difficulty>,
    pub status: Option<QuizStatus>,
    pub account_id: Option<String>,
    pub merge_request_id: Option<String>,
    pub limit: Option<usize>,
}

impl QuizFilter {
    fn matches(&self, quiz: &Quiz) -> bool {
        self.category.map_or(true, |c| quiz.category == c)
            && self.difficulty.map_or(true, |d| quiz.difficulty == d)
            && self.status.map_or(true, |s| quiz.status == s)
            && self
                .account_id
                .as_deref()
                .map_or(true, |id| quiz.account_id == id)
            && self
                .merge_request_id
                .as_deref()
                .map_or(true, |id| quiz.merge_request_id == id)
    }
}

fn validate_quiz(quiz: &Quiz) -> Result<(), StoreError> {
    if quiz.options.len() != QUIZ_OPTION_COUNT {
        return Err(StoreError::Validation(format!(
            "quiz must have exactly {QUIZ_OPTION_COUNT} options, got {}",
            quiz.options.len()
        )));
    }
    if usize::from(quiz.correct_answer_index) >= QUIZ_OPTION_COUNT {
        return Err(StoreError::Validation(format!(
            "correctAnswerIndex {} is out of range",
            quiz.correct_answer_index
        )));
    }
    if quiz.question_text.trim().is_empty() || quiz.options.iter().any(|o| o.trim().is_empty()) {
        return Err(StoreError::Validation(
            "question text and options must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl Store {
    pub fn create_quiz(&self, quiz: &Quiz) -> Result<(), StoreError> {
        validate_quiz(quiz)?;
        let key = keys::quiz_key(&quiz.quiz_id)?;
        let cas = self.quizzes.compare_and_swap(
            key.as_bytes(),
            None::<&[u8]>,
            Some(Self::serialize(quiz)?),
        )?;
        if cas.is_err() {
            return Err(StoreError::conflict("quiz", &quiz.quiz_id));
        }
        Ok(())
    }

    pub fn get_quiz(&self, quiz_id: &str) -> Result<Option<Quiz>, StoreError> {
        let key = keys::quiz_key(quiz_id)?;
        match self.quizzes.get(key.as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    /// Newest quizzes first.
    pub fn query_quizzes(&self, filter: &QuizFilter) -> Result<Vec<Quiz>, StoreError> {
        let mut quizzes = Vec::new();
        for item in self.quizzes.iter() {
            let (_, value) = item?;
            let quiz: Quiz = Self::deserialize(&value)?;
            if filter.matches(&quiz) {
                quizzes.push(quiz);
            }
        }

        quizzes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = filter.limit {
            quizzes.truncate(limit);
        }
        Ok(quizzes)
    }

    pub fn delete_quizzes_for_account(&self, account_id: &str) -> Result<usize, StoreError> {
        let owned = self.query_quizzes(&QuizFilter {
            account_id: Some(account_id.to_string()),
            ..QuizFilter::default()
        })?;
        let mut batch = sled::Batch::default();
        for quiz in &owned {
            batch.remove(keys::quiz_key(&quiz.quiz_id)?.as_bytes());
        }
        self.quizzes.apply_batch(batch)?;
        Ok(owned.len())
    }
}
