use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::Transactional;

use crate::analytics::taxonomy::{Category, Difficulty, QuizStatus};
use crate::store::keys;
use crate::store::operations::quizzes::Quiz;
use crate::store::{Store, StoreError};

/// One learner response to one quiz. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvent {
    pub answer_id: String,
    pub quiz_id: String,
    pub account_id: String,
    pub merge_request_id: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub selected_answer_index: u8,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl Store {
    /// Appends an answer and marks its quiz answered in one transaction.
    ///
    /// The `answers_by_quiz` index makes a second answer for the same quiz
    /// fail with [`StoreError::Conflict`] even under concurrent submissions.
    pub fn create_answer(&self, answer: &AnswerEvent, quiz: &Quiz) -> Result<(), StoreError> {
        if answer.quiz_id != quiz.quiz_id {
            return Err(StoreError::Validation(format!(
                "answer {} references quiz {}, not {}",
                answer.answer_id, answer.quiz_id, quiz.quiz_id
            )));
        }

        let answer_key = keys::answer_key(
            &answer.account_id,
            answer.answered_at.timestamp_millis(),
            &answer.answer_id,
        )?;
        let answer_bytes = Self::serialize(answer)?;
        let index_key = keys::answer_quiz_index_key(&answer.quiz_id)?;
        let quiz_key = keys::quiz_key(&quiz.quiz_id)?;
        let answered_quiz = Quiz {
            status: QuizStatus::Answered,
            ..quiz.clone()
        };
        let quiz_bytes = Self::serialize(&answered_quiz)?;

        (&self.answers, &self.answers_by_quiz, &self.quizzes)
            .transaction(|(tx_answers, tx_index, tx_quizzes)| {
                if tx_index.get(index_key.as_bytes())?.is_some() {
                    return Err(ConflictableTransactionError::Abort(StoreError::conflict(
                        "answer",
                        &answer.quiz_id,
                    )));
                }
                tx_answers.insert(answer_key.as_bytes(), answer_bytes.as_slice())?;
                tx_index.insert(index_key.as_bytes(), answer_key.as_bytes())?;
                tx_quizzes.insert(quiz_key.as_bytes(), quiz_bytes.as_slice())?;
                Ok(())
            })
            .map_err(|error: TransactionError<StoreError>| match error {
                TransactionError::Abort(store_error) => store_error,
                TransactionError::Storage(storage_error) => StoreError::Sled(storage_error),
            })
    }

    pub fn get_answer_for_quiz(&self, quiz_id: &str) -> Result<Option<AnswerEvent>, StoreError> {
        let index_key = keys::answer_quiz_index_key(quiz_id)?;
        let Some(answer_key) = self.answers_by_quiz.get(index_key.as_bytes())? else {
            return Ok(None);
        };
        match self.answers.get(answer_key)? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => {
                tracing::warn!(quiz_id, "Dangling answers_by_quiz index entry");
                Ok(None)
            }
        }
    }

    /// Answers of one account, newest first, optionally capped at `limit`.
    pub fn get_answers_by_user(
        &self,
        account_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<AnswerEvent>, StoreError> {
        let prefix = keys::answer_prefix(account_id)?;
        Self::scan_docs(&self.answers, &prefix, limit)
    }

    pub fn count_user_answers(&self, account_id: &str) -> Result<usize, StoreError> {
        let prefix = keys::answer_prefix(account_id)?;
        let mut count = 0usize;
        for item in self.answers.scan_prefix(prefix.as_bytes()) {
            let _ = item?;
            count += 1;
        }
        Ok(count)
    }

    pub fn delete_answers_for_account(&self, account_id: &str) -> Result<usize, StoreError> {
        let answers = self.get_answers_by_user(account_id, None)?;
        let mut index_batch = sled::Batch::default();
        for answer in &answers {
            index_batch.remove(keys::answer_quiz_index_key(&answer.quiz_id)?.as_bytes());
        }
        self.answers_by_quiz.apply_batch(index_batch)?;
        Self::remove_prefix(&self.answers, &keys::answer_prefix(account_id)?)
    }
}
