use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::analytics::taxonomy::{MilestoneType, Platform, QuizStatus};
use crate::constants::TOTAL_ANSWER_MILESTONES;
use crate::store::operations::answers::AnswerEvent;
use crate::store::operations::milestones::GrowthMilestone;
use crate::store::operations::quizzes::QUIZ_OPTION_COUNT;
use crate::store::operations::users::User;
use crate::store::{Store, StoreError};
use crate::validation::validate_account_id;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub account_id: String,
    pub selected_answer_index: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub answer_id: String,
    pub is_correct: bool,
    pub correct_answer_index: u8,
    pub selected_answer_index: u8,
    pub explanation: String,
}

/// Records a learner's answer to a quiz.
///
/// Writes the immutable answer event, marks the quiz answered, bumps the
/// user's lifetime counters (creating the user on first answer) and awards
/// answer-count milestones. The per-category aggregate projection is owned
/// by the aggregation job and is left untouched.
pub fn submit_answer(
    store: &Store,
    quiz_id: &str,
    submission: &AnswerSubmission,
) -> Result<AnswerOutcome, StoreError> {
    let account_id = submission.account_id.as_str();
    validate_account_id(account_id).map_err(|msg| StoreError::Validation(msg.to_string()))?;
    if usize::from(submission.selected_answer_index) >= QUIZ_OPTION_COUNT {
        return Err(StoreError::Validation(format!(
            "selectedAnswerIndex must be between 0 and {}",
            QUIZ_OPTION_COUNT - 1
        )));
    }

    tracing::info!(
        quiz_id,
        account_id,
        selected = submission.selected_answer_index,
        "Quiz answer submitted"
    );

    let quiz = store
        .get_quiz(quiz_id)?
        .ok_or_else(|| StoreError::not_found("quiz", quiz_id))?;
    if quiz.status == QuizStatus::Answered {
        return Err(StoreError::conflict("answer", quiz_id));
    }

    let answer = AnswerEvent {
        answer_id: Uuid::new_v4().to_string(),
        quiz_id: quiz.quiz_id.clone(),
        account_id: account_id.to_string(),
        merge_request_id: quiz.merge_request_id.clone(),
        category: quiz.category,
        difficulty: quiz.difficulty,
        selected_answer_index: submission.selected_answer_index,
        is_correct: submission.selected_answer_index == quiz.correct_answer_index,
        answered_at: Utc::now(),
    };
    store.create_answer(&answer, &quiz)?;

    let platform = store
        .get_merge_request(&quiz.merge_request_id)?
        .map(|mr| mr.platform)
        .unwrap_or(Platform::Github);
    store.get_or_create_user(account_id, platform)?;
    let user = store.record_user_answer(account_id, answer.is_correct)?;

    award_milestones(store, &answer, &user)?;

    tracing::info!(
        answer_id = %answer.answer_id,
        quiz_id,
        is_correct = answer.is_correct,
        "Quiz answered"
    );

    Ok(AnswerOutcome {
        answer_id: answer.answer_id,
        is_correct: answer.is_correct,
        correct_answer_index: quiz.correct_answer_index,
        selected_answer_index: answer.selected_answer_index,
        explanation: quiz.explanation,
    })
}

/// Milestones unlocked by the counters after `answer` was recorded.
fn award_milestones(store: &Store, answer: &AnswerEvent, user: &User) -> Result<(), StoreError> {
    let mut earned = Vec::new();

    if answer.is_correct && user.correct_count == 1 {
        earned.push(GrowthMilestone {
            milestone_id: Uuid::new_v4().to_string(),
            account_id: user.account_id.clone(),
            kind: MilestoneType::FirstCorrect,
            category: Some(answer.category),
            achievement: "First correct answer!".to_string(),
            metadata: metadata(json!({ "quizId": answer.quiz_id })),
            achieved_at: answer.answered_at,
        });
    }

    if TOTAL_ANSWER_MILESTONES.contains(&user.total_quizzes) {
        earned.push(GrowthMilestone {
            milestone_id: Uuid::new_v4().to_string(),
            account_id: user.account_id.clone(),
            kind: MilestoneType::TotalMilestone,
            category: None,
            achievement: format!("Answered {} quizzes", user.total_quizzes),
            metadata: metadata(json!({ "totalQuizzes": user.total_quizzes })),
            achieved_at: answer.answered_at,
        });
    }

    for milestone in &earned {
        store.create_milestone(milestone)?;
        tracing::info!(
            account_id = %milestone.account_id,
            kind = %milestone.kind,
            "Milestone achieved"
        );
    }
    Ok(())
}

fn metadata(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    }
}
