use chrono::{DateTime, Duration, Utc};

use skill_analytics::analytics::taxonomy::{Category, Difficulty, Platform, QuizStatus};
use skill_analytics::store::operations::answers::AnswerEvent;
use skill_analytics::store::operations::quizzes::Quiz;
use skill_analytics::store::operations::skill_stats::{SkillStats, SkillStatsFigures};
use skill_analytics::store::operations::users::User;
use skill_analytics::store::Store;

pub fn seed_user(store: &Store, account_id: &str) -> User {
    store
        .get_or_create_user(account_id, Platform::Github)
        .expect("create seed user")
}

pub fn seed_quiz(store: &Store, account_id: &str, category: Category, difficulty: Difficulty) -> Quiz {
    let quiz = Quiz {
        quiz_id: uuid::Uuid::new_v4().to_string(),
        merge_request_id: "github_acme_api_7".to_string(),
        account_id: account_id.to_string(),
        question_text: format!("A {category} question"),
        category,
        difficulty,
        options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
        correct_answer_index: 2,
        explanation: "Option c is right.".to_string(),
        diff_reference: None,
        status: QuizStatus::Pending,
        created_at: Utc::now(),
    };
    store.create_quiz(&quiz).expect("create seed quiz");
    quiz
}

/// Writes one answered quiz per entry of `pattern`; `pattern[0]` is the
/// most recent answer. Also bumps the user's lifetime counters.
pub fn seed_answers(
    store: &Store,
    account_id: &str,
    category: Category,
    difficulty: Difficulty,
    pattern: &[bool],
) -> Vec<AnswerEvent> {
    let now = Utc::now();
    pattern
        .iter()
        .enumerate()
        .map(|(age, &is_correct)| {
            let answered_at: DateTime<Utc> = now - Duration::minutes(age as i64 + 1);
            seed_answer(store, account_id, category, difficulty, is_correct, answered_at)
        })
        .collect()
}

pub fn seed_answer(
    store: &Store,
    account_id: &str,
    category: Category,
    difficulty: Difficulty,
    is_correct: bool,
    answered_at: DateTime<Utc>,
) -> AnswerEvent {
    let quiz = seed_quiz(store, account_id, category, difficulty);
    let answer = AnswerEvent {
        answer_id: uuid::Uuid::new_v4().to_string(),
        quiz_id: quiz.quiz_id.clone(),
        account_id: account_id.to_string(),
        merge_request_id: quiz.merge_request_id.clone(),
        category,
        difficulty,
        selected_answer_index: if is_correct { 2 } else { 0 },
        is_correct,
        answered_at,
    };
    store.create_answer(&answer, &quiz).expect("create seed answer");
    seed_user(store, account_id);
    store
        .record_user_answer(account_id, is_correct)
        .expect("bump user counters");
    answer
}

pub fn seed_skill_stats(
    store: &Store,
    account_id: &str,
    category: Category,
    total: u64,
    correct: u64,
    weekly_trend: f64,
    monthly_trend: f64,
) -> SkillStats {
    store
        .put_skill_stats(
            account_id,
            category,
            &SkillStatsFigures {
                total_quizzes: total,
                correct_count: correct,
                average_difficulty: 2.0,
                last_answered_at: Some(Utc::now()),
                weekly_trend,
                monthly_trend,
            },
        )
        .expect("put seed skill stats")
}
