//! Demo data for `test-user-mcp`: a user with fifteen answered quizzes across
//! all five categories, the matching aggregate projection, a profile, three
//! merge requests and three milestones.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::analytics::taxonomy::{
    Category, Difficulty, MergeRequestStatus, MilestoneType, Platform, QuizStatus,
};
use crate::store::operations::answers::AnswerEvent;
use crate::store::operations::merge_requests::MergeRequest;
use crate::store::operations::milestones::GrowthMilestone;
use crate::store::operations::profiles::UserProfile;
use crate::store::operations::quizzes::{Quiz, QUIZ_OPTION_COUNT};
use crate::store::operations::skill_stats::SkillStatsFigures;
use crate::store::operations::users::User;
use crate::store::{Store, StoreError};

pub const DEMO_ACCOUNT_ID: &str = "test-user-mcp";

const MR_AUTH: &str = "github_test-org_test-repo_101";
const MR_QUERY: &str = "github_test-org_test-repo_102";
const MR_VALIDATION: &str = "github_test-org_test-repo_103";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub users: usize,
    pub profiles: usize,
    pub merge_requests: usize,
    pub quizzes: usize,
    pub answers: usize,
    pub skill_stats: usize,
    pub milestones: usize,
}

struct QuestionTemplate {
    category: Category,
    merge_request_id: &'static str,
    question: &'static str,
    options: [&'static str; QUIZ_OPTION_COUNT],
    correct: u8,
    explanation: &'static str,
}

const QUESTIONS: [QuestionTemplate; 5] = [
    QuestionTemplate {
        category: Category::BugFix,
        merge_request_id: MR_AUTH,
        question: "Which status code should the auth middleware return for an invalid token?",
        options: ["200 OK", "401 Unauthorized", "403 Forbidden", "500 Internal Server Error"],
        correct: 1,
        explanation: "An invalid or missing credential is a 401 Unauthorized.",
    },
    QuestionTemplate {
        category: Category::Performance,
        merge_request_id: MR_QUERY,
        question: "What is the most appropriate fix for an N+1 query?",
        options: ["Add a cache", "JOIN or batch the query", "Add an index", "Grow the connection pool"],
        correct: 1,
        explanation: "Fetching the relation with a JOIN or one batched query removes the N+1.",
    },
    QuestionTemplate {
        category: Category::Refactoring,
        merge_request_id: MR_VALIDATION,
        question: "Which principle matters most when extracting a shared module?",
        options: ["DRY", "YAGNI", "KISS", "Single responsibility"],
        correct: 3,
        explanation: "A shared module should have one clear responsibility.",
    },
    QuestionTemplate {
        category: Category::Security,
        merge_request_id: MR_AUTH,
        question: "Which JWT signing algorithm avoids sharing a secret with verifiers?",
        options: ["HS256", "RS256", "none", "HS384"],
        correct: 1,
        explanation: "RS256 is asymmetric, so verifiers only need the public key.",
    },
    QuestionTemplate {
        category: Category::Logic,
        merge_request_id: MR_QUERY,
        question: "What does cursor pagination offer over offset pagination?",
        options: [
            "Simpler implementation",
            "Stable performance on large tables",
            "Random page access",
            "Plain SQL support",
        ],
        correct: 1,
        explanation: "Cursors skip no rows, so cost stays flat as the table grows.",
    },
];

/// `(category, difficulty, correct)` for the fifteen answers, oldest first.
const ANSWERS: [(Category, Difficulty, bool); 15] = [
    (Category::BugFix, Difficulty::Easy, true),
    (Category::BugFix, Difficulty::Easy, true),
    (Category::BugFix, Difficulty::Medium, false),
    (Category::Performance, Difficulty::Medium, true),
    (Category::Performance, Difficulty::Medium, false),
    (Category::Performance, Difficulty::Hard, false),
    (Category::Refactoring, Difficulty::Easy, true),
    (Category::Refactoring, Difficulty::Easy, true),
    (Category::Refactoring, Difficulty::Medium, true),
    (Category::Security, Difficulty::Hard, true),
    (Category::Security, Difficulty::Hard, false),
    (Category::Security, Difficulty::Medium, false),
    (Category::Logic, Difficulty::Medium, true),
    (Category::Logic, Difficulty::Medium, true),
    (Category::Logic, Difficulty::Hard, true),
];

/// `(category, averageDifficulty, weeklyTrend, monthlyTrend)`; counts come
/// from the answers above.
const SKILL_TRENDS: [(Category, f64, f64, f64); 5] = [
    (Category::BugFix, 1.33, 0.1, 0.1),
    (Category::Performance, 2.33, -0.3, -0.2),
    (Category::Refactoring, 1.33, 0.5, 0.4),
    (Category::Security, 2.67, 0.0, 0.2),
    (Category::Logic, 2.33, 0.3, 0.3),
];

fn days_ago(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - Duration::days(days)
}

fn template(category: Category) -> Result<&'static QuestionTemplate, StoreError> {
    QUESTIONS
        .iter()
        .find(|t| t.category == category)
        .ok_or_else(|| StoreError::not_found("question template", category.as_str()))
}

/// Removes every demo document. Safe to run on an empty store.
pub fn cleanup_demo(store: &Store) -> Result<SeedSummary, StoreError> {
    tracing::info!(account_id = DEMO_ACCOUNT_ID, "Cleaning up demo data");
    let summary = SeedSummary {
        users: usize::from(store.delete_user(DEMO_ACCOUNT_ID)?),
        profiles: usize::from(store.delete_user_profile(DEMO_ACCOUNT_ID)?),
        answers: store.delete_answers_for_account(DEMO_ACCOUNT_ID)?,
        quizzes: store.delete_quizzes_for_account(DEMO_ACCOUNT_ID)?,
        merge_requests: store.delete_merge_requests_by_author(DEMO_ACCOUNT_ID)?,
        skill_stats: store.delete_skill_stats_for_account(DEMO_ACCOUNT_ID)?,
        milestones: store.delete_milestones_for_account(DEMO_ACCOUNT_ID)?,
    };
    tracing::info!(?summary, "Cleanup complete");
    Ok(summary)
}

/// Cleans up, then writes the full demo data set.
pub fn seed_demo(store: &Store) -> Result<SeedSummary, StoreError> {
    cleanup_demo(store)?;
    let now = Utc::now();
    let mut summary = SeedSummary::default();

    store.put_user(&User {
        account_id: DEMO_ACCOUNT_ID.to_string(),
        platform: Platform::Github,
        total_quizzes: ANSWERS.len() as u64,
        correct_count: ANSWERS.iter().filter(|(_, _, ok)| *ok).count() as u64,
        created_at: days_ago(now, 30),
        updated_at: now,
    })?;
    summary.users = 1;

    store.put_user_profile(&UserProfile {
        account_id: DEMO_ACCOUNT_ID.to_string(),
        career_goal: Some("Become a security-minded backend engineer".to_string()),
        experience_level: Some("mid".to_string()),
        years_of_experience: Some(3),
        focus_areas: vec![Category::Security, Category::Performance],
        self_assessment: BTreeMap::from([
            (Category::BugFix, 3),
            (Category::Performance, 2),
            (Category::Refactoring, 4),
            (Category::Security, 2),
            (Category::Logic, 3),
        ]),
        created_at: days_ago(now, 30),
        updated_at: now,
    })?;
    summary.profiles = 1;

    let merge_requests = [
        (
            101,
            "feat: Add user authentication middleware",
            "Adds JWT auth middleware",
            ["src/middleware/auth.ts", "src/routes/api.ts"],
            MergeRequestStatus::Merged,
            20,
        ),
        (
            102,
            "fix: Resolve N+1 query in user listing",
            "Batches the user listing query",
            ["src/services/userService.ts", "src/repositories/userRepo.ts"],
            MergeRequestStatus::Open,
            5,
        ),
        (
            103,
            "refactor: Extract validation logic into shared module",
            "Moves validation into a shared module",
            ["src/utils/validation.ts", "src/controllers/userController.ts"],
            MergeRequestStatus::Merged,
            10,
        ),
    ];
    for (number, title, diff_summary, files, status, age) in merge_requests {
        store.put_merge_request(&MergeRequest {
            merge_request_id: MergeRequest::make_id(Platform::Github, "test-org", "test-repo", number),
            platform: Platform::Github,
            owner: "test-org".to_string(),
            repo: "test-repo".to_string(),
            number,
            author_account_id: DEMO_ACCOUNT_ID.to_string(),
            title: title.to_string(),
            diff_summary: Some(diff_summary.to_string()),
            files_changed: files.iter().map(|f| f.to_string()).collect(),
            status,
            created_at: days_ago(now, age),
        })?;
        summary.merge_requests += 1;
    }

    let mut first_quiz_id = None;
    for (i, &(category, difficulty, is_correct)) in ANSWERS.iter().enumerate() {
        let template = template(category)?;
        let asked_at = days_ago(now, 15 - i as i64);
        let quiz = Quiz {
            quiz_id: Uuid::new_v4().to_string(),
            merge_request_id: template.merge_request_id.to_string(),
            account_id: DEMO_ACCOUNT_ID.to_string(),
            question_text: template.question.to_string(),
            category,
            difficulty,
            options: template.options.iter().map(|o| o.to_string()).collect(),
            correct_answer_index: template.correct,
            explanation: template.explanation.to_string(),
            diff_reference: None,
            status: QuizStatus::Pending,
            created_at: asked_at - Duration::hours(1),
        };
        store.create_quiz(&quiz)?;
        summary.quizzes += 1;

        let selected = if is_correct {
            quiz.correct_answer_index
        } else {
            (quiz.correct_answer_index + 1) % QUIZ_OPTION_COUNT as u8
        };
        store.create_answer(
            &AnswerEvent {
                answer_id: Uuid::new_v4().to_string(),
                quiz_id: quiz.quiz_id.clone(),
                account_id: DEMO_ACCOUNT_ID.to_string(),
                merge_request_id: quiz.merge_request_id.clone(),
                category,
                difficulty,
                selected_answer_index: selected,
                is_correct,
                answered_at: asked_at,
            },
            &quiz,
        )?;
        summary.answers += 1;
        if first_quiz_id.is_none() {
            first_quiz_id = Some(quiz.quiz_id);
        }
    }

    for (category, average_difficulty, weekly_trend, monthly_trend) in SKILL_TRENDS {
        let (total, correct) = ANSWERS
            .iter()
            .filter(|(c, _, _)| *c == category)
            .fold((0u64, 0u64), |(t, c), (_, _, ok)| (t + 1, c + u64::from(*ok)));
        store.put_skill_stats(
            DEMO_ACCOUNT_ID,
            category,
            &SkillStatsFigures {
                total_quizzes: total,
                correct_count: correct,
                average_difficulty,
                last_answered_at: Some(days_ago(now, 1)),
                weekly_trend,
                monthly_trend,
            },
        )?;
        summary.skill_stats += 1;
    }

    let milestones = [
        (
            MilestoneType::FirstCorrect,
            None,
            "First correct answer!".to_string(),
            json!({ "quizId": first_quiz_id }),
            15,
        ),
        (
            MilestoneType::TotalMilestone,
            None,
            "Answered 10 quizzes".to_string(),
            json!({ "totalAnswers": 10 }),
            5,
        ),
        (
            MilestoneType::CategoryMaster,
            Some(Category::Refactoring),
            format!("{} master", Category::Refactoring),
            json!({ "correctRate": 1.0, "totalQuizzes": 3 }),
            2,
        ),
    ];
    for (kind, category, achievement, metadata, age) in milestones {
        store.create_milestone(&GrowthMilestone {
            milestone_id: Uuid::new_v4().to_string(),
            account_id: DEMO_ACCOUNT_ID.to_string(),
            kind,
            category,
            achievement,
            metadata: match metadata {
                serde_json::Value::Object(map) => map,
                _ => serde_json::Map::new(),
            },
            achieved_at: days_ago(now, age),
        })?;
        summary.milestones += 1;
    }

    tracing::info!(account_id = DEMO_ACCOUNT_ID, ?summary, "Seed complete");
    Ok(summary)
}
