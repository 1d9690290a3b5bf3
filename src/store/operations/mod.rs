pub mod answers;
pub mod merge_requests;
pub mod milestones;
pub mod profiles;
pub mod quizzes;
pub mod skill_stats;
pub mod users;
