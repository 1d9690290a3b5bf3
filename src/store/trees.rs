pub const USERS: &str = "users";
pub const QUIZZES: &str = "quizzes";
pub const ANSWERS: &str = "answers";
pub const MERGE_REQUESTS: &str = "merge_requests";
pub const USER_PROFILES: &str = "user_profiles";
pub const SKILL_STATS: &str = "skill_stats";
pub const GROWTH_MILESTONES: &str = "growth_milestones";
pub const CONFIG_VERSIONS: &str = "config_versions";

// Secondary index trees
pub const ANSWERS_BY_QUIZ: &str = "answers_by_quiz";
