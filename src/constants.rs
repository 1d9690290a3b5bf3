/// Upper bound on compare-and-swap retries for contended documents.
pub const MAX_CAS_RETRIES: u32 = 20;

/// Default minimum answers a category needs before it is analysed.
pub const DEFAULT_MIN_ANSWERS: u32 = 3;

/// Accuracy (integer percent) strictly below which a category is weak.
pub const WEAK_ACCURACY_THRESHOLD: u32 = 60;

/// How many weak categories receive a targeted recommendation.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Delta that separates a trend from noise, for both aggregate deltas and
/// windowed accuracy comparison.
pub const TREND_THRESHOLD: f64 = 0.1;

/// Size of each of the two windows compared by the event-path trend.
pub const TREND_WINDOW: usize = 5;

/// Events a category needs before the event-path trend is computed.
pub const MIN_EVENTS_FOR_TREND: usize = 2 * TREND_WINDOW;

/// Recent answers feeding the difficulty breakdown of the stats report.
pub const DEFAULT_STATS_WINDOW: usize = 100;

/// Default size of list-style tool results.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Hard cap on list-style tool results.
pub const MAX_LIST_LIMIT: usize = 100;

/// Lifetime answer counts that award a `total_milestone`.
pub const TOTAL_ANSWER_MILESTONES: &[u64] = &[10, 50, 100, 500];
