use serde::Serialize;

use crate::analytics::projection::{SkillDataSource, StatsSource};
use crate::analytics::taxonomy::Category;
use crate::analytics::trend::TrendLabel;
use crate::analytics::{accuracy_percent, require_account_id, AnalyticsError, Lookup, NotFound};
use crate::constants::{DEFAULT_MIN_ANSWERS, MAX_RECOMMENDATIONS, WEAK_ACCURACY_THRESHOLD};
use crate::validation::validate_min_answers;

const ENCOURAGEMENT: &str = "Great job! No significant weak areas detected. Keep up the good work!";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAnalysis {
    pub category: Category,
    pub total_answers: u64,
    pub correct_answers: u64,
    pub incorrect_answers: u64,
    pub accuracy_rate: u32,
    pub recent_trend: TrendLabel,
}

impl CategoryAnalysis {
    pub fn is_weak(&self) -> bool {
        self.accuracy_rate < WEAK_ACCURACY_THRESHOLD
    }

    fn recommendation(&self) -> String {
        let category = self.category;
        let rate = self.accuracy_rate;
        match self.recent_trend {
            TrendLabel::Declining => format!(
                "{category}: Accuracy is declining ({rate}%). Focus on reviewing {category} concepts."
            ),
            TrendLabel::Improving => {
                format!("{category}: Good progress! Continue practicing to improve from {rate}%.")
            }
            TrendLabel::Stable | TrendLabel::InsufficientData => {
                format!("{category}: Accuracy is {rate}%. Consider more practice in this area.")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeakCategoryReport {
    pub found: bool,
    pub account_id: String,
    pub total_categories_analyzed: usize,
    /// Weakest first.
    pub all_categories: Vec<CategoryAnalysis>,
    pub weak_categories: Vec<CategoryAnalysis>,
    pub recommendations: Vec<String>,
    pub analysis_note: String,
    pub skill_stats_available: bool,
}

/// Flags the account's weak categories and suggests what to practise.
///
/// `min_answers` defaults to 3 and must be positive. Inputs are validated
/// before the store is read.
pub fn analyze_weak_categories<S: SkillDataSource + ?Sized>(
    source: &S,
    account_id: &str,
    min_answers: Option<u32>,
) -> Result<Lookup<WeakCategoryReport>, AnalyticsError> {
    require_account_id(account_id)?;
    let min_answers = min_answers.unwrap_or(DEFAULT_MIN_ANSWERS);
    validate_min_answers(min_answers)
        .map_err(|msg| AnalyticsError::InvalidInput(msg.to_string()))?;

    tracing::info!(account_id, min_answers, "Executing analyze_weak_categories");

    if source.find_user(account_id)?.is_none() {
        return Ok(Lookup::NotFound(NotFound::user(account_id)));
    }

    let stats = StatsSource::load(source, account_id)?;
    let report = analyze_source(account_id, &stats, min_answers);

    tracing::info!(
        account_id,
        weak_categories_count = report.weak_categories.len(),
        "analyze_weak_categories completed"
    );
    Ok(Lookup::Found(report))
}

/// The pure part of the analysis, over an already resolved source.
pub fn analyze_source(account_id: &str, stats: &StatsSource, min_answers: u32) -> WeakCategoryReport {
    let mut analyses: Vec<CategoryAnalysis> = stats
        .category_figures()
        .into_iter()
        .filter(|figures| figures.total >= u64::from(min_answers))
        .map(|figures| {
            let correct = figures.correct.min(figures.total);
            CategoryAnalysis {
                category: figures.category,
                total_answers: figures.total,
                correct_answers: correct,
                incorrect_answers: figures.total - correct,
                accuracy_rate: accuracy_percent(correct, figures.total),
                recent_trend: figures.trend,
            }
        })
        .collect();

    // sort_by_key is stable, ties keep encounter order
    analyses.sort_by_key(|analysis| analysis.accuracy_rate);

    let weak_categories: Vec<CategoryAnalysis> =
        analyses.iter().filter(|a| a.is_weak()).cloned().collect();

    let mut recommendations: Vec<String> = weak_categories
        .iter()
        .take(MAX_RECOMMENDATIONS)
        .map(CategoryAnalysis::recommendation)
        .collect();
    if weak_categories.is_empty() && !analyses.is_empty() {
        recommendations.push(ENCOURAGEMENT.to_string());
    }

    WeakCategoryReport {
        found: true,
        account_id: account_id.to_string(),
        total_categories_analyzed: analyses.len(),
        all_categories: analyses,
        weak_categories,
        recommendations,
        analysis_note: format!(
            "Categories with fewer than {min_answers} answers are excluded from analysis."
        ),
        skill_stats_available: stats.is_aggregated(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::projection::tests::{aggregate, events, FakeSource};

    fn report(source: &FakeSource, min_answers: Option<u32>) -> WeakCategoryReport {
        analyze_weak_categories(source, "alice", min_answers)
            .unwrap()
            .found()
            .unwrap()
    }

    #[test]
    fn three_bug_fix_answers_two_correct_is_not_weak() {
        let mut source = FakeSource::with_user("alice");
        source.answers = events(Category::BugFix, &[true, false, true]);

        let report = report(&source, Some(3));
        assert_eq!(report.total_categories_analyzed, 1);
        assert_eq!(report.all_categories[0].category, Category::BugFix);
        assert_eq!(report.all_categories[0].accuracy_rate, 67);
        assert_eq!(report.all_categories[0].incorrect_answers, 1);
        assert!(report.weak_categories.is_empty());
        assert_eq!(report.recommendations, vec![ENCOURAGEMENT.to_string()]);
        assert!(!report.skill_stats_available);
    }

    #[test]
    fn negative_weekly_delta_is_declining() {
        let mut source = FakeSource::with_user("alice");
        source.stats = vec![aggregate(Category::Security, 10, 4, -0.3, 0.9)];

        let report = report(&source, None);
        let security = &report.all_categories[0];
        assert_eq!(security.recent_trend, TrendLabel::Declining);
        assert_eq!(
            report.recommendations,
            vec!["security: Accuracy is declining (40%). Focus on reviewing security concepts."]
        );
        assert!(report.skill_stats_available);
    }

    #[test]
    fn recent_slump_in_event_log_is_declining() {
        let mut source = FakeSource::with_user("alice");
        let mut pattern = vec![true, false, false, false, false];
        pattern.extend([true, true, true, true, false]);
        pattern.extend([true, true]);
        source.answers = events(Category::Performance, &pattern);

        let report = report(&source, None);
        assert_eq!(report.all_categories[0].recent_trend, TrendLabel::Declining);
    }

    #[test]
    fn nothing_qualifies_below_min_answers() {
        let mut source = FakeSource::with_user("alice");
        source.answers = events(Category::Logic, &[false, false]);

        let report = report(&source, Some(3));
        assert!(report.found);
        assert_eq!(report.total_categories_analyzed, 0);
        assert!(report.all_categories.is_empty());
        assert!(report.weak_categories.is_empty());
        assert!(report.recommendations.is_empty());
        assert_eq!(
            report.analysis_note,
            "Categories with fewer than 3 answers are excluded from analysis."
        );
    }

    #[test]
    fn unknown_account_is_not_found() {
        let source = FakeSource::default();
        let lookup = analyze_weak_categories(&source, "ghost", None).unwrap();
        assert_eq!(lookup, Lookup::NotFound(NotFound::user("ghost")));
        assert_eq!(source.answer_reads.get(), 0);
    }

    #[test]
    fn invalid_input_is_rejected_before_reading() {
        let mut source = FakeSource::with_user("alice");
        source.fail = true;

        assert!(matches!(
            analyze_weak_categories(&source, "alice", Some(0)),
            Err(AnalyticsError::InvalidInput(_))
        ));
        assert!(matches!(
            analyze_weak_categories(&source, "  ", None),
            Err(AnalyticsError::InvalidInput(_))
        ));
    }

    #[test]
    fn store_failure_propagates() {
        let mut source = FakeSource::with_user("alice");
        source.fail = true;
        assert!(matches!(
            analyze_weak_categories(&source, "alice", None),
            Err(AnalyticsError::StoreUnavailable(_))
        ));
    }

    #[test]
    fn weakest_first_with_ties_in_encounter_order() {
        let mut source = FakeSource::with_user("alice");
        source.stats = vec![
            aggregate(Category::BugFix, 10, 5, 0.0, 0.0),
            aggregate(Category::Performance, 10, 9, 0.0, 0.0),
            aggregate(Category::Refactoring, 10, 2, 0.5, 0.0),
            aggregate(Category::Security, 10, 5, 0.0, 0.0),
            aggregate(Category::Logic, 10, 3, 0.0, 0.0),
        ];

        let report = report(&source, None);
        let order: Vec<Category> = report.all_categories.iter().map(|a| a.category).collect();
        assert_eq!(
            order,
            vec![
                Category::Refactoring,
                Category::Logic,
                Category::BugFix,
                Category::Security,
                Category::Performance,
            ]
        );
        assert_eq!(report.weak_categories.len(), 4);
        assert_eq!(report.recommendations.len(), MAX_RECOMMENDATIONS);
        assert_eq!(
            report.recommendations[0],
            "refactoring: Good progress! Continue practicing to improve from 20%."
        );
        assert_eq!(
            report.recommendations[2],
            "bug_fix: Accuracy is 50%. Consider more practice in this area."
        );
    }

    #[test]
    fn repeated_analysis_is_byte_identical() {
        let mut source = FakeSource::with_user("alice");
        source.answers = events(Category::Security, &[true, false, false, true, false]);
        source.answers.extend(events(Category::Logic, &[true; 4]));

        let first = serde_json::to_string(&report(&source, None)).unwrap();
        let second = serde_json::to_string(&report(&source, None)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn serializes_with_contract_field_names() {
        let mut source = FakeSource::with_user("alice");
        source.answers = events(Category::Logic, &[false, false, true]);

        let json = serde_json::to_value(report(&source, None)).unwrap();
        assert_eq!(json["found"], true);
        assert_eq!(json["totalCategoriesAnalyzed"], 1);
        assert_eq!(json["allCategories"][0]["category"], "logic");
        assert_eq!(json["allCategories"][0]["accuracyRate"], 33);
        assert_eq!(json["allCategories"][0]["recentTrend"], "insufficient_data");
        assert_eq!(json["weakCategories"][0]["incorrectAnswers"], 2);
        assert_eq!(json["skillStatsAvailable"], false);
    }
}
