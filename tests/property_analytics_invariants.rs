use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use skill_analytics::analytics::accuracy_percent;
use skill_analytics::analytics::taxonomy::{Category, Difficulty};
use skill_analytics::analytics::trend::{classify_deltas, classify_outcomes, Outcome, TrendLabel};
use skill_analytics::analytics::weak_categories::analyze_source;
use skill_analytics::analytics::StatsSource;
use skill_analytics::store::operations::answers::AnswerEvent;

fn event(index: usize, category: Category, is_correct: bool) -> AnswerEvent {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap();
    AnswerEvent {
        answer_id: format!("a{index}"),
        quiz_id: format!("q{index}"),
        account_id: "prop".to_string(),
        merge_request_id: "github_acme_api_1".to_string(),
        category,
        difficulty: Difficulty::Medium,
        selected_answer_index: if is_correct { 0 } else { 1 },
        is_correct,
        answered_at: base + Duration::minutes(index as i64),
    }
}

fn answer_log() -> impl Strategy<Value = Vec<AnswerEvent>> {
    prop::collection::vec((0_usize..Category::ALL.len(), any::<bool>()), 0..60).prop_map(|raw| {
        raw.into_iter()
            .enumerate()
            .map(|(i, (c, ok))| event(i, Category::ALL[c], ok))
            .collect()
    })
}

proptest! {
    #[test]
    fn pt_accuracy_is_within_half_a_point(total in 1_u64..10_000, pick in 0.0_f64..=1.0) {
        let correct = ((total as f64) * pick).floor() as u64;
        let rate = accuracy_percent(correct, total);
        prop_assert!(rate <= 100);
        let exact = 100.0 * correct as f64 / total as f64;
        prop_assert!((f64::from(rate) - exact).abs() <= 0.5 + 1e-9);
    }

    #[test]
    fn pt_accuracy_never_drops_with_more_correct(total in 1_u64..500) {
        let rates: Vec<u32> = (0..=total).map(|correct| accuracy_percent(correct, total)).collect();
        prop_assert_eq!(rates[0], 0);
        prop_assert_eq!(rates[total as usize], 100);
        prop_assert!(rates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn pt_weekly_delta_dominates_monthly(monthly in -1.0_f64..=1.0) {
        prop_assert_eq!(classify_deltas(0.2, monthly), TrendLabel::Improving);
        prop_assert_eq!(classify_deltas(-0.2, monthly), TrendLabel::Declining);
    }

    #[test]
    fn pt_short_history_is_insufficient(pattern in prop::collection::vec(any::<bool>(), 0..10)) {
        let base = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap();
        let outcomes: Vec<Outcome> = pattern
            .iter()
            .enumerate()
            .map(|(i, &is_correct)| Outcome {
                answered_at: base + Duration::hours(i as i64),
                is_correct,
            })
            .collect();
        prop_assert_eq!(classify_outcomes(&outcomes), TrendLabel::InsufficientData);
    }

    #[test]
    fn pt_report_ordering_and_weak_subset(log in answer_log(), min_answers in 1_u32..6) {
        let report = analyze_source("prop", &StatsSource::Recomputed(log.clone()), min_answers);

        let rates: Vec<u32> = report.all_categories.iter().map(|c| c.accuracy_rate).collect();
        prop_assert!(rates.windows(2).all(|w| w[0] <= w[1]));

        for analysis in &report.all_categories {
            prop_assert!(analysis.total_answers >= u64::from(min_answers));
            prop_assert_eq!(
                analysis.correct_answers + analysis.incorrect_answers,
                analysis.total_answers
            );
            if analysis.total_answers < 10 {
                prop_assert_eq!(analysis.recent_trend, TrendLabel::InsufficientData);
            }
        }

        let expected_weak: Vec<Category> = report
            .all_categories
            .iter()
            .filter(|c| c.accuracy_rate < 60)
            .map(|c| c.category)
            .collect();
        let weak: Vec<Category> = report.weak_categories.iter().map(|c| c.category).collect();
        prop_assert_eq!(weak, expected_weak);

        prop_assert!(report.recommendations.len() <= 3);
        prop_assert!(!report.skill_stats_available);

        // pure over its input
        let again = analyze_source("prop", &StatsSource::Recomputed(log), min_answers);
        prop_assert_eq!(again, report);
    }
}
