use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MIN_EVENTS_FOR_TREND, TREND_THRESHOLD, TREND_WINDOW};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl TrendLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendLabel::Improving => "improving",
            TrendLabel::Declining => "declining",
            TrendLabel::Stable => "stable",
            TrendLabel::InsufficientData => "insufficient_data",
        }
    }
}

/// Timestamped correctness of a single answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub answered_at: DateTime<Utc>,
    pub is_correct: bool,
}

/// Trend from the aggregate projection's deltas. The weekly delta wins
/// whenever it clears the threshold; the monthly delta is only consulted
/// when the weekly one is flat.
pub fn classify_deltas(weekly: f64, monthly: f64) -> TrendLabel {
    if weekly > TREND_THRESHOLD {
        TrendLabel::Improving
    } else if weekly < -TREND_THRESHOLD {
        TrendLabel::Declining
    } else if monthly > TREND_THRESHOLD {
        TrendLabel::Improving
    } else if monthly < -TREND_THRESHOLD {
        TrendLabel::Declining
    } else {
        TrendLabel::Stable
    }
}

/// Trend recomputed from raw outcomes of one category: accuracy of the five
/// most recent answers against the five before them.
pub fn classify_outcomes(outcomes: &[Outcome]) -> TrendLabel {
    if outcomes.len() < MIN_EVENTS_FOR_TREND {
        return TrendLabel::InsufficientData;
    }

    let mut sorted = outcomes.to_vec();
    // stable: equal timestamps keep their input order
    sorted.sort_by(|a, b| b.answered_at.cmp(&a.answered_at));

    let window_accuracy = |window: &[Outcome]| {
        window.iter().filter(|o| o.is_correct).count() as f64 / TREND_WINDOW as f64
    };
    let recent = window_accuracy(&sorted[..TREND_WINDOW]);
    let previous = window_accuracy(&sorted[TREND_WINDOW..MIN_EVENTS_FOR_TREND]);

    if recent > previous + TREND_THRESHOLD {
        TrendLabel::Improving
    } else if recent < previous - TREND_THRESHOLD {
        TrendLabel::Declining
    } else {
        TrendLabel::Stable
    }
}
