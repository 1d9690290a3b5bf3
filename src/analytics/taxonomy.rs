//! Closed vocabularies shared with the other systems reading the store.
//!
//! The wire names (`bug_fix`, `easy`, ...) are part of the stored document
//! format and must not change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} {value:?}, expected one of: {expected}")]
pub struct ParseTaxonomyError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant),+
        }

        impl $name {
            /// Every value, in canonical iteration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseTaxonomyError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(ParseTaxonomyError {
                        kind: $kind,
                        value: value.to_string(),
                        expected: [$($wire),+].join(", "),
                    }),
                }
            }
        }
    };
}

closed_enum! {
    /// Topic tag of a quiz.
    Category, "category" {
        BugFix => "bug_fix",
        Performance => "performance",
        Refactoring => "refactoring",
        Security => "security",
        Logic => "logic",
    }
}

closed_enum! {
    Difficulty, "difficulty" {
        Easy => "easy",
        Medium => "medium",
        Hard => "hard",
    }
}

closed_enum! {
    Platform, "platform" {
        Github => "github",
        Gitlab => "gitlab",
    }
}

closed_enum! {
    QuizStatus, "quiz status" {
        Pending => "pending",
        Answered => "answered",
        Skipped => "skipped",
        Expired => "expired",
    }
}

closed_enum! {
    MergeRequestStatus, "merge request status" {
        Open => "open",
        Merged => "merged",
        Closed => "closed",
    }
}

closed_enum! {
    MilestoneType, "milestone type" {
        FirstCorrect => "first_correct",
        Streak => "streak",
        CategoryMaster => "category_master",
        TotalMilestone => "total_milestone",
    }
}

impl Difficulty {
    /// Weight used by the difficulty-weighted average of the aggregate projection.
    pub fn weight(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

impl Category {
    /// Position in [`Category::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}
