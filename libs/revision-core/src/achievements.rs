//! Achievement catalog and rule evaluation.
//!
//! Evaluation is pure: the caller aggregates [`AchievementCounters`] and the
//! set of achievements the user already holds, and receives the catalog
//! entries that should be awarded now. Persisting an award (and its point
//! bonus) is the caller's job and must be an insert-if-absent.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Aggregate counters a user's achievements are judged on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementCounters {
    pub deck_count: u64,
    pub card_count: u64,
    /// Number of study-log days recorded.
    pub study_days: u64,
    pub current_streak: u32,
}

/// Group of rules that move together with one kind of event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    Decks,
    Cards,
    Study,
}

/// Condition for earning an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "threshold", rename_all = "snake_case")]
pub enum Requirement {
    MinDecks(u64),
    MinCards(u64),
    MinStudyDays(u64),
    MinStreak(u32),
}

impl Requirement {
    pub fn is_met(&self, counters: &AchievementCounters) -> bool {
        match *self {
            Self::MinDecks(n) => counters.deck_count >= n,
            Self::MinCards(n) => counters.card_count >= n,
            Self::MinStudyDays(n) => counters.study_days >= n,
            Self::MinStreak(n) => counters.current_streak >= n,
        }
    }
}

/// Static catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub requirement: Requirement,
}

pub const CATALOG: &[Achievement] = &[
    Achievement {
        name: "First Steps",
        description: "Create your first deck",
        category: AchievementCategory::Decks,
        requirement: Requirement::MinDecks(1),
    },
    Achievement {
        name: "Card Collector",
        description: "Create 50 cards",
        category: AchievementCategory::Cards,
        requirement: Requirement::MinCards(50),
    },
    Achievement {
        name: "Knowledge Builder",
        description: "Create 250 cards",
        category: AchievementCategory::Cards,
        requirement: Requirement::MinCards(250),
    },
    Achievement {
        name: "Dedicated Learner",
        description: "Complete your first study session",
        category: AchievementCategory::Study,
        requirement: Requirement::MinStudyDays(1),
    },
    Achievement {
        name: "7-Day Streak",
        description: "Study 7 days in a row",
        category: AchievementCategory::Study,
        requirement: Requirement::MinStreak(7),
    },
    Achievement {
        name: "30-Day Streak",
        description: "Study 30 days in a row",
        category: AchievementCategory::Study,
        requirement: Requirement::MinStreak(30),
    },
];

/// Look up a catalog entry by name.
pub fn find(name: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|a| a.name == name)
}

/// Event that may have moved a counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementTrigger {
    DeckCreated,
    CardsAdded,
    ReviewSubmitted,
    /// Re-check the whole catalog.
    All,
}

impl AchievementTrigger {
    pub fn categories(self) -> &'static [AchievementCategory] {
        match self {
            Self::DeckCreated => &[AchievementCategory::Decks],
            Self::CardsAdded => &[AchievementCategory::Cards],
            Self::ReviewSubmitted => &[AchievementCategory::Study],
            Self::All => &[
                AchievementCategory::Decks,
                AchievementCategory::Cards,
                AchievementCategory::Study,
            ],
        }
    }

    pub fn covers(self, category: AchievementCategory) -> bool {
        self.categories().contains(&category)
    }
}

/// Achievements in the trigger's categories that are met and not yet held.
pub fn evaluate(
    counters: &AchievementCounters,
    held: &HashSet<String>,
    trigger: AchievementTrigger,
) -> Vec<&'static Achievement> {
    CATALOG
        .iter()
        .filter(|a| trigger.covers(a.category))
        .filter(|a| !held.contains(a.name))
        .filter(|a| a.requirement.is_met(counters))
        .collect()
}
