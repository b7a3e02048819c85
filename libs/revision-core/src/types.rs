//! Core types shared by the schedulers and the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Ease factor given to a subject that has never been reviewed.
pub const INITIAL_EASE: f64 = 2.5;

/// Lowest ease factor a record may hold.
pub const MINIMUM_EASE: f64 = 1.3;

/// Rating for a flashcard review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Forgot,
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Self::Forgot, Self::Hard, Self::Good, Self::Easy];

    /// Quality score on the 0-5 SM-2 scale.
    pub fn quality(self) -> u8 {
        match self {
            Self::Forgot => 0,
            Self::Hard => 3,
            Self::Good => 4,
            Self::Easy => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Forgot => "forgot",
            Self::Hard => "hard",
            Self::Good => "good",
            Self::Easy => "easy",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forgot" => Ok(Self::Forgot),
            "hard" => Ok(Self::Hard),
            "good" => Ok(Self::Good),
            "easy" => Ok(Self::Easy),
            other => Err(CoreError::InvalidRating(other.to_string())),
        }
    }
}

/// Review state of a flashcard before scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReviewState {
    pub interval_days: u32,
    pub ease_factor: f64,
}

impl Default for ReviewState {
    fn default() -> Self {
        Self {
            interval_days: 0,
            ease_factor: INITIAL_EASE,
        }
    }
}

/// Attempt counters for a multiple-choice question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqState {
    pub times_attempted: u32,
    pub times_correct: u32,
}

impl McqState {
    /// Counters after one more attempt.
    pub fn record_attempt(self, is_correct: bool) -> Self {
        Self {
            times_attempted: self.times_attempted + 1,
            times_correct: self.times_correct + u32::from(is_correct),
        }
    }
}

/// One of the four options of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts surrounding whitespace and lowercase letters.
impl FromStr for AnswerOption {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(CoreError::InvalidAnswerOption(s.to_string())),
        }
    }
}

/// MCQ difficulty label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(CoreError::InvalidDifficulty(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rating_parses_lowercase_names() {
        for rating in Rating::ALL {
            assert_eq!(rating.as_str().parse::<Rating>(), Ok(rating));
        }
    }

    #[test]
    fn rating_rejects_unknown_value() {
        assert_eq!(
            "again".parse::<Rating>(),
            Err(CoreError::InvalidRating("again".to_string()))
        );
        assert!("Good".parse::<Rating>().is_err());
    }

    #[test]
    fn quality_scale_matches_ratings() {
        let qualities: Vec<u8> = Rating::ALL.iter().map(|r| r.quality()).collect();
        assert_eq!(qualities, vec![0, 3, 4, 5]);
    }

    #[test]
    fn answer_option_is_case_and_space_insensitive() {
        assert_eq!(" b ".parse::<AnswerOption>(), Ok(AnswerOption::B));
        assert_eq!("D".parse::<AnswerOption>(), Ok(AnswerOption::D));
        assert!("E".parse::<AnswerOption>().is_err());
        assert!("".parse::<AnswerOption>().is_err());
    }

    #[test]
    fn difficulty_defaults_to_medium() {
        assert_eq!(Difficulty::default(), Difficulty::Medium);
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn mcq_state_counts_attempts() {
        let state = McqState::default()
            .record_attempt(true)
            .record_attempt(false)
            .record_attempt(true);
        assert_eq!(
            state,
            McqState {
                times_attempted: 3,
                times_correct: 2
            }
        );
    }

    #[test]
    fn rating_displays_lowercase() {
        assert_eq!(Rating::Easy.to_string(), "easy");
        assert_eq!(AnswerOption::C.to_string(), "C");
    }
}
