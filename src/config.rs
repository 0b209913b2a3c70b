//! Tunable game options
//!
//! Every option has a default matching the classic game, so an empty JSON
//! object is a valid configuration. Options are validated field by field with
//! `garde`, then checked as a whole (the audience poll must fit in 100%) and
//! finally against the question bank a game is created with.

use std::{ops::RangeInclusive, time::Duration};

use garde::Validate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    bank::QuestionBank,
    constants::{
        lifeline::AUDIENCE_TOTAL,
        timer::{MAX_QUESTION_DURATION, MIN_QUESTION_DURATION},
    },
};

type ValidationResult = garde::Result;

/// Errors produced while loading or checking options
#[derive(Error, Debug)]
pub enum Error {
    /// A field is outside its allowed bounds
    #[error("invalid options: {0}")]
    Invalid(#[from] garde::Report),
    /// Floors plus the largest correct-choice bonus exceed 100%
    #[error("audience floor {floor}% on four choices plus a bonus of up to {bonus}% exceeds 100%")]
    AudienceOverflow {
        /// Per-choice floor
        floor: u8,
        /// Upper end of the bonus range
        bonus: u8,
    },
    /// The safe position does not name a question in the bank
    #[error("safe position {safe_position} is outside a bank of {questions} questions")]
    SafePosition {
        /// Configured safe position
        safe_position: usize,
        /// Number of questions in the bank
        questions: usize,
    },
    /// The options could not be parsed
    #[error("malformed options: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validates that the question duration falls within the allowed bounds
fn validate_question_duration(val: &Duration, _ctx: &()) -> ValidationResult {
    if (MIN_QUESTION_DURATION..=MAX_QUESTION_DURATION).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "outside of bounds [{MIN_QUESTION_DURATION},{MAX_QUESTION_DURATION}]",
        )))
    }
}

/// Validates that a `[min, max]` bonus range is ordered and at most 100%
fn validate_bonus_range(val: &[u8; 2], _ctx: &()) -> ValidationResult {
    let [min, max] = *val;
    if min > max {
        Err(garde::Error::new(format!("minimum {min} exceeds maximum {max}")))
    } else if max > AUDIENCE_TOTAL {
        Err(garde::Error::new(format!("maximum {max} exceeds 100")))
    } else {
        Ok(())
    }
}

/// Options recognized by a game
///
/// JSON keys are camelCase, e.g.
/// `{"questionDuration": 20, "safePosition": 4, "phoneAccuracy": 0.7}`.
#[serde_with::serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Seconds allowed per question
    #[garde(custom(validate_question_duration))]
    #[serde_as(as = "serde_with::DurationSeconds<u64>")]
    question_duration: Duration,
    /// Ladder index whose prize is guaranteed once passed
    #[garde(skip)]
    safe_position: usize,
    /// Probability that Phone a Friend suggests the correct choice
    #[garde(range(min = 0.0, max = 1.0))]
    phone_accuracy: f64,
    /// Minimum percentage every choice receives in an audience poll
    #[garde(range(max = crate::constants::lifeline::MAX_AUDIENCE_FLOOR))]
    audience_base_floor: u8,
    /// Inclusive `[min, max]` bonus percentage added to the correct choice
    #[garde(custom(validate_bonus_range))]
    audience_correct_bonus_range: [u8; 2],
}

impl Default for Options {
    fn default() -> Self {
        Self {
            question_duration: Duration::from_secs(30),
            safe_position: 4,
            phone_accuracy: 0.7,
            audience_base_floor: 5,
            audience_correct_bonus_range: [50, 70],
        }
    }
}

impl Options {
    /// Parses options from JSON and checks them
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed input and the errors of
    /// [`Options::check`] for out-of-bounds values.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let options: Self = serde_json::from_str(json)?;
        options.check()?;
        Ok(options)
    }

    /// Validates every field and the audience poll budget
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invalid`] for a field outside its bounds and
    /// [`Error::AudienceOverflow`] when the floors and the largest bonus do
    /// not fit in 100%.
    pub fn check(&self) -> Result<(), Error> {
        self.validate()?;

        let [_, bonus] = self.audience_correct_bonus_range;
        let floors = u16::from(self.audience_base_floor) * 4;
        if floors + u16::from(bonus) > u16::from(AUDIENCE_TOTAL) {
            return Err(Error::AudienceOverflow {
                floor: self.audience_base_floor,
                bonus,
            });
        }

        Ok(())
    }

    /// Checks the options against the bank they will be played with
    ///
    /// # Errors
    ///
    /// Returns [`Error::SafePosition`] if the safe position is not a valid
    /// ladder index.
    pub fn check_against(&self, bank: &QuestionBank) -> Result<(), Error> {
        if self.safe_position < bank.len() {
            Ok(())
        } else {
            Err(Error::SafePosition {
                safe_position: self.safe_position,
                questions: bank.len(),
            })
        }
    }

    /// Sets the time allowed per question
    #[must_use]
    pub fn with_question_duration(mut self, duration: Duration) -> Self {
        self.question_duration = duration;
        self
    }

    /// Sets the guaranteed-prize ladder index
    #[must_use]
    pub fn with_safe_position(mut self, safe_position: usize) -> Self {
        self.safe_position = safe_position;
        self
    }

    /// Sets the probability that Phone a Friend is right
    #[must_use]
    pub fn with_phone_accuracy(mut self, accuracy: f64) -> Self {
        self.phone_accuracy = accuracy;
        self
    }

    /// Sets the audience poll floor and correct-choice bonus range
    #[must_use]
    pub fn with_audience(mut self, floor: u8, bonus: RangeInclusive<u8>) -> Self {
        self.audience_base_floor = floor;
        self.audience_correct_bonus_range = [*bonus.start(), *bonus.end()];
        self
    }

    /// Time allowed per question
    pub fn question_duration(&self) -> Duration {
        self.question_duration
    }

    /// Time allowed per question, in whole seconds
    pub fn question_seconds(&self) -> u64 {
        self.question_duration.as_secs()
    }

    /// Ladder index whose prize is guaranteed once passed
    pub fn safe_position(&self) -> usize {
        self.safe_position
    }

    /// Probability that Phone a Friend is right
    pub fn phone_accuracy(&self) -> f64 {
        self.phone_accuracy
    }

    /// Per-choice audience floor in percent
    pub fn audience_base_floor(&self) -> u8 {
        self.audience_base_floor
    }

    /// Inclusive range of the correct-choice audience bonus
    pub fn audience_bonus(&self) -> RangeInclusive<u8> {
        let [min, max] = self.audience_correct_bonus_range;
        min..=max
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();

        assert_eq!(options.question_seconds(), 30);
        assert_eq!(options.safe_position(), 4);
        assert!((options.phone_accuracy() - 0.7).abs() < f64::EPSILON);
        assert_eq!(options.audience_base_floor(), 5);
        assert_eq!(options.audience_bonus(), 50..=70);
        assert!(options.check().is_ok());
    }

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(Options::from_json("{}").unwrap(), Options::default());
    }

    #[test]
    fn test_json_keys() {
        let options = Options::from_json(
            r#"{
                "questionDuration": 20,
                "safePosition": 2,
                "phoneAccuracy": 0.5,
                "audienceBaseFloor": 3,
                "audienceCorrectBonusRange": [40, 60]
            }"#,
        )
        .unwrap();

        assert_eq!(options.question_duration(), Duration::from_secs(20));
        assert_eq!(options.safe_position(), 2);
        assert!((options.phone_accuracy() - 0.5).abs() < f64::EPSILON);
        assert_eq!(options.audience_base_floor(), 3);
        assert_eq!(options.audience_bonus(), 40..=60);
    }

    #[test]
    fn test_question_duration_bounds() {
        let too_short = Options::default()
            .with_question_duration(Duration::from_secs(MIN_QUESTION_DURATION - 1));
        assert!(matches!(too_short.check(), Err(Error::Invalid(_))));

        let too_long = Options::default()
            .with_question_duration(Duration::from_secs(MAX_QUESTION_DURATION + 1));
        assert!(matches!(too_long.check(), Err(Error::Invalid(_))));

        let edge = Options::default()
            .with_question_duration(Duration::from_secs(MIN_QUESTION_DURATION));
        assert!(edge.check().is_ok());
    }

    #[test]
    fn test_phone_accuracy_bounds() {
        let options = Options::default().with_phone_accuracy(1.5);
        assert!(matches!(options.check(), Err(Error::Invalid(_))));
    }

    #[test]
    fn test_bonus_range_order() {
        let options = Options::default().with_audience(5, 70..=50);
        assert!(matches!(options.check(), Err(Error::Invalid(_))));
    }

    #[test]
    fn test_audience_overflow() {
        let options = Options::default().with_audience(10, 50..=70);
        assert!(matches!(
            options.check(),
            Err(Error::AudienceOverflow {
                floor: 10,
                bonus: 70
            })
        ));

        let fits = Options::default().with_audience(7, 50..=72);
        assert!(fits.check().is_ok());
    }

    #[test]
    fn test_safe_position_against_bank() {
        let bank = QuestionBank::default();

        assert!(Options::default().check_against(&bank).is_ok());
        assert!(matches!(
            Options::default()
                .with_safe_position(10)
                .check_against(&bank),
            Err(Error::SafePosition {
                safe_position: 10,
                questions: 10
            })
        ));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Options::from_json("{\"safePosition\": \"four\"}"),
            Err(Error::Json(_))
        ));
    }
}
