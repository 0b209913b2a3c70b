//! Questions and the prize ladder
//!
//! A [`QuestionBank`] is the immutable content of a game: an ordered list
//! of four-choice questions and a prize ladder aligned with it by position.
//! Banks are either the built-in reference set or loaded from JSON, and are
//! validated before a game is allowed to use them.

mod reference;

use garde::Validate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::bank::{CHOICE_COUNT, MAX_CHOICE_INDEX, ZERO_PRIZE};

/// Errors raised while building or reading a question bank
#[derive(Error, Debug)]
pub enum Error {
    /// A position beyond the end of the bank was requested
    #[error("question position {position} is out of range for a bank of {size}")]
    OutOfRange {
        /// The requested position
        position: usize,
        /// Number of questions in the bank
        size: usize,
    },
    /// The ladder does not have one prize per question
    #[error("ladder has {prizes} prizes but the bank has {questions} questions")]
    LadderMismatch {
        /// Number of questions
        questions: usize,
        /// Number of prizes
        prizes: usize,
    },
    /// The correct-choice index does not name one of the four choices
    #[error("correct choice {0} is not one of the four choices")]
    InvalidAnswer(usize),
    /// A field failed validation
    #[error("invalid question bank: {0}")]
    Invalid(#[from] garde::Report),
    /// The bank could not be parsed
    #[error("malformed question bank: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single four-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Question {
    /// The question as shown to the player
    #[garde(length(min = 1, max = crate::constants::bank::MAX_QUESTION_LENGTH))]
    text: String,
    /// The answer choices, labelled A to D in order
    #[garde(inner(length(min = 1, max = crate::constants::bank::MAX_CHOICE_LENGTH)))]
    choices: [String; CHOICE_COUNT],
    /// Index of the correct choice
    #[garde(range(max = crate::constants::bank::MAX_CHOICE_INDEX))]
    correct: usize,
}

impl Question {
    /// Creates a question, rejecting a correct index outside the choices
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidAnswer`] if `correct` is not in `0..4`.
    pub fn new(
        text: impl Into<String>,
        choices: [String; CHOICE_COUNT],
        correct: usize,
    ) -> Result<Self, Error> {
        if correct > MAX_CHOICE_INDEX {
            return Err(Error::InvalidAnswer(correct));
        }

        Ok(Self {
            text: text.into(),
            choices,
            correct,
        })
    }

    /// The question text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The four answer choices
    pub fn choices(&self) -> &[String; CHOICE_COUNT] {
        &self.choices
    }

    /// Index of the correct choice
    pub fn correct_index(&self) -> usize {
        self.correct
    }

    /// Whether `choice` is the correct answer
    pub fn is_correct(&self, choice: usize) -> bool {
        self.correct == choice
    }

    /// Indices of the incorrect choices, in ascending order
    pub fn incorrect_indices(&self) -> Vec<usize> {
        (0..CHOICE_COUNT).filter(|i| *i != self.correct).collect_vec()
    }
}

/// A prize label on the ladder, such as `$2,500`
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Validate,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[garde(transparent)]
pub struct Prize(#[garde(length(min = 1, max = crate::constants::bank::MAX_PRIZE_LENGTH))] String);

impl Prize {
    /// The prize of a player who leaves with nothing
    pub fn zero() -> Self {
        Self(ZERO_PRIZE.to_owned())
    }

    /// The label as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Prize {
    fn from(label: &str) -> Self {
        Self(label.to_owned())
    }
}

/// The ordered questions of a game together with their prize ladder
///
/// The ladder holds exactly one prize per question; position `i` on the
/// ladder is what the player has banked after answering question `i`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuestionBank {
    /// Questions in the order they are asked
    #[garde(length(min = 1, max = crate::constants::bank::MAX_QUESTION_COUNT), dive)]
    questions: Vec<Question>,
    /// Prizes aligned with `questions` by position
    #[garde(dive)]
    ladder: Vec<Prize>,
}

impl Default for QuestionBank {
    /// The built-in ten question reference bank
    fn default() -> Self {
        reference::bank()
    }
}

impl QuestionBank {
    /// Builds a bank from questions and their prizes
    ///
    /// # Errors
    ///
    /// Returns [`Error::LadderMismatch`] when the ladder length differs from
    /// the number of questions, and [`Error::Invalid`] when any field fails
    /// validation (including an empty bank).
    pub fn new(questions: Vec<Question>, ladder: Vec<Prize>) -> Result<Self, Error> {
        let bank = Self { questions, ladder };
        bank.check()?;
        Ok(bank)
    }

    /// Parses and validates a bank from its JSON form
    ///
    /// The expected shape is
    /// `{"questions": [{"text": .., "choices": [..4], "correct": n}], "ladder": [..]}`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] for malformed input and the same errors as
    /// [`QuestionBank::new`] for well-formed but invalid content.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let bank: Self = serde_json::from_str(json)?;
        bank.check()?;
        Ok(bank)
    }

    fn check(&self) -> Result<(), Error> {
        self.validate()?;

        if self.ladder.len() == self.questions.len() {
            Ok(())
        } else {
            Err(Error::LadderMismatch {
                questions: self.questions.len(),
                prizes: self.ladder.len(),
            })
        }
    }

    /// Returns the question at a 0-indexed position
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `position >= self.len()`.
    pub fn get(&self, position: usize) -> Result<&Question, Error> {
        self.questions.get(position).ok_or(Error::OutOfRange {
            position,
            size: self.len(),
        })
    }

    /// Returns the prize banked by answering the question at `position`
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] if `position >= self.len()`.
    pub fn prize(&self, position: usize) -> Result<&Prize, Error> {
        self.ladder.get(position).ok_or(Error::OutOfRange {
            position,
            size: self.len(),
        })
    }

    /// The prize for answering every question
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] only for an empty bank, which
    /// validation does not allow.
    pub fn top_prize(&self) -> Result<&Prize, Error> {
        self.prize(self.len().saturating_sub(1))
    }

    /// The whole prize ladder, lowest first
    pub fn prizes(&self) -> &[Prize] {
        &self.ladder
    }

    /// Number of questions
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Whether the bank has no questions
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn choices(labels: [&str; CHOICE_COUNT]) -> [String; CHOICE_COUNT] {
        labels.map(str::to_owned)
    }

    fn small_bank() -> QuestionBank {
        QuestionBank::new(
            vec![
                Question::new("One?", choices(["a", "b", "c", "d"]), 0).unwrap(),
                Question::new("Two?", choices(["a", "b", "c", "d"]), 3).unwrap(),
            ],
            vec!["$1".into(), "$2".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_reference_bank_shape() {
        let bank = QuestionBank::default();

        assert_eq!(bank.len(), 10);
        assert!(!bank.is_empty());
        assert_eq!(bank.prizes().len(), 10);
        assert_eq!(bank.prize(0).unwrap().as_str(), "$100");
        assert_eq!(bank.prize(4).unwrap().as_str(), "$2,500");
        assert_eq!(bank.top_prize().unwrap().as_str(), "$100,000");
        assert!(bank.validate().is_ok());
    }

    #[test]
    fn test_reference_bank_answers() {
        let bank = QuestionBank::default();

        let first = bank.get(0).unwrap();
        assert_eq!(first.text(), "What is the capital of Turkey?");
        assert_eq!(first.correct_index(), 1);
        assert_eq!(first.choices()[1], "Ankara");
    }

    #[test]
    fn test_get_out_of_range() {
        let bank = small_bank();

        assert!(bank.get(1).is_ok());
        assert!(matches!(
            bank.get(2),
            Err(Error::OutOfRange {
                position: 2,
                size: 2
            })
        ));
        assert!(matches!(bank.prize(7), Err(Error::OutOfRange { .. })));
    }

    #[test]
    fn test_question_rejects_bad_correct_index() {
        let result = Question::new("Q?", choices(["a", "b", "c", "d"]), 4);
        assert!(matches!(result, Err(Error::InvalidAnswer(4))));
    }

    #[test]
    fn test_incorrect_indices() {
        let question = Question::new("Q?", choices(["a", "b", "c", "d"]), 2).unwrap();

        assert_eq!(question.incorrect_indices(), vec![0, 1, 3]);
        assert!(question.is_correct(2));
        assert!(!question.is_correct(0));
    }

    #[test]
    fn test_ladder_mismatch() {
        let result = QuestionBank::new(
            vec![Question::new("Q?", choices(["a", "b", "c", "d"]), 0).unwrap()],
            vec!["$1".into(), "$2".into()],
        );

        assert!(matches!(
            result,
            Err(Error::LadderMismatch {
                questions: 1,
                prizes: 2
            })
        ));
    }

    #[test]
    fn test_empty_bank_is_invalid() {
        let result = QuestionBank::new(vec![], vec![]);
        assert!(matches!(result, Err(Error::Invalid(_))));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "questions": [
                {"text": "Largest planet?", "choices": ["Earth", "Mars", "Jupiter", "Venus"], "correct": 2}
            ],
            "ladder": ["$500"]
        }"#;

        let bank = QuestionBank::from_json(json).unwrap();
        assert_eq!(bank.len(), 1);
        assert!(bank.get(0).unwrap().is_correct(2));
        assert_eq!(bank.top_prize().unwrap(), &Prize::from("$500"));
    }

    #[test]
    fn test_from_json_rejects_out_of_range_answer() {
        let json = r#"{
            "questions": [
                {"text": "Q?", "choices": ["a", "b", "c", "d"], "correct": 9}
            ],
            "ladder": ["$500"]
        }"#;

        assert!(matches!(
            QuestionBank::from_json(json),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_from_json_rejects_empty_choice() {
        let json = r#"{
            "questions": [
                {"text": "Q?", "choices": ["a", "", "c", "d"], "correct": 0}
            ],
            "ladder": ["$500"]
        }"#;

        assert!(matches!(
            QuestionBank::from_json(json),
            Err(Error::Invalid(_))
        ));
    }

    #[test]
    fn test_from_json_malformed() {
        assert!(matches!(
            QuestionBank::from_json("{\"questions\": 3}"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_prize_display() {
        assert_eq!(Prize::zero().to_string(), "$0");
        assert_eq!(Prize::from("$5,000").to_string(), "$5,000");
    }
}
