//! Configuration constants for the Millionaire game system
//!
//! This module contains the limits used when validating question banks
//! and game options, along with the fixed shape of a question.

/// Question bank constants
pub mod bank {
    /// Number of answer choices every question carries
    pub const CHOICE_COUNT: usize = 4;
    /// Largest valid correct-choice index
    pub const MAX_CHOICE_INDEX: usize = CHOICE_COUNT - 1;
    /// Maximum number of questions on a single ladder
    pub const MAX_QUESTION_COUNT: usize = 50;
    /// Maximum length of a question text in characters
    pub const MAX_QUESTION_LENGTH: usize = 200;
    /// Maximum length of an answer choice in characters
    pub const MAX_CHOICE_LENGTH: usize = 100;
    /// Maximum length of a prize label such as `$1,000,000`
    pub const MAX_PRIZE_LENGTH: usize = 32;
    /// Label used when the player leaves with nothing
    pub const ZERO_PRIZE: &str = "$0";
}

/// Countdown constants
pub mod timer {
    use std::time::Duration;

    /// Minimum time limit in seconds for answering a question
    pub const MIN_QUESTION_DURATION: u64 = 5;
    /// Maximum time limit in seconds for answering a question
    pub const MAX_QUESTION_DURATION: u64 = 240;
    /// Interval between countdown ticks
    pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
}

/// Lifeline constants
pub mod lifeline {
    /// Total of an audience poll, in percent
    pub const AUDIENCE_TOTAL: u8 = 100;
    /// Largest allowed per-choice floor for the audience poll
    pub const MAX_AUDIENCE_FLOOR: u8 = 25;
    /// Number of incorrect choices removed by 50:50
    pub const ELIMINATED_COUNT: usize = 2;
}
