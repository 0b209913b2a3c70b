//! Lifelines and their hints
//!
//! Each lifeline is a pure function of the current question and a random
//! source. The once-per-game rule lives in [`LifelineUsage`], which the game
//! controller owns; nothing here touches game state.

use std::ops::RangeInclusive;

use enum_map::{Enum, EnumMap};
use serde::{Deserialize, Serialize};

use crate::{
    bank::Question,
    config::Options,
    constants::{
        bank::CHOICE_COUNT,
        lifeline::{AUDIENCE_TOTAL, ELIMINATED_COUNT},
    },
    random::RandomSource,
};

/// The three one-time assists
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Enum, derive_more::Display,
)]
pub enum Lifeline {
    /// Removes two incorrect choices
    #[display("50:50")]
    FiftyFifty,
    /// A friend suggests a choice, usually the right one
    #[display("Phone a Friend")]
    PhoneAFriend,
    /// The audience votes on every choice
    #[display("Ask the Audience")]
    AskAudience,
}

/// What a lifeline tells the player
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Hint {
    /// Choice indices removed by 50:50, ascending
    Eliminated([usize; ELIMINATED_COUNT]),
    /// The choice index a friend suggests
    Suggestion(usize),
    /// Percentage of the audience voting for each choice
    Poll([u8; CHOICE_COUNT]),
}

/// Which lifelines have been spent in the current game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifelineUsage(EnumMap<Lifeline, bool>);

impl LifelineUsage {
    /// Whether `lifeline` has already been used
    pub fn is_used(&self, lifeline: Lifeline) -> bool {
        self.0[lifeline]
    }

    /// Marks `lifeline` as used
    ///
    /// Returns `false` if it had already been used.
    pub fn mark_used(&mut self, lifeline: Lifeline) -> bool {
        !std::mem::replace(&mut self.0[lifeline], true)
    }

    /// Lifelines still available, in declaration order
    pub fn available(&self) -> Vec<Lifeline> {
        self.0
            .iter()
            .filter_map(|(lifeline, used)| (!used).then_some(lifeline))
            .collect()
    }
}

/// Picks two distinct incorrect choices to remove
pub fn fifty_fifty<R: RandomSource>(question: &Question, rng: &mut R) -> [usize; ELIMINATED_COUNT] {
    let mut wrong = question.incorrect_indices();
    rng.shuffle(&mut wrong);

    // a four-choice question always has three incorrect choices
    let mut eliminated = [wrong[0], wrong[1]];
    eliminated.sort_unstable();
    eliminated
}

/// Suggests a choice: the correct one with probability `accuracy`, otherwise
/// a uniformly chosen incorrect one
pub fn phone_a_friend<R: RandomSource>(question: &Question, accuracy: f64, rng: &mut R) -> usize {
    if rng.chance(accuracy) {
        question.correct_index()
    } else {
        let wrong = question.incorrect_indices();
        wrong[rng.below(wrong.len())]
    }
}

/// Polls the audience
///
/// Every choice starts at `floor` percent and the correct choice gets a bonus
/// drawn from `bonus`. What is left is split over the incorrect choices by
/// repeated integer division, so rounding remainders land on later choices.
/// The result always sums to 100 for options that pass
/// [`Options::check`].
pub fn ask_audience<R: RandomSource>(
    question: &Question,
    floor: u8,
    bonus: RangeInclusive<u8>,
    rng: &mut R,
) -> [u8; CHOICE_COUNT] {
    let mut poll = [floor; CHOICE_COUNT];
    let mut remaining = AUDIENCE_TOTAL.saturating_sub(floor.saturating_mul(CHOICE_COUNT as u8));

    let share = rng.between(bonus).min(remaining);
    poll[question.correct_index()] += share;
    remaining -= share;

    let wrong = question.incorrect_indices();
    for (assigned, choice) in wrong.iter().enumerate() {
        let share = remaining / (wrong.len() - assigned) as u8;
        poll[*choice] += share;
        remaining -= share;
    }

    poll
}

/// Runs a lifeline against a question
pub fn invoke<R: RandomSource>(
    lifeline: Lifeline,
    question: &Question,
    options: &Options,
    rng: &mut R,
) -> Hint {
    match lifeline {
        Lifeline::FiftyFifty => Hint::Eliminated(fifty_fifty(question, rng)),
        Lifeline::PhoneAFriend => {
            Hint::Suggestion(phone_a_friend(question, options.phone_accuracy(), rng))
        }
        Lifeline::AskAudience => Hint::Poll(ask_audience(
            question,
            options.audience_base_floor(),
            options.audience_bonus(),
            rng,
        )),
    }
}
