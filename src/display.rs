//! Presentation boundary
//!
//! The game controller never draws anything itself. It pushes view updates
//! into a [`Display`], and the display turns player input into
//! [`IncomingMessage`](crate::game::IncomingMessage)s that are handed back to
//! the controller. A display only ever sees shared references to game data.

use crate::{
    bank::{Prize, Question},
    game::{Rejection, Reveal, Summary},
    lifeline::{Hint, Lifeline},
};

/// Receiver of view updates from a game
pub trait Display {
    /// Shows a new question
    ///
    /// # Arguments
    ///
    /// * `question` - The question to ask
    /// * `position` - 0-indexed ladder position of the question
    /// * `ladder` - The full prize ladder, lowest first
    fn render_question(&self, question: &Question, position: usize, ladder: &[Prize]);

    /// Shows the seconds left on the countdown
    fn render_tick(&self, remaining: u64);

    /// Shows the outcome of a lifeline
    fn render_lifeline_result(&self, lifeline: Lifeline, hint: &Hint);

    /// Reveals the correct choice (and the player's choice, if any)
    fn render_answer(&self, reveal: &Reveal);

    /// Explains why an intent was refused
    fn render_rejection(&self, rejection: Rejection);

    /// Shows the end of the game and the prize won
    fn render_game_over(&self, summary: &Summary);
}
