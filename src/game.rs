//! Core game logic and state management
//!
//! This module contains the game controller: the state machine that moves a
//! player up the ladder one question at a time, runs the countdown, applies
//! lifelines and decides what the player takes home. Intents from the
//! display and alarms from the countdown are delivered one at a time through
//! `&mut self`, so transitions never overlap.

use std::time::Duration;

use derive_where::derive_where;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    bank::{self, Prize, Question, QuestionBank},
    config::{self, Options},
    constants::bank::CHOICE_COUNT,
    display::Display,
    lifeline::{self, Hint, Lifeline, LifelineUsage},
    random::RandomSource,
    timer::{AlarmMessage, Countdown, TimerEvent},
};

/// Represents the current phase of the game
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No game has been started yet
    #[default]
    NotStarted,
    /// A question is on screen and the countdown is running
    QuestionActive,
    /// The last answer was correct; waiting for the player to advance
    AnswerRevealed,
    /// The game has ended
    GameOver,
}

/// Mutable progress of a single game
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Number of questions answered correctly, which is also the index of the
    /// question being asked
    position: usize,
    /// Input is refused while an answer is resolved and after the game ends
    locked: bool,
    /// Whether the game has ended
    completed: bool,
    /// Seconds left on the current question
    remaining_seconds: u64,
    /// Lifelines spent so far
    lifelines: LifelineUsage,
}

impl GameState {
    fn fresh(seconds: u64) -> Self {
        Self {
            remaining_seconds: seconds,
            ..Self::default()
        }
    }

    /// Number of questions answered correctly
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether input is currently refused
    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Whether the game has ended
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Seconds left on the current question
    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    /// Lifelines spent so far
    pub fn lifelines(&self) -> &LifelineUsage {
        &self.lifelines
    }
}

/// Intents sent by the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum IncomingMessage {
    /// Start a new game (or restart after one ended)
    Start,
    /// Lock in the choice with this index
    Answer(usize),
    /// Use a lifeline on the current question
    Lifeline(Lifeline),
    /// Move on to the next question after a correct answer
    Advance,
    /// End the game and keep the last prize won
    WalkAway,
}

/// The correct choice, revealed once an answer is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reveal {
    /// Index of the correct choice
    pub correct: usize,
    /// The player's choice, or `None` when time ran out
    pub selected: Option<usize>,
}

/// Why the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Every question was answered correctly
    Won,
    /// The player picked a wrong choice
    Wrong {
        /// The choice the player picked
        selected: usize,
    },
    /// The countdown reached zero
    TimedOut,
    /// The player walked away
    WalkedAway,
}

/// Final result of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// How the game ended
    pub outcome: Outcome,
    /// What the player takes home
    pub prize: Prize,
    /// Questions answered correctly
    pub position: usize,
}

/// Intents refused with an explanation for the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
pub enum Rejection {
    /// Walking away before answering anything
    #[display("You haven't won any money yet.")]
    PrematureWalkAway,
}

/// Sync messages describing the whole game as a view model
///
/// These are used to draw a display from scratch, for example when it is
/// first attached or asked for a status report.
#[derive(Debug, Serialize, Clone)]
pub enum SyncMessage {
    /// Nothing has been played yet
    NotStarted {
        /// Total number of questions
        count: usize,
        /// The prize ladder, lowest first
        ladder: Vec<Prize>,
    },
    /// A question is being asked
    Question {
        /// Index of the current question
        index: usize,
        /// Total number of questions
        count: usize,
        /// The question being asked
        question: Question,
        /// Seconds left to answer
        remaining: u64,
        /// Lifelines still available
        lifelines: Vec<Lifeline>,
        /// Prize already secured by walking away now
        banked: Prize,
    },
    /// A correct answer is on screen, waiting for the player to advance
    AnswerRevealed {
        /// Index of the next question
        index: usize,
        /// Total number of questions
        count: usize,
        /// Prize already secured by walking away
        banked: Prize,
    },
    /// The game has ended
    GameOver(Summary),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// The game controller
///
/// Owns the question bank, the options, the game state and the countdown.
/// Every transition checks and loads what it needs before it changes
/// anything, so a refused or failed intent leaves the game untouched.
#[derive_where(Debug)]
pub struct Game<R = fastrand::Rng> {
    /// Questions and prizes
    bank: QuestionBank,
    /// Tuning for timing, the safe position and lifelines
    options: Options,
    /// Progress of the current game
    state: GameState,
    /// Current phase of the state machine
    phase: Phase,
    /// Countdown for the question on screen
    countdown: Countdown,
    /// Result of the last finished game
    summary: Option<Summary>,
    /// Randomness for lifelines
    #[derive_where(skip)]
    rng: R,
}

impl Game {
    /// Creates a game seeded from system entropy
    ///
    /// # Errors
    ///
    /// Returns a [`config::Error`] if the options are invalid on their own or
    /// for this bank.
    pub fn new(bank: QuestionBank, options: Options) -> Result<Self, config::Error> {
        Self::with_rng(bank, options, fastrand::Rng::new())
    }
}

impl<R: RandomSource> Game<R> {
    /// Creates a game drawing lifeline outcomes from `rng`
    ///
    /// # Errors
    ///
    /// Returns a [`config::Error`] if the options are invalid on their own or
    /// for this bank.
    pub fn with_rng(bank: QuestionBank, options: Options, rng: R) -> Result<Self, config::Error> {
        options.check()?;
        options.check_against(&bank)?;

        Ok(Self {
            state: GameState::fresh(options.question_seconds()),
            bank,
            options,
            phase: Phase::NotStarted,
            countdown: Countdown::default(),
            summary: None,
            rng,
        })
    }

    /// Current phase of the state machine
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Progress of the current game
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Result of the last finished game
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    /// The questions and prizes being played
    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// The options the game was created with
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The question awaiting an answer, if any
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            Phase::QuestionActive => self.bank.get(self.state.position).ok(),
            _ => None,
        }
    }

    /// What walking away right now would pay: nothing before the first
    /// correct answer, otherwise the prize of the last question answered
    pub fn banked_prize(&self) -> Prize {
        self.state
            .position
            .checked_sub(1)
            .and_then(|last| self.bank.prize(last).ok())
            .cloned()
            .unwrap_or_else(Prize::zero)
    }

    /// The prize kept after a wrong answer or a timeout
    ///
    /// The safe position has to be passed, not merely reached, for its prize
    /// to be guaranteed.
    fn guaranteed_prize(&self) -> Result<Prize, bank::Error> {
        let safe_position = self.options.safe_position();

        if self.state.position > safe_position {
            Ok(self.bank.prize(safe_position)?.clone())
        } else {
            Ok(Prize::zero())
        }
    }

    fn accepting_input(&self) -> bool {
        self.phase == Phase::QuestionActive && !self.state.locked
    }

    /// Handles an intent from the display
    ///
    /// Intents that the current phase does not allow are ignored.
    ///
    /// # Arguments
    ///
    /// * `message` - The intent to process
    /// * `schedule` - Callback that delivers an alarm after a delay
    /// * `display` - Receiver of the resulting view updates
    ///
    /// # Errors
    ///
    /// Returns [`bank::Error::OutOfRange`] if the bank and ladder disagree
    /// with the game's position, which indicates a broken configuration.
    pub fn receive_message<D: Display, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        message: IncomingMessage,
        schedule: S,
        display: &D,
    ) -> Result<(), bank::Error> {
        match message {
            IncomingMessage::Start => self.start(schedule, display),
            IncomingMessage::Answer(choice) => self.submit_answer(choice, display),
            IncomingMessage::Lifeline(kind) => self.invoke_lifeline(kind, display).map(|_| ()),
            IncomingMessage::Advance => self.advance(schedule, display),
            IncomingMessage::WalkAway => self.walk_away(display),
        }
    }

    /// Handles an alarm scheduled by the countdown
    ///
    /// Alarms from a countdown that was cancelled or replaced are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`bank::Error::OutOfRange`] on a broken configuration.
    pub fn receive_alarm<D: Display, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        alarm: AlarmMessage,
        schedule: S,
        display: &D,
    ) -> Result<(), bank::Error> {
        match self.countdown.receive_alarm(alarm, schedule) {
            Some(TimerEvent::Tick(remaining)) => {
                self.state.remaining_seconds = remaining;
                display.render_tick(remaining);
                Ok(())
            }
            Some(TimerEvent::Expired) => {
                self.state.remaining_seconds = 0;
                display.render_tick(0);
                self.on_timeout(display)
            }
            None => {
                debug!(?alarm, "ignoring stale alarm");
                Ok(())
            }
        }
    }

    /// Starts a new game from the first question
    ///
    /// Allowed before the first game and after a game has ended. Resets the
    /// position and every lifeline.
    ///
    /// # Errors
    ///
    /// Returns [`bank::Error::OutOfRange`] on a broken configuration.
    pub fn start<D: Display, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        schedule: S,
        display: &D,
    ) -> Result<(), bank::Error> {
        if !matches!(self.phase, Phase::NotStarted | Phase::GameOver) {
            debug!(phase = ?self.phase, "ignoring start");
            return Ok(());
        }

        let question = self.bank.get(0)?;
        let seconds = self.options.question_seconds();

        self.state = GameState::fresh(seconds);
        self.summary = None;
        self.phase = Phase::QuestionActive;
        self.countdown.start(seconds, schedule);

        info!(questions = self.bank.len(), "game started");
        display.render_question(question, 0, self.bank.prizes());

        Ok(())
    }

    /// Locks in an answer for the current question
    ///
    /// A correct answer moves the player up the ladder (or wins the game on
    /// the last question); a wrong one ends the game with the guaranteed
    /// prize.
    ///
    /// # Errors
    ///
    /// Returns [`bank::Error::OutOfRange`] on a broken configuration.
    pub fn submit_answer<D: Display>(&mut self, choice: usize, display: &D) -> Result<(), bank::Error> {
        if !self.accepting_input() {
            debug!(phase = ?self.phase, choice, "ignoring answer");
            return Ok(());
        }
        if choice >= CHOICE_COUNT {
            debug!(choice, "ignoring answer outside the choices");
            return Ok(());
        }

        let question = self.bank.get(self.state.position)?;
        let reveal = Reveal {
            correct: question.correct_index(),
            selected: Some(choice),
        };

        if question.is_correct(choice) {
            let next = self.state.position + 1;

            if next == self.bank.len() {
                let prize = self.bank.top_prize()?.clone();
                self.lock();
                self.state.position = next;
                display.render_answer(&reveal);
                self.finish(Outcome::Won, prize, display);
            } else {
                self.lock();
                self.state.position = next;
                self.phase = Phase::AnswerRevealed;
                debug!(position = next, "correct answer");
                display.render_answer(&reveal);
            }
        } else {
            let prize = self.guaranteed_prize()?;
            self.lock();
            display.render_answer(&reveal);
            self.finish(Outcome::Wrong { selected: choice }, prize, display);
        }

        Ok(())
    }

    /// Ends the question because the countdown ran out
    ///
    /// Treated exactly like a wrong answer with no choice selected.
    fn on_timeout<D: Display>(&mut self, display: &D) -> Result<(), bank::Error> {
        if !self.accepting_input() {
            debug!(phase = ?self.phase, "ignoring timeout");
            return Ok(());
        }

        let correct = self.bank.get(self.state.position)?.correct_index();
        let prize = self.guaranteed_prize()?;

        self.lock();
        display.render_answer(&Reveal {
            correct,
            selected: None,
        });
        self.finish(Outcome::TimedOut, prize, display);

        Ok(())
    }

    /// Moves on to the next question after a correct answer
    ///
    /// # Errors
    ///
    /// Returns [`bank::Error::OutOfRange`] on a broken configuration.
    pub fn advance<D: Display, S: FnMut(AlarmMessage, Duration)>(
        &mut self,
        schedule: S,
        display: &D,
    ) -> Result<(), bank::Error> {
        if self.phase != Phase::AnswerRevealed {
            debug!(phase = ?self.phase, "ignoring advance");
            return Ok(());
        }

        let question = self.bank.get(self.state.position)?;
        let seconds = self.options.question_seconds();

        self.state.locked = false;
        self.state.remaining_seconds = seconds;
        self.phase = Phase::QuestionActive;
        self.countdown.start(seconds, schedule);

        display.render_question(question, self.state.position, self.bank.prizes());

        Ok(())
    }

    /// Ends the game, keeping the prize of the last question answered
    ///
    /// Refused with [`Rejection::PrematureWalkAway`] before the first
    /// correct answer.
    ///
    /// # Errors
    ///
    /// Returns [`bank::Error::OutOfRange`] on a broken configuration.
    pub fn walk_away<D: Display>(&mut self, display: &D) -> Result<(), bank::Error> {
        if !self.accepting_input() {
            debug!(phase = ?self.phase, "ignoring walk away");
            return Ok(());
        }

        let Some(last) = self.state.position.checked_sub(1) else {
            info!("walk away refused with nothing won");
            display.render_rejection(Rejection::PrematureWalkAway);
            return Ok(());
        };

        let prize = self.bank.prize(last)?.clone();
        self.finish(Outcome::WalkedAway, prize, display);

        Ok(())
    }

    /// Uses a lifeline on the current question
    ///
    /// Returns the hint, or `None` if the lifeline was already used or the
    /// game is not waiting for an answer. Position, lock and countdown are
    /// left alone.
    ///
    /// # Errors
    ///
    /// Returns [`bank::Error::OutOfRange`] on a broken configuration.
    pub fn invoke_lifeline<D: Display>(
        &mut self,
        kind: Lifeline,
        display: &D,
    ) -> Result<Option<Hint>, bank::Error> {
        if !self.accepting_input() || self.state.lifelines.is_used(kind) {
            debug!(phase = ?self.phase, %kind, "ignoring lifeline");
            return Ok(None);
        }

        let question = self.bank.get(self.state.position)?;
        let hint = lifeline::invoke(kind, question, &self.options, &mut self.rng);
        self.state.lifelines.mark_used(kind);

        debug!(%kind, ?hint, "lifeline used");
        display.render_lifeline_result(kind, &hint);

        Ok(Some(hint))
    }

    fn lock(&mut self) {
        self.state.locked = true;
        self.countdown.cancel();
    }

    fn finish<D: Display>(&mut self, outcome: Outcome, prize: Prize, display: &D) {
        self.lock();
        self.state.completed = true;
        self.phase = Phase::GameOver;

        let summary = Summary {
            outcome,
            prize,
            position: self.state.position,
        };

        info!(outcome = ?summary.outcome, prize = %summary.prize, "game over");
        display.render_game_over(&summary);
        self.summary = Some(summary);
    }

    /// Returns the view model of the whole game
    ///
    /// # Errors
    ///
    /// Returns [`bank::Error::OutOfRange`] on a broken configuration.
    pub fn state_message(&self) -> Result<SyncMessage, bank::Error> {
        let count = self.bank.len();

        Ok(match self.phase {
            Phase::NotStarted => SyncMessage::NotStarted {
                count,
                ladder: self.bank.prizes().to_vec(),
            },
            Phase::QuestionActive => SyncMessage::Question {
                index: self.state.position,
                count,
                question: self.bank.get(self.state.position)?.clone(),
                remaining: self.state.remaining_seconds,
                lifelines: self.state.lifelines.available(),
                banked: self.banked_prize(),
            },
            Phase::AnswerRevealed => SyncMessage::AnswerRevealed {
                index: self.state.position,
                count,
                banked: self.banked_prize(),
            },
            Phase::GameOver => match &self.summary {
                Some(summary) => SyncMessage::GameOver(summary.clone()),
                None => SyncMessage::NotStarted {
                    count,
                    ladder: self.bank.prizes().to_vec(),
                },
            },
        })
    }
}
