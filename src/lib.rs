//! # Millionaire
//!
//! This library provides the core logic for a single-player trivia game:
//! a ladder of ten multiple-choice questions, each with a countdown, three
//! one-time lifelines and the option to walk away with the prize banked so
//! far. Presentation lives behind the [`display::Display`] trait and time is
//! driven by alarms the host delivers back to the game, so the same
//! controller can run in a terminal, a browser or a test.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::doc_markdown)]

pub mod bank;
pub mod config;
pub mod constants;
pub mod display;
pub mod game;
pub mod lifeline;
pub mod random;
pub mod timer;

pub use bank::{Prize, Question, QuestionBank};
pub use config::Options;
pub use display::Display;
pub use game::{Game, IncomingMessage, Phase};
pub use lifeline::{Hint, Lifeline};
pub use timer::AlarmMessage;
