//! Terminal front-end for the millionaire game

use std::{
    io,
    path::PathBuf,
    sync::mpsc::{self, RecvTimeoutError},
    thread,
};

use clap::Parser;
use itertools::Itertools;
use millionaire::{
    Display, Game, Hint, IncomingMessage, Lifeline, Options, Prize, Question, QuestionBank,
    game::{Outcome, Rejection, Reveal, Summary},
    timer::Scheduler,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use web_time::Instant;

const LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

const HELP: &str = "commands: start, a-d, 50, phone, audience, next, walk, status, quit";

#[derive(Parser)]
#[command(name = "millionaire")]
#[command(about = "Climb a ladder of ten questions against the clock")]
#[command(version)]
struct Cli {
    /// JSON file with questions and a prize ladder
    #[arg(short, long)]
    questions: Option<PathBuf>,

    /// JSON file with game options
    #[arg(short, long)]
    options: Option<PathBuf>,

    /// Seed for lifeline randomness
    #[arg(short, long)]
    seed: Option<u64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// A line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Intent(IncomingMessage),
    Status,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "start" | "s" => Command::Intent(IncomingMessage::Start),
        "a" => Command::Intent(IncomingMessage::Answer(0)),
        "b" => Command::Intent(IncomingMessage::Answer(1)),
        "c" => Command::Intent(IncomingMessage::Answer(2)),
        "d" => Command::Intent(IncomingMessage::Answer(3)),
        "50" | "50:50" => Command::Intent(IncomingMessage::Lifeline(Lifeline::FiftyFifty)),
        "phone" => Command::Intent(IncomingMessage::Lifeline(Lifeline::PhoneAFriend)),
        "audience" => Command::Intent(IncomingMessage::Lifeline(Lifeline::AskAudience)),
        "next" | "n" => Command::Intent(IncomingMessage::Advance),
        "walk" | "w" => Command::Intent(IncomingMessage::WalkAway),
        "status" => Command::Status,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

fn label(choice: usize) -> char {
    LABELS.get(choice).copied().unwrap_or('?')
}

fn seconds(count: u64) -> String {
    pluralizer::pluralize("second", count as isize, true)
}

struct TerminalDisplay;

impl Display for TerminalDisplay {
    fn render_question(&self, question: &Question, position: usize, ladder: &[Prize]) {
        let prize = ladder.get(position).map_or("?", Prize::as_str);

        println!();
        println!("Question {} of {} for {prize}", position + 1, ladder.len());
        println!("{}", question.text());
        for (choice, text) in question.choices().iter().enumerate() {
            println!("  {}) {text}", label(choice));
        }
    }

    fn render_tick(&self, remaining: u64) {
        if remaining % 10 == 0 || remaining <= 5 {
            println!("{} left", seconds(remaining));
        }
    }

    fn render_lifeline_result(&self, lifeline: Lifeline, hint: &Hint) {
        match hint {
            Hint::Eliminated(removed) => {
                println!(
                    "{lifeline}: removed {}",
                    removed.iter().map(|c| label(*c)).join(" and ")
                );
            }
            Hint::Suggestion(choice) => {
                println!("{lifeline}: \"I think it's {}.\"", label(*choice));
            }
            Hint::Poll(votes) => {
                println!(
                    "{lifeline}: {}",
                    votes
                        .iter()
                        .enumerate()
                        .map(|(choice, percent)| format!("{} {percent}%", label(choice)))
                        .join(", ")
                );
            }
        }
    }

    fn render_answer(&self, reveal: &Reveal) {
        match reveal.selected {
            Some(selected) if selected == reveal.correct => {
                println!("{} is correct! Type next to continue.", label(selected));
            }
            Some(selected) => {
                println!(
                    "{} is wrong. The answer was {}.",
                    label(selected),
                    label(reveal.correct)
                );
            }
            None => println!("Time's up! The answer was {}.", label(reveal.correct)),
        }
    }

    fn render_rejection(&self, rejection: Rejection) {
        println!("{rejection}");
    }

    fn render_game_over(&self, summary: &Summary) {
        match summary.outcome {
            Outcome::Won => println!("Congratulations, you won {}!", summary.prize),
            Outcome::WalkedAway => println!("You walked away with {}.", summary.prize),
            Outcome::Wrong { .. } | Outcome::TimedOut => {
                println!("Game over. You take home {}.", summary.prize);
            }
        }
        println!("Type start to play again.");
    }
}

fn load(cli: &Cli) -> Result<(QuestionBank, Options), Box<dyn std::error::Error>> {
    let bank = match &cli.questions {
        Some(path) => QuestionBank::from_json(&std::fs::read_to_string(path)?)
            .inspect_err(|e| warn!(path = %path.display(), %e, "rejected question bank"))?,
        None => QuestionBank::default(),
    };

    let options = match &cli.options {
        Some(path) => Options::from_json(&std::fs::read_to_string(path)?)
            .inspect_err(|e| warn!(path = %path.display(), %e, "rejected options"))?,
        None => Options::default(),
    };

    Ok((bank, options))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "millionaire={log_level}"
        )))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let (bank, options) = load(&cli)?;
    let rng = cli
        .seed
        .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed);
    let mut game = Game::with_rng(bank, options, rng)
        .inspect_err(|e| warn!(%e, "rejected options for this bank"))?;

    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });

    let display = TerminalDisplay;
    let mut scheduler = Scheduler::default();

    println!(
        "{} questions, top prize {}. You have {} per question.",
        game.bank().len(),
        game.bank().top_prize()?,
        seconds(game.options().question_seconds())
    );
    println!("{HELP}");

    loop {
        let received = match scheduler.next_deadline() {
            Some(deadline) => {
                receiver.recv_timeout(deadline.saturating_duration_since(Instant::now()))
            }
            None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(line) => match parse_command(&line) {
                Some(Command::Intent(message)) => {
                    game.receive_message(
                        message,
                        |alarm, delay| scheduler.schedule(alarm, delay),
                        &display,
                    )?;
                }
                Some(Command::Status) => println!("{}", game.state_message()?.to_message()),
                Some(Command::Quit) => break,
                None if line.trim().is_empty() => {}
                None => println!("{HELP}"),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for alarm in scheduler.pop_due(Instant::now()) {
            game.receive_alarm(
                alarm,
                |alarm, delay| scheduler.schedule(alarm, delay),
                &display,
            )?;
        }
    }

    info!(phase = ?game.phase(), "leaving");

    Ok(())
}
