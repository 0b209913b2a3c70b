//! The built-in question set and prize ladder

use itertools::Itertools;

use super::{Prize, Question, QuestionBank};

const QUESTIONS: [(&str, [&str; 4], usize); 10] = [
    (
        "What is the capital of Turkey?",
        ["Istanbul", "Ankara", "Izmir", "Bursa"],
        1,
    ),
    (
        "What does HTML stand for?",
        [
            "HyperText Markup Language",
            "HighText Machine Language",
            "HyperTools Makeup Language",
            "Home Tool Markup Line",
        ],
        0,
    ),
    (
        "What is JavaScript mainly used for?",
        [
            "Server management",
            "Web page interactivity",
            "Database storage",
            "Visual design",
        ],
        1,
    ),
    (
        "Which continent is Istanbul in?",
        ["Europe only", "Asia only", "Europe and Asia", "Africa"],
        2,
    ),
    (
        "Which is the largest ocean in the world?",
        ["Indian Ocean", "Atlantic Ocean", "Pacific Ocean", "Arctic Ocean"],
        2,
    ),
    (
        "Approximate speed of light?",
        ["300,000 km/s", "3,000 km/s", "30,000 km/s", "300 km/s"],
        0,
    ),
    (
        "Largest planet in the Solar System?",
        ["Earth", "Mars", "Jupiter", "Venus"],
        2,
    ),
    ("Approximate value of Pi?", ["3.14", "2.71", "1.62", "4.13"], 0),
    (
        "Charge of an electron?",
        ["Positive", "Negative", "Neutral", "Unstable"],
        1,
    ),
    (
        "What does 'debug' mean in programming?",
        [
            "Write new code",
            "Fix errors",
            "Speed up program",
            "Compress code",
        ],
        1,
    ),
];

const LADDER: [&str; 10] = [
    "$100", "$200", "$300", "$500", "$2,500", "$5,000", "$10,000", "$25,000", "$50,000",
    "$100,000",
];

pub(super) fn bank() -> QuestionBank {
    QuestionBank {
        questions: QUESTIONS
            .iter()
            .map(|(text, choices, correct)| Question {
                text: (*text).to_owned(),
                choices: choices.map(str::to_owned),
                correct: *correct,
            })
            .collect_vec(),
        ladder: LADDER.iter().map(|p| Prize::from(*p)).collect_vec(),
    }
}
