//! Color quiz.
//!
//! Questions come from the quiz-content backend when it is reachable, or from
//! the builtin table otherwise, so the game is always playable offline. Gesture
//! labels are single letters matched against option initials.

use crate::round::{self, Round};
use crate::session::{Feedback, RoundSession, ScoreEvent};
use crate::stats::GameStats;
use serde::{Deserialize, Serialize};

/// Wire shape of the quiz-content endpoint (`GET /color-quiz-next`).
/// Defaults keep partial payloads usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ColorQuestion {
    #[serde(default)]
    pub question: String,
    /// CSS color for the swatch shown next to the question.
    #[serde(default)]
    pub color_code: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_letter: String,
}

impl ColorQuestion {
    fn new(question: &str, color_code: &str, options: &[&str], correct_letter: &str) -> Self {
        Self {
            question: question.to_string(),
            color_code: color_code.to_string(),
            options: options.iter().map(|o| o.to_string()).collect(),
            correct_letter: correct_letter.to_string(),
        }
    }
}

/// Builtin question set, used when no backend is reachable.
pub fn builtin_questions() -> Vec<ColorQuestion> {
    vec![
        ColorQuestion::new(
            "Which color is the sky on a clear day?",
            "#1E90FF",
            &["Blue", "Green", "Red", "Yellow"],
            "B",
        ),
        ColorQuestion::new(
            "What color are bananas?",
            "#FFD700",
            &["Yellow", "Red", "Orange", "Pink"],
            "Y",
        ),
        ColorQuestion::new(
            "Which color is made by mixing red and blue?",
            "#800080",
            &["Purple", "Brown", "Green", "Grey"],
            "P",
        ),
        ColorQuestion::new(
            "What color is grass?",
            "#228B22",
            &["Green", "Blue", "Black", "Red"],
            "G",
        ),
        ColorQuestion::new(
            "What color is fire?",
            "#FF8C00",
            &["Orange", "Pink", "Blue", "White"],
            "O",
        ),
        ColorQuestion::new(
            "What color are strawberries?",
            "#FF0000",
            &["Red", "Blue", "Yellow", "Green"],
            "R",
        ),
        ColorQuestion::new(
            "What color is a lemon?",
            "#FFD700",
            &["Yellow", "Blue", "Brown", "Pink"],
            "Y",
        ),
        ColorQuestion::new(
            "What color is the ocean?",
            "#1E90FF",
            &["Blue", "Red", "Green", "Orange"],
            "B",
        ),
        ColorQuestion::new(
            "Which color is a ripe apple most often?",
            "#FF0000",
            &["Red", "Purple", "Black", "Yellow"],
            "R",
        ),
        ColorQuestion::new(
            "What color is snow?",
            "#FFFFFF",
            &["White", "Green", "Blue", "Brown"],
            "W",
        ),
    ]
}

#[derive(Debug)]
pub struct ColorQuizGame {
    pub session: RoundSession,
    pub stats: GameStats,
    questions: Vec<ColorQuestion>,
    current: ColorQuestion,
    rng_seed: u64,
}

impl ColorQuizGame {
    pub fn new() -> Self {
        Self::with_seed(0xC0_10_25u64)
    }

    pub fn with_seed(seed: u64) -> Self {
        let questions = builtin_questions();
        let mut rng_seed = seed;
        let idx = (round::lcg_next_u32(&mut rng_seed) as usize) % questions.len();
        let current = questions[idx].clone();
        let session = RoundSession::new("color_quiz", Self::round_for(&current));
        Self {
            session,
            stats: GameStats::new(),
            questions,
            current,
            rng_seed,
        }
    }

    fn round_for(q: &ColorQuestion) -> Round {
        // The correct option is resolved by its initial; fall back to the raw
        // letter if the payload's options don't carry it.
        let correct = first_option_with_initial(&q.options, &q.correct_letter)
            .unwrap_or_else(|| q.correct_letter.clone());
        Round::new(q.question.clone(), q.options.clone(), correct)
    }

    pub fn current(&self) -> &ColorQuestion {
        &self.current
    }

    /// Install a backend-supplied question, replacing the active round
    /// wholesale. Rejects unusable payloads (no options) so a flaky backend
    /// can never leave the game unplayable.
    pub fn load(&mut self, question: ColorQuestion) -> bool {
        if question.options.is_empty() {
            return false;
        }
        self.session.install_round(Self::round_for(&question));
        self.current = question;
        true
    }

    /// Advance to a random builtin question.
    pub fn next_question(&mut self) {
        let idx = (round::lcg_next_u32(&mut self.rng_seed) as usize) % self.questions.len();
        let q = self.questions[idx].clone();
        self.session.install_round(Self::round_for(&q));
        self.current = q;
    }

    /// Resolve a gesture letter to the option it selects, by initial.
    pub fn option_for_letter(&self, label: &str) -> Option<String> {
        let letter = label.trim().chars().next()?.to_ascii_uppercase();
        first_option_with_initial_char(self.session.round().options(), letter)
    }

    /// Funnel for both clicks and accepted gestures.
    pub fn select(&mut self, choice: &str) -> Option<(Feedback, ScoreEvent)> {
        let scored = self.session.select(choice)?;
        self.stats.record_round(matches!(scored.0, Feedback::Correct));
        Some(scored)
    }

    /// Advance once the feedback delay elapses. Returns `true` when a builtin
    /// question was installed, so the caller may swap in a backend question
    /// instead.
    pub fn update_timing(&mut self) -> bool {
        if self.session.update_timing() {
            self.next_question();
            true
        } else {
            false
        }
    }
}

impl Default for ColorQuizGame {
    fn default() -> Self {
        Self::new()
    }
}

fn first_option_with_initial(options: &[String], letter: &str) -> Option<String> {
    let c = letter.trim().chars().next()?.to_ascii_uppercase();
    first_option_with_initial_char(options, c)
}

fn first_option_with_initial_char(options: &[String], letter: char) -> Option<String> {
    options
        .iter()
        .find(|o| {
            o.chars()
                .next()
                .map(|c| c.to_ascii_uppercase() == letter)
                .unwrap_or(false)
        })
        .cloned()
}
