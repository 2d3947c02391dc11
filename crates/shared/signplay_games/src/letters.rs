//! A→Z sign recognition practice.
//!
//! The player (or a grown-up) picks the letter being practiced; a recognized
//! sign label is compared directly against it. The round does not advance on
//! its own; the same letter re-arms after each attempt until a new one is
//! chosen.

use crate::round::Round;
use crate::session::{Feedback, RoundSession, ScoreEvent};
use crate::stats::GameStats;

pub const ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Normalize a classifier label to a single A–Z letter. Anything else is
/// not a sign label and should be ignored by the caller.
pub fn normalize_label(label: &str) -> Option<char> {
    let trimmed = label.trim();
    let mut chars = trimmed.chars();
    let c = chars.next()?.to_ascii_uppercase();
    if chars.next().is_none() && c.is_ascii_uppercase() {
        Some(c)
    } else {
        None
    }
}

#[derive(Debug)]
pub struct LetterGame {
    pub session: RoundSession,
    pub stats: GameStats,
    expecting: char,
    teach_mode: bool,
}

impl LetterGame {
    pub fn new() -> Self {
        Self {
            session: RoundSession::new("az", Self::round_for('A')),
            stats: GameStats::new(),
            expecting: 'A',
            teach_mode: false,
        }
    }

    fn round_for(letter: char) -> Round {
        Round::new(
            format!("Show the sign for {letter}"),
            ALPHABET.chars().map(String::from).collect(),
            letter.to_string(),
        )
    }

    pub fn expecting(&self) -> char {
        self.expecting
    }

    /// Switch the practiced letter. Returns `false` (and changes nothing)
    /// for anything outside A–Z.
    pub fn set_expecting(&mut self, letter: char) -> bool {
        let letter = letter.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return false;
        }
        self.expecting = letter;
        self.session.install_round(Self::round_for(letter));
        true
    }

    pub fn teach_mode(&self) -> bool {
        self.teach_mode
    }

    pub fn set_teach_mode(&mut self, enabled: bool) {
        self.teach_mode = enabled;
    }

    /// Hint line shown when teach mode is on.
    pub fn hint(&self) -> Option<String> {
        self.teach_mode
            .then(|| format!("Repeat the {} sign for the child to copy.", self.expecting))
    }

    /// Funnel for both the letter grid and accepted sign labels.
    pub fn select(&mut self, choice: &str) -> Option<(Feedback, ScoreEvent)> {
        let letter = normalize_label(choice)?;
        let scored = self.session.select(&letter.to_string())?;
        self.stats.record_round(matches!(scored.0, Feedback::Correct));
        Some(scored)
    }

    /// Re-arm the same letter after the feedback delay.
    pub fn update_timing(&mut self) {
        if self.session.update_timing() {
            self.session.rearm();
        }
    }
}

impl Default for LetterGame {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{GestureConfig, Prediction, StabilityFilter};

    #[test]
    fn normalizes_labels() {
        assert_eq!(normalize_label("b"), Some('B'));
        assert_eq!(normalize_label(" Q "), Some('Q'));
        assert_eq!(normalize_label("?"), None);
        assert_eq!(normalize_label("AB"), None);
        assert_eq!(normalize_label(""), None);
    }

    #[test]
    fn recognized_letter_scores_against_expected() {
        let mut g = LetterGame::new();
        assert!(g.set_expecting('C'));
        let (feedback, event) = g.select("C").unwrap();
        assert_eq!(feedback, Feedback::Correct);
        assert_eq!(event.game, "az");
        assert_eq!(event.score, 1);
    }

    #[test]
    fn rejects_non_letters() {
        let mut g = LetterGame::new();
        assert!(!g.set_expecting('7'));
        assert_eq!(g.expecting(), 'A');
        assert!(g.select("!").is_none());
        assert_eq!(g.stats.rounds, 0);
    }

    #[test]
    fn same_letter_rearms_after_delay() {
        let mut g = LetterGame::new();
        g.session.set_feedback_delay_ms(0);
        g.select("A").unwrap();
        assert!(g.session.response_made());
        g.update_timing();
        assert!(!g.session.response_made());
        assert_eq!(g.expecting(), 'A');
    }

    #[test]
    fn stable_wrong_sign_yields_one_incorrect_feedback() {
        // Five consecutive confident "B" predictions while expecting "A":
        // exactly one incorrect feedback event, never a correct one.
        let mut g = LetterGame::new();
        let mut filter = StabilityFilter::new(GestureConfig::letters());

        let mut feedbacks = Vec::new();
        for _ in 0..5 {
            if let Some(label) = filter.on_prediction(&Prediction::new("B", 0.9)) {
                if let Some((feedback, _)) = g.select(&label) {
                    feedbacks.push(feedback);
                }
            }
        }

        assert_eq!(
            feedbacks,
            vec![Feedback::Incorrect {
                correct: "A".to_string()
            }]
        );
        assert_eq!(g.stats.incorrect, 1);
        assert_eq!(g.stats.correct, 0);
    }

    #[test]
    fn teach_mode_hint() {
        let mut g = LetterGame::new();
        assert_eq!(g.hint(), None);
        g.set_teach_mode(true);
        g.set_expecting('M');
        assert_eq!(
            g.hint().as_deref(),
            Some("Repeat the M sign for the child to copy.")
        );
    }
}
