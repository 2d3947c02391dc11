//! Round session: the single point of truth for "was the answer correct".
//!
//! Both click-driven and gesture-driven selections funnel through
//! [`RoundSession::select`], so the two input paths can never diverge on
//! scoring. Round advancement runs on the wall clock via `update_timing`
//! (the owning game regenerates or re-arms when the feedback delay elapses).

use crate::round::Round;
use crate::time::{Duration, Instant};
use serde::Serialize;

/// How long the correct/incorrect feedback stays on screen before the next
/// round replaces it.
pub const DEFAULT_FEEDBACK_DELAY_MS: u32 = 900;

/// Telemetry payload for one answered round. Built here, posted by the
/// daemon's reporter, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEvent {
    pub game: String,
    pub score: u8,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    /// Reveals the expected answer so the UI can show it.
    Incorrect { correct: String },
}

#[derive(Debug)]
pub struct RoundSession {
    game_id: &'static str,
    round: Round,
    response_made: bool,
    last_feedback: Option<Feedback>,
    answered_at: Option<Instant>,
    feedback_delay_ms: u32,
}

impl RoundSession {
    pub fn new(game_id: &'static str, round: Round) -> Self {
        Self {
            game_id,
            round,
            response_made: false,
            last_feedback: None,
            answered_at: None,
            feedback_delay_ms: DEFAULT_FEEDBACK_DELAY_MS,
        }
    }

    pub fn game_id(&self) -> &'static str {
        self.game_id
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    pub fn response_made(&self) -> bool {
        self.response_made
    }

    pub fn last_feedback(&self) -> Option<&Feedback> {
        self.last_feedback.as_ref()
    }

    pub fn feedback_delay_ms(&self) -> u32 {
        self.feedback_delay_ms
    }

    pub fn set_feedback_delay_ms(&mut self, ms: u32) {
        self.feedback_delay_ms = ms.clamp(0, 10_000);
    }

    /// Score exactly one selection per round.
    /// Returns `None` if this round was already answered, which closes the
    /// window where a rapid double-selection could score twice.
    pub fn select(&mut self, choice: &str) -> Option<(Feedback, ScoreEvent)> {
        if self.response_made {
            return None;
        }

        let is_correct = self.round.is_correct(choice);
        let feedback = if is_correct {
            Feedback::Correct
        } else {
            Feedback::Incorrect {
                correct: self.round.correct().to_string(),
            }
        };
        let event = ScoreEvent {
            game: self.game_id.to_string(),
            score: if is_correct { 1 } else { 0 },
            detail: if is_correct {
                format!("answered {choice}")
            } else {
                format!("answered {choice}, expected {}", self.round.correct())
            },
        };

        self.response_made = true;
        self.last_feedback = Some(feedback.clone());
        self.answered_at = Some(Instant::now());

        Some((feedback, event))
    }

    /// Select by display position (option buttons, math gesture labels).
    pub fn select_index(&mut self, index: usize) -> Option<(Feedback, ScoreEvent)> {
        let choice = self.round.option_at(index)?.to_string();
        self.select(&choice)
    }

    /// Wall-clock advance check. Returns `true` once the feedback delay has
    /// elapsed after an answer; the owning game should then install the next
    /// round (or re-arm the current one).
    pub fn update_timing(&self) -> bool {
        if !self.response_made {
            return false;
        }
        let Some(at) = self.answered_at else {
            return false;
        };
        let delay = Duration::from_millis(self.feedback_delay_ms as u64);
        Instant::now().duration_since(at) >= delay
    }

    /// Replace the round wholesale and re-open selection. The previous
    /// round's options and answer are gone before any further selection is
    /// accepted.
    pub fn install_round(&mut self, round: Round) {
        self.round = round;
        self.rearm();
    }

    /// Re-open selection on the current round (sign practice keeps the same
    /// target letter across attempts).
    pub fn rearm(&mut self) {
        self.response_made = false;
        self.last_feedback = None;
        self.answered_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::Round;

    fn sample_session() -> RoundSession {
        RoundSession::new(
            "math",
            Round::new(
                "3 + 4 = ?".to_string(),
                vec!["7".into(), "3".into(), "11".into(), "2".into()],
                "7".to_string(),
            ),
        )
    }

    #[test]
    fn correct_selection_scores_one() {
        let mut s = sample_session();
        let (feedback, event) = s.select("7").unwrap();
        assert_eq!(feedback, Feedback::Correct);
        assert_eq!(event.score, 1);
        assert_eq!(event.game, "math");
    }

    #[test]
    fn wrong_selection_scores_zero_and_reveals_answer() {
        let mut s = sample_session();
        let (feedback, event) = s.select("3").unwrap();
        assert_eq!(
            feedback,
            Feedback::Incorrect {
                correct: "7".to_string()
            }
        );
        assert_eq!(event.score, 0);
        assert!(event.detail.contains("expected 7"));
    }

    #[test]
    fn second_selection_is_ignored() {
        let mut s = sample_session();
        assert!(s.select("3").is_some());
        assert!(s.select("7").is_none());
        assert!(s.select_index(0).is_none());
    }

    #[test]
    fn select_index_maps_display_order() {
        let mut s = sample_session();
        let (feedback, _) = s.select_index(0).unwrap();
        assert_eq!(feedback, Feedback::Correct);
    }

    #[test]
    fn advances_after_feedback_delay() {
        let mut s = sample_session();
        s.set_feedback_delay_ms(0);
        assert!(!s.update_timing());

        s.select("7").unwrap();
        assert!(s.update_timing());

        s.install_round(Round::new(
            "2 + 2 = ?".to_string(),
            vec!["4".into(), "5".into(), "3".into(), "8".into()],
            "4".to_string(),
        ));
        assert!(!s.response_made());
        assert!(s.last_feedback().is_none());
        assert!(!s.update_timing());
        assert_eq!(s.round().prompt(), "2 + 2 = ?");
    }

    #[test]
    fn rearm_keeps_the_round() {
        let mut s = sample_session();
        s.select("3").unwrap();
        s.rearm();
        assert!(!s.response_made());
        assert_eq!(s.round().correct(), "7");
        // A fresh selection is accepted again.
        assert!(s.select("7").is_some());
    }
}
