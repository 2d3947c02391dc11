//! Active game dispatch for the daemon.
//!
//! Game logic lives in `crates/shared/signplay_games`. This module keeps the
//! daemon-only glue: which variant is live, its gesture tuning, and how an
//! accepted gesture label resolves into a concrete selection.

use signplay_games::colors::ColorQuizGame;
use signplay_games::gesture::GestureConfig;
use signplay_games::letters::{self, LetterGame};
use signplay_games::math::{self, MathGame};
use signplay_games::round::Round;
use signplay_games::session::{Feedback, ScoreEvent};
use signplay_games::stats::GameStats;

#[derive(Debug)]
pub enum ActiveGame {
    Math(MathGame),
    Letters(LetterGame),
    Colors(ColorQuizGame),
}

impl ActiveGame {
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "math" => Some(ActiveGame::Math(MathGame::new())),
            "az" => Some(ActiveGame::Letters(LetterGame::new())),
            "color_quiz" => Some(ActiveGame::Colors(ColorQuizGame::new())),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ActiveGame::Math(_) => "math",
            ActiveGame::Letters(_) => "az",
            ActiveGame::Colors(_) => "color_quiz",
        }
    }

    pub fn gesture_config(&self) -> GestureConfig {
        match self {
            ActiveGame::Math(_) => GestureConfig::math(),
            ActiveGame::Letters(_) => GestureConfig::letters(),
            ActiveGame::Colors(_) => GestureConfig::colors(),
        }
    }

    pub fn round(&self) -> &Round {
        match self {
            ActiveGame::Math(g) => g.session.round(),
            ActiveGame::Letters(g) => g.session.round(),
            ActiveGame::Colors(g) => g.session.round(),
        }
    }

    pub fn response_made(&self) -> bool {
        match self {
            ActiveGame::Math(g) => g.session.response_made(),
            ActiveGame::Letters(g) => g.session.response_made(),
            ActiveGame::Colors(g) => g.session.response_made(),
        }
    }

    pub fn last_feedback(&self) -> Option<&Feedback> {
        match self {
            ActiveGame::Math(g) => g.session.last_feedback(),
            ActiveGame::Letters(g) => g.session.last_feedback(),
            ActiveGame::Colors(g) => g.session.last_feedback(),
        }
    }

    pub fn stats(&self) -> &GameStats {
        match self {
            ActiveGame::Math(g) => &g.stats,
            ActiveGame::Letters(g) => &g.stats,
            ActiveGame::Colors(g) => &g.stats,
        }
    }

    pub fn feedback_delay_ms(&self) -> u32 {
        match self {
            ActiveGame::Math(g) => g.session.feedback_delay_ms(),
            ActiveGame::Letters(g) => g.session.feedback_delay_ms(),
            ActiveGame::Colors(g) => g.session.feedback_delay_ms(),
        }
    }

    pub fn set_feedback_delay_ms(&mut self, ms: u32) {
        match self {
            ActiveGame::Math(g) => g.session.set_feedback_delay_ms(ms),
            ActiveGame::Letters(g) => g.session.set_feedback_delay_ms(ms),
            ActiveGame::Colors(g) => g.session.set_feedback_delay_ms(ms),
        }
    }

    /// Wall-clock round advance. Returns `true` when the color quiz advanced
    /// and a backend question may replace the builtin one it installed.
    pub fn update_timing(&mut self) -> bool {
        match self {
            ActiveGame::Math(g) => {
                g.update_timing();
                false
            }
            ActiveGame::Letters(g) => {
                g.update_timing();
                false
            }
            ActiveGame::Colors(g) => g.update_timing(),
        }
    }

    /// Resolve an accepted gesture label into the selection it stands for.
    /// `None` means the label is not meaningful for this game.
    pub fn resolve_label(&self, label: &str) -> Option<String> {
        match self {
            ActiveGame::Math(g) => {
                let index = math::option_index_for_label(label)?;
                g.session.round().option_at(index).map(str::to_string)
            }
            ActiveGame::Letters(_) => letters::normalize_label(label).map(|c| c.to_string()),
            ActiveGame::Colors(g) => g.option_for_letter(label),
        }
    }

    pub fn select(&mut self, choice: &str) -> Option<(Feedback, ScoreEvent)> {
        match self {
            ActiveGame::Math(g) => g.select(choice),
            ActiveGame::Letters(g) => g.select(choice),
            ActiveGame::Colors(g) => g.select(choice),
        }
    }

    pub fn select_index(&mut self, index: usize) -> Option<(Feedback, ScoreEvent)> {
        let choice = self.round().option_at(index)?.to_string();
        self.select(&choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips() {
        for kind in ["math", "az", "color_quiz"] {
            let g = ActiveGame::from_kind(kind).unwrap();
            assert_eq!(g.kind(), kind);
        }
        assert!(ActiveGame::from_kind("puzzle").is_none());
    }

    #[test]
    fn math_labels_resolve_by_display_position() {
        let g = ActiveGame::from_kind("math").unwrap();
        let options = g.round().options().to_vec();
        assert_eq!(g.resolve_label("1").as_deref(), Some(options[0].as_str()));
        assert_eq!(g.resolve_label("4").as_deref(), Some(options[3].as_str()));
        assert_eq!(g.resolve_label("5"), None);
        assert_eq!(g.resolve_label("B"), None);
    }

    #[test]
    fn letter_labels_resolve_directly() {
        let g = ActiveGame::from_kind("az").unwrap();
        assert_eq!(g.resolve_label("q").as_deref(), Some("Q"));
        assert_eq!(g.resolve_label("??"), None);
    }

    #[test]
    fn color_labels_resolve_by_initial() {
        let g = ActiveGame::from_kind("color_quiz").unwrap();
        let first = g.round().options()[0].clone();
        let initial = first.chars().next().unwrap().to_string();
        assert_eq!(g.resolve_label(&initial), Some(first));
    }

    #[test]
    fn gesture_config_tracks_the_game() {
        let math = ActiveGame::from_kind("math").unwrap();
        let letters = ActiveGame::from_kind("az").unwrap();
        assert_eq!(math.gesture_config().stability_required, 3);
        assert_eq!(letters.gesture_config().stability_required, 5);
        assert!(letters.gesture_config().cooldown.is_zero());
    }
}
