use serde::Serialize;

/// Per-game running score, shown in the UI alongside the round.
#[derive(Debug, Clone, Serialize)]
pub struct GameStats {
    pub correct: u32,
    pub incorrect: u32,
    pub rounds: u32,
    pub streak: u32,
    pub best_streak: u32,
    #[serde(skip)]
    recent: Vec<bool>,
}

const RECENT_WINDOW: usize = 20;

impl GameStats {
    pub fn new() -> Self {
        Self {
            correct: 0,
            incorrect: 0,
            rounds: 0,
            streak: 0,
            best_streak: 0,
            recent: Vec::with_capacity(RECENT_WINDOW),
        }
    }

    pub fn record_round(&mut self, is_correct: bool) {
        if is_correct {
            self.correct += 1;
            self.streak += 1;
            if self.streak > self.best_streak {
                self.best_streak = self.streak;
            }
        } else {
            self.incorrect += 1;
            self.streak = 0;
        }

        self.recent.push(is_correct);
        if self.recent.len() > RECENT_WINDOW {
            self.recent.remove(0);
        }

        self.rounds += 1;
    }

    pub fn accuracy(&self) -> f32 {
        let total = self.correct + self.incorrect;
        if total == 0 {
            0.0
        } else {
            self.correct as f32 / total as f32
        }
    }

    /// Accuracy over the last few rounds, so the UI can react to a hot or
    /// cold run instead of the lifetime average.
    pub fn recent_rate(&self) -> f32 {
        if self.recent.is_empty() {
            return 0.0;
        }
        let correct_count = self.recent.iter().filter(|&&x| x).count();
        correct_count as f32 / self.recent.len() as f32
    }
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}
