//! Math quiz: random arithmetic rounds with plausible distractors.
//!
//! Gesture input uses Teachable Machine labels "1".."4", mapped to the four
//! option buttons in display order.

use crate::round::{self, Round};
use crate::session::{Feedback, RoundSession, ScoreEvent};
use crate::stats::GameStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl MathOp {
    pub fn symbol(self) -> &'static str {
        match self {
            MathOp::Add => "+",
            MathOp::Sub => "-",
            MathOp::Mul => "×",
            MathOp::Div => "÷",
        }
    }
}

const OPERAND_MAX: i64 = 12;
const OFFSET_SPAN: i64 = 4;
// Distractor search is bounded: a random pass, one widened random pass, then
// a deterministic fill. Never loops unboundedly.
const RANDOM_ATTEMPTS: u32 = 48;

#[derive(Debug)]
pub struct MathGame {
    pub session: RoundSession,
    pub stats: GameStats,
    rng_seed: u64,
}

impl MathGame {
    pub fn new() -> Self {
        Self::with_seed(0x5EED_0FA_11u64)
    }

    pub fn with_seed(seed: u64) -> Self {
        let mut rng_seed = seed;
        let round = Self::make_round(&mut rng_seed);
        Self {
            session: RoundSession::new("math", round),
            stats: GameStats::new(),
            rng_seed,
        }
    }

    /// Funnel for both clicks and accepted gestures.
    pub fn select(&mut self, choice: &str) -> Option<(Feedback, ScoreEvent)> {
        let scored = self.session.select(choice)?;
        self.stats.record_round(matches!(scored.0, Feedback::Correct));
        Some(scored)
    }

    pub fn select_index(&mut self, index: usize) -> Option<(Feedback, ScoreEvent)> {
        let choice = self.session.round().option_at(index)?.to_string();
        self.select(&choice)
    }

    /// Advance to a fresh round once the feedback delay has elapsed.
    pub fn update_timing(&mut self) {
        if self.session.update_timing() {
            self.next_round();
        }
    }

    pub fn next_round(&mut self) {
        let round = Self::make_round(&mut self.rng_seed);
        self.session.install_round(round);
    }

    fn make_round(seed: &mut u64) -> Round {
        let op = match round::lcg_next_u32(seed) % 4 {
            0 => MathOp::Add,
            1 => MathOp::Sub,
            2 => MathOp::Mul,
            _ => MathOp::Div,
        };

        let mut a = (round::lcg_next_u32(seed) as i64 % OPERAND_MAX) + 1;
        let mut b = (round::lcg_next_u32(seed) as i64 % OPERAND_MAX) + 1;

        match op {
            // Keep results non-negative.
            MathOp::Sub => {
                if b > a {
                    core::mem::swap(&mut a, &mut b);
                }
            }
            // Scale the dividend so the quotient is exact.
            MathOp::Div => a *= b,
            _ => {}
        }

        let correct = match op {
            MathOp::Add => a + b,
            MathOp::Sub => a - b,
            MathOp::Mul => a * b,
            MathOp::Div => a / b,
        };

        let mut options = Self::distractors(correct, seed);
        options.push(correct);
        round::shuffle(&mut options, seed);

        Round::new(
            format!("{a} {} {b} = ?", op.symbol()),
            options.iter().map(i64::to_string).collect(),
            correct.to_string(),
        )
    }

    /// Three distinct non-negative values near the answer. Offsets come from
    /// `[-span, span]` with 0 replaced by `span + 1`; if the random pass keeps
    /// colliding (small answers reject most negative offsets) the span widens
    /// once, and a deterministic fill guarantees termination.
    fn distractors(correct: i64, seed: &mut u64) -> Vec<i64> {
        let mut wrongs: Vec<i64> = Vec::with_capacity(3);
        let mut span = OFFSET_SPAN;
        let mut attempts = 0u32;

        while wrongs.len() < 3 && attempts < RANDOM_ATTEMPTS * 2 {
            if attempts == RANDOM_ATTEMPTS {
                span *= 2;
            }
            attempts += 1;

            let mut delta = (round::lcg_next_u32(seed) as i64 % (2 * span + 1)) - span;
            if delta == 0 {
                delta = span + 1;
            }
            let cand = correct + delta;
            if cand >= 0 && cand != correct && !wrongs.contains(&cand) {
                wrongs.push(cand);
            }
        }

        let mut k = span + 1;
        while wrongs.len() < 3 {
            let cand = correct + k;
            if !wrongs.contains(&cand) {
                wrongs.push(cand);
            }
            k += 1;
        }

        wrongs
    }
}

impl Default for MathGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Gesture labels "1".."4" select option indices 0..3. Anything else is not
/// a math gesture.
pub fn option_index_for_label(label: &str) -> Option<usize> {
    let n: usize = label.trim().parse().ok()?;
    if (1..=4).contains(&n) {
        Some(n - 1)
    } else {
        None
    }
}
