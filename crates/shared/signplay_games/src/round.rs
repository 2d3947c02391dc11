use serde::{Deserialize, Serialize};

/// One quiz round: a prompt, the answer options in display order, and the
/// correct answer (always one of the options).
///
/// Display order carries no meaning beyond UI layout. A round is immutable
/// once built; advancing a game replaces the whole round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    prompt: String,
    options: Vec<String>,
    correct: String,
}

impl Round {
    pub fn new(prompt: String, options: Vec<String>, correct: String) -> Self {
        Self {
            prompt,
            options,
            correct,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct(&self) -> &str {
        &self.correct
    }

    pub fn option_at(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    pub fn is_correct(&self, choice: &str) -> bool {
        choice == self.correct
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Seeded randomness: a small LCG so round generation is deterministic per
// seed and the crate carries no RNG dependency.
// ─────────────────────────────────────────────────────────────────────────

pub(crate) fn lcg_next_u32(seed: &mut u64) -> u32 {
    *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1);
    (*seed >> 11) as u32
}

/// Fisher–Yates shuffle driven by the LCG.
pub(crate) fn shuffle<T>(items: &mut [T], seed: &mut u64) {
    for i in (1..items.len()).rev() {
        let j = (lcg_next_u32(seed) as usize) % (i + 1);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shuffle_preserves_elements() {
        let mut seed = 42u64;
        let mut items = vec![1, 2, 3, 4, 5, 6, 7, 8];
        shuffle(&mut items, &mut seed);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let mut a = vec![1, 2, 3, 4];
        let mut b = vec![1, 2, 3, 4];
        let mut seed_a = 7u64;
        let mut seed_b = 7u64;
        shuffle(&mut a, &mut seed_a);
        shuffle(&mut b, &mut seed_b);
        assert_eq!(a, b);
    }

    #[test]
    fn round_lookup() {
        let r = Round::new(
            "3 + 4 = ?".to_string(),
            vec!["7".into(), "3".into(), "11".into(), "2".into()],
            "7".to_string(),
        );
        assert_eq!(r.option_at(0), Some("7"));
        assert_eq!(r.option_at(4), None);
        assert!(r.is_correct("7"));
        assert!(!r.is_correct("3"));
    }
}
