//! Gesture acceptance: turn a noisy stream of classifier predictions into a
//! single debounced selection.
//!
//! The filter is cadence-agnostic: the caller polls its classifier on its own
//! schedule and hands each top prediction to [`StabilityFilter::on_prediction`].
//! A label is accepted once it has been seen at (or above) the confidence
//! threshold for enough consecutive polls; after an acceptance the filter
//! ignores predictions for the configured cooldown.

use crate::time::{Duration, Instant};

/// One classifier output, as delivered by the external model front-end.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Per-game tuning. The three games were tuned independently, so each carries
/// its own preset rather than sharing one set of constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureConfig {
    /// Minimum confidence for a prediction to count toward stability.
    pub confidence_threshold: f32,
    /// Consecutive qualifying polls required before a label is accepted.
    pub stability_required: u32,
    /// Predictions are ignored for this long after an acceptance.
    pub cooldown: Duration,
    /// Suggested classifier poll cadence, advertised to the UI client.
    pub poll_interval: Duration,
}

impl GestureConfig {
    /// Math quiz: Teachable Machine hand counts "1".."4".
    pub fn math() -> Self {
        Self {
            confidence_threshold: 0.75,
            stability_required: 3,
            cooldown: Duration::from_millis(2000),
            poll_interval: Duration::from_millis(700),
        }
    }

    /// A→Z sign recognition: higher stability, no cooldown (the stability
    /// reset after each acceptance is what re-arms it).
    pub fn letters() -> Self {
        Self {
            confidence_threshold: 0.75,
            stability_required: 5,
            cooldown: Duration::ZERO,
            poll_interval: Duration::from_millis(200),
        }
    }

    /// Color quiz: stricter confidence, accepts on a single qualifying frame.
    pub fn colors() -> Self {
        Self {
            confidence_threshold: 0.85,
            stability_required: 1,
            cooldown: Duration::ZERO,
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Debounces a prediction stream into acceptance events.
///
/// Owned by the gesture session; created on gesture enable and dropped on
/// disable, so stale stability never leaks across sessions.
#[derive(Debug)]
pub struct StabilityFilter {
    config: GestureConfig,
    last_label: Option<String>,
    consecutive: u32,
    cooldown_until: Option<Instant>,
}

impl StabilityFilter {
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            last_label: None,
            consecutive: 0,
            cooldown_until: None,
        }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn in_cooldown(&self) -> bool {
        matches!(self.cooldown_until, Some(until) if Instant::now() < until)
    }

    /// Drop any accumulated stability and leave cooldown. Used on disable and
    /// when an accepted label turns out not to map to any game action.
    pub fn reset(&mut self) {
        self.last_label = None;
        self.consecutive = 0;
        self.cooldown_until = None;
    }

    /// Feed one prediction; returns the accepted label when stability is
    /// reached. Must be called from a single owner (the platform event loop
    /// serializes all callers).
    pub fn on_prediction(&mut self, pred: &Prediction) -> Option<String> {
        let now = Instant::now();

        if let Some(until) = self.cooldown_until {
            if now < until {
                return None;
            }
            // Cooldown expired: back to idle with a clean slate.
            self.cooldown_until = None;
            self.last_label = None;
            self.consecutive = 0;
        }

        if pred.confidence < self.config.confidence_threshold {
            // A single low-confidence frame decays the count instead of
            // resetting it, smoothing one-frame dropouts.
            self.consecutive = self.consecutive.saturating_sub(1);
            return None;
        }

        match &self.last_label {
            Some(label) if *label == pred.label => self.consecutive += 1,
            _ => {
                self.last_label = Some(pred.label.clone());
                self.consecutive = 1;
            }
        }

        if self.consecutive >= self.config.stability_required.max(1) {
            self.last_label = None;
            self.consecutive = 0;
            if !self.config.cooldown.is_zero() {
                self.cooldown_until = Some(now + self.config.cooldown);
            }
            return Some(pred.label.clone());
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(threshold: f32, stability: u32, cooldown_ms: u64) -> GestureConfig {
        GestureConfig {
            confidence_threshold: threshold,
            stability_required: stability,
            cooldown: Duration::from_millis(cooldown_ms),
            poll_interval: Duration::from_millis(200),
        }
    }

    #[test]
    fn accepts_exactly_once_at_stability_count() {
        let mut f = StabilityFilter::new(config(0.75, 5, 0));
        let p = Prediction::new("A", 0.9);
        for _ in 0..4 {
            assert_eq!(f.on_prediction(&p), None);
        }
        assert_eq!(f.on_prediction(&p), Some("A".to_string()));
        // Re-arming needs the full count again.
        for _ in 0..4 {
            assert_eq!(f.on_prediction(&p), None);
        }
        assert_eq!(f.on_prediction(&p), Some("A".to_string()));
    }

    #[test]
    fn below_threshold_never_accepts() {
        let mut f = StabilityFilter::new(config(0.75, 3, 0));
        let p = Prediction::new("A", 0.74);
        for _ in 0..50 {
            assert_eq!(f.on_prediction(&p), None);
        }
        assert_eq!(f.consecutive(), 0);
    }

    #[test]
    fn label_change_restarts_count() {
        let mut f = StabilityFilter::new(config(0.75, 3, 0));
        assert_eq!(f.on_prediction(&Prediction::new("A", 0.9)), None);
        assert_eq!(f.on_prediction(&Prediction::new("A", 0.9)), None);
        assert_eq!(f.on_prediction(&Prediction::new("B", 0.9)), None);
        assert_eq!(f.consecutive(), 1);
        assert_eq!(f.on_prediction(&Prediction::new("B", 0.9)), None);
        assert_eq!(
            f.on_prediction(&Prediction::new("B", 0.9)),
            Some("B".to_string())
        );
    }

    #[test]
    fn low_confidence_decays_instead_of_resetting() {
        // 0.9, 0.5, 0.9, 0.9, 0.9 at stability 5: the dropout costs one count,
        // so acceptance needs extra qualifying samples past the fifth.
        let mut f = StabilityFilter::new(config(0.75, 5, 0));
        let good = Prediction::new("A", 0.9);
        let weak = Prediction::new("A", 0.5);

        assert_eq!(f.on_prediction(&good), None);
        assert_eq!(f.on_prediction(&weak), None);
        assert_eq!(f.consecutive(), 0);
        assert_eq!(f.on_prediction(&good), None);
        assert_eq!(f.on_prediction(&good), None);
        assert_eq!(f.on_prediction(&good), None);
        assert_eq!(f.consecutive(), 3);

        assert_eq!(f.on_prediction(&good), None);
        assert_eq!(f.on_prediction(&good), Some("A".to_string()));
    }

    #[test]
    fn cooldown_blocks_further_acceptance() {
        let mut f = StabilityFilter::new(config(0.75, 2, 40));
        let p = Prediction::new("3", 0.95);
        assert_eq!(f.on_prediction(&p), None);
        assert_eq!(f.on_prediction(&p), Some("3".to_string()));
        assert!(f.in_cooldown());

        // Qualifying predictions keep arriving but nothing fires.
        for _ in 0..10 {
            assert_eq!(f.on_prediction(&p), None);
        }

        std::thread::sleep(Duration::from_millis(50));
        assert!(!f.in_cooldown());
        assert_eq!(f.on_prediction(&p), None);
        assert_eq!(f.on_prediction(&p), Some("3".to_string()));
    }

    #[test]
    fn reset_clears_everything() {
        let mut f = StabilityFilter::new(config(0.75, 3, 1000));
        let p = Prediction::new("2", 0.9);
        assert_eq!(f.on_prediction(&p), None);
        assert_eq!(f.on_prediction(&p), None);
        assert_eq!(f.on_prediction(&p), Some("2".to_string()));
        assert!(f.in_cooldown());

        f.reset();
        assert!(!f.in_cooldown());
        assert_eq!(f.consecutive(), 0);
    }
}
