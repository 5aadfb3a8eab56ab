//! Time-decayed probabilistic loot generation
//!
//! Each tick the session asks the generator how many new lost objects to
//! spawn. The probability of spawning grows with the time elapsed since loot
//! was last generated, and the amount is bounded by the shortage of loot
//! relative to the number of looters, so the map never fills up faster than
//! dogs can clear it.

use std::time::Duration;

/// Decides how much loot appears on the map over time.
///
/// With `probability` p and base interval t, loot is generated within a time
/// span of t with probability p. The default random source always returns
/// 1.0, which makes generation deterministic; tests and callers that want
/// variance inject their own source via [`LootGenerator::with_random`].
pub struct LootGenerator {
    base_interval: Duration,
    probability: f64,
    time_without_loot: Duration,
    random: Box<dyn FnMut() -> f64 + Send>,
}

impl LootGenerator {
    pub fn new(base_interval: Duration, probability: f64) -> Self {
        Self::with_random(base_interval, probability, || 1.0)
    }

    pub fn with_random(
        base_interval: Duration,
        probability: f64,
        random: impl FnMut() -> f64 + Send + 'static,
    ) -> Self {
        Self {
            base_interval,
            probability,
            time_without_loot: Duration::ZERO,
            random: Box::new(random),
        }
    }

    /// Returns the number of loot objects to generate for this tick.
    ///
    /// `loot_count` is the number of lost objects currently on the map,
    /// `looter_count` the number of dogs hunting them. The internal timer
    /// resets whenever any loot is generated.
    pub fn generate(&mut self, time_delta: Duration, loot_count: u64, looter_count: u64) -> u64 {
        self.time_without_loot += time_delta;

        let loot_shortage = looter_count.saturating_sub(loot_count);
        let ratio = self.time_without_loot.as_secs_f64() / self.base_interval.as_secs_f64();
        let probability =
            ((1.0 - (1.0 - self.probability).powf(ratio)) * (self.random)()).clamp(0.0, 1.0);
        let generated = (loot_shortage as f64 * probability).round() as u64;

        if generated > 0 {
            self.time_without_loot = Duration::ZERO;
        }
        generated
    }
}
