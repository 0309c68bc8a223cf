//! Diminishing returns on repeated combos.

use rustc_hash::FxHashMap;

use super::detect::ComboKind;

/// Counts how often each combo kind has paid out for one side.
///
/// The factor for a kind used `n` times before is `max(floor, rate^n)`.
///
/// ```
/// use ether_battle::combo::{ComboKind, DeflationTracker};
///
/// let mut tracker = DeflationTracker::new(0.5, 0.2);
/// assert_eq!(tracker.record(ComboKind::Pair), 1.0);
/// assert_eq!(tracker.record(ComboKind::Pair), 0.5);
/// assert_eq!(tracker.record(ComboKind::Pair), 0.25);
/// assert_eq!(tracker.record(ComboKind::Pair), 0.2);
/// assert_eq!(tracker.factor(ComboKind::Flush), 1.0);
/// ```
#[derive(Clone, Debug)]
pub struct DeflationTracker {
    rate: f64,
    floor: f64,
    uses: FxHashMap<ComboKind, u32>,
}

impl DeflationTracker {
    #[must_use]
    pub fn new(rate: f64, floor: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            floor: floor.clamp(0.0, 1.0),
            uses: FxHashMap::default(),
        }
    }

    #[must_use]
    pub fn uses(&self, kind: ComboKind) -> u32 {
        self.uses.get(&kind).copied().unwrap_or(0)
    }

    /// Current factor for `kind`, without counting a use.
    #[must_use]
    pub fn factor(&self, kind: ComboKind) -> f64 {
        let uses = i32::try_from(self.uses(kind)).unwrap_or(i32::MAX);
        self.rate.powi(uses).max(self.floor)
    }

    /// Factor for this payout; counts the use.
    pub fn record(&mut self, kind: ComboKind) -> f64 {
        let factor = self.factor(kind);
        *self.uses.entry(kind).or_insert(0) += 1;
        factor
    }

    pub fn reset(&mut self) {
        self.uses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_independent() {
        let mut tracker = DeflationTracker::new(0.8, 0.2);
        tracker.record(ComboKind::Pair);
        tracker.record(ComboKind::Pair);

        assert_eq!(tracker.uses(ComboKind::Pair), 2);
        assert!((tracker.factor(ComboKind::Pair) - 0.64).abs() < 1e-12);
        assert_eq!(tracker.factor(ComboKind::Triple), 1.0);
    }

    #[test]
    fn test_floor_holds() {
        let mut tracker = DeflationTracker::new(0.8, 0.2);
        for _ in 0..50 {
            tracker.record(ComboKind::HighCard);
        }
        assert_eq!(tracker.factor(ComboKind::HighCard), 0.2);

        tracker.reset();
        assert_eq!(tracker.factor(ComboKind::HighCard), 1.0);
    }
}
