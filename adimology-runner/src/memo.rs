//! Memoized power calculations keyed by the six input fields.
//!
//! A calculator front end recomputes on every keystroke; most of those
//! recomputations repeat an input it has already seen. The memo holds at
//! most `capacity` outcomes; when it is full the next miss starts over from
//! an empty map.

use std::collections::HashMap;

use adimology_core::{CalculationInput, CalculationResult, PowerEngine};

/// Bit patterns of the sanitized input fields, with `-0.0` folded into `0.0`.
type InputKey = [u64; 6];

fn input_key(input: &CalculationInput) -> InputKey {
    input
        .sanitized()
        .as_array()
        .map(|v| if v == 0.0 { 0.0_f64.to_bits() } else { v.to_bits() })
}

/// Outcomes kept by [`PowerMemo::new`].
pub const DEFAULT_MEMO_CAPACITY: usize = 1024;

/// Cache of engine outcomes, including rejected (`None`) outcomes.
#[derive(Debug, Clone)]
pub struct PowerMemo {
    engine: PowerEngine,
    entries: HashMap<InputKey, Option<CalculationResult>>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for PowerMemo {
    fn default() -> Self {
        Self::new(PowerEngine::default())
    }
}

impl PowerMemo {
    pub fn new(engine: PowerEngine) -> Self {
        Self::with_capacity(engine, DEFAULT_MEMO_CAPACITY)
    }

    /// A memo holding at most `capacity` outcomes (minimum 1).
    pub fn with_capacity(engine: PowerEngine, capacity: usize) -> Self {
        Self {
            engine,
            entries: HashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Return the cached outcome for `input`, computing it on first sight.
    pub fn get_or_compute(&mut self, input: &CalculationInput) -> Option<CalculationResult> {
        let key = input_key(input);
        if let Some(cached) = self.entries.get(&key) {
            self.hits += 1;
            return cached.clone();
        }
        self.misses += 1;
        let outcome = self.engine.compute(input);
        if self.entries.len() >= self.capacity {
            tracing::debug!(capacity = self.capacity, "power memo full, clearing");
            self.entries.clear();
        }
        self.entries.insert(key, outcome.clone());
        outcome
    }

    pub fn engine(&self) -> PowerEngine {
        self.engine
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached outcome and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adimology_core::{compute_power, CrossingPolicy};

    fn sample_input() -> CalculationInput {
        CalculationInput::new(100_000.0, 1250.0, 191.0, 280.0, 205_792.0, 683_327.0)
    }

    #[test]
    fn repeated_input_hits_cache() {
        let mut memo = PowerMemo::default();
        let first = memo.get_or_compute(&sample_input());
        let second = memo.get_or_compute(&sample_input());
        assert_eq!(first, second);
        assert_eq!(first, compute_power(&sample_input()));
        assert_eq!(memo.misses(), 1);
        assert_eq!(memo.hits(), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn rejected_inputs_are_cached_too() {
        let mut memo = PowerMemo::default();
        let input = CalculationInput { buy_lot_volume: 0.0, ..sample_input() };
        assert!(memo.get_or_compute(&input).is_none());
        assert!(memo.get_or_compute(&input).is_none());
        assert_eq!(memo.hits(), 1);
    }

    #[test]
    fn nan_and_negative_zero_share_the_zero_key() {
        let mut memo = PowerMemo::default();
        let zero = CalculationInput { total_bid_volume: 0.0, ..sample_input() };
        let neg_zero = CalculationInput { total_bid_volume: -0.0, ..sample_input() };
        let nan = CalculationInput { total_bid_volume: f64::NAN, ..sample_input() };
        memo.get_or_compute(&zero);
        memo.get_or_compute(&neg_zero);
        memo.get_or_compute(&nan);
        assert_eq!(memo.len(), 1);
        assert_eq!(memo.hits(), 2);
    }

    #[test]
    fn never_grows_past_capacity() {
        let mut memo = PowerMemo::with_capacity(PowerEngine::default(), 3);
        for lot in 1..=10 {
            let input = CalculationInput {
                buy_lot_volume: f64::from(lot) * 1_000.0,
                ..sample_input()
            };
            memo.get_or_compute(&input);
            assert!(memo.len() <= memo.capacity());
        }
        assert_eq!(memo.misses(), 10);
        // The latest input survives the reset.
        let latest = CalculationInput { buy_lot_volume: 10_000.0, ..sample_input() };
        memo.get_or_compute(&latest);
        assert_eq!(memo.hits(), 1);
    }

    #[test]
    fn default_capacity_applies() {
        assert_eq!(PowerMemo::default().capacity(), DEFAULT_MEMO_CAPACITY);
        assert_eq!(PowerMemo::with_capacity(PowerEngine::default(), 0).capacity(), 1);
    }

    #[test]
    fn clear_resets() {
        let mut memo = PowerMemo::new(PowerEngine::new(CrossingPolicy::AllBands));
        memo.get_or_compute(&sample_input());
        memo.clear();
        assert!(memo.is_empty());
        assert_eq!(memo.misses(), 0);
        assert_eq!(memo.engine().crossing, CrossingPolicy::AllBands);
    }
}
