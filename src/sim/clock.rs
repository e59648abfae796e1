//! Monotonic frame counter
//!
//! Every time-derived quantity (scroll, ambient phase, animation, spawn
//! cadence) is a function of this one counter.

use serde::{Deserialize, Serialize};

/// Wrapping tick counter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickCounter {
    ticks: u64,
}

impl TickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary value (replays, wraparound checks)
    pub fn starting_at(ticks: u64) -> Self {
        Self { ticks }
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.ticks
    }

    /// Advance by one. At `u64::MAX` the counter restarts at 0 before
    /// incrementing, so the value after wrapping is 1.
    pub fn advance(&mut self) -> u64 {
        if self.ticks == u64::MAX {
            self.ticks = 0;
        }
        self.ticks += 1;
        self.ticks
    }

    /// True on ticks that are a multiple of `period`
    #[inline]
    pub fn every(&self, period: u64) -> bool {
        period != 0 && self.ticks % period == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_counts_up() {
        let mut clock = TickCounter::new();
        assert_eq!(clock.advance(), 1);
        assert_eq!(clock.advance(), 2);
        assert_eq!(clock.get(), 2);
    }

    #[test]
    fn test_wraparound_skips_zero() {
        let mut clock = TickCounter::starting_at(u64::MAX);
        assert_eq!(clock.advance(), 1);
    }

    #[test]
    fn test_every() {
        let clock = TickCounter::starting_at(100);
        assert!(clock.every(50));
        assert!(clock.every(10));
        assert!(!clock.every(30));
        assert!(!clock.every(0));
        assert!(TickCounter::new().every(50));
    }
}
