//! Day/night cycle
//!
//! A slow oscillator between 0 (dusk) and 100 (night). The render side uses
//! the phase as the night layer's alpha; the core only keeps the counter.

use serde::{Deserialize, Serialize};

use crate::consts::{AMBIENT_PHASE_MAX, AMBIENT_STEP_TICKS};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientCycle {
    phase: i32,
    night: bool,
}

impl AmbientCycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase, 0..=100
    pub fn phase(&self) -> i32 {
        self.phase
    }

    pub fn is_night(&self) -> bool {
        self.night
    }

    /// Alpha for the night layer drawn over the dusk layer
    pub fn night_alpha(&self) -> f32 {
        self.phase as f32 / AMBIENT_PHASE_MAX as f32
    }

    /// Apply the tick that was just reached. The phase moves one step
    /// towards the opposite extreme every `AMBIENT_STEP_TICKS`; the night
    /// flag latches when an extreme is reached.
    pub fn advance(&mut self, tick: u64) {
        if tick % AMBIENT_STEP_TICKS == 0 {
            self.phase += if self.night { -1 } else { 1 };
        }

        if self.phase == 0 {
            self.night = false;
        } else if self.phase == AMBIENT_PHASE_MAX {
            self.night = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_only_on_cadence() {
        let mut cycle = AmbientCycle::new();
        for tick in 1..50 {
            cycle.advance(tick);
        }
        assert_eq!(cycle.phase(), 0);
        cycle.advance(50);
        assert_eq!(cycle.phase(), 1);
        assert!(!cycle.is_night());
    }

    #[test]
    fn test_full_oscillation() {
        let mut cycle = AmbientCycle::new();
        let mut tick = 0;
        let mut night_at = None;
        let mut day_at = None;
        while day_at.is_none() {
            tick += 1;
            let was_night = cycle.is_night();
            cycle.advance(tick);
            if !was_night && cycle.is_night() {
                assert_eq!(cycle.phase(), 100);
                night_at = Some(tick);
            }
            if was_night && !cycle.is_night() {
                assert_eq!(cycle.phase(), 0);
                day_at = Some(tick);
            }
        }
        assert_eq!(night_at, Some(100 * 50));
        assert_eq!(day_at, Some(200 * 50));
    }

    #[test]
    fn test_night_alpha() {
        let mut cycle = AmbientCycle::new();
        for tick in 1..=25 * 50 {
            cycle.advance(tick);
        }
        assert_eq!(cycle.phase(), 25);
        assert!((cycle.night_alpha() - 0.25).abs() < f32::EPSILON);
    }
}
