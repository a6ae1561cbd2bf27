// Step Grid - Bar/step geometry, swing and tolerant time comparison
// Every generated hit lives on this 4/4, sixteen-step grid before humanization

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Beats in one bar (4/4)
pub const BEATS_PER_BAR: f64 = 4.0;

/// Sixteenth-note steps in one bar
pub const STEPS_PER_BAR: usize = 16;

/// Length of one step in beats
pub const STEP_BEATS: f64 = BEATS_PER_BAR / STEPS_PER_BAR as f64;

/// Bars in one phrase (one variation)
pub const PHRASE_BARS: u32 = 4;

/// Length of one phrase in beats
pub const PHRASE_BEATS: f64 = BEATS_PER_BAR * PHRASE_BARS as f64;

/// Two beat positions closer than this are the same position
pub const TIME_TOLERANCE: f64 = 0.001;

/// Compare two beat positions with [`TIME_TOLERANCE`]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_TOLERANCE
}

/// Beat offset of a step index within its bar
pub fn step_to_beat(step: usize) -> f64 {
    step as f64 * STEP_BEATS
}

/// Step index for an in-bar beat position, if it sits on the grid
pub fn beat_to_step(beat: f64) -> Option<usize> {
    if !(0.0..BEATS_PER_BAR).contains(&beat) {
        return None;
    }

    let step = (beat / STEP_BEATS).round();
    if approx_eq(step * STEP_BEATS, beat) {
        Some(step as usize)
    } else {
        None
    }
}

/// Half-open beat span covered by the bar starting at `offset`
pub fn bar_range(offset: f64) -> Range<f64> {
    offset..offset + BEATS_PER_BAR
}

/// Timeline offset of a 1-based variation index
pub fn variation_offset(variation: u32) -> f64 {
    variation.saturating_sub(1) as f64 * PHRASE_BEATS
}

/// Swing feel - delays the off-beat sixteenths
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Swing {
    /// Fraction of a step that odd sixteenths are pushed late [0.0, 1.0)
    /// 0.0 = straight
    pub amount: f64,
}

impl Swing {
    /// No swing
    pub const STRAIGHT: Swing = Swing { amount: 0.0 };

    /// Create a swing feel, keeping the delay below one full step
    pub fn new(amount: f64) -> Self {
        Swing {
            amount: amount.clamp(0.0, 0.95),
        }
    }

    /// Apply the swing to an in-bar beat position
    ///
    /// Only on-grid odd steps move; off-grid positions are left alone.
    pub fn apply(&self, beat: f64) -> f64 {
        if self.amount <= 0.0 {
            return beat;
        }

        match beat_to_step(beat) {
            Some(step) if step % 2 == 1 => beat + self.amount * STEP_BEATS,
            _ => beat,
        }
    }
}

impl Default for Swing {
    fn default() -> Self {
        Swing::STRAIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_constants() {
        assert_eq!(STEP_BEATS, 0.25);
        assert_eq!(PHRASE_BEATS, 16.0);
    }

    #[test]
    fn test_step_beat_conversion() {
        assert_eq!(step_to_beat(0), 0.0);
        assert_eq!(step_to_beat(10), 2.5);
        assert_eq!(beat_to_step(2.5), Some(10));
        assert_eq!(beat_to_step(3.75), Some(15));

        // Off-grid and out-of-bar positions have no step
        assert_eq!(beat_to_step(0.1), None);
        assert_eq!(beat_to_step(4.0), None);
        assert_eq!(beat_to_step(-0.25), None);
    }

    #[test]
    fn test_approx_eq() {
        assert!(approx_eq(12.0, 12.0005));
        assert!(!approx_eq(12.0, 12.01));
    }

    #[test]
    fn test_bar_range() {
        let range = bar_range(12.0);
        assert!(range.contains(&12.0));
        assert!(range.contains(&15.75));
        assert!(!range.contains(&16.0));
    }

    #[test]
    fn test_variation_offset() {
        assert_eq!(variation_offset(1), 0.0);
        assert_eq!(variation_offset(3), 32.0);
    }

    #[test]
    fn test_swing_timing() {
        let swing = Swing::new(0.5);

        // On-beat and eighth positions stay put
        assert_eq!(swing.apply(0.0), 0.0);
        assert_eq!(swing.apply(0.5), 0.5);

        // Odd sixteenths are delayed
        assert!((swing.apply(0.25) - 0.375).abs() < 1e-9);
        assert!((swing.apply(2.25) - 2.375).abs() < 1e-9);

        // Straight feel is a no-op
        assert_eq!(Swing::STRAIGHT.apply(0.25), 0.25);
    }

    #[test]
    fn test_swing_clamped() {
        assert_eq!(Swing::new(2.0).amount, 0.95);
        assert_eq!(Swing::new(-1.0).amount, 0.0);
    }
}
