// Humanization - Bounded random perturbation of velocity and timing
// Runs after the whole arrangement is composed, on the same generator

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::arranger::drum_lanes::Arrangement;
use crate::arranger::error::GenerateError;

/// Settings for humanization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumanizeSettings {
    /// Maximum velocity change either way
    /// 0 = velocities untouched, no draws
    pub velocity_variation: u8,

    /// Maximum timing change either way, in beats
    /// 0.0 = timing untouched, no draws
    pub timing_variation: f64,
}

impl Default for HumanizeSettings {
    fn default() -> Self {
        HumanizeSettings {
            velocity_variation: 15,
            timing_variation: 0.02,
        }
    }
}

impl HumanizeSettings {
    /// No perturbation at all
    pub const OFF: HumanizeSettings = HumanizeSettings {
        velocity_variation: 0,
        timing_variation: 0.0,
    };

    /// Reject timing variations that are negative or not finite
    pub fn validate(&self) -> Result<(), GenerateError> {
        if !self.timing_variation.is_finite() || self.timing_variation < 0.0 {
            return Err(GenerateError::InvalidParameter(format!(
                "timing_variation must be a finite value >= 0, got {}",
                self.timing_variation
            )));
        }
        Ok(())
    }

    /// Whether humanizing with these settings changes anything
    pub fn is_off(&self) -> bool {
        self.velocity_variation == 0 && self.timing_variation <= 0.0
    }
}

/// Humanize every event of an arrangement in place
///
/// Algorithm:
/// 1. Walk lanes in canonical instrument order, events in list order
/// 2. Velocity: add a uniform integer in [-v, v], clamp to 1..=127
/// 3. Timing: add a uniform real in [-t, t), clamp to >= 0
///
/// Each draw is skipped when its variation is zero, so the number of values
/// consumed from `rng` depends only on the settings and the event count.
/// Lane order is not restored; call [`Arrangement::sort_lanes`] afterwards.
pub fn humanize<R: Rng + ?Sized>(arrangement: &mut Arrangement, settings: &HumanizeSettings, rng: &mut R) {
    if settings.is_off() {
        return;
    }

    let v = settings.velocity_variation as i32;
    let t = settings.timing_variation;

    for lane in arrangement.lanes_mut() {
        for event in &mut lane.events {
            if v > 0 {
                event.nudge_velocity(rng.gen_range(-v..=v));
            }
            if t > 0.0 {
                event.nudge_time(rng.gen_range(-t..t));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arranger::templates::Genre;
    use crate::events::Instrument;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn sample_arrangement() -> Arrangement {
        let mut arrangement = Arrangement::new(Genre::Breaks, 1, 1, None);
        arrangement.add_hit(Instrument::Kick, 0.0, 100);
        arrangement.add_hit(Instrument::Kick, 2.5, 127);
        arrangement.add_hit(Instrument::Snare, 1.25, 1);
        arrangement.add_hit(Instrument::ClosedHat, 0.0, 100);
        arrangement
    }

    #[test]
    fn test_default_settings() {
        let settings = HumanizeSettings::default();
        assert_eq!(settings.velocity_variation, 15);
        assert_eq!(settings.timing_variation, 0.02);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_timing() {
        for timing in [-0.1, f64::NAN, f64::INFINITY] {
            let settings = HumanizeSettings {
                velocity_variation: 0,
                timing_variation: timing,
            };
            assert!(matches!(settings.validate(), Err(GenerateError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_off_is_noop() {
        let mut arrangement = sample_arrangement();
        let before = arrangement.clone();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut untouched = Pcg32::seed_from_u64(5);

        humanize(&mut arrangement, &HumanizeSettings::OFF, &mut rng);

        assert_eq!(arrangement, before);
        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_bounded_perturbation() {
        let settings = HumanizeSettings {
            velocity_variation: 15,
            timing_variation: 0.05,
        };

        for seed in 0..200 {
            let base = sample_arrangement();
            let mut arrangement = base.clone();
            let mut rng = Pcg32::seed_from_u64(seed);

            humanize(&mut arrangement, &settings, &mut rng);

            for (before, after) in base.events().zip(arrangement.events()) {
                assert!((1..=127).contains(&after.velocity));
                assert!((after.velocity as i32 - before.velocity as i32).abs() <= 15);
                assert!(after.time >= 0.0);
                assert!(after.time - before.time <= 0.05 + 1e-12);
                assert!(before.time - after.time <= 0.05 + 1e-12);
            }
        }
    }

    #[test]
    fn test_draw_consumption() {
        // Four events, two draws each
        let settings = HumanizeSettings {
            velocity_variation: 10,
            timing_variation: 0.01,
        };
        let mut arrangement = sample_arrangement();
        let mut rng = Pcg32::seed_from_u64(77);
        let mut reference = Pcg32::seed_from_u64(77);

        humanize(&mut arrangement, &settings, &mut reference);
        for _ in 0..4 {
            let _ = rng.gen_range(-10..=10);
            let _ = rng.gen_range(-0.01..0.01);
        }

        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }

    #[test]
    fn test_velocity_only_keeps_timing() {
        let settings = HumanizeSettings {
            velocity_variation: 20,
            timing_variation: 0.0,
        };
        let base = sample_arrangement();
        let mut arrangement = base.clone();
        let mut rng = Pcg32::seed_from_u64(3);

        humanize(&mut arrangement, &settings, &mut rng);

        let before: Vec<f64> = base.events().map(|e| e.time).collect();
        let after: Vec<f64> = arrangement.events().map(|e| e.time).collect();
        assert_eq!(before, after);
    }
}
