// Bar Composer - Builds one bar from the genre theme plus its ornament
// Theme hits, per-variation layers, then at most one weighted move per bar

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::events::{DrumEvent, Instrument};
use crate::groove::grid;
use crate::patterns::types::{steps_to_hits, TemplateHit};
use super::drum_lanes::Arrangement;
use super::fills::{self, Fill};
use super::templates::{GenreProfile, GhostKick, HatLayer};

/// Role of a bar inside a phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BarKind {
    /// Theme bar - the template as-is
    A,

    /// Theme plus a micro-variation (snare accent or double kick)
    B,

    /// Theme plus a fill
    C,
}

impl BarKind {
    /// Single-letter name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            BarKind::A => "A",
            BarKind::B => "B",
            BarKind::C => "C",
        }
    }
}

/// Random choices made once per variation and held for all four bars
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VariationChoices {
    /// Closed-hat layer replacing the theme's own closed hats
    pub hat_layer: Option<HatLayer>,

    /// Ghost kick added to every bar
    pub ghost_kick: Option<GhostKick>,
}

impl VariationChoices {
    /// Draw the per-variation choices for a profile
    ///
    /// Draw order is fixed: hat layer first, then ghost kick. A choice the
    /// profile does not declare consumes no draw.
    pub fn resolve<R: Rng + ?Sized>(profile: &GenreProfile, rng: &mut R) -> Self {
        let theme_has_hats = profile.theme.steps_for(Instrument::ClosedHat).is_some();

        let hat_layer = if profile.hat_layers.is_empty() || theme_has_hats {
            None
        } else {
            let r: f64 = rng.gen();
            let index = (r * profile.hat_layers.len() as f64) as usize;
            profile
                .hat_layers
                .get(index.min(profile.hat_layers.len() - 1))
                .copied()
        };

        let ghost_kick = match profile.ghost_kick {
            Some(ghost) => {
                let r: f64 = rng.gen();
                (r < ghost.probability).then_some(ghost)
            }
            None => None,
        };

        VariationChoices {
            hat_layer,
            ghost_kick,
        }
    }
}

/// Hits removed by an Amen rewrite
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmenRemoval {
    /// The bar's downbeat kick, if one was found
    pub kick: Option<DrumEvent>,

    /// The bar's beat-4 snare, if one was found
    pub snare: Option<DrumEvent>,
}

/// Remove the hits the Amen fill replaces from the bar at `offset`
///
/// Removes at most one kick at the bar start and one snare on beat 4, and
/// only looks inside `[offset, offset + 4)`.
pub fn remove_amen_targets(arrangement: &mut Arrangement, offset: f64) -> AmenRemoval {
    let window = grid::bar_range(offset);

    AmenRemoval {
        kick: arrangement
            .lane_mut(Instrument::Kick)
            .remove_first_at(offset, &window),
        snare: arrangement
            .lane_mut(Instrument::Snare)
            .remove_first_at(offset + 3.0, &window),
    }
}

/// Composes bars for one variation of one genre
pub struct BarComposer<'a> {
    profile: &'a GenreProfile,
    choices: VariationChoices,
    theme: Vec<TemplateHit>,
}

impl<'a> BarComposer<'a> {
    /// Create a composer for a variation
    pub fn new(profile: &'a GenreProfile, choices: VariationChoices) -> Self {
        let theme = profile
            .theme
            .hits()
            .into_iter()
            .filter(|h| choices.hat_layer.is_none() || h.instrument != Instrument::ClosedHat)
            .collect();

        BarComposer {
            profile,
            choices,
            theme,
        }
    }

    /// Append one bar of `kind` starting at `offset` beats
    ///
    /// Bars B and C consume exactly one draw each; bar A consumes none.
    /// Returns the move applied on top of the theme, if any.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        kind: BarKind,
        offset: f64,
        arrangement: &mut Arrangement,
        rng: &mut R,
    ) -> Option<Fill> {
        self.compose_theme(offset, arrangement);

        let options = match kind {
            BarKind::A => return None,
            BarKind::B => self.profile.variations,
            BarKind::C => self.profile.fills,
        };

        let r: f64 = rng.gen();
        let fill = fills::choose(options, r)?;
        self.apply_fill(fill, offset, arrangement);
        Some(fill)
    }

    /// Theme hits plus the variation's hat layer and ghost kick
    fn compose_theme(&self, offset: f64, arrangement: &mut Arrangement) {
        for hit in &self.theme {
            self.place(arrangement, hit.instrument, offset, hit.beat, hit.velocity);
        }

        if let Some(layer) = &self.choices.hat_layer {
            for hit in steps_to_hits(Instrument::ClosedHat, &layer.steps) {
                self.place(arrangement, hit.instrument, offset, hit.beat, hit.velocity);
            }
        }

        if let Some(ghost) = self.choices.ghost_kick {
            self.place(arrangement, Instrument::Kick, offset, ghost.beat, ghost.velocity);
        }
    }

    /// Apply a bar ornament to the bar at `offset`
    pub fn apply_fill(&self, fill: Fill, offset: f64, arrangement: &mut Arrangement) {
        match fill {
            Fill::SnareAccent => {
                self.place(arrangement, Instrument::Snare, offset, 3.75, self.profile.accent_velocity);
            }
            Fill::DoubleKick => {
                for beat in [3.5, 3.75] {
                    self.place(arrangement, Instrument::Kick, offset, beat, 100);
                }
            }
            Fill::SnareRoll => {
                for beat in [3.25, 3.5, 3.75] {
                    self.place(arrangement, Instrument::Snare, offset, beat, 100);
                }
            }
            Fill::Amen => {
                let removed = remove_amen_targets(arrangement, offset);
                log::trace!(
                    "Amen rewrite at beat {}: kick removed={}, snare removed={}",
                    offset,
                    removed.kick.is_some(),
                    removed.snare.is_some()
                );

                self.place(arrangement, Instrument::Snare, offset, 0.0, 100);
                self.place(arrangement, Instrument::Snare, offset, 0.25, 90);
                self.place(arrangement, Instrument::Kick, offset, 0.5, 100);
                self.place(arrangement, Instrument::Snare, offset, 3.5, 110);
            }
        }
    }

    fn place(
        &self,
        arrangement: &mut Arrangement,
        instrument: Instrument,
        offset: f64,
        beat: f64,
        velocity: u8,
    ) {
        arrangement.add_hit(instrument, offset + self.profile.swing.apply(beat), velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arranger::templates::Genre;
    use crate::groove::grid::Swing;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn kick_times(arrangement: &Arrangement) -> Vec<f64> {
        arrangement
            .lane(Instrument::Kick)
            .events
            .iter()
            .map(|e| e.time)
            .collect()
    }

    #[test]
    fn test_bar_a_is_theme_only() {
        let profile = Genre::Dnb.profile();
        let composer = BarComposer::new(&profile, VariationChoices::default());
        let mut arrangement = Arrangement::new(Genre::Dnb, 1, 1, None);
        let mut rng = Pcg32::seed_from_u64(1);

        let fill = composer.compose(BarKind::A, 4.0, &mut arrangement, &mut rng);

        assert_eq!(fill, None);
        assert_eq!(kick_times(&arrangement), vec![4.0, 6.5]);
        assert_eq!(arrangement.lane(Instrument::Snare).len(), 4);
        assert_eq!(arrangement.lane(Instrument::ClosedHat).len(), 16);
    }

    #[test]
    fn test_bar_a_consumes_no_draws() {
        let profile = Genre::House.profile();
        let composer = BarComposer::new(&profile, VariationChoices::default());
        let mut arrangement = Arrangement::new(Genre::House, 1, 1, None);

        let mut rng = Pcg32::seed_from_u64(9);
        let mut untouched = Pcg32::seed_from_u64(9);
        composer.compose(BarKind::A, 0.0, &mut arrangement, &mut rng);

        assert_eq!(rng.gen::<u64>(), untouched.gen::<u64>());
    }

    #[test]
    fn test_bar_b_is_binary_fork() {
        let profile = Genre::House.profile();
        let composer = BarComposer::new(&profile, VariationChoices::default());
        let base = {
            let mut arrangement = Arrangement::new(Genre::House, 1, 1, None);
            composer.compose_theme(0.0, &mut arrangement);
            arrangement
        };

        for seed in 0..50 {
            let mut arrangement = Arrangement::new(Genre::House, 1, 1, None);
            let mut rng = Pcg32::seed_from_u64(seed);
            let fill = composer.compose(BarKind::B, 0.0, &mut arrangement, &mut rng);

            let extra_snares = arrangement.lane(Instrument::Snare).len() - base.lane(Instrument::Snare).len();
            let extra_kicks = arrangement.lane(Instrument::Kick).len() - base.lane(Instrument::Kick).len();

            match fill {
                Some(Fill::SnareAccent) => {
                    assert_eq!((extra_snares, extra_kicks), (1, 0));
                    assert!(arrangement.lane(Instrument::Snare).has_hit(3.75, 110));
                }
                Some(Fill::DoubleKick) => {
                    assert_eq!((extra_snares, extra_kicks), (0, 2));
                    assert!(arrangement.lane(Instrument::Kick).has_hit(3.5, 100));
                    assert!(arrangement.lane(Instrument::Kick).has_hit(3.75, 100));
                }
                other => panic!("Unexpected bar B move: {:?}", other),
            }
        }
    }

    #[test]
    fn test_snare_roll_fill() {
        let profile = Genre::Ukg.profile();
        let composer = BarComposer::new(&profile, VariationChoices::default());
        let mut arrangement = Arrangement::new(Genre::Ukg, 1, 1, None);

        composer.apply_fill(Fill::SnareRoll, 12.0, &mut arrangement);

        let lane = arrangement.lane(Instrument::Snare);
        assert!(lane.has_hit(15.25, 100));
        assert!(lane.has_hit(15.5, 100));
        assert!(lane.has_hit(15.75, 100));
        assert_eq!(lane.len(), 3);
    }

    #[test]
    fn test_profile_swing_delays_odd_steps() {
        let mut profile = Genre::Ukg.profile();
        profile.swing = Swing::new(0.5);
        let composer = BarComposer::new(&profile, VariationChoices::default());
        let mut arrangement = Arrangement::new(Genre::Ukg, 1, 1, None);

        composer.apply_fill(Fill::SnareRoll, 12.0, &mut arrangement);

        let lane = arrangement.lane(Instrument::Snare);
        assert!(lane.has_hit(15.375, 100));
        assert!(lane.has_hit(15.5, 100));
        assert!(lane.has_hit(15.875, 100));
    }

    #[test]
    fn test_amen_rewrite_scoped_to_bar() {
        let profile = Genre::Dnb.profile();
        let composer = BarComposer::new(&profile, VariationChoices::default());
        let mut arrangement = Arrangement::new(Genre::Dnb, 1, 1, None);
        let mut rng = Pcg32::seed_from_u64(3);

        for offset in [0.0, 4.0, 8.0] {
            composer.compose(BarKind::A, offset, &mut arrangement, &mut rng);
        }
        composer.compose_theme(12.0, &mut arrangement);
        composer.apply_fill(Fill::Amen, 12.0, &mut arrangement);

        let kick = arrangement.lane(Instrument::Kick);
        assert!(!kick.has_hit(12.0, 100));
        assert!(kick.has_hit(12.5, 100));
        for offset in [0.0, 4.0, 8.0] {
            assert!(kick.has_hit(offset, 100));
        }

        let snare = arrangement.lane(Instrument::Snare);
        assert!(!snare.has_hit(15.0, 110));
        assert!(snare.has_hit(12.0, 100));
        assert!(snare.has_hit(12.25, 90));
        assert!(snare.has_hit(15.5, 110));
        for offset in [0.0, 4.0, 8.0] {
            assert!(snare.has_hit(offset + 3.0, 110));
        }

        // Three theme bars of two kicks, plus the rewritten bar (one kept, one added)
        assert_eq!(kick.len(), 8);
    }

    #[test]
    fn test_amen_removal_finds_nothing_outside_bar() {
        let mut arrangement = Arrangement::new(Genre::Breaks, 1, 1, None);
        arrangement.add_hit(Instrument::Kick, 8.0, 100);
        arrangement.add_hit(Instrument::Snare, 11.0, 110);

        let removed = remove_amen_targets(&mut arrangement, 12.0);

        assert_eq!(removed, AmenRemoval::default());
        assert_eq!(arrangement.total_events(), 2);
    }

    #[test]
    fn test_ghost_kick_and_hat_layer() {
        let profile = Genre::House.profile();
        let choices = VariationChoices {
            hat_layer: Some(profile.hat_layers[1]),
            ghost_kick: Some(GhostKick {
                beat: 1.75,
                velocity: 60,
                probability: 1.0,
            }),
        };
        let composer = BarComposer::new(&profile, choices);
        let mut arrangement = Arrangement::new(Genre::House, 1, 1, None);

        composer.compose_theme(0.0, &mut arrangement);

        assert_eq!(arrangement.lane(Instrument::ClosedHat).len(), 8);
        assert!(arrangement.lane(Instrument::Kick).has_hit(1.75, 60));
    }

    #[test]
    fn test_resolve_choices_draw_order() {
        // House draws one value (hat layer); dnb draws one (ghost kick)
        for genre in [Genre::House, Genre::Dnb] {
            let profile = genre.profile();
            let mut rng = Pcg32::seed_from_u64(11);
            let mut reference = Pcg32::seed_from_u64(11);

            let _ = VariationChoices::resolve(&profile, &mut rng);
            let _: f64 = reference.gen();

            assert_eq!(rng.gen::<u64>(), reference.gen::<u64>(), "{}", genre);
        }
    }

    #[test]
    fn test_resolve_choices_house_dense_on_low_draw() {
        let profile = Genre::House.profile();
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut peek = Pcg32::seed_from_u64(seed);
            let r: f64 = peek.gen();

            let choices = VariationChoices::resolve(&profile, &mut rng);
            let expected = if r < 0.5 { "sixteenths" } else { "eighths" };
            assert_eq!(choices.hat_layer.map(|l| l.name), Some(expected));
            assert!(choices.ghost_kick.is_none());
        }
    }
}
