// Phrase Assembler - Four-bar phrases, one per variation
// Each variation reseeds the shared generator, draws its per-variation choices,
// then composes its bars in the genre's macro-form

use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use crate::groove::grid::{self, BEATS_PER_BAR, PHRASE_BARS};
use super::bar::{BarComposer, BarKind, VariationChoices};
use super::drum_lanes::Arrangement;
use super::fills::Fill;
use super::templates::GenreProfile;

/// Bar order of a four-bar phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseForm {
    /// Theme, variation, theme, fill
    Abac,

    /// Theme, theme, variation, fill
    Aabc,
}

impl PhraseForm {
    /// Bar kinds in playing order
    pub fn bar_kinds(&self) -> [BarKind; PHRASE_BARS as usize] {
        match self {
            PhraseForm::Abac => [BarKind::A, BarKind::B, BarKind::A, BarKind::C],
            PhraseForm::Aabc => [BarKind::A, BarKind::A, BarKind::B, BarKind::C],
        }
    }

    /// Upper-case form name for logs ("ABAC")
    pub fn as_str(&self) -> &'static str {
        match self {
            PhraseForm::Abac => "ABAC",
            PhraseForm::Aabc => "AABC",
        }
    }
}

/// One generated variation
#[derive(Debug, Clone, Serialize)]
pub struct Phrase {
    /// Starting bar number (0-indexed from the sequence start)
    pub start_bar: u32,

    /// Ending bar number (exclusive)
    pub end_bar: u32,

    /// 1-based variation index
    pub variation: u32,

    /// Bar order used
    pub form: PhraseForm,

    /// Per-variation choices held across all bars
    pub choices: VariationChoices,

    /// Move applied on top of the theme in each bar (None for A bars)
    pub moves: [Option<Fill>; PHRASE_BARS as usize],
}

impl Phrase {
    /// Get the length of this phrase in bars
    pub fn length_bars(&self) -> u32 {
        self.end_bar.saturating_sub(self.start_bar)
    }

    /// Whether bar C used the Amen rewrite
    pub fn has_amen(&self) -> bool {
        self.moves.contains(&Some(Fill::Amen))
    }
}

/// The phrases laid down by one generation call
#[derive(Debug, Clone, Default, Serialize)]
pub struct PhraseStructure {
    /// Phrases in timeline order
    pub phrases: Vec<Phrase>,

    /// First bar covered
    pub start_bar: u32,

    /// Number of bars covered
    pub total_bars: u32,
}

impl PhraseStructure {
    /// Create an empty structure spanning `variation_count` variations
    /// from `first_variation`
    pub fn new(first_variation: u32, variation_count: u32) -> Self {
        PhraseStructure {
            phrases: Vec::new(),
            start_bar: first_variation.saturating_sub(1).saturating_mul(PHRASE_BARS),
            total_bars: variation_count.saturating_mul(PHRASE_BARS),
        }
    }

    /// Add a phrase to the structure
    pub fn add_phrase(&mut self, phrase: Phrase) {
        self.phrases.push(phrase);
    }

    /// Validate that the phrase structure is consistent
    /// - Every phrase is exactly four bars
    /// - No gaps or overlaps between phrases
    /// - Covers every bar from start_bar to start_bar + total_bars
    pub fn validate(&self) -> Result<(), String> {
        let (first, last) = match (self.phrases.first(), self.phrases.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err("Phrase structure has no phrases".to_string()),
        };

        if let Some(p) = self.phrases.iter().find(|p| p.length_bars() != PHRASE_BARS) {
            return Err(format!(
                "Variation {} spans {} bars, expected {}",
                p.variation,
                p.length_bars(),
                PHRASE_BARS
            ));
        }

        if first.start_bar != self.start_bar {
            return Err(format!(
                "First phrase must start at bar {}, but starts at {}",
                self.start_bar, first.start_bar
            ));
        }

        for (i, pair) in self.phrases.windows(2).enumerate() {
            if pair[0].end_bar != pair[1].start_bar {
                return Err(format!(
                    "Gap or overlap between phrases: phrase {} ends at bar {}, phrase {} starts at bar {}",
                    i,
                    pair[0].end_bar,
                    i + 1,
                    pair[1].start_bar
                ));
            }
        }

        let end_bar = self.start_bar.saturating_add(self.total_bars);
        if last.end_bar != end_bar {
            return Err(format!(
                "Last phrase must end at bar {}, but ends at {}",
                end_bar, last.end_bar
            ));
        }

        Ok(())
    }
}

/// Generate the given variations of a genre into a fresh arrangement
///
/// With a `seed_base`, the generator is reseeded to `seed_base + i` before
/// variation `i`, so any variation can be regenerated on its own and still
/// match the full run. Without one, `rng` is used as-is.
pub fn generate<R: Rng + SeedableRng>(
    profile: &GenreProfile,
    variations: RangeInclusive<u32>,
    seed_base: Option<u64>,
    rng: &mut R,
) -> (Arrangement, PhraseStructure) {
    let first = (*variations.start()).max(1);
    let last = *variations.end();
    let count = last.saturating_sub(first) + u32::from(last >= first);

    let mut arrangement = Arrangement::new(profile.genre, first, count, seed_base);
    let mut structure = PhraseStructure::new(first, count);

    for variation in first..=last {
        if let Some(base) = seed_base {
            *rng = R::seed_from_u64(base.wrapping_add(u64::from(variation)));
        }

        let phrase = generate_variation(profile, variation, &mut arrangement, rng);
        structure.add_phrase(phrase);
    }

    log::debug!(
        "Generated {} variation(s) of {} ({} events)",
        count,
        profile.genre,
        arrangement.total_events()
    );

    (arrangement, structure)
}

/// Append one variation's four bars to `arrangement`
pub fn generate_variation<R: Rng + ?Sized>(
    profile: &GenreProfile,
    variation: u32,
    arrangement: &mut Arrangement,
    rng: &mut R,
) -> Phrase {
    let choices = VariationChoices::resolve(profile, rng);
    let composer = BarComposer::new(profile, choices);

    let base_offset = grid::variation_offset(variation);
    let mut moves = [None; PHRASE_BARS as usize];

    for (i, kind) in profile.form.bar_kinds().into_iter().enumerate() {
        let offset = base_offset + i as f64 * BEATS_PER_BAR;
        moves[i] = composer.compose(kind, offset, arrangement, rng);
    }

    log::debug!(
        "{} variation {}: {} hats={:?} ghost_kick={} moves={:?}",
        profile.genre,
        variation,
        profile.form.as_str(),
        choices.hat_layer.map(|l| l.name),
        choices.ghost_kick.is_some(),
        moves.iter().map(|m| m.map(|f| f.as_str())).collect::<Vec<_>>()
    );

    let start_bar = variation.saturating_sub(1).saturating_mul(PHRASE_BARS);
    Phrase {
        start_bar,
        end_bar: start_bar.saturating_add(PHRASE_BARS),
        variation,
        form: profile.form,
        choices,
        moves,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arranger::templates::Genre;
    use crate::events::Instrument;
    use rand_pcg::Pcg32;

    fn run(genre: Genre, variations: RangeInclusive<u32>, seed: u64) -> (Arrangement, PhraseStructure) {
        let profile = genre.profile();
        let mut rng = Pcg32::seed_from_u64(0);
        generate(&profile, variations, Some(seed), &mut rng)
    }

    #[test]
    fn test_form_bar_kinds() {
        assert_eq!(
            PhraseForm::Abac.bar_kinds(),
            [BarKind::A, BarKind::B, BarKind::A, BarKind::C]
        );
        assert_eq!(
            PhraseForm::Aabc.bar_kinds(),
            [BarKind::A, BarKind::A, BarKind::B, BarKind::C]
        );
    }

    #[test]
    fn test_moves_follow_form() {
        let (_, structure) = run(Genre::Breaks, 1..=3, 500);

        for phrase in &structure.phrases {
            assert!(phrase.moves[0].is_none());
            assert!(phrase.moves[1].is_none());
            assert!(matches!(
                phrase.moves[2],
                Some(Fill::SnareAccent) | Some(Fill::DoubleKick)
            ));
            assert!(phrase.moves[3].is_some());
        }
    }

    #[test]
    fn test_structure_is_contiguous() {
        let (arrangement, structure) = run(Genre::House, 1..=4, 42);

        assert!(structure.validate().is_ok());
        assert_eq!(structure.total_bars, 16);
        assert_eq!(structure.phrases[2].start_bar, 8);
        assert_eq!(structure.phrases[2].variation, 3);
        assert_eq!(arrangement.end_beat(), 64.0);
    }

    #[test]
    fn test_validate_gap() {
        let (_, mut structure) = run(Genre::Ukg, 1..=3, 1);
        structure.phrases.remove(1);

        assert!(structure.validate().is_err());
        assert!(PhraseStructure::new(1, 1).validate().is_err());
    }

    #[test]
    fn test_variations_are_spaced() {
        let (arrangement, _) = run(Genre::Dnb, 1..=3, 4000);

        // Every variation opens on a theme kick at its own offset
        for offset in [0.0, 16.0, 32.0] {
            assert!(arrangement.lane(Instrument::Kick).has_hit(offset, 100));
        }
        assert!(arrangement.events().all(|e| e.time < 48.0));
    }

    #[test]
    fn test_single_variation_matches_full_run() {
        let (full, _) = run(Genre::Ukg, 1..=4, 1234);
        let (third, _) = run(Genre::Ukg, 3..=3, 1234);

        for instrument in Instrument::ALL {
            let expected: Vec<_> = full
                .lane(instrument)
                .events
                .iter()
                .filter(|e| (32.0..48.0).contains(&e.time))
                .copied()
                .collect();
            assert_eq!(third.lane(instrument).events, expected, "{}", instrument);
        }
        assert_eq!(third.start_beat(), 32.0);
    }

    #[test]
    fn test_seeded_generation_ignores_incoming_state() {
        let profile = Genre::Breaks.profile();
        let mut a = Pcg32::seed_from_u64(1);
        let mut b = Pcg32::seed_from_u64(99);

        let (first, _) = generate(&profile, 1..=2, Some(7), &mut a);
        let (second, _) = generate(&profile, 1..=2, Some(7), &mut b);

        assert_eq!(first, second);
    }

    #[test]
    fn test_phrase_reports_amen() {
        let (arrangement, structure) = run(Genre::Dnb, 1..=8, 10);

        for phrase in structure.phrases.iter().filter(|p| p.has_amen()) {
            let bar_c = (phrase.start_bar + 3) as f64 * BEATS_PER_BAR;
            assert!(arrangement.lane(Instrument::Snare).has_hit(bar_c + 0.25, 90));
            assert!(!arrangement.lane(Instrument::Kick).has_hit(bar_c, 100));
        }
    }
}
