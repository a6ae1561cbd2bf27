// Pipeline - Generation and export entry points
// Validate → seed → assemble phrases → humanize → sort → export

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::arranger::phrase::{self, PhraseStructure};
use crate::arranger::{Arrangement, GenerateError, GenerateResult, Genre};
use crate::export::{self, ExportError, ExportOptions, ExportReport};
use crate::groove::grid::PHRASE_BARS;
use crate::groove::humanize::{humanize, HumanizeSettings};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Everything needed to generate one arrangement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub genre: Genre,

    /// First variation to generate (1-based)
    pub first_variation: u32,

    /// Number of consecutive variations
    pub variation_count: u32,

    /// Base seed; `None` seeds from OS entropy
    pub seed: Option<u64>,

    pub humanize: HumanizeSettings,

    /// Catalog pattern replacing the genre's theme bar
    pub theme: Option<String>,
}

impl GenerateRequest {
    /// Request for variations `1..=variations` with default humanization
    pub fn new(genre: Genre, variations: u32) -> Self {
        GenerateRequest {
            genre,
            first_variation: 1,
            variation_count: variations,
            seed: None,
            humanize: HumanizeSettings::default(),
            theme: None,
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_humanize(mut self, humanize: HumanizeSettings) -> Self {
        self.humanize = humanize;
        self
    }

    pub fn with_theme(mut self, theme: Option<String>) -> Self {
        self.theme = theme;
        self
    }

    /// The same request narrowed to a single variation
    pub fn single_variation(&self, variation: u32) -> Self {
        GenerateRequest {
            first_variation: variation,
            variation_count: 1,
            ..self.clone()
        }
    }

    pub fn validate(&self) -> GenerateResult<()> {
        if self.first_variation < 1 {
            return Err(GenerateError::InvalidParameter(
                "variation indices start at 1".to_string(),
            ));
        }
        if self.variation_count < 1 {
            return Err(GenerateError::InvalidParameter(
                "num_variations must be at least 1".to_string(),
            ));
        }
        let end_bar = self
            .first_variation
            .checked_add(self.variation_count)
            .and_then(|end| (end - 1).checked_mul(PHRASE_BARS));
        if end_bar.is_none() {
            return Err(GenerateError::InvalidParameter(format!(
                "{} variations from {} overflow the bar index",
                self.variation_count, self.first_variation
            )));
        }
        self.humanize.validate()
    }
}

/// Generate a humanized arrangement for a genre name
///
/// Inputs are checked before any random value is drawn: the genre first,
/// then the numeric parameters. Velocity variations above 127 behave like
/// 127, since velocities are clamped to 1..=127 anyway.
pub fn generate_patterns(
    genre: &str,
    num_variations: i64,
    seed: Option<u64>,
    velocity_variation: i64,
    timing_variation: f64,
) -> GenerateResult<Arrangement> {
    let genre: Genre = genre.parse()?;

    let variations = u32::try_from(num_variations)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| {
            GenerateError::InvalidParameter(format!(
                "num_variations must be at least 1, got {}",
                num_variations
            ))
        })?;

    if velocity_variation < 0 {
        return Err(GenerateError::InvalidParameter(format!(
            "velocity_variation must be >= 0, got {}",
            velocity_variation
        )));
    }

    let settings = HumanizeSettings {
        velocity_variation: velocity_variation.min(127) as u8,
        timing_variation,
    };

    let request = GenerateRequest::new(genre, variations)
        .with_seed(seed)
        .with_humanize(settings);

    run_generation(&request).map(|(arrangement, _)| arrangement)
}

/// Generate the arrangement a request describes, with its phrase layout
///
/// Lanes come back sorted by time.
pub fn run_generation(request: &GenerateRequest) -> GenerateResult<(Arrangement, PhraseStructure)> {
    request.validate()?;

    let mut profile = request.genre.profile();
    if let Some(theme) = &request.theme {
        profile = profile.with_theme(theme)?;
    }

    let mut rng = match request.seed {
        Some(seed) => Pcg32::seed_from_u64(seed),
        None => Pcg32::from_entropy(),
    };

    let first = request.first_variation;
    let last = first + request.variation_count - 1;

    let (mut arrangement, structure) = phrase::generate(&profile, first..=last, request.seed, &mut rng);
    humanize(&mut arrangement, &request.humanize, &mut rng);
    arrangement.sort_lanes();

    Ok((arrangement, structure))
}

/// Generate and export a request's variations
///
/// With `per_variation`, each variation is generated on its own and written
/// to its own `variation_<n>` folder; otherwise the whole run is written as
/// one file per instrument. Reports come back in variation order.
pub fn run_genre(
    request: &GenerateRequest,
    output_dir: &Path,
    tempo: f64,
    per_variation: bool,
    options: &ExportOptions,
) -> Result<Vec<ExportReport>, PipelineError> {
    request.validate()?;

    log::info!(
        "Generating {} variation(s) of {} at {} BPM{}",
        request.variation_count,
        request.genre.display_name(),
        tempo,
        request
            .seed
            .map(|s| format!(" (seed {})", s))
            .unwrap_or_default()
    );

    if per_variation {
        export_variations(request, output_dir, tempo, options)
    } else {
        let (arrangement, _) = run_generation(request)?;
        Ok(vec![export::export(&arrangement, output_dir, tempo, options)?])
    }
}

/// Generate and export each variation of a request separately
pub fn export_variations(
    request: &GenerateRequest,
    output_dir: &Path,
    tempo: f64,
    options: &ExportOptions,
) -> Result<Vec<ExportReport>, PipelineError> {
    let first = request.first_variation;
    let mut reports = Vec::with_capacity(request.variation_count as usize);

    for variation in first..first + request.variation_count {
        let (arrangement, _) = run_generation(&request.single_variation(variation))?;
        reports.push(export::export(&arrangement, output_dir, tempo, options)?);
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Instrument;

    #[test]
    fn test_invalid_genre_checked_first() {
        // Genre errors win over parameter errors
        let err = generate_patterns("techno", 0, Some(1), -1, f64::NAN).unwrap_err();
        assert_eq!(err, GenerateError::InvalidGenre("techno".to_string()));
    }

    #[test]
    fn test_invalid_parameters() {
        let cases = [
            generate_patterns("house", 0, Some(1), 0, 0.0),
            generate_patterns("house", -3, Some(1), 0, 0.0),
            generate_patterns("house", 1, Some(1), -1, 0.0),
            generate_patterns("house", 1, Some(1), 0, -0.5),
            generate_patterns("house", 1, Some(1), 0, f64::INFINITY),
        ];

        for result in cases {
            assert!(matches!(result, Err(GenerateError::InvalidParameter(_))));
        }
    }

    #[test]
    fn test_request_validation() {
        let mut request = GenerateRequest::new(Genre::Ukg, 2);
        assert!(request.validate().is_ok());

        request.first_variation = 0;
        assert!(request.validate().is_err());

        let request = GenerateRequest::new(Genre::Ukg, 0);
        assert!(request.validate().is_err());

        let mut request = GenerateRequest::new(Genre::Ukg, 2);
        request.first_variation = u32::MAX;
        assert!(request.validate().is_err());

        // Bar numbers must fit too, not just variation indices
        let request = GenerateRequest::new(Genre::Ukg, u32::MAX / PHRASE_BARS + 1);
        assert!(matches!(request.validate(), Err(GenerateError::InvalidParameter(_))));

        let mut request = GenerateRequest::new(Genre::Ukg, 1);
        request.first_variation = u32::MAX / PHRASE_BARS + 1;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_variation_count_too_large_for_bars() {
        let result = generate_patterns("house", 1_100_000_000, Some(1), 0, 0.0);
        assert!(matches!(result, Err(GenerateError::InvalidParameter(_))));
    }

    #[test]
    fn test_unknown_theme() {
        let request = GenerateRequest::new(Genre::Dnb, 1).with_theme(Some("nope".to_string()));
        assert_eq!(
            run_generation(&request).unwrap_err(),
            GenerateError::UnknownPattern("nope".to_string())
        );
    }

    #[test]
    fn test_theme_override() {
        let request = GenerateRequest::new(Genre::Dnb, 1)
            .with_seed(Some(8))
            .with_humanize(HumanizeSettings::OFF)
            .with_theme(Some("liquid_funk".to_string()));

        let (arrangement, _) = run_generation(&request).unwrap();
        assert!(!arrangement.lane(Instrument::Ride).is_empty());
    }

    #[test]
    fn test_lanes_sorted() {
        let arrangement = generate_patterns("ukg", 3, Some(21), 15, 0.05).unwrap();

        for lane in arrangement.lanes() {
            assert!(lane.events.windows(2).all(|w| w[0].time <= w[1].time));
        }
    }

    #[test]
    fn test_huge_velocity_variation_saturates() {
        let arrangement = generate_patterns("breaks", 1, Some(2), 10_000, 0.0).unwrap();
        assert!(arrangement.events().all(|e| (1..=127).contains(&e.velocity)));
    }

    #[test]
    fn test_unseeded_generation_runs() {
        let arrangement = generate_patterns("house", 2, None, 15, 0.02).unwrap();
        assert_eq!(arrangement.seed, None);
        assert!(arrangement.total_events() > 0);
    }
}
