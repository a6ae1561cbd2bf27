// Genre Templates - Per-genre configuration driving the bar composer
// Adding a genre means adding data here, not new composition code

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::groove::grid::Swing;
use crate::patterns::{self, StepPattern};
use super::error::GenerateError;
use super::fills::{Fill, Weighted, AMEN_FILLS, BAR_B_MOVES, STANDARD_FILLS};
use super::phrase::PhraseForm;

/// Supported genres
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    /// House - four-on-the-floor with a broken-beat kick on the "and" of 3
    House,

    /// Breakbeat - two-step kick, ghost snares, Amen fills
    Breaks,

    /// UK garage - two-step with a late hat before beat 3 and an optional ghost kick
    Ukg,

    /// Drum & bass - two-step at 174 with alternating 16th hats
    Dnb,
}

impl Genre {
    /// All genres in the order the CLI processes them
    pub const ALL: [Genre; 4] = [Genre::House, Genre::Breaks, Genre::Ukg, Genre::Dnb];

    /// Parse a genre name, accepting a few long-form aliases
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "house" => Some(Genre::House),
            "breaks" | "breakbeat" => Some(Genre::Breaks),
            "ukg" | "garage" | "uk_garage" => Some(Genre::Ukg),
            "dnb" | "drum_and_bass" | "drumandbass" => Some(Genre::Dnb),
            _ => None,
        }
    }

    /// Short name used in paths and file names
    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::House => "house",
            Genre::Breaks => "breaks",
            Genre::Ukg => "ukg",
            Genre::Dnb => "dnb",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Genre::House => "House",
            Genre::Breaks => "Breakbeat",
            Genre::Ukg => "UK Garage",
            Genre::Dnb => "Drum & Bass",
        }
    }

    /// Tempo written to exported files unless overridden
    pub fn default_tempo(&self) -> f64 {
        match self {
            Genre::House => 120.0,
            Genre::Breaks => 130.0,
            Genre::Ukg => 132.0,
            Genre::Dnb => 174.0,
        }
    }

    /// Get the generation profile for this genre
    pub fn profile(&self) -> GenreProfile {
        match self {
            Genre::House => GenreProfile {
                genre: *self,
                theme: patterns::theme_for(*self),
                form: PhraseForm::Abac,
                swing: Swing::STRAIGHT,
                hat_layers: &HOUSE_HAT_LAYERS,
                ghost_kick: None,
                accent_velocity: 110,
                variations: &BAR_B_MOVES,
                fills: &STANDARD_FILLS,
            },

            Genre::Breaks => GenreProfile {
                genre: *self,
                theme: patterns::theme_for(*self),
                form: PhraseForm::Aabc,
                swing: Swing::STRAIGHT,
                hat_layers: &[],
                ghost_kick: Some(GhostKick {
                    beat: 3.5, // "and" of 4
                    velocity: 80,
                    probability: 0.5,
                }),
                accent_velocity: 110,
                variations: &BAR_B_MOVES,
                fills: &AMEN_FILLS,
            },

            Genre::Ukg => GenreProfile {
                genre: *self,
                theme: patterns::theme_for(*self),
                form: PhraseForm::Abac,
                swing: Swing::STRAIGHT,
                hat_layers: &[],
                ghost_kick: Some(GhostKick {
                    beat: 1.75,
                    velocity: 60,
                    probability: 0.5,
                }),
                accent_velocity: 110,
                variations: &BAR_B_MOVES,
                fills: &STANDARD_FILLS,
            },

            Genre::Dnb => GenreProfile {
                genre: *self,
                theme: patterns::theme_for(*self),
                form: PhraseForm::Abac,
                swing: Swing::STRAIGHT,
                hat_layers: &[],
                ghost_kick: Some(GhostKick {
                    beat: 0.75,
                    velocity: 80,
                    probability: 0.5,
                }),
                accent_velocity: 100,
                variations: &BAR_B_MOVES,
                fills: &AMEN_FILLS,
            },
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Genre {
    type Err = GenerateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::from_string(s).ok_or_else(|| GenerateError::InvalidGenre(s.to_string()))
    }
}

/// Closed hi-hat layer chosen once per variation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HatLayer {
    /// Short label for logs
    pub name: &'static str,

    /// Velocity per sixteenth step (0 = no hit)
    pub steps: [u8; 16],
}

/// Dense 16ths or sparse 8ths, picked per house variation
pub const HOUSE_HAT_LAYERS: [HatLayer; 2] = [
    HatLayer {
        name: "sixteenths",
        steps: [90; 16],
    },
    HatLayer {
        name: "eighths",
        steps: [90, 0, 90, 0, 90, 0, 90, 0, 90, 0, 90, 0, 90, 0, 90, 0],
    },
];

/// Optional low-velocity kick, decided once per variation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GhostKick {
    /// In-bar beat position
    pub beat: f64,

    /// MIDI velocity
    pub velocity: u8,

    /// Chance the ghost kick is present in a variation
    pub probability: f64,
}

/// Everything the bar composer needs to know about a genre
#[derive(Debug, Clone)]
pub struct GenreProfile {
    /// Genre this profile belongs to
    pub genre: Genre,

    /// Theme bar played by every bar kind
    pub theme: &'static StepPattern,

    /// Macro-form of each four-bar phrase
    pub form: PhraseForm,

    /// Swing applied to every placed hit
    pub swing: Swing,

    /// Closed-hat layers to choose from per variation (empty = theme hats only)
    pub hat_layers: &'static [HatLayer],

    /// Ghost kick decided per variation
    pub ghost_kick: Option<GhostKick>,

    /// Velocity of the bar-B snare accent
    pub accent_velocity: u8,

    /// Weighted moves for bar B
    pub variations: &'static [Weighted<Fill>],

    /// Weighted fills for bar C
    pub fills: &'static [Weighted<Fill>],
}

impl GenreProfile {
    /// Replace the theme with another catalog pattern of the same genre
    pub fn with_theme(mut self, name: &str) -> Result<Self, GenerateError> {
        let pattern = patterns::get_pattern(name)
            .filter(|p| p.genre == self.genre)
            .ok_or_else(|| GenerateError::UnknownPattern(name.to_string()))?;

        self.theme = pattern;
        Ok(self)
    }

    /// Whether bar C can pick the Amen rewrite
    pub fn supports_amen(&self) -> bool {
        self.fills.iter().any(|w| w.item == Fill::Amen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Instrument;

    #[test]
    fn test_genre_from_string() {
        assert_eq!(Genre::from_string("house"), Some(Genre::House));
        assert_eq!(Genre::from_string("DnB"), Some(Genre::Dnb));
        assert_eq!(Genre::from_string("garage"), Some(Genre::Ukg));
        assert_eq!(Genre::from_string("techno"), None);
    }

    #[test]
    fn test_genre_from_str_error() {
        let err = "techno".parse::<Genre>().unwrap_err();
        assert_eq!(err, GenerateError::InvalidGenre("techno".to_string()));
    }

    #[test]
    fn test_default_tempos() {
        assert_eq!(Genre::House.default_tempo(), 120.0);
        assert_eq!(Genre::Breaks.default_tempo(), 130.0);
        assert_eq!(Genre::Ukg.default_tempo(), 132.0);
        assert_eq!(Genre::Dnb.default_tempo(), 174.0);
    }

    #[test]
    fn test_amen_support() {
        assert!(Genre::Breaks.profile().supports_amen());
        assert!(Genre::Dnb.profile().supports_amen());
        assert!(!Genre::House.profile().supports_amen());
        assert!(!Genre::Ukg.profile().supports_amen());
    }

    #[test]
    fn test_forms() {
        assert_eq!(Genre::House.profile().form, PhraseForm::Abac);
        assert_eq!(Genre::Breaks.profile().form, PhraseForm::Aabc);
    }

    #[test]
    fn test_house_hat_layers() {
        let profile = Genre::House.profile();
        assert_eq!(profile.hat_layers.len(), 2);
        assert_eq!(profile.hat_layers[0].steps.iter().filter(|&&v| v > 0).count(), 16);
        assert_eq!(profile.hat_layers[1].steps.iter().filter(|&&v| v > 0).count(), 8);

        // House themes carry no closed hats of their own
        assert!(profile.theme.hits().iter().all(|h| h.instrument != Instrument::ClosedHat));
    }

    #[test]
    fn test_with_theme() {
        let profile = Genre::House.profile().with_theme("deep_house_ride").unwrap();
        assert_eq!(profile.theme.name, "deep_house_ride");

        // Patterns from another genre are rejected
        let err = Genre::House.profile().with_theme("liquid_funk").unwrap_err();
        assert_eq!(err, GenerateError::UnknownPattern("liquid_funk".to_string()));
    }
}
