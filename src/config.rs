// Generator configuration
// JSON file with defaults for every field; CLI flags override what it sets

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::arranger::midi::MidiExportOptions;
use crate::arranger::Genre;
use crate::events::Instrument;
use crate::export::{ExportOptions, NoteMap};
use crate::groove::HumanizeSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Root directory for exported files
    pub output_dir: PathBuf,

    /// Variations generated per genre
    pub variations: u32,

    /// Base seed; unseeded runs draw from OS entropy
    pub seed: Option<u64>,

    pub velocity_variation: u8,

    /// In beats
    pub timing_variation: f64,

    /// Tempo overrides per genre, in BPM
    pub tempos: BTreeMap<Genre, f64>,

    /// One folder and file set per variation instead of one file per instrument
    pub per_variation: bool,

    /// Write under a YYYY_MM_DD folder
    pub dated: bool,

    /// Append to manifest.jsonl after each export
    pub manifest: bool,

    pub ppq: u16,

    /// Note length in beats
    pub note_duration: f64,

    /// Note number overrides; a value of 0 drops the instrument from export
    pub notes: BTreeMap<Instrument, u8>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_dir: PathBuf::from("./midi"),
            variations: 5,
            seed: None,
            velocity_variation: 15,
            timing_variation: 0.02,
            tempos: BTreeMap::new(),
            per_variation: true,
            dated: false,
            manifest: true,
            ppq: 480,
            note_duration: 0.1,
            notes: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Tempo for a genre: override if set, otherwise the genre default
    pub fn tempo_for(&self, genre: Genre) -> f64 {
        self.tempos
            .get(&genre)
            .copied()
            .unwrap_or_else(|| genre.default_tempo())
    }

    pub fn humanize_settings(&self) -> HumanizeSettings {
        HumanizeSettings {
            velocity_variation: self.velocity_variation,
            timing_variation: self.timing_variation,
        }
    }

    /// Export options with the configured MIDI and note settings applied
    pub fn export_options(&self) -> ExportOptions {
        let notes = self
            .notes
            .iter()
            .fold(NoteMap::general_midi(), |map, (&instrument, &note)| {
                if note == 0 {
                    map.without(instrument)
                } else {
                    map.with_override(instrument, note)
                }
            });

        ExportOptions {
            midi: MidiExportOptions {
                ppq: self.ppq,
                note_duration_beats: self.note_duration,
                ..Default::default()
            },
            notes,
            dated: self.dated,
            manifest: self.manifest,
        }
    }
}

/// Load a configuration file
pub fn load_config(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
