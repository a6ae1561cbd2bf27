// Exporter - Writes an arrangement as one MIDI file per instrument
// Layout: <out>/<genre>/variation_<n>/<stem>_<genre>_<n>.mid for a single
// variation, <out>/<genre>/<stem>_<genre>.mid for a multi-variation run

pub mod manifest;
pub mod storage;

pub use manifest::{read_manifest, ManifestEntry, ManifestWriter, MANIFEST_FILE};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::arranger::midi::{self, MidiExportOptions};
use crate::arranger::{Arrangement, Genre};
use crate::events::Instrument;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("MIDI encoding failed: {0}")]
    Midi(String),

    #[error("Invalid tempo {0} BPM")]
    InvalidTempo(f64),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Instrument → MIDI note mapping used when writing files
///
/// Instruments missing from the map are not exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteMap {
    notes: BTreeMap<Instrument, u8>,
}

impl NoteMap {
    /// General MIDI percussion notes for every instrument
    pub fn general_midi() -> Self {
        NoteMap {
            notes: Instrument::ALL.iter().map(|&i| (i, i.gm_note())).collect(),
        }
    }

    /// A map with no instruments
    pub fn empty() -> Self {
        NoteMap {
            notes: BTreeMap::new(),
        }
    }

    /// Note for an instrument, if mapped
    pub fn get(&self, instrument: Instrument) -> Option<u8> {
        self.notes.get(&instrument).copied()
    }

    /// Map an instrument to a note (values above 127 are clamped)
    pub fn set(&mut self, instrument: Instrument, note: u8) {
        self.notes.insert(instrument, note.min(127));
    }

    /// Builder-style [`NoteMap::set`]
    pub fn with_override(mut self, instrument: Instrument, note: u8) -> Self {
        self.set(instrument, note);
        self
    }

    /// Drop an instrument from the map
    pub fn without(mut self, instrument: Instrument) -> Self {
        self.notes.remove(&instrument);
        self
    }
}

impl Default for NoteMap {
    fn default() -> Self {
        NoteMap::general_midi()
    }
}

/// Export options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// MIDI encoding options
    pub midi: MidiExportOptions,

    /// Note numbers per instrument
    pub notes: NoteMap,

    /// Write files under a `YYYY_MM_DD` folder of the output directory
    pub dated: bool,

    /// Append an entry to `manifest.jsonl` after a successful export
    pub manifest: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            midi: MidiExportOptions::default(),
            notes: NoteMap::default(),
            dated: false,
            manifest: true,
        }
    }
}

/// A written MIDI file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedFile {
    pub instrument: Instrument,
    pub path: PathBuf,
    pub sha256: String,

    /// Notes written to the file
    pub event_count: usize,
}

/// Result of exporting one arrangement
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub genre: Genre,
    pub tempo: f64,
    pub seed: Option<u64>,
    pub first_variation: u32,
    pub variation_count: u32,

    /// Directory the files were written to
    pub directory: PathBuf,

    /// Files in canonical instrument order
    pub files: Vec<ExportedFile>,
}

impl ExportReport {
    /// Instrument → written path
    pub fn paths(&self) -> BTreeMap<Instrument, &Path> {
        self.files
            .iter()
            .map(|f| (f.instrument, f.path.as_path()))
            .collect()
    }

    /// Written file for an instrument
    pub fn file_for(&self, instrument: Instrument) -> Option<&ExportedFile> {
        self.files.iter().find(|f| f.instrument == instrument)
    }
}

/// Write every non-empty, mapped lane of `arrangement` as its own MIDI file
///
/// Files already present are never overwritten; a `_1`, `_2`, ... suffix is
/// added instead. A failure part-way leaves earlier files in place.
pub fn export(
    arrangement: &Arrangement,
    output_dir: &Path,
    tempo: f64,
    options: &ExportOptions,
) -> ExportResult<ExportReport> {
    if midi::tempo_to_micros(tempo).is_none() {
        return Err(ExportError::InvalidTempo(tempo));
    }

    let root = if options.dated {
        storage::dated_dir(output_dir, chrono::Local::now().date_naive())
    } else {
        output_dir.to_path_buf()
    };

    let genre = arrangement.genre;
    let (directory, suffix) = if arrangement.variation_count == 1 {
        let variation = arrangement.first_variation;
        (
            storage::variation_dir(&root, genre, variation),
            format!("_{}", variation),
        )
    } else {
        (storage::genre_dir(&root, genre), String::new())
    };

    let span = arrangement.start_beat()..arrangement.end_beat();
    let mut files = Vec::new();

    for lane in arrangement.active_lanes() {
        let Some(note) = options.notes.get(lane.instrument) else {
            log::warn!(
                "No MIDI note mapped for {}; skipping {} events",
                lane.instrument,
                lane.len()
            );
            continue;
        };

        let mut sorted = lane.clone();
        sorted.sort_by_time();

        let bytes = midi::encode_lane(&sorted, note, tempo, span.clone(), &options.midi)
            .map_err(ExportError::Midi)?;

        let stem = format!("{}_{}{}", lane.instrument.file_stem(), genre, suffix);
        let (path, sha256) = storage::store_file(&directory, &stem, "mid", &bytes)?;

        log::info!("Wrote {} ({} notes)", path.display(), sorted.len());

        files.push(ExportedFile {
            instrument: lane.instrument,
            path,
            sha256,
            event_count: sorted.len(),
        });
    }

    let report = ExportReport {
        genre,
        tempo,
        seed: arrangement.seed,
        first_variation: arrangement.first_variation,
        variation_count: arrangement.variation_count,
        directory,
        files,
    };

    if options.manifest {
        ManifestWriter::in_dir(&root).write(&ManifestEntry::from_report(&report))?;
    }

    Ok(report)
}
