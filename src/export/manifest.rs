// Export manifest
// Append-only JSONL log of every export written to an output directory

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::arranger::Genre;
use super::{ExportReport, ExportResult, ExportedFile};

/// Manifest file name inside the output directory
pub const MANIFEST_FILE: &str = "manifest.jsonl";

/// One export recorded in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// ISO 8601 timestamp of when this entry was created
    pub timestamp: String,

    pub genre: Genre,

    /// Tempo written to the files, in BPM
    pub tempo: f64,

    /// Base seed, if the run was seeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// First variation covered (1-based)
    pub first_variation: u32,

    /// Number of variations covered
    pub variation_count: u32,

    /// Written files with their hashes
    pub files: Vec<ExportedFile>,
}

impl ManifestEntry {
    /// Create an entry for a finished export with the current timestamp
    pub fn from_report(report: &ExportReport) -> Self {
        ManifestEntry {
            timestamp: Utc::now().to_rfc3339(),
            genre: report.genre,
            tempo: report.tempo,
            seed: report.seed,
            first_variation: report.first_variation,
            variation_count: report.variation_count,
            files: report.files.clone(),
        }
    }

    /// Serialize to JSON line (with newline)
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        let json = serde_json::to_string(self)?;
        Ok(format!("{}\n", json))
    }
}

/// Manifest writer
/// Manages the append-only JSONL manifest file
pub struct ManifestWriter {
    file_path: PathBuf,
}

impl ManifestWriter {
    /// Create a writer for a specific file
    pub fn new(file_path: PathBuf) -> Self {
        ManifestWriter { file_path }
    }

    /// Create a writer for the manifest inside `output_dir`
    pub fn in_dir(output_dir: &Path) -> Self {
        ManifestWriter::new(output_dir.join(MANIFEST_FILE))
    }

    /// Append an entry to the file
    /// Creates the file (and its directory) if it doesn't exist
    pub fn write(&self, entry: &ManifestEntry) -> ExportResult<()> {
        if let Some(parent) = self.file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;

        let json_line = entry.to_json_line()?;
        file.write_all(json_line.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    /// Get the manifest file path
    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

/// Read manifest entries from a JSONL file
pub fn read_manifest(path: &Path) -> ExportResult<Vec<ManifestEntry>> {
    let contents = std::fs::read_to_string(path)?;
    let mut entries = Vec::new();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let entry: ManifestEntry = serde_json::from_str(line)?;
        entries.push(entry);
    }

    Ok(entries)
}
