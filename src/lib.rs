// Drumgen - Procedural drum pattern generator
// Module declarations

pub mod arranger;
pub mod config;
pub mod events;
pub mod export;
pub mod groove;
pub mod patterns;
pub mod pipeline;

pub use arranger::{Arrangement, DrumLane, GenerateError, GenerateResult, Genre};
pub use config::{load_config, ConfigError, GeneratorConfig};
pub use events::{DrumEvent, Instrument};
pub use export::{export, ExportError, ExportOptions, ExportReport, ExportResult, NoteMap};
pub use groove::HumanizeSettings;
pub use pipeline::{generate_patterns, run_generation, run_genre, GenerateRequest, PipelineError};
