// Arranger - Template-driven drum phrase generation
// Genre profiles feed the bar composer; phrases stack bars into variations

pub mod bar;
pub mod drum_lanes;
pub mod error;
pub mod fills;
pub mod midi;
pub mod phrase;
pub mod templates;

// Re-export main types
pub use bar::{BarComposer, BarKind, VariationChoices};
pub use drum_lanes::{Arrangement, DrumLane};
pub use error::{GenerateError, GenerateResult};
pub use fills::{Fill, Weighted};
pub use midi::{encode_lane, MidiExportOptions};
pub use phrase::{generate, generate_variation, Phrase, PhraseForm, PhraseStructure};
pub use templates::{Genre, GenreProfile, GhostKick, HatLayer};
