// Event model
// Instruments and timed percussion hits

pub mod types;

pub use types::{DrumEvent, Instrument};
