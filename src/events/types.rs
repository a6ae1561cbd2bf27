// Drum event types
// Instrument vocabulary and the timed hit passed between generator stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// General MIDI percussion note numbers
pub const MIDI_KICK: u8 = 36;         // C1
pub const MIDI_SNARE: u8 = 38;        // D1
pub const MIDI_CLAP: u8 = 39;         // D#1
pub const MIDI_CLOSED_HIHAT: u8 = 42; // F#1
pub const MIDI_LOW_TOM: u8 = 43;      // G1
pub const MIDI_OPEN_HIHAT: u8 = 46;   // A#1
pub const MIDI_RIDE: u8 = 51;         // D#2

/// Percussion instruments the generator can place hits on
///
/// The declaration order is the canonical lane order. Humanization walks
/// lanes in this order, so it is part of the seeded-reproducibility contract.
/// Serializes as its snake_case name and deserializes from any name
/// [`Instrument::from_string`] accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Instrument {
    /// Bass drum
    Kick,

    /// Snare drum, including ghost notes
    Snare,

    /// Hand clap layered on the backbeat
    Clap,

    /// Closed hi-hat
    ClosedHat,

    /// Open hi-hat
    OpenHat,

    /// Low tom
    Tom,

    /// Ride cymbal
    Ride,
}

impl Instrument {
    /// All instruments in canonical lane order
    pub const ALL: [Instrument; 7] = [
        Instrument::Kick,
        Instrument::Snare,
        Instrument::Clap,
        Instrument::ClosedHat,
        Instrument::OpenHat,
        Instrument::Tom,
        Instrument::Ride,
    ];

    /// Parse an instrument name, accepting the short keys used in pattern
    /// files as well as a few common aliases
    pub fn from_string(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kick" | "bd" => Some(Instrument::Kick),
            "snare" | "sd" => Some(Instrument::Snare),
            "clap" | "cp" => Some(Instrument::Clap),
            "chh" | "ch" | "hats" | "hihat" | "closed_hat" | "closed-hat" => {
                Some(Instrument::ClosedHat)
            }
            "ohh" | "oh" | "open_hat" | "open-hat" => Some(Instrument::OpenHat),
            "tom" => Some(Instrument::Tom),
            "ride" => Some(Instrument::Ride),
            _ => None,
        }
    }

    /// Short key used in logs, manifests and config files
    pub fn key(&self) -> &'static str {
        match self {
            Instrument::Kick => "kick",
            Instrument::Snare => "snare",
            Instrument::Clap => "clap",
            Instrument::ClosedHat => "chh",
            Instrument::OpenHat => "ohh",
            Instrument::Tom => "tom",
            Instrument::Ride => "ride",
        }
    }

    /// Stem used when naming exported files ("hats_house_2.mid")
    pub fn file_stem(&self) -> &'static str {
        match self {
            Instrument::ClosedHat => "hats",
            other => other.key(),
        }
    }

    /// General MIDI percussion note for this instrument
    pub fn gm_note(&self) -> u8 {
        match self {
            Instrument::Kick => MIDI_KICK,
            Instrument::Snare => MIDI_SNARE,
            Instrument::Clap => MIDI_CLAP,
            Instrument::ClosedHat => MIDI_CLOSED_HIHAT,
            Instrument::OpenHat => MIDI_OPEN_HIHAT,
            Instrument::Tom => MIDI_LOW_TOM,
            Instrument::Ride => MIDI_RIDE,
        }
    }

    /// Human-readable name, used as the MIDI track name
    pub fn display_name(&self) -> &'static str {
        match self {
            Instrument::Kick => "Kick",
            Instrument::Snare => "Snare",
            Instrument::Clap => "Clap",
            Instrument::ClosedHat => "Closed Hat",
            Instrument::OpenHat => "Open Hat",
            Instrument::Tom => "Tom",
            Instrument::Ride => "Ride",
        }
    }
}

impl TryFrom<String> for Instrument {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Instrument::from_string(&s).ok_or_else(|| format!("unknown instrument '{}'", s))
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single percussion onset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrumEvent {
    /// Position in beats from the start of the sequence
    pub time: f64,

    /// Which drum is hit
    pub instrument: Instrument,

    /// MIDI velocity (1-127)
    pub velocity: u8,
}

impl DrumEvent {
    /// Create a new event, clamping velocity to 1-127 and time to >= 0
    pub fn new(time: f64, instrument: Instrument, velocity: u8) -> Self {
        DrumEvent {
            time: time.max(0.0),
            instrument,
            velocity: velocity.clamp(1, 127),
        }
    }

    /// Shift the event by a signed velocity amount, staying inside 1-127
    pub fn nudge_velocity(&mut self, delta: i32) {
        self.velocity = (self.velocity as i32 + delta).clamp(1, 127) as u8;
    }

    /// Shift the event in time, never moving it before the sequence start
    pub fn nudge_time(&mut self, delta: f64) {
        self.time = (self.time + delta).max(0.0);
    }
}
