// Pattern Type Definitions
// Step patterns are the authoring format; timed hits are what the composer plays

use serde::Serialize;

use crate::arranger::Genre;
use crate::events::Instrument;
use crate::groove::grid::{self, STEPS_PER_BAR};

/// Sixteen velocities, one per step (0 = no hit)
pub type Steps = [u8; STEPS_PER_BAR];

/// A named one-bar drum template
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepPattern {
    /// Unique catalog name
    pub name: &'static str,

    /// Genre the pattern belongs to
    pub genre: Genre,

    /// Free-form tags
    pub tags: &'static [&'static str],

    /// One-line description
    pub description: &'static str,

    /// Step velocities per instrument
    pub lanes: &'static [(Instrument, Steps)],
}

/// One hit of a bar template, relative to the bar start
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemplateHit {
    pub instrument: Instrument,
    pub beat: f64,
    pub velocity: u8,
}

/// Short listing entry for the CLI
#[derive(Debug, Clone, Serialize)]
pub struct PatternSummary {
    pub name: String,
    pub genre: Genre,
    pub tags: Vec<String>,
    pub description: String,
    pub hit_count: usize,
}

impl StepPattern {
    /// Convert the step vectors into timed hits
    ///
    /// Hits come out lane by lane in declaration order, steps ascending.
    pub fn hits(&self) -> Vec<TemplateHit> {
        self.lanes
            .iter()
            .flat_map(|(instrument, steps)| steps_to_hits(*instrument, steps))
            .collect()
    }

    /// Velocity vector for one instrument, if the pattern uses it
    pub fn steps_for(&self, instrument: Instrument) -> Option<&Steps> {
        self.lanes
            .iter()
            .find(|(i, steps)| *i == instrument && steps.iter().any(|&v| v > 0))
            .map(|(_, steps)| steps)
    }

    /// Listing entry for this pattern
    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            name: self.name.to_string(),
            genre: self.genre,
            tags: self.tags.iter().map(|t| t.to_string()).collect(),
            description: self.description.to_string(),
            hit_count: self.hits().len(),
        }
    }
}

/// Timed hits for a single step vector
pub fn steps_to_hits(instrument: Instrument, steps: &Steps) -> impl Iterator<Item = TemplateHit> + '_ {
    steps
        .iter()
        .enumerate()
        .filter(|(_, velocity)| **velocity > 0)
        .map(move |(step, &velocity)| TemplateHit {
            instrument,
            beat: grid::step_to_beat(step),
            velocity: velocity.min(127),
        })
}
