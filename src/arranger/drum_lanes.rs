// Drum Lanes - Per-instrument event lists produced by the generator
// One lane per instrument, kept in canonical instrument order

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::events::{DrumEvent, Instrument};
use crate::groove::grid;
use super::templates::Genre;

/// A drum lane containing every hit for one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrumLane {
    /// Instrument played by this lane
    pub instrument: Instrument,

    /// Hits in insertion order until [`DrumLane::sort_by_time`] is called
    pub events: Vec<DrumEvent>,
}

impl DrumLane {
    /// Create a new empty drum lane
    pub fn new(instrument: Instrument) -> Self {
        DrumLane {
            instrument,
            events: Vec::new(),
        }
    }

    /// Append a hit at `time` beats
    pub fn add_hit(&mut self, time: f64, velocity: u8) {
        self.events.push(DrumEvent::new(time, self.instrument, velocity));
    }

    /// Sort hits by time; ties keep their insertion order
    pub fn sort_by_time(&mut self) {
        self.events.sort_by(|a, b| a.time.total_cmp(&b.time));
    }

    /// Remove the first hit at `target` (within tolerance) that also lies
    /// inside `window`, returning it
    pub fn remove_first_at(&mut self, target: f64, window: &Range<f64>) -> Option<DrumEvent> {
        let index = self
            .events
            .iter()
            .position(|e| window.contains(&e.time) && grid::approx_eq(e.time, target))?;
        Some(self.events.remove(index))
    }

    /// Whether the lane holds a hit at `time` with the given velocity
    pub fn has_hit(&self, time: f64, velocity: u8) -> bool {
        self.events
            .iter()
            .any(|e| grid::approx_eq(e.time, time) && e.velocity == velocity)
    }

    /// Number of hits
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the lane has no hits
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Generated events for one genre run, grouped by instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arrangement {
    /// Genre the events were generated for
    pub genre: Genre,

    /// First variation index (1-based) covered by this arrangement
    pub first_variation: u32,

    /// Number of consecutive variations covered
    pub variation_count: u32,

    /// Base seed used for generation, if any
    pub seed: Option<u64>,

    /// One lane per instrument in canonical order
    lanes: Vec<DrumLane>,
}

impl Arrangement {
    /// Create an empty arrangement with a lane for every instrument
    pub fn new(genre: Genre, first_variation: u32, variation_count: u32, seed: Option<u64>) -> Self {
        Arrangement {
            genre,
            first_variation: first_variation.max(1),
            variation_count,
            seed,
            lanes: Instrument::ALL.iter().map(|&i| DrumLane::new(i)).collect(),
        }
    }

    /// Lane for an instrument
    pub fn lane(&self, instrument: Instrument) -> &DrumLane {
        &self.lanes[Self::lane_index(instrument)]
    }

    /// Mutable lane for an instrument
    pub fn lane_mut(&mut self, instrument: Instrument) -> &mut DrumLane {
        &mut self.lanes[Self::lane_index(instrument)]
    }

    /// All lanes in canonical instrument order
    pub fn lanes(&self) -> &[DrumLane] {
        &self.lanes
    }

    /// All lanes, mutable, in canonical instrument order
    pub fn lanes_mut(&mut self) -> impl Iterator<Item = &mut DrumLane> {
        self.lanes.iter_mut()
    }

    /// Lanes that received at least one hit
    pub fn active_lanes(&self) -> impl Iterator<Item = &DrumLane> {
        self.lanes.iter().filter(|l| !l.is_empty())
    }

    /// Append a hit to the instrument's lane
    pub fn add_hit(&mut self, instrument: Instrument, time: f64, velocity: u8) {
        self.lane_mut(instrument).add_hit(time, velocity);
    }

    /// Sort every lane by time
    pub fn sort_lanes(&mut self) {
        for lane in &mut self.lanes {
            lane.sort_by_time();
        }
    }

    /// Total hits across all lanes
    pub fn total_events(&self) -> usize {
        self.lanes.iter().map(DrumLane::len).sum()
    }

    /// Iterate over every hit, lane by lane
    pub fn events(&self) -> impl Iterator<Item = &DrumEvent> {
        self.lanes.iter().flat_map(|l| l.events.iter())
    }

    /// Beat at which the first covered variation starts
    pub fn start_beat(&self) -> f64 {
        grid::variation_offset(self.first_variation)
    }

    /// Beat at which the last covered variation ends
    pub fn end_beat(&self) -> f64 {
        self.start_beat() + self.variation_count as f64 * grid::PHRASE_BEATS
    }

    fn lane_index(instrument: Instrument) -> usize {
        Instrument::ALL
            .iter()
            .position(|&i| i == instrument)
            .unwrap_or_default()
    }
}
