// Pattern Catalog
// One-bar step templates per genre. The first pattern of each genre is the
// theme the phrase generator builds on; the rest can replace it.

use crate::arranger::Genre;
use crate::events::Instrument::{Clap, ClosedHat, Kick, OpenHat, Ride, Snare, Tom};
use super::types::StepPattern;

pub static CATALOG: &[StepPattern] = &[
    // ---------------------------------------------------------------- house
    StepPattern {
        name: "house_theme",
        genre: Genre::House,
        tags: &["theme", "four-on-the-floor", "broken"],
        description: "Four-on-the-floor with an extra kick on the and of 3",
        lanes: &[
            (Kick, [100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 100, 0, 100, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 110, 0, 0, 0, 0, 0, 0, 0, 110, 0, 0, 0]),
            (Clap, [0, 0, 0, 0, 110, 0, 0, 0, 0, 0, 0, 0, 110, 0, 0, 0]),
            (OpenHat, [0, 0, 100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 0, 100, 0]),
        ],
    },
    StepPattern {
        name: "classic_house",
        genre: Genre::House,
        tags: &["classic", "four-on-the-floor"],
        description: "Standard house beat with clap and hi-hats",
        lanes: &[
            (Kick, [100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 100, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0, 0]),
            (Clap, [0, 0, 0, 0, 90, 0, 0, 0, 0, 0, 0, 0, 90, 0, 0, 0]),
            (OpenHat, [0, 0, 0, 0, 0, 0, 0, 60, 0, 0, 0, 0, 0, 0, 0, 60]),
            (ClosedHat, [0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80]),
        ],
    },
    StepPattern {
        name: "deep_house_ride",
        genre: Genre::House,
        tags: &["deep", "ride"],
        description: "Deep house with ride cymbal groove",
        lanes: &[
            (Kick, [100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 80, 0, 0, 0, 0, 0, 0, 0, 80, 0, 0, 0]),
            (Clap, [0, 0, 0, 0, 70, 0, 0, 0, 0, 0, 0, 0, 70, 0, 0, 0]),
            (OpenHat, [0, 0, 0, 0, 0, 0, 0, 50, 0, 0, 0, 0, 0, 0, 0, 50]),
            (ClosedHat, [0, 60, 0, 60, 0, 60, 0, 60, 0, 60, 0, 60, 0, 60, 0, 60]),
            (Ride, [80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0]),
        ],
    },
    StepPattern {
        name: "funky_house",
        genre: Genre::House,
        tags: &["funky", "syncopated"],
        description: "Funky house with offbeat claps and ghost snares",
        lanes: &[
            (Kick, [100, 0, 0, 90, 0, 0, 100, 0, 0, 0, 100, 0, 0, 90, 0, 0]),
            (Snare, [0, 0, 0, 0, 100, 0, 40, 0, 0, 0, 0, 0, 100, 0, 40, 0]),
            (Clap, [0, 0, 0, 80, 0, 0, 0, 80, 0, 0, 0, 80, 0, 0, 0, 80]),
            (OpenHat, [0, 0, 0, 0, 0, 0, 0, 60, 0, 0, 0, 0, 0, 0, 0, 60]),
            (ClosedHat, [0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80]),
        ],
    },
    StepPattern {
        name: "tribal_house",
        genre: Genre::House,
        tags: &["tribal", "percussive"],
        description: "Tribal house with heavy tom usage",
        lanes: &[
            (Kick, [100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 0]),
            (Tom, [0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80]),
            (Clap, [0, 0, 0, 0, 90, 0, 0, 0, 0, 0, 0, 0, 90, 0, 0, 0]),
            (ClosedHat, [0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70]),
        ],
    },
    // --------------------------------------------------------------- breaks
    StepPattern {
        name: "breaks_theme",
        genre: Genre::Breaks,
        tags: &["theme", "two-step", "ghost-snares"],
        description: "Two-step break with ghost snares and straight 8th hats",
        lanes: &[
            (Kick, [100, 0, 0, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 110, 70, 0, 0, 0, 0, 0, 70, 110, 0, 0, 0]),
            (ClosedHat, [100, 0, 100, 0, 100, 0, 100, 0, 100, 0, 100, 0, 100, 0, 100, 0]),
        ],
    },
    StepPattern {
        name: "breaks_ride",
        genre: Genre::Breaks,
        tags: &["ride", "open"],
        description: "Two-step break riding the cymbal instead of the hats",
        lanes: &[
            (Kick, [100, 0, 0, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 110, 70, 0, 0, 0, 0, 0, 70, 110, 0, 0, 0]),
            (Ride, [90, 0, 70, 0, 90, 0, 70, 0, 90, 0, 70, 0, 90, 0, 70, 0]),
        ],
    },
    // ------------------------------------------------------------------ ukg
    StepPattern {
        name: "ukg_theme",
        genre: Genre::Ukg,
        tags: &["theme", "2-step", "swung"],
        description: "2-step garage with a swung hat before beat 3",
        lanes: &[
            (Kick, [100, 0, 0, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 110, 0, 0, 0, 0, 0, 0, 0, 110, 0, 0, 0]),
            (Clap, [0, 0, 0, 0, 110, 0, 0, 0, 0, 0, 0, 0, 110, 0, 0, 0]),
            (ClosedHat, [90, 0, 0, 0, 90, 0, 0, 0, 90, 80, 0, 0, 90, 0, 0, 0]),
            (OpenHat, [0, 0, 100, 0, 0, 0, 100, 0, 0, 0, 0, 0, 0, 0, 100, 0]),
        ],
    },
    StepPattern {
        name: "speed_garage",
        genre: Genre::Ukg,
        tags: &["speed-garage", "double-kick"],
        description: "Speed garage with four-to-the-floor kicks and open hats",
        lanes: &[
            (Kick, [100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 0, 100, 0, 0, 90]),
            (Snare, [0, 0, 0, 0, 100, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0, 0]),
            (OpenHat, [0, 0, 80, 0, 0, 0, 80, 0, 0, 0, 80, 0, 0, 0, 80, 0]),
            (ClosedHat, [0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70]),
        ],
    },
    StepPattern {
        name: "dark_garage",
        genre: Genre::Ukg,
        tags: &["dark", "sparse"],
        description: "Dark garage with sparse kicks and eerie hi-hats",
        lanes: &[
            (Kick, [100, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 90, 0, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 90, 0, 0, 0, 0, 0, 0, 0, 90, 0, 0, 0]),
            (ClosedHat, [0, 0, 50, 0, 0, 0, 50, 60, 0, 0, 50, 0, 0, 0, 50, 60]),
        ],
    },
    // ------------------------------------------------------------------ dnb
    StepPattern {
        name: "dnb_theme",
        genre: Genre::Dnb,
        tags: &["theme", "two-step", "ghost-snares"],
        description: "Two-step with ghost snares and alternating 16th hats",
        lanes: &[
            (Kick, [100, 0, 0, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 110, 70, 0, 0, 0, 0, 0, 70, 110, 0, 0, 0]),
            (ClosedHat, [100, 60, 100, 60, 100, 60, 100, 60, 100, 60, 100, 60, 100, 60, 100, 60]),
        ],
    },
    StepPattern {
        name: "liquid_funk",
        genre: Genre::Dnb,
        tags: &["liquid-funk", "ride"],
        description: "Liquid funk with smooth ride cymbals",
        lanes: &[
            (Kick, [100, 0, 0, 0, 0, 0, 100, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 80, 0, 0, 0, 0, 0, 0, 0, 80, 0, 0, 0]),
            (ClosedHat, [0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70]),
            (Ride, [0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80, 0, 80]),
        ],
    },
    StepPattern {
        name: "dnb_halftime",
        genre: Genre::Dnb,
        tags: &["half-time"],
        description: "Half-time groove with a single backbeat snare",
        lanes: &[
            (Kick, [100, 0, 0, 0, 0, 0, 100, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            (Snare, [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 100, 0, 0, 0]),
            (ClosedHat, [0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70, 0, 70]),
        ],
    },
];
