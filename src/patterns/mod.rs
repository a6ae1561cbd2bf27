// Pattern Library
// Static one-bar templates, looked up by name or genre

mod catalog;
pub mod types;

pub use catalog::CATALOG;
pub use types::{PatternSummary, StepPattern, Steps, TemplateHit};

use crate::arranger::Genre;

/// Get a pattern by name (case-insensitive)
pub fn get_pattern(name: &str) -> Option<&'static StepPattern> {
    let name = name.trim().to_lowercase();
    CATALOG.iter().find(|p| p.name == name)
}

/// All patterns for one genre, theme first
pub fn patterns_for_genre(genre: Genre) -> impl Iterator<Item = &'static StepPattern> {
    CATALOG.iter().filter(move |p| p.genre == genre)
}

/// The theme bar a genre's phrases are built on
pub fn theme_for(genre: Genre) -> &'static StepPattern {
    // Every genre's first catalog entry is its theme; checked by the catalog tests
    patterns_for_genre(genre)
        .next()
        .unwrap_or(&CATALOG[0])
}

/// List all patterns with summaries
pub fn list_patterns() -> Vec<PatternSummary> {
    CATALOG.iter().map(StepPattern::summary).collect()
}
