// Fills - Bar-end ornaments and the weighted choice that picks them
// Bar B and bar C each draw exactly once from their genre's declared list

use serde::{Deserialize, Serialize};

/// A bar ornament appended (or rewritten) on top of the theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// One accented snare on the last sixteenth
    SnareAccent,

    /// Two kicks on 3.5 and 3.75
    DoubleKick,

    /// Three snares on 3.25, 3.5 and 3.75
    SnareRoll,

    /// Breakbeat rewrite: drop the downbeat kick and the beat-4 snare,
    /// add the syncopated kick/snare figure
    Amen,
}

impl Fill {
    /// Snake-case name used in logs and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Fill::SnareAccent => "snare_accent",
            Fill::DoubleKick => "double_kick",
            Fill::SnareRoll => "snare_roll",
            Fill::Amen => "amen",
        }
    }
}

/// An option with a relative weight
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weighted<T> {
    pub item: T,
    pub weight: f64,
}

impl<T> Weighted<T> {
    pub const fn new(item: T, weight: f64) -> Self {
        Weighted { item, weight }
    }
}

/// Bar B: snare accent or double kick, even odds
pub const BAR_B_MOVES: [Weighted<Fill>; 2] = [
    Weighted::new(Fill::SnareAccent, 0.5),
    Weighted::new(Fill::DoubleKick, 0.5),
];

/// Bar C for genres without the Amen rewrite
pub const STANDARD_FILLS: [Weighted<Fill>; 2] = [
    Weighted::new(Fill::SnareRoll, 0.5),
    Weighted::new(Fill::DoubleKick, 0.5),
];

/// Bar C for breakbeat-derived genres: Amen half the time, otherwise a
/// roll or double kick
pub const AMEN_FILLS: [Weighted<Fill>; 3] = [
    Weighted::new(Fill::Amen, 0.5),
    Weighted::new(Fill::SnareRoll, 0.25),
    Weighted::new(Fill::DoubleKick, 0.25),
];

/// Pick an option for a uniform draw `r` in [0, 1)
///
/// Options are laid out end to end in declaration order; `r` selects the
/// slot it lands in. Weights need not sum to one. Returns `None` only for an
/// empty list or one whose weights are all zero.
pub fn choose<T: Copy>(options: &[Weighted<T>], r: f64) -> Option<T> {
    let total: f64 = options.iter().map(|o| o.weight.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let target = r.clamp(0.0, 1.0) * total;
    let mut cumulative = 0.0;
    for option in options {
        cumulative += option.weight.max(0.0);
        if target < cumulative {
            return Some(option.item);
        }
    }

    // r == 1.0 or rounding at the top edge
    options.iter().rev().find(|o| o.weight > 0.0).map(|o| o.item)
}
