// Groove Engine - Step grid, swing and humanization
// Timing rules shared by the composer and the post-composition pass

pub mod grid;
pub mod humanize;

pub use grid::Swing;
pub use humanize::{humanize, HumanizeSettings};
