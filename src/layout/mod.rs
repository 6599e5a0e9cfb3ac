//! Layout geometry for drawing a systolic array.
//!
//! Everything here is derived from the descriptor alone, never from cell
//! values, so canvas size stays fixed while a simulation animates. Rendering
//! backends read positions from [`ArrayLayout`] and only fetch the printed
//! values from the current snapshot.

mod anchors;
mod config;
mod sizing;

pub use anchors::{
    ArrayLayout, Baseline, BoundaryMarker, DelayMarker, LabelAnchor, TextAlign, WireAnchors,
};
pub use config::LayoutConfig;
pub use sizing::{WireCensus, cell_size, preferred_size};
