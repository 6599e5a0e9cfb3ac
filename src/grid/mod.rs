//! Systolic array snapshots.
//!
//! `state` owns grid construction and inspection, `step` owns the two-phase
//! transition from one snapshot to the next. Snapshots are immutable: every
//! call to `advance` allocates a fresh grid and leaves its input untouched.

mod cell;
mod state;
mod step;

pub use cell::{Cell, WireState};
pub use state::SystolicArrayState;
