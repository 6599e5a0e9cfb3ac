//! Boundary input for the upstream edge of the grid.
//!
//! [`BoundaryInput`] is the per-step value map handed to `advance`.
//! [`InputFeed`] queues whole input sequences and hands them out one step at a
//! time. `sequence` holds pure helpers that reshape input sequences.

mod boundary;
mod feed;
mod sequence;

pub use boundary::BoundaryInput;
pub use feed::{FedValue, InputFeed, to_input};
pub use sequence::{interleave_delays, parse_numbers};
