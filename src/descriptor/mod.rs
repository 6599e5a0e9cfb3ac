//! Descriptor module orchestrator.
//!
//! A descriptor declares the shape of a systolic array: grid dimensions, the
//! per-cell registers and the directional wires between neighbouring cells.
//! Callers assemble a [`DescriptorSpec`] (optional fields, literal or computed
//! transitions) and [`normalize`] it into a [`Descriptor`] whose every field is
//! filled in and whose transitions share one uniform signature.

mod core;
mod values;

pub use core::{
    Descriptor, DescriptorSpec, Init, RegisterDef, RegisterSpec, Transition, WireDef, WireSpec,
    normalize,
};
pub use values::{CellValues, Direction, InitFn, Orientation, Position, TransitionFn};
