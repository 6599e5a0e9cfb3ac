//! Simulation kernel for systolic arrays.
//!
//! A [`Descriptor`] declares a rectangular grid of identical cells, each with
//! named registers and directional wires to its neighbours. Snapshots
//! ([`SystolicArrayState`]) are immutable; [`SystolicArrayState::advance`]
//! produces the next one in two phases, propagation then update. The layout
//! and render modules turn a snapshot into positioned draw operations for any
//! [`Surface`] backend, and [`Simulation`] drives a snapshot from queued
//! boundary input with rewind history and output probes.

pub mod automaton;
pub mod descriptor;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod presets;
pub mod render;
pub mod simulation;
pub mod trace;
pub mod width;

pub use automaton::ElementaryCa;
pub use descriptor::{
    CellValues, Descriptor, DescriptorSpec, Direction, Init, Orientation, Position, RegisterDef,
    RegisterSpec, Transition, WireDef, WireSpec, normalize,
};
pub use error::{DescriptorIssue, Error, Result};
pub use geometry::{Point, Rect, Segment, Size};
pub use grid::{Cell, SystolicArrayState, WireState};
pub use input::{BoundaryInput, InputFeed, interleave_delays, parse_numbers};
pub use layout::{ArrayLayout, LayoutConfig, WireAnchors, cell_size, preferred_size};
pub use logging::{LogEvent, LogFields, LogLevel, Logger, LoggingError, LoggingResult};
pub use metrics::{MetricSnapshot, SimulationMetrics};
pub use presets::{Preset, PresetInput};
pub use render::{DrawOp, Scene, Surface, TextOp, format_value};
pub use simulation::{Probe, Simulation, SimulationConfig, StepOutcome};
pub use trace::{
    LoggerTrace, NullTrace, RecordingTrace, StateTrace, TraceEvent, TraceEventBuilder, TraceStage,
};
pub use width::display_width;
