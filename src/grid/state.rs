use std::fmt;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::descriptor::{Descriptor, DescriptorSpec, Position};
use crate::error::Result;
use crate::trace::{StateTrace, TraceEventBuilder, TraceStage};

use super::cell::{Cell, WireState};

/// Immutable snapshot of a systolic array at one step.
#[derive(Debug, Clone)]
pub struct SystolicArrayState {
    pub(super) descriptor: Arc<Descriptor>,
    pub(super) step: u64,
    pub(super) cells: Vec<Vec<Cell>>,
}

impl SystolicArrayState {
    /// Build the step-0 grid. Registers take their `init` value, wires start
    /// with a zero incoming value and a delay line of zeros.
    pub fn create(descriptor: impl Into<Arc<Descriptor>>) -> Result<Self> {
        let descriptor = descriptor.into();
        descriptor.check_delays()?;

        let cells = (0..descriptor.rows())
            .map(|row| {
                (0..descriptor.columns())
                    .map(|column| {
                        let position = Position::new(row, column);
                        let registers = descriptor
                            .registers()
                            .iter()
                            .map(|r| r.initial_value(position))
                            .collect();
                        let wires = descriptor
                            .wires()
                            .iter()
                            .map(|w| WireState::idle(w.line_len()))
                            .collect();
                        Cell::new(position, registers, wires)
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            descriptor,
            step: 0,
            cells,
        })
    }

    /// Normalize `spec` and build its step-0 grid.
    pub fn from_spec(spec: DescriptorSpec) -> Result<Self> {
        Self::create(spec.normalize()?)
    }

    /// `create`, reporting the new snapshot to `trace`.
    pub fn create_traced(
        descriptor: impl Into<Arc<Descriptor>>,
        trace: &dyn StateTrace,
    ) -> Result<Self> {
        let state = Self::create(descriptor)?;
        state.report(TraceStage::Created, trace);
        Ok(state)
    }

    pub(super) fn report(&self, stage: TraceStage, trace: &dyn StateTrace) {
        let mut builder = TraceEventBuilder::new(stage, self.step);
        builder
            .detail("rows", json!(self.descriptor.rows()))
            .detail("columns", json!(self.descriptor.columns()))
            .detail("cells", self.to_json());
        trace.record(builder.finish());
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn shared_descriptor(&self) -> Arc<Descriptor> {
        Arc::clone(&self.descriptor)
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().flatten()
    }

    pub fn cell(&self, position: Position) -> Option<&Cell> {
        self.cells
            .get(position.row)
            .and_then(|row| row.get(position.column))
    }

    pub fn register(&self, position: Position, name: &str) -> Option<f64> {
        let index = self.descriptor.register_index(name)?;
        self.cell(position)?.register(index)
    }

    pub fn wire(&self, position: Position, name: &str) -> Option<&WireState> {
        let index = self.descriptor.wire_index(name)?;
        self.cell(position)?.wire(index)
    }

    /// Register values of one row, in column order.
    pub fn register_row(&self, row: usize, name: &str) -> Vec<f64> {
        let Some(index) = self.descriptor.register_index(name) else {
            return Vec::new();
        };
        self.cells
            .get(row)
            .map(|cells| cells.iter().filter_map(|c| c.register(index)).collect())
            .unwrap_or_default()
    }

    /// Grid contents as nested JSON arrays of cell objects.
    pub fn to_json(&self) -> Value {
        Value::Array(
            self.cells
                .iter()
                .map(|row| {
                    Value::Array(row.iter().map(|c| c.to_json(&self.descriptor)).collect())
                })
                .collect(),
        )
    }

    /// Content hash of every register and wire value, independent of the step
    /// counter. Equal fingerprints mean a redraw would paint the same values.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = blake3::Hasher::new();
        for cell in self.cells() {
            for value in cell.registers() {
                hasher.update(&value.to_le_bytes());
            }
            for wire in cell.wires() {
                hasher.update(&wire.incoming().to_le_bytes());
                for value in wire.outgoing() {
                    hasher.update(&value.to_le_bytes());
                }
            }
        }
        hasher.finalize()
    }
}

impl fmt::Display for SystolicArrayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}", self.step)?;
        for row in &self.cells {
            writeln!(f)?;
            for cell in row {
                write!(f, "\t{}", cell.to_json(&self.descriptor))?;
            }
        }
        Ok(())
    }
}
