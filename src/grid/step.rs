use std::sync::Arc;

use crate::descriptor::{CellValues, Position};
use crate::input::BoundaryInput;
use crate::trace::{StateTrace, TraceStage};

use super::cell::Cell;
use super::state::SystolicArrayState;

impl SystolicArrayState {
    /// Produce the snapshot for the next step.
    ///
    /// Propagation runs over the whole grid before any transition is
    /// evaluated, so every cell reads values from exactly the previous step.
    /// The descriptor is assumed valid; stepping never fails.
    pub fn advance(&self, input: &BoundaryInput) -> Self {
        let mut cells = self.propagate(input);
        self.update(&mut cells);
        Self {
            descriptor: Arc::clone(&self.descriptor),
            step: self.step + 1,
            cells,
        }
    }

    /// `advance`, reporting the new snapshot to `trace`.
    pub fn advance_traced(&self, input: &BoundaryInput, trace: &dyn StateTrace) -> Self {
        let next = self.advance(input);
        next.report(TraceStage::Advanced, trace);
        next
    }

    /// Phase 1: each wire's incoming value is the tail of the upstream
    /// neighbour's delay line, or the boundary lane on the upstream edge.
    /// Registers and delay lines are carried over unchanged.
    fn propagate(&self, input: &BoundaryInput) -> Vec<Vec<Cell>> {
        let descriptor = &self.descriptor;
        let (rows, columns) = (descriptor.rows(), descriptor.columns());

        self.cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let position = cell.position();
                        let wires = descriptor
                            .wires()
                            .iter()
                            .zip(&cell.wires)
                            .enumerate()
                            .map(|(index, (def, wire))| {
                                let direction = def.direction();
                                let incoming = match direction.upstream(position, rows, columns) {
                                    Some(prev) => self.cells[prev.row][prev.column].wires[index].tail(),
                                    None => input.value(def.name(), direction.boundary_lane(position)),
                                };
                                wire.with_incoming(incoming)
                            })
                            .collect();
                        Cell::new(position, cell.registers.clone(), wires)
                    })
                    .collect()
            })
            .collect()
    }

    /// Phase 2: evaluate every transition against the cell's registers and
    /// freshly propagated wire inputs, then push wire results into the delay
    /// lines.
    fn update(&self, cells: &mut [Vec<Cell>]) {
        let descriptor = &self.descriptor;
        for cell in cells.iter_mut().flatten() {
            let position: Position = cell.position();
            let slots = cell.slot_values();
            let values = CellValues::new(descriptor.slots(), &slots);

            cell.registers = descriptor
                .registers()
                .iter()
                .map(|r| r.next_value(&values, position))
                .collect();
            for (def, wire) in descriptor.wires().iter().zip(cell.wires.iter_mut()) {
                wire.push(def.next_value(&values, position));
            }
        }
    }
}
