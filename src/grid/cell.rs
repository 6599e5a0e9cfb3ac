use serde_json::{Map, Value, json};

use crate::descriptor::{Descriptor, Position};

/// One wire's view from inside a cell: the value read from upstream this step
/// and the outgoing delay line. Slot 0 of the line is the newest value, the
/// last slot is what the downstream neighbour reads next.
#[derive(Debug, Clone, PartialEq)]
pub struct WireState {
    incoming: f64,
    outgoing: Vec<f64>,
}

impl WireState {
    pub(crate) fn idle(line_len: usize) -> Self {
        Self {
            incoming: 0.0,
            outgoing: vec![0.0; line_len.max(1)],
        }
    }

    pub(crate) fn with_incoming(&self, incoming: f64) -> Self {
        Self {
            incoming,
            outgoing: self.outgoing.clone(),
        }
    }

    /// Push `head` into the delay line, dropping the oldest slot.
    pub(crate) fn push(&mut self, head: f64) {
        self.outgoing.pop();
        self.outgoing.insert(0, head);
    }

    pub fn incoming(&self) -> f64 {
        self.incoming
    }

    pub fn outgoing(&self) -> &[f64] {
        &self.outgoing
    }

    pub fn head(&self) -> f64 {
        self.outgoing.first().copied().unwrap_or(0.0)
    }

    pub fn tail(&self) -> f64 {
        self.outgoing.last().copied().unwrap_or(0.0)
    }
}

/// Contents of one processing cell, index-aligned with the descriptor's
/// register and wire lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    position: Position,
    pub(crate) registers: Vec<f64>,
    pub(crate) wires: Vec<WireState>,
}

impl Cell {
    pub(crate) fn new(position: Position, registers: Vec<f64>, wires: Vec<WireState>) -> Self {
        Self {
            position,
            registers,
            wires,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn registers(&self) -> &[f64] {
        &self.registers
    }

    pub fn wires(&self) -> &[WireState] {
        &self.wires
    }

    pub fn register(&self, index: usize) -> Option<f64> {
        self.registers.get(index).copied()
    }

    pub fn wire(&self, index: usize) -> Option<&WireState> {
        self.wires.get(index)
    }

    /// Evaluation slots: register values followed by wire incoming values.
    pub(crate) fn slot_values(&self) -> Vec<f64> {
        self.registers
            .iter()
            .copied()
            .chain(self.wires.iter().map(WireState::incoming))
            .collect()
    }

    pub fn to_json(&self, descriptor: &Descriptor) -> Value {
        let mut map = Map::new();
        for (def, value) in descriptor.registers().iter().zip(&self.registers) {
            map.insert(def.name().to_string(), json!(value));
        }
        for (def, wire) in descriptor.wires().iter().zip(&self.wires) {
            map.insert(
                def.name().to_string(),
                json!({ "in": wire.incoming, "out": wire.outgoing }),
            );
        }
        Value::Object(map)
    }
}
