use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{DescriptorIssue, Result};

use super::values::{CellValues, Direction, InitFn, Position, TransitionFn};

/// Register initializer as supplied by the caller: a literal or a function of
/// the cell position.
#[derive(Clone)]
pub enum Init {
    Value(f64),
    Compute(InitFn),
}

impl Init {
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(Position) -> f64 + Send + Sync + 'static,
    {
        Self::Compute(Arc::new(f))
    }

    fn into_fn(self) -> InitFn {
        match self {
            Init::Value(value) => Arc::new(move |_| value),
            Init::Compute(f) => f,
        }
    }
}

impl From<f64> for Init {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for Init {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Init::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Init::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

/// Transition as supplied by the caller: a literal or a function of the cell's
/// current values.
#[derive(Clone)]
pub enum Transition {
    Value(f64),
    Compute(TransitionFn),
}

impl Transition {
    pub fn compute<F>(f: F) -> Self
    where
        F: Fn(&CellValues<'_>, Position) -> f64 + Send + Sync + 'static,
    {
        Self::Compute(Arc::new(f))
    }

    fn into_fn(self) -> TransitionFn {
        match self {
            Transition::Value(value) => Arc::new(move |_, _| value),
            Transition::Compute(f) => f,
        }
    }
}

impl From<f64> for Transition {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Transition::Compute(_) => f.write_str("Compute(..)"),
        }
    }
}

fn pass_through(name: &str) -> TransitionFn {
    let name = name.to_string();
    Arc::new(move |values, _| values.get(&name))
}

/// Caller-side register declaration.
#[derive(Debug, Clone)]
pub struct RegisterSpec {
    pub name: String,
    pub init: Option<Init>,
    pub transition: Option<Transition>,
}

impl RegisterSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            init: None,
            transition: None,
        }
    }

    pub fn init(mut self, init: impl Into<Init>) -> Self {
        self.init = Some(init.into());
        self
    }

    pub fn init_with<F>(self, f: F) -> Self
    where
        F: Fn(Position) -> f64 + Send + Sync + 'static,
    {
        self.init(Init::compute(f))
    }

    pub fn transition(mut self, transition: impl Into<Transition>) -> Self {
        self.transition = Some(transition.into());
        self
    }

    pub fn transition_with<F>(self, f: F) -> Self
    where
        F: Fn(&CellValues<'_>, Position) -> f64 + Send + Sync + 'static,
    {
        self.transition(Transition::compute(f))
    }
}

/// Caller-side wire declaration. Omitted fields default to left-to-right,
/// delay 1 and a pass-through transition.
#[derive(Debug, Clone)]
pub struct WireSpec {
    pub name: String,
    pub direction: Option<Direction>,
    pub delay: Option<usize>,
    pub transition: Option<Transition>,
}

impl WireSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: None,
            delay: None,
            transition: None,
        }
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn delay(mut self, delay: usize) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn transition(mut self, transition: impl Into<Transition>) -> Self {
        self.transition = Some(transition.into());
        self
    }

    pub fn transition_with<F>(self, f: F) -> Self
    where
        F: Fn(&CellValues<'_>, Position) -> f64 + Send + Sync + 'static,
    {
        self.transition(Transition::compute(f))
    }
}

/// Raw descriptor as assembled by a caller. Dimensions default to 1 and the
/// start index to 0 when omitted.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSpec {
    pub row_count: Option<usize>,
    pub column_count: Option<usize>,
    pub start_index: Option<i64>,
    pub registers: Vec<RegisterSpec>,
    pub wires: Vec<WireSpec>,
}

impl DescriptorSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grid(rows: usize, columns: usize) -> Self {
        Self::new().rows(rows).columns(columns)
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.row_count = Some(rows);
        self
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.column_count = Some(columns);
        self
    }

    pub fn start_index(mut self, start: i64) -> Self {
        self.start_index = Some(start);
        self
    }

    pub fn register(mut self, register: RegisterSpec) -> Self {
        self.registers.push(register);
        self
    }

    pub fn wire(mut self, wire: WireSpec) -> Self {
        self.wires.push(wire);
        self
    }

    pub fn normalize(self) -> Result<Descriptor> {
        normalize(self)
    }
}

/// Normalized register: name plus uniform init/transition functions.
#[derive(Clone)]
pub struct RegisterDef {
    name: String,
    init: InitFn,
    transition: TransitionFn,
}

impl RegisterDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn initial_value(&self, position: Position) -> f64 {
        (self.init)(position)
    }

    pub fn next_value(&self, values: &CellValues<'_>, position: Position) -> f64 {
        (self.transition)(values, position)
    }
}

impl fmt::Debug for RegisterDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterDef")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Normalized wire.
#[derive(Clone)]
pub struct WireDef {
    name: String,
    direction: Direction,
    delay: usize,
    transition: TransitionFn,
}

impl WireDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn delay(&self) -> usize {
        self.delay
    }

    /// Length of the outgoing delay line.
    pub fn line_len(&self) -> usize {
        self.delay.max(1)
    }

    pub fn is_horizontal(&self) -> bool {
        self.direction.is_horizontal()
    }

    pub fn next_value(&self, values: &CellValues<'_>, position: Position) -> f64 {
        (self.transition)(values, position)
    }
}

impl fmt::Debug for WireDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WireDef")
            .field("name", &self.name)
            .field("direction", &self.direction)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// Fully populated descriptor. Value slots are laid out registers first, then
/// wires, in declaration order.
#[derive(Clone)]
pub struct Descriptor {
    rows: usize,
    columns: usize,
    start_index: i64,
    registers: Vec<RegisterDef>,
    wires: Vec<WireDef>,
    slots: HashMap<String, usize>,
}

impl Descriptor {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start_index(&self) -> i64 {
        self.start_index
    }

    pub fn registers(&self) -> &[RegisterDef] {
        &self.registers
    }

    pub fn wires(&self) -> &[WireDef] {
        &self.wires
    }

    pub fn register_index(&self, name: &str) -> Option<usize> {
        self.registers.iter().position(|r| r.name == name)
    }

    pub fn wire_index(&self, name: &str) -> Option<usize> {
        self.wires.iter().position(|w| w.name == name)
    }

    pub fn wire(&self, name: &str) -> Option<&WireDef> {
        self.wires.iter().find(|w| w.name == name)
    }

    pub fn slot_count(&self) -> usize {
        self.registers.len() + self.wires.len()
    }

    pub(crate) fn slots(&self) -> &HashMap<String, usize> {
        &self.slots
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.column < self.columns
    }

    /// Row-major iterator over every grid position.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.columns).map(move |column| Position::new(row, column)))
    }

    /// Creation-time check deferred out of `normalize` so descriptors can be
    /// inspected before they are instantiated.
    pub fn check_delays(&self) -> Result<()> {
        if let Some(wire) = self.wires.iter().find(|w| w.delay < 1) {
            return Err(DescriptorIssue::WireDelay {
                name: wire.name.clone(),
                delay: wire.delay,
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .field("start_index", &self.start_index)
            .field("registers", &self.registers)
            .field("wires", &self.wires)
            .finish()
    }
}

/// Validate a caller-supplied descriptor and fill every default.
pub fn normalize(spec: DescriptorSpec) -> Result<Descriptor> {
    let rows = spec.row_count.unwrap_or(1);
    if rows < 1 {
        return Err(DescriptorIssue::RowCount(rows).into());
    }
    let columns = spec.column_count.unwrap_or(1);
    if columns < 1 {
        return Err(DescriptorIssue::ColumnCount(columns).into());
    }

    let mut seen = HashSet::new();
    let mut registers = Vec::with_capacity(spec.registers.len());
    for (index, register) in spec.registers.into_iter().enumerate() {
        if register.name.is_empty() {
            return Err(DescriptorIssue::RegisterName {
                index,
                name: register.name,
            }
            .into());
        }
        if !seen.insert(register.name.clone()) {
            return Err(DescriptorIssue::DuplicateName(register.name).into());
        }
        let transition = register
            .transition
            .map(Transition::into_fn)
            .unwrap_or_else(|| pass_through(&register.name));
        registers.push(RegisterDef {
            init: register.init.unwrap_or(Init::Value(0.0)).into_fn(),
            transition,
            name: register.name,
        });
    }

    let mut wires = Vec::with_capacity(spec.wires.len());
    for (index, wire) in spec.wires.into_iter().enumerate() {
        if wire.name.is_empty() {
            return Err(DescriptorIssue::WireName {
                index,
                name: wire.name,
            }
            .into());
        }
        if !seen.insert(wire.name.clone()) {
            return Err(DescriptorIssue::DuplicateName(wire.name).into());
        }
        let transition = wire
            .transition
            .map(Transition::into_fn)
            .unwrap_or_else(|| pass_through(&wire.name));
        wires.push(WireDef {
            direction: wire.direction.unwrap_or_default(),
            delay: wire.delay.unwrap_or(1),
            transition,
            name: wire.name,
        });
    }

    let slots = registers
        .iter()
        .map(|r| r.name.clone())
        .chain(wires.iter().map(|w| w.name.clone()))
        .enumerate()
        .map(|(slot, name)| (name, slot))
        .collect();

    Ok(Descriptor {
        rows,
        columns,
        start_index: spec.start_index.unwrap_or(0),
        registers,
        wires,
        slots,
    })
}
