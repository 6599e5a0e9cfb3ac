use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Grid coordinate of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Grid axis a wire runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Propagation direction of a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    LeftRight,
    RightLeft,
    TopDown,
    BottomUp,
}

impl Direction {
    pub fn orientation(self) -> Orientation {
        match self {
            Direction::LeftRight | Direction::RightLeft => Orientation::Horizontal,
            Direction::TopDown | Direction::BottomUp => Orientation::Vertical,
        }
    }

    pub fn is_horizontal(self) -> bool {
        self.orientation() == Orientation::Horizontal
    }

    /// Neighbour that feeds `position` along this direction, or `None` when the
    /// cell sits on the upstream edge of a `rows x columns` grid.
    pub fn upstream(self, position: Position, rows: usize, columns: usize) -> Option<Position> {
        let Position { row, column } = position;
        match self {
            Direction::LeftRight => (column > 0).then(|| Position::new(row, column - 1)),
            Direction::RightLeft => {
                (column + 1 < columns).then(|| Position::new(row, column + 1))
            }
            Direction::TopDown => (row > 0).then(|| Position::new(row - 1, column)),
            Direction::BottomUp => (row + 1 < rows).then(|| Position::new(row + 1, column)),
        }
    }

    /// Neighbour that reads from `position` along this direction.
    pub fn downstream(self, position: Position, rows: usize, columns: usize) -> Option<Position> {
        self.reversed().upstream(position, rows, columns)
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::LeftRight => Direction::RightLeft,
            Direction::RightLeft => Direction::LeftRight,
            Direction::TopDown => Direction::BottomUp,
            Direction::BottomUp => Direction::TopDown,
        }
    }

    /// Index into the boundary input lane for a cell: the row for horizontal
    /// wires, the column for vertical ones.
    pub fn boundary_lane(self, position: Position) -> usize {
        match self.orientation() {
            Orientation::Horizontal => position.row,
            Orientation::Vertical => position.column,
        }
    }
}

/// Register initializer.
pub type InitFn = Arc<dyn Fn(Position) -> f64 + Send + Sync>;

/// Register or wire transition evaluated against a cell's current values.
pub type TransitionFn = Arc<dyn Fn(&CellValues<'_>, Position) -> f64 + Send + Sync>;

static ZERO: f64 = 0.0;

/// Evaluation context handed to transitions: every register's current value and
/// every wire's incoming value, looked up by name. Unknown names read as zero.
pub struct CellValues<'a> {
    slots: &'a HashMap<String, usize>,
    values: &'a [f64],
}

impl<'a> CellValues<'a> {
    pub(crate) fn new(slots: &'a HashMap<String, usize>, values: &'a [f64]) -> Self {
        Self { slots, values }
    }

    pub fn get(&self, name: &str) -> f64 {
        self[name]
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Index<&str> for CellValues<'_> {
    type Output = f64;

    fn index(&self, name: &str) -> &f64 {
        self.slots
            .get(name)
            .and_then(|&slot| self.values.get(slot))
            .unwrap_or(&ZERO)
    }
}

impl fmt::Debug for CellValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut entries: Vec<(&str, f64)> = self
            .slots
            .iter()
            .map(|(name, &slot)| (name.as_str(), self.values.get(slot).copied().unwrap_or(0.0)))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_map().entries(entries).finish()
    }
}
