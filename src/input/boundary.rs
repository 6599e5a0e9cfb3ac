use std::collections::HashMap;

/// Values entering the grid edge for one step, keyed by wire name. Lane `i`
/// feeds row `i` for horizontal wires and column `i` for vertical wires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryInput {
    lanes: HashMap<String, Vec<f64>>,
}

impl BoundaryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, wire: impl Into<String>, values: impl Into<Vec<f64>>) -> Self {
        self.set(wire, values);
        self
    }

    pub fn set(&mut self, wire: impl Into<String>, values: impl Into<Vec<f64>>) {
        self.lanes.insert(wire.into(), values.into());
    }

    pub fn set_lane(&mut self, wire: &str, lane: usize, value: f64) {
        let values = self.lanes.entry(wire.to_string()).or_default();
        if values.len() <= lane {
            values.resize(lane + 1, 0.0);
        }
        values[lane] = value;
    }

    /// Value for `wire` at `lane`; absent wires and lanes read as zero.
    pub fn value(&self, wire: &str, lane: usize) -> f64 {
        self.lanes
            .get(wire)
            .and_then(|values| values.get(lane))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn lanes(&self, wire: &str) -> Option<&[f64]> {
        self.lanes.get(wire).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Number of explicitly supplied values across every wire.
    pub fn value_count(&self) -> usize {
        self.lanes.values().map(Vec::len).sum()
    }
}

impl<K, V> FromIterator<(K, V)> for BoundaryInput
where
    K: Into<String>,
    V: Into<Vec<f64>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut input = Self::new();
        for (wire, values) in iter {
            input.set(wire, values);
        }
        input
    }
}
