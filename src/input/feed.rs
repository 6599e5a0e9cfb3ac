use std::collections::{BTreeMap, HashMap, VecDeque};

use super::BoundaryInput;

/// One value taken from a feed queue.
#[derive(Debug, Clone, PartialEq)]
pub struct FedValue {
    pub wire: String,
    pub lane: usize,
    pub value: f64,
}

/// Pending boundary values, queued per wire and per lane.
#[derive(Debug, Clone, Default)]
pub struct InputFeed {
    queues: HashMap<String, BTreeMap<usize, VecDeque<f64>>>,
}

impl InputFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `values` to the queue feeding `lane` of `wire`.
    pub fn push_lane(&mut self, wire: &str, lane: usize, values: impl IntoIterator<Item = f64>) {
        self.queues
            .entry(wire.to_string())
            .or_default()
            .entry(lane)
            .or_default()
            .extend(values);
    }

    /// Append `values` to lane 0 of `wire`.
    pub fn push(&mut self, wire: &str, values: impl IntoIterator<Item = f64>) {
        self.push_lane(wire, 0, values);
    }

    /// Pop one value from every non-empty lane queue.
    pub fn next_input(&mut self) -> BoundaryInput {
        to_input(&self.take_next())
    }

    /// Pop one value from every non-empty lane queue, reporting exactly what
    /// was taken so it can be handed back with [`InputFeed::restore`].
    pub fn take_next(&mut self) -> Vec<FedValue> {
        let mut taken = Vec::new();
        for (wire, lanes) in self.queues.iter_mut() {
            for (&lane, queue) in lanes.iter_mut() {
                if let Some(value) = queue.pop_front() {
                    taken.push(FedValue {
                        wire: wire.clone(),
                        lane,
                        value,
                    });
                }
            }
        }
        taken
    }

    /// Put previously taken values back at the front of their queues.
    pub fn restore(&mut self, taken: &[FedValue]) {
        for fed in taken.iter().rev() {
            self.queues
                .entry(fed.wire.clone())
                .or_default()
                .entry(fed.lane)
                .or_default()
                .push_front(fed.value);
        }
    }

    pub fn pending(&self, wire: &str) -> Vec<f64> {
        self.pending_lane(wire, 0)
    }

    pub fn pending_lane(&self, wire: &str, lane: usize) -> Vec<f64> {
        self.queues
            .get(wire)
            .and_then(|lanes| lanes.get(&lane))
            .map(|queue| queue.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn is_exhausted(&self) -> bool {
        self.queues
            .values()
            .all(|lanes| lanes.values().all(VecDeque::is_empty))
    }

    pub fn clear(&mut self) {
        self.queues.clear();
    }
}

/// Boundary input holding exactly the taken values; other lanes read as zero.
pub fn to_input(taken: &[FedValue]) -> BoundaryInput {
    let mut input = BoundaryInput::new();
    for fed in taken {
        input.set_lane(&fed.wire, fed.lane, fed.value);
    }
    input
}
