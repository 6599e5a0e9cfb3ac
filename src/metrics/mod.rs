use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters accumulated by a running simulation.
#[derive(Debug, Default, Clone)]
pub struct SimulationMetrics {
    steps: u64,
    cells_updated: u64,
    boundary_values: u64,
    unchanged_steps: u64,
    rewinds: u64,
}

impl SimulationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_step(&mut self, cells: usize, boundary_values: usize, changed: bool) {
        self.steps = self.steps.saturating_add(1);
        self.cells_updated = self.cells_updated.saturating_add(cells as u64);
        self.boundary_values = self.boundary_values.saturating_add(boundary_values as u64);
        if !changed {
            self.unchanged_steps = self.unchanged_steps.saturating_add(1);
        }
    }

    pub fn record_rewind(&mut self) {
        self.rewinds = self.rewinds.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            steps: self.steps,
            cells_updated: self.cells_updated,
            boundary_values: self.boundary_values,
            unchanged_steps: self.unchanged_steps,
            rewinds: self.rewinds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub steps: u64,
    pub cells_updated: u64,
    pub boundary_values: u64,
    pub unchanged_steps: u64,
    pub rewinds: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "simulation_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("steps".to_string(), json!(self.steps));
        map.insert("cells_updated".to_string(), json!(self.cells_updated));
        map.insert("boundary_values".to_string(), json!(self.boundary_values));
        map.insert("unchanged_steps".to_string(), json!(self.unchanged_steps));
        map.insert("rewinds".to_string(), json!(self.rewinds));
        map
    }
}
