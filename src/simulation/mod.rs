//! Step-by-step driver around [`SystolicArrayState`].
//!
//! A [`Simulation`] owns the current snapshot together with the boundary
//! feed, a bounded rewind history and any probes attached to wires. Each call
//! to [`Simulation::step`] pops one value per fed lane, advances the grid and
//! reports whether anything visible changed.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use crate::descriptor::{Descriptor, DescriptorSpec, Position};
use crate::error::{Error, Result};
use crate::grid::SystolicArrayState;
use crate::input::{BoundaryInput, FedValue, InputFeed, to_input};
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::{MetricSnapshot, SimulationMetrics};
use crate::presets::Preset;
use crate::trace::LoggerTrace;

const STEP_TARGET: &str = "systolic::simulation";
const STATE_TARGET: &str = "systolic::simulation.state";

/// Configuration for a [`Simulation`].
#[derive(Clone)]
pub struct SimulationConfig {
    /// Snapshots kept for [`Simulation::rewind`]. Zero disables rewinding.
    pub history_limit: usize,
    /// Optional structured logger used by the driver.
    pub logger: Option<Logger>,
    /// Forward every new snapshot to `logger` as a trace event.
    pub trace_states: bool,
    /// Metrics accumulator shared with the caller.
    pub metrics: Option<Arc<Mutex<SimulationMetrics>>>,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            history_limit: 64,
            logger: None,
            trace_states: false,
            metrics: None,
            metrics_target: "systolic::simulation.metrics".to_string(),
        }
    }
}

impl SimulationConfig {
    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(SimulationMetrics::new())));
        }
    }

    pub fn disable_metrics(&mut self) {
        self.metrics = None;
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<SimulationMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Samples one slot of a wire's delay line at a fixed cell after every step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub name: String,
    pub wire: String,
    pub position: Position,
    pub slot: usize,
}

impl Probe {
    /// Probe reading the head of `wire`'s delay line at `position`.
    pub fn new(name: impl Into<String>, wire: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            wire: wire.into(),
            position,
            slot: 0,
        }
    }

    pub fn slot(mut self, slot: usize) -> Self {
        self.slot = slot;
        self
    }

    fn sample(&self, state: &SystolicArrayState) -> f64 {
        state
            .wire(self.position, &self.wire)
            .and_then(|wire| wire.outgoing().get(self.slot).copied())
            .unwrap_or(0.0)
    }
}

/// Result of a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: u64,
    /// `false` when every register and wire value equals the previous step's.
    pub changed: bool,
}

struct HistoryEntry {
    state: SystolicArrayState,
    consumed: Vec<FedValue>,
}

pub struct Simulation {
    state: SystolicArrayState,
    fingerprint: blake3::Hash,
    feed: InputFeed,
    history: VecDeque<HistoryEntry>,
    probes: Vec<Probe>,
    outputs: HashMap<String, Vec<f64>>,
    config: SimulationConfig,
    trace: Option<LoggerTrace>,
    started: Instant,
}

impl Simulation {
    pub fn new(descriptor: impl Into<Arc<Descriptor>>, config: SimulationConfig) -> Result<Self> {
        let trace = match (&config.logger, config.trace_states) {
            (Some(logger), true) => {
                Some(LoggerTrace::new(logger.clone()).with_target(STATE_TARGET))
            }
            _ => None,
        };
        let descriptor = descriptor.into();
        let state = match &trace {
            Some(trace) => SystolicArrayState::create_traced(descriptor, trace)?,
            None => SystolicArrayState::create(descriptor)?,
        };

        Ok(Self {
            fingerprint: state.fingerprint(),
            state,
            feed: InputFeed::new(),
            history: VecDeque::new(),
            probes: Vec::new(),
            outputs: HashMap::new(),
            config,
            trace,
            started: Instant::now(),
        })
    }

    pub fn from_spec(spec: DescriptorSpec, config: SimulationConfig) -> Result<Self> {
        Self::new(spec.normalize()?, config)
    }

    /// Build a simulation for `preset`, queueing its inputs and attaching its probe.
    pub fn from_preset(preset: Preset, config: SimulationConfig) -> Result<Self> {
        let mut simulation = Self::from_spec(preset.spec, config)?;
        for input in preset.inputs {
            simulation.feed_lane(&input.wire, input.lane, input.values)?;
        }
        if let Some(probe) = preset.probe {
            simulation.add_probe(probe)?;
        }
        Ok(simulation)
    }

    pub fn state(&self) -> &SystolicArrayState {
        &self.state
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn step_count(&self) -> u64 {
        self.state.step()
    }

    /// Queue values for lane 0 of `wire`.
    pub fn feed<I>(&mut self, wire: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = f64>,
    {
        self.feed_lane(wire, 0, values)
    }

    /// Queue values for one boundary lane of `wire`.
    pub fn feed_lane<I>(&mut self, wire: &str, lane: usize, values: I) -> Result<()>
    where
        I: IntoIterator<Item = f64>,
    {
        self.known_wire(wire)?;
        self.feed.push_lane(wire, lane, values);
        Ok(())
    }

    /// Values still waiting on lane 0 of `wire`.
    pub fn pending(&self, wire: &str) -> Vec<f64> {
        self.feed.pending(wire)
    }

    pub fn is_exhausted(&self) -> bool {
        self.feed.is_exhausted()
    }

    pub fn add_probe(&mut self, probe: Probe) -> Result<()> {
        self.known_wire(&probe.wire)?;
        self.outputs.entry(probe.name.clone()).or_default();
        self.probes.push(probe);
        Ok(())
    }

    /// Samples recorded by the probe called `name`, one per step.
    pub fn outputs(&self, name: &str) -> &[f64] {
        self.outputs.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Advance one step using the next queued value of every fed lane.
    pub fn step(&mut self) -> StepOutcome {
        let consumed = self.feed.take_next();
        let input = to_input(&consumed);
        self.apply(&input, consumed)
    }

    /// Advance one step with an explicit boundary input, bypassing the feed.
    pub fn step_with(&mut self, input: &BoundaryInput) -> StepOutcome {
        self.apply(input, Vec::new())
    }

    /// Advance `steps` times and return the last outcome.
    pub fn run(&mut self, steps: usize) -> StepOutcome {
        let mut outcome = StepOutcome {
            step: self.state.step(),
            changed: false,
        };
        for _ in 0..steps {
            outcome = self.step();
        }
        outcome
    }

    /// Restore the previous snapshot, handing consumed inputs back to the feed.
    /// Returns `false` when no history is left.
    pub fn rewind(&mut self) -> bool {
        let Some(entry) = self.history.pop_back() else {
            return false;
        };
        self.feed.restore(&entry.consumed);
        self.state = entry.state;
        self.fingerprint = self.state.fingerprint();
        for samples in self.outputs.values_mut() {
            samples.pop();
        }
        if let Some(metrics) = &self.config.metrics {
            if let Ok(mut metrics) = metrics.lock() {
                metrics.record_rewind();
            }
        }
        self.log_step("step_rewound", self.state.step(), true);
        true
    }

    /// Rebuild step 0, dropping history, probe samples and pending input.
    pub fn restart(&mut self) -> Result<()> {
        let descriptor = self.state.shared_descriptor();
        self.state = match &self.trace {
            Some(trace) => SystolicArrayState::create_traced(descriptor, trace)?,
            None => SystolicArrayState::create(descriptor)?,
        };
        self.fingerprint = self.state.fingerprint();
        self.feed.clear();
        self.history.clear();
        for samples in self.outputs.values_mut() {
            samples.clear();
        }
        self.started = Instant::now();
        Ok(())
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let metrics = self.config.metrics.as_ref()?;
        let guard = metrics.lock().ok()?;
        Some(guard.snapshot(self.started.elapsed()))
    }

    /// Log the current metrics snapshot when both a logger and metrics are configured.
    pub fn emit_metrics(&self) -> Result<()> {
        let (Some(logger), Some(snapshot)) = (&self.config.logger, self.metrics_snapshot()) else {
            return Ok(());
        };
        logger.log_event(snapshot.to_log_event(&self.config.metrics_target))?;
        Ok(())
    }

    fn apply(&mut self, input: &BoundaryInput, consumed: Vec<FedValue>) -> StepOutcome {
        let next = match &self.trace {
            Some(trace) => self.state.advance_traced(input, trace),
            None => self.state.advance(input),
        };
        let previous = std::mem::replace(&mut self.state, next);
        if self.config.history_limit > 0 {
            if self.history.len() == self.config.history_limit {
                self.history.pop_front();
            }
            self.history.push_back(HistoryEntry {
                state: previous,
                consumed,
            });
        }

        let fingerprint = self.state.fingerprint();
        let changed = fingerprint != self.fingerprint;
        self.fingerprint = fingerprint;

        for probe in &self.probes {
            let sample = probe.sample(&self.state);
            self.outputs.entry(probe.name.clone()).or_default().push(sample);
        }

        if let Some(metrics) = &self.config.metrics {
            if let Ok(mut metrics) = metrics.lock() {
                let descriptor = self.state.descriptor();
                metrics.record_step(
                    descriptor.rows() * descriptor.columns(),
                    input.value_count(),
                    changed,
                );
            }
        }

        let step = self.state.step();
        self.log_step("step_completed", step, changed);
        StepOutcome { step, changed }
    }

    fn known_wire(&self, wire: &str) -> Result<()> {
        if self.state.descriptor().wire_index(wire).is_none() {
            return Err(Error::UnknownWire(wire.to_string()));
        }
        Ok(())
    }

    fn log_step(&self, message: &str, step: u64, changed: bool) {
        let Some(logger) = &self.config.logger else {
            return;
        };
        if !logger.enabled(LogLevel::Debug) {
            return;
        }
        let event = event_with_fields(
            LogLevel::Debug,
            STEP_TARGET,
            message,
            [json_kv("step", step), json_kv("changed", changed)],
        );
        let _ = logger.log_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{RegisterSpec, WireSpec};
    use crate::logging::MemorySink;

    fn accumulator() -> DescriptorSpec {
        DescriptorSpec::grid(1, 2)
            .register(RegisterSpec::new("sum").transition_with(|v, _| v["sum"] + v["x"]))
            .wire(WireSpec::new("x"))
    }

    #[test]
    fn feed_drives_steps() {
        let mut sim = Simulation::from_spec(accumulator(), SimulationConfig::default()).unwrap();
        sim.feed("x", [1.0, 2.0, 3.0]).unwrap();
        sim.run(4);
        assert_eq!(sim.step_count(), 4);
        assert_eq!(sim.state().register_row(0, "sum"), vec![6.0, 6.0]);
        assert!(sim.is_exhausted());
    }

    #[test]
    fn feeding_unknown_wire_fails() {
        let mut sim = Simulation::from_spec(accumulator(), SimulationConfig::default()).unwrap();
        let err = sim.feed("y", [1.0]).unwrap_err();
        assert!(matches!(err, Error::UnknownWire(name) if name == "y"));
        assert!(sim.add_probe(Probe::new("out", "nope", Position::new(0, 0))).is_err());
    }

    #[test]
    fn unchanged_step_is_reported() {
        let mut sim = Simulation::from_spec(accumulator(), SimulationConfig::default()).unwrap();
        sim.feed("x", [1.0]).unwrap();
        assert!(sim.step().changed);
        assert!(sim.step().changed);
        // column 1 flushes its delay line, then the grid is at rest
        assert!(sim.step().changed);
        assert!(!sim.step().changed);
    }

    #[test]
    fn rewind_restores_state_and_input() {
        let mut sim = Simulation::from_spec(accumulator(), SimulationConfig::default()).unwrap();
        sim.feed("x", [4.0, 5.0]).unwrap();
        sim.add_probe(Probe::new("head", "x", Position::new(0, 1))).unwrap();
        sim.run(2);
        assert_eq!(sim.outputs("head"), &[0.0, 4.0]);

        assert!(sim.rewind());
        assert_eq!(sim.step_count(), 1);
        assert_eq!(sim.pending("x"), vec![5.0]);
        assert_eq!(sim.outputs("head"), &[0.0]);

        assert!(sim.rewind());
        assert_eq!(sim.pending("x"), vec![4.0, 5.0]);
        assert!(!sim.rewind());
    }

    #[test]
    fn history_is_bounded() {
        let config = SimulationConfig {
            history_limit: 2,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::from_spec(accumulator(), config).unwrap();
        sim.run(5);
        assert_eq!(sim.history_len(), 2);
        assert!(sim.rewind());
        assert!(sim.rewind());
        assert!(!sim.rewind());
        assert_eq!(sim.step_count(), 3);
    }

    #[test]
    fn restart_returns_to_step_zero() {
        let mut sim = Simulation::from_spec(accumulator(), SimulationConfig::default()).unwrap();
        sim.feed("x", [1.0, 2.0]).unwrap();
        sim.add_probe(Probe::new("head", "x", Position::new(0, 0))).unwrap();
        sim.step();
        sim.restart().unwrap();
        assert_eq!(sim.step_count(), 0);
        assert_eq!(sim.history_len(), 0);
        assert!(sim.pending("x").is_empty());
        assert!(sim.outputs("head").is_empty());
    }

    #[test]
    fn metrics_and_logging_are_recorded() {
        let sink = MemorySink::new();
        let mut config = SimulationConfig {
            logger: Some(Logger::new(sink.clone())),
            trace_states: true,
            ..SimulationConfig::default()
        };
        config.enable_metrics();
        let handle = config.metrics_handle().unwrap();

        let mut sim = Simulation::from_spec(accumulator(), config).unwrap();
        sim.feed("x", [1.0]).unwrap();
        sim.run(2);
        sim.rewind();
        sim.emit_metrics().unwrap();

        let snapshot = handle.lock().unwrap().snapshot(std::time::Duration::ZERO);
        assert_eq!(snapshot.steps, 2);
        assert_eq!(snapshot.cells_updated, 4);
        assert_eq!(snapshot.boundary_values, 1);
        assert_eq!(snapshot.rewinds, 1);

        let messages: Vec<String> = sink.events().into_iter().map(|e| e.message).collect();
        assert_eq!(messages[0], "state_created");
        assert_eq!(sink.events()[0].target, STATE_TARGET);
        assert!(messages.contains(&"state_advanced".to_string()));
        assert!(messages.contains(&"step_completed".to_string()));
        assert!(messages.contains(&"step_rewound".to_string()));
        assert_eq!(messages.last().map(String::as_str), Some("simulation_metrics"));
    }

    #[test]
    fn quiet_by_default() {
        let sink = MemorySink::new();
        let config = SimulationConfig {
            logger: Some(Logger::new(sink.clone()).with_min_level(LogLevel::Info)),
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::from_spec(accumulator(), config).unwrap();
        sim.run(3);
        sim.emit_metrics().unwrap();
        assert!(sink.events().is_empty());
    }
}
