//! Snapshot trace hooks.
//!
//! Snapshot construction can report itself to an injected [`StateTrace`] so
//! callers can log, buffer, or display the progression of a simulation. The
//! kernel never prints on its own; tracing only happens through the `*_traced`
//! entry points on `SystolicArrayState`.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

use crate::logging::{LogLevel, Logger, event_with_fields};

/// Point in a snapshot's life being reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStage {
    /// Step-0 grid built from a descriptor.
    Created,
    /// A new snapshot produced by `advance`.
    Advanced,
}

impl TraceStage {
    pub fn as_str(self) -> &'static str {
        match self {
            TraceStage::Created => "state_created",
            TraceStage::Advanced => "state_advanced",
        }
    }
}

/// Structured trace entry.
#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub timestamp: SystemTime,
    pub stage: TraceStage,
    pub step: u64,
    pub details: Vec<(String, Value)>,
}

/// Builder helper to append fields ergonomically.
pub struct TraceEventBuilder {
    event: TraceEvent,
}

impl TraceEventBuilder {
    pub fn new(stage: TraceStage, step: u64) -> Self {
        Self {
            event: TraceEvent {
                timestamp: SystemTime::now(),
                stage,
                step,
                details: Vec::new(),
            },
        }
    }

    pub fn detail(&mut self, key: impl Into<String>, value: Value) -> &mut Self {
        self.event.details.push((key.into(), value));
        self
    }

    pub fn finish(self) -> TraceEvent {
        self.event
    }
}

/// Trait implemented by any trace sink.
pub trait StateTrace: Send + Sync {
    fn record(&self, event: TraceEvent);
}

/// No-op trace.
#[derive(Debug, Default)]
pub struct NullTrace;

impl StateTrace for NullTrace {
    fn record(&self, _event: TraceEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().map(|events| events.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateTrace for RecordingTrace {
    fn record(&self, event: TraceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Forwards trace events to a structured [`Logger`].
#[derive(Clone)]
pub struct LoggerTrace {
    logger: Logger,
    level: LogLevel,
    target: String,
}

impl LoggerTrace {
    pub fn new(logger: Logger) -> Self {
        Self {
            logger,
            level: LogLevel::Debug,
            target: "systolic::state".to_string(),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }
}

impl StateTrace for LoggerTrace {
    fn record(&self, event: TraceEvent) {
        let mut fields = vec![("step".to_string(), Value::from(event.step))];
        fields.extend(event.details);
        let log_event = event_with_fields(self.level, &self.target, event.stage.as_str(), fields);
        let _ = self.logger.log_event(log_event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;
    use serde_json::json;

    #[test]
    fn builder_collects_details() {
        let mut builder = TraceEventBuilder::new(TraceStage::Advanced, 3);
        builder.detail("rows", json!(2)).detail("columns", json!(4));
        let event = builder.finish();
        assert_eq!(event.stage, TraceStage::Advanced);
        assert_eq!(event.step, 3);
        assert_eq!(event.details.len(), 2);
    }

    #[test]
    fn logger_trace_honours_level_and_target() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone()).with_min_level(LogLevel::Info);
        let quiet = LoggerTrace::new(logger.clone());
        quiet.record(TraceEventBuilder::new(TraceStage::Advanced, 1).finish());
        assert!(sink.events().is_empty());

        let loud = LoggerTrace::new(logger)
            .with_level(LogLevel::Warn)
            .with_target("systolic::custom");
        loud.record(TraceEventBuilder::new(TraceStage::Advanced, 2).finish());
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, LogLevel::Warn);
        assert_eq!(events[0].target, "systolic::custom");
    }

    #[test]
    fn logger_trace_emits_stage_message() {
        let sink = MemorySink::new();
        let trace = LoggerTrace::new(Logger::new(sink.clone()));
        let mut builder = TraceEventBuilder::new(TraceStage::Created, 0);
        builder.detail("rows", json!(1));
        trace.record(builder.finish());

        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "state_created");
        assert_eq!(events[0].target, "systolic::state");
        assert_eq!(events[0].fields.get("step"), Some(&json!(0)));
        assert_eq!(events[0].fields.get("rows"), Some(&json!(1)));
    }
}
