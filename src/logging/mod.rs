//! Structured JSON-lines logging.
//!
//! Simulation drivers and trace hooks emit [`LogEvent`]s through a [`Logger`],
//! which forwards them to a pluggable [`LogSink`]. Two sinks ship with the
//! crate: [`FileSink`] appends JSON lines to a size-capped file and
//! [`MemorySink`] keeps events in memory for tests and embedding UIs.

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

pub type LogFields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogEvent {
    pub ts_ms: u128,
    pub level: LogLevel,
    pub target: String,
    pub message: String,
    #[serde(skip_serializing_if = "LogFields::is_empty", default)]
    pub fields: LogFields,
}

impl LogEvent {
    pub fn new(level: LogLevel, target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            ts_ms: current_ms(),
            level,
            target: target.into(),
            message: message.into(),
            fields: LogFields::new(),
        }
    }

    pub fn with_fields(
        level: LogLevel,
        target: impl Into<String>,
        message: impl Into<String>,
        fields: LogFields,
    ) -> Self {
        Self {
            fields,
            ..Self::new(level, target, message)
        }
    }
}

fn current_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

pub type LoggingResult<T> = std::result::Result<T, LoggingError>;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("log sink lock poisoned")]
    Poisoned,
}

pub trait LogSink: Send + Sync {
    fn log(&self, event: &LogEvent) -> LoggingResult<()>;
}

/// Cloneable handle over a shared sink. Events below `min_level` are dropped.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    min_level: LogLevel,
}

impl Logger {
    pub fn new<S>(sink: S) -> Self
    where
        S: LogSink + 'static,
    {
        Self {
            sink: Arc::new(sink),
            min_level: LogLevel::Trace,
        }
    }

    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn log(&self, level: LogLevel, target: &str, message: &str) -> LoggingResult<()> {
        self.log_event(LogEvent::new(level, target, message))
    }

    pub fn log_with_fields(
        &self,
        level: LogLevel,
        target: &str,
        message: &str,
        fields: LogFields,
    ) -> LoggingResult<()> {
        self.log_event(LogEvent::with_fields(level, target, message, fields))
    }

    pub fn log_event(&self, event: LogEvent) -> LoggingResult<()> {
        if !self.enabled(event.level) {
            return Ok(());
        }
        self.sink.log(&event)
    }
}

pub struct FileSink {
    path: PathBuf,
    max_bytes: u64,
    writer: Mutex<BufWriter<File>>,
}

impl FileSink {
    /// Open `path` for appending. A `max_bytes` of zero disables rotation.
    pub fn new(path: impl AsRef<Path>, max_bytes: u64) -> LoggingResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            max_bytes,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    fn write_line(&self, mut line: String) -> LoggingResult<()> {
        line.push('\n');
        let mut guard = self.writer.lock().map_err(|_| LoggingError::Poisoned)?;

        if self.should_rotate(guard.get_ref(), line.len() as u64)? {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.path)?;
            *guard = BufWriter::new(file);
        }

        guard.write_all(line.as_bytes())?;
        guard.flush()?;
        Ok(())
    }

    fn should_rotate(&self, file: &File, incoming_len: u64) -> std::io::Result<bool> {
        if self.max_bytes == 0 {
            return Ok(false);
        }
        let current = file.metadata()?.len();
        Ok(current + incoming_len > self.max_bytes)
    }
}

impl LogSink for FileSink {
    fn log(&self, event: &LogEvent) -> LoggingResult<()> {
        let line = serde_json::to_string(event)?;
        self.write_line(line)
    }
}

/// In-memory sink; clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<LogEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Events rendered as JSON lines, the same shape `FileSink` writes.
    pub fn lines(&self) -> LoggingResult<Vec<String>> {
        self.events()
            .iter()
            .map(|event| serde_json::to_string(event).map_err(LoggingError::from))
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl LogSink for MemorySink {
    fn log(&self, event: &LogEvent) -> LoggingResult<()> {
        let mut events = self.events.lock().map_err(|_| LoggingError::Poisoned)?;
        events.push(event.clone());
        Ok(())
    }
}

pub fn event_with_fields(
    level: LogLevel,
    target: &str,
    message: &str,
    fields: impl IntoIterator<Item = (String, Value)>,
) -> LogEvent {
    let map: LogFields = fields.into_iter().collect();
    LogEvent::with_fields(level, target, message, map)
}

pub fn json_kv(key: &str, value: impl Into<Value>) -> (String, Value) {
    (key.to_string(), value.into())
}

pub fn json_str(key: &str, value: impl Into<String>) -> (String, Value) {
    (key.to_string(), json!(value.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_captures_events_in_order() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone());
        logger.log(LogLevel::Info, "systolic::test", "first").unwrap();
        logger
            .log_event(event_with_fields(
                LogLevel::Debug,
                "systolic::test",
                "second",
                [json_kv("step", 2), json_str("wire", "x")],
            ))
            .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].message, "first");
        assert_eq!(events[1].fields.get("step"), Some(&json!(2)));
        assert_eq!(events[1].fields.get("wire"), Some(&json!("x")));
    }

    #[test]
    fn min_level_filters_events() {
        let sink = MemorySink::new();
        let logger = Logger::new(sink.clone()).with_min_level(LogLevel::Info);
        logger.log(LogLevel::Debug, "systolic::test", "dropped").unwrap();
        logger.log(LogLevel::Warn, "systolic::test", "kept").unwrap();
        assert_eq!(sink.events().len(), 1);
        assert_eq!(sink.events()[0].message, "kept");
    }

    fn temp_log(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "systolic-viz-{}-{name}.jsonl",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);
        path
    }

    fn fixed_event(message: &str) -> LogEvent {
        LogEvent {
            ts_ms: 0,
            ..LogEvent::new(LogLevel::Info, "systolic::test", message)
        }
    }

    #[test]
    fn file_sink_truncates_when_cap_is_exceeded() {
        let path = temp_log("rotate");
        let first = serde_json::to_string(&fixed_event("first")).unwrap().len() as u64 + 1;
        let second = serde_json::to_string(&fixed_event("second")).unwrap().len() as u64 + 1;
        let sink = FileSink::new(&path, first + second - 1).unwrap();

        sink.log(&fixed_event("first")).unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), first);
        sink.log(&fixed_event("second")).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("\"message\":\"second\""));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn file_sink_without_cap_appends() {
        let path = temp_log("append");
        let logger = Logger::new(FileSink::new(&path, 0).unwrap());
        for message in ["one", "two", "three"] {
            logger.log_event(fixed_event(message)).unwrap();
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let messages: Vec<String> = contents
            .lines()
            .map(|line| {
                let value: Value = serde_json::from_str(line).unwrap();
                value["message"].as_str().unwrap_or_default().to_string()
            })
            .collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn lines_skip_empty_fields() {
        let sink = MemorySink::new();
        Logger::new(sink.clone())
            .log(LogLevel::Info, "systolic::test", "plain")
            .unwrap();
        let lines = sink.lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("\"level\":\"info\""));
        assert!(!lines[0].contains("fields"));
    }
}
