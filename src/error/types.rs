use thiserror::Error;

use crate::logging::LoggingError;

/// Unified result type for the systolic kernel and its helpers.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the simulation kernel.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid descriptor: {0}")]
    InvalidDescriptor(#[from] DescriptorIssue),
    #[error("invalid automaton: {0}")]
    InvalidAutomaton(String),
    #[error("wire `{0}` is not declared by the descriptor")]
    UnknownWire(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Logging(#[from] LoggingError),
}

impl Error {
    /// Returns the descriptor fault when this is an `InvalidDescriptor` error.
    pub fn descriptor_issue(&self) -> Option<&DescriptorIssue> {
        match self {
            Error::InvalidDescriptor(issue) => Some(issue),
            _ => None,
        }
    }
}

/// Structural faults detected while normalizing or instantiating a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorIssue {
    #[error("invalid rows count {0}")]
    RowCount(usize),
    #[error("invalid columns count {0}")]
    ColumnCount(usize),
    #[error("invalid name \"{name}\" for register {index}")]
    RegisterName { index: usize, name: String },
    #[error("invalid name \"{name}\" for wire {index}")]
    WireName { index: usize, name: String },
    #[error("name `{0}` is declared more than once")]
    DuplicateName(String),
    #[error("wire `{name}` has delay {delay}; rippling/broadcast is not supported")]
    WireDelay { name: String, delay: usize },
}
