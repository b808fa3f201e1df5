//! Core error types for diagram processing
//!
//! Parsing is deliberately permissive: only an empty document or a dialect
//! mismatch aborts a parse. Everything else degrades to a partial graph.

use thiserror::Error;

/// Core error types for diagram processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Diagram is empty: no content lines found")]
    EmptyDiagram,

    #[error("Dialect mismatch: expected a {expected} diagram but the header declares {found}")]
    DialectMismatch { expected: String, found: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new dialect mismatch error
    pub fn dialect_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::DialectMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Returns true for the fatal empty-input condition
    pub fn is_empty_diagram(&self) -> bool {
        matches!(self, Self::EmptyDiagram)
    }
}
