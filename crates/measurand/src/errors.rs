//! Error types for spec compilation and batch building.

use thiserror::Error;

/// Errors produced when compiling a textual spec into a [crate::measurand::Measurand]
/// or any of its parts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Text does not match the grammar of the mini-language it was handed to.
    #[error("spec {spec:?} is not valid: {reason}")]
    InvalidSpec { spec: String, reason: String },
    /// Decoder key has no entry in the decoder registry.
    #[error("{0:?} is not a known decoder key")]
    UnknownDecoderKey(String),
    /// Composed record is wider than the widest native container (64 bits).
    #[error("a {0}-bit record does not fit an unsigned container of at most 64 bits")]
    UnsupportedContainerWidth(u32),
}

impl SpecError {
    pub(crate) fn invalid(spec: &str, reason: impl Into<String>) -> Self {
        SpecError::InvalidSpec {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors produced while building a column from a batch (e.g. during
/// [crate::measurand::Measurand::build]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Fixed-width decoder applied to a record of a different size.
    #[error("{decoder} expects a field of {expected} bits but was given {received}")]
    InvalidFieldWidth {
        decoder: &'static str,
        expected: u32,
        received: u32,
    },
    /// Container or column type is not one the pipeline can read.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),
    /// Spec addresses a word the batch does not have.
    #[error("word {word} is out of range for a batch of {words} words")]
    WordOutOfRange { word: usize, words: usize },
    /// Batch data is not rectangular.
    #[error("malformed batch: {0}")]
    Shape(String),
}
