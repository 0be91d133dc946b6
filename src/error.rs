//! Error types for the blocking operations.

use thiserror::Error;

/// Errors surfaced by a blocking terminal operation.
///
/// `E` is the upstream stream's error type. `Source` and `Predicate` both
/// carry an `E`, as distinct variants, so callers can tell "the stream
/// errored" apart from "my predicate errored" and branch on kind.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BlockingError<E> {
    /// The stream terminated with an error; the cause is passed through
    /// unchanged.
    #[error("source error: {0}")]
    Source(E),

    /// The stream completed without producing a qualifying element.
    #[error("source completed without any qualifying element")]
    NoElements,

    /// A second qualifying element was observed where exactly one was
    /// required.
    #[error("source produced more than one qualifying element")]
    MoreThanOneElement,

    /// The caller-supplied predicate failed while evaluating an element.
    #[error("predicate failed while evaluating an element: {0}")]
    Predicate(E),
}

impl<E> BlockingError<E> {
    /// The upstream cause, if this error carries one.
    pub fn cause(&self) -> Option<&E> {
        match self {
            BlockingError::Source(e) | BlockingError::Predicate(e) => Some(e),
            BlockingError::NoElements | BlockingError::MoreThanOneElement => None,
        }
    }
}

/// Result type for blocking operations.
pub type BlockingResult<T, E> = std::result::Result<T, BlockingError<E>>;
