//! Shared error taxonomy for the labeler core.
//!
//! Every fallible operation in `vpl-kernel`, `vpl-model`, and `vpl-labeler`
//! returns [`LabelerError`]. There is one kind per failure class, not one
//! type per subsystem: build-time schema violations and runtime selection
//! failures both surface as [`LabelerError::InvalidArgument`], distinguished
//! only by the message, matching the "kinds, not type names" error design.

use std::fmt;

/// A failure from building or applying a compiled model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelerError {
    /// A build-time schema violation, or a runtime selector/condition with
    /// no match where no pass-through is configured.
    InvalidArgument(String),
    /// A numeric value (typically a multiplicity) fell outside its allowed
    /// range and no capping was configured.
    OutOfRange(String),
    /// An impossible-state assertion: the build already guarantees this
    /// cannot happen at runtime.
    Internal(String),
    /// An explicitly unsupported configuration.
    Unimplemented(String),
}

impl fmt::Display for LabelerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::OutOfRange(msg) => write!(f, "out of range: {msg}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
            Self::Unimplemented(msg) => write!(f, "unimplemented: {msg}"),
        }
    }
}

impl std::error::Error for LabelerError {}

pub type LabelerResult<T> = Result<T, LabelerError>;
