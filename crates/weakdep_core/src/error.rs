//! Errors surfaced by calls into generated declarations.
//!
//! # Invariants
//! - Errors raised by an extension's implementation pass through unchanged.
//! - `MissingDependency` and `NoMatchingImplementation` are never caught
//!   inside the crate; they reach the caller as-is.

use crate::dispatch::generic::NoMatchingImplementation;
use crate::stub::forwarding::MissingDependencyError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result of invoking any generated or extension-provided callable.
pub type CallResult<T> = Result<T, CallError>;

/// Call-time failure.
#[derive(Debug, Clone, PartialEq)]
pub enum CallError {
    /// Forwarding stub called while its extension is not loaded.
    MissingDependency(MissingDependencyError),
    /// Generic function had no implementation matching the arguments.
    NoMatchingImplementation(NoMatchingImplementation),
    /// Extension is loaded but does not define the forwarded member.
    MemberNotFound { extension: String, member: String },
    /// Raised by an implementation itself.
    Failed(String),
}

impl CallError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

impl Display for CallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDependency(err) => write!(f, "{err}"),
            Self::NoMatchingImplementation(err) => write!(f, "{err}"),
            Self::MemberNotFound { extension, member } => {
                write!(f, "extension `{extension}` does not define `{member}`")
            }
            Self::Failed(message) => write!(f, "{message}"),
        }
    }
}

impl Error for CallError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MissingDependency(err) => Some(err),
            Self::NoMatchingImplementation(err) => Some(err),
            Self::MemberNotFound { .. } | Self::Failed(_) => None,
        }
    }
}

impl From<MissingDependencyError> for CallError {
    fn from(value: MissingDependencyError) -> Self {
        Self::MissingDependency(value)
    }
}

impl From<NoMatchingImplementation> for CallError {
    fn from(value: NoMatchingImplementation) -> Self {
        Self::NoMatchingImplementation(value)
    }
}
