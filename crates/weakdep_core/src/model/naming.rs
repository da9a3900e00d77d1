//! Identifier rules shared by declarations and generated stubs.
//!
//! # Responsibility
//! - Decide whether a raw name is a single identifier.
//! - Report malformed generator input as `GenerationUsageError`.
//!
//! # Invariants
//! - Validation happens at generation time, never at call time.
//! - Names are trimmed before validation; the trimmed form is what gets stored.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}_][\p{L}\p{N}_!]*$").expect("valid identifier regex"));

/// Setup-time error for malformed generator input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationUsageError {
    /// Callable name is not a single identifier.
    InvalidName(String),
    /// Extension id is not a single identifier.
    InvalidExtensionId(String),
    /// Parent module path is empty or malformed.
    InvalidParent(String),
    /// Dependency set was declared with no members.
    EmptyDependencySet,
    /// One dependency name is not a single identifier.
    InvalidDependencyName(String),
    /// One dependency name is listed more than once.
    DuplicateDependencyName(String),
}

impl Display for GenerationUsageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName(value) => {
                write!(f, "expected a single identifier for the callable name, got `{value}`")
            }
            Self::InvalidExtensionId(value) => {
                write!(f, "expected a single identifier for the extension id, got `{value}`")
            }
            Self::InvalidParent(value) => write!(f, "parent module path is invalid: `{value}`"),
            Self::EmptyDependencySet => write!(f, "dependency set must name at least one package"),
            Self::InvalidDependencyName(value) => {
                write!(f, "dependency name is not an identifier: `{value}`")
            }
            Self::DuplicateDependencyName(value) => {
                write!(f, "dependency name is duplicated: `{value}`")
            }
        }
    }
}

impl Error for GenerationUsageError {}

/// Returns whether `value` is exactly one identifier.
///
/// Accepts unicode letters, digits, `_`, and a trailing-style `!` after the
/// first character, so mutating names such as `push!` are valid.
pub fn is_identifier(value: &str) -> bool {
    IDENTIFIER_RE.is_match(value)
}

/// Returns whether `value` is a dot-separated path of identifiers.
pub fn is_module_path(value: &str) -> bool {
    !value.is_empty() && value.split('.').all(is_identifier)
}

pub(crate) fn callable_name(raw: &str) -> Result<String, GenerationUsageError> {
    let trimmed = raw.trim();
    if !is_identifier(trimmed) {
        return Err(GenerationUsageError::InvalidName(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn extension_id(raw: &str) -> Result<String, GenerationUsageError> {
    let trimmed = raw.trim();
    if !is_identifier(trimmed) {
        return Err(GenerationUsageError::InvalidExtensionId(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
