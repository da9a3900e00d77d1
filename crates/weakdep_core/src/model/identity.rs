//! Identity types for deferred-dependency callables.
//!
//! # Responsibility
//! - Name modules and callables with comparable, hashable handles.
//! - Carry the ordered set of optional packages a callable needs.
//!
//! # Invariants
//! - A `DependencySet` is never empty and never repeats a name.
//! - Dependency order is preserved exactly as declared; it is only used for
//!   display.

use crate::model::naming::{is_identifier, is_module_path, GenerationUsageError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// Dot-separated path of the module that owns declarations, e.g. `MyPkg`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(path: &str) -> Result<Self, GenerationUsageError> {
        let trimmed = path.trim();
        if !is_module_path(trimmed) {
            return Err(GenerationUsageError::InvalidParent(path.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ModuleId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Handle identifying one named function or constructor within a module.
///
/// Only used as a map key and for its display name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallableId {
    module: ModuleId,
    name: String,
}

impl CallableId {
    pub fn new(module: ModuleId, name: &str) -> Result<Self, GenerationUsageError> {
        let name = crate::model::naming::callable_name(name)?;
        Ok(Self { module, name })
    }

    pub fn module(&self) -> &ModuleId {
        &self.module
    }

    /// Display name used in diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for CallableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Ordered, non-empty list of optional package names required together.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct DependencySet(Vec<String>);

impl DependencySet {
    /// Builds a set from package names, keeping their order.
    ///
    /// # Errors
    /// - `EmptyDependencySet` when no names are given.
    /// - `InvalidDependencyName` when a name is not a single identifier.
    /// - `DuplicateDependencyName` when a name appears twice after trimming.
    pub fn new<I, S>(names: I) -> Result<Self, GenerationUsageError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut packages = Vec::new();
        let mut dedup = BTreeSet::<String>::new();
        for name in names {
            let raw = name.as_ref();
            let trimmed = raw.trim();
            if !is_identifier(trimmed) {
                return Err(GenerationUsageError::InvalidDependencyName(raw.to_string()));
            }
            if !dedup.insert(trimmed.to_string()) {
                return Err(GenerationUsageError::DuplicateDependencyName(
                    trimmed.to_string(),
                ));
            }
            packages.push(trimmed.to_string());
        }
        if packages.is_empty() {
            return Err(GenerationUsageError::EmptyDependencySet);
        }
        Ok(Self(packages))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, package: &str) -> bool {
        self.0.iter().any(|name| name == package)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Display for DependencySet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl TryFrom<Vec<String>> for DependencySet {
    type Error = GenerationUsageError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DependencySet> for Vec<String> {
    fn from(value: DependencySet) -> Self {
        value.0
    }
}
