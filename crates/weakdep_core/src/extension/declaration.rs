//! Extension declaration and validation.

use crate::model::naming::{is_identifier, is_module_path};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declarative description of one optional extension.
///
/// The extension becomes active once every trigger package is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionDeclaration {
    /// Module the extension extends, e.g. `MyPkg`.
    pub parent: String,
    /// Extension identifier, e.g. `MyPkgFancyExt`.
    pub id: String,
    /// Packages that must all be loaded for the extension to activate.
    pub triggers: Vec<String>,
}

impl ExtensionDeclaration {
    pub fn new<I, S>(parent: &str, id: &str, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parent: parent.to_string(),
            id: id.to_string(),
            triggers: triggers.into_iter().map(Into::into).collect(),
        }
    }

    /// Validates declaration-level invariants.
    pub fn validate(&self) -> Result<(), ExtensionDeclarationError> {
        let parent = self.parent.trim();
        if parent.is_empty() {
            return Err(ExtensionDeclarationError::EmptyParent);
        }
        if !is_module_path(parent) {
            return Err(ExtensionDeclarationError::InvalidParent(
                self.parent.clone(),
            ));
        }

        let id = self.id.trim();
        if id.is_empty() {
            return Err(ExtensionDeclarationError::EmptyId);
        }
        if !is_identifier(id) {
            return Err(ExtensionDeclarationError::InvalidId(self.id.clone()));
        }

        if self.triggers.is_empty() {
            return Err(ExtensionDeclarationError::MissingTriggers);
        }

        let mut dedup = BTreeSet::<&str>::new();
        for trigger in &self.triggers {
            let normalized = trigger.trim();
            if !is_identifier(normalized) {
                return Err(ExtensionDeclarationError::InvalidTrigger(trigger.clone()));
            }
            if !dedup.insert(normalized) {
                return Err(ExtensionDeclarationError::DuplicateTrigger(
                    normalized.to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Extension declaration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionDeclarationError {
    EmptyParent,
    InvalidParent(String),
    EmptyId,
    InvalidId(String),
    MissingTriggers,
    InvalidTrigger(String),
    DuplicateTrigger(String),
}

impl Display for ExtensionDeclarationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyParent => write!(f, "extension parent must not be empty"),
            Self::InvalidParent(value) => write!(f, "extension parent is invalid: {value}"),
            Self::EmptyId => write!(f, "extension id must not be empty"),
            Self::InvalidId(value) => write!(f, "extension id is invalid: {value}"),
            Self::MissingTriggers => write!(f, "extension must declare at least one trigger"),
            Self::InvalidTrigger(value) => write!(f, "extension trigger is invalid: {value}"),
            Self::DuplicateTrigger(value) => {
                write!(f, "extension trigger is duplicated: {value}")
            }
        }
    }
}

impl Error for ExtensionDeclarationError {}
