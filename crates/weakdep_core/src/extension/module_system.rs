//! Module-system capability consumed by forwarding stubs.
//!
//! # Responsibility
//! - Answer "is extension `X` of module `P` loaded?" and hand out its members.
//! - Provide an in-process implementation where hosts declare extensions and
//!   mark companion packages as loaded.
//!
//! # Invariants
//! - Lookups are read-only and safe from any thread.
//! - An in-process extension is visible exactly while all of its triggers are
//!   marked loaded; nothing is cached across `mark_loaded`/`mark_unloaded`.

use crate::extension::declaration::{ExtensionDeclaration, ExtensionDeclarationError};
use crate::model::identity::ModuleId;
use crate::model::value::Callable;
use log::info;
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock};

/// A loaded optional module exposing named members.
pub trait ExtensionModule: Send + Sync {
    fn member(&self, name: &str) -> Option<Callable>;
}

/// Shared reference to a loaded extension.
pub type ExtensionHandle = Arc<dyn ExtensionModule>;

/// Host module-system query.
pub trait ModuleSystem: Send + Sync {
    /// Returns the extension `extension` of `parent` when it is loaded.
    fn find_extension(&self, parent: &ModuleId, extension: &str) -> Option<ExtensionHandle>;

    fn is_loaded(&self, parent: &ModuleId, extension: &str) -> bool {
        self.find_extension(parent, extension).is_some()
    }
}

/// Extension backed by a fixed member table.
#[derive(Default)]
pub struct ExtensionMembers {
    members: BTreeMap<String, Callable>,
}

impl ExtensionMembers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, name: &str, implementation: Callable) -> Self {
        self.members.insert(name.to_string(), implementation);
        self
    }

    pub fn member_names(&self) -> Vec<&str> {
        self.members.keys().map(String::as_str).collect()
    }
}

impl ExtensionModule for ExtensionMembers {
    fn member(&self, name: &str) -> Option<Callable> {
        self.members.get(name).cloned()
    }
}

struct DeclaredExtension {
    triggers: Vec<String>,
    module: ExtensionHandle,
}

#[derive(Default)]
struct State {
    loaded_packages: BTreeSet<String>,
    extensions: BTreeMap<(String, String), DeclaredExtension>,
}

impl State {
    fn is_active(&self, extension: &DeclaredExtension) -> bool {
        extension
            .triggers
            .iter()
            .all(|trigger| self.loaded_packages.contains(trigger))
    }
}

/// In-process module system.
///
/// Loading is simulated: hosts call `mark_loaded` when a companion package
/// becomes available and `mark_unloaded` to take it away again.
#[derive(Default)]
pub struct InProcessModuleSystem {
    state: RwLock<State>,
}

impl InProcessModuleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares one extension after validating its declaration.
    pub fn declare_extension(
        &self,
        declaration: ExtensionDeclaration,
        module: ExtensionHandle,
    ) -> Result<(), ModuleSystemError> {
        declaration
            .validate()
            .map_err(ModuleSystemError::InvalidDeclaration)?;

        let key = (
            declaration.parent.trim().to_string(),
            declaration.id.trim().to_string(),
        );
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.extensions.contains_key(&key) {
            return Err(ModuleSystemError::DuplicateExtension {
                parent: key.0,
                id: key.1,
            });
        }

        info!(
            "event=extension_declare module=extension parent={} id={} triggers={}",
            key.0,
            key.1,
            declaration.triggers.join(",")
        );
        state.extensions.insert(
            key,
            DeclaredExtension {
                triggers: declaration
                    .triggers
                    .iter()
                    .map(|trigger| trigger.trim().to_string())
                    .collect(),
                module,
            },
        );
        Ok(())
    }

    /// Marks a companion package as loaded.
    pub fn mark_loaded(&self, package: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.loaded_packages.insert(package.trim().to_string()) {
            let active = state
                .extensions
                .values()
                .filter(|extension| state.is_active(extension))
                .count();
            info!(
                "event=package_loaded module=extension package={} active_extensions={}",
                package.trim(),
                active
            );
        }
    }

    /// Marks a companion package as no longer loaded.
    pub fn mark_unloaded(&self, package: &str) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.loaded_packages.remove(package.trim()) {
            info!(
                "event=package_unloaded module=extension package={}",
                package.trim()
            );
        }
    }

    pub fn is_package_loaded(&self, package: &str) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded_packages
            .contains(package.trim())
    }

    /// Ids of currently active extensions of `parent`, sorted.
    pub fn active_extensions(&self, parent: &ModuleId) -> Vec<String> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state
            .extensions
            .iter()
            .filter(|((owner, _), extension)| {
                owner == parent.as_str() && state.is_active(extension)
            })
            .map(|((_, id), _)| id.clone())
            .collect()
    }
}

impl ModuleSystem for InProcessModuleSystem {
    fn find_extension(&self, parent: &ModuleId, extension: &str) -> Option<ExtensionHandle> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        let key = (parent.as_str().to_string(), extension.to_string());
        let declared = state.extensions.get(&key)?;
        if !state.is_active(declared) {
            return None;
        }
        Some(Arc::clone(&declared.module))
    }
}

/// In-process module system errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSystemError {
    InvalidDeclaration(ExtensionDeclarationError),
    DuplicateExtension { parent: String, id: String },
}

impl Display for ModuleSystemError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDeclaration(err) => write!(f, "invalid extension declaration: {err}"),
            Self::DuplicateExtension { parent, id } => {
                write!(f, "extension already declared: {parent}/{id}")
            }
        }
    }
}

impl Error for ModuleSystemError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDeclaration(err) => Some(err),
            Self::DuplicateExtension { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtensionMembers, InProcessModuleSystem, ModuleSystem, ModuleSystemError};
    use crate::extension::declaration::{ExtensionDeclaration, ExtensionDeclarationError};
    use crate::model::identity::ModuleId;
    use crate::model::value::{Args, Value};
    use std::sync::Arc;

    fn parent() -> ModuleId {
        ModuleId::new("MyPkg").expect("valid module")
    }

    fn fancy_members() -> Arc<ExtensionMembers> {
        Arc::new(
            ExtensionMembers::new().with_member("FancyType", Arc::new(|_: &Args| Ok(Value::Nil))),
        )
    }

    #[test]
    fn extension_activates_when_all_triggers_load() {
        let modules = InProcessModuleSystem::new();
        modules
            .declare_extension(
                ExtensionDeclaration::new("MyPkg", "MyPkgFancyExt", ["FancyDep", "OtherDep"]),
                fancy_members(),
            )
            .expect("declaration should register");

        assert!(!modules.is_loaded(&parent(), "MyPkgFancyExt"));
        modules.mark_loaded("FancyDep");
        assert!(!modules.is_loaded(&parent(), "MyPkgFancyExt"));
        modules.mark_loaded("OtherDep");
        assert!(modules.is_loaded(&parent(), "MyPkgFancyExt"));
        assert_eq!(modules.active_extensions(&parent()), vec!["MyPkgFancyExt"]);
    }

    #[test]
    fn unloading_a_trigger_hides_the_extension() {
        let modules = InProcessModuleSystem::new();
        modules
            .declare_extension(
                ExtensionDeclaration::new("MyPkg", "MyPkgFancyExt", ["FancyDep"]),
                fancy_members(),
            )
            .expect("declaration should register");
        modules.mark_loaded("FancyDep");
        assert!(modules.is_package_loaded("FancyDep"));

        modules.mark_unloaded("FancyDep");
        assert!(modules.find_extension(&parent(), "MyPkgFancyExt").is_none());
    }

    #[test]
    fn loaded_extension_exposes_members() {
        let modules = InProcessModuleSystem::new();
        modules
            .declare_extension(
                ExtensionDeclaration::new("MyPkg", "MyPkgFancyExt", ["FancyDep"]),
                fancy_members(),
            )
            .expect("declaration should register");
        modules.mark_loaded("FancyDep");

        let extension = modules
            .find_extension(&parent(), "MyPkgFancyExt")
            .expect("extension should be active");
        assert!(extension.member("FancyType").is_some());
        assert!(extension.member("Other").is_none());
    }

    #[test]
    fn member_names_are_sorted() {
        let members = ExtensionMembers::new()
            .with_member("fancy_plot", Arc::new(|_: &Args| Ok(Value::Nil)))
            .with_member("FancyType", Arc::new(|_: &Args| Ok(Value::Nil)));
        assert_eq!(members.member_names(), vec!["FancyType", "fancy_plot"]);
    }

    #[test]
    fn extensions_are_scoped_by_parent() {
        let modules = InProcessModuleSystem::new();
        modules
            .declare_extension(
                ExtensionDeclaration::new("OtherPkg", "MyPkgFancyExt", ["FancyDep"]),
                fancy_members(),
            )
            .expect("declaration should register");
        modules.mark_loaded("FancyDep");

        assert!(!modules.is_loaded(&parent(), "MyPkgFancyExt"));
    }

    #[test]
    fn rejects_duplicate_and_invalid_declarations() {
        let modules = InProcessModuleSystem::new();
        let declaration = ExtensionDeclaration::new("MyPkg", "MyPkgFancyExt", ["FancyDep"]);
        modules
            .declare_extension(declaration.clone(), fancy_members())
            .expect("first declaration should register");

        let duplicate = modules
            .declare_extension(declaration, fancy_members())
            .expect_err("duplicate declaration must fail");
        assert!(matches!(
            duplicate,
            ModuleSystemError::DuplicateExtension { .. }
        ));

        let invalid = modules
            .declare_extension(
                ExtensionDeclaration::new("MyPkg", "BareExt", Vec::<String>::new()),
                fancy_members(),
            )
            .expect_err("declaration without triggers must fail");
        assert_eq!(
            invalid,
            ModuleSystemError::InvalidDeclaration(ExtensionDeclarationError::MissingTriggers)
        );
    }
}
