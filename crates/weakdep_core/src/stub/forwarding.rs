//! Forwarding stubs for extension-provided callables.

use crate::diagnostic::hint::{write_dependency_sentence, HintStyle};
use crate::error::{CallError, CallResult};
use crate::extension::module_system::ModuleSystem;
use crate::model::identity::{CallableId, DependencySet};
use crate::model::value::{Args, Callable, Value};
use log::debug;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

/// Raised when a forwarding stub is called before its extension is loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingDependencyError {
    name: String,
    deps: DependencySet,
}

impl MissingDependencyError {
    pub fn new(name: &str, deps: DependencySet) -> Self {
        Self {
            name: name.to_string(),
            deps,
        }
    }

    /// Display name of the unresolved callable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Packages to import, in declared order.
    pub fn deps(&self) -> &DependencySet {
        &self.deps
    }
}

impl Display for MissingDependencyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write_dependency_sentence(f, &self.name, &self.deps, HintStyle::Plain)
    }
}

impl Error for MissingDependencyError {}

/// Callable that delegates to a same-named member of an optional extension.
pub struct ForwardingStub {
    id: CallableId,
    extension: String,
    deps: DependencySet,
    modules: Arc<dyn ModuleSystem>,
}

impl ForwardingStub {
    pub(crate) fn new(
        id: CallableId,
        extension: String,
        deps: DependencySet,
        modules: Arc<dyn ModuleSystem>,
    ) -> Self {
        Self {
            id,
            extension,
            deps,
            modules,
        }
    }

    pub fn id(&self) -> &CallableId {
        &self.id
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn deps(&self) -> &DependencySet {
        &self.deps
    }

    /// Whether the owning extension is loaded right now.
    pub fn is_available(&self) -> bool {
        self.modules.is_loaded(self.id.module(), &self.extension)
    }

    /// Forwards `args` to the extension's member of the same name.
    ///
    /// # Errors
    /// - `MissingDependency` when the extension is not loaded at call time.
    /// - `MemberNotFound` when the loaded extension lacks the member.
    /// - Any error from the member itself, unchanged.
    pub fn call(&self, args: &Args) -> CallResult<Value> {
        let Some(extension) = self.modules.find_extension(self.id.module(), &self.extension)
        else {
            debug!(
                "event=forward_call module=stub status=missing_dependency callable={} extension={}",
                self.id, self.extension
            );
            return Err(MissingDependencyError::new(self.id.name(), self.deps.clone()).into());
        };

        let Some(member) = extension.member(self.id.name()) else {
            return Err(CallError::MemberNotFound {
                extension: self.extension.clone(),
                member: self.id.name().to_string(),
            });
        };
        member(args)
    }

    /// Wraps the stub as a plain `Callable`.
    pub fn into_callable(self: Arc<Self>) -> Callable {
        Arc::new(move |args: &Args| self.call(args))
    }
}

#[cfg(test)]
mod tests {
    use super::{ForwardingStub, MissingDependencyError};
    use crate::error::CallError;
    use crate::extension::declaration::ExtensionDeclaration;
    use crate::extension::module_system::{ExtensionMembers, InProcessModuleSystem};
    use crate::model::identity::{CallableId, DependencySet, ModuleId};
    use crate::model::value::{Args, Value};
    use std::sync::Arc;

    fn stub(modules: Arc<InProcessModuleSystem>) -> ForwardingStub {
        let id = CallableId::new(ModuleId::new("MyPkg").expect("valid module"), "FancyType")
            .expect("valid id");
        ForwardingStub::new(
            id,
            "MyPkgFancyExt".to_string(),
            DependencySet::new(["FancyDep"]).expect("valid deps"),
            modules,
        )
    }

    #[test]
    fn missing_dependency_message_names_packages() {
        let err = MissingDependencyError::new(
            "FancyType",
            DependencySet::new(["FancyDep", "OtherDep"]).expect("valid deps"),
        );
        assert_eq!(
            err.to_string(),
            "FancyType depends on the package(s) FancyDep, OtherDep but you have not installed \
             or imported them yet. Immediately after importing them, FancyType will be available."
        );
    }

    #[test]
    fn loaded_extension_without_member_reports_member_not_found() {
        let modules = Arc::new(InProcessModuleSystem::new());
        modules
            .declare_extension(
                ExtensionDeclaration::new("MyPkg", "MyPkgFancyExt", ["FancyDep"]),
                Arc::new(ExtensionMembers::new()),
            )
            .expect("declaration should register");
        modules.mark_loaded("FancyDep");

        let stub = stub(modules);
        assert!(stub.is_available());
        assert_eq!(
            stub.call(&Args::new()),
            Err(CallError::MemberNotFound {
                extension: "MyPkgFancyExt".to_string(),
                member: "FancyType".to_string(),
            })
        );
    }

    #[test]
    fn into_callable_forwards_like_the_stub() {
        let modules = Arc::new(InProcessModuleSystem::new());
        modules
            .declare_extension(
                ExtensionDeclaration::new("MyPkg", "MyPkgFancyExt", ["FancyDep"]),
                Arc::new(ExtensionMembers::new().with_member(
                    "FancyType",
                    Arc::new(|args: &Args| Ok(Value::Int(args.positional.len() as i64))),
                )),
            )
            .expect("declaration should register");
        let callable = Arc::new(stub(Arc::clone(&modules))).into_callable();

        assert!(matches!(
            callable(&Args::new()),
            Err(CallError::MissingDependency(_))
        ));
        modules.mark_loaded("FancyDep");
        assert_eq!(callable(&Args::positional([1_i64, 2])), Ok(Value::Int(2)));
    }
}
