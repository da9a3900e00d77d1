//! Builders for forwarding stubs and unimplemented declarations.

use crate::deps::registry::DependencyRegistry;
use crate::dispatch::generic::GenericFunction;
use crate::dispatch::hooks::FailureHooks;
use crate::docs::DocSink;
use crate::extension::module_system::ModuleSystem;
use crate::model::identity::{CallableId, DependencySet, ModuleId};
use crate::model::naming::{extension_id, GenerationUsageError};
use crate::stub::forwarding::ForwardingStub;
use log::info;
use std::sync::Arc;

/// Generation context for one consuming library.
///
/// Construct once during library initialization, after the library's
/// `DependencyRegistry`, and run every declaration through it.
pub struct StubGenerator {
    parent: ModuleId,
    modules: Arc<dyn ModuleSystem>,
    registry: Arc<DependencyRegistry>,
    hooks: Arc<FailureHooks>,
    docs: Option<Arc<dyn DocSink>>,
}

impl StubGenerator {
    pub fn new(
        parent: ModuleId,
        modules: Arc<dyn ModuleSystem>,
        registry: Arc<DependencyRegistry>,
        hooks: Arc<FailureHooks>,
    ) -> Self {
        Self {
            parent,
            modules,
            registry,
            hooks,
            docs: None,
        }
    }

    /// Attaches descriptions of generated declarations to `docs`.
    pub fn with_docs(mut self, docs: Arc<dyn DocSink>) -> Self {
        self.docs = Some(docs);
        self
    }

    pub fn parent(&self) -> &ModuleId {
        &self.parent
    }

    pub fn registry(&self) -> &Arc<DependencyRegistry> {
        &self.registry
    }

    /// Builds a stub forwarding `name` to the same-named member of
    /// `extension` under this generator's parent module.
    ///
    /// # Errors
    /// - `InvalidName` / `InvalidExtensionId` when either is not a single
    ///   identifier.
    pub fn forwarding_stub(
        &self,
        name: &str,
        extension: &str,
        deps: DependencySet,
        description: Option<&str>,
    ) -> Result<Arc<ForwardingStub>, GenerationUsageError> {
        let id = CallableId::new(self.parent.clone(), name)?;
        let extension = extension_id(extension)?;

        info!(
            "event=stub_generate module=stub shape=forwarding callable={} extension={} deps={}",
            id, extension, deps
        );
        self.attach_doc(&id, description);
        Ok(Arc::new(ForwardingStub::new(
            id,
            extension,
            deps,
            Arc::clone(&self.modules),
        )))
    }

    /// Declares `name` with no implementations and records `deps` for it.
    ///
    /// Calling the returned function before an extension binds a method fails
    /// through the hook table, where an installed `DependencyHint` names the
    /// packages to import.
    ///
    /// # Errors
    /// - `InvalidName` when `name` is not a single identifier.
    pub fn unimplemented(
        &self,
        name: &str,
        deps: DependencySet,
        description: Option<&str>,
    ) -> Result<Arc<GenericFunction>, GenerationUsageError> {
        let id = CallableId::new(self.parent.clone(), name)?;

        info!(
            "event=stub_generate module=stub shape=unimplemented callable={} deps={}",
            id, deps
        );
        let function = GenericFunction::declare(id.clone(), Arc::clone(&self.hooks));
        self.registry.register(id.clone(), deps);
        self.attach_doc(&id, description);
        Ok(function)
    }

    fn attach_doc(&self, id: &CallableId, description: Option<&str>) {
        if let (Some(docs), Some(text)) = (&self.docs, description) {
            docs.attach(id, text);
        }
    }
}
