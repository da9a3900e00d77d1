//! Deferred-dependency declarations for libraries with optional extensions.
//!
//! A library declares functions and types whose implementations live in
//! optional extensions. Calling them before the companion packages are loaded
//! fails with a message naming exactly which packages to import.
//!
//! Initialization order for a consuming library:
//! 1. Create its `DependencyRegistry` (one per library, shared via `Arc`).
//! 2. Install a `DependencyHint` for it with `install_dependency_hint`.
//! 3. Run every declaration through one `StubGenerator`.
//!
//! `install_dependency_hint` and `StubGenerator::new` must receive the same
//! `FailureHooks` table; functions declared against a different table never
//! see the library's hints.

pub mod deps;
pub mod diagnostic;
pub mod dispatch;
pub mod docs;
pub mod error;
pub mod extension;
pub mod logging;
pub mod model;
pub mod stub;

pub use deps::registry::DependencyRegistry;
pub use diagnostic::hint::{
    install_dependency_hint, parse_hint_style, write_dependency_sentence, DependencyHint,
    HintStyle, HintStyleError,
};
pub use dispatch::generic::{GenericFunction, NoMatchingImplementation, Signature};
pub use dispatch::hooks::{FailureHint, FailureHooks};
pub use docs::{DocIndex, DocSink};
pub use error::{CallError, CallResult};
pub use extension::declaration::{ExtensionDeclaration, ExtensionDeclarationError};
pub use extension::module_system::{
    ExtensionHandle, ExtensionMembers, ExtensionModule, InProcessModuleSystem, ModuleSystem,
    ModuleSystemError,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::identity::{CallableId, DependencySet, ModuleId};
pub use model::naming::{is_identifier, GenerationUsageError};
pub use model::value::{Args, Callable, Value, ValueKind};
pub use stub::forwarding::{ForwardingStub, MissingDependencyError};
pub use stub::generator::StubGenerator;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
