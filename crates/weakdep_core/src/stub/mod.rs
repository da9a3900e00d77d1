//! Setup-time generation of deferred declarations.
//!
//! # Responsibility
//! - Build forwarding stubs for extension-provided types and constructors.
//! - Declare unimplemented generic functions and record their dependencies.
//!
//! # Invariants
//! - Malformed names are rejected at generation time.
//! - Forwarding stubs re-query the module system on every call.
//! - Re-running generation with the same input is harmless: registry entries
//!   are overwritten and declarations are rebuilt.

pub mod forwarding;
pub mod generator;
