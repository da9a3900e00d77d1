//! Shared model for deferred-dependency declarations.
//!
//! # Responsibility
//! - Define identities (`ModuleId`, `CallableId`) and `DependencySet`.
//! - Define the dynamic call model used by generated callables.
//! - Hold the identifier rules applied at generation time.
//!
//! # Invariants
//! - Every `DependencySet` is non-empty and order-preserving.
//! - Identifier validation never runs at call time.

pub mod identity;
pub mod naming;
pub mod value;
