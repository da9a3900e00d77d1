//! Host-side generic function dispatch.
//!
//! # Responsibility
//! - Declare functions whose implementations are bound later by extensions.
//! - Route "no implementation matched" failures through the failure-hook table.
//!
//! # Invariants
//! - A declared function with zero bound implementations always fails with
//!   `NoMatchingImplementation` carrying its own `CallableId`.
//! - Hooks only add hint text; the default failure message is always kept.

pub mod generic;
pub mod hooks;
