//! Dependency hints for dispatch failures.
//!
//! # Responsibility
//! - Turn "no implementation matched" failures of registered callables into
//!   actionable text naming the packages to import.
//! - Install that hint into the host failure-hook table once per library.
//!
//! # Invariants
//! - Hint rendering never fails outward; a broken render writes nothing.
//! - Unregistered callables get no hint text.

pub mod hint;
