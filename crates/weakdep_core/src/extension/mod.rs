//! Optional extension modules as seen by the core.
//!
//! The core only queries whether an extension is loaded and reads its
//! members; it never loads, installs, or resolves packages.

pub mod declaration;
pub mod module_system;
