//! Deferred-dependency bookkeeping.

pub mod registry;
