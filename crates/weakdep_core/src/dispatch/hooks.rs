//! Process-wide table of hint providers for dispatch failures.

use crate::dispatch::generic::NoMatchingImplementation;
use log::warn;
use once_cell::sync::Lazy;
use std::fmt::Write;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};

static GLOBAL_HOOKS: Lazy<Arc<FailureHooks>> = Lazy::new(|| Arc::new(FailureHooks::new()));

/// Contributor of supplementary text for a dispatch failure.
///
/// Implementations write zero or more characters into `sink`. Writing nothing
/// means "no hint for this failure".
pub trait FailureHint: Send + Sync {
    fn write_hint(&self, sink: &mut dyn Write, failure: &NoMatchingImplementation);
}

impl<F> FailureHint for F
where
    F: Fn(&mut dyn Write, &NoMatchingImplementation) + Send + Sync,
{
    fn write_hint(&self, sink: &mut dyn Write, failure: &NoMatchingImplementation) {
        self(sink, failure)
    }
}

/// Ordered list of registered hint providers.
#[derive(Default)]
pub struct FailureHooks {
    hints: RwLock<Vec<Arc<dyn FailureHint>>>,
}

impl FailureHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide hook table.
    pub fn global() -> Arc<FailureHooks> {
        Arc::clone(&GLOBAL_HOOKS)
    }

    /// Appends one hint provider. Registering the same provider twice makes
    /// it run twice.
    pub fn register(&self, hint: Arc<dyn FailureHint>) {
        self.hints
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hint);
    }

    pub fn len(&self) -> usize {
        self.hints.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Runs every provider against `failure` and returns the non-empty hints
    /// in registration order.
    ///
    /// A provider that panics contributes nothing; the failure being reported
    /// must not be replaced by a secondary one.
    pub fn collect_hints(&self, failure: &NoMatchingImplementation) -> Vec<String> {
        let hints: Vec<_> = self
            .hints
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut collected = Vec::new();
        for hint in hints {
            let mut buffer = String::new();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                hint.write_hint(&mut buffer, failure);
            }));
            match outcome {
                Ok(()) if !buffer.is_empty() => collected.push(buffer),
                Ok(()) => {}
                Err(_) => warn!(
                    "event=failure_hint module=dispatch status=panicked function={}",
                    failure.function()
                ),
            }
        }
        collected
    }
}
