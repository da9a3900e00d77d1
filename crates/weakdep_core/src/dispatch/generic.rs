//! Generic functions with late-bound implementations.

use crate::dispatch::hooks::FailureHooks;
use crate::error::{CallError, CallResult};
use crate::model::identity::CallableId;
use crate::model::value::{Args, Callable, Value, ValueKind};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, PoisonError, RwLock};

/// Positional argument pattern an implementation accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signature {
    /// Any arguments.
    Any,
    /// Exactly these positional kinds, in order.
    Exact(Vec<ValueKind>),
}

impl Signature {
    pub fn any() -> Self {
        Self::Any
    }

    pub fn exact(kinds: impl IntoIterator<Item = ValueKind>) -> Self {
        Self::Exact(kinds.into_iter().collect())
    }

    pub fn matches(&self, args: &Args) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(kinds) => {
                kinds.len() == args.positional.len()
                    && kinds
                        .iter()
                        .zip(&args.positional)
                        .all(|(kind, value)| *kind == value.kind())
            }
        }
    }
}

struct Method {
    signature: Signature,
    implementation: Callable,
}

/// A declared function whose implementations are supplied separately.
///
/// Declaring one binds no implementation; extensions call `add_method` when
/// they load.
pub struct GenericFunction {
    id: CallableId,
    hooks: Arc<FailureHooks>,
    methods: RwLock<Vec<Method>>,
}

impl GenericFunction {
    /// Declares `id` with zero implementations, reporting failures into
    /// `hooks`.
    pub fn declare(id: CallableId, hooks: Arc<FailureHooks>) -> Arc<Self> {
        Arc::new(Self {
            id,
            hooks,
            methods: RwLock::new(Vec::new()),
        })
    }

    pub fn id(&self) -> &CallableId {
        &self.id
    }

    /// Binds one implementation. Later bindings win over earlier ones when
    /// both match.
    pub fn add_method(&self, signature: Signature, implementation: Callable) {
        debug!(
            "event=method_bind module=dispatch function={} signature={:?}",
            self.id, signature
        );
        self.methods
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Method {
                signature,
                implementation,
            });
    }

    pub fn method_count(&self) -> usize {
        self.methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Invokes the most recently bound matching implementation.
    ///
    /// # Errors
    /// - `NoMatchingImplementation` when nothing matches; its hints come from
    ///   the function's hook table.
    /// - Whatever the selected implementation returns, unchanged.
    pub fn call(&self, args: &Args) -> CallResult<Value> {
        let selected = self
            .methods
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|method| method.signature.matches(args))
            .map(|method| Arc::clone(&method.implementation));

        match selected {
            Some(implementation) => implementation(args),
            None => {
                let failure = NoMatchingImplementation::new(self.id.clone(), args);
                let hints = self.hooks.collect_hints(&failure);
                debug!(
                    "event=dispatch_failed module=dispatch function={} hints={}",
                    self.id,
                    hints.len()
                );
                Err(CallError::NoMatchingImplementation(failure.with_hints(hints)))
            }
        }
    }
}

/// "No implementation matched this call" failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoMatchingImplementation {
    function: CallableId,
    arg_kinds: Vec<ValueKind>,
    keywords: Vec<String>,
    hints: Vec<String>,
}

impl NoMatchingImplementation {
    pub fn new(function: CallableId, args: &Args) -> Self {
        Self {
            function,
            arg_kinds: args.kinds(),
            keywords: args.keyword.keys().cloned().collect(),
            hints: Vec::new(),
        }
    }

    fn with_hints(mut self, hints: Vec<String>) -> Self {
        self.hints = hints;
        self
    }

    /// Identity of the function that failed to dispatch.
    pub fn function(&self) -> &CallableId {
        &self.function
    }

    pub fn arg_kinds(&self) -> &[ValueKind] {
        &self.arg_kinds
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Supplementary text contributed by failure hooks.
    pub fn hints(&self) -> &[String] {
        &self.hints
    }

    /// Message shown regardless of hooks.
    pub fn default_message(&self) -> String {
        let kinds = self
            .arg_kinds
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let mut message = format!(
            "no implementation of `{}` matches arguments ({kinds})",
            self.function
        );
        if !self.keywords.is_empty() {
            message.push_str(&format!(" with keywords ({})", self.keywords.join(", ")));
        }
        message
    }
}

impl Display for NoMatchingImplementation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.default_message())?;
        for hint in &self.hints {
            write!(f, "\n{hint}")?;
        }
        Ok(())
    }
}

impl Error for NoMatchingImplementation {}
