//! Hint text and hook installation.

use crate::deps::registry::DependencyRegistry;
use crate::dispatch::generic::NoMatchingImplementation;
use crate::dispatch::hooks::{FailureHint, FailureHooks};
use crate::model::identity::DependencySet;
use anstyle::{AnsiColor, Style};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{self, Display, Formatter, Write};
use std::sync::Arc;

const CALLABLE_STYLE: Style = Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Cyan)));
const DEPENDENCY_STYLE: Style =
    Style::new().fg_color(Some(anstyle::Color::Ansi(AnsiColor::Magenta)));

/// Manifest string for plain hint output.
pub const HINT_STYLE_PLAIN: &str = "plain";
/// Manifest string for ANSI-colored hint output.
pub const HINT_STYLE_ANSI: &str = "ansi";

/// How identifiers are highlighted in hint text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HintStyle {
    #[default]
    Plain,
    /// Callable names cyan, dependency lists magenta.
    Ansi,
}

impl HintStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plain => HINT_STYLE_PLAIN,
            Self::Ansi => HINT_STYLE_ANSI,
        }
    }

    fn paint(self, out: &mut dyn Write, style: Style, text: &str) -> fmt::Result {
        match self {
            Self::Plain => out.write_str(text),
            Self::Ansi => write!(out, "{}{}{}", style.render(), text, style.render_reset()),
        }
    }
}

/// Parses one hint style from its string form.
pub fn parse_hint_style(value: &str) -> Result<HintStyle, HintStyleError> {
    let normalized = value.trim();
    if normalized.is_empty() {
        return Err(HintStyleError::EmptyStyle);
    }

    match normalized {
        HINT_STYLE_PLAIN => Ok(HintStyle::Plain),
        HINT_STYLE_ANSI => Ok(HintStyle::Ansi),
        other => Err(HintStyleError::UnsupportedStyle(other.to_string())),
    }
}

/// Hint style parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintStyleError {
    EmptyStyle,
    UnsupportedStyle(String),
}

impl Display for HintStyleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyStyle => write!(f, "hint style must not be empty"),
            Self::UnsupportedStyle(value) => {
                write!(f, "hint style is unsupported: {value} (expected plain|ansi)")
            }
        }
    }
}

impl Error for HintStyleError {}

/// Writes the remediation sentence for `name` requiring `deps`.
///
/// Shared by dispatch hints and `MissingDependencyError`.
pub fn write_dependency_sentence(
    out: &mut dyn Write,
    name: &str,
    deps: &DependencySet,
    style: HintStyle,
) -> fmt::Result {
    style.paint(out, CALLABLE_STYLE, name)?;
    out.write_str(" depends on the package(s) ")?;
    style.paint(out, DEPENDENCY_STYLE, &deps.to_string())?;
    out.write_str(
        " but you have not installed or imported them yet. Immediately after importing them, ",
    )?;
    style.paint(out, CALLABLE_STYLE, name)?;
    out.write_str(" will be available.")
}

/// Failure hint backed by a library's `DependencyRegistry`.
pub struct DependencyHint {
    registry: Arc<DependencyRegistry>,
    style: HintStyle,
}

impl DependencyHint {
    pub fn new(registry: Arc<DependencyRegistry>, style: HintStyle) -> Self {
        Self { registry, style }
    }
}

impl FailureHint for DependencyHint {
    fn write_hint(&self, sink: &mut dyn Write, failure: &NoMatchingImplementation) {
        let Some(deps) = self.registry.lookup(failure.function()) else {
            return;
        };

        let mut rendered = String::new();
        if write_dependency_sentence(&mut rendered, failure.function().name(), &deps, self.style)
            .is_err()
        {
            warn!(
                "event=dependency_hint module=diagnostic status=render_failed function={}",
                failure.function()
            );
            return;
        }
        if sink.write_str(&rendered).is_err() {
            debug!(
                "event=dependency_hint module=diagnostic status=sink_failed function={}",
                failure.function()
            );
        }
    }
}

/// Registers a `DependencyHint` for `registry` with the host hook table.
///
/// Call once during library initialization. Passing `None` means the host has
/// no hook table; installation is skipped and `false` is returned.
pub fn install_dependency_hint(
    hooks: Option<&FailureHooks>,
    registry: Arc<DependencyRegistry>,
    style: HintStyle,
) -> bool {
    let Some(hooks) = hooks else {
        info!("event=hint_install module=diagnostic status=skipped reason=no_hook_table");
        return false;
    };

    hooks.register(Arc::new(DependencyHint::new(registry, style)));
    info!(
        "event=hint_install module=diagnostic status=ok style={} hooks={}",
        style.as_str(),
        hooks.len()
    );
    true
}

#[cfg(test)]
mod tests {
    use super::{
        install_dependency_hint, parse_hint_style, write_dependency_sentence, DependencyHint,
        HintStyle, HintStyleError, CALLABLE_STYLE, DEPENDENCY_STYLE,
    };
    use crate::deps::registry::DependencyRegistry;
    use crate::dispatch::generic::NoMatchingImplementation;
    use crate::dispatch::hooks::{FailureHint, FailureHooks};
    use crate::model::identity::{CallableId, DependencySet, ModuleId};
    use crate::model::value::Args;
    use std::fmt::{self, Write};
    use std::sync::Arc;

    fn id(name: &str) -> CallableId {
        CallableId::new(ModuleId::new("MyPkg").expect("valid module"), name).expect("valid id")
    }

    fn registry_with(name: &str, deps: &[&str]) -> Arc<DependencyRegistry> {
        let registry = Arc::new(DependencyRegistry::new());
        registry.register(
            id(name),
            DependencySet::new(deps.iter().copied()).expect("valid deps"),
        );
        registry
    }

    fn fancy_hint() -> DependencyHint {
        DependencyHint::new(
            registry_with("fancy_function", &["FancyDep"]),
            HintStyle::Plain,
        )
    }

    #[test]
    fn registered_callable_gets_hint() {
        let hint = fancy_hint();
        let failure =
            NoMatchingImplementation::new(id("fancy_function"), &Args::positional([1_i64, 2]));

        let mut out = String::new();
        hint.write_hint(&mut out, &failure);
        assert_eq!(
            out,
            "fancy_function depends on the package(s) FancyDep but you have not installed or \
             imported them yet. Immediately after importing them, fancy_function will be available."
        );
    }

    #[test]
    fn unregistered_callable_gets_nothing() {
        let hint = fancy_hint();
        let failure = NoMatchingImplementation::new(id("plain_function"), &Args::new());

        let mut out = String::new();
        hint.write_hint(&mut out, &failure);
        assert!(out.is_empty());
    }

    #[test]
    fn every_dependency_is_listed_once_in_order() {
        let hint = DependencyHint::new(
            registry_with("fancy_function", &["FancyDep", "OtherDep"]),
            HintStyle::Plain,
        );
        let failure = NoMatchingImplementation::new(id("fancy_function"), &Args::new());

        let mut out = String::new();
        hint.write_hint(&mut out, &failure);
        assert!(out.contains("the package(s) FancyDep, OtherDep but"));
        assert_eq!(out.matches("FancyDep").count(), 1);
        assert_eq!(out.matches("OtherDep").count(), 1);
    }

    #[test]
    fn ansi_style_wraps_identifiers() {
        let deps = DependencySet::new(["FancyDep"]).expect("valid deps");
        let mut out = String::new();
        write_dependency_sentence(&mut out, "fancy_function", &deps, HintStyle::Ansi)
            .expect("render to string");

        let name = format!(
            "{}fancy_function{}",
            CALLABLE_STYLE.render(),
            CALLABLE_STYLE.render_reset()
        );
        let dep = format!(
            "{}FancyDep{}",
            DEPENDENCY_STYLE.render(),
            DEPENDENCY_STYLE.render_reset()
        );
        assert_eq!(
            out,
            format!(
                "{name} depends on the package(s) {dep} but you have not installed or \
                 imported them yet. Immediately after importing them, {name} will be available."
            )
        );
    }

    struct FailingSink;

    impl Write for FailingSink {
        fn write_str(&mut self, _s: &str) -> fmt::Result {
            Err(fmt::Error)
        }
    }

    #[test]
    fn sink_failure_is_swallowed() {
        let hint = fancy_hint();
        let failure = NoMatchingImplementation::new(id("fancy_function"), &Args::new());
        hint.write_hint(&mut FailingSink, &failure);
    }

    #[test]
    fn install_skips_when_hook_table_is_absent() {
        let registry = registry_with("fancy_function", &["FancyDep"]);
        assert!(!install_dependency_hint(None, registry, HintStyle::Plain));
    }

    #[test]
    fn install_registers_with_hook_table() {
        let hooks = FailureHooks::new();
        let registry = registry_with("fancy_function", &["FancyDep"]);
        assert!(install_dependency_hint(Some(&hooks), registry, HintStyle::Plain));
        assert_eq!(hooks.len(), 1);

        let failure = NoMatchingImplementation::new(id("fancy_function"), &Args::new());
        let hints = hooks.collect_hints(&failure);
        assert_eq!(hints.len(), 1);
        assert!(hints[0].starts_with("fancy_function depends on"));
    }

    #[test]
    fn parses_hint_styles() {
        assert_eq!(parse_hint_style(" plain ").expect("plain parse"), HintStyle::Plain);
        assert_eq!(parse_hint_style("ansi").expect("ansi parse"), HintStyle::Ansi);
        assert_eq!(
            parse_hint_style("  ").expect_err("empty style must fail"),
            HintStyleError::EmptyStyle
        );
        assert_eq!(
            parse_hint_style("ANSI").expect_err("uppercase style must fail"),
            HintStyleError::UnsupportedStyle("ANSI".to_string())
        );
    }
}
