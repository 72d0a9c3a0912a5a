#![deny(missing_docs)]
#![doc = "Formatter capability contract and tool adapters. The search engine consumes the [`Formatter`] trait; each supported tool implements it behind the [`FormatterAdapter`] tagged sum."]

use std::path::Path;

use stylefit_core::errors::CODE_FORMATTER_UNAVAILABLE;
use stylefit_core::{ErrorInfo, FormatterFingerprint, NamedStyle, OptionDef, Style, StyleFitError};

mod clang_format;
pub mod exec;
mod rustfmt;
mod spacer;

pub use clang_format::{
    config_style_text as clang_config_style_text, inline_style_text as clang_inline_style_text,
    is_invalid_style_stderr, ClangFormatTool,
};
pub use exec::{ExecOptions, ExeResult};
pub use rustfmt::RustfmtTool;
pub use spacer::SpacerTool;

/// Result of applying a style to one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOutcome {
    /// Reformatted bytes.
    Formatted(Vec<u8>),
    /// The tool rejected the style itself (unknown option or value, or a
    /// combination it considers unsuitable). Distinguished from a generic
    /// error so the search can attribute the failure to the trial, not the
    /// input.
    InvalidOption {
        /// Short diagnostic extracted from the tool's stderr.
        detail: String,
    },
    /// The tool rejected the invocation (nonzero exit with empty output,
    /// unsupported input).
    Error {
        /// Short diagnostic extracted from the tool's stderr or exit status.
        detail: String,
    },
    /// The per-call wall-clock timeout was exceeded.
    TimedOut,
}

/// Capability contract every adapter exposes to the core.
///
/// `format` must behave as a pure function of (style, source, filename
/// hint); it is invoked concurrently from multiple workers, and adapters
/// serialize internally only if their tool requires it. The core never
/// mutates options or styles received from an adapter.
pub trait Formatter: Send + Sync {
    /// Adapter name, as selected by the caller (e.g. "clang-format").
    fn name(&self) -> &str;

    /// Identity of the tool binary and version, keyed into the cache.
    fn fingerprint(&self) -> &FormatterFingerprint;

    /// Ordered option declarations for this formatter.
    fn options(&self) -> &[OptionDef];

    /// Named base styles (preset bundles) exposed by the formatter.
    fn base_styles(&self) -> Vec<NamedStyle>;

    /// Name of the option carrying the base-style marker, if the formatter
    /// has one (e.g. clang-format's `BasedOnStyle`). Excluded from
    /// cardinality counts.
    fn base_option_name(&self) -> Option<&str> {
        None
    }

    /// Applies `style` to `source`, returning reformatted bytes or a
    /// formatter-error marker.
    fn format(
        &self,
        style: &Style,
        source: &[u8],
        filename_hint: Option<&Path>,
    ) -> Result<FormatOutcome, StyleFitError>;

    /// Renders the style in the tool's native configuration syntax.
    fn style_text(&self, style: &Style) -> String;

    /// Resolves the defaults the tool would apply under `style`, when the
    /// tool can report them. Consumed by resilient mode; `None` when
    /// unsupported or unobtainable.
    fn effective_style(&self, style: &Style) -> Option<Style> {
        let _ = style;
        None
    }
}

/// The adapters shipped with this repository, as a tagged sum with uniform
/// operations.
#[derive(Debug)]
pub enum FormatterAdapter {
    /// clang-format (C/C++/Java/JavaScript/Objective-C/Protobuf).
    ClangFormat(ClangFormatTool),
    /// rustfmt (Rust).
    Rustfmt(RustfmtTool),
    /// Built-in in-process reindenter; needs no external tool.
    Spacer(SpacerTool),
}

macro_rules! delegate {
    ($self:ident, $tool:ident => $body:expr) => {
        match $self {
            FormatterAdapter::ClangFormat($tool) => $body,
            FormatterAdapter::Rustfmt($tool) => $body,
            FormatterAdapter::Spacer($tool) => $body,
        }
    };
}

impl Formatter for FormatterAdapter {
    fn name(&self) -> &str {
        delegate!(self, tool => tool.name())
    }

    fn fingerprint(&self) -> &FormatterFingerprint {
        delegate!(self, tool => tool.fingerprint())
    }

    fn options(&self) -> &[OptionDef] {
        delegate!(self, tool => tool.options())
    }

    fn base_styles(&self) -> Vec<NamedStyle> {
        delegate!(self, tool => tool.base_styles())
    }

    fn base_option_name(&self) -> Option<&str> {
        delegate!(self, tool => tool.base_option_name())
    }

    fn format(
        &self,
        style: &Style,
        source: &[u8],
        filename_hint: Option<&Path>,
    ) -> Result<FormatOutcome, StyleFitError> {
        delegate!(self, tool => tool.format(style, source, filename_hint))
    }

    fn style_text(&self, style: &Style) -> String {
        delegate!(self, tool => tool.style_text(style))
    }

    fn effective_style(&self, style: &Style) -> Option<Style> {
        delegate!(self, tool => tool.effective_style(style))
    }
}

/// Names accepted by [`create_adapter`].
pub const SUPPORTED_FORMATTERS: &[&str] = &["clang-format", "rustfmt", "spacer"];

/// Constructs the adapter selected by `name`, probing tool availability.
pub fn create_adapter(name: &str, exec: ExecOptions) -> Result<FormatterAdapter, StyleFitError> {
    match name {
        "clang-format" => Ok(FormatterAdapter::ClangFormat(ClangFormatTool::probe(exec)?)),
        "rustfmt" => Ok(FormatterAdapter::Rustfmt(RustfmtTool::probe(exec)?)),
        "spacer" => Ok(FormatterAdapter::Spacer(SpacerTool::new())),
        other => Err(StyleFitError::Formatter(
            ErrorInfo::new(
                CODE_FORMATTER_UNAVAILABLE,
                format!("unknown formatter '{other}'"),
            )
            .suggest(format!("supported: {}", SUPPORTED_FORMATTERS.join(", "))),
        )),
    }
}
