//! Adapter for rustfmt.
//!
//! The style is staged as a `rustfmt.toml` in a scratch directory passed
//! via `--config-path`; rustfmt reads the source from stdin and emits the
//! result on stdout. rustfmt warns on some inputs while still producing
//! output, so a nonzero exit with output is consumed.

use std::fs;
use std::path::Path;

use stylefit_core::errors::CODE_FORMATTER_UNAVAILABLE;
use stylefit_core::{
    ErrorInfo, FormatterFingerprint, NamedStyle, OptionDef, OptionValue, Style, StyleFitError,
};

use crate::exec::{run_with_stdin, version_banner, ExecOptions};
use crate::FormatOutcome;

/// rustfmt behind the [`crate::Formatter`] contract.
#[derive(Debug)]
pub struct RustfmtTool {
    executable: String,
    fingerprint: FormatterFingerprint,
    options: Vec<OptionDef>,
    exec: ExecOptions,
}

impl RustfmtTool {
    /// Locates `rustfmt` on PATH and captures its version banner.
    pub fn probe(exec: ExecOptions) -> Result<Self, StyleFitError> {
        Self::with_executable("rustfmt", exec)
    }

    /// Builds the adapter around a specific executable.
    pub fn with_executable(executable: &str, exec: ExecOptions) -> Result<Self, StyleFitError> {
        let banner = version_banner(executable, &["--version".to_string()]).map_err(|err| {
            StyleFitError::Formatter(
                ErrorInfo::new(
                    CODE_FORMATTER_UNAVAILABLE,
                    format!("cannot run {executable}: {}", err.info().message),
                )
                .suggest("install rustfmt or put it on PATH"),
            )
        })?;
        Ok(Self {
            executable: executable.to_string(),
            fingerprint: FormatterFingerprint::from_identity("rustfmt", &banner),
            options: builtin_options(),
            exec,
        })
    }

    /// Adapter name.
    pub fn name(&self) -> &str {
        "rustfmt"
    }

    /// Tool identity for cache keys.
    pub fn fingerprint(&self) -> &FormatterFingerprint {
        &self.fingerprint
    }

    /// Option declarations.
    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    /// rustfmt exposes no preset bundles; the sole base style is empty.
    pub fn base_styles(&self) -> Vec<NamedStyle> {
        vec![NamedStyle::new("default", Style::new())]
    }

    /// rustfmt has no base-style marker option.
    pub fn base_option_name(&self) -> Option<&str> {
        None
    }

    /// Invokes the tool with the staged configuration.
    pub fn format(
        &self,
        style: &Style,
        source: &[u8],
        filename_hint: Option<&Path>,
    ) -> Result<FormatOutcome, StyleFitError> {
        let _ = filename_hint; // rustfmt needs no filename for stdin input
        let scratch = tempfile::tempdir().map_err(|err| {
            StyleFitError::Formatter(ErrorInfo::new("formatter-scratch", err.to_string()))
        })?;
        fs::write(scratch.path().join("rustfmt.toml"), self.style_text(style)).map_err(|err| {
            StyleFitError::Formatter(ErrorInfo::new("formatter-scratch", err.to_string()))
        })?;
        let args = vec![
            "--config-path".to_string(),
            scratch.path().display().to_string(),
            "--emit".to_string(),
            "stdout".to_string(),
        ];
        let result = run_with_stdin(&self.executable, &args, source, self.exec.timeout)?;
        if result.timed_out {
            return Ok(FormatOutcome::TimedOut);
        }
        if result.stdout.is_empty() {
            if result.exit == Some(0) && !source.is_empty() {
                return Ok(FormatOutcome::Formatted(source.to_vec()));
            }
            if result.exit != Some(0) {
                return Ok(FormatOutcome::Error {
                    detail: first_line(&result.stderr),
                });
            }
        }
        Ok(FormatOutcome::Formatted(result.stdout))
    }

    /// Renders the style as `rustfmt.toml`.
    pub fn style_text(&self, style: &Style) -> String {
        let mut table = toml::value::Table::new();
        for (name, value) in style.iter() {
            table.insert(name.clone(), toml_value(value));
        }
        toml::Value::Table(table).to_string()
    }

    /// rustfmt cannot report its effective configuration.
    pub fn effective_style(&self, _style: &Style) -> Option<Style> {
        None
    }
}

fn toml_value(value: &OptionValue) -> toml::Value {
    match value {
        OptionValue::Bool(v) => toml::Value::Boolean(*v),
        OptionValue::Int(v) => toml::Value::Integer(*v),
        OptionValue::Enum(v) => toml::Value::String(v.clone()),
        OptionValue::Nested(children) => {
            let mut table = toml::value::Table::new();
            for (name, child) in children {
                table.insert(name.clone(), toml_value(child));
            }
            toml::Value::Table(table)
        }
    }
}

fn first_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .lines()
        .next()
        .unwrap_or("formatter failed")
        .to_string()
}

fn builtin_options() -> Vec<OptionDef> {
    vec![
        OptionDef::boolean("hard_tabs", false),
        OptionDef::bounded_int("max_width", 40, 200, &[60, 80, 100, 120], 100),
        OptionDef::enumerated(
            "newline_style",
            &["Auto", "Unix", "Windows", "Native"],
            "Auto",
        ),
        OptionDef::boolean("reorder_imports", true),
        OptionDef::boolean("reorder_modules", true),
        OptionDef::bounded_int("tab_spaces", 1, 16, &[2, 3, 4, 8], 4),
        OptionDef::enumerated(
            "use_small_heuristics",
            &["Default", "Off", "Max"],
            "Default",
        ),
        OptionDef::boolean("use_try_shorthand", false),
    ]
}
