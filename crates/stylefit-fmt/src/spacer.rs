//! Built-in brace-depth reindenter.
//!
//! Spacer runs in-process and needs no external tool, which makes it the
//! vehicle for `doctor` self-checks, scenario tests, and benchmarks: the
//! whole engine can be exercised hermetically. It reindents each line to
//! the current brace/bracket nesting depth and normalizes blank-line runs.

use std::collections::BTreeMap;
use std::path::Path;

use stylefit_core::{
    FormatterFingerprint, NamedStyle, OptionDef, OptionValue, Style, StyleFitError,
};

use crate::{FormatOutcome, Formatter};

const INDENT_WIDTH: &str = "indent_width";
const USE_TABS: &str = "use_tabs";
const MAX_BLANK_LINES: &str = "max_blank_lines";

/// The in-process reference formatter.
#[derive(Debug)]
pub struct SpacerTool {
    fingerprint: FormatterFingerprint,
    options: Vec<OptionDef>,
}

impl Default for SpacerTool {
    fn default() -> Self {
        Self::new()
    }
}

impl SpacerTool {
    /// Builds the adapter; always available.
    pub fn new() -> Self {
        Self {
            fingerprint: FormatterFingerprint::from_identity("spacer", "builtin 1"),
            options: vec![
                OptionDef::bounded_int(INDENT_WIDTH, 0, 8, &[0, 1, 2, 3, 4, 5, 6, 7, 8], 4),
                OptionDef::bounded_int(MAX_BLANK_LINES, 0, 2, &[0, 1, 2], 1),
                OptionDef::boolean(USE_TABS, false),
            ],
        }
    }

    /// Adapter name.
    pub fn name(&self) -> &str {
        "spacer"
    }

    /// Stable identity; there is no external binary to version.
    pub fn fingerprint(&self) -> &FormatterFingerprint {
        &self.fingerprint
    }

    /// Option declarations.
    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    /// Preset bundles.
    pub fn base_styles(&self) -> Vec<NamedStyle> {
        let mut compact = Style::new();
        compact.set(INDENT_WIDTH, OptionValue::Int(2));
        compact.set(MAX_BLANK_LINES, OptionValue::Int(0));
        vec![
            NamedStyle::new("compact", compact),
            NamedStyle::new("plain", Style::new()),
        ]
    }

    /// Spacer has no base-style marker option.
    pub fn base_option_name(&self) -> Option<&str> {
        None
    }

    /// Reindents the source; pure and infallible.
    pub fn format(
        &self,
        style: &Style,
        source: &[u8],
        _filename_hint: Option<&Path>,
    ) -> Result<FormatOutcome, StyleFitError> {
        let indent_width = int_option(style, INDENT_WIDTH, 4);
        let max_blank = int_option(style, MAX_BLANK_LINES, 1);
        let use_tabs = bool_option(style, USE_TABS, false);
        let text = String::from_utf8_lossy(source);

        let unit = if use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(indent_width as usize)
        };
        let mut depth: i64 = 0;
        let mut blank_run = 0usize;
        let mut out = String::with_capacity(text.len());
        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                blank_run += 1;
                if blank_run <= max_blank as usize {
                    out.push('\n');
                }
                continue;
            }
            blank_run = 0;
            let leading_closers = trimmed
                .chars()
                .take_while(|c| matches!(c, '}' | ')' | ']'))
                .count() as i64;
            let line_depth = (depth - leading_closers).max(0);
            for _ in 0..line_depth {
                out.push_str(&unit);
            }
            out.push_str(trimmed);
            out.push('\n');
            for c in trimmed.chars() {
                match c {
                    '{' | '(' | '[' => depth += 1,
                    '}' | ')' | ']' => depth = (depth - 1).max(0),
                    _ => {}
                }
            }
        }
        Ok(FormatOutcome::Formatted(out.into_bytes()))
    }

    /// Renders the style as canonical JSON, spacer's native config syntax.
    pub fn style_text(&self, style: &Style) -> String {
        style
            .canonical_bytes()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_else(|_| "{}".to_string())
    }

    /// Spacer's effective configuration is its defaults overlaid with the
    /// explicit style.
    pub fn effective_style(&self, style: &Style) -> Option<Style> {
        let mut effective: BTreeMap<String, OptionValue> = self
            .options
            .iter()
            .map(|def| (def.name.clone(), def.default.clone()))
            .collect();
        for (name, value) in style.iter() {
            effective.insert(name.clone(), value.clone());
        }
        Some(effective.into_iter().collect())
    }
}

impl Formatter for SpacerTool {
    fn name(&self) -> &str {
        SpacerTool::name(self)
    }

    fn fingerprint(&self) -> &FormatterFingerprint {
        SpacerTool::fingerprint(self)
    }

    fn options(&self) -> &[OptionDef] {
        SpacerTool::options(self)
    }

    fn base_styles(&self) -> Vec<NamedStyle> {
        SpacerTool::base_styles(self)
    }

    fn base_option_name(&self) -> Option<&str> {
        SpacerTool::base_option_name(self)
    }

    fn format(
        &self,
        style: &Style,
        source: &[u8],
        filename_hint: Option<&Path>,
    ) -> Result<FormatOutcome, StyleFitError> {
        SpacerTool::format(self, style, source, filename_hint)
    }

    fn style_text(&self, style: &Style) -> String {
        SpacerTool::style_text(self, style)
    }

    fn effective_style(&self, style: &Style) -> Option<Style> {
        SpacerTool::effective_style(self, style)
    }
}

fn int_option(style: &Style, name: &str, default: i64) -> i64 {
    match style.get(name) {
        Some(OptionValue::Int(v)) => *v,
        _ => default,
    }
}

fn bool_option(style: &Style, name: &str, default: bool) -> bool {
    match style.get(name) {
        Some(OptionValue::Bool(v)) => *v,
        _ => default,
    }
}
