//! Adapter for clang-format.
//!
//! The style is passed inline via `-style={...}`; the option table is a
//! curated subset of the tool's stable options with LLVM defaults. The
//! `-dump-config` output backs [`ClangFormatTool::effective_style`].

use std::path::Path;

use stylefit_core::errors::CODE_FORMATTER_UNAVAILABLE;
use stylefit_core::{
    ErrorInfo, FormatterFingerprint, NamedStyle, OptionDef, OptionDomain, OptionValue, Style,
    StyleFitError,
};

use crate::exec::{run_with_stdin, version_banner, ExecOptions};
use crate::FormatOutcome;

const BASE_OPTION: &str = "BasedOnStyle";
const BASE_STYLES: &[&str] = &["Chromium", "Google", "LLVM", "Mozilla", "WebKit"];

/// clang-format behind the [`crate::Formatter`] contract.
#[derive(Debug)]
pub struct ClangFormatTool {
    executable: String,
    fingerprint: FormatterFingerprint,
    options: Vec<OptionDef>,
    exec: ExecOptions,
}

impl ClangFormatTool {
    /// Locates `clang-format` on PATH and captures its version banner.
    pub fn probe(exec: ExecOptions) -> Result<Self, StyleFitError> {
        Self::with_executable("clang-format", exec)
    }

    /// Builds the adapter around a specific executable.
    pub fn with_executable(executable: &str, exec: ExecOptions) -> Result<Self, StyleFitError> {
        let banner = version_banner(executable, &["--version".to_string()]).map_err(|err| {
            StyleFitError::Formatter(
                ErrorInfo::new(
                    CODE_FORMATTER_UNAVAILABLE,
                    format!("cannot run {executable}: {}", err.info().message),
                )
                .suggest("install clang-format or put it on PATH"),
            )
        })?;
        Ok(Self {
            executable: executable.to_string(),
            fingerprint: FormatterFingerprint::from_identity("clang-format", &banner),
            options: builtin_options(),
            exec,
        })
    }

    /// Adapter name.
    pub fn name(&self) -> &str {
        "clang-format"
    }

    /// Tool identity for cache keys.
    pub fn fingerprint(&self) -> &FormatterFingerprint {
        &self.fingerprint
    }

    /// Option declarations.
    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    /// The named presets, each carried as a `BasedOnStyle` assignment.
    pub fn base_styles(&self) -> Vec<NamedStyle> {
        BASE_STYLES
            .iter()
            .map(|name| {
                let mut style = Style::new();
                style.set(BASE_OPTION, OptionValue::Enum((*name).to_string()));
                NamedStyle::new(*name, style)
            })
            .collect()
    }

    /// clang-format's base-style marker option.
    pub fn base_option_name(&self) -> Option<&str> {
        Some(BASE_OPTION)
    }

    /// Invokes the tool with the inline style text.
    pub fn format(
        &self,
        style: &Style,
        source: &[u8],
        filename_hint: Option<&Path>,
    ) -> Result<FormatOutcome, StyleFitError> {
        let mut args = vec![format!("-style={}", inline_style_text(style))];
        if let Some(hint) = filename_hint {
            args.push(format!("-assume-filename={}", hint.display()));
        }
        let result = run_with_stdin(&self.executable, &args, source, self.exec.timeout)?;
        if result.timed_out {
            return Ok(FormatOutcome::TimedOut);
        }
        // clang-format complains about a bad -style on stderr whether or not
        // it manages to exit cleanly; either way the style is the culprit.
        if is_invalid_style_stderr(&result.stderr) {
            return Ok(FormatOutcome::InvalidOption {
                detail: first_line(&result.stderr),
            });
        }
        if result.exit != Some(0) {
            return Ok(FormatOutcome::Error {
                detail: first_line(&result.stderr),
            });
        }
        // A clean exit with empty output for non-empty input means the
        // effective result is the unchanged input.
        if result.stdout.is_empty() && !source.is_empty() {
            return Ok(FormatOutcome::Formatted(source.to_vec()));
        }
        Ok(FormatOutcome::Formatted(result.stdout))
    }

    /// Renders the style as `.clang-format` YAML.
    pub fn style_text(&self, style: &Style) -> String {
        config_style_text(style)
    }

    /// Resolves effective defaults via `-dump-config`.
    pub fn effective_style(&self, style: &Style) -> Option<Style> {
        let args = vec![
            format!("-style={}", inline_style_text(style)),
            "-dump-config".to_string(),
        ];
        let result = run_with_stdin(&self.executable, &args, b"", self.exec.timeout).ok()?;
        if !result.success() || result.stdout.is_empty() {
            return None;
        }
        let dump: serde_yaml::Value = serde_yaml::from_slice(&result.stdout).ok()?;
        if !dump.is_mapping() {
            return None;
        }
        let mut effective = Style::new();
        for def in &self.options {
            // Options this clang-format version does not report are skipped.
            let Some(value) = dump.get(def.name.as_str()) else {
                continue;
            };
            if let Some(converted) = yaml_to_option_value(value, def) {
                effective.set(def.name.clone(), converted);
            }
        }
        Some(effective)
    }
}

/// Recognizes clang-format's "Unsuitable"/"Invalid -style" diagnostics on
/// stderr, which mean the style was rejected rather than the input.
pub fn is_invalid_style_stderr(stderr: &[u8]) -> bool {
    let text = String::from_utf8_lossy(stderr);
    text.starts_with("Error parsing -style: Unsuitable")
        || (text.starts_with("YAML:") && text.contains("Error parsing -style: Invalid "))
}

fn first_line(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .lines()
        .next()
        .unwrap_or("formatter failed")
        .to_string()
}

fn yaml_to_option_value(value: &serde_yaml::Value, def: &OptionDef) -> Option<OptionValue> {
    match (&def.domain, value) {
        (OptionDomain::Boolean, serde_yaml::Value::Bool(v)) => Some(OptionValue::Bool(*v)),
        (OptionDomain::BoundedInt { .. }, serde_yaml::Value::Number(v)) => {
            Some(OptionValue::Int(v.as_i64()?))
        }
        (OptionDomain::Enumerated { .. }, serde_yaml::Value::String(v)) => {
            Some(OptionValue::Enum(v.clone()))
        }
        (OptionDomain::Composite { children }, serde_yaml::Value::Mapping(_)) => {
            let mut nested = std::collections::BTreeMap::new();
            for child in children {
                let Some(raw) = value.get(child.name.as_str()) else {
                    continue;
                };
                if let Some(converted) = yaml_to_option_value(raw, child) {
                    nested.insert(child.name.clone(), converted);
                }
            }
            if nested.is_empty() {
                None
            } else {
                Some(OptionValue::Nested(nested))
            }
        }
        _ => None,
    }
}

/// Inline flow form accepted by `-style=`, e.g.
/// `{BasedOnStyle: Google, IndentWidth: 2}`.
pub fn inline_style_text(style: &Style) -> String {
    fn value_text(value: &OptionValue) -> String {
        match value {
            OptionValue::Nested(children) => {
                let inner: Vec<String> = children
                    .iter()
                    .map(|(name, value)| format!("{name}: {}", value_text(value)))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            scalar => scalar.token(),
        }
    }
    let fields: Vec<String> = style
        .iter()
        .map(|(name, value)| format!("{name}: {}", value_text(value)))
        .collect();
    format!("{{{}}}", fields.join(", "))
}

/// Block form suitable for a `.clang-format` file.
pub fn config_style_text(style: &Style) -> String {
    let mut lines = Vec::new();
    for (name, value) in style.iter() {
        match value {
            OptionValue::Nested(children) => {
                lines.push(format!("{name}:"));
                for (child, child_value) in children {
                    lines.push(format!("  {child}: {}", child_value.token()));
                }
            }
            scalar => lines.push(format!("{name}: {}", scalar.token())),
        }
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn builtin_options() -> Vec<OptionDef> {
    vec![
        OptionDef::bounded_int("AccessModifierOffset", -8, 8, &[-4, -2, -1, 0], -2),
        OptionDef::enumerated(
            "AlignAfterOpenBracket",
            &["Align", "DontAlign", "AlwaysBreak"],
            "Align",
        ),
        OptionDef::boolean("AlignConsecutiveAssignments", false),
        OptionDef::boolean("AlignConsecutiveDeclarations", false),
        OptionDef::boolean("AlignOperands", true),
        OptionDef::boolean("AlignTrailingComments", true),
        OptionDef::boolean("AllowShortBlocksOnASingleLine", false),
        OptionDef::enumerated(
            "AllowShortFunctionsOnASingleLine",
            &["None", "InlineOnly", "Empty", "Inline", "All"],
            "All",
        ),
        OptionDef::boolean("AllowShortIfStatementsOnASingleLine", false),
        OptionDef::enumerated(
            "AlwaysBreakAfterReturnType",
            &["None", "All", "TopLevel", "AllDefinitions", "TopLevelDefinitions"],
            "None",
        ),
        OptionDef::boolean("AlwaysBreakBeforeMultilineStrings", false),
        OptionDef::boolean("AlwaysBreakTemplateDeclarations", false),
        OptionDef::boolean("BinPackArguments", true),
        OptionDef::boolean("BinPackParameters", true),
        OptionDef::composite(
            "BraceWrapping",
            vec![
                OptionDef::boolean("AfterClass", false),
                OptionDef::boolean("AfterControlStatement", false),
                OptionDef::boolean("AfterEnum", false),
                OptionDef::boolean("AfterFunction", false),
                OptionDef::boolean("AfterNamespace", false),
                OptionDef::boolean("AfterStruct", false),
                OptionDef::boolean("AfterUnion", false),
                OptionDef::boolean("BeforeCatch", false),
                OptionDef::boolean("BeforeElse", false),
                OptionDef::boolean("IndentBraces", false),
            ],
        ),
        OptionDef::enumerated(
            "BreakBeforeBinaryOperators",
            &["None", "NonAssignment", "All"],
            "None",
        ),
        OptionDef::enumerated(
            "BreakBeforeBraces",
            &["Attach", "Linux", "Mozilla", "Stroustrup", "Allman", "GNU", "WebKit", "Custom"],
            "Attach",
        ),
        OptionDef::boolean("BreakConstructorInitializersBeforeComma", false),
        OptionDef::bounded_int("ColumnLimit", 0, 200, &[0, 60, 79, 80, 90, 100, 110, 120], 80),
        OptionDef::bounded_int("ConstructorInitializerIndentWidth", 0, 8, &[0, 2, 4], 4),
        OptionDef::bounded_int("ContinuationIndentWidth", 0, 8, &[0, 2, 4, 8], 4),
        OptionDef::boolean("Cpp11BracedListStyle", true),
        OptionDef::boolean("DerivePointerAlignment", false),
        OptionDef::boolean("IndentCaseLabels", false),
        OptionDef::bounded_int("IndentWidth", 0, 8, &[0, 1, 2, 3, 4, 5, 6, 7, 8], 2),
        OptionDef::boolean("IndentWrappedFunctionNames", false),
        OptionDef::boolean("KeepEmptyLinesAtTheStartOfBlocks", true),
        OptionDef::bounded_int("MaxEmptyLinesToKeep", 0, 2, &[0, 1, 2], 1),
        OptionDef::enumerated("NamespaceIndentation", &["None", "Inner", "All"], "None"),
        OptionDef::enumerated("PointerAlignment", &["Left", "Right", "Middle"], "Right"),
        OptionDef::boolean("ReflowComments", true),
        OptionDef::boolean("SortIncludes", true),
        OptionDef::boolean("SpaceAfterCStyleCast", false),
        OptionDef::boolean("SpaceBeforeAssignmentOperators", true),
        OptionDef::enumerated(
            "SpaceBeforeParens",
            &["Never", "ControlStatements", "Always"],
            "ControlStatements",
        ),
        OptionDef::boolean("SpaceInEmptyParentheses", false),
        OptionDef::bounded_int("SpacesBeforeTrailingComments", 0, 4, &[0, 1, 2], 1),
        OptionDef::boolean("SpacesInAngles", false),
        OptionDef::boolean("SpacesInParentheses", false),
        OptionDef::boolean("SpacesInSquareBrackets", false),
        OptionDef::enumerated("Standard", &["Cpp03", "Cpp11", "Auto"], "Cpp11"),
        OptionDef::bounded_int("TabWidth", 1, 8, &[1, 2, 3, 4, 5, 6, 7, 8], 8),
        OptionDef::enumerated(
            "UseTab",
            &["Never", "ForIndentation", "ForContinuationAndIndentation", "Always"],
            "Never",
        ),
    ]
}
