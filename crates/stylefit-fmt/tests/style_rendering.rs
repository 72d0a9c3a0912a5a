use stylefit_core::{OptionValue, Style};
use stylefit_fmt::{create_adapter, ClangFormatTool, ExecOptions, Formatter, SpacerTool};

#[test]
fn clang_inline_style_text_is_flow_yaml() {
    let mut style = Style::new();
    style.set("BasedOnStyle", OptionValue::Enum("Google".to_string()));
    style.set("IndentWidth", OptionValue::Int(2));
    style.set_nested("BraceWrapping", "AfterClass", OptionValue::Bool(true));
    let text = stylefit_fmt::clang_inline_style_text(&style);
    assert_eq!(
        text,
        "{BasedOnStyle: Google, BraceWrapping: {AfterClass: true}, IndentWidth: 2}"
    );
}

#[test]
fn clang_config_style_text_is_block_yaml() {
    let mut style = Style::new();
    style.set("BasedOnStyle", OptionValue::Enum("LLVM".to_string()));
    style.set_nested("BraceWrapping", "AfterEnum", OptionValue::Bool(true));
    let text = stylefit_fmt::clang_config_style_text(&style);
    assert_eq!(text, "BasedOnStyle: LLVM\nBraceWrapping:\n  AfterEnum: true\n");
}

#[test]
fn spacer_is_always_constructible_through_the_registry() {
    let adapter = create_adapter("spacer", ExecOptions::default()).expect("spacer");
    assert_eq!(adapter.name(), "spacer");
    assert!(!adapter.base_styles().is_empty());
    assert!(!adapter.options().is_empty());
}

#[test]
fn unknown_formatter_is_rejected_with_a_hint() {
    let err = create_adapter("fancyfmt", ExecOptions::default()).expect_err("must fail");
    assert!(err.has_code("formatter-unavailable"));
    assert!(err.info().hint.as_deref().unwrap_or("").contains("spacer"));
}

#[test]
fn spacer_options_are_canonically_ordered() {
    let tool = SpacerTool::new();
    let names: Vec<&str> = tool.options().iter().map(|def| def.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}

#[test]
fn clang_invalid_style_diagnostics_are_recognized() {
    assert!(stylefit_fmt::is_invalid_style_stderr(
        b"Error parsing -style: Unsuitable\n"
    ));
    assert!(stylefit_fmt::is_invalid_style_stderr(
        b"YAML:1:14: error: unknown key\nError parsing -style: Invalid argument\n"
    ));
    assert!(!stylefit_fmt::is_invalid_style_stderr(
        b"main.c:3:1: error: expected expression\n"
    ));
    assert!(!stylefit_fmt::is_invalid_style_stderr(b""));
}

#[test]
fn clang_probe_failure_carries_stable_code() {
    let err = ClangFormatTool::with_executable(
        "clang-format-definitely-not-installed",
        ExecOptions::default(),
    )
    .expect_err("nonexistent executable must fail the probe");
    assert!(err.has_code("formatter-unavailable"));
}
