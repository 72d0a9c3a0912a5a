use stylefit_core::{OptionValue, Style};

#[test]
fn fingerprint_ignores_insertion_order() {
    let mut a = Style::new();
    a.set("IndentWidth", OptionValue::Int(2));
    a.set("UseTab", OptionValue::Enum("Never".to_string()));

    let mut b = Style::new();
    b.set("UseTab", OptionValue::Enum("Never".to_string()));
    b.set("IndentWidth", OptionValue::Int(2));

    assert_eq!(a, b);
    assert_eq!(
        a.fingerprint().expect("fp a"),
        b.fingerprint().expect("fp b")
    );
    assert_eq!(
        a.canonical_bytes().expect("bytes a"),
        b.canonical_bytes().expect("bytes b")
    );
}

#[test]
fn fingerprint_distinguishes_values() {
    let mut a = Style::new();
    a.set("IndentWidth", OptionValue::Int(2));
    let mut b = Style::new();
    b.set("IndentWidth", OptionValue::Int(4));
    assert_ne!(a.fingerprint().expect("fp"), b.fingerprint().expect("fp"));
}

#[test]
fn canonical_bytes_order_ties_by_option_name() {
    // Two single-option styles compare by their first differing key, so the
    // lexicographically earlier option name wins deterministic tie-breaks.
    let mut a = Style::new();
    a.set("AlignAfterOpenBracket", OptionValue::Enum("Align".to_string()));
    let mut b = Style::new();
    b.set("BinPackArguments", OptionValue::Bool(false));
    assert!(a.canonical_bytes().expect("a") < b.canonical_bytes().expect("b"));
}

#[test]
fn cardinality_counts_nested_leaves_and_skips_base_marker() {
    let mut style = Style::new();
    style.set("BasedOnStyle", OptionValue::Enum("LLVM".to_string()));
    style.set("IndentWidth", OptionValue::Int(2));
    style.set_nested("BraceWrapping", "AfterClass", OptionValue::Bool(true));
    style.set_nested("BraceWrapping", "AfterEnum", OptionValue::Bool(false));

    assert_eq!(style.cardinality(Some("BasedOnStyle")), 3);
    assert_eq!(style.cardinality(None), 4);
}

#[test]
fn removing_an_option_restores_the_empty_style() {
    let mut style = Style::new();
    style.set("max_width", OptionValue::Int(80));
    style.remove("max_width");
    assert!(style.is_empty());
    assert_eq!(
        style.fingerprint().expect("fp"),
        Style::new().fingerprint().expect("fp")
    );
}
