use stylefit_core::serde::{from_json_slice, to_canonical_json_bytes};
use stylefit_core::{Distance, OptionValue, Style};

#[test]
fn style_roundtrips_through_canonical_json() {
    let mut style = Style::new();
    style.set("BasedOnStyle", OptionValue::Enum("Google".to_string()));
    style.set("IndentWidth", OptionValue::Int(2));
    style.set("AlignTrailingComments", OptionValue::Bool(true));
    style.set_nested("BraceWrapping", "AfterClass", OptionValue::Bool(true));

    let bytes = to_canonical_json_bytes(&style).expect("serialize");
    let restored: Style = from_json_slice(&bytes).expect("deserialize");
    assert_eq!(style, restored);

    let again = to_canonical_json_bytes(&restored).expect("serialize again");
    assert_eq!(bytes, again);
}

#[test]
fn canonical_json_sorts_keys() {
    let mut style = Style::new();
    style.set("Zebra", OptionValue::Bool(true));
    style.set("Alpha", OptionValue::Int(1));
    let text = String::from_utf8(to_canonical_json_bytes(&style).expect("serialize")).expect("utf8");
    let alpha = text.find("Alpha").expect("alpha present");
    let zebra = text.find("Zebra").expect("zebra present");
    assert!(alpha < zebra, "keys must serialize sorted: {text}");
}

#[test]
fn infinite_distance_survives_roundtrip() {
    let bytes = to_canonical_json_bytes(&Distance::INFINITE).expect("serialize");
    let restored: Distance = from_json_slice(&bytes).expect("deserialize");
    assert!(restored.is_infinite());
}
