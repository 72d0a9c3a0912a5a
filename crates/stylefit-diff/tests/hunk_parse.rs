use stylefit_diff::external::parse_unified_hunks;
use stylefit_diff::HunkKind;

#[test]
fn parses_single_line_replacement_header() {
    let output = b"--- a\n+++ b\n@@ -3 +3 @@\n-old\n+new\n";
    let hunks = parse_unified_hunks(output);
    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].ref_start, 3);
    assert_eq!(hunks[0].ref_lines, 1);
    assert_eq!(hunks[0].new_lines, 1);
    assert_eq!(hunks[0].kind, HunkKind::Replace);
    assert_eq!(hunks[0].changed_lines(), 2);
}

#[test]
fn parses_insertion_and_deletion_ranges() {
    let output = b"@@ -4,0 +5,2 @@\n+x\n+y\n@@ -9,3 +12,0 @@\n-a\n-b\n-c\n";
    let hunks = parse_unified_hunks(output);
    assert_eq!(hunks.len(), 2);
    assert_eq!(hunks[0].kind, HunkKind::Insert);
    assert_eq!(hunks[0].changed_lines(), 2);
    assert_eq!(hunks[1].kind, HunkKind::Delete);
    assert_eq!(hunks[1].changed_lines(), 3);
}

#[test]
fn ignores_git_preamble_and_body_lines() {
    let output = b"diff --git a/f b/-\nindex 000..111 100644\n--- a/f\n+++ b/-\n@@ -1,2 +1,2 @@\n-aa\n-bb\n+cc\n+dd\n";
    let hunks = parse_unified_hunks(output);
    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].changed_lines(), 4);
}

#[test]
fn tolerates_trailing_section_header_text() {
    let output = b"@@ -10,2 +10,2 @@ fn main() {\n-a\n-b\n+c\n+d\n";
    let hunks = parse_unified_hunks(output);
    assert_eq!(hunks.len(), 1);
    assert_eq!(hunks[0].ref_start, 10);
}
