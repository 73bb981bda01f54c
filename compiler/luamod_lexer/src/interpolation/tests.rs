use pretty_assertions::assert_eq;

use super::{names, rename_names, segments};

fn spelled(text: &str) -> Vec<&str> {
    names(text).into_iter().map(|r| &text[r]).collect()
}

// === Segments ===

#[test]
fn segments_are_the_brace_bodies() {
    let text = "`a {x} b {y + 1}`";
    let bodies: Vec<&str> = segments(text).into_iter().map(|r| &text[r]).collect();
    assert_eq!(bodies, ["x", "y + 1"]);
}

#[test]
fn escaped_brace_opens_nothing() {
    assert!(segments(r"`\{x} literal`").is_empty());
}

#[test]
fn other_literals_have_no_segments() {
    assert!(segments("\"{x}\"").is_empty());
    assert!(segments("[[{x}]]").is_empty());
}

#[test]
fn braces_inside_the_expression_nest() {
    let text = "`{f({a = 1})} {\"}\" .. s}`";
    let bodies: Vec<&str> = segments(text).into_iter().map(|r| &text[r]).collect();
    assert_eq!(bodies, ["f({a = 1})", "\"}\" .. s"]);
}

#[test]
fn unclosed_segment_is_ignored() {
    assert!(segments("`{x").is_empty());
}

// === Names ===

#[test]
fn fields_and_keywords_are_not_names() {
    assert_eq!(spelled("`{obj.count} {obj:get(n)} {a and b}`"), ["obj", "obj", "n", "a", "b"]);
}

#[test]
fn nested_template_names_are_found() {
    assert_eq!(spelled("`{`{inner}`} {outer}`"), ["inner", "outer"]);
}

// === Renaming ===

#[test]
fn renames_only_mapped_names() {
    let out = rename_names("`x={x}, y={y}, x.x={x.x}`", |n| (n == "x").then_some("a"));
    assert_eq!(out.as_deref(), Some("`x={a}, y={y}, x.x={a.x}`"));
}

#[test]
fn unchanged_text_is_none() {
    assert_eq!(rename_names("`{y}`", |_| None), None);
    assert_eq!(rename_names("\"{x}\"", |_| Some("a")), None);
}
