use luamod_lexer::tokenize;
use pretty_assertions::assert_eq;

use super::{annotate, Mode};

/// Depth of every significant token, paired with its text.
fn depths(src: &str) -> Vec<(String, u32)> {
    let tokens = tokenize(src);
    let annotated = annotate(&tokens);
    tokens
        .iter()
        .zip(&annotated.depths)
        .filter(|(t, _)| !t.is_trivia())
        .map(|(t, &d)| (t.text.to_string(), d))
        .collect()
}

fn pairs(items: &[(&str, u32)]) -> Vec<(String, u32)> {
    items.iter().map(|&(t, d)| (t.to_owned(), d)).collect()
}

#[test]
fn function_body_is_one_deeper() {
    assert_eq!(
        depths("function f() x() end"),
        pairs(&[
            ("function", 0),
            ("f", 1),
            ("(", 1),
            (")", 1),
            ("x", 1),
            ("(", 1),
            (")", 1),
            ("end", 0),
        ])
    );
}

#[test]
fn else_sits_at_the_if_level() {
    assert_eq!(
        depths("if a then b else c end"),
        pairs(&[
            ("if", 0),
            ("a", 0),
            ("then", 0),
            ("b", 1),
            ("else", 0),
            ("c", 1),
            ("end", 0),
        ])
    );
}

#[test]
fn elseif_then_does_not_open_twice() {
    let annotated = annotate(&tokenize("if a then x elseif b then y else z end"));
    assert!(annotated.is_balanced());
    assert_eq!(
        depths("if a then x elseif b then y end"),
        pairs(&[
            ("if", 0),
            ("a", 0),
            ("then", 0),
            ("x", 1),
            ("elseif", 0),
            ("b", 1),
            ("then", 1),
            ("y", 1),
            ("end", 0),
        ])
    );
}

#[test]
fn repeat_until_and_loops_balance() {
    for src in [
        "repeat x = x + 1 until x > 3",
        "while true do break end",
        "for i = 1, 3 do print(i) end",
        "local f = function() return 1 end",
    ] {
        let annotated = annotate(&tokenize(src));
        assert!(annotated.is_balanced(), "{src}");
    }
}

#[test]
fn unmatched_closer_is_clamped_and_recorded() {
    let tokens = tokenize("end end x");
    let annotated = annotate(&tokens);
    assert_eq!(annotated.unmatched, vec![0, 2]);
    assert!(annotated.depths.iter().all(|&d| d == 0));
}

#[test]
fn open_block_is_reported() {
    let annotated = annotate(&tokenize("function f() if x then"));
    assert_eq!(annotated.open_depth, 2);
    assert!(!annotated.is_balanced());
}

#[test]
fn unknown_token_switches_to_safe_mode() {
    let annotated = annotate(&tokenize("local x = 1 @ y"));
    assert_eq!(annotated.mode, Mode::Safe);
    let annotated = annotate(&tokenize("local x = 1"));
    assert_eq!(annotated.mode, Mode::Normal);
}

#[test]
fn keywords_in_strings_and_comments_do_not_count() {
    let annotated = annotate(&tokenize("x = 'function do' -- then\n"));
    assert!(annotated.is_balanced());
}
