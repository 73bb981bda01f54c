use pretty_assertions::assert_eq;

use super::{number, string};

#[test]
fn trailing_fraction_zeros_are_removed() {
    assert_eq!(number("1.500"), "1.5");
    assert_eq!(number("10.0"), "10");
    assert_eq!(number("5."), "5");
    assert_eq!(number("100"), "100");
}

#[test]
fn leading_zero_before_point_is_removed() {
    assert_eq!(number("0.50"), ".5");
    assert_eq!(number("0.0"), "0");
    assert_eq!(number(".0"), "0");
}

#[test]
fn separators_are_removed_everywhere() {
    assert_eq!(number("1_000_000"), "1000000");
    assert_eq!(number("0xFF_FF"), "0xFFFF");
}

#[test]
fn exponent_and_hex_keep_their_digits() {
    assert_eq!(number("1.50e3"), "1.50e3");
    assert_eq!(number("0x1.80"), "0x1.80");
}

#[test]
fn string_prefers_double_quotes_on_ties() {
    assert_eq!(string("'abc'"), "\"abc\"");
    assert_eq!(string("\"abc\""), "\"abc\"");
}

#[test]
fn string_switches_when_shorter() {
    assert_eq!(string(r#""say \"hi\"""#), r#"'say "hi"'"#);
    assert_eq!(string(r"'it\'s'"), r#""it's""#);
}

#[test]
fn string_never_adds_escapes() {
    assert_eq!(string(r#"'say "hi"'"#), r#"'say "hi"'"#);
    assert_eq!(string("[[raw]]"), "[[raw]]");
    assert_eq!(string("`tmpl`"), "`tmpl`");
}
