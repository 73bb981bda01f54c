//! Validation reports as the obfuscation front end reads them.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use luamod_fmt::Mode;
use luamod_lint::validate;
use pretty_assertions::assert_eq;

#[test]
fn clean_source() {
    let report = validate("local n = 1\nreturn n + 1\n");
    assert!(report.is_clean());
    assert_eq!(report.mode, Mode::Normal);
}

#[test]
fn messages_render_in_report_order() {
    let report = validate("local p = game:GetService(name)\nprint(\"hi\")\nif p then");
    let (warnings, errors) = report.messages();
    assert_eq!(
        warnings,
        [
            "[Rename Risk] Identifier 'hi' appears inside a string literal; ensure renaming does not break logic.",
            "[API] GetService called without a literal string; obfuscation may break this call.",
        ]
    );
    assert_eq!(errors, ["[Syntax] Block structure error: 1 block(s) still open at end of input"]);
}

#[test]
fn instance_new_names_a_class() {
    let (warnings, _) = validate("local part = Instance.new(kind)").messages();
    assert_eq!(
        warnings,
        ["[API] Instance.new called without a literal class name; obfuscation may break this call."]
    );
}

#[test]
fn only_the_first_syntax_error_is_reported() {
    let report = validate("end\nend\nx = \"open");
    assert_eq!(report.errors.len(), 1);
}

#[test]
fn unknown_characters_switch_to_safe_mode() {
    assert_eq!(validate("x = 1 $").mode, Mode::Safe);
}
