use luamod_lexer::tokenize;
use pretty_assertions::assert_eq;

use super::{run, step, verify};
use crate::error::PassError;
use crate::passes::Pass;

// === Sequencing ===

#[test]
fn passes_feed_each_other() {
    assert_eq!(run("local k = string.char(0x41, 66)\nprint(k)", 3), r#"print("AB")"#);
    assert_eq!(run("x = (\"a\") .. 'b'", 3), r#"x = "a" .. 'b'"#);
    assert_eq!(run("print(\"\\x41\" .. \"B\")", 3), r#"print("AB")"#);
}

#[test]
fn folded_constants_propagate() {
    assert_eq!(run("local n = 2 * 21\nreturn n", 3), "return 42");
}

#[test]
fn untouched_input_is_returned_as_is() {
    let src = "local t = {}\nfor i = 1, #t do\n\tprint(t[i])\nend";
    assert_eq!(run(src, 3), src);
}

#[test]
fn step_keeps_text_without_edits() {
    assert_eq!(step(Pass::Fold, "x = y".to_owned(), 0), "x = y");
}

// === Output checks ===

#[test]
fn new_unterminated_literals_are_rejected() {
    let before = tokenize("x = 1");
    assert_eq!(
        verify(Pass::Fold, &before, "x = \""),
        Err(PassError::Unterminated { pass: Pass::Fold, before: 0, after: 1 })
    );
}

#[test]
fn nesting_changes_are_rejected() {
    let before = tokenize("f()");
    let err = verify(Pass::Inline, &before, "do f()");
    assert_eq!(
        err,
        Err(PassError::Unbalanced {
            pass: Pass::Inline,
            before: (0, 0),
            after: (1, 0)
        })
    );
    assert_eq!(err.map_err(|e| e.pass()), Err(Pass::Inline));
}

#[test]
fn equivalent_output_passes() {
    let before = tokenize("if a then b() end");
    assert_eq!(verify(Pass::Parens, &before, "if a then\nb()\nend"), Ok(()));
}
