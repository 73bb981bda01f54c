use luamod_lexer::{concat, tokenize, Token, TokenKind};
use pretty_assertions::assert_eq;

use super::{library_call, matching_close, next_code, rewrite, single, split_items};

fn position(tokens: &[Token<'_>], text: &str) -> usize {
    tokens.iter().position(|t| t.text == text).unwrap_or(usize::MAX)
}

// === Navigation ===

#[test]
fn next_code_skips_blanks_but_not_comments() {
    let tokens = tokenize("a \n --c\n b");
    let after_a = next_code(&tokens, 1).unwrap_or(usize::MAX);
    assert_eq!(tokens[after_a].kind, TokenKind::Comment);
}

#[test]
fn library_call_rejects_fields() {
    let tokens = tokenize("x.string.char(1)");
    let at = position(&tokens, "string");
    assert_eq!(library_call(&tokens, at, "string", "char"), None);
    let tokens = tokenize("string . char(1)");
    assert_eq!(library_call(&tokens, 0, "string", "char"), Some(4));
}

// === Brackets ===

#[test]
fn matching_close_respects_nesting() {
    let tokens = tokenize("f(a[1], {b})");
    let open = position(&tokens, "(");
    let close = matching_close(&tokens, open);
    assert_eq!(close, Some(tokens.len() - 1));
}

#[test]
fn matching_close_rejects_crossed_brackets() {
    let tokens = tokenize("(a]");
    assert_eq!(matching_close(&tokens, 0), None);
}

#[test]
fn items_split_on_top_level_separators() {
    let tokens = tokenize("( 1 , f(2, 3) ,4 )");
    let close = tokens.len() - 1;
    let items = split_items(&tokens, 0, close, &[","], false).unwrap_or_default();
    let texts: Vec<String> = items.iter().map(|r| concat(&tokens[r.clone()])).collect();
    assert_eq!(texts, vec!["1", "f(2, 3)", "4"]);
}

#[test]
fn items_reject_holes_and_allow_trailing_when_asked() {
    let tokens = tokenize("{1,,2}");
    assert_eq!(split_items(&tokens, 0, tokens.len() - 1, &[","], true), None);
    let tokens = tokenize("{1;2,}");
    let items = split_items(&tokens, 0, tokens.len() - 1, &[",", ";"], true);
    assert_eq!(items.map(|v| v.len()), Some(2));
    let tokens = tokenize("()");
    assert_eq!(split_items(&tokens, 0, 1, &[","], false), Some(vec![]));
}

#[test]
fn single_finds_the_lone_code_token() {
    let tokens = tokenize(" x ");
    assert_eq!(single(&tokens, &(0..tokens.len())), Some(1));
    let tokens = tokenize("x y");
    assert_eq!(single(&tokens, &(0..tokens.len())), None);
}

// === Splicing ===

#[test]
fn rewrite_inserts_glue_around_replacements() {
    let tokens = tokenize("a..X..b");
    let (out, edits) = rewrite(&tokens, |tokens, i| {
        tokens[i]
            .is_ident("X")
            .then(|| (i + 1, vec![Token::synthetic(TokenKind::Number, "1")]))
    });
    assert_eq!(edits, 1);
    assert_eq!(concat(&out), "a.. 1 ..b");
}

#[test]
fn rewrite_keeps_untouched_tokens() {
    let src = "local s = 'x' -- note\n";
    let tokens = tokenize(src);
    let (out, edits) = rewrite(&tokens, |_, _| None);
    assert_eq!(edits, 0);
    assert_eq!(concat(&out), src);
}
