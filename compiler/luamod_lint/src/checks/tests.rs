use luamod_fmt::annotate;
use luamod_lexer::{tokenize, NameTables};
use pretty_assertions::assert_eq;

use super::{api_calls, rename_risks, syntax};
use crate::issue::{Api, SyntaxError, Warning};

fn syntax_of(src: &str) -> Option<SyntaxError> {
    let tokens = tokenize(src);
    syntax(&tokens, &annotate(&tokens))
}

fn risky_words(src: &str) -> Vec<String> {
    rename_risks(&tokenize(src), NameTables::lua())
        .into_iter()
        .filter_map(|w| match w {
            Warning::RenameRisk { word, .. } => Some(word),
            Warning::NonLiteralArgument { .. } => None,
        })
        .collect()
}

fn apis(src: &str) -> Vec<Api> {
    api_calls(&tokenize(src))
        .into_iter()
        .filter_map(|w| match w {
            Warning::NonLiteralArgument { api, .. } => Some(api),
            Warning::RenameRisk { .. } => None,
        })
        .collect()
}

// === Syntax ===

#[test]
fn well_formed_source_has_no_syntax_error() {
    assert_eq!(syntax_of("if a then\n\tprint(1)\nend"), None);
}

#[test]
fn unterminated_literals() {
    assert_eq!(
        syntax_of("x = 1\ny = \"abc"),
        Some(SyntaxError::Unterminated { what: "string", line: 2 })
    );
    assert_eq!(
        syntax_of("--[[ open"),
        Some(SyntaxError::Unterminated { what: "long comment", line: 1 })
    );
}

#[test]
fn unmatched_closer() {
    assert_eq!(
        syntax_of("x()\nend"),
        Some(SyntaxError::UnmatchedCloser { keyword: "end".to_owned(), line: 2 })
    );
}

#[test]
fn earliest_failure_wins() {
    assert_eq!(
        syntax_of("end\nx = 'abc"),
        Some(SyntaxError::UnmatchedCloser { keyword: "end".to_owned(), line: 1 })
    );
}

#[test]
fn open_blocks_at_end() {
    assert_eq!(syntax_of("if a then\nf()"), Some(SyntaxError::Unclosed { depth: 1 }));
}

// === Rename risks ===

#[test]
fn words_in_quoted_strings_are_flagged() {
    assert_eq!(risky_words(r#"print("hello world", 'and x')"#), ["hello", "world", "x"]);
}

#[test]
fn escapes_are_decoded_first() {
    assert_eq!(risky_words(r#"s = "\x41bc""#), ["Abc"]);
}

#[test]
fn long_strings_and_code_are_ignored() {
    assert!(risky_words("local name = [[some text]]").is_empty());
}

// === API calls ===

#[test]
fn literal_arguments_are_fine() {
    assert!(apis(r#"local p = game:GetService("Players") p:WaitForChild('x') Instance.new("Part")"#).is_empty());
}

#[test]
fn every_computed_call_warns_with_its_line() {
    let warnings = api_calls(&tokenize(
        "game:GetService(a)\ngame:GetService(b)\nx:WaitForChild()\nInstance.new(cls)",
    ));
    assert_eq!(
        warnings,
        [
            Warning::NonLiteralArgument { api: Api::GetService, line: 1 },
            Warning::NonLiteralArgument { api: Api::GetService, line: 2 },
            Warning::NonLiteralArgument { api: Api::WaitForChild, line: 3 },
            Warning::NonLiteralArgument { api: Api::InstanceNew, line: 4 },
        ]
    );
}

#[test]
fn literal_and_computed_calls_of_one_api_are_told_apart() {
    assert_eq!(
        apis("s:GetService(\"Players\")\ns:GetService(n)\ns:GetService(\"Lighting\")"),
        [Api::GetService]
    );
}

#[test]
fn blanks_and_comments_between_tokens_are_skipped() {
    assert!(apis("game:GetService( \"Players\" )").is_empty());
    assert_eq!(apis("game:GetService --[[c]] (name)"), [Api::GetService]);
}
