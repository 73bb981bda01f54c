//! Property-based tests for the formatter.
//!
//! 1. Idempotence: format(format(code)) == format(code)
//! 2. Token preservation: formatting never changes significant tokens
//! 3. Depth non-negativity under arbitrary closers

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use luamod_fmt::{annotate, format_source, FormatConfig};
use luamod_lexer::tokenize;
use proptest::prelude::*;

// -- Code Generation Strategies --

fn identifier_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z][a-z0-9_]{0,6}")
        .expect("valid regex")
        .prop_filter("not a keyword", |s| {
            !luamod_lexer::NameTables::lua().is_keyword(s)
        })
}

fn literal_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        (0u32..1000).prop_map(|n| n.to_string()),
        (0.0f64..100.0).prop_map(|f| format!("{f:.2}")),
        prop::string::string_regex("[a-z ]{0,8}")
            .expect("valid regex")
            .prop_map(|s| format!("\"{s}\"")),
        Just("[[long\n  text]]".to_string()),
        Just("nil".to_string()),
    ]
}

fn expr_strategy() -> BoxedStrategy<String> {
    let leaf = prop_oneof![identifier_strategy(), literal_strategy()];
    leaf.prop_recursive(3, 16, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!["+", "-", "*", "..", "==", "and"]),
                inner.clone(),
            )
                .prop_map(|(l, op, r)| format!("{l} {op} {r}")),
            inner.clone().prop_map(|e| format!("-({e})")),
            inner.clone().prop_map(|e| format!("({e})")),
            (identifier_strategy(), inner).prop_map(|(f, a)| format!("{f}({a})")),
        ]
    })
    .boxed()
}

fn statement_strategy() -> BoxedStrategy<String> {
    let simple = prop_oneof![
        (identifier_strategy(), expr_strategy()).prop_map(|(n, e)| format!("local {n} = {e}")),
        (identifier_strategy(), expr_strategy()).prop_map(|(n, e)| format!("{n}={e}")),
        expr_strategy().prop_map(|e| format!("print({e})")),
        Just("-- a comment".to_string()),
        Just("".to_string()),
    ];
    simple
        .prop_recursive(3, 24, 3, |inner| {
            let body = prop::collection::vec(inner, 0..3).prop_map(|v| v.join("\n"));
            prop_oneof![
                (expr_strategy(), body.clone()).prop_map(|(c, b)| format!("if {c} then\n{b}\nend")),
                (expr_strategy(), body.clone(), body.clone())
                    .prop_map(|(c, a, b)| format!("if {c} then\n{a}\nelse\n{b}\nend")),
                (identifier_strategy(), body.clone())
                    .prop_map(|(n, b)| format!("function {n}()\n{b}\nend")),
                (expr_strategy(), body.clone())
                    .prop_map(|(c, b)| format!("while {c} do\n{b}\nend")),
                body.prop_map(|b| format!("repeat\n{b}\nuntil true")),
            ]
        })
        .boxed()
}

fn program_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(statement_strategy(), 1..6).prop_map(|v| v.join("\n"))
}

fn significant(src: &str) -> Vec<String> {
    tokenize(src)
        .into_iter()
        .filter(|t| !t.is_trivia() || t.kind == luamod_lexer::TokenKind::Comment)
        .map(|t| t.text.into_owned())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn formatting_is_idempotent(src in program_strategy()) {
        let config = FormatConfig::default();
        let once = format_source(&src, &config);
        let twice = format_source(&once, &config);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn formatting_preserves_tokens(src in program_strategy()) {
        let once = format_source(&src, &FormatConfig::spaces(2));
        prop_assert_eq!(significant(&src), significant(&once));
    }

    #[test]
    fn output_has_one_trailing_newline(src in program_strategy()) {
        let once = format_source(&src, &FormatConfig::default());
        prop_assert!(once.ends_with('\n'));
        prop_assert!(!once.ends_with("\n\n"));
    }

    #[test]
    fn depth_clamps_at_zero(words in prop::collection::vec(
        prop::sample::select(vec!["function", "do", "then", "end", "until", "else", "elseif", "repeat", "x"]),
        0..40,
    )) {
        let src = words.join(" ");
        let tokens = tokenize(&src);
        let annotated = annotate(&tokens);
        // Reference counter with signed depth and an explicit clamp.
        let mut depth: i64 = 0;
        let mut clamps = 0usize;
        let mut elseif_pending = false;
        for word in &words {
            match *word {
                "function" | "do" | "repeat" => depth += 1,
                "then" if elseif_pending => elseif_pending = false,
                "then" => depth += 1,
                "end" | "until" | "else" | "elseif" => {
                    if depth == 0 { clamps += 1; } else { depth -= 1; }
                    if *word == "else" || *word == "elseif" { depth += 1; }
                    if *word == "elseif" { elseif_pending = true; }
                }
                _ => {}
            }
        }
        prop_assert_eq!(annotated.unmatched.len(), clamps);
        prop_assert_eq!(i64::from(annotated.open_depth), depth);
    }
}
