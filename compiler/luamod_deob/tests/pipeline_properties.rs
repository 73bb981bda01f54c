//! End-to-end tests for the deobfuscation pipeline.
//!
//! 1. Constant propagation never substitutes a value past a reassignment.
//! 2. Deobfuscation never opens a literal or changes block nesting.
//! 3. Nested payloads inline up to the depth budget and no further.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use luamod_deob::{deobfuscate, deobfuscate_with, DeobfuscateOptions, DEFAULT_INLINE_DEPTH};
use luamod_fmt::{annotate, FormatConfig};
use luamod_lexer::literal::{render, Quote};
use luamod_lexer::tokenize;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// -- Code Generation Strategies --

#[derive(Clone, Debug)]
enum Stmt {
    Print,
    PrintLiteral(u32),
    Assign(u32),
    NestedAssign(u32),
}

fn stmt_strategy() -> impl Strategy<Value = Stmt> {
    prop_oneof![
        3 => Just(Stmt::Print),
        1 => (0u32..100).prop_map(Stmt::PrintLiteral),
        2 => (0u32..100).prop_map(Stmt::Assign),
        1 => (0u32..100).prop_map(Stmt::NestedAssign),
    ]
}

fn program_strategy() -> impl Strategy<Value = String> {
    (0u32..100, prop::collection::vec(stmt_strategy(), 1..10)).prop_map(|(init, stmts)| {
        let mut lines = vec![format!("local x = {init}")];
        lines.extend(stmts.iter().map(|stmt| match stmt {
            Stmt::Print => "print(x)".to_owned(),
            Stmt::PrintLiteral(n) => format!("print({n})"),
            Stmt::Assign(n) => format!("x = {n}"),
            Stmt::NestedAssign(n) => format!("do x = {n} end"),
        }));
        lines.join("\n")
    })
}

/// What the straight-line programs above print, one entry per `print`.
fn observe(src: &str) -> Vec<String> {
    let mut value: Option<String> = None;
    let mut printed = Vec::new();
    for line in src.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(n) = line.strip_prefix("local x = ") {
            value = Some(n.to_owned());
        } else if let Some(rest) = line.strip_prefix("do x = ") {
            value = Some(rest.strip_suffix(" end").expect("do block").to_owned());
        } else if let Some(n) = line.strip_prefix("x = ") {
            value = Some(n.to_owned());
        } else if let Some(arg) = line.strip_prefix("print(").and_then(|r| r.strip_suffix(')')) {
            let shown = if arg == "x" {
                value.clone().unwrap_or_else(|| "nil".to_owned())
            } else {
                arg.to_owned()
            };
            printed.push(shown);
        } else {
            panic!("unexpected line {line:?}");
        }
    }
    printed
}

fn nesting(src: &str) -> (u32, usize, usize) {
    let tokens = tokenize(src);
    let annotated = annotate(&tokens);
    let open = tokens.iter().filter(|t| t.is_unterminated()).count();
    (annotated.open_depth, annotated.unmatched.len(), open)
}

/// `levels` nested `load` calls around `return 1`.
fn nested_loads(levels: usize) -> String {
    let mut src = "return 1".to_owned();
    for _ in 0..levels {
        src = format!("return load({})", render(src.as_bytes(), Quote::Double));
    }
    src
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn propagation_preserves_behavior(src in program_strategy()) {
        let out = deobfuscate(&src, DEFAULT_INLINE_DEPTH, false);
        prop_assert_eq!(observe(&out), observe(&src), "output:\n{}", out);
    }

    #[test]
    fn deobfuscation_keeps_nesting(src in program_strategy()) {
        let out = deobfuscate(&src, DEFAULT_INLINE_DEPTH, true);
        prop_assert_eq!(nesting(&out), nesting(&src));
    }
}

#[test]
fn reassigned_constant_is_not_substituted_afterwards() {
    let src = "local x = 1\nprint(x)\nx = 2\nprint(x)";
    assert_eq!(deobfuscate(src, 3, false), "local x = 1\nprint(1)\nx = 2\nprint(x)");
}

// -- Scenarios --

#[test]
fn single_binding_propagates() {
    assert_eq!(deobfuscate("local x = 5\nprint(x)", 3, false), "print(5)");
}

#[test]
fn concatenation_chain_merges() {
    assert_eq!(deobfuscate(r#"s = "a" .. "b" .. "c""#, 3, false), r#"s = "abc""#);
}

#[test]
fn single_load_inlines() {
    assert_eq!(
        deobfuscate(r#"local f = load("return 1")"#, 3, false),
        "local f = (function()\nreturn 1\nend)"
    );
}

#[test]
fn three_nested_loads_inline_fully() {
    let out = deobfuscate(&nested_loads(3), DEFAULT_INLINE_DEPTH, false);
    assert!(!out.contains("load"), "{out}");
    assert_eq!(out.matches("function()").count(), 3, "{out}");
}

#[test]
fn fourth_nested_load_stays_a_call() {
    let out = deobfuscate(&nested_loads(4), DEFAULT_INLINE_DEPTH, false);
    assert_eq!(out.matches("function()").count(), 3, "{out}");
    assert_eq!(out.matches("load(").count(), 1, "{out}");
    assert!(out.contains(r#"load("return 1")"#), "{out}");
}

// -- Options --

#[test]
fn rename_and_reformat_compose() {
    let options = DeobfuscateOptions {
        rename_vars: true,
        reformat: Some(FormatConfig::spaces(2)),
        ..DeobfuscateOptions::default()
    };
    let out = deobfuscate_with("local function l1I(a)\nif a then return a end\nend", &options);
    assert_eq!(out, "local function func_1(var_1)\n  if var_1 then return var_1 end\nend\n");
}

// -- Luau interpolation --

#[test]
fn interpolated_reads_survive_propagation() {
    let src = "local x = 5\nprint(`value {x}`)";
    assert_eq!(deobfuscate(src, DEFAULT_INLINE_DEPTH, false), src);
}

#[test]
fn interpolated_reads_follow_renaming() {
    assert_eq!(
        deobfuscate("local q = f()\nprint(`{q}`)", 0, true),
        "local var_1 = var_2()\nprint(`{var_1}`)"
    );
}
