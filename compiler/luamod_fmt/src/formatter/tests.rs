use pretty_assertions::assert_eq;

use super::{format, format_source, FormatConfig};

fn fmt(src: &str) -> String {
    format_source(src, &FormatConfig::default())
}

// === Line structure ===

#[test]
fn single_statement_gets_trailing_newline() {
    assert_eq!(fmt("print(1)"), "print(1)\n");
}

#[test]
fn blocks_are_indented_by_depth() {
    assert_eq!(
        fmt("function f(a,b)\nreturn a+b\nend"),
        "function f(a, b)\n\treturn a + b\nend\n"
    );
}

#[test]
fn elseif_and_else_align_with_if() {
    assert_eq!(
        fmt("if a then\nx()\nelseif b then\ny()\nelse\nz()\nend"),
        "if a then\n\tx()\nelseif b then\n\ty()\nelse\n\tz()\nend\n"
    );
}

#[test]
fn statement_keywords_start_a_new_line() {
    assert_eq!(
        fmt("x = 1 if x then y = 2 else y = 3 end"),
        "x = 1\nif x then y = 2\nelse y = 3 end\n"
    );
}

#[test]
fn function_expression_stays_inline() {
    assert_eq!(
        fmt("local f = function(a) return a end"),
        "local f = function(a) return a end\n"
    );
    assert_eq!(fmt("local function g() end"), "local function g() end\n");
    assert_eq!(fmt("call(function() end)"), "call(function() end)\n");
}

#[test]
fn blank_lines_collapse_to_one() {
    assert_eq!(fmt("a()\n\n\n\nb()\n\n"), "a()\n\nb()\n");
}

#[test]
fn leading_blank_lines_are_dropped() {
    assert_eq!(fmt("\n\n  \n  a()"), "a()\n");
}

#[test]
fn unmatched_end_does_not_underflow() {
    assert_eq!(fmt("end\nx()"), "end\nx()\n");
}

#[test]
fn empty_input_is_a_single_newline() {
    assert_eq!(fmt(""), "\n");
}

// === Spacing ===

#[test]
fn unary_and_binary_minus() {
    assert_eq!(fmt("x=-1\ny=a-b\nz=- -c"), "x = -1\ny = a - b\nz = - -c\n");
}

#[test]
fn concat_and_keyword_string_spacing() {
    assert_eq!(fmt("a = b..c"), "a = b .. c\n");
    assert_eq!(fmt("return\"x\""), "return \"x\"\n");
}

#[test]
fn strings_and_comments_are_verbatim() {
    assert_eq!(
        fmt("print( 'a  b' ) -- keep  this\n"),
        "print('a  b') -- keep  this\n"
    );
    assert_eq!(fmt("s = [[a  \n  b]]\n"), "s = [[a  \n  b]]\n");
}

#[test]
fn table_constructor_spacing() {
    assert_eq!(fmt("t={a=1,b={}}"), "t = {a = 1, b = {}}\n");
}

// === Configuration ===

#[test]
fn space_indent_config() {
    assert_eq!(
        format_source("do\nx()\nend", &FormatConfig::spaces(2)),
        "do\n  x()\nend\n"
    );
}

#[test]
fn format_takes_indent_unit_directly() {
    let tokens = luamod_lexer::tokenize("while true do\nbreak\nend");
    assert_eq!(format(&tokens, "    "), "while true do\n    break\nend\n");
}

#[test]
fn default_indent_is_tab() {
    assert_eq!(FormatConfig::default().indent, "\t");
}

// === Idempotence ===

#[test]
fn formatting_twice_is_stable() {
    let src = "local t = {1,2,3}\nfor i,v in ipairs(t) do if v>1 then print(v) end end\n\n\n\
               repeat t[1]=t[1]-1 until t[1]<0 -- done";
    let once = fmt(src);
    assert_eq!(fmt(&once), once);
}
