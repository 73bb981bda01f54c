//! Constant folding of pure numeric expressions.
//!
//! Two shapes are folded:
//!
//! - a parenthesized group holding only numbers, `+ - * / % ^` and nested
//!   parentheses. Grouping parens are replaced by the value (a negative
//!   value keeps its parens); call parens stay.
//! - the right-hand side of `=` when it is such an expression up to the
//!   end of the statement.
//!
//! Arithmetic follows Lua: `/` is float division, `%` is floored, `^` is
//! right associative and binds tighter than unary minus. A fold whose
//! value is not finite, or too large to be an exact integer, is abandoned.

use luamod_lexer::{Token, TokenKind};

use crate::edit::{follows_operand, has_postfix, matching_close, next_code, rewrite, starts_postfix};

/// Largest magnitude rendered as an integer literal.
const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

pub fn apply<'src>(tokens: &[Token<'src>]) -> (Vec<Token<'src>>, usize) {
    let (grouped, group_edits) = rewrite(tokens, fold_group);
    let (assigned, assign_edits) = rewrite(&grouped, fold_assignment);
    (assigned, group_edits + assign_edits)
}

fn fold_group<'src>(tokens: &[Token<'src>], i: usize) -> Option<(usize, Vec<Token<'src>>)> {
    if !tokens[i].is_symbol("(") {
        return None;
    }
    let close = matching_close(tokens, i)?;
    let inner = code_indices(tokens, i + 1, close)?;
    let value = evaluate(tokens, &inner)?;
    let is_call = follows_operand(tokens, i);
    let literal = if inner.len() == 1 {
        tokens[inner[0]].text.to_string()
    } else {
        render(value)?
    };
    tracing::trace!(line = tokens[i].line, %literal, "group folded");
    let number = tokens[i].replaced(TokenKind::Number, literal);
    let keep_parens = is_call || value < 0.0 || has_postfix(tokens, close);
    let replacement = if keep_parens {
        if inner.len() == 1 {
            return None;
        }
        vec![tokens[i].clone(), number, tokens[close].clone()]
    } else {
        vec![number]
    };
    Some((close + 1, replacement))
}

fn fold_assignment<'src>(tokens: &[Token<'src>], i: usize) -> Option<(usize, Vec<Token<'src>>)> {
    if !tokens[i].is_symbol("=") {
        return None;
    }
    let start = next_code(tokens, i + 1)?;
    let end = expression_end(tokens, start)?;
    let inner = code_indices(tokens, start, end)?;
    if inner.len() < 2 {
        return None;
    }
    if next_code(tokens, end).is_some_and(|n| binds_tighter(&tokens[n])) {
        return None;
    }
    let literal = render(evaluate(tokens, &inner)?)?;
    tracing::trace!(line = tokens[i].line, %literal, "assignment folded");
    let replacement = vec![
        tokens[i].clone(),
        Token::synthetic(TokenKind::Whitespace, " "),
        tokens[start].replaced(TokenKind::Number, literal),
    ];
    Some((end, replacement))
}

/// End (exclusive) of the longest run of number, operator and paren tokens
/// starting at `start`, with parens balanced. Stops before trailing blanks.
fn expression_end(tokens: &[Token<'_>], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut end = start;
    let mut i = start;
    while let Some(token) = tokens.get(i) {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Newline => {}
            TokenKind::Number => end = i + 1,
            _ if is_arith(token) => end = i + 1,
            _ if token.is_symbol("(") => {
                depth += 1;
                end = i + 1;
            }
            _ if token.is_symbol(")") && depth > 0 => {
                depth -= 1;
                end = i + 1;
            }
            _ => break,
        }
        i += 1;
    }
    (depth == 0 && end > start).then_some(end)
}

/// Tokens that bind tighter than the arithmetic of a folded run, or
/// continue its last operand; folding in front of one would regroup.
fn binds_tighter(token: &Token<'_>) -> bool {
    is_arith(token) || token.is_symbol("//") || starts_postfix(token)
}

fn is_arith(token: &Token<'_>) -> bool {
    token.kind == TokenKind::Operator && matches!(token.text.as_ref(), "+" | "-" | "*" | "/" | "%" | "^")
}

/// Code token indices in `from..to`; `None` if any token is not part of a
/// pure numeric expression.
fn code_indices(tokens: &[Token<'_>], from: usize, to: usize) -> Option<Vec<usize>> {
    let mut out = Vec::new();
    for (offset, token) in tokens[from..to].iter().enumerate() {
        match token.kind {
            TokenKind::Whitespace | TokenKind::Newline => continue,
            TokenKind::Number => {}
            _ if is_arith(token) || token.is_symbol("(") || token.is_symbol(")") => {}
            _ => return None,
        }
        out.push(from + offset);
    }
    (!out.is_empty()).then_some(out)
}

// ─── Evaluation ─────────────────────────────────────────────────────────

fn evaluate(tokens: &[Token<'_>], indices: &[usize]) -> Option<f64> {
    let mut parser = Parser {
        tokens,
        indices,
        pos: 0,
    };
    let value = parser.additive()?;
    (parser.pos == indices.len() && value.is_finite()).then_some(value)
}

struct Parser<'a, 'src> {
    tokens: &'a [Token<'src>],
    indices: &'a [usize],
    pos: usize,
}

impl Parser<'_, '_> {
    fn peek(&self) -> Option<&str> {
        self.indices.get(self.pos).map(|&i| self.tokens[i].text.as_ref())
    }

    fn eat(&mut self, sym: &str) -> bool {
        if self.peek() == Some(sym) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn additive(&mut self) -> Option<f64> {
        let mut value = self.multiplicative()?;
        loop {
            if self.eat("+") {
                value += self.multiplicative()?;
            } else if self.eat("-") {
                value -= self.multiplicative()?;
            } else {
                return Some(value);
            }
        }
    }

    fn multiplicative(&mut self) -> Option<f64> {
        let mut value = self.unary()?;
        loop {
            if self.eat("*") {
                value *= self.unary()?;
            } else if self.eat("/") {
                value /= self.unary()?;
            } else if self.eat("%") {
                let rhs = self.unary()?;
                if rhs == 0.0 {
                    return None;
                }
                value -= (value / rhs).floor() * rhs;
            } else {
                return Some(value);
            }
        }
    }

    fn unary(&mut self) -> Option<f64> {
        if self.eat("-") {
            return Some(-self.unary()?);
        }
        self.power()
    }

    fn power(&mut self) -> Option<f64> {
        let base = self.atom()?;
        if self.eat("^") {
            let exponent = self.unary()?;
            return Some(base.powf(exponent));
        }
        Some(base)
    }

    fn atom(&mut self) -> Option<f64> {
        if self.eat("(") {
            let value = self.additive()?;
            return self.eat(")").then_some(value);
        }
        let &index = self.indices.get(self.pos)?;
        let token = &self.tokens[index];
        if token.kind != TokenKind::Number {
            return None;
        }
        self.pos += 1;
        number_value(&token.text)
    }
}

/// Value of a decimal literal or hex integer literal. Literals with `_`
/// separators or a hex fraction are not folded.
pub(crate) fn number_value(text: &str) -> Option<f64> {
    if text.contains('_') {
        return None;
    }
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        let value = u64::from_str_radix(hex, 16).ok()?;
        #[allow(clippy::cast_precision_loss, reason = "checked against EXACT_LIMIT below")]
        let value = value as f64;
        return (value < EXACT_LIMIT).then_some(value);
    }
    text.parse::<f64>().ok()
}

/// Source spelling of a folded value: integral values without a fraction,
/// other values in Rust's shortest round-trip form.
pub(crate) fn render(value: f64) -> Option<String> {
    if !value.is_finite() || value.abs() >= EXACT_LIMIT {
        return None;
    }
    if value.fract() == 0.0 {
        #[allow(clippy::cast_possible_truncation, reason = "magnitude is below 2^53")]
        let int = value as i64;
        return Some(int.to_string());
    }
    Some(value.to_string())
}
