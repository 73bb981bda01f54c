//! Final tidy-up: repeated `;` dropped, runs of blank lines collapsed to
//! one, leading and trailing blanks trimmed.

use luamod_lexer::{Token, TokenKind};

use crate::edit::{is_blank, next_code, prev_code};

pub fn apply<'src>(tokens: &[Token<'src>]) -> (Vec<Token<'src>>, usize) {
    let start = next_code(tokens, 0).unwrap_or(tokens.len());
    let end = prev_code(tokens, tokens.len()).map_or(start, |last| last + 1);
    let mut edits = usize::from(start > 0) + usize::from(end < tokens.len());
    let mut out = Vec::with_capacity(end.saturating_sub(start));
    let mut i = start;
    while i < end {
        let token = &tokens[i];
        if token.is_symbol(";") && prev_code(tokens, i).is_some_and(|p| tokens[p].is_symbol(";")) {
            edits += 1;
            i += 1;
            continue;
        }
        if token.kind == TokenKind::Newline {
            let run_end = (i..end).find(|&j| !is_blank(&tokens[j])).unwrap_or(end);
            let newlines: Vec<usize> = (i..run_end).filter(|&j| tokens[j].kind == TokenKind::Newline).collect();
            // three or more newlines
            if let [first, second, .., last] = newlines[..] {
                out.push(tokens[first].clone());
                out.push(tokens[second].clone());
                // indentation of the line that follows
                out.extend(tokens[last + 1..run_end].iter().cloned());
                edits += 1;
                i = run_end;
                continue;
            }
        }
        out.push(token.clone());
        i += 1;
    }
    (out, edits)
}
