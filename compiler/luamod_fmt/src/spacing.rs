//! Declarative spacing rules.
//!
//! Spacing between two tokens on the same line is decided by the first
//! rule in [`SPACE_RULES`] whose matchers accept the pair of
//! [`TokenCategory`]s. The table is expanded once into a dense lookup
//! matrix. The glue check in `luamod_lexer` is applied on top of these
//! rules by the formatter, so a rule answering [`SpaceAction::None`] never
//! fuses two tokens.

use std::sync::OnceLock;

use luamod_lexer::{Token, TokenKind};

/// Spacing decision for a token pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpaceAction {
    #[default]
    None,
    Space,
}

impl SpaceAction {
    #[inline]
    pub fn needs_space(self) -> bool {
        self == SpaceAction::Space
    }
}

/// Token abstraction used by the rule table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Any keyword except `function`.
    Keyword,
    /// `function`, kept tight against its parameter list.
    Function,
    Name,
    Number,
    /// `...`
    Vararg,
    String,
    Comment,
    Comma,
    Semicolon,
    /// Infix operator, including assignment and compound assignment.
    BinaryOp,
    /// Prefix operator: unary `-`, `#`, `~`.
    UnaryOp,
    OpenParen,
    OpenBracket,
    OpenBrace,
    /// `)`, `]`, `}`
    Close,
    /// `.` and `:`
    Access,
    /// `::`
    Label,
    Other,
}

impl TokenCategory {
    pub const ALL: [TokenCategory; 18] = [
        TokenCategory::Keyword,
        TokenCategory::Function,
        TokenCategory::Name,
        TokenCategory::Number,
        TokenCategory::Vararg,
        TokenCategory::String,
        TokenCategory::Comment,
        TokenCategory::Comma,
        TokenCategory::Semicolon,
        TokenCategory::BinaryOp,
        TokenCategory::UnaryOp,
        TokenCategory::OpenParen,
        TokenCategory::OpenBracket,
        TokenCategory::OpenBrace,
        TokenCategory::Close,
        TokenCategory::Access,
        TokenCategory::Label,
        TokenCategory::Other,
    ];

    /// Categorize `token`. `prev` is the closest preceding significant
    /// token and decides whether `-` is unary or binary.
    pub fn of(token: &Token<'_>, prev: Option<&Token<'_>>) -> TokenCategory {
        let text = token.text.as_ref();
        match token.kind {
            TokenKind::Keyword if text == "function" => TokenCategory::Function,
            TokenKind::Keyword if text == "and" || text == "or" => TokenCategory::BinaryOp,
            TokenKind::Keyword => TokenCategory::Keyword,
            TokenKind::Identifier => TokenCategory::Name,
            TokenKind::Number => TokenCategory::Number,
            TokenKind::String => TokenCategory::String,
            TokenKind::Comment => TokenCategory::Comment,
            TokenKind::Operator => match text {
                "..." => TokenCategory::Vararg,
                "#" | "~" => TokenCategory::UnaryOp,
                "-" if is_operand_start(prev) => TokenCategory::UnaryOp,
                "->" => TokenCategory::Other,
                _ => TokenCategory::BinaryOp,
            },
            TokenKind::Punctuation => match text {
                "," => TokenCategory::Comma,
                ";" => TokenCategory::Semicolon,
                "(" => TokenCategory::OpenParen,
                "[" => TokenCategory::OpenBracket,
                "{" => TokenCategory::OpenBrace,
                ")" | "]" | "}" => TokenCategory::Close,
                "." | ":" => TokenCategory::Access,
                "::" => TokenCategory::Label,
                _ => TokenCategory::Other,
            },
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::Unknown => {
                TokenCategory::Other
            }
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }

    fn is_word(self) -> bool {
        matches!(
            self,
            TokenCategory::Keyword
                | TokenCategory::Function
                | TokenCategory::Name
                | TokenCategory::Number
                | TokenCategory::Vararg
        )
    }

    fn is_keyword(self) -> bool {
        matches!(self, TokenCategory::Keyword | TokenCategory::Function)
    }

    fn is_operand_open(self) -> bool {
        matches!(
            self,
            TokenCategory::OpenParen
                | TokenCategory::OpenBrace
                | TokenCategory::OpenBracket
                | TokenCategory::UnaryOp
        )
    }
}

/// `true` when a `-` after `prev` starts an operand (unary minus).
fn is_operand_start(prev: Option<&Token<'_>>) -> bool {
    let Some(prev) = prev else {
        return true;
    };
    match prev.kind {
        TokenKind::Operator => prev.text != "...",
        TokenKind::Punctuation => !matches!(prev.text.as_ref(), ")" | "]" | "}"),
        TokenKind::Keyword => !matches!(prev.text.as_ref(), "end" | "true" | "false" | "nil"),
        TokenKind::Comment | TokenKind::Unknown => true,
        _ => false,
    }
}

/// Matcher for one side of a rule.
#[derive(Clone, Copy, Debug)]
pub enum TokenMatcher {
    Any,
    Exact(TokenCategory),
    OneOf(&'static [TokenCategory]),
    Category(fn(TokenCategory) -> bool),
}

impl TokenMatcher {
    #[inline]
    pub fn matches(&self, cat: TokenCategory) -> bool {
        match self {
            TokenMatcher::Any => true,
            TokenMatcher::Exact(expected) => *expected == cat,
            TokenMatcher::OneOf(categories) => categories.contains(&cat),
            TokenMatcher::Category(predicate) => predicate(cat),
        }
    }
}

/// One spacing rule; rules are evaluated in table order.
#[derive(Clone, Copy, Debug)]
pub struct SpaceRule {
    /// Name for debugging.
    pub name: &'static str,
    pub left: TokenMatcher,
    pub right: TokenMatcher,
    pub action: SpaceAction,
}

impl SpaceRule {
    const fn new(
        name: &'static str,
        left: TokenMatcher,
        right: TokenMatcher,
        action: SpaceAction,
    ) -> Self {
        SpaceRule {
            name,
            left,
            right,
            action,
        }
    }

    #[inline]
    pub fn matches(&self, left: TokenCategory, right: TokenCategory) -> bool {
        self.left.matches(left) && self.right.matches(right)
    }
}

#[allow(
    clippy::enum_glob_use,
    reason = "rule table reads better with short category names"
)]
use TokenCategory::*;
use TokenMatcher::{Any, Category, Exact, OneOf};

/// All spacing rules in evaluation order.
pub static SPACE_RULES: &[SpaceRule] = &[
    SpaceRule::new("UnaryTight", Exact(UnaryOp), Any, SpaceAction::None),
    SpaceRule::new("BinaryLeft", Exact(BinaryOp), Any, SpaceAction::Space),
    SpaceRule::new("BinaryRight", Any, Exact(BinaryOp), SpaceAction::Space),
    SpaceRule::new("AfterComma", Exact(Comma), Any, SpaceAction::Space),
    SpaceRule::new("AfterSemicolon", Exact(Semicolon), Any, SpaceAction::Space),
    SpaceRule::new("BeforeComment", Any, Exact(Comment), SpaceAction::Space),
    SpaceRule::new("AfterComment", Exact(Comment), Any, SpaceAction::Space),
    SpaceRule::new(
        "Words",
        Category(TokenCategory::is_word),
        Category(TokenCategory::is_word),
        SpaceAction::Space,
    ),
    SpaceRule::new(
        "KeywordString",
        Category(TokenCategory::is_keyword),
        Exact(String),
        SpaceAction::Space,
    ),
    SpaceRule::new(
        "StringKeyword",
        Exact(String),
        Category(TokenCategory::is_keyword),
        SpaceAction::Space,
    ),
    SpaceRule::new(
        "CloseKeyword",
        Exact(Close),
        Category(TokenCategory::is_keyword),
        SpaceAction::Space,
    ),
    SpaceRule::new(
        "KeywordOperand",
        Exact(Keyword),
        Category(TokenCategory::is_operand_open),
        SpaceAction::Space,
    ),
    SpaceRule::new("FunctionParams", Exact(Function), Exact(OpenParen), SpaceAction::None),
    SpaceRule::new("Tight", Any, OneOf(&[Close, Access, Label]), SpaceAction::None),
];

const N: usize = TokenCategory::ALL.len();

static LOOKUP: OnceLock<[[SpaceAction; N]; N]> = OnceLock::new();

fn build_lookup() -> [[SpaceAction; N]; N] {
    let mut table = [[SpaceAction::None; N]; N];
    for left in TokenCategory::ALL {
        for right in TokenCategory::ALL {
            if let Some(rule) = SPACE_RULES.iter().find(|r| r.matches(left, right)) {
                table[left.index()][right.index()] = rule.action;
            }
        }
    }
    table
}

/// Spacing between two categories.
#[inline]
pub fn lookup_spacing(left: TokenCategory, right: TokenCategory) -> SpaceAction {
    LOOKUP.get_or_init(build_lookup)[left.index()][right.index()]
}

/// Name of the first rule that matches, for tests and debugging.
pub fn matching_rule(left: TokenCategory, right: TokenCategory) -> Option<&'static str> {
    SPACE_RULES.iter().find(|r| r.matches(left, right)).map(|r| r.name)
}
