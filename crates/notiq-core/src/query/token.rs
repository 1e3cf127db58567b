//! Tokenizer and implicit-OR insertion for saved-search query text.

use serde::{Deserialize, Serialize};

/// Kind of a query token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Term,
    And,
    Or,
    Not,
    LeftParen,
    RightParen,
}

impl TokenKind {
    /// Whether this kind is one of the boolean operators.
    pub fn is_operator(self) -> bool {
        matches!(self, Self::And | Self::Or | Self::Not)
    }

    /// Binding strength used by the shunting-yard pass. Higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            Self::Not => 3,
            Self::And => 2,
            Self::Or => 1,
            _ => 0,
        }
    }
}

/// A single lexical unit of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub is_quoted: bool,
}

impl Token {
    /// A bare or quoted term.
    pub fn term(text: impl Into<String>, is_quoted: bool) -> Self {
        Self {
            kind: TokenKind::Term,
            text: text.into(),
            is_quoted,
        }
    }

    /// An operator or parenthesis token with its canonical text.
    pub fn symbol(kind: TokenKind) -> Self {
        let text = match kind {
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Term => "",
        };
        Self {
            kind,
            text: text.to_string(),
            is_quoted: false,
        }
    }

    /// Term or `)`: something that can end an operand.
    fn ends_value(&self) -> bool {
        matches!(self.kind, TokenKind::Term | TokenKind::RightParen)
    }

    /// Term or `(`: something that can start an operand.
    fn starts_value(&self) -> bool {
        matches!(self.kind, TokenKind::Term | TokenKind::LeftParen)
    }
}

/// Split raw query text into tokens.
///
/// Whitespace separates tokens, parentheses stand alone, and `"..."` yields a
/// single quoted term. An unterminated quote runs to the end of the input.
/// Bare words equal to `AND`, `OR` or `NOT` (any case) become operators.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        match ch {
            '(' => {
                chars.next();
                tokens.push(Token::symbol(TokenKind::LeftParen));
            }
            ')' => {
                chars.next();
                tokens.push(Token::symbol(TokenKind::RightParen));
            }
            '"' => {
                chars.next();
                let phrase_start = start + 1;
                let mut phrase_end = input.len();
                for (idx, c) in chars.by_ref() {
                    if c == '"' {
                        phrase_end = idx;
                        break;
                    }
                }
                tokens.push(Token::term(&input[phrase_start..phrase_end], true));
            }
            _ => {
                let mut end = input.len();
                while let Some(&(idx, c)) = chars.peek() {
                    if c.is_whitespace() || c == '(' || c == ')' {
                        end = idx;
                        break;
                    }
                    chars.next();
                }
                let word = &input[start..end];
                match operator_kind(word) {
                    Some(kind) => tokens.push(Token::symbol(kind)),
                    None => tokens.push(Token::term(word, false)),
                }
            }
        }
    }

    tokens
}

fn operator_kind(word: &str) -> Option<TokenKind> {
    if word.eq_ignore_ascii_case("AND") {
        Some(TokenKind::And)
    } else if word.eq_ignore_ascii_case("OR") {
        Some(TokenKind::Or)
    } else if word.eq_ignore_ascii_case("NOT") {
        Some(TokenKind::Not)
    } else {
        None
    }
}

/// Join adjacent operands that have no explicit operator between them with `OR`.
///
/// `foo bar "baz"` becomes `foo OR bar OR "baz"`, and `foo (bar)` becomes
/// `foo OR (bar)`. Token pairs already linked by an operator are untouched.
pub fn insert_implicit_ors(tokens: Vec<Token>) -> Vec<Token> {
    if tokens.len() <= 1 {
        return tokens;
    }

    let mut result = Vec::with_capacity(tokens.len() * 2);
    let mut iter = tokens.into_iter().peekable();

    while let Some(current) = iter.next() {
        let needs_or = iter
            .peek()
            .is_some_and(|next| current.ends_value() && next.starts_value());
        result.push(current);
        if needs_or {
            result.push(Token::symbol(TokenKind::Or));
        }
    }

    result
}
