//! Saved-search query language.
//!
//! Grammar, informally:
//! ```text
//! query  = expr
//! expr   = expr ("AND" | "OR") expr | "NOT" expr | "(" expr ")" | term
//! term   = WORD ["|" CODE ("," CODE)*] | '"' PHRASE '"'
//! ```
//! Adjacent operands with no operator between them are joined with `OR`.
//! Precedence is NOT > AND > OR; AND and OR associate to the left.

pub mod expression;
pub mod parser;
pub mod token;

pub use expression::{Expression, TermExpression};
pub use parser::{parse, ParsedQuery};
pub use token::{insert_implicit_ors, tokenize, Token, TokenKind};
