//! Shunting-yard parser turning a token stream into an expression tree.
//!
//! Malformed input never produces an error. Unbalanced parentheses, dangling
//! operators and empty queries all yield a [`ParsedQuery`] without a tree,
//! which callers treat as "apply no text filter".

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::expression::{Expression, TermExpression};
use super::token::{insert_implicit_ors, tokenize, Token, TokenKind};

/// Result of parsing one query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedQuery {
    pub original_text: String,
    /// Tokens after implicit-OR insertion.
    pub tokens: Vec<Token>,
    /// `None` when the token stream is malformed or empty.
    pub expression_tree: Option<Expression>,
}

impl ParsedQuery {
    /// Parse query text. See [`parse`].
    pub fn parse(query_text: &str) -> Self {
        parse(query_text)
    }

    /// Whether a usable expression tree was produced.
    pub fn is_valid(&self) -> bool {
        self.expression_tree.is_some()
    }
}

/// Tokenize, insert implicit ORs and build the expression tree.
pub fn parse(query_text: &str) -> ParsedQuery {
    let tokens = insert_implicit_ors(tokenize(query_text));
    trace!(token_count = tokens.len(), ?tokens, "Tokenized query");

    let expression_tree = parse_expression_tree(&tokens);
    if expression_tree.is_none() && !tokens.is_empty() {
        debug!(
            subsystem = "query",
            component = "parser",
            query = %query_text,
            token_count = tokens.len(),
            "Malformed query, text filter will be skipped"
        );
    }

    ParsedQuery {
        original_text: query_text.to_string(),
        tokens,
        expression_tree,
    }
}

fn parse_expression_tree(tokens: &[Token]) -> Option<Expression> {
    let postfix = to_postfix(tokens)?;
    if postfix.is_empty() {
        return None;
    }

    let mut stack: Vec<Expression> = Vec::new();

    for token in postfix {
        match token.kind {
            TokenKind::Term => {
                stack.push(Expression::Term(TermExpression::from_token_text(
                    &token.text,
                    token.is_quoted,
                )));
            }
            TokenKind::Not => {
                let operand = stack.pop()?;
                stack.push(Expression::not(operand));
            }
            TokenKind::And | TokenKind::Or => {
                if stack.len() < 2 {
                    return None;
                }
                let right = stack.pop()?;
                let left = stack.pop()?;
                stack.push(if token.kind == TokenKind::And {
                    Expression::and(left, right)
                } else {
                    Expression::or(left, right)
                });
            }
            TokenKind::LeftParen | TokenKind::RightParen => return None,
        }
    }

    if stack.len() != 1 {
        return None;
    }
    stack.pop()
}

/// Reorder tokens into postfix notation.
///
/// Returns `None` on a `)` without a matching `(`, or a `(` left open at the
/// end of input.
fn to_postfix(tokens: &[Token]) -> Option<Vec<&Token>> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut operators: Vec<&Token> = Vec::new();

    for token in tokens {
        match token.kind {
            TokenKind::Term => output.push(token),
            TokenKind::LeftParen => operators.push(token),
            TokenKind::RightParen => loop {
                match operators.pop() {
                    Some(op) if op.kind == TokenKind::LeftParen => break,
                    Some(op) => output.push(op),
                    None => return None,
                }
            },
            TokenKind::And | TokenKind::Or | TokenKind::Not => {
                while let Some(top) = operators.last() {
                    if top.kind.is_operator() && should_pop(top.kind, token.kind) {
                        output.extend(operators.pop());
                    } else {
                        break;
                    }
                }
                operators.push(token);
            }
        }
    }

    while let Some(op) = operators.pop() {
        if !op.kind.is_operator() {
            return None;
        }
        output.push(op);
    }

    Some(output)
}

/// AND/OR are left-associative; an incoming NOT only yields to a strictly
/// tighter operator, so `NOT NOT x` nests instead of collapsing.
fn should_pop(stack_top: TokenKind, incoming: TokenKind) -> bool {
    if incoming == TokenKind::Not {
        stack_top.precedence() > incoming.precedence()
    } else {
        stack_top.precedence() >= incoming.precedence()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(text: &str) -> Expression {
        parse(text)
            .expression_tree
            .unwrap_or_else(|| panic!("expected a tree for {text:?}"))
    }

    #[test]
    fn test_single_term() {
        assert_eq!(tree("bridge"), Expression::term("bridge"));
    }

    #[test]
    fn test_quoted_phrase() {
        assert_eq!(tree(r#""road works""#), Expression::phrase("road works"));
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            tree("foo AND bar OR baz"),
            Expression::or(
                Expression::and(Expression::term("foo"), Expression::term("bar")),
                Expression::term("baz"),
            )
        );
        assert_eq!(
            tree("foo OR bar AND baz"),
            Expression::or(
                Expression::term("foo"),
                Expression::and(Expression::term("bar"), Expression::term("baz")),
            )
        );
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(
            tree("a AND b AND c"),
            Expression::and(
                Expression::and(Expression::term("a"), Expression::term("b")),
                Expression::term("c"),
            )
        );
    }

    #[test]
    fn test_double_not_nests() {
        assert_eq!(
            tree("NOT NOT foo"),
            Expression::not(Expression::not(Expression::term("foo")))
        );
    }

    #[test]
    fn test_not_binds_tighter_than_and() {
        assert_eq!(
            tree("NOT a AND b"),
            Expression::and(
                Expression::not(Expression::term("a")),
                Expression::term("b"),
            )
        );
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(
            tree("foo AND (bar OR baz)"),
            Expression::and(
                Expression::term("foo"),
                Expression::or(Expression::term("bar"), Expression::term("baz")),
            )
        );
    }

    #[test]
    fn test_not_group() {
        assert_eq!(
            tree("NOT (a b)"),
            Expression::not(Expression::or(Expression::term("a"), Expression::term("b")))
        );
    }

    #[test]
    fn test_implicit_or_equivalence() {
        assert_eq!(
            parse("foo bar").expression_tree,
            parse("foo OR bar").expression_tree
        );
    }

    #[test]
    fn test_infix_not_is_dangling() {
        // "a NOT b" has no operator joining a to NOT b.
        assert!(parse("a NOT b").expression_tree.is_none());
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse("(foo").expression_tree.is_none());
        assert!(parse("foo)").expression_tree.is_none());
        assert!(parse("((foo)").expression_tree.is_none());
    }

    #[test]
    fn test_dangling_operators() {
        assert!(parse("foo AND").expression_tree.is_none());
        assert!(parse("OR foo").expression_tree.is_none());
        assert!(parse("NOT").expression_tree.is_none());
        assert!(parse("AND OR").expression_tree.is_none());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(parse("").expression_tree.is_none());
        assert!(parse("   ").expression_tree.is_none());
        assert!(parse("()").expression_tree.is_none());
    }

    #[test]
    fn test_tokens_and_original_text_preserved() {
        let parsed = parse("foo bar");
        assert_eq!(parsed.original_text, "foo bar");
        assert_eq!(parsed.tokens.len(), 3);
        assert_eq!(parsed.tokens[1].kind, TokenKind::Or);
        assert!(parsed.is_valid());
    }

    #[test]
    fn test_malformed_keeps_tokens() {
        let parsed = parse("(foo");
        assert_eq!(parsed.tokens.len(), 2);
        assert!(!parsed.is_valid());
    }

    #[test]
    fn test_term_selectors_are_parsed() {
        match &tree("build|pu,lo") {
            Expression::Term(term) => {
                assert_eq!(term.text, "build");
                assert_eq!(
                    term.field_selectors,
                    Some(vec!["pu".to_string(), "lo".to_string()])
                );
            }
            other => panic!("expected term, got {other:?}"),
        }
    }

    #[test]
    fn test_operator_case_insensitive() {
        assert_eq!(tree("a and b"), tree("a AND b"));
        assert_eq!(tree("not a"), tree("NOT a"));
    }
}
