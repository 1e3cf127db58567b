//! Boolean expression tree produced by the query parser.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A leaf of the expression tree: one word or quoted phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermExpression {
    /// Text to match, with any `|selector` suffix removed.
    pub text: String,
    /// Quoted terms match as exact phrases.
    pub is_quoted: bool,
    /// Short field codes from a `|pu,lo` suffix, if any were given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_selectors: Option<Vec<String>>,
}

impl TermExpression {
    /// Build a leaf from raw token text, splitting off a `|code,code` suffix.
    ///
    /// Selector entries are trimmed and empty entries dropped. A suffix with
    /// no surviving entries leaves the term without selectors.
    pub fn from_token_text(raw: &str, is_quoted: bool) -> Self {
        let (text, field_selectors) = match raw.split_once('|') {
            Some((text, selectors)) => {
                let parts: Vec<String> = selectors
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                (text, (!parts.is_empty()).then_some(parts))
            }
            None => (raw, None),
        };

        Self {
            text: text.trim().to_string(),
            is_quoted,
            field_selectors,
        }
    }
}

/// Boolean query expression.
///
/// The variant set is closed; compilation matches on it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expression {
    Term(TermExpression),
    Not {
        operand: Box<Expression>,
    },
    And {
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Or {
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    /// Unquoted term without selectors.
    pub fn term(text: impl Into<String>) -> Self {
        Self::Term(TermExpression {
            text: text.into(),
            is_quoted: false,
            field_selectors: None,
        })
    }

    /// Quoted phrase without selectors.
    pub fn phrase(text: impl Into<String>) -> Self {
        Self::Term(TermExpression {
            text: text.into(),
            is_quoted: true,
            field_selectors: None,
        })
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(operand: Expression) -> Self {
        Self::Not {
            operand: Box::new(operand),
        }
    }

    pub fn and(left: Expression, right: Expression) -> Self {
        Self::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Expression, right: Expression) -> Self {
        Self::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Number of term leaves in the tree.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            match node {
                Self::Term(_) => count += 1,
                Self::Not { operand } => pending.push(operand.as_ref()),
                Self::And { left, right } | Self::Or { left, right } => {
                    pending.push(right.as_ref());
                    pending.push(left.as_ref());
                }
            }
        }
        count
    }

    /// Depth of the tree; a single term has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, level)) = pending.pop() {
            deepest = deepest.max(level);
            match node {
                Self::Term(_) => {}
                Self::Not { operand } => pending.push((operand.as_ref(), level + 1)),
                Self::And { left, right } | Self::Or { left, right } => {
                    pending.push((right.as_ref(), level + 1));
                    pending.push((left.as_ref(), level + 1));
                }
            }
        }
        deepest
    }

    /// Move this node's children into `out`, leaving empty leaves behind.
    fn detach_children(&mut self, out: &mut Vec<Expression>) {
        match self {
            Self::Term(_) => {}
            Self::Not { operand } => out.push(std::mem::replace(operand.as_mut(), Self::empty())),
            Self::And { left, right } | Self::Or { left, right } => {
                out.push(std::mem::replace(left.as_mut(), Self::empty()));
                out.push(std::mem::replace(right.as_mut(), Self::empty()));
            }
        }
    }

    fn empty() -> Self {
        Self::Term(TermExpression {
            text: String::new(),
            is_quoted: false,
            field_selectors: None,
        })
    }
}

/// Implicit ORs build left-deep chains as long as the query has words, so
/// teardown walks the tree with an explicit stack instead of recursing.
impl Drop for Expression {
    fn drop(&mut self) {
        if matches!(self, Self::Term(_)) {
            return;
        }
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

/// Fully parenthesised rendering, used in logs and test assertions.
impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(term) => {
                if term.is_quoted {
                    write!(f, "\"{}\"", term.text)?;
                } else {
                    write!(f, "{}", term.text)?;
                }
                if let Some(selectors) = &term.field_selectors {
                    write!(f, "|{}", selectors.join(","))?;
                }
                Ok(())
            }
            Self::Not { operand } => write!(f, "NOT {}", operand),
            Self::And { left, right } => write!(f, "({} AND {})", left, right),
            Self::Or { left, right } => write!(f, "({} OR {})", left, right),
        }
    }
}
