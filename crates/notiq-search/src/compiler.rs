//! Compilation of query expression trees into backend queries.
//!
//! Terms become multi-field matches over their resolved fields: quoted
//! phrases match exactly, bare words match as a phrase prefix with a capped
//! number of expansions. Boolean nodes map onto `must`, `should` and
//! `must_not`. A run of the same operator becomes one flat clause list, so
//! `a b c` compiles to a single `should` of three matches rather than nested
//! pairs, and compiled depth follows grouping rather than query length.

use std::env;

use notiq_core::defaults;
use notiq_core::{
    resolve_fields, BackendQuery, BoolQuery, Expression, MatchType, MultiMatchQuery,
    ParsedQuery, TermExpression,
};
use tracing::trace;

/// Settings applied to every compiled text match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Search analyzer applied to the query text.
    pub analyzer: String,
    /// Upper bound on terms a prefix may expand to.
    pub max_expansions: u32,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            analyzer: defaults::ANALYZER.to_string(),
            max_expansions: defaults::MAX_EXPANSIONS,
        }
    }
}

impl CompilerConfig {
    /// Constructs the config from environment variables.
    ///
    /// - `NOTIQ_ANALYZER` (default: `my_analyzer2`)
    /// - `NOTIQ_MAX_EXPANSIONS` (default: 200; zero or unparseable values fall back)
    pub fn from_env() -> Self {
        let base = Self::default();
        Self {
            analyzer: env::var("NOTIQ_ANALYZER")
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(base.analyzer),
            max_expansions: env::var("NOTIQ_MAX_EXPANSIONS")
                .ok()
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(base.max_expansions),
        }
    }
}

/// Stateless compiler from [`Expression`] trees to [`BackendQuery`] values.
#[derive(Debug, Clone, Default)]
pub struct QueryCompiler {
    config: CompilerConfig,
}

impl QueryCompiler {
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile an expression, matching terms without selectors against
    /// `default_fields`.
    pub fn compile<S: AsRef<str>>(&self, expr: &Expression, default_fields: &[S]) -> BackendQuery {
        match expr {
            Expression::Term(term) => self.compile_term(term, default_fields),
            Expression::Not { .. } => {
                let (operand, negated) = strip_negations(expr);
                let compiled = self.compile(operand, default_fields);
                if negated {
                    BackendQuery::none_of(compiled)
                } else {
                    compiled
                }
            }
            Expression::And { .. } => BackendQuery::Bool(BoolQuery {
                must: self.compile_run(expr, default_fields),
                ..Default::default()
            }),
            Expression::Or { .. } => BackendQuery::Bool(BoolQuery {
                should: self.compile_run(expr, default_fields),
                ..Default::default()
            }),
        }
    }

    /// Compile a parsed query. A query without a tree compiles to nothing,
    /// which callers treat as "no text filter".
    pub fn compile_parsed<S: AsRef<str>>(
        &self,
        parsed: &ParsedQuery,
        default_fields: &[S],
    ) -> Option<BackendQuery> {
        let compiled = parsed
            .expression_tree
            .as_ref()
            .map(|tree| self.compile(tree, default_fields));
        trace!(
            query = %parsed.original_text,
            compiled = compiled.is_some(),
            "Compiled text query"
        );
        compiled
    }

    fn compile_term<S: AsRef<str>>(&self, term: &TermExpression, default_fields: &[S]) -> BackendQuery {
        let fields = resolve_fields(term.field_selectors.as_deref(), default_fields);
        let (match_type, max_expansions) = if term.is_quoted {
            (MatchType::Phrase, None)
        } else {
            (MatchType::PhrasePrefix, Some(self.config.max_expansions))
        };

        BackendQuery::MultiMatch(MultiMatchQuery {
            query: term.text.clone(),
            fields,
            analyzer: self.config.analyzer.clone(),
            match_type,
            max_expansions,
        })
    }

    /// Compile the operands of a run of `expr`'s operator, left to right.
    fn compile_run<S: AsRef<str>>(&self, expr: &Expression, default_fields: &[S]) -> Vec<BackendQuery> {
        operator_run(expr)
            .into_iter()
            .map(|operand| self.compile(operand, default_fields))
            .collect()
    }
}

/// Operands of the maximal run of `expr`'s binary operator, in source order.
fn operator_run(expr: &Expression) -> Vec<&Expression> {
    let is_and = matches!(expr, Expression::And { .. });
    let mut operands = Vec::new();
    let mut pending = vec![expr];
    while let Some(node) = pending.pop() {
        match node {
            Expression::And { left, right } if is_and => {
                pending.push(right.as_ref());
                pending.push(left.as_ref());
            }
            Expression::Or { left, right } if !is_and => {
                pending.push(right.as_ref());
                pending.push(left.as_ref());
            }
            other => operands.push(other),
        }
    }
    operands
}

/// Peel a chain of NOTs. Returns the innermost operand and whether an odd
/// number of negations applied.
fn strip_negations(expr: &Expression) -> (&Expression, bool) {
    let mut node = expr;
    let mut negated = false;
    while let Expression::Not { operand } = node {
        node = operand.as_ref();
        negated = !negated;
    }
    (node, negated)
}
