//! Property-based tests for the query parser using proptest.

use notiq_core::query::{parse, tokenize, Expression, TermExpression, TokenKind};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

fn word() -> impl Strategy<Value = String> {
    "[a-z]{1,8}".prop_filter("operator keyword", |w| {
        !matches!(w.as_str(), "and" | "or" | "not")
    })
}

fn leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        word().prop_map(Expression::term),
        prop::collection::vec(word(), 1..3).prop_map(|words| Expression::phrase(words.join(" "))),
        (word(), prop::sample::subsequence(vec!["pu", "lo", "su", "ti"], 1..3)).prop_map(
            |(text, codes)| {
                Expression::Term(TermExpression {
                    text,
                    is_quoted: false,
                    field_selectors: Some(codes.into_iter().map(String::from).collect()),
                })
            }
        ),
    ]
}

fn expression() -> impl Strategy<Value = Expression> {
    leaf().prop_recursive(5, 32, 2, |inner| {
        prop_oneof![
            inner.clone().prop_map(Expression::not),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expression::and(l, r)),
            (inner.clone(), inner).prop_map(|(l, r)| Expression::or(l, r)),
        ]
    })
}

// ============================================================================
// Property tests
// ============================================================================

proptest! {
    /// A well-formed query always yields a tree with one leaf per term token.
    #[test]
    fn well_formed_query_has_one_leaf_per_term(expr in expression()) {
        let text = expr.to_string();
        let term_tokens = tokenize(&text)
            .iter()
            .filter(|t| t.kind == TokenKind::Term)
            .count();

        let parsed = parse(&text);
        let tree = parsed.expression_tree.clone();
        prop_assert!(tree.is_some(), "no tree for {}", text);
        prop_assert_eq!(tree.map(|t| t.leaf_count()), Some(term_tokens));
    }

    /// Rendering a tree with full parenthesisation and parsing it back gives
    /// the same tree.
    #[test]
    fn rendered_tree_reparses_identically(expr in expression()) {
        let text = expr.to_string();
        prop_assert_eq!(parse(&text).expression_tree, Some(expr));
    }

    /// Space-separated words mean the same as explicit ORs.
    #[test]
    fn adjacent_words_are_ored(words in prop::collection::vec(word(), 1..6)) {
        let implicit = parse(&words.join(" "));
        let explicit = parse(&words.join(" OR "));
        prop_assert_eq!(implicit.expression_tree, explicit.expression_tree);
    }

    /// Arbitrary input never panics and keeps the original text.
    #[test]
    fn arbitrary_input_never_panics(text in ".{0,64}") {
        let parsed = parse(&text);
        prop_assert_eq!(parsed.original_text, text);
    }
}
