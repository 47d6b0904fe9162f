mod common;

use common::id;
use partiql_syntax::ast::sexp::to_sexp;
use partiql_syntax::{TokenKind, parse_expression, parse_statement, tokenize};
use proptest::prelude::*;

const TOKEN_TEXTS: &[&str] = &[
    "SELECT", "from", "Where", "a", "b_1", "\"Quoted\"", "'str'", "'it''s'", "1", "1.5", "2e3",
    "(", ")", "[", "]", "<<", ">>", "{", "}", ",", ".", ":", ";", "*", "+", "-", "/", "%", "||",
    "=", "<>", "!=", "<", "<=", ">", ">=", "->", "~", "~>", "<~", "@", "?", "&", "|", "!",
    "UNION", "ALL", "OUTER", "NOT", "IN", "LIKE", "double", "precision", "character", "varying",
    "LEFT", "JOIN", "X'AB'", "`1`", "trail", "MATCH",
];

fn token_text() -> impl Strategy<Value = &'static str> {
    prop::sample::select(TOKEN_TEXTS)
}

const SEPARATORS: &[&str] = &[" ", "  ", "\n", "\r\n", "\t", " /* c */ ", " -- c\n"];

fn separator() -> impl Strategy<Value = &'static str> {
    prop::sample::select(SEPARATORS)
}

fn identifier() -> impl Strategy<Value = String> {
    "v_[a-z0-9]{0,5}"
}

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .unwrap_or_else(|err| panic!("tokenize failed for {source:?}: {err}"))
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn retokenizing_joined_token_text_is_stable(
        words in prop::collection::vec((token_text(), separator()), 0..40)
    ) {
        let source: String = words
            .iter()
            .flat_map(|(word, sep)| [*word, *sep])
            .collect();
        let tokens = tokenize(&source).unwrap();
        let rejoined = tokens
            .iter()
            .map(|token| token.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        prop_assert_eq!(
            tokens.into_iter().map(|token| token.kind).collect::<Vec<_>>(),
            kinds(&rejoined)
        );
    }

    #[test]
    fn set_operators_bind_looser_than_boolean_operators(
        a in identifier(),
        b in identifier(),
        c in identifier(),
    ) {
        let and_first = parse_expression(&format!("{a} AND {b} UNION {c}")).unwrap();
        prop_assert_eq!(
            to_sexp(&and_first),
            format!("(bag_op (union) (distinct) (and {} {}) {})", id(&a), id(&b), id(&c))
        );

        let union_first = parse_expression(&format!("{a} UNION {b} AND {c}")).unwrap();
        prop_assert_eq!(
            to_sexp(&union_first),
            format!("(bag_op (union) (distinct) {} (and {} {}))", id(&a), id(&b), id(&c))
        );

        let intersect = parse_expression(&format!("{a} INTERSECT {b} INTERSECT ALL {c}")).unwrap();
        prop_assert_eq!(
            to_sexp(&intersect),
            format!(
                "(bag_op (intersect) (all) (bag_op (intersect) (distinct) {} {}) {})",
                id(&a),
                id(&b),
                id(&c)
            )
        );
    }

    #[test]
    fn whitespace_and_comments_do_not_change_the_tree(
        sep in separator(),
        column in identifier(),
        table in identifier(),
    ) {
        let compact = format!("SELECT {column} FROM {table} WHERE {column} > 1");
        let spaced = format!(
            "SELECT{sep}{column}{sep}FROM{sep}{table}{sep}WHERE{sep}{column}{sep}>{sep}1"
        );
        prop_assert_eq!(
            to_sexp(&parse_statement(&compact).unwrap()),
            to_sexp(&parse_statement(&spaced).unwrap())
        );
    }

    #[test]
    fn arbitrary_input_never_panics(source in "\\PC*") {
        let _ = parse_statement(&source);
    }
}
