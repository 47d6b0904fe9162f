mod common;

use common::{assert_error_code, expr_ok, id, parse_ok, sexp_of};
use partiql_syntax::ast::sexp::to_sexp;
use partiql_syntax::ast::{
    CastExpr, FromSource, Projection, ScopeQualifier, Select, SetOperator, SetQuantifier, Type,
};
use partiql_syntax::error::codes;
use partiql_syntax::{ExprKind, StatementKind};

fn select(source: &str) -> Select {
    match parse_ok(source).kind {
        StatementKind::Query(expr) => match expr.kind {
            ExprKind::Select(select) => *select,
            other => panic!("expected SELECT for `{source}`, got {other:?}"),
        },
        other => panic!("expected a query for `{source}`, got {other:?}"),
    }
}

// ===== Precedence =====

#[test]
fn set_operators_bind_looser_than_and() {
    assert_eq!(
        to_sexp(&expr_ok("a AND b UNION c")),
        format!("(bag_op (union) (distinct) (and {} {}) {})", id("a"), id("b"), id("c"))
    );
    assert_eq!(
        to_sexp(&expr_ok("a UNION b AND c")),
        format!("(bag_op (union) (distinct) {} (and {} {}))", id("a"), id("b"), id("c"))
    );
}

#[test]
fn set_operators_associate_left() {
    let expr = expr_ok("a INTERSECT b INTERSECT ALL c");
    let ExprKind::SetOp(outer) = expr.kind else {
        panic!("expected a set operation");
    };
    assert_eq!(outer.op, SetOperator::Intersect);
    assert_eq!(outer.quantifier, SetQuantifier::All);
    let ExprKind::SetOp(inner) = outer.lhs.kind else {
        panic!("expected a nested set operation on the left");
    };
    assert_eq!(inner.op, SetOperator::Intersect);
    assert_eq!(inner.quantifier, SetQuantifier::Distinct);
    assert!(matches!(outer.rhs.kind, ExprKind::Identifier(_)));
}

#[test]
fn set_operators_combine_whole_query_blocks() {
    let statement = parse_ok("SELECT a FROM t WHERE x OR y UNION ALL SELECT b FROM u");
    let StatementKind::Query(expr) = statement.kind else {
        panic!("expected a query");
    };
    let ExprKind::SetOp(set_op) = expr.kind else {
        panic!("expected UNION ALL at the root");
    };
    assert!(matches!(set_op.lhs.kind, ExprKind::Select(_)));
    assert!(matches!(set_op.rhs.kind, ExprKind::Select(_)));

    let outer = sexp_of("SELECT a FROM t OUTER UNION SELECT b FROM u");
    assert!(outer.starts_with("(bag_op (outer_union) (distinct)"), "{outer}");
}

// ===== Projection and clauses =====

#[test]
fn select_renders_every_clause() {
    assert_eq!(
        sexp_of("SELECT a, b AS c FROM t WHERE a > 1"),
        format!(
            "(select (project_list (project_expr {a}) (project_expr {b} c)) \
             (from (scan {t})) (where (gt {a} (lit 1))))",
            a = id("a"),
            b = id("b"),
            t = id("t"),
        )
    );
}

#[test]
fn group_by_with_aliases_and_group_as() {
    assert_eq!(
        sexp_of("SELECT k FROM t GROUP PARTIAL BY t.a AS k GROUP AS g"),
        format!(
            "(select (project_list (project_expr {k})) (from (scan {t})) \
             (group (by partial) (group_key_list (group_key (path {t} (path_expr (lit 'a') (case_insensitive))) k)) \
             (group_as g)))",
            k = id("k"),
            t = id("t"),
        )
    );
}

#[test]
fn select_value_and_star() {
    assert!(matches!(
        select("SELECT VALUE {'a': x} FROM t AS x").projection,
        Projection::Value(_)
    ));
    assert_eq!(select("SELECT * FROM t").projection, Projection::Star);
}

#[test]
fn locals_first_references_are_marked() {
    let select = select("SELECT i FROM t AS x, @x.items AS i");
    let Some(FromSource::Join(join)) = &select.from else {
        panic!("expected an implicit join");
    };
    assert!(join.implicit);
    let FromSource::Scan(scan) = join.right.as_ref() else {
        panic!("expected a scan on the right");
    };
    let ExprKind::Path(path) = &scan.expr.kind else {
        panic!("expected a path");
    };
    let ExprKind::Identifier(root) = &path.root.kind else {
        panic!("expected an identifier root");
    };
    assert_eq!(root.qualifier, ScopeQualifier::LocalsFirst);
}

#[test]
fn non_reserved_words_are_identifiers() {
    for source in [
        "SELECT public, user FROM domain",
        "SELECT both FROM trail AS simple",
        "SELECT x.acyclic FROM t AS x WHERE shortest = 1",
        "SELECT year, month FROM lag",
        "SELECT over FROM partition AS leading",
    ] {
        parse_ok(source);
    }

    let select = select("SELECT t.trail FROM Trail AS t");
    let Some(FromSource::Scan(scan)) = &select.from else {
        panic!("expected a scan");
    };
    assert_eq!(to_sexp(&scan.expr), id("Trail"));
}

#[test]
fn cast_targets_share_canonical_vendor_names() {
    let target = |source: &str| match expr_ok(source).kind {
        ExprKind::Cast(CastExpr { ty, .. }) => ty,
        other => panic!("expected a cast, got {other:?}"),
    };
    let float4 = target("CAST('x' AS RS_FLOAT4)");
    assert_eq!(float4, target("CAST('x' AS RS_REAL)"));
    assert_eq!(float4, Type::Custom("rs_real".into()));
    assert_eq!(
        to_sexp(&expr_ok("CAST('x' AS RS_FLOAT4)")),
        "(cast (lit 'x') (custom_type rs_real))"
    );
}

#[test]
fn values_and_bag_literals_are_queries() {
    let statement = parse_ok("VALUES (1, 2), (3, 4);");
    assert!(matches!(statement.kind, StatementKind::Query(_)));
    assert_eq!(sexp_of("<<1, 2>>"), "(bag (lit 1) (lit 2))");
}

// ===== Clause errors =====

#[test]
fn out_of_order_clause_is_rejected() {
    assert_error_code("SELECT a FROM t LIMIT 1 WHERE a = 1", codes::MISPLACED_CLAUSE);
    assert_error_code("SELECT a FROM t HAVING a > 1 GROUP BY a", codes::MISPLACED_CLAUSE);
}

#[test]
fn incomplete_clause_is_rejected() {
    assert_error_code("SELECT a FROM t WHERE", codes::UNEXPECTED_TOKEN);
    assert_error_code("SELECT FROM t", codes::UNEXPECTED_TOKEN);
    assert_error_code("SELECT a FROM t ORDER a", codes::UNEXPECTED_TOKEN);
}

#[test]
fn only_one_statement_is_parsed() {
    parse_ok("SELECT a FROM t;");
    assert_error_code("SELECT a FROM t; DELETE FROM t", codes::TRAILING_INPUT);
}
