mod common;

use common::{assert_error_code, id, parse_ok, sexp_of};
use partiql_syntax::{ExprKind, StatementKind};
use partiql_syntax::ast::DmlOp;
use partiql_syntax::error::codes;

// ===== DML =====

#[test]
fn insert_value_renders_target_value_and_position() {
    assert_eq!(
        sexp_of("INSERT INTO t VALUE 1 AT 0"),
        format!("(dml (operations (insert_value {} (lit 1) (lit 0))))", id("t"))
    );
}

#[test]
fn insert_source_may_be_a_parenthesized_query() {
    let StatementKind::Dml(dml) = parse_ok("INSERT INTO t (SELECT * FROM u)").kind else {
        panic!("expected DML");
    };
    let [DmlOp::Insert { target, values }] = dml.operations.as_slice() else {
        panic!("expected insert, got {:?}", dml.operations);
    };
    assert!(matches!(target.kind, ExprKind::Identifier(ref t) if t.name == "t"));
    assert!(matches!(values.kind, ExprKind::Select(_)));
}

#[test]
fn dml_targets_are_paths() {
    assert_eq!(
        sexp_of("INSERT INTO @t.items VALUE 1"),
        "(dml (operations (insert_value (path (id t (case_insensitive) (locals_first)) \
         (path_expr (lit 'items') (case_insensitive))) (lit 1))))"
    );
    assert_error_code("SET f(x) = 1", codes::UNEXPECTED_TOKEN);
}

#[test]
fn update_renders_source_and_filter() {
    assert_eq!(
        sexp_of("UPDATE t SET a = 1 WHERE b = 2"),
        format!(
            "(dml (operations (set (assignment {a} (lit 1)))) (from (scan {t})) (where (eq {b} (lit 2))))",
            a = id("a"),
            b = id("b"),
            t = id("t"),
        )
    );
}

#[test]
fn from_pipeline_keeps_operation_order() {
    let StatementKind::Dml(dml) =
        parse_ok("FROM t AS x WHERE x.done INSERT INTO archive VALUE x REMOVE x").kind
    else {
        panic!("expected DML");
    };
    assert!(dml.from.is_some());
    assert!(dml.where_clause.is_some());
    assert!(matches!(dml.operations[0], DmlOp::InsertValue { .. }));
    assert!(matches!(dml.operations[1], DmlOp::Remove(_)));
}

#[test]
fn delete_accepts_a_trailing_semicolon() {
    let StatementKind::Dml(dml) = parse_ok("DELETE FROM t AS x WHERE x.a = 1;").kind else {
        panic!("expected DML");
    };
    assert_eq!(dml.operations, vec![DmlOp::Delete]);
}

#[test]
fn incomplete_dml_is_rejected() {
    assert_error_code("UPDATE t WHERE a = 1", codes::UNEXPECTED_TOKEN);
    assert_error_code("INSERT INTO t", codes::UNEXPECTED_TOKEN);
    assert_error_code("DELETE t", codes::UNEXPECTED_TOKEN);
    assert_error_code("SET a =", codes::UNEXPECTED_TOKEN);
}

// ===== DDL =====

#[test]
fn ddl_statements_render() {
    assert_eq!(
        sexp_of("CREATE TABLE foo"),
        format!("(ddl (create_table {}))", id("foo"))
    );
    assert_eq!(
        sexp_of("DROP INDEX idx ON foo"),
        format!("(ddl (drop_index {} {}))", id("idx"), id("foo"))
    );
    assert_eq!(
        sexp_of("CREATE INDEX ON foo (a)"),
        format!("(ddl (create_index {} {}))", id("foo"), id("a"))
    );
    assert_eq!(
        sexp_of("DROP TABLE \"Foo\""),
        "(ddl (drop_table (id Foo (case_sensitive) (unqualified))))"
    );
}

#[test]
fn ddl_requires_names() {
    assert_error_code("CREATE TABLE", codes::UNEXPECTED_TOKEN);
    assert_error_code("DROP INDEX idx", codes::UNEXPECTED_TOKEN);
    assert_error_code("CREATE INDEX foo", codes::UNEXPECTED_TOKEN);
}

// ===== EXEC =====

#[test]
fn exec_renders_procedure_and_arguments() {
    assert_eq!(sexp_of("EXEC calc"), "(exec calc)");
    assert_eq!(
        sexp_of("EXEC calc 1, 'two'"),
        "(exec calc (lit 1) (lit 'two'))"
    );
}
