//! DML, DDL and `EXEC` statements.

use super::QueryParser;
use crate::ast::{
    Assignment, DdlStatement, DmlOp, DmlStatement, ExecStatement, Expr, ExprKind, Identifier,
    ScopeQualifier,
};
use crate::error::ParseResult;
use crate::lexer::token::TokenKind;

impl<'a> QueryParser<'a> {
    /// `INSERT`/`SET`/`REMOVE` on their own, `UPDATE src op+ [WHERE]`,
    /// `DELETE FROM src [WHERE]` or `FROM src [WHERE] op+`.
    pub(crate) fn parse_dml(&mut self) -> ParseResult<DmlStatement> {
        match self.stream.current().kind {
            TokenKind::From => {
                self.stream.advance();
                let from = self.parse_from_source()?;
                let where_clause = self.parse_where()?;
                let operations = self.parse_dml_ops()?;
                Ok(DmlStatement {
                    from: Some(from),
                    where_clause,
                    operations,
                })
            }
            TokenKind::Update => {
                self.stream.advance();
                let from = self.parse_from_source()?;
                let operations = self.parse_dml_ops()?;
                let where_clause = self.parse_where()?;
                Ok(DmlStatement {
                    from: Some(from),
                    where_clause,
                    operations,
                })
            }
            TokenKind::Delete => {
                self.stream.advance();
                self.stream.expect(TokenKind::From)?;
                let from = self.parse_from_source()?;
                let where_clause = self.parse_where()?;
                Ok(DmlStatement {
                    from: Some(from),
                    where_clause,
                    operations: vec![DmlOp::Delete],
                })
            }
            _ => {
                let operations = self.parse_dml_ops()?;
                Ok(DmlStatement {
                    from: None,
                    where_clause: None,
                    operations,
                })
            }
        }
    }

    fn parse_where(&mut self) -> ParseResult<Option<Expr>> {
        if self.stream.consume(&TokenKind::Where) {
            return self.parse_clause_expr().map(Some);
        }
        Ok(None)
    }

    /// One or more `INSERT`, `SET`, `REMOVE` or `DELETE` operations.
    fn parse_dml_ops(&mut self) -> ParseResult<Vec<DmlOp>> {
        let mut operations = Vec::new();
        loop {
            let operation = match self.stream.current().kind {
                TokenKind::Insert => self.parse_insert()?,
                TokenKind::Set => {
                    self.stream.advance();
                    DmlOp::Set(self.parse_assignments()?)
                }
                TokenKind::Remove => {
                    self.stream.advance();
                    DmlOp::Remove(self.parse_dml_target()?)
                }
                TokenKind::Delete => {
                    self.stream.advance();
                    DmlOp::Delete
                }
                _ if operations.is_empty() => {
                    return Err(self.stream.unexpected("INSERT, SET, REMOVE or DELETE"));
                }
                _ => return Ok(operations),
            };
            operations.push(operation);
        }
    }

    /// A path target: `name` or `@name` followed by path steps. Never a
    /// call, so `INSERT INTO t (SELECT ...)` keeps `t` as the target.
    fn parse_dml_target(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        let locals_first = self.stream.consume(&TokenKind::AtSign);
        let (mut id, _) = self.parse_identifier("a path to modify")?;
        if locals_first {
            id.qualifier = ScopeQualifier::LocalsFirst;
        }
        let root = Expr::new(ExprKind::Identifier(id), self.stream.span_from(start));
        self.parse_path_steps(root)
    }

    /// `INSERT INTO target VALUE v [AT pos]` or `INSERT INTO target <query>`.
    fn parse_insert(&mut self) -> ParseResult<DmlOp> {
        self.stream.expect(TokenKind::Insert)?;
        self.stream.expect(TokenKind::Into)?;
        let target = self.parse_dml_target()?;
        if self.stream.consume(&TokenKind::Value) {
            let value = self.parse_clause_expr()?;
            let position = if self.stream.consume(&TokenKind::At) {
                Some(self.parse_clause_expr()?)
            } else {
                None
            };
            return Ok(DmlOp::InsertValue {
                target,
                value,
                position,
            });
        }
        let values = self.parse_expr()?;
        Ok(DmlOp::Insert { target, values })
    }

    /// `target = value, ...`
    fn parse_assignments(&mut self) -> ParseResult<Vec<Assignment>> {
        let mut assignments = Vec::new();
        loop {
            let target = self.parse_dml_target()?;
            self.stream.expect(TokenKind::Eq)?;
            let value = self.parse_clause_expr()?;
            assignments.push(Assignment { target, value });
            if !self.stream.consume(&TokenKind::Comma) {
                return Ok(assignments);
            }
        }
    }

    /// `CREATE TABLE`, `DROP TABLE`, `CREATE INDEX ON` and `DROP INDEX`.
    pub(crate) fn parse_ddl(&mut self) -> ParseResult<DdlStatement> {
        if self.stream.consume(&TokenKind::Create) {
            if self.stream.consume(&TokenKind::Table) {
                let name = self.parse_table_name()?;
                return Ok(DdlStatement::CreateTable { name });
            }
            self.stream.expect(TokenKind::Index)?;
            self.stream.expect(TokenKind::On)?;
            let table = self.parse_table_name()?;
            self.stream.expect(TokenKind::LeftParen)?;
            if self.stream.check(&TokenKind::RightParen) {
                return Err(self.stream.unexpected("an index key"));
            }
            let keys = self.parse_expr_list(&TokenKind::RightParen)?;
            self.stream.expect(TokenKind::RightParen)?;
            return Ok(DdlStatement::CreateIndex { table, keys });
        }

        self.stream.expect(TokenKind::Drop)?;
        if self.stream.consume(&TokenKind::Table) {
            let name = self.parse_table_name()?;
            return Ok(DdlStatement::DropTable { name });
        }
        self.stream.expect(TokenKind::Index)?;
        let index = self.parse_identifier("an index name")?.0;
        self.stream.expect(TokenKind::On)?;
        let table = self.parse_table_name()?;
        Ok(DdlStatement::DropIndex { index, table })
    }

    fn parse_table_name(&mut self) -> ParseResult<Identifier> {
        Ok(self.parse_identifier("a table name")?.0)
    }

    /// `EXEC procedure [arg, ...]`
    pub(crate) fn parse_exec(&mut self) -> ParseResult<ExecStatement> {
        self.stream.expect(TokenKind::Exec)?;
        let procedure = self.parse_name("a procedure name")?.node;
        let args = if self.stream.check_any(&[TokenKind::Semicolon, TokenKind::Eof]) {
            Vec::new()
        } else {
            self.parse_expr_list(&TokenKind::Eof)?
        };
        Ok(ExecStatement { procedure, args })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::sexp::to_sexp;
    use crate::ast::*;
    use crate::error::codes;
    use crate::parser::parse_statement;

    fn dml(source: &str) -> DmlStatement {
        match parse_statement(source).map(|statement| statement.kind) {
            Ok(StatementKind::Dml(dml)) => dml,
            other => panic!("expected DML for {source:?}, got {other:?}"),
        }
    }

    fn ddl(source: &str) -> DdlStatement {
        match parse_statement(source).map(|statement| statement.kind) {
            Ok(StatementKind::Ddl(ddl)) => ddl,
            other => panic!("expected DDL for {source:?}, got {other:?}"),
        }
    }

    #[test]
    fn insert_value_with_position() {
        let dml = dml("INSERT INTO t VALUE {'a': 1} AT 0");
        let [DmlOp::InsertValue { position, .. }] = dml.operations.as_slice() else {
            panic!("expected insert_value");
        };
        assert!(position.is_some());
        assert!(dml.from.is_none());
    }

    #[test]
    fn insert_query() {
        let dml = dml("INSERT INTO t SELECT * FROM u");
        let [DmlOp::Insert { values, .. }] = dml.operations.as_slice() else {
            panic!("expected insert");
        };
        assert!(matches!(values.kind, ExprKind::Select(_)));
    }

    #[test]
    fn update_with_set_and_where() {
        let dml = dml("UPDATE t SET a = 1, b.c = 'x' WHERE d > 2");
        assert!(dml.from.is_some());
        assert!(dml.where_clause.is_some());
        let [DmlOp::Set(assignments)] = dml.operations.as_slice() else {
            panic!("expected set");
        };
        assert_eq!(assignments.len(), 2);
        assert!(matches!(assignments[1].target.kind, ExprKind::Path(_)));
    }

    #[test]
    fn from_where_with_several_operations() {
        let dml = dml("FROM t AS x WHERE x.a = 1 SET x.b = 2 REMOVE x.c");
        assert_eq!(dml.operations.len(), 2);
        assert!(matches!(dml.operations[1], DmlOp::Remove(_)));
    }

    #[test]
    fn delete_from() {
        let dml = dml("DELETE FROM t WHERE a = 1");
        assert_eq!(dml.operations, vec![DmlOp::Delete]);
        assert!(dml.where_clause.is_some());
        assert_eq!(
            to_sexp(&parse_statement("DELETE FROM t").unwrap()),
            "(dml (operations (delete)) (from (scan (id t (case_insensitive) (unqualified)))))"
        );
    }

    #[test]
    fn standalone_remove() {
        let dml = dml("REMOVE a.b[0]");
        assert!(matches!(dml.operations[0], DmlOp::Remove(_)));
    }

    #[test]
    fn from_without_operation_fails() {
        let Err(err) = parse_statement("FROM t WHERE a") else {
            panic!("expected an error");
        };
        assert_eq!(err.code, codes::UNEXPECTED_TOKEN);
    }

    #[test]
    fn ddl_statements() {
        assert!(matches!(
            ddl("CREATE TABLE foo"),
            DdlStatement::CreateTable { ref name } if name.name == "foo"
        ));
        assert!(matches!(ddl("DROP TABLE \"Foo\""), DdlStatement::DropTable { .. }));
        let DdlStatement::CreateIndex { keys, .. } = ddl("CREATE INDEX ON t (a, b.c)") else {
            panic!("expected create_index");
        };
        assert_eq!(keys.len(), 2);
        assert!(matches!(ddl("DROP INDEX i ON t"), DdlStatement::DropIndex { .. }));
        assert!(parse_statement("CREATE INDEX ON t ()").is_err());
        assert!(parse_statement("CREATE VIEW v").is_err());
    }

    #[test]
    fn exec_with_arguments() {
        let Ok(Statement {
            kind: StatementKind::Exec(exec),
            ..
        }) = parse_statement("EXEC calc 1, 'two', [3];")
        else {
            panic!("expected exec");
        };
        assert_eq!(exec.procedure, "calc");
        assert_eq!(exec.args.len(), 3);
    }
}
