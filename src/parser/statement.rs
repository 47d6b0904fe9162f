//! Query blocks (`SELECT`, `PIVOT`), `FROM` sources and the statement root.
//!
//! Clause expressions are parsed one level above the set operators, so a
//! trailing `UNION` applies to the whole query block rather than to its
//! last clause.

use super::QueryParser;
use super::precedence::Precedence;
use crate::ast::{
    Expr, ExprKind, FromSource, GroupBy, GroupKey, GroupingStrategy, Join, JoinKind, LetBinding,
    NullsOrder, Ordering, PathExpr, PathStep, ProjectItem, Projection, Scan, Select,
    SetQuantifier, SortSpec, Spanned, Statement, StatementKind,
};
use crate::error::{ParseResult, SyntaxError, codes};
use crate::lexer::keywords::ContextualKeyword;
use crate::lexer::token::TokenKind;
use smol_str::SmolStr;
use tracing::trace;

/// Clause keywords in the order a query block accepts them.
const CLAUSE_ORDER: &[TokenKind] = &[
    TokenKind::From,
    TokenKind::Let,
    TokenKind::Where,
    TokenKind::Group,
    TokenKind::Having,
    TokenKind::Order,
    TokenKind::Limit,
    TokenKind::Offset,
];

impl<'a> QueryParser<'a> {
    /// Parses one statement and requires the input to end after it.
    pub(crate) fn parse_statement_root(&mut self) -> ParseResult<Statement> {
        let start = self.stream.start();
        let kind = match self.stream.current().kind {
            TokenKind::Insert
            | TokenKind::Update
            | TokenKind::Delete
            | TokenKind::Set
            | TokenKind::Remove
            | TokenKind::From => StatementKind::Dml(self.parse_dml()?),
            TokenKind::Create | TokenKind::Drop => StatementKind::Ddl(self.parse_ddl()?),
            TokenKind::Exec => StatementKind::Exec(self.parse_exec()?),
            _ => StatementKind::Query(self.parse_expr()?),
        };
        let span = self.stream.span_from(start);
        self.expect_end()?;
        Ok(Statement { kind, span })
    }

    /// An expression inside a clause: every operator except set operators.
    pub(crate) fn parse_clause_expr(&mut self) -> ParseResult<Expr> {
        self.parse_expr_bp(Precedence::Or)
    }

    /// `SELECT [ALL | DISTINCT] (* | VALUE expr | item, ...)` and the
    /// clauses after it.
    pub(crate) fn parse_select(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::Select)?;
        let quantifier = if self.stream.consume(&TokenKind::Distinct) {
            SetQuantifier::Distinct
        } else {
            self.stream.consume(&TokenKind::All);
            SetQuantifier::All
        };
        let projection = if self.stream.consume(&TokenKind::Star) {
            Projection::Star
        } else if self.stream.consume(&TokenKind::Value) {
            Projection::Value(self.parse_clause_expr()?)
        } else {
            Projection::Items(self.parse_project_items()?)
        };
        self.parse_query_body(start, quantifier, projection)
    }

    /// `PIVOT value AT key FROM ...`
    pub(crate) fn parse_pivot(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::Pivot)?;
        let value = self.parse_clause_expr()?;
        self.stream.expect(TokenKind::At)?;
        let key = self.parse_clause_expr()?;
        if !self.stream.check(&TokenKind::From) {
            return Err(self.stream.unexpected("FROM"));
        }
        self.parse_query_body(start, SetQuantifier::All, Projection::Pivot { value, key })
    }

    fn parse_project_items(&mut self) -> ParseResult<Vec<ProjectItem>> {
        let mut items = Vec::new();
        loop {
            let expr = self.parse_clause_expr()?;
            let item = match strip_unpivot(expr) {
                Ok(all) => ProjectItem::All(all),
                Err(expr) => ProjectItem::Expr {
                    expr,
                    alias: self.parse_alias()?,
                },
            };
            items.push(item);
            if !self.stream.consume(&TokenKind::Comma) {
                return Ok(items);
            }
        }
    }

    /// `[AS] name`
    fn parse_alias(&mut self) -> ParseResult<Option<Spanned<SmolStr>>> {
        if self.stream.consume(&TokenKind::As) || self.at_name() {
            return self.parse_name("an alias").map(Some);
        }
        Ok(None)
    }

    /// `keyword name` when the keyword is present.
    fn parse_keyword_alias(
        &mut self,
        keyword: &TokenKind,
    ) -> ParseResult<Option<Spanned<SmolStr>>> {
        if self.stream.consume(keyword) {
            return self.parse_name("an alias").map(Some);
        }
        Ok(None)
    }

    fn parse_query_body(
        &mut self,
        start: usize,
        quantifier: SetQuantifier,
        projection: Projection,
    ) -> ParseResult<Expr> {
        let from = if self.stream.consume(&TokenKind::From) {
            Some(self.parse_from_source()?)
        } else {
            None
        };

        let mut let_bindings = Vec::new();
        if self.stream.consume(&TokenKind::Let) {
            loop {
                let expr = self.parse_clause_expr()?;
                self.stream.expect(TokenKind::As)?;
                let name = self.parse_name("a LET variable")?;
                let_bindings.push(LetBinding { expr, name });
                if !self.stream.consume(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let where_clause = self.parse_optional_clause(&TokenKind::Where)?;
        let group_by = if self.stream.check(&TokenKind::Group) {
            Some(self.parse_group_by()?)
        } else {
            None
        };
        let having = self.parse_optional_clause(&TokenKind::Having)?;
        let order_by = if self.stream.consume(&TokenKind::Order) {
            self.stream.expect(TokenKind::By)?;
            self.parse_sort_specs()?
        } else {
            Vec::new()
        };
        let limit = self.parse_optional_clause(&TokenKind::Limit)?;
        let offset = self.parse_optional_clause(&TokenKind::Offset)?;

        if self.stream.check_any(CLAUSE_ORDER) {
            let found = self.stream.current().kind.clone();
            return Err(Box::new(
                SyntaxError::parser(
                    codes::MISPLACED_CLAUSE,
                    format!("{found} clause is out of order"),
                    self.stream.current(),
                )
                .with_help(
                    "clauses follow the order FROM, LET, WHERE, GROUP BY, HAVING, \
                     ORDER BY, LIMIT, OFFSET",
                ),
            ));
        }

        let span = self.stream.span_from(start);
        let select = Select {
            quantifier,
            projection,
            from,
            let_bindings,
            where_clause,
            group_by,
            having,
            order_by,
            limit,
            offset,
            span: span.clone(),
        };
        Ok(Expr::new(ExprKind::Select(Box::new(select)), span))
    }

    fn parse_optional_clause(&mut self, keyword: &TokenKind) -> ParseResult<Option<Expr>> {
        if self.stream.consume(keyword) {
            return self.parse_clause_expr().map(Some);
        }
        Ok(None)
    }

    /// `GROUP [PARTIAL] BY key [AS alias], ... [GROUP AS name]`
    fn parse_group_by(&mut self) -> ParseResult<GroupBy> {
        self.stream.expect(TokenKind::Group)?;
        let strategy = if self.stream.consume(&TokenKind::Partial) {
            GroupingStrategy::Partial
        } else {
            GroupingStrategy::Full
        };
        self.stream.expect(TokenKind::By)?;

        let mut keys = Vec::new();
        loop {
            let expr = self.parse_clause_expr()?;
            let alias = self.parse_keyword_alias(&TokenKind::As)?;
            keys.push(GroupKey { expr, alias });
            if !self.stream.consume(&TokenKind::Comma) {
                break;
            }
        }

        let group_as = if self.stream.check(&TokenKind::Group)
            && self.stream.peek().kind == TokenKind::As
        {
            self.stream.advance();
            self.stream.advance();
            Some(self.parse_name("a group name")?)
        } else {
            None
        };
        Ok(GroupBy {
            strategy,
            keys,
            group_as,
        })
    }

    /// `expr [ASC | DESC] [NULLS FIRST | NULLS LAST], ...`
    pub(crate) fn parse_sort_specs(&mut self) -> ParseResult<Vec<SortSpec>> {
        let mut specs = Vec::new();
        loop {
            specs.push(self.parse_sort_spec()?);
            if !self.stream.consume(&TokenKind::Comma) {
                return Ok(specs);
            }
        }
    }

    fn parse_sort_spec(&mut self) -> ParseResult<SortSpec> {
        let expr = self.parse_clause_expr()?;
        let ordering = if self.stream.consume(&TokenKind::Asc) {
            Some(Ordering::Asc)
        } else if self.stream.consume(&TokenKind::Desc) {
            Some(Ordering::Desc)
        } else {
            None
        };
        let nulls = if self.stream.consume(&TokenKind::Nulls) {
            if self.stream.consume_contextual(ContextualKeyword::First) {
                Some(NullsOrder::First)
            } else if self.stream.consume_contextual(ContextualKeyword::Last) {
                Some(NullsOrder::Last)
            } else {
                return Err(self.stream.unexpected("FIRST or LAST"));
            }
        } else {
            None
        };
        Ok(SortSpec {
            expr,
            ordering,
            nulls,
        })
    }

    /// A `FROM` clause: items joined explicitly or by commas, nesting to
    /// the left.
    pub(crate) fn parse_from_source(&mut self) -> ParseResult<FromSource> {
        let mut source = self.parse_from_item()?;
        loop {
            let (kind, implicit, conditional) = match self.stream.current().kind {
                TokenKind::Comma => (JoinKind::Inner, true, false),
                TokenKind::Join | TokenKind::InnerJoin => (JoinKind::Inner, false, true),
                TokenKind::CrossJoin => (JoinKind::Inner, false, false),
                TokenKind::LeftJoin => (JoinKind::Left, false, true),
                TokenKind::LeftCrossJoin => (JoinKind::Left, false, false),
                TokenKind::RightJoin => (JoinKind::Right, false, true),
                TokenKind::RightCrossJoin => (JoinKind::Right, false, false),
                TokenKind::FullJoin => (JoinKind::Full, false, true),
                TokenKind::FullCrossJoin => (JoinKind::Full, false, false),
                _ => return Ok(source),
            };
            self.stream.advance();
            let start = source.span().start;
            let right = self.parse_from_item()?;
            let condition = if conditional && self.stream.consume(&TokenKind::On) {
                Some(self.parse_clause_expr()?)
            } else {
                None
            };
            source = FromSource::Join(Join {
                kind,
                implicit,
                left: Box::new(source),
                right: Box::new(right),
                condition,
                span: self.stream.span_from(start),
            });
        }
    }

    /// `UNPIVOT expr ...`, `expr [MATCH pattern]`, each with optional
    /// `[AS] a AT b BY c` aliases.
    fn parse_from_item(&mut self) -> ParseResult<FromSource> {
        let start = self.stream.start();
        let unpivot = self.stream.consume(&TokenKind::Unpivot);
        let mut expr = self.parse_clause_expr()?;
        if !unpivot && self.stream.check(&TokenKind::Match) {
            trace!("unparenthesized MATCH in FROM");
            let graph = self.parse_graph_match(expr, false)?;
            expr = Expr::new(ExprKind::GraphMatch(graph), self.stream.span_from(start));
        }
        let as_alias = self.parse_alias()?;
        let at_alias = self.parse_keyword_alias(&TokenKind::At)?;
        let by_alias = self.parse_keyword_alias(&TokenKind::By)?;
        let scan = Scan {
            expr,
            as_alias,
            at_alias,
            by_alias,
            span: self.stream.span_from(start),
        };
        Ok(if unpivot {
            FromSource::Unpivot(scan)
        } else {
            FromSource::Scan(scan)
        })
    }
}

/// Turns `e.*` into `e`; any other expression is handed back unchanged.
fn strip_unpivot(expr: Expr) -> Result<Expr, Expr> {
    match expr.kind {
        ExprKind::Path(mut path) if path.steps.last() == Some(&PathStep::Unpivot) => {
            path.steps.pop();
            if path.steps.is_empty() {
                return Ok(*path.root);
            }
            Ok(Expr::new(
                ExprKind::Path(PathExpr {
                    root: path.root,
                    steps: path.steps,
                }),
                expr.span,
            ))
        }
        kind => Err(Expr::new(kind, expr.span)),
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::sexp::to_sexp;
    use crate::ast::*;
    use crate::error::codes;
    use crate::parser::{parse_expression, parse_statement};

    fn select(source: &str) -> Select {
        match parse_expression(source).map(|expr| expr.kind) {
            Ok(ExprKind::Select(select)) => *select,
            other => panic!("expected a SELECT for {source:?}, got {other:?}"),
        }
    }

    fn scan(source: &FromSource) -> &Scan {
        match source {
            FromSource::Scan(scan) => scan,
            other => panic!("expected a scan, got {other:?}"),
        }
    }

    #[test]
    fn projection_forms() {
        assert_eq!(select("SELECT * FROM t").projection, Projection::Star);
        assert!(matches!(
            select("SELECT VALUE x FROM t").projection,
            Projection::Value(_)
        ));

        let Projection::Items(items) = select("SELECT a, b AS c, d e, t.* FROM t").projection
        else {
            panic!("expected items");
        };
        assert_eq!(items.len(), 4);
        let aliases: Vec<_> = items
            .iter()
            .map(|item| match item {
                ProjectItem::Expr { alias, .. } => alias.as_ref().map(|a| a.node.to_string()),
                ProjectItem::All(_) => Some("*".to_string()),
            })
            .collect();
        assert_eq!(
            aliases,
            vec![None, Some("c".into()), Some("e".into()), Some("*".into())]
        );
        let ProjectItem::All(all) = &items[3] else {
            panic!("expected project_all");
        };
        assert!(matches!(all.kind, ExprKind::Identifier(ref id) if id.name == "t"));
    }

    #[test]
    fn distinct_select() {
        assert_eq!(
            select("SELECT DISTINCT a FROM t").quantifier,
            SetQuantifier::Distinct
        );
        assert_eq!(select("SELECT ALL a FROM t").quantifier, SetQuantifier::All);
    }

    #[test]
    fn every_clause_in_order() {
        let select = select(
            "SELECT a FROM t AS x AT i BY k LET x.b AS y WHERE y > 1 \
             GROUP PARTIAL BY a AS g GROUP AS grp HAVING COUNT(*) > 1 \
             ORDER BY a DESC NULLS LAST, b LIMIT 10 OFFSET 5",
        );
        let from = select.from.as_ref().unwrap();
        let scan = scan(from);
        assert_eq!(scan.as_alias.as_ref().map(|a| a.node.as_str()), Some("x"));
        assert_eq!(scan.at_alias.as_ref().map(|a| a.node.as_str()), Some("i"));
        assert_eq!(scan.by_alias.as_ref().map(|a| a.node.as_str()), Some("k"));
        assert_eq!(select.let_bindings.len(), 1);
        assert!(select.where_clause.is_some());

        let group = select.group_by.as_ref().unwrap();
        assert_eq!(group.strategy, GroupingStrategy::Partial);
        assert_eq!(group.keys[0].alias.as_ref().map(|a| a.node.as_str()), Some("g"));
        assert_eq!(group.group_as.as_ref().map(|a| a.node.as_str()), Some("grp"));

        assert!(select.having.is_some());
        assert_eq!(select.order_by.len(), 2);
        assert_eq!(select.order_by[0].ordering, Some(Ordering::Desc));
        assert_eq!(select.order_by[0].nulls, Some(NullsOrder::Last));
        assert_eq!(select.order_by[1].ordering, None);
        assert!(select.limit.is_some());
        assert!(select.offset.is_some());
    }

    #[test]
    fn clauses_out_of_order_are_rejected() {
        let Err(err) = parse_statement("SELECT a FROM t LIMIT 1 WHERE b") else {
            panic!("expected an error");
        };
        assert_eq!(err.code, codes::MISPLACED_CLAUSE);
        assert_eq!(err.token.as_deref(), Some("WHERE"));
    }

    #[test]
    fn joins_nest_to_the_left() {
        let select = select("SELECT * FROM a, b LEFT OUTER JOIN c ON b.id = c.id CROSS JOIN d");
        let Some(FromSource::Join(outer)) = &select.from else {
            panic!("expected a join");
        };
        assert_eq!(outer.kind, JoinKind::Inner);
        assert!(outer.condition.is_none());
        let FromSource::Join(middle) = outer.left.as_ref() else {
            panic!("expected a nested join");
        };
        assert_eq!(middle.kind, JoinKind::Left);
        assert!(middle.condition.is_some());
        let FromSource::Join(inner) = middle.left.as_ref() else {
            panic!("expected a nested join");
        };
        assert!(inner.implicit);
    }

    #[test]
    fn unpivot_source() {
        let select = select("SELECT k, v FROM UNPIVOT t AS v AT k");
        assert!(matches!(select.from, Some(FromSource::Unpivot(_))));
    }

    #[test]
    fn pivot_query() {
        let select = select("PIVOT v AT k FROM t");
        assert!(matches!(select.projection, Projection::Pivot { .. }));
        assert!(parse_expression("PIVOT v AT k").is_err());
    }

    #[test]
    fn union_applies_to_whole_query_blocks() {
        let expr = parse_expression("SELECT a FROM t WHERE x UNION SELECT b FROM u").unwrap();
        let ExprKind::SetOp(set_op) = expr.kind else {
            panic!("expected a set operation");
        };
        assert!(matches!(set_op.lhs.kind, ExprKind::Select(_)));
        assert!(matches!(set_op.rhs.kind, ExprKind::Select(_)));
    }

    #[test]
    fn graph_match_in_from() {
        let select = select("SELECT a, b FROM g MATCH (a:A) -[e:E]-> (b:B)");
        let from = select.from.unwrap();
        let ExprKind::GraphMatch(graph) = &scan(&from).expr.kind else {
            panic!("expected a graph match");
        };
        assert_eq!(graph.patterns.len(), 1);
        assert_eq!(graph.patterns[0].parts.len(), 3);
    }

    #[test]
    fn comma_after_match_is_a_join_unless_a_pattern_follows() {
        let select = select("SELECT * FROM g MATCH (a) -> (b), t AS x");
        assert!(matches!(select.from, Some(FromSource::Join(_))));

        let Err(err) = parse_statement("SELECT a FROM g MATCH (a) -> (b), (a) -> (c)") else {
            panic!("expected an error");
        };
        assert_eq!(err.code, codes::INVALID_PATTERN);
    }

    #[test]
    fn renders_select_as_sexp() {
        let expr = parse_expression("SELECT x.a AS b FROM t AS x WHERE x.c LIMIT 1").unwrap();
        assert_eq!(
            to_sexp(&expr),
            "(select (project_list (project_expr (path (id x (case_insensitive) (unqualified)) \
             (path_expr (lit 'a') (case_insensitive))) b)) \
             (from (scan (id t (case_insensitive) (unqualified)) (as x))) \
             (where (path (id x (case_insensitive) (unqualified)) \
             (path_expr (lit 'c') (case_insensitive)))) (limit (lit 1)))"
        );
    }
}
