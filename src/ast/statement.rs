//! Statement nodes: queries, DML, DDL and procedure calls.

use super::expression::{Expr, Identifier, SetQuantifier};
use crate::ast::{Span, Spanned};
use smol_str::SmolStr;

/// The root of a parsed statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// Any expression, typically `SELECT`, a set operation or `VALUES`.
    Query(Expr),
    Dml(DmlStatement),
    Ddl(DdlStatement),
    Exec(ExecStatement),
}

impl Statement {
    /// Short name of the statement family, for logging.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StatementKind::Query(_) => "query",
            StatementKind::Dml(_) => "dml",
            StatementKind::Ddl(_) => "ddl",
            StatementKind::Exec(_) => "exec",
        }
    }
}

/// A `SELECT` or `PIVOT` query block.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub quantifier: SetQuantifier,
    pub projection: Projection,
    pub from: Option<FromSource>,
    pub let_bindings: Vec<LetBinding>,
    pub where_clause: Option<Expr>,
    pub group_by: Option<GroupBy>,
    pub having: Option<Expr>,
    pub order_by: Vec<SortSpec>,
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `SELECT *`
    Star,
    /// `SELECT a, b AS c, t.*`
    Items(Vec<ProjectItem>),
    /// `SELECT VALUE expr`
    Value(Expr),
    /// `PIVOT value AT key`
    Pivot { value: Expr, key: Expr },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProjectItem {
    /// `expr.*`: every field of `expr`.
    All(Expr),
    Expr {
        expr: Expr,
        alias: Option<Spanned<SmolStr>>,
    },
}

/// `LET expr AS name`
#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub expr: Expr,
    pub name: Spanned<SmolStr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupingStrategy {
    Full,
    Partial,
}

/// `GROUP [PARTIAL] BY key [AS alias], ... [GROUP AS name]`
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBy {
    pub strategy: GroupingStrategy,
    pub keys: Vec<GroupKey>,
    pub group_as: Option<Spanned<SmolStr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupKey {
    pub expr: Expr,
    pub alias: Option<Spanned<SmolStr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ordering {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

/// One `ORDER BY` item.
#[derive(Debug, Clone, PartialEq)]
pub struct SortSpec {
    pub expr: Expr,
    pub ordering: Option<Ordering>,
    pub nulls: Option<NullsOrder>,
}

/// An item of a `FROM` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FromSource {
    Scan(Scan),
    /// `UNPIVOT expr AS v AT k`
    Unpivot(Scan),
    Join(Join),
}

impl FromSource {
    pub fn span(&self) -> &Span {
        match self {
            FromSource::Scan(scan) | FromSource::Unpivot(scan) => &scan.span,
            FromSource::Join(join) => &join.span,
        }
    }
}

/// `expr [AS] alias [AT position] [BY key]`
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    pub expr: Expr,
    pub as_alias: Option<Spanned<SmolStr>>,
    pub at_alias: Option<Spanned<SmolStr>>,
    pub by_alias: Option<Spanned<SmolStr>>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

/// A join of two sources. Chained joins nest to the left.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    /// True for the comma form `FROM a, b`.
    pub implicit: bool,
    pub left: Box<FromSource>,
    pub right: Box<FromSource>,
    pub condition: Option<Expr>,
    pub span: Span,
}

/// A data manipulation statement: an optional `FROM ... WHERE` source
/// feeding one or more operations.
#[derive(Debug, Clone, PartialEq)]
pub struct DmlStatement {
    pub from: Option<FromSource>,
    pub where_clause: Option<Expr>,
    pub operations: Vec<DmlOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DmlOp {
    /// `INSERT INTO target <query>`
    Insert { target: Expr, values: Expr },
    /// `INSERT INTO target VALUE value [AT position]`
    InsertValue {
        target: Expr,
        value: Expr,
        position: Option<Expr>,
    },
    /// `SET target = value, ...`
    Set(Vec<Assignment>),
    /// `REMOVE target`
    Remove(Expr),
    /// `DELETE` (the source rows of the enclosing statement)
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub target: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DdlStatement {
    CreateTable { name: Identifier },
    DropTable { name: Identifier },
    /// `CREATE INDEX ON table (key, ...)`
    CreateIndex { table: Identifier, keys: Vec<Expr> },
    /// `DROP INDEX index ON table`
    DropIndex { index: Identifier, table: Identifier },
}

/// `EXEC procedure arg, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct ExecStatement {
    pub procedure: SmolStr,
    pub args: Vec<Expr>,
}
