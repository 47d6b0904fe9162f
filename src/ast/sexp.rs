//! Span-free s-expression rendering of the AST.
//!
//! Two trees that differ only in source positions render identically, so
//! the output doubles as a structural-equality key.
//!
//! ```
//! use partiql_syntax::{ast::sexp::to_sexp, parse_expression};
//!
//! let expr = parse_expression("a + 1").unwrap();
//! assert_eq!(
//!     to_sexp(&expr),
//!     "(plus (id a (case_insensitive) (unqualified)) (lit 1))"
//! );
//! ```

use super::expression::*;
use super::pattern::*;
use super::statement::*;
use super::types::Type;
use crate::value::Value;

/// Nodes that can be written as an s-expression.
pub trait ToSexp {
    fn write_sexp(&self, out: &mut String);
}

/// Renders `node` as an s-expression.
pub fn to_sexp<T: ToSexp + ?Sized>(node: &T) -> String {
    let mut out = String::new();
    node.write_sexp(&mut out);
    out
}

/// Writes `(tag item ...)` incrementally.
struct List<'o> {
    out: &'o mut String,
}

impl<'o> List<'o> {
    fn new(out: &'o mut String, tag: &str) -> Self {
        out.push('(');
        out.push_str(tag);
        Self { out }
    }

    fn atom(&mut self, text: &str) -> &mut Self {
        self.out.push(' ');
        self.out.push_str(text);
        self
    }

    fn node<T: ToSexp + ?Sized>(&mut self, node: &T) -> &mut Self {
        self.out.push(' ');
        node.write_sexp(self.out);
        self
    }

    fn nodes<'n, T: ToSexp + 'n>(&mut self, nodes: impl IntoIterator<Item = &'n T>) -> &mut Self {
        for node in nodes {
            self.node(node);
        }
        self
    }

    fn opt<T: ToSexp + ?Sized>(&mut self, node: Option<&T>) -> &mut Self {
        if let Some(node) = node {
            self.node(node);
        }
        self
    }

    /// `(tag child)` when `child` is present.
    fn tagged<T: ToSexp + ?Sized>(&mut self, tag: &str, child: Option<&T>) -> &mut Self {
        if let Some(child) = child {
            self.out.push(' ');
            List::new(self.out, tag).node(child).finish();
        }
        self
    }

    /// `(tag symbol)` when `name` is present.
    fn named(&mut self, tag: &str, name: Option<&str>) -> &mut Self {
        if let Some(name) = name {
            self.out.push(' ');
            List::new(self.out, tag).atom(&symbol(name)).finish();
        }
        self
    }

    fn finish(&mut self) {
        self.out.push(')');
    }
}

fn symbol(text: &str) -> String {
    let plain = text
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if plain {
        text.to_string()
    } else {
        format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

impl<T: ToSexp + ?Sized> ToSexp for Box<T> {
    fn write_sexp(&self, out: &mut String) {
        (**self).write_sexp(out);
    }
}

impl ToSexp for Value {
    fn write_sexp(&self, out: &mut String) {
        match self {
            Value::Missing => out.push_str("(missing)"),
            value => List::new(out, "lit").atom(&value.to_string()).finish(),
        }
    }
}

impl ToSexp for Identifier {
    fn write_sexp(&self, out: &mut String) {
        List::new(out, "id")
            .atom(&symbol(&self.name))
            .atom(case_tag(self.case))
            .atom(match self.qualifier {
                ScopeQualifier::Unqualified => "(unqualified)",
                ScopeQualifier::LocalsFirst => "(locals_first)",
            })
            .finish();
    }
}

fn case_tag(case: CaseSensitivity) -> &'static str {
    match case {
        CaseSensitivity::Sensitive => "(case_sensitive)",
        CaseSensitivity::Insensitive => "(case_insensitive)",
    }
}

fn binary_tag(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Or => "or",
        BinaryOp::And => "and",
        BinaryOp::Eq => "eq",
        BinaryOp::Ne => "ne",
        BinaryOp::Lt => "lt",
        BinaryOp::Le => "lte",
        BinaryOp::Gt => "gt",
        BinaryOp::Ge => "gte",
        BinaryOp::Add => "plus",
        BinaryOp::Sub => "minus",
        BinaryOp::Concat => "concat",
        BinaryOp::Mul => "times",
        BinaryOp::Div => "divide",
        BinaryOp::Mod => "modulo",
    }
}

fn quantifier_tag(quantifier: SetQuantifier) -> &'static str {
    match quantifier {
        SetQuantifier::All => "all",
        SetQuantifier::Distinct => "distinct",
    }
}

/// Writes `(not inner)` around `inner` when `negated`.
fn negatable(out: &mut String, negated: bool, inner: impl FnOnce(&mut String)) {
    if negated {
        out.push_str("(not ");
        inner(out);
        out.push(')');
    } else {
        inner(out);
    }
}

impl ToSexp for Expr {
    fn write_sexp(&self, out: &mut String) {
        match &self.kind {
            ExprKind::Literal(value) => value.write_sexp(out),
            ExprKind::Identifier(id) => id.write_sexp(out),
            ExprKind::Parameter(index) => {
                List::new(out, "parameter").atom(&index.to_string()).finish();
            }
            ExprKind::Path(path) => {
                let mut list = List::new(out, "path");
                list.node(&path.root);
                for step in &path.steps {
                    list.node(step);
                }
                list.finish();
            }
            ExprKind::Call(call) => {
                List::new(out, "call")
                    .atom(&symbol(&call.name))
                    .nodes(&call.args)
                    .finish();
            }
            ExprKind::Aggregate(agg) => match &agg.arg {
                None => List::new(out, "call_agg_wildcard")
                    .atom(agg.func.name())
                    .finish(),
                Some(arg) => List::new(out, "call_agg")
                    .atom(agg.func.name())
                    .atom(quantifier_tag(agg.quantifier))
                    .node(arg)
                    .finish(),
            },
            ExprKind::Window(call) => {
                let mut list = List::new(out, "call_window");
                list.atom(match call.func {
                    WindowFunction::Lag => "lag",
                    WindowFunction::Lead => "lead",
                });
                list.node(&call.over).nodes(&call.args).finish();
            }
            ExprKind::Unary(op, operand) => {
                let tag = match op {
                    UnaryOp::Plus => "pos",
                    UnaryOp::Minus => "neg",
                    UnaryOp::Not => "not",
                };
                List::new(out, tag).node(operand).finish();
            }
            ExprKind::Binary(op, lhs, rhs) => {
                List::new(out, binary_tag(*op)).node(lhs).node(rhs).finish();
            }
            ExprKind::Like(like) => negatable(out, like.negated, |out| {
                List::new(out, "like")
                    .node(&like.value)
                    .node(&like.pattern)
                    .opt(like.escape.as_deref())
                    .finish();
            }),
            ExprKind::Between(between) => negatable(out, between.negated, |out| {
                List::new(out, "between")
                    .node(&between.value)
                    .node(&between.low)
                    .node(&between.high)
                    .finish();
            }),
            ExprKind::In(in_expr) => negatable(out, in_expr.negated, |out| {
                List::new(out, "in_collection")
                    .node(&in_expr.value)
                    .node(&in_expr.collection)
                    .finish();
            }),
            ExprKind::IsType(is) => negatable(out, is.negated, |out| {
                List::new(out, "is_type")
                    .node(&is.value)
                    .node(&is.ty)
                    .finish();
            }),
            ExprKind::SetOp(set_op) => {
                let op = match (set_op.outer, set_op.op) {
                    (false, SetOperator::Union) => "(union)",
                    (false, SetOperator::Except) => "(except)",
                    (false, SetOperator::Intersect) => "(intersect)",
                    (true, SetOperator::Union) => "(outer_union)",
                    (true, SetOperator::Except) => "(outer_except)",
                    (true, SetOperator::Intersect) => "(outer_intersect)",
                };
                let quantifier = match set_op.quantifier {
                    SetQuantifier::All => "(all)",
                    SetQuantifier::Distinct => "(distinct)",
                };
                List::new(out, "bag_op")
                    .atom(op)
                    .atom(quantifier)
                    .node(&set_op.lhs)
                    .node(&set_op.rhs)
                    .finish();
            }
            ExprKind::Case(case) => {
                let mut list = match &case.operand {
                    Some(operand) => {
                        let mut list = List::new(out, "simple_case");
                        list.node(operand);
                        list
                    }
                    None => List::new(out, "searched_case"),
                };
                list.out.push_str(" (expr_pair_list");
                for branch in &case.branches {
                    list.out.push(' ');
                    List::new(list.out, "expr_pair")
                        .node(&branch.condition)
                        .node(&branch.result)
                        .finish();
                }
                list.out.push(')');
                list.tagged("else", case.else_result.as_deref()).finish();
            }
            ExprKind::Cast(cast) => {
                let tag = match cast.kind {
                    CastKind::Cast => "cast",
                    CastKind::CanCast => "can_cast",
                    CastKind::CanLosslessCast => "can_lossless_cast",
                };
                List::new(out, tag).node(&cast.value).node(&cast.ty).finish();
            }
            ExprKind::Substring(sub) => {
                List::new(out, "substring")
                    .node(&sub.value)
                    .node(&sub.start)
                    .opt(sub.length.as_deref())
                    .finish();
            }
            ExprKind::Trim(trim) => {
                let mut list = List::new(out, "trim");
                if let Some(spec) = trim.spec {
                    list.atom(match spec {
                        TrimSpec::Both => "both",
                        TrimSpec::Leading => "leading",
                        TrimSpec::Trailing => "trailing",
                    });
                }
                list.opt(trim.remove.as_deref()).node(&trim.source).finish();
            }
            ExprKind::Extract(extract) => {
                List::new(out, "extract")
                    .atom(extract.part.name())
                    .node(&extract.source)
                    .finish();
            }
            ExprKind::DateArith(arith) => {
                let tag = match arith.op {
                    DateArithOp::Add => "date_add",
                    DateArithOp::Diff => "date_diff",
                };
                List::new(out, tag)
                    .atom(arith.part.name())
                    .node(&arith.lhs)
                    .node(&arith.rhs)
                    .finish();
            }
            ExprKind::Collection(kind, items) => {
                let tag = match kind {
                    CollectionKind::List => "list",
                    CollectionKind::Bag => "bag",
                    CollectionKind::Sexp => "sexp",
                };
                List::new(out, tag).nodes(items).finish();
            }
            ExprKind::Struct(fields) => {
                let mut list = List::new(out, "struct");
                for field in fields {
                    list.out.push(' ');
                    List::new(list.out, "expr_pair")
                        .node(&field.key)
                        .node(&field.value)
                        .finish();
                }
                list.finish();
            }
            ExprKind::Select(select) => select.write_sexp(out),
            ExprKind::GraphMatch(graph) => graph.write_sexp(out),
        }
    }
}

impl ToSexp for PathStep {
    fn write_sexp(&self, out: &mut String) {
        match self {
            PathStep::Field { name, case } => {
                List::new(out, "path_expr")
                    .node(&Value::String(name.clone()))
                    .atom(case_tag(*case))
                    .finish();
            }
            PathStep::Index(index) => {
                List::new(out, "path_expr")
                    .node(index)
                    .atom(case_tag(CaseSensitivity::Sensitive))
                    .finish();
            }
            PathStep::Wildcard => out.push_str("(path_wildcard)"),
            PathStep::Unpivot => out.push_str("(path_unpivot)"),
        }
    }
}

impl ToSexp for WindowSpec {
    fn write_sexp(&self, out: &mut String) {
        let mut list = List::new(out, "over");
        if !self.partition_by.is_empty() {
            list.out.push(' ');
            List::new(list.out, "partition_by")
                .nodes(&self.partition_by)
                .finish();
        }
        if !self.order_by.is_empty() {
            list.out.push(' ');
            List::new(list.out, "order_by").nodes(&self.order_by).finish();
        }
        list.finish();
    }
}

impl ToSexp for Type {
    fn write_sexp(&self, out: &mut String) {
        let simple = |out: &mut String, tag: &str| out.push_str(&format!("({tag})"));
        let sized = |out: &mut String, tag: &str, params: &[Option<u32>]| {
            let mut list = List::new(out, tag);
            for param in params.iter().flatten() {
                list.atom(&param.to_string());
            }
            list.finish();
        };
        match self {
            Type::Null => simple(out, "null_type"),
            Type::Missing => simple(out, "missing_type"),
            Type::Any => simple(out, "any_type"),
            Type::Boolean => simple(out, "boolean_type"),
            Type::Smallint => simple(out, "smallint_type"),
            Type::Integer4 => simple(out, "integer4_type"),
            Type::Integer8 => simple(out, "integer8_type"),
            Type::Integer => simple(out, "integer_type"),
            Type::Float(precision) => sized(out, "float_type", &[*precision]),
            Type::Real => simple(out, "real_type"),
            Type::DoublePrecision => simple(out, "double_precision_type"),
            Type::Decimal { precision, scale } => {
                sized(out, "decimal_type", &[*precision, *scale]);
            }
            Type::Numeric { precision, scale } => {
                sized(out, "numeric_type", &[*precision, *scale]);
            }
            Type::Char(length) => sized(out, "character_type", &[*length]),
            Type::Varchar(length) => sized(out, "character_varying_type", &[*length]),
            Type::String => simple(out, "string_type"),
            Type::Symbol => simple(out, "symbol_type"),
            Type::Clob => simple(out, "clob_type"),
            Type::Blob => simple(out, "blob_type"),
            Type::Date => simple(out, "date_type"),
            Type::Time {
                precision,
                with_time_zone,
            } => {
                let tag = if *with_time_zone {
                    "time_with_time_zone_type"
                } else {
                    "time_type"
                };
                sized(out, tag, &[*precision]);
            }
            Type::Timestamp(precision) => sized(out, "timestamp_type", &[*precision]),
            Type::Struct => simple(out, "struct_type"),
            Type::Tuple => simple(out, "tuple_type"),
            Type::List => simple(out, "list_type"),
            Type::Bag => simple(out, "bag_type"),
            Type::Sexp => simple(out, "sexp_type"),
            Type::Custom(name) => List::new(out, "custom_type").atom(&symbol(name)).finish(),
        }
    }
}

impl ToSexp for SortSpec {
    fn write_sexp(&self, out: &mut String) {
        let mut list = List::new(out, "sort_spec");
        list.node(&self.expr);
        match self.ordering {
            Some(Ordering::Asc) => {
                list.atom("(asc)");
            }
            Some(Ordering::Desc) => {
                list.atom("(desc)");
            }
            None => {}
        }
        match self.nulls {
            Some(NullsOrder::First) => {
                list.atom("(nulls_first)");
            }
            Some(NullsOrder::Last) => {
                list.atom("(nulls_last)");
            }
            None => {}
        }
        list.finish();
    }
}

impl ToSexp for Select {
    fn write_sexp(&self, out: &mut String) {
        let mut list = List::new(out, "select");
        if self.quantifier == SetQuantifier::Distinct {
            list.atom("(distinct)");
        }
        list.node(&self.projection);
        list.tagged("from", self.from.as_ref());
        if !self.let_bindings.is_empty() {
            list.out.push(' ');
            let mut bindings = List::new(list.out, "let");
            for binding in &self.let_bindings {
                bindings.out.push(' ');
                List::new(bindings.out, "let_binding")
                    .node(&binding.expr)
                    .atom(&symbol(&binding.name.node))
                    .finish();
            }
            bindings.finish();
        }
        list.tagged("where", self.where_clause.as_ref());
        list.opt(self.group_by.as_ref());
        list.tagged("having", self.having.as_ref());
        if !self.order_by.is_empty() {
            list.out.push(' ');
            List::new(list.out, "order_by").nodes(&self.order_by).finish();
        }
        list.tagged("limit", self.limit.as_ref())
            .tagged("offset", self.offset.as_ref())
            .finish();
    }
}

impl ToSexp for Projection {
    fn write_sexp(&self, out: &mut String) {
        match self {
            Projection::Star => out.push_str("(project_star)"),
            Projection::Value(expr) => List::new(out, "project_value").node(expr).finish(),
            Projection::Pivot { value, key } => {
                List::new(out, "project_pivot").node(value).node(key).finish();
            }
            Projection::Items(items) => {
                let mut list = List::new(out, "project_list");
                for item in items {
                    list.out.push(' ');
                    match item {
                        ProjectItem::All(expr) => {
                            List::new(list.out, "project_all").node(expr).finish();
                        }
                        ProjectItem::Expr { expr, alias } => {
                            let mut project = List::new(list.out, "project_expr");
                            project.node(expr);
                            if let Some(alias) = alias {
                                project.atom(&symbol(&alias.node));
                            }
                            project.finish();
                        }
                    }
                }
                list.finish();
            }
        }
    }
}

impl ToSexp for GroupBy {
    fn write_sexp(&self, out: &mut String) {
        let mut list = List::new(out, "group");
        list.atom(match self.strategy {
            GroupingStrategy::Full => "(by full)",
            GroupingStrategy::Partial => "(by partial)",
        });
        list.out.push_str(" (group_key_list");
        for key in &self.keys {
            list.out.push(' ');
            let mut item = List::new(list.out, "group_key");
            item.node(&key.expr);
            if let Some(alias) = &key.alias {
                item.atom(&symbol(&alias.node));
            }
            item.finish();
        }
        list.out.push(')');
        list.named("group_as", self.group_as.as_ref().map(|name| name.node.as_str()))
            .finish();
    }
}

impl ToSexp for FromSource {
    fn write_sexp(&self, out: &mut String) {
        match self {
            FromSource::Scan(scan) => write_scan(out, "scan", scan),
            FromSource::Unpivot(scan) => write_scan(out, "unpivot", scan),
            FromSource::Join(join) => {
                let kind = match join.kind {
                    JoinKind::Inner => "inner",
                    JoinKind::Left => "left",
                    JoinKind::Right => "right",
                    JoinKind::Full => "full",
                };
                List::new(out, "join")
                    .atom(kind)
                    .node(&join.left)
                    .node(&join.right)
                    .opt(join.condition.as_ref())
                    .finish();
            }
        }
    }
}

fn write_scan(out: &mut String, tag: &str, scan: &Scan) {
    let alias = |name: &Option<crate::ast::Spanned<smol_str::SmolStr>>| {
        name.as_ref().map(|name| name.node.to_string())
    };
    List::new(out, tag)
        .node(&scan.expr)
        .named("as", alias(&scan.as_alias).as_deref())
        .named("at", alias(&scan.at_alias).as_deref())
        .named("by", alias(&scan.by_alias).as_deref())
        .finish();
}

impl ToSexp for GraphMatchExpr {
    fn write_sexp(&self, out: &mut String) {
        let mut list = List::new(out, "graph_match");
        list.node(&self.source);
        list.out.push(' ');
        let mut gpml = List::new(list.out, "gpml_pattern");
        if let Some(selector) = self.selector {
            gpml.atom(&match selector {
                Selector::AnyShortest => "(selector any_shortest)".to_string(),
                Selector::AllShortest => "(selector all_shortest)".to_string(),
                Selector::Any => "(selector any)".to_string(),
                Selector::AnyK(k) => format!("(selector any {k})"),
                Selector::ShortestK(k) => format!("(selector shortest {k})"),
                Selector::ShortestKGroup(k) => format!("(selector shortest_group {k})"),
            });
        }
        gpml.nodes(&self.patterns).finish();
        list.finish();
    }
}

fn write_quantifier(list: &mut List<'_>, quantifier: Option<Quantifier>) {
    if let Some(Quantifier { lower, upper }) = quantifier {
        let upper = upper.map_or_else(|| "*".to_string(), |upper| upper.to_string());
        list.atom(&format!("(quantifier {lower} {upper})"));
    }
}

fn write_labels(list: &mut List<'_>, labels: &[smol_str::SmolStr]) {
    if !labels.is_empty() {
        let names: Vec<String> = labels.iter().map(|label| symbol(label)).collect();
        list.atom(&format!("(labels {})", names.join(" ")));
    }
}

impl ToSexp for GraphPattern {
    fn write_sexp(&self, out: &mut String) {
        let mut list = List::new(out, "match_pattern");
        if let Some(restrictor) = self.restrictor {
            list.atom(match restrictor {
                Restrictor::Trail => "(restrictor trail)",
                Restrictor::Acyclic => "(restrictor acyclic)",
                Restrictor::Simple => "(restrictor simple)",
            });
        }
        list.named("variable", self.variable.as_deref());
        list.tagged("where", self.prefilter.as_deref());
        write_quantifier(&mut list, self.quantifier);
        list.nodes(&self.parts).finish();
    }
}

impl ToSexp for PatternPart {
    fn write_sexp(&self, out: &mut String) {
        match self {
            PatternPart::Node(node) => {
                let mut list = List::new(out, "node");
                list.named("variable", node.variable.as_deref());
                write_labels(&mut list, &node.labels);
                list.tagged("where", node.prefilter.as_deref()).finish();
            }
            PatternPart::Edge(edge) => {
                let mut list = List::new(out, "edge");
                list.atom(edge.direction.name());
                write_quantifier(&mut list, edge.quantifier);
                list.named("variable", edge.variable.as_deref());
                write_labels(&mut list, &edge.labels);
                list.tagged("where", edge.prefilter.as_deref()).finish();
            }
            PatternPart::Pattern(pattern) => pattern.write_sexp(out),
        }
    }
}

impl ToSexp for Statement {
    fn write_sexp(&self, out: &mut String) {
        match &self.kind {
            StatementKind::Query(expr) => expr.write_sexp(out),
            StatementKind::Dml(dml) => dml.write_sexp(out),
            StatementKind::Ddl(ddl) => {
                let mut list = List::new(out, "ddl");
                list.out.push(' ');
                match ddl {
                    DdlStatement::CreateTable { name } => {
                        List::new(list.out, "create_table").node(name).finish();
                    }
                    DdlStatement::DropTable { name } => {
                        List::new(list.out, "drop_table").node(name).finish();
                    }
                    DdlStatement::CreateIndex { table, keys } => {
                        List::new(list.out, "create_index")
                            .node(table)
                            .nodes(keys)
                            .finish();
                    }
                    DdlStatement::DropIndex { index, table } => {
                        List::new(list.out, "drop_index")
                            .node(index)
                            .node(table)
                            .finish();
                    }
                }
                list.finish();
            }
            StatementKind::Exec(exec) => {
                List::new(out, "exec")
                    .atom(&symbol(&exec.procedure))
                    .nodes(&exec.args)
                    .finish();
            }
        }
    }
}

impl ToSexp for DmlStatement {
    fn write_sexp(&self, out: &mut String) {
        let mut list = List::new(out, "dml");
        list.out.push_str(" (operations");
        for op in &self.operations {
            list.out.push(' ');
            match op {
                DmlOp::Insert { target, values } => {
                    List::new(list.out, "insert").node(target).node(values).finish();
                }
                DmlOp::InsertValue {
                    target,
                    value,
                    position,
                } => {
                    List::new(list.out, "insert_value")
                        .node(target)
                        .node(value)
                        .opt(position.as_ref())
                        .finish();
                }
                DmlOp::Set(assignments) => {
                    let mut set = List::new(list.out, "set");
                    for assignment in assignments {
                        set.out.push(' ');
                        List::new(set.out, "assignment")
                            .node(&assignment.target)
                            .node(&assignment.value)
                            .finish();
                    }
                    set.finish();
                }
                DmlOp::Remove(target) => List::new(list.out, "remove").node(target).finish(),
                DmlOp::Delete => list.out.push_str("(delete)"),
            }
        }
        list.out.push(')');
        list.tagged("from", self.from.as_ref())
            .tagged("where", self.where_clause.as_ref())
            .finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> Expr {
        Expr::new(
            ExprKind::Identifier(Identifier {
                name: name.into(),
                case: CaseSensitivity::Insensitive,
                qualifier: ScopeQualifier::Unqualified,
            }),
            0..name.len(),
        )
    }

    #[test]
    fn spans_do_not_affect_output() {
        let a = Expr::new(
            ExprKind::Binary(BinaryOp::And, Box::new(id("a")), Box::new(id("b"))),
            0..7,
        );
        let mut b = a.clone();
        b.span = 10..20;
        assert_eq!(to_sexp(&a), to_sexp(&b));
        assert_eq!(
            to_sexp(&a),
            "(and (id a (case_insensitive) (unqualified)) (id b (case_insensitive) (unqualified)))"
        );
    }

    #[test]
    fn odd_names_are_quoted() {
        assert_eq!(symbol("plain_name"), "plain_name");
        assert_eq!(symbol("has space"), "'has space'");
        assert_eq!(symbol("it's"), "'it\\'s'");
        assert_eq!(symbol("1abc"), "'1abc'");
    }

    #[test]
    fn types_render_parameters() {
        assert_eq!(
            to_sexp(&Type::Decimal {
                precision: Some(10),
                scale: Some(2)
            }),
            "(decimal_type 10 2)"
        );
        assert_eq!(to_sexp(&Type::Varchar(None)), "(character_varying_type)");
        assert_eq!(to_sexp(&Type::Custom("rs_real".into())), "(custom_type rs_real)");
    }

    #[test]
    fn missing_and_literals() {
        assert_eq!(to_sexp(&Value::Missing), "(missing)");
        assert_eq!(to_sexp(&Value::String("x".into())), "(lit 'x')");
    }
}
