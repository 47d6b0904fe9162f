//! Function calls and the special call syntaxes.

use super::QueryParser;
use super::precedence::infix_operator;
use crate::ast::{
    AggregateCall, AggregateFunction, CallExpr, CaseExpr, CastExpr, CastKind, CollectionKind,
    DateArithExpr, DateArithOp, DatePart, Expr, ExprKind, ExtractExpr, SetQuantifier,
    SubstringExpr, TrimExpr, TrimSpec, WhenBranch, WindowCall, WindowFunction, WindowSpec,
};
use crate::error::ParseResult;
use crate::lexer::keywords::ContextualKeyword;
use crate::lexer::token::TokenKind;

impl<'a> QueryParser<'a> {
    /// `name(args)`, or `LAG`/`LEAD` window calls.
    pub(crate) fn parse_call(&mut self) -> ParseResult<Expr> {
        let window = match self.stream.contextual_at(0) {
            Some(ContextualKeyword::Lag) => Some(WindowFunction::Lag),
            Some(ContextualKeyword::Lead) => Some(WindowFunction::Lead),
            _ => None,
        };
        if let Some(func) = window {
            return self.parse_window_call(func);
        }

        let start = self.stream.start();
        let name = self.stream.current().text.to_ascii_lowercase();
        self.stream.advance();
        self.stream.expect(TokenKind::LeftParen)?;
        let args = self.parse_expr_list(&TokenKind::RightParen)?;
        self.stream.expect(TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Call(CallExpr {
                name: name.into(),
                args,
            }),
            self.stream.span_from(start),
        ))
    }

    /// `LAG(expr [, offset [, default]]) OVER (...)`
    fn parse_window_call(&mut self, func: WindowFunction) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.advance();
        self.stream.expect(TokenKind::LeftParen)?;
        let args = self.parse_expr_list(&TokenKind::RightParen)?;
        if args.is_empty() || args.len() > 3 {
            return Err(self
                .stream
                .unexpected("between one and three window function arguments"));
        }
        self.stream.expect(TokenKind::RightParen)?;

        if !self.stream.consume_contextual(ContextualKeyword::Over) {
            return Err(self.stream.unexpected("OVER"));
        }
        self.stream.expect(TokenKind::LeftParen)?;
        let mut over = WindowSpec::default();
        if self.stream.consume_contextual(ContextualKeyword::Partition) {
            self.stream.expect(TokenKind::By)?;
            loop {
                over.partition_by.push(self.parse_expr()?);
                if !self.stream.consume(&TokenKind::Comma) {
                    break;
                }
            }
        }
        if self.stream.consume(&TokenKind::Order) {
            self.stream.expect(TokenKind::By)?;
            over.order_by = self.parse_sort_specs()?;
        }
        self.stream.expect(TokenKind::RightParen)?;

        Ok(Expr::new(
            ExprKind::Window(WindowCall { func, args, over }),
            self.stream.span_from(start),
        ))
    }

    /// `COUNT(*)` or `AGG([DISTINCT | ALL] expr)`.
    pub(crate) fn parse_aggregate(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        let func = match self.stream.current().kind {
            TokenKind::Count => AggregateFunction::Count,
            TokenKind::Sum => AggregateFunction::Sum,
            TokenKind::Avg => AggregateFunction::Avg,
            TokenKind::Min => AggregateFunction::Min,
            TokenKind::Max => AggregateFunction::Max,
            TokenKind::Every => AggregateFunction::Every,
            TokenKind::Any => AggregateFunction::Any,
            TokenKind::Some => AggregateFunction::Some,
            _ => return Err(self.stream.unexpected("an aggregate function")),
        };
        self.stream.advance();
        self.stream.expect(TokenKind::LeftParen)?;

        if func == AggregateFunction::Count
            && self.stream.check(&TokenKind::Star)
            && self.stream.peek().kind == TokenKind::RightParen
        {
            self.stream.advance();
            self.stream.advance();
            return Ok(Expr::new(
                ExprKind::Aggregate(AggregateCall {
                    func,
                    quantifier: SetQuantifier::All,
                    arg: None,
                }),
                self.stream.span_from(start),
            ));
        }

        let quantifier = if self.stream.consume(&TokenKind::Distinct) {
            SetQuantifier::Distinct
        } else {
            self.stream.consume(&TokenKind::All);
            SetQuantifier::All
        };
        let arg = self.parse_expr()?;
        self.stream.expect(TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Aggregate(AggregateCall {
                func,
                quantifier,
                arg: Some(Box::new(arg)),
            }),
            self.stream.span_from(start),
        ))
    }

    /// `CASE [operand] WHEN .. THEN .. [ELSE ..] END`
    pub(crate) fn parse_case(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::Case)?;
        let operand = if self.stream.check(&TokenKind::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut branches = Vec::new();
        while self.stream.consume(&TokenKind::When) {
            let condition = self.parse_expr()?;
            self.stream.expect(TokenKind::Then)?;
            let result = self.parse_expr()?;
            branches.push(WhenBranch { condition, result });
        }
        if branches.is_empty() {
            return Err(self.stream.unexpected("WHEN"));
        }

        let else_result = if self.stream.consume(&TokenKind::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.stream.expect(TokenKind::End)?;

        Ok(Expr::new(
            ExprKind::Case(CaseExpr {
                operand,
                branches,
                else_result,
            }),
            self.stream.span_from(start),
        ))
    }

    /// `CAST(expr AS type)` and its `CAN_CAST`/`CAN_LOSSLESS_CAST` forms.
    pub(crate) fn parse_cast(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        let kind = match self.stream.current().kind {
            TokenKind::CanCast => CastKind::CanCast,
            TokenKind::CanLosslessCast => CastKind::CanLosslessCast,
            _ => CastKind::Cast,
        };
        self.stream.advance();
        self.stream.expect(TokenKind::LeftParen)?;
        let value = self.parse_expr()?;
        self.stream.expect(TokenKind::As)?;
        let ty = self.parse_type()?;
        self.stream.expect(TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Cast(CastExpr {
                kind,
                value: Box::new(value),
                ty,
            }),
            self.stream.span_from(start),
        ))
    }

    /// `SUBSTRING(value FROM start [FOR length])` or
    /// `SUBSTRING(value, start [, length])`.
    pub(crate) fn parse_substring(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::Substring)?;
        self.stream.expect(TokenKind::LeftParen)?;
        let value = self.parse_expr()?;

        let (from, length_marker) = if self.stream.consume(&TokenKind::From) {
            (self.parse_expr()?, TokenKind::For)
        } else if self.stream.consume(&TokenKind::Comma) {
            (self.parse_expr()?, TokenKind::Comma)
        } else {
            return Err(self.stream.unexpected("FROM or `,`"));
        };
        let length = if self.stream.consume(&length_marker) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.stream.expect(TokenKind::RightParen)?;

        Ok(Expr::new(
            ExprKind::Substring(SubstringExpr {
                value: Box::new(value),
                start: Box::new(from),
                length,
            }),
            self.stream.span_from(start),
        ))
    }

    /// `TRIM([BOTH | LEADING | TRAILING] [remove] FROM source)` or
    /// `TRIM(source)`.
    ///
    /// A specification word is only taken as such when it cannot be the
    /// start of an expression, so `TRIM(both)` trims a column named `both`.
    pub(crate) fn parse_trim(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::Trim)?;
        self.stream.expect(TokenKind::LeftParen)?;

        let spec = match self.stream.contextual_at(0) {
            Some(ContextualKeyword::Both) => Some(TrimSpec::Both),
            Some(ContextualKeyword::Leading) => Some(TrimSpec::Leading),
            Some(ContextualKeyword::Trailing) => Some(TrimSpec::Trailing),
            _ => None,
        };
        let spec = spec.filter(|_| {
            let next = &self.stream.peek().kind;
            !matches!(
                next,
                TokenKind::RightParen | TokenKind::Dot | TokenKind::LeftBracket
            ) && infix_operator(next).is_none()
        });
        if spec.is_some() {
            self.stream.advance();
        }

        let (remove, source) = if spec.is_some() && self.stream.consume(&TokenKind::From) {
            (None, self.parse_expr()?)
        } else {
            let first = self.parse_expr()?;
            if self.stream.consume(&TokenKind::From) {
                (Some(Box::new(first)), self.parse_expr()?)
            } else if spec.is_some() {
                return Err(self.stream.unexpected("FROM"));
            } else {
                (None, first)
            }
        };
        self.stream.expect(TokenKind::RightParen)?;

        Ok(Expr::new(
            ExprKind::Trim(TrimExpr {
                spec,
                remove,
                source: Box::new(source),
            }),
            self.stream.span_from(start),
        ))
    }

    /// `EXTRACT(part FROM source)`
    pub(crate) fn parse_extract(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        self.stream.expect(TokenKind::Extract)?;
        self.stream.expect(TokenKind::LeftParen)?;
        let part = self.parse_date_part()?;
        self.stream.expect(TokenKind::From)?;
        let source = self.parse_expr()?;
        self.stream.expect(TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Extract(ExtractExpr {
                part,
                source: Box::new(source),
            }),
            self.stream.span_from(start),
        ))
    }

    /// `DATE_ADD(part, quantity, value)` / `DATE_DIFF(part, from, to)`
    pub(crate) fn parse_date_arith(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        let op = if self.stream.consume(&TokenKind::DateAdd) {
            DateArithOp::Add
        } else {
            self.stream.expect(TokenKind::DateDiff)?;
            DateArithOp::Diff
        };
        self.stream.expect(TokenKind::LeftParen)?;
        let part = self.parse_date_part()?;
        self.stream.expect(TokenKind::Comma)?;
        let lhs = self.parse_expr()?;
        self.stream.expect(TokenKind::Comma)?;
        let rhs = self.parse_expr()?;
        self.stream.expect(TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::DateArith(DateArithExpr {
                op,
                part,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
            self.stream.span_from(start),
        ))
    }

    fn parse_date_part(&mut self) -> ParseResult<DatePart> {
        let part = match self.stream.contextual_at(0) {
            Some(ContextualKeyword::Year) => DatePart::Year,
            Some(ContextualKeyword::Month) => DatePart::Month,
            Some(ContextualKeyword::Day) => DatePart::Day,
            Some(ContextualKeyword::Hour) => DatePart::Hour,
            Some(ContextualKeyword::Minute) => DatePart::Minute,
            Some(ContextualKeyword::Second) => DatePart::Second,
            Some(ContextualKeyword::TimezoneHour) => DatePart::TimezoneHour,
            Some(ContextualKeyword::TimezoneMinute) => DatePart::TimezoneMinute,
            _ => return Err(self.stream.unexpected("a datetime part such as YEAR or DAY")),
        };
        self.stream.advance();
        Ok(part)
    }

    /// `LIST(..)`, `BAG(..)` and `SEXP(..)`.
    pub(crate) fn parse_collection_call(&mut self) -> ParseResult<Expr> {
        let start = self.stream.start();
        let kind = match self.stream.current().kind {
            TokenKind::Bag => CollectionKind::Bag,
            TokenKind::Sexp => CollectionKind::Sexp,
            _ => CollectionKind::List,
        };
        self.stream.advance();
        self.stream.expect(TokenKind::LeftParen)?;
        let items = self.parse_expr_list(&TokenKind::RightParen)?;
        self.stream.expect(TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Collection(kind, items),
            self.stream.span_from(start),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::parse_expression;

    fn kind(source: &str) -> ExprKind {
        parse_expression(source)
            .unwrap_or_else(|err| panic!("parse failed for {source:?}: {err}"))
            .kind
    }

    #[test]
    fn ordinary_calls_lowercase_their_name() {
        let ExprKind::Call(call) = kind("COALESCE(a, NULL, 1)") else {
            panic!("expected a call");
        };
        assert_eq!(call.name, "coalesce");
        assert_eq!(call.args.len(), 3);

        let ExprKind::Call(call) = kind("now()") else {
            panic!("expected a call");
        };
        assert!(call.args.is_empty());
    }

    #[test]
    fn count_star_and_distinct_aggregates() {
        let ExprKind::Aggregate(count) = kind("COUNT(*)") else {
            panic!("expected aggregate");
        };
        assert_eq!(count.func, AggregateFunction::Count);
        assert!(count.arg.is_none());

        let ExprKind::Aggregate(sum) = kind("sum(DISTINCT x)") else {
            panic!("expected aggregate");
        };
        assert_eq!(sum.quantifier, SetQuantifier::Distinct);
        assert!(sum.arg.is_some());
    }

    #[test]
    fn window_calls_need_over() {
        let ExprKind::Window(call) = kind("LAG(x, 1, 0) OVER (PARTITION BY a, b ORDER BY c DESC)")
        else {
            panic!("expected window call");
        };
        assert_eq!(call.func, WindowFunction::Lag);
        assert_eq!(call.args.len(), 3);
        assert_eq!(call.over.partition_by.len(), 2);
        assert_eq!(call.over.order_by[0].ordering, Some(Ordering::Desc));

        assert!(parse_expression("lead(x)").is_err());
        assert!(parse_expression("lag() OVER ()").is_err());
    }

    #[test]
    fn simple_and_searched_case() {
        let ExprKind::Case(simple) = kind("CASE x WHEN 1 THEN 'a' ELSE 'b' END") else {
            panic!("expected CASE");
        };
        assert!(simple.operand.is_some());
        assert!(simple.else_result.is_some());

        let ExprKind::Case(searched) = kind("CASE WHEN x > 1 THEN 'a' WHEN x > 0 THEN 'b' END")
        else {
            panic!("expected CASE");
        };
        assert!(searched.operand.is_none());
        assert_eq!(searched.branches.len(), 2);
        assert!(parse_expression("CASE x END").is_err());
    }

    #[test]
    fn cast_family() {
        let ExprKind::Cast(cast) = kind("CAN_LOSSLESS_CAST(x AS DECIMAL(5, 2))") else {
            panic!("expected cast");
        };
        assert_eq!(cast.kind, CastKind::CanLosslessCast);
        assert_eq!(
            cast.ty,
            Type::Decimal {
                precision: Some(5),
                scale: Some(2)
            }
        );
    }

    #[test]
    fn substring_forms_agree() {
        let ExprKind::Substring(keyword) = kind("SUBSTRING(s FROM 2 FOR 3)") else {
            panic!("expected substring");
        };
        let ExprKind::Substring(comma) = kind("SUBSTRING(s, 2, 3)") else {
            panic!("expected substring");
        };
        assert_eq!(keyword.length.is_some(), comma.length.is_some());
        assert!(parse_expression("SUBSTRING(s 2)").is_err());
    }

    #[test]
    fn trim_specification_is_contextual() {
        let ExprKind::Trim(trim) = kind("TRIM(LEADING 'x' FROM s)") else {
            panic!("expected trim");
        };
        assert_eq!(trim.spec, Some(TrimSpec::Leading));
        assert!(trim.remove.is_some());

        let ExprKind::Trim(trim) = kind("TRIM(BOTH FROM s)") else {
            panic!("expected trim");
        };
        assert_eq!(trim.spec, Some(TrimSpec::Both));
        assert!(trim.remove.is_none());

        let ExprKind::Trim(trim) = kind("TRIM(both)") else {
            panic!("expected trim");
        };
        assert_eq!(trim.spec, None);
        assert!(matches!(trim.source.kind, ExprKind::Identifier(ref id) if id.name == "both"));

        let ExprKind::Trim(trim) = kind("TRIM(both || 'x')") else {
            panic!("expected trim");
        };
        assert_eq!(trim.spec, None);
    }

    #[test]
    fn extract_and_date_arithmetic() {
        let ExprKind::Extract(extract) = kind("EXTRACT(timezone_hour FROM t)") else {
            panic!("expected extract");
        };
        assert_eq!(extract.part, DatePart::TimezoneHour);

        let ExprKind::DateArith(add) = kind("DATE_ADD(day, 1, d)") else {
            panic!("expected date_add");
        };
        assert_eq!(add.op, DateArithOp::Add);
        assert_eq!(add.part, DatePart::Day);
        assert!(parse_expression("DATE_DIFF(fortnight, a, b)").is_err());
    }
}
