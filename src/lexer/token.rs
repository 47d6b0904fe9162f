//! Token kinds and positioned tokens.

use crate::ast::Span;
use smol_str::SmolStr;
use std::fmt;

/// The kind of a lexical token.
///
/// Reserved words get their own variant. Contextual keywords (`trail`,
/// `both`, `lag`, ...) are ordinary [`TokenKind::Identifier`]s and are
/// classified on demand through [`super::keywords::contextual_keyword`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Query clauses
    Select,
    From,
    Where,
    Group,
    Partial,
    By,
    Having,
    Order,
    Limit,
    Offset,
    Let,
    As,
    At,
    Pivot,
    Unpivot,
    Value,
    Values,
    Distinct,
    All,
    Any,
    Some,
    Asc,
    Desc,
    Nulls,
    On,
    Match,

    // Logical and comparison words
    And,
    Or,
    Not,
    Is,
    In,
    Between,
    Like,
    Escape,

    // Set operators
    Union,
    Except,
    Intersect,
    Outer,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Cross,

    // Expressions
    Case,
    When,
    Then,
    Else,
    End,
    Cast,
    CanCast,
    CanLosslessCast,
    Null,
    Missing,
    True,
    False,
    Substring,
    Trim,
    Extract,
    For,
    DateAdd,
    DateDiff,
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Every,

    // DML / DDL
    Insert,
    Into,
    Update,
    Set,
    Remove,
    Delete,
    Create,
    Drop,
    Table,
    Index,
    Exec,

    // Type names
    Bool,
    Boolean,
    Smallint,
    Int2,
    Integer2,
    Int4,
    Integer4,
    Int,
    Integer,
    Int8,
    Integer8,
    Bigint,
    Float,
    Real,
    Decimal,
    Dec,
    Numeric,
    Char,
    Character,
    Varchar,
    String,
    Symbol,
    Clob,
    Blob,
    Date,
    Time,
    Timestamp,
    With,
    Struct,
    Tuple,
    List,
    Bag,
    Sexp,

    // Fused multi-word keywords
    DoublePrecision,
    CharacterVarying,
    UnionAll,
    ExceptAll,
    IntersectAll,
    OuterUnion,
    OuterUnionAll,
    OuterExcept,
    OuterExceptAll,
    OuterIntersect,
    OuterIntersectAll,
    NotIn,
    NotLike,
    NotBetween,
    IsNot,
    CrossJoin,
    InnerJoin,
    LeftJoin,
    LeftCrossJoin,
    RightJoin,
    RightCrossJoin,
    FullJoin,
    FullCrossJoin,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    /// `<<`, opens a bag literal.
    LeftDoubleAngle,
    /// `>>`, closes a bag literal.
    RightDoubleAngle,
    Comma,
    Semicolon,
    Dot,
    Colon,
    Star,
    Plus,
    Minus,
    Slash,
    Percent,
    /// `||`
    Concat,
    Pipe,
    Ampersand,
    Bang,
    Eq,
    /// `<>`
    NotEq,
    /// `!=`
    BangEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// `->`
    Arrow,
    Tilde,
    /// `<~`
    LeftTilde,
    /// `~>`
    RightTilde,
    /// `?`, positional parameter.
    Question,
    /// `@`, locals-first sigil.
    AtSign,

    // Identifiers and literals
    /// Unquoted, case-insensitive identifier.
    Identifier(SmolStr),
    /// Double-quoted, case-sensitive identifier (escapes resolved).
    QuotedIdentifier(SmolStr),
    /// Single-quoted string (escapes resolved).
    StringLiteral(SmolStr),
    /// Exact integer digits.
    IntegerLiteral(SmolStr),
    /// Exact decimal digits with a decimal point.
    DecimalLiteral(SmolStr),
    /// Approximate numeric in scientific notation.
    FloatLiteral(SmolStr),
    /// Hex digits of an `X'..'` literal.
    ByteStringLiteral(SmolStr),
    /// Body of a backtick-quoted embedded literal.
    EmbeddedLiteral(SmolStr),

    Eof,
}

impl TokenKind {
    /// Returns true for reserved words, including fused multi-word keywords.
    pub fn is_keyword(&self) -> bool {
        !self.is_literal()
            && !self.is_identifier()
            && !self.is_punctuation()
            && !matches!(self, TokenKind::Eof)
    }

    /// Returns true for literal tokens.
    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::StringLiteral(_)
                | TokenKind::IntegerLiteral(_)
                | TokenKind::DecimalLiteral(_)
                | TokenKind::FloatLiteral(_)
                | TokenKind::ByteStringLiteral(_)
                | TokenKind::EmbeddedLiteral(_)
        )
    }

    /// Returns true for quoted and unquoted identifiers.
    pub fn is_identifier(&self) -> bool {
        matches!(
            self,
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_)
        )
    }

    /// Returns true for punctuation and operator symbols.
    pub fn is_punctuation(&self) -> bool {
        matches!(
            self,
            TokenKind::LeftParen
                | TokenKind::RightParen
                | TokenKind::LeftBracket
                | TokenKind::RightBracket
                | TokenKind::LeftBrace
                | TokenKind::RightBrace
                | TokenKind::LeftDoubleAngle
                | TokenKind::RightDoubleAngle
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Dot
                | TokenKind::Colon
                | TokenKind::Star
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Concat
                | TokenKind::Pipe
                | TokenKind::Ampersand
                | TokenKind::Bang
                | TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::BangEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
                | TokenKind::Arrow
                | TokenKind::Tilde
                | TokenKind::LeftTilde
                | TokenKind::RightTilde
                | TokenKind::Question
                | TokenKind::AtSign
        )
    }

    /// Canonical spelling of tokens without a payload.
    pub fn as_str(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Select => "SELECT",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::Group => "GROUP",
            TokenKind::Partial => "PARTIAL",
            TokenKind::By => "BY",
            TokenKind::Having => "HAVING",
            TokenKind::Order => "ORDER",
            TokenKind::Limit => "LIMIT",
            TokenKind::Offset => "OFFSET",
            TokenKind::Let => "LET",
            TokenKind::As => "AS",
            TokenKind::At => "AT",
            TokenKind::Pivot => "PIVOT",
            TokenKind::Unpivot => "UNPIVOT",
            TokenKind::Value => "VALUE",
            TokenKind::Values => "VALUES",
            TokenKind::Distinct => "DISTINCT",
            TokenKind::All => "ALL",
            TokenKind::Any => "ANY",
            TokenKind::Some => "SOME",
            TokenKind::Asc => "ASC",
            TokenKind::Desc => "DESC",
            TokenKind::Nulls => "NULLS",
            TokenKind::On => "ON",
            TokenKind::Match => "MATCH",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Is => "IS",
            TokenKind::In => "IN",
            TokenKind::Between => "BETWEEN",
            TokenKind::Like => "LIKE",
            TokenKind::Escape => "ESCAPE",
            TokenKind::Union => "UNION",
            TokenKind::Except => "EXCEPT",
            TokenKind::Intersect => "INTERSECT",
            TokenKind::Outer => "OUTER",
            TokenKind::Join => "JOIN",
            TokenKind::Inner => "INNER",
            TokenKind::Left => "LEFT",
            TokenKind::Right => "RIGHT",
            TokenKind::Full => "FULL",
            TokenKind::Cross => "CROSS",
            TokenKind::Case => "CASE",
            TokenKind::When => "WHEN",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::End => "END",
            TokenKind::Cast => "CAST",
            TokenKind::CanCast => "CAN_CAST",
            TokenKind::CanLosslessCast => "CAN_LOSSLESS_CAST",
            TokenKind::Null => "NULL",
            TokenKind::Missing => "MISSING",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Substring => "SUBSTRING",
            TokenKind::Trim => "TRIM",
            TokenKind::Extract => "EXTRACT",
            TokenKind::For => "FOR",
            TokenKind::DateAdd => "DATE_ADD",
            TokenKind::DateDiff => "DATE_DIFF",
            TokenKind::Count => "COUNT",
            TokenKind::Sum => "SUM",
            TokenKind::Avg => "AVG",
            TokenKind::Min => "MIN",
            TokenKind::Max => "MAX",
            TokenKind::Every => "EVERY",
            TokenKind::Insert => "INSERT",
            TokenKind::Into => "INTO",
            TokenKind::Update => "UPDATE",
            TokenKind::Set => "SET",
            TokenKind::Remove => "REMOVE",
            TokenKind::Delete => "DELETE",
            TokenKind::Create => "CREATE",
            TokenKind::Drop => "DROP",
            TokenKind::Table => "TABLE",
            TokenKind::Index => "INDEX",
            TokenKind::Exec => "EXEC",
            TokenKind::Bool => "BOOL",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Smallint => "SMALLINT",
            TokenKind::Int2 => "INT2",
            TokenKind::Integer2 => "INTEGER2",
            TokenKind::Int4 => "INT4",
            TokenKind::Integer4 => "INTEGER4",
            TokenKind::Int => "INT",
            TokenKind::Integer => "INTEGER",
            TokenKind::Int8 => "INT8",
            TokenKind::Integer8 => "INTEGER8",
            TokenKind::Bigint => "BIGINT",
            TokenKind::Float => "FLOAT",
            TokenKind::Real => "REAL",
            TokenKind::Decimal => "DECIMAL",
            TokenKind::Dec => "DEC",
            TokenKind::Numeric => "NUMERIC",
            TokenKind::Char => "CHAR",
            TokenKind::Character => "CHARACTER",
            TokenKind::Varchar => "VARCHAR",
            TokenKind::String => "STRING",
            TokenKind::Symbol => "SYMBOL",
            TokenKind::Clob => "CLOB",
            TokenKind::Blob => "BLOB",
            TokenKind::Date => "DATE",
            TokenKind::Time => "TIME",
            TokenKind::Timestamp => "TIMESTAMP",
            TokenKind::With => "WITH",
            TokenKind::Struct => "STRUCT",
            TokenKind::Tuple => "TUPLE",
            TokenKind::List => "LIST",
            TokenKind::Bag => "BAG",
            TokenKind::Sexp => "SEXP",
            TokenKind::DoublePrecision => "DOUBLE PRECISION",
            TokenKind::CharacterVarying => "CHARACTER VARYING",
            TokenKind::UnionAll => "UNION ALL",
            TokenKind::ExceptAll => "EXCEPT ALL",
            TokenKind::IntersectAll => "INTERSECT ALL",
            TokenKind::OuterUnion => "OUTER UNION",
            TokenKind::OuterUnionAll => "OUTER UNION ALL",
            TokenKind::OuterExcept => "OUTER EXCEPT",
            TokenKind::OuterExceptAll => "OUTER EXCEPT ALL",
            TokenKind::OuterIntersect => "OUTER INTERSECT",
            TokenKind::OuterIntersectAll => "OUTER INTERSECT ALL",
            TokenKind::NotIn => "NOT IN",
            TokenKind::NotLike => "NOT LIKE",
            TokenKind::NotBetween => "NOT BETWEEN",
            TokenKind::IsNot => "IS NOT",
            TokenKind::CrossJoin => "CROSS JOIN",
            TokenKind::InnerJoin => "INNER JOIN",
            TokenKind::LeftJoin => "LEFT JOIN",
            TokenKind::LeftCrossJoin => "LEFT CROSS JOIN",
            TokenKind::RightJoin => "RIGHT JOIN",
            TokenKind::RightCrossJoin => "RIGHT CROSS JOIN",
            TokenKind::FullJoin => "FULL JOIN",
            TokenKind::FullCrossJoin => "FULL CROSS JOIN",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftDoubleAngle => "<<",
            TokenKind::RightDoubleAngle => ">>",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::Colon => ":",
            TokenKind::Star => "*",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Concat => "||",
            TokenKind::Pipe => "|",
            TokenKind::Ampersand => "&",
            TokenKind::Bang => "!",
            TokenKind::Eq => "=",
            TokenKind::NotEq => "<>",
            TokenKind::BangEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::LtEq => "<=",
            TokenKind::Gt => ">",
            TokenKind::GtEq => ">=",
            TokenKind::Arrow => "->",
            TokenKind::Tilde => "~",
            TokenKind::LeftTilde => "<~",
            TokenKind::RightTilde => "~>",
            TokenKind::Question => "?",
            TokenKind::AtSign => "@",
            TokenKind::Identifier(_)
            | TokenKind::QuotedIdentifier(_)
            | TokenKind::StringLiteral(_)
            | TokenKind::IntegerLiteral(_)
            | TokenKind::DecimalLiteral(_)
            | TokenKind::FloatLiteral(_)
            | TokenKind::ByteStringLiteral(_)
            | TokenKind::EmbeddedLiteral(_)
            | TokenKind::Eof => return None,
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.as_str() {
            return if self.is_punctuation() {
                write!(f, "`{text}`")
            } else {
                write!(f, "{text}")
            };
        }
        match self {
            TokenKind::Identifier(name) => write!(f, "identifier `{name}`"),
            TokenKind::QuotedIdentifier(name) => write!(f, "quoted identifier \"{name}\""),
            TokenKind::StringLiteral(value) => write!(f, "string '{value}'"),
            TokenKind::IntegerLiteral(digits)
            | TokenKind::DecimalLiteral(digits)
            | TokenKind::FloatLiteral(digits) => write!(f, "number {digits}"),
            TokenKind::ByteStringLiteral(hex) => write!(f, "byte string X'{hex}'"),
            TokenKind::EmbeddedLiteral(_) => write!(f, "embedded literal"),
            _ => write!(f, "end of input"),
        }
    }
}

/// A 1-based line and column (columns count characters, not bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A lexical token with its kind, source span, raw text and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte range in the source text.
    pub span: Span,
    /// The exact source text of the token (for fused keywords this includes
    /// the whitespace between the words).
    pub text: SmolStr,
    /// Line and column of the token's first character.
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, text: impl Into<SmolStr>, position: Position) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
            position,
        }
    }

    /// Byte offset of the token's first character.
    pub fn offset(&self) -> usize {
        self.span.start
    }
}
