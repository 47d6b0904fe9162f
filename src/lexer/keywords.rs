//! Keyword recognition.
//!
//! Keywords are case-insensitive. Three tables live here:
//! - reserved single words, each with its own [`TokenKind`];
//! - multi-word keywords fused by the lexer into one token;
//! - contextual keywords, which stay identifiers and are only consulted by
//!   the grammar productions that give them meaning.

use super::token::TokenKind;

/// Looks up a reserved word (case-insensitive).
pub fn lookup_keyword(word: &str) -> Option<TokenKind> {
    let kind = match word.to_ascii_lowercase().as_str() {
        "select" => TokenKind::Select,
        "from" => TokenKind::From,
        "where" => TokenKind::Where,
        "group" => TokenKind::Group,
        "partial" => TokenKind::Partial,
        "by" => TokenKind::By,
        "having" => TokenKind::Having,
        "order" => TokenKind::Order,
        "limit" => TokenKind::Limit,
        "offset" => TokenKind::Offset,
        "let" => TokenKind::Let,
        "as" => TokenKind::As,
        "at" => TokenKind::At,
        "pivot" => TokenKind::Pivot,
        "unpivot" => TokenKind::Unpivot,
        "value" => TokenKind::Value,
        "values" => TokenKind::Values,
        "distinct" => TokenKind::Distinct,
        "all" => TokenKind::All,
        "any" => TokenKind::Any,
        "some" => TokenKind::Some,
        "asc" => TokenKind::Asc,
        "desc" => TokenKind::Desc,
        "nulls" => TokenKind::Nulls,
        "on" => TokenKind::On,
        "match" => TokenKind::Match,

        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "not" => TokenKind::Not,
        "is" => TokenKind::Is,
        "in" => TokenKind::In,
        "between" => TokenKind::Between,
        "like" => TokenKind::Like,
        "escape" => TokenKind::Escape,

        "union" => TokenKind::Union,
        "except" => TokenKind::Except,
        "intersect" => TokenKind::Intersect,
        "outer" => TokenKind::Outer,

        "join" => TokenKind::Join,
        "inner" => TokenKind::Inner,
        "left" => TokenKind::Left,
        "right" => TokenKind::Right,
        "full" => TokenKind::Full,
        "cross" => TokenKind::Cross,

        "case" => TokenKind::Case,
        "when" => TokenKind::When,
        "then" => TokenKind::Then,
        "else" => TokenKind::Else,
        "end" => TokenKind::End,
        "cast" => TokenKind::Cast,
        "can_cast" => TokenKind::CanCast,
        "can_lossless_cast" => TokenKind::CanLosslessCast,
        "null" => TokenKind::Null,
        "missing" => TokenKind::Missing,
        "true" => TokenKind::True,
        "false" => TokenKind::False,
        "substring" => TokenKind::Substring,
        "trim" => TokenKind::Trim,
        "extract" => TokenKind::Extract,
        "for" => TokenKind::For,
        "date_add" => TokenKind::DateAdd,
        "date_diff" => TokenKind::DateDiff,
        "count" => TokenKind::Count,
        "sum" => TokenKind::Sum,
        "avg" => TokenKind::Avg,
        "min" => TokenKind::Min,
        "max" => TokenKind::Max,
        "every" => TokenKind::Every,

        "insert" => TokenKind::Insert,
        "into" => TokenKind::Into,
        "update" => TokenKind::Update,
        "set" => TokenKind::Set,
        "remove" => TokenKind::Remove,
        "delete" => TokenKind::Delete,
        "create" => TokenKind::Create,
        "drop" => TokenKind::Drop,
        "table" => TokenKind::Table,
        "index" => TokenKind::Index,
        "exec" => TokenKind::Exec,

        "bool" => TokenKind::Bool,
        "boolean" => TokenKind::Boolean,
        "smallint" => TokenKind::Smallint,
        "int2" => TokenKind::Int2,
        "integer2" => TokenKind::Integer2,
        "int4" => TokenKind::Int4,
        "integer4" => TokenKind::Integer4,
        "int" => TokenKind::Int,
        "integer" => TokenKind::Integer,
        "int8" => TokenKind::Int8,
        "integer8" => TokenKind::Integer8,
        "bigint" => TokenKind::Bigint,
        "float" => TokenKind::Float,
        "real" => TokenKind::Real,
        "decimal" => TokenKind::Decimal,
        "dec" => TokenKind::Dec,
        "numeric" => TokenKind::Numeric,
        "char" => TokenKind::Char,
        "character" => TokenKind::Character,
        "varchar" => TokenKind::Varchar,
        "string" => TokenKind::String,
        "symbol" => TokenKind::Symbol,
        "clob" => TokenKind::Clob,
        "blob" => TokenKind::Blob,
        "date" => TokenKind::Date,
        "time" => TokenKind::Time,
        "timestamp" => TokenKind::Timestamp,
        "with" => TokenKind::With,
        "struct" => TokenKind::Struct,
        "tuple" => TokenKind::Tuple,
        "list" => TokenKind::List,
        "bag" => TokenKind::Bag,
        "sexp" => TokenKind::Sexp,
        _ => return None,
    };
    Some(kind)
}

/// Multi-word keywords, longest spelling first for each leading word.
///
/// The lexer fuses a run of words into one token only when the whole run
/// matches an entry; otherwise every word is lexed on its own.
pub static MULTI_WORD_KEYWORDS: &[(&[&str], TokenKind)] = &[
    (&["double", "precision"], TokenKind::DoublePrecision),
    (&["character", "varying"], TokenKind::CharacterVarying),
    (&["union", "all"], TokenKind::UnionAll),
    (&["except", "all"], TokenKind::ExceptAll),
    (&["intersect", "all"], TokenKind::IntersectAll),
    (&["outer", "union", "all"], TokenKind::OuterUnionAll),
    (&["outer", "except", "all"], TokenKind::OuterExceptAll),
    (&["outer", "intersect", "all"], TokenKind::OuterIntersectAll),
    (&["outer", "cross", "join"], TokenKind::FullCrossJoin),
    (&["outer", "union"], TokenKind::OuterUnion),
    (&["outer", "except"], TokenKind::OuterExcept),
    (&["outer", "intersect"], TokenKind::OuterIntersect),
    (&["outer", "join"], TokenKind::FullJoin),
    (&["not", "in"], TokenKind::NotIn),
    (&["not", "like"], TokenKind::NotLike),
    (&["not", "between"], TokenKind::NotBetween),
    (&["is", "not"], TokenKind::IsNot),
    (&["cross", "join"], TokenKind::CrossJoin),
    (&["inner", "cross", "join"], TokenKind::CrossJoin),
    (&["inner", "join"], TokenKind::InnerJoin),
    (&["left", "outer", "cross", "join"], TokenKind::LeftCrossJoin),
    (&["left", "outer", "join"], TokenKind::LeftJoin),
    (&["left", "cross", "join"], TokenKind::LeftCrossJoin),
    (&["left", "join"], TokenKind::LeftJoin),
    (&["right", "outer", "cross", "join"], TokenKind::RightCrossJoin),
    (&["right", "outer", "join"], TokenKind::RightJoin),
    (&["right", "cross", "join"], TokenKind::RightCrossJoin),
    (&["right", "join"], TokenKind::RightJoin),
    (&["full", "outer", "cross", "join"], TokenKind::FullCrossJoin),
    (&["full", "outer", "join"], TokenKind::FullJoin),
    (&["full", "cross", "join"], TokenKind::FullCrossJoin),
    (&["full", "join"], TokenKind::FullJoin),
];

/// Returns the multi-word entries starting with `first` (lowercase), in
/// table order.
pub fn multi_word_candidates(
    first: &str,
) -> impl Iterator<Item = &'static (&'static [&'static str], TokenKind)> + '_ {
    MULTI_WORD_KEYWORDS
        .iter()
        .filter(move |(words, _)| words.first().is_some_and(|w| *w == first))
}

/// Non-reserved words that carry meaning in specific grammar positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextualKeyword {
    // Path restrictors and selectors
    Trail,
    Acyclic,
    Simple,
    Shortest,
    // Trim specifications
    Both,
    Leading,
    Trailing,
    // Window functions
    Lag,
    Lead,
    Over,
    Partition,
    // Datetime parts
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    TimezoneHour,
    TimezoneMinute,
    // Sort order and time zones
    First,
    Last,
    Zone,
    // SQL-92 words kept usable as names
    Public,
    User,
    Domain,
}

/// Classifies an unquoted identifier as a contextual keyword.
pub fn contextual_keyword(word: &str) -> Option<ContextualKeyword> {
    let keyword = match word.to_ascii_lowercase().as_str() {
        "trail" => ContextualKeyword::Trail,
        "acyclic" => ContextualKeyword::Acyclic,
        "simple" => ContextualKeyword::Simple,
        "shortest" => ContextualKeyword::Shortest,
        "both" => ContextualKeyword::Both,
        "leading" => ContextualKeyword::Leading,
        "trailing" => ContextualKeyword::Trailing,
        "lag" => ContextualKeyword::Lag,
        "lead" => ContextualKeyword::Lead,
        "over" => ContextualKeyword::Over,
        "partition" => ContextualKeyword::Partition,
        "year" => ContextualKeyword::Year,
        "month" => ContextualKeyword::Month,
        "day" => ContextualKeyword::Day,
        "hour" => ContextualKeyword::Hour,
        "minute" => ContextualKeyword::Minute,
        "second" => ContextualKeyword::Second,
        "timezone_hour" => ContextualKeyword::TimezoneHour,
        "timezone_minute" => ContextualKeyword::TimezoneMinute,
        "first" => ContextualKeyword::First,
        "last" => ContextualKeyword::Last,
        "zone" => ContextualKeyword::Zone,
        "public" => ContextualKeyword::Public,
        "user" => ContextualKeyword::User,
        "domain" => ContextualKeyword::Domain,
        _ => return None,
    };
    Some(keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_lookup_is_case_insensitive() {
        assert_eq!(lookup_keyword("SELECT"), Some(TokenKind::Select));
        assert_eq!(lookup_keyword("SeLeCt"), Some(TokenKind::Select));
        assert_eq!(lookup_keyword("can_lossless_cast"), Some(TokenKind::CanLosslessCast));
        assert_eq!(lookup_keyword("customer"), None);
    }

    #[test]
    fn contextual_words_are_not_reserved() {
        for word in ["trail", "both", "public", "user", "domain", "lag", "zone"] {
            assert_eq!(lookup_keyword(word), None, "{word} must stay an identifier");
            assert!(contextual_keyword(word).is_some());
        }
    }

    #[test]
    fn multi_word_entries_are_longest_first() {
        for (index, (words, _)) in MULTI_WORD_KEYWORDS.iter().enumerate() {
            for (later_words, _) in &MULTI_WORD_KEYWORDS[index + 1..] {
                assert!(
                    !(later_words.len() > words.len() && later_words.starts_with(words)),
                    "{later_words:?} must precede its prefix {words:?}"
                );
            }
        }
    }

    #[test]
    fn candidates_filter_by_first_word() {
        let outer: Vec<_> = multi_word_candidates("outer").collect();
        assert_eq!(outer.len(), 8);
        assert_eq!(outer[0].1, TokenKind::OuterUnionAll);
        assert_eq!(multi_word_candidates("select").count(), 0);
    }

    #[test]
    fn every_fused_word_is_a_keyword_or_known() {
        for (words, _) in MULTI_WORD_KEYWORDS {
            for word in words.iter().filter(|w| !matches!(**w, "double" | "precision" | "varying")) {
                assert!(lookup_keyword(word).is_some(), "{word}");
            }
        }
    }
}
