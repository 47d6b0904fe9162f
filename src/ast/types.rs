//! Type names used as `CAST` targets and `IS` operands.

use smol_str::SmolStr;

/// A type reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Null,
    Missing,
    Any,
    Boolean,
    /// `SMALLINT`, `INT2`, `INTEGER2`
    Smallint,
    /// `INT4`, `INTEGER4`
    Integer4,
    /// `INT8`, `INTEGER8`, `BIGINT`
    Integer8,
    /// `INT`, `INTEGER`
    Integer,
    Float(Option<u32>),
    Real,
    DoublePrecision,
    Decimal {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Numeric {
        precision: Option<u32>,
        scale: Option<u32>,
    },
    Char(Option<u32>),
    Varchar(Option<u32>),
    String,
    Symbol,
    Clob,
    Blob,
    Date,
    Time {
        precision: Option<u32>,
        with_time_zone: bool,
    },
    Timestamp(Option<u32>),
    Struct,
    Tuple,
    List,
    Bag,
    Sexp,
    /// A vendor-specific type, by canonical lowercase name.
    Custom(SmolStr),
}

/// Vendor spellings accepted as type names, mapped to their canonical name.
static CUSTOM_TYPES: &[(&str, &str)] = &[
    ("es_any", "es_any"),
    ("es_boolean", "es_boolean"),
    ("es_float", "es_float"),
    ("es_integer", "es_integer"),
    ("es_text", "es_text"),
    ("rs_bigint", "rs_bigint"),
    ("rs_boolean", "rs_boolean"),
    ("rs_double_precision", "rs_double_precision"),
    ("rs_float", "rs_double_precision"),
    ("rs_float8", "rs_double_precision"),
    ("rs_integer", "rs_integer"),
    ("rs_real", "rs_real"),
    ("rs_float4", "rs_real"),
    ("rs_varchar_max", "rs_varchar_max"),
    ("spark_boolean", "spark_boolean"),
    ("spark_double", "spark_double"),
    ("spark_float", "spark_float"),
    ("spark_integer", "spark_integer"),
    ("spark_long", "spark_long"),
    ("spark_short", "spark_short"),
];

/// Resolves a vendor type spelling (case-insensitive) to its canonical
/// custom type.
pub fn custom_type(name: &str) -> Option<Type> {
    CUSTOM_TYPES
        .iter()
        .find(|(spelling, _)| spelling.eq_ignore_ascii_case(name))
        .map(|&(_, canonical)| Type::Custom(SmolStr::new_static(canonical)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_precision_aliases_share_one_name() {
        assert_eq!(custom_type("RS_FLOAT4"), Some(Type::Custom("rs_real".into())));
        assert_eq!(custom_type("rs_real"), Some(Type::Custom("rs_real".into())));
        assert_eq!(custom_type("Rs_Float8"), custom_type("RS_DOUBLE_PRECISION"));
    }

    #[test]
    fn unknown_names_are_not_custom_types() {
        assert_eq!(custom_type("rs_unknown"), None);
        assert_eq!(custom_type("integer"), None);
    }
}
