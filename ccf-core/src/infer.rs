// Type inference over a single column's text values

use crate::data::DataType;

/// Infer a column's element type from its text values, per the scan rule:
/// ignore empty values (they are nulls); if every non-empty value parses
/// as a base-10 `i32`, the column is `INT32`; else if every non-empty
/// value parses as a finite-or-infinite `f64`, the column is `FLOAT64`;
/// otherwise `STRING`. An all-empty column infers `INT32`.
pub fn infer_type<S: AsRef<str>>(values: &[S]) -> DataType {
    let mut is_int = true;
    let mut is_float = true;

    for value in values {
        let value = value.as_ref();
        if value.is_empty() {
            continue;
        }
        if is_int && parse_int32(value).is_none() {
            is_int = false;
        }
        if is_float && !parse_float64(value) {
            is_float = false;
        }
        if !is_int && !is_float {
            break;
        }
    }

    if is_int {
        DataType::Int32
    } else if is_float {
        DataType::Float64
    } else {
        DataType::String
    }
}

/// Strict canonical signed-integer lexical form: optional leading `-`,
/// then one or more ASCII digits, fit within `i32`. Rejects leading `+`,
/// underscores, hex, and leading/trailing whitespace — `str::parse::<i32>`
/// already enforces all of that; this wrapper only exists to make the
/// "strict parse, fall through on overflow" contract explicit at the call
/// site.
fn parse_int32(value: &str) -> Option<i32> {
    value.parse::<i32>().ok()
}

/// `f64::from_str` doesn't error on a decimal wide enough to overflow the
/// type — it returns `Ok(inf)`. A value like "1" followed by 400 zeros
/// would otherwise sail through as FLOAT64. Only accept the parse when
/// it's finite, or when the text itself is a genuine infinity literal.
fn parse_float64(value: &str) -> bool {
    match value.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => true,
        Ok(_) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "inf" | "infinity" | "-inf" | "-infinity" | "+inf" | "+infinity"
        ),
        Err(_) => false,
    }
}
