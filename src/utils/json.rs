//! Loose interpretation of JSON configuration values
//!
//! Configs are hand-written JSON, so numeric settings may arrive as numbers,
//! numeric strings or junk. These helpers decide how such values are read.

use serde_json::Value;

/// Whether a value counts as "set": null, false, 0, NaN and "" do not
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Integer-prefix parse: `12` → 12, `3.9` → 3, `"15ms"` → 15, `" -2"` → -2,
/// `"abc"`, `true`, objects → `None`
pub fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude: i64 = digits[..end].parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// A truthy setting that parses to a non-negative integer
pub fn non_negative(value: Option<&Value>) -> Option<u64> {
    value
        .filter(|v| is_truthy(v))
        .and_then(parse_int)
        .and_then(|n| u64::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int(&json!(12)), Some(12));
        assert_eq!(parse_int(&json!(3.9)), Some(3));
        assert_eq!(parse_int(&json!("15ms")), Some(15));
        assert_eq!(parse_int(&json!(" -2")), Some(-2));
        assert_eq!(parse_int(&json!("abc")), None);
        assert_eq!(parse_int(&json!(true)), None);
        assert_eq!(parse_int(&json!({"a": 1})), None);
    }

    #[test]
    fn test_non_negative() {
        assert_eq!(non_negative(Some(&json!(5))), Some(5));
        assert_eq!(non_negative(Some(&json!("7"))), Some(7));
        assert_eq!(non_negative(Some(&json!(-5))), None);
        assert_eq!(non_negative(Some(&json!(0))), None);
        assert_eq!(non_negative(None), None);
    }
}
