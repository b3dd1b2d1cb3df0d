//! Expected-value comparison
//!
//! Decides whether an observed value matches an expected one under a named
//! comparison mode. A missing value (`None`) plays the role of "undefined":
//! it only equals another missing value.

use serde_json::{Number, Value};
use tracing::debug;

/// Comparison mode names accepted by validation
pub const COMPARISON_TYPES: &[&str] = &["contains-same-values", "equals"];

/// Misspelling accepted by older configurations
const LEGACY_CONTAINS: &str = "conatins-same-values";

/// How an observed value is checked against an expected one
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Strict deep equality
    Equals,
    /// Expected must be a subset of observed
    ContainsSameValues,
}

impl ComparisonMode {
    /// Case-insensitive; anything other than `equals` is a partial match
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("equals") {
            ComparisonMode::Equals
        } else {
            ComparisonMode::ContainsSameValues
        }
    }

    /// Whether `s` names a mode validation accepts
    pub fn is_known(s: &str) -> bool {
        let lower = s.to_lowercase();
        COMPARISON_TYPES.contains(&lower.as_str()) || lower == LEGACY_CONTAINS
    }
}

/// Compare with a mode given by name
pub fn is_expected(observed: Option<&Value>, expected: Option<&Value>, comparison_type: &str) -> bool {
    match ComparisonMode::parse(comparison_type) {
        ComparisonMode::Equals => {
            debug!("Comparing by deep equality.");
            equals(observed, expected)
        }
        ComparisonMode::ContainsSameValues => {
            debug!("Comparing by values.");
            contains_same_values(observed, expected)
        }
    }
}

fn is_primitive(value: Option<&Value>) -> bool {
    !matches!(value, Some(Value::Array(_)) | Some(Value::Object(_)))
}

fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a == b {
        return true;
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

fn primitive_equal(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(Value::Number(x)), Some(Value::Number(y))) => numbers_equal(x, y),
        (Some(x), Some(y)) if is_primitive(Some(x)) && is_primitive(Some(y)) => x == y,
        _ => false,
    }
}

/// Strict deep equality; primitives are never descended into
pub fn equals(observed: Option<&Value>, expected: Option<&Value>) -> bool {
    if is_primitive(observed) || is_primitive(expected) {
        return primitive_equal(observed, expected);
    }
    match (observed, expected) {
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| equals(Some(x), Some(y)))
        }
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            a.len() == b.len() && b.iter().all(|(k, v)| a.contains_key(k) && equals(a.get(k), Some(v)))
        }
        _ => false,
    }
}

/// Subset check: every key of `expected` must match recursively in
/// `observed`. Extra observed keys never fail the comparison. Stops at the
/// first mismatching key. An empty expected container only matches an empty
/// observed one.
pub fn contains_same_values(observed: Option<&Value>, expected: Option<&Value>) -> bool {
    if is_primitive(observed) || is_primitive(expected) {
        return primitive_equal(observed, expected);
    }
    let (Some(observed), Some(expected)) = (observed, expected) else {
        return false;
    };
    if container_len(observed) == 0 && container_len(expected) == 0 {
        return true;
    }

    let mut is_same = false;
    match expected {
        Value::Object(map) => {
            for (key, value) in map {
                is_same = contains_same_values(child(observed, key), Some(value));
                if !is_same {
                    debug!("Mismatch at key '{}'", key);
                    break;
                }
            }
        }
        Value::Array(items) => {
            for (index, value) in items.iter().enumerate() {
                is_same = contains_same_values(child(observed, &index.to_string()), Some(value));
                if !is_same {
                    debug!("Mismatch at index {}", index);
                    break;
                }
            }
        }
        _ => {}
    }
    is_same
}

fn container_len(value: &Value) -> usize {
    match value {
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        _ => 0,
    }
}

/// Property lookup shared by objects and arrays (arrays by decimal index)
fn child<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}
