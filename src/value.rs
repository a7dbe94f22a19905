/// Grid cell values
///
/// A CellValue is what a column accessor extracts from a row. It is the unit
/// the grid filters on, sorts by and hands out in export snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::fmt;

/// Comparable value produced by a column accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view of the value; integers widen to f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Text form used for substring filtering and default cell rendering.
    /// Null renders as the empty string.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Bool(_) => 0,
            CellValue::Int(_) | CellValue::Float(_) => 1,
            CellValue::Text(_) => 2,
            CellValue::Null => 3,
        }
    }

    /// Natural ordering: numbers numerically (ints against floats too), text by
    /// code point, false before true. Values of different kinds order by kind so
    /// the result is total and deterministic. NaN orders after every other
    /// number.
    pub fn natural_cmp(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Int(a), CellValue::Int(b)) => a.cmp(b),
            (CellValue::Text(a), CellValue::Text(b)) => a.cmp(b),
            (CellValue::Bool(a), CellValue::Bool(b)) => a.cmp(b),
            (CellValue::Null, CellValue::Null) => Ordering::Equal,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.is_nan().cmp(&y.is_nan()).then_with(|| x.total_cmp(&y)),
                _ => a.kind_rank().cmp(&b.kind_rank()),
            },
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(v) => f.write_str(v),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Null => f.write_str("null"),
        }
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(i64::from(v))
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::Int(i64::from(v))
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}

impl From<&JsonValue> for CellValue {
    fn from(v: &JsonValue) -> Self {
        match v {
            JsonValue::Null => CellValue::Null,
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => n.as_f64().map(CellValue::Float).unwrap_or(CellValue::Null),
            },
            JsonValue::String(s) => CellValue::Text(s.clone()),
            nested => CellValue::Text(nested.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numbers_compare_numerically() {
        assert_eq!(CellValue::Int(9).natural_cmp(&CellValue::Int(10)), Ordering::Less);
        assert_eq!(CellValue::Int(3).natural_cmp(&CellValue::Float(2.5)), Ordering::Greater);
        assert_eq!(CellValue::Float(4.2).natural_cmp(&CellValue::Float(4.2)), Ordering::Equal);
    }

    #[test]
    fn test_text_compares_by_code_point() {
        // Uppercase letters sort before lowercase by code point
        let a = CellValue::from("Bravo");
        let b = CellValue::from("alpha");
        assert_eq!(a.natural_cmp(&b), Ordering::Less);
    }

    #[test]
    fn test_mixed_kinds_are_deterministic() {
        let text = CellValue::from("x");
        let num = CellValue::Int(1);
        assert_eq!(num.natural_cmp(&text), Ordering::Less);
        assert_eq!(text.natural_cmp(&num), Ordering::Greater);
        assert_eq!(CellValue::Null.natural_cmp(&text), Ordering::Greater);
    }

    #[test]
    fn test_to_text() {
        assert_eq!(CellValue::Int(152).to_text(), "152");
        assert_eq!(CellValue::Float(4.2).to_text(), "4.2");
        assert_eq!(CellValue::Bool(true).to_text(), "true");
        assert_eq!(CellValue::Null.to_text(), "");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(CellValue::from(&json!(12)), CellValue::Int(12));
        assert_eq!(CellValue::from(&json!(1.5)), CellValue::Float(1.5));
        assert_eq!(CellValue::from(&json!("PESQ-001")), CellValue::from("PESQ-001"));
        assert_eq!(CellValue::from(&json!(null)), CellValue::Null);
        assert_eq!(CellValue::from(&json!([1, 2])), CellValue::from("[1,2]"));
    }

    #[test]
    fn test_serializes_untagged() {
        let values = vec![CellValue::Int(1), CellValue::from("a"), CellValue::Null];
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[1,"a",null]"#);
    }

    #[test]
    fn test_nan_orders_after_numbers() {
        let nan = CellValue::Float(f64::NAN);
        assert_eq!(nan.natural_cmp(&CellValue::Float(1e300)), Ordering::Greater);
        assert_eq!(CellValue::Int(-5).natural_cmp(&nan), Ordering::Less);
        assert_eq!(nan.natural_cmp(&CellValue::Float(f64::NAN)), Ordering::Equal);

        let mut values: Vec<CellValue> = [3.0, f64::NAN, 1.0, 2.5, f64::NAN, -4.0]
            .into_iter()
            .map(CellValue::Float)
            .collect();
        values.sort_by(|a, b| a.natural_cmp(b));
        let finite: Vec<f64> = values.iter().filter_map(CellValue::as_f64).take(4).collect();
        assert_eq!(finite, vec![-4.0, 1.0, 2.5, 3.0]);
        assert!(values[4..].iter().all(|v| v.as_f64().is_some_and(f64::is_nan)));
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(CellValue::from(Some(5)), CellValue::Int(5));
        assert_eq!(CellValue::from(None::<&str>), CellValue::Null);
    }
}
