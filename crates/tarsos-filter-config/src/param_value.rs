//! Typed parameter values as they appear in preset files.

use serde::{Deserialize, Serialize};

/// One value in a preset's `[params]` table.
///
/// TOML scalars and arrays map onto the variants directly:
///
/// ```toml
/// order = 4                      # Integer
/// cutoff = 0.3                   # Number
/// negative = true                # Flag
/// window = "kaiser"              # Text
/// magnitudes = [1.0, 1.0, 0.0]   # List
/// poles = [[0.9, 0.25]]          # Points
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Boolean switch
    Flag(bool),
    /// Whole number
    Integer(i64),
    /// Real number
    Number(f64),
    /// Named choice
    Text(String),
    /// List of real numbers
    List(Vec<f64>),
    /// List of `[radius, angle]` pairs
    Points(Vec<[f64; 2]>),
}

impl ParamValue {
    /// Short name of the value's shape, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ParamValue::Flag(_) => "flag",
            ParamValue::Integer(_) => "integer",
            ParamValue::Number(_) => "number",
            ParamValue::Text(_) => "text",
            ParamValue::List(_) => "list",
            ParamValue::Points(_) => "point list",
        }
    }

    /// Numeric value; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(i) => Some(*i as f64),
            ParamValue::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// Integer value; numbers are accepted when they are whole.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(i) => Some(*i),
            ParamValue::Number(x) if x.is_finite() && x.fract() == 0.0 => Some(*x as i64),
            _ => None,
        }
    }

    /// Boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Text value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Number list.
    pub fn as_list(&self) -> Option<&[f64]> {
        match self {
            ParamValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Point list. An empty array parses as an empty [`ParamValue::List`]
    /// and is accepted here too.
    pub fn as_points(&self) -> Option<&[[f64; 2]]> {
        match self {
            ParamValue::Points(p) => Some(p),
            ParamValue::List(v) if v.is_empty() => Some(&[]),
            _ => None,
        }
    }
}

impl From<bool> for ParamValue {
    fn from(b: bool) -> Self {
        ParamValue::Flag(b)
    }
}

impl From<i64> for ParamValue {
    fn from(i: i64) -> Self {
        ParamValue::Integer(i)
    }
}

impl From<usize> for ParamValue {
    fn from(i: usize) -> Self {
        ParamValue::Integer(i64::try_from(i).unwrap_or(i64::MAX))
    }
}

impl From<u32> for ParamValue {
    fn from(i: u32) -> Self {
        ParamValue::Integer(i64::from(i))
    }
}

impl From<f64> for ParamValue {
    fn from(x: f64) -> Self {
        ParamValue::Number(x)
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Text(s)
    }
}

impl From<Vec<f64>> for ParamValue {
    fn from(v: Vec<f64>) -> Self {
        ParamValue::List(v)
    }
}

impl From<Vec<[f64; 2]>> for ParamValue {
    fn from(p: Vec<[f64; 2]>) -> Self {
        ParamValue::Points(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn parse(toml_str: &str) -> BTreeMap<String, ParamValue> {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn toml_shapes_map_to_variants() {
        let params = parse(
            r#"
order = 4
cutoff = 0.3
negative = true
window = "kaiser"
magnitudes = [1.0, 0.5]
poles = [[0.9, 0.25]]
empty = []
"#,
        );
        assert_eq!(params["order"], ParamValue::Integer(4));
        assert_eq!(params["cutoff"], ParamValue::Number(0.3));
        assert_eq!(params["negative"], ParamValue::Flag(true));
        assert_eq!(params["window"], ParamValue::Text("kaiser".into()));
        assert_eq!(params["magnitudes"], ParamValue::List(vec![1.0, 0.5]));
        assert_eq!(params["poles"], ParamValue::Points(vec![[0.9, 0.25]]));
        assert_eq!(params["empty"].as_points(), Some(&[][..]));
    }

    #[test]
    fn integer_list_reads_as_numbers() {
        let params = parse("magnitudes = [1, 0, 1]");
        assert_eq!(params["magnitudes"].as_list(), Some(&[1.0, 0.0, 1.0][..]));
    }

    #[test]
    fn numeric_coercions() {
        assert_eq!(ParamValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(ParamValue::Number(8.0).as_i64(), Some(8));
        assert_eq!(ParamValue::Number(8.5).as_i64(), None);
        assert_eq!(ParamValue::Text("x".into()).as_f64(), None);
        assert_eq!(ParamValue::from(true).kind_name(), "flag");
    }
}
