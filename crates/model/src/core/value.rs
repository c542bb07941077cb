use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar view of a single record field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

impl Value {
    /// Arrays and objects have no scalar view and read as [`Value::Null`].
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(*b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => Value::Null,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            Value::String(v) => v.trim().parse::<f64>().ok(),
            Value::Boolean(v) => Some(if *v { 1.0 } else { 0.0 }),
            Value::Null => None,
        }
    }

    /// The upstream API stores boolean traits as `0`/`1`, so integers and
    /// their textual forms are accepted as booleans.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Int(v) => match v {
                0 => Some(false),
                1 => Some(true),
                _ => None,
            },
            Value::Float(v) if *v == 0.0 => Some(false),
            Value::Float(v) if *v == 1.0 => Some(true),
            Value::Float(_) => None,
            Value::String(v) => match v.trim().to_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Value::Boolean(v) => Some(*v),
            Value::Null => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(v) => write!(f, "{v}"),
            Value::Boolean(v) => write!(f, "{v}"),
            Value::Null => write!(f, "-"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_scalars() {
        assert_eq!(Value::from_json(&json!(4)), Value::Int(4));
        assert_eq!(Value::from_json(&json!(2.5)), Value::Float(2.5));
        assert_eq!(Value::from_json(&json!(true)), Value::Boolean(true));
        assert_eq!(Value::from_json(&json!("abys")), Value::String("abys".into()));
        assert_eq!(Value::from_json(&json!(null)), Value::Null);
        assert_eq!(Value::from_json(&json!({"a": 1})), Value::Null);
    }

    #[test]
    fn test_as_bool_accepts_api_flags() {
        assert_eq!(Value::Int(1).as_bool(), Some(true));
        assert_eq!(Value::Int(0).as_bool(), Some(false));
        assert_eq!(Value::Int(3).as_bool(), None);
        assert_eq!(Value::String("TRUE".into()).as_bool(), Some(true));
        assert_eq!(Value::Null.as_bool(), None);
    }
}
