//! Dynamic property values

use crate::error::{AtomicError, Result};
use serde::de::DeserializeOwned;

/// A single dynamic property value
pub use toml::Value;

/// An insertion-ordered map of property name to value
pub type Props = toml::Table;

/// Build a [`Props`] map from `key => value` pairs.
///
/// ```
/// let props = atomic_core::props! { "label" => "Save", "level" => 2i64 };
/// assert_eq!(props.len(), 2);
/// ```
#[macro_export]
macro_rules! props {
    () => {
        $crate::Props::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::Props::new();
        $(
            map.insert(::std::string::String::from($key), $crate::Value::from($value));
        )+
        map
    }};
}

/// Deserialize a property value into a concrete type
pub fn from_value<T: DeserializeOwned>(prop: &str, value: &Value) -> Result<T> {
    value.clone().try_into().map_err(|e: toml::de::Error| AtomicError::PropType {
        prop: prop.to_string(),
        message: e.to_string(),
    })
}

/// Short human-readable name of a value's type
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::String(_) => "string",
        Value::Integer(_) => "integer",
        Value::Float(_) => "float",
        Value::Boolean(_) => "boolean",
        Value::Datetime(_) => "datetime",
        Value::Array(_) => "array",
        Value::Table(_) => "table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_props_macro_keeps_insertion_order() {
        let props = props! { "zeta" => 1i64, "alpha" => "a", "mid" => true };
        let keys: Vec<&str> = props.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_from_value() {
        let n: i64 = from_value("level", &Value::Integer(3)).unwrap();
        assert_eq!(n, 3);

        let err = from_value::<i64>("level", &Value::String("x".into())).unwrap_err();
        assert!(matches!(err, AtomicError::PropType { prop, .. } if prop == "level"));
    }

    #[test]
    fn test_value_type_name() {
        assert_eq!(value_type_name(&Value::Boolean(true)), "boolean");
        assert_eq!(value_type_name(&Value::Array(vec![])), "array");
    }
}
