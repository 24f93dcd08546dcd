//! Prop rule definitions

use atomic_core::{AtomicError, Result, Value};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The expected type of a prop
#[derive(Debug, Clone, PartialEq)]
pub enum PropType {
    Any,
    Bool,
    Integer,
    Float,
    String,
    Table,
    Array { element: Box<PropType> },
}

impl PropType {
    pub fn type_name(&self) -> &'static str {
        match self {
            PropType::Any => "any",
            PropType::Bool => "boolean",
            PropType::Integer => "integer",
            PropType::Float => "numeric",
            PropType::String => "string",
            PropType::Table => "table",
            PropType::Array { .. } => "array",
        }
    }

    /// Parse a type keyword as used in rule strings and detailed rules
    pub fn parse(keyword: &str) -> Result<Self> {
        let ty = match keyword {
            "any" => PropType::Any,
            "bool" | "boolean" => PropType::Bool,
            "int" | "integer" => PropType::Integer,
            "float" | "numeric" => PropType::Float,
            "string" => PropType::String,
            "table" => PropType::Table,
            "array" => PropType::Array {
                element: Box::new(PropType::Any),
            },
            other => {
                return Err(AtomicError::RuleParse(format!(
                    "unknown prop type '{}'",
                    other
                )))
            }
        };
        Ok(ty)
    }
}

/// Rule for a single prop
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSpec {
    pub prop_type: PropType,
    pub required: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Accepted values, compared against the value's text form
    pub allowed: Option<Vec<String>>,
    pub description: Option<String>,
}

impl Default for RuleSpec {
    fn default() -> Self {
        Self::new(PropType::Any)
    }
}

impl RuleSpec {
    pub fn new(prop_type: PropType) -> Self {
        Self {
            prop_type,
            required: false,
            min: None,
            max: None,
            allowed: None,
            description: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Restrict the prop to a fixed set of values, on top of its type
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Parse a pipe-separated rule string such as `required|string|max:40`.
    ///
    /// Token order does not matter; `in:` never changes the type.
    pub fn parse(rule: &str) -> Result<Self> {
        let mut spec = RuleSpec::default();

        for token in rule.split('|').map(str::trim).filter(|t| !t.is_empty()) {
            let (name, arg) = match token.split_once(':') {
                Some((name, arg)) => (name, Some(arg)),
                None => (token, None),
            };

            match (name, arg) {
                ("required", None) => spec.required = true,
                ("in", Some(values)) => {
                    spec.allowed = Some(values.split(',').map(|v| v.trim().to_string()).collect());
                }
                ("min", Some(n)) => spec.min = Some(parse_bound(rule, n)?),
                ("max", Some(n)) => spec.max = Some(parse_bound(rule, n)?),
                (keyword, None) => spec.prop_type = PropType::parse(keyword)?,
                (keyword, Some(_)) => {
                    return Err(AtomicError::RuleParse(format!(
                        "rule '{}' does not take an argument in '{}'",
                        keyword, rule
                    )))
                }
            }
        }

        Ok(spec)
    }
}

fn parse_bound(rule: &str, n: &str) -> Result<f64> {
    n.trim()
        .parse()
        .map_err(|_| AtomicError::RuleParse(format!("invalid bound '{}' in '{}'", n, rule)))
}

/// Text form of a scalar value, as compared against allowed values
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Integer(n) => Some(n.to_string()),
        Value::Float(n) => Some(n.to_string()),
        Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Rule as it appears in configuration files
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleDefinition {
    Simple(String),
    Detailed(DetailedRule),
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetailedRule {
    #[serde(rename = "type", default)]
    pub prop_type: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    pub values: Option<Vec<Value>>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RuleDefinition {
    pub fn to_rule_spec(self) -> Result<RuleSpec> {
        match self {
            RuleDefinition::Simple(rule) => RuleSpec::parse(&rule),
            RuleDefinition::Detailed(d) => {
                let prop_type = match d.prop_type.as_deref() {
                    None | Some("enum") => PropType::Any,
                    Some("array") => PropType::Array {
                        element: Box::new(match d.element.as_deref() {
                            Some(element) => PropType::parse(element)?,
                            None => PropType::Any,
                        }),
                    },
                    Some(keyword) => PropType::parse(keyword)?,
                };
                let mut spec = RuleSpec::new(prop_type);
                spec.required = d.required.unwrap_or(false);
                spec.min = d.min;
                spec.max = d.max;
                spec.allowed = match d.values {
                    Some(values) => Some(
                        values
                            .iter()
                            .map(|v| {
                                scalar_text(v).ok_or_else(|| {
                                    AtomicError::RuleParse(format!("'{}' cannot be an allowed value", v))
                                })
                            })
                            .collect::<Result<_>>()?,
                    ),
                    None => None,
                };
                Ok(match d.description {
                    Some(description) => spec.describe(description),
                    None => spec,
                })
            }
        }
    }
}

/// The full set of rules declared by a component type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropRules {
    rules: BTreeMap<String, RuleSpec>,
}

impl PropRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, builder style
    pub fn with(mut self, prop: impl Into<String>, spec: RuleSpec) -> Self {
        self.insert(prop, spec);
        self
    }

    pub fn insert(&mut self, prop: impl Into<String>, spec: RuleSpec) {
        self.rules.insert(prop.into(), spec);
    }

    pub fn get(&self, prop: &str) -> Option<&RuleSpec> {
        self.rules.get(prop)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleSpec)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn prop_names(&self) -> Vec<&str> {
        self.rules.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build rules from a map of prop name to rule definition
    pub fn from_definitions(defs: impl IntoIterator<Item = (String, RuleDefinition)>) -> Result<Self> {
        let mut rules = Self::new();
        for (prop, def) in defs {
            let spec = def
                .to_rule_spec()
                .map_err(|e| AtomicError::RuleParse(format!("prop '{}': {}", prop, e)))?;
            rules.insert(prop, spec);
        }
        Ok(rules)
    }

    /// Parse rules from a TOML string of `prop = <rule>` entries
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let defs: BTreeMap<String, RuleDefinition> = toml::from_str(content)?;
        Self::from_definitions(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rule_string() {
        let spec = RuleSpec::parse("required|string|max:40").unwrap();
        assert!(spec.required);
        assert_eq!(spec.prop_type, PropType::String);
        assert_eq!(spec.max, Some(40.0));
        assert_eq!(spec.min, None);
    }

    #[test]
    fn test_parse_in_rule() {
        let spec = RuleSpec::parse("in:sm, lg").unwrap();
        assert_eq!(spec.prop_type, PropType::Any);
        assert_eq!(spec.allowed, Some(vec!["sm".to_string(), "lg".to_string()]));
        assert!(!spec.required);
    }

    #[test]
    fn test_in_rule_independent_of_order() {
        let before = RuleSpec::parse("in:sm,lg|string").unwrap();
        let after = RuleSpec::parse("string|in:sm,lg").unwrap();
        assert_eq!(before, after);
        assert_eq!(before.prop_type, PropType::String);
        assert_eq!(before.allowed, Some(vec!["sm".to_string(), "lg".to_string()]));
    }

    #[test]
    fn test_builder_methods() {
        let spec = RuleSpec::new(PropType::Integer)
            .required()
            .min(1.0)
            .one_of(["1", "2"])
            .describe("Heading level");
        assert_eq!(spec.description.as_deref(), Some("Heading level"));
        assert_eq!(spec.allowed, Some(vec!["1".to_string(), "2".to_string()]));
        assert_eq!(spec.min, Some(1.0));
    }

    #[test]
    fn test_parse_unknown_rule() {
        assert!(matches!(
            RuleSpec::parse("required|colour"),
            Err(AtomicError::RuleParse(_))
        ));
        assert!(matches!(
            RuleSpec::parse("max:ten"),
            Err(AtomicError::RuleParse(_))
        ));
    }

    #[test]
    fn test_rules_from_toml() {
        let rules = PropRules::from_toml_str(
            r#"
label = "required|string"
size = { type = "enum", values = ["sm", "lg"] }
tags = { type = "array", element = "string", max = 3 }
"#,
        )
        .unwrap();

        assert_eq!(rules.len(), 3);
        let size = rules.get("size").unwrap();
        assert_eq!(size.prop_type, PropType::Any);
        assert_eq!(size.allowed, Some(vec!["sm".to_string(), "lg".to_string()]));
        assert!(rules.get("label").unwrap().required);
        assert!(matches!(
            &rules.get("tags").unwrap().prop_type,
            PropType::Array { element } if **element == PropType::String
        ));
        assert_eq!(rules.prop_names(), vec!["label", "size", "tags"]);
    }

    #[test]
    fn test_detailed_values_accept_scalars() {
        let rules = PropRules::from_toml_str(
            r#"
level = { type = "integer", values = [1, 2, 3] }
open = { values = [true] }
"#,
        )
        .unwrap();
        assert_eq!(
            rules.get("level").unwrap().allowed,
            Some(vec!["1".to_string(), "2".to_string(), "3".to_string()])
        );
        assert_eq!(rules.get("open").unwrap().allowed, Some(vec!["true".to_string()]));

        let err = PropRules::from_toml_str(r#"pos = { values = [[1, 2]] }"#).unwrap_err();
        assert!(matches!(err, AtomicError::RuleParse(msg) if msg.contains("pos")));
    }

    #[test]
    fn test_detailed_rule_unknown_type() {
        let err = PropRules::from_toml_str(r#"color = { type = "rgb" }"#).unwrap_err();
        assert!(matches!(err, AtomicError::RuleParse(msg) if msg.contains("color")));
    }
}
