//! Validation of component props against their rules

use crate::rules::{scalar_text, PropRules, PropType};
use atomic_core::{value_type_name, Props, Value};
use log::trace;

/// Outcome of validating one component's props
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Verdict {
    pub valid: bool,
    pub messages: Vec<String>,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            valid: true,
            messages: Vec::new(),
        }
    }

    /// A verdict is valid exactly when there is nothing to report
    pub fn from_messages(messages: Vec<String>) -> Self {
        Self {
            valid: messages.is_empty(),
            messages,
        }
    }
}

/// The validation collaborator consulted by the builder
pub trait PropValidator: Send + Sync {
    fn validate(&self, data: &Props, rules: &PropRules) -> Verdict;
}

/// Default validator that understands [`PropRules`]
///
/// Every rule is checked; messages come out in prop-name order. Props that
/// have no rule are accepted as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl PropValidator for SchemaValidator {
    fn validate(&self, data: &Props, rules: &PropRules) -> Verdict {
        let mut messages = Vec::new();

        for (prop, spec) in rules.iter() {
            match data.get(prop) {
                None if spec.required => {
                    messages.push(format!("The {} prop is required.", prop));
                }
                None => {}
                Some(value) => {
                    check_value(prop, &spec.prop_type, value, spec.min, spec.max, &mut messages);
                    if let Some(allowed) = &spec.allowed {
                        check_allowed(prop, value, allowed, &mut messages);
                    }
                }
            }
        }

        for prop in data.keys().filter(|p| rules.get(p).is_none()) {
            trace!("Prop '{}' has no rule", prop);
        }

        Verdict::from_messages(messages)
    }
}

fn check_value(
    prop: &str,
    prop_type: &PropType,
    value: &Value,
    min: Option<f64>,
    max: Option<f64>,
    messages: &mut Vec<String>,
) {
    match (prop_type, value) {
        (PropType::Any, Value::Integer(n)) | (PropType::Integer, Value::Integer(n)) => {
            check_range(prop, *n as f64, "", min, max, messages)
        }
        (PropType::Any, Value::Float(n)) | (PropType::Float, Value::Float(n)) => {
            check_range(prop, *n, "", min, max, messages)
        }
        (PropType::Float, Value::Integer(n)) => check_range(prop, *n as f64, "", min, max, messages),
        (PropType::Any, Value::String(s)) | (PropType::String, Value::String(s)) => {
            check_range(prop, s.chars().count() as f64, " characters", min, max, messages)
        }
        (PropType::Any, Value::Array(items)) => {
            check_range(prop, items.len() as f64, " items", min, max, messages)
        }
        (PropType::Array { element }, Value::Array(items)) => {
            check_range(prop, items.len() as f64, " items", min, max, messages);
            for (i, item) in items.iter().enumerate() {
                check_value(&format!("{}[{}]", prop, i), element, item, None, None, messages);
            }
        }
        (PropType::Any, _) | (PropType::Bool, Value::Boolean(_)) | (PropType::Table, Value::Table(_)) => {}
        _ => messages.push(format!(
            "The {} prop must be of type {}, got {}.",
            prop,
            prop_type.type_name(),
            value_type_name(value)
        )),
    }
}

fn check_allowed(prop: &str, value: &Value, allowed: &[String], messages: &mut Vec<String>) {
    let accepted = scalar_text(value).map_or(false, |text| allowed.contains(&text));
    if !accepted {
        messages.push(format!("The {} prop must be one of: {}.", prop, allowed.join(", ")));
    }
}

fn check_range(
    prop: &str,
    measure: f64,
    unit: &str,
    min: Option<f64>,
    max: Option<f64>,
    messages: &mut Vec<String>,
) {
    if let Some(min) = min {
        if measure < min {
            messages.push(format!("The {} prop must be at least {}{}.", prop, min, unit));
        }
    }
    if let Some(max) = max {
        if measure > max {
            messages.push(format!("The {} prop may not be greater than {}{}.", prop, max, unit));
        }
    }
}
