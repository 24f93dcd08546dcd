//! Atomic Schema - Prop rules and validation
//!
//! This crate defines the rules a component type declares for its props and
//! the validation collaborator the builder consults for every node.

mod rules;
mod validation;

pub use rules::{DetailedRule, PropRules, PropType, RuleDefinition, RuleSpec};
pub use validation::{PropValidator, SchemaValidator, Verdict};
