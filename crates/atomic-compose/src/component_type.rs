//! Component type definitions

use crate::component::Component;
use atomic_schema::PropRules;

/// How a component produces its output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Render through the external template renderer under this name
    Template(String),
    /// Literal markup, used as-is
    Markup(String),
    /// Concatenate the output of every child, in order
    Composite,
}

/// A constructible kind of component, registered under a name
///
/// Types are shared across every tree built from the same factory, so they
/// hold no per-instance state. Everything per-instance lives in the props.
pub trait ComponentType: Send + Sync {
    /// Rules the props of every instance must satisfy
    fn rules(&self) -> PropRules {
        PropRules::new()
    }

    /// The view for one instance
    fn view(&self, _component: &Component) -> View {
        View::Composite
    }

    fn description(&self) -> Option<&str> {
        None
    }
}

/// A type with no rules that renders as the concatenation of its children.
///
/// Entity roots are of this type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Composite;

impl ComponentType for Composite {}
