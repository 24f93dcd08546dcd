//! Recursive prop validation over a component tree

use crate::component::Component;
use atomic_core::{AtomicError, Result};
use atomic_schema::PropValidator;
use log::trace;

/// Pre-order, fail-fast validator for component trees
pub struct Builder<'a> {
    validator: &'a dyn PropValidator,
    visited: usize,
}

impl<'a> Builder<'a> {
    pub fn new(validator: &'a dyn PropValidator) -> Self {
        Self {
            validator,
            visited: 0,
        }
    }

    /// Validate a component, then each of its children in order.
    ///
    /// Stops at the first component whose props fail. Included trees are
    /// skipped, they were validated when their own entity executed.
    pub fn build(&mut self, component: &Component) -> Result<&mut Self> {
        let verdict = self
            .validator
            .validate(&component.properties(), &component.rules());

        trace!(
            "Validated {} at depth {}: {}",
            component.name(),
            component.depth(),
            if verdict.valid { "ok" } else { "failed" }
        );

        if !verdict.valid {
            return Err(AtomicError::PropValidation {
                component: component.name(),
                messages: verdict.messages,
            });
        }
        self.visited += 1;

        for child in component.children() {
            if child.is_grafted() {
                continue;
            }
            self.build(&child)?;
        }

        Ok(self)
    }

    /// Number of components that passed validation
    pub fn visited(&self) -> usize {
        self.visited
    }
}
