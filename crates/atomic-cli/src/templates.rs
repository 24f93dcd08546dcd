//! Placeholder template renderer
//!
//! Templates come from the `[template]` table of the configuration.
//! `{name}` is replaced by the prop `name`, `{children}` by the rendered
//! children. Entity templates see `{data.key}`, `{entity}`, `{action}`,
//! `{validated}` and `{children}` (the rendered root).

use atomic_compose::{ComponentContext, EntityContext, ViewRenderer, DEFAULT_ENTITY_VIEW};
use atomic_core::{AtomicError, Result, Value};
use std::collections::BTreeMap;

pub struct TemplateRenderer {
    templates: BTreeMap<String, String>,
}

impl TemplateRenderer {
    pub fn new(templates: BTreeMap<String, String>) -> Self {
        Self { templates }
    }

    fn template(&self, view: &str) -> Result<&str> {
        self.templates
            .get(view)
            .map(String::as_str)
            .ok_or_else(|| AtomicError::Render(format!("Template not found: {}", view)))
    }
}

impl ViewRenderer for TemplateRenderer {
    fn render_component(&self, view: &str, ctx: &ComponentContext<'_>) -> Result<String> {
        substitute(self.template(view)?, |key| match key {
            "children" => ctx.component.render_children(self).map(Some),
            _ => Ok(ctx.properties.get(key).map(display_value)),
        })
    }

    fn render_entity(&self, view: &str, ctx: &EntityContext<'_>) -> Result<String> {
        let template = match self.template(view) {
            Ok(template) => template,
            // No layout configured: the entity renders as its tree
            Err(_) if view == DEFAULT_ENTITY_VIEW => "{children}",
            Err(e) => return Err(e),
        };

        substitute(template, |key| match key {
            "children" => ctx.component.render(self).map(Some),
            "entity" => Ok(Some(ctx.entity.entity_name().to_string())),
            "action" => Ok(Some(ctx.entity.action().to_string())),
            "validated" => Ok(Some(ctx.validated.to_string())),
            _ => Ok(key
                .strip_prefix("data.")
                .and_then(|k| ctx.data.get(k))
                .map(display_value)),
        })
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_key(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// Replace `{key}` placeholders; braces around anything else are kept literally
fn substitute(
    template: &str,
    mut lookup: impl FnMut(&str) -> Result<Option<String>>,
) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('}') {
            Some(end) if is_key(&after[..end]) => {
                if let Some(value) = lookup(&after[..end])? {
                    out.push_str(&value);
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}
