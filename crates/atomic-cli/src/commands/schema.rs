//! Component rule introspection command

use super::load_factory;
use anyhow::Result;
use atomic_schema::{PropType, RuleSpec};

pub fn run(name: &str, config_path: &str) -> Result<()> {
    let (factory, config) = load_factory(config_path)?;
    let registry = factory.components();

    if registry.has(name) {
        let ty = registry.resolve(name)?;
        println!("Component: {}", name);
        if let Some(desc) = ty.description() {
            println!("Description: {}", desc);
        }
        match config.component.get(name).and_then(|c| c.view.as_deref()) {
            Some(view) => println!("View: {}", view),
            None => println!("View: (composite)"),
        }
        println!();

        let rules = ty.rules();
        if rules.is_empty() {
            println!("No prop rules.");
            return Ok(());
        }

        println!("Props:");
        for (prop, spec) in rules.iter() {
            println!("  {} : {}", prop, format_rule(spec));
            if let Some(desc) = &spec.description {
                println!("    # {}", desc);
            }
        }

        return Ok(());
    }

    println!("Component '{}' not found.", name);
    println!();

    let names = registry.names();
    if !names.is_empty() {
        println!("Available components:");
        for c in names {
            println!("  - {}", c);
        }
    }

    let entities = factory.entity_names();
    if !entities.is_empty() {
        println!();
        println!("Available entities:");
        for e in entities {
            let actions = factory
                .entity_type(e)
                .map(|t| t.action_names().join(", "))
                .unwrap_or_default();
            println!("  - {} ({})", e, actions);
        }
    }

    Ok(())
}

fn format_rule(spec: &RuleSpec) -> String {
    let mut out = format_prop_type(&spec.prop_type);
    if let Some(allowed) = &spec.allowed {
        out.push_str(&format!(" in [{}]", allowed.join(", ")));
    }
    if spec.required {
        out.push_str(" (required)");
    }
    if spec.min.is_some() || spec.max.is_some() {
        let min = spec.min.map(|v| v.to_string()).unwrap_or_default();
        let max = spec.max.map(|v| v.to_string()).unwrap_or_default();
        out.push_str(&format!(" [{} .. {}]", min, max));
    }
    out
}

fn format_prop_type(ty: &PropType) -> String {
    match ty {
        PropType::Array { element } => format!("array<{}>", format_prop_type(element)),
        other => other.type_name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rule() {
        let spec = RuleSpec::parse("required|in:sm,lg").unwrap();
        assert_eq!(format_rule(&spec), "any in [sm, lg] (required)");

        let spec = RuleSpec::parse("in:1,2|integer").unwrap();
        assert_eq!(format_rule(&spec), "integer in [1, 2]");

        let spec = RuleSpec::parse("string|min:2|max:8").unwrap();
        assert_eq!(format_rule(&spec), "string [2 .. 8]");

        let spec = RuleSpec::new(PropType::Array {
            element: Box::new(PropType::Integer),
        });
        assert_eq!(format_rule(&spec), "array<integer>");
    }
}
