//! Entity validation command

use super::load_factory;
use anyhow::{Context, Result};
use atomic_compose::Component;
use atomic_core::AtomicError;
use serde_json::json;

pub struct ValidateArgs {
    pub reference: String,
    pub config: String,
    pub with: Vec<(String, toml::Value)>,
    pub format: String,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let (factory, _config) = load_factory(&args.config)?;

    let mut entity = factory
        .make(&args.reference, None)
        .with_context(|| format!("Cannot make entity '{}'", args.reference))?;
    for (key, value) in args.with {
        entity.with(key, value);
    }

    match entity.execute() {
        Ok(entity) => {
            let root = entity.component()?;
            if args.format == "json" {
                let report = json!({
                    "entity": args.reference,
                    "valid": true,
                    "validated": entity.validated_count(),
                    "tree": tree_json(&root),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!(
                    "{} is valid ({} component(s) validated).",
                    args.reference,
                    entity.validated_count()
                );
                println!();
                print!("{}", root.outline());
            }
            Ok(())
        }
        Err(AtomicError::PropValidation {
            component,
            messages,
        }) => {
            if args.format == "json" {
                let report = json!({
                    "entity": args.reference,
                    "valid": false,
                    "component": component,
                    "messages": messages,
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{} is invalid.", args.reference);
                println!();
                println!("  ERROR  {}", component);
                for message in &messages {
                    println!("         {}", message);
                }
            }
            std::process::exit(1);
        }
        Err(e) => Err(e).with_context(|| format!("Failed to execute '{}'", args.reference)),
    }
}

fn tree_json(component: &Component) -> serde_json::Value {
    let children: Vec<serde_json::Value> = component.children().iter().map(tree_json).collect();
    json!({
        "name": component.name(),
        "props": component.properties(),
        "included": component.is_grafted(),
        "children": children,
    })
}
