//! Entity rendering command

use super::load_factory;
use crate::templates::TemplateRenderer;
use anyhow::{Context, Result};

pub struct RenderArgs {
    pub reference: String,
    pub config: String,
    pub with: Vec<(String, toml::Value)>,
    pub view: Option<String>,
}

pub fn run(args: RenderArgs) -> Result<()> {
    let (factory, config) = load_factory(&args.config)?;
    let renderer = TemplateRenderer::new(config.template);

    let mut entity = factory
        .make(&args.reference, None)
        .with_context(|| format!("Cannot make entity '{}'", args.reference))?;
    for (key, value) in args.with {
        entity.with(key, value);
    }

    let output = entity
        .render(&renderer, args.view.as_deref())
        .with_context(|| format!("Failed to render '{}'", args.reference))?;
    println!("{}", output);

    Ok(())
}
