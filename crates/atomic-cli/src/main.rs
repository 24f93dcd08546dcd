//! Atomic CLI - Inspect, validate and render component trees

mod commands;
mod templates;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{render, schema, validate};

#[derive(Parser)]
#[command(name = "atomic")]
#[command(about = "Compose, validate and render component trees", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the rules of a component
    Schema {
        /// Component name
        name: String,

        /// Path to a configuration file or directory
        #[arg(long, default_value = "atomic.toml")]
        config: String,
    },

    /// Execute an entity and report whether its tree is valid
    Validate {
        /// Entity reference (e.g., "Home@show")
        reference: String,

        /// Path to a configuration file or directory
        #[arg(long, default_value = "atomic.toml")]
        config: String,

        /// Entity data as key=value (repeatable)
        #[arg(long = "with", value_parser = parse_data_pair)]
        with: Vec<(String, toml::Value)>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Execute an entity and render it with the configured templates
    Render {
        /// Entity reference (e.g., "Home@show")
        reference: String,

        /// Path to a configuration file or directory
        #[arg(long, default_value = "atomic.toml")]
        config: String,

        /// Entity data as key=value (repeatable)
        #[arg(long = "with", value_parser = parse_data_pair)]
        with: Vec<(String, toml::Value)>,

        /// View to render the entity with
        #[arg(long)]
        view: Option<String>,
    },
}

/// Parse `key=value`; the value is read as a TOML value, falling back to a string
fn parse_data_pair(s: &str) -> Result<(String, toml::Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }

    let value = toml::from_str::<toml::Table>(&format!("v = {}", raw))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| toml::Value::String(raw.to_string()));

    Ok((key.to_string(), value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match cli.command {
        Commands::Schema { name, config } => schema::run(&name, &config),
        Commands::Validate {
            reference,
            config,
            with,
            format,
        } => validate::run(validate::ValidateArgs {
            reference,
            config,
            with,
            format,
        }),
        Commands::Render {
            reference,
            config,
            with,
            view,
        } => render::run(render::RenderArgs {
            reference,
            config,
            with,
            view,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_pair() {
        assert_eq!(
            parse_data_pair("count=3").unwrap(),
            ("count".to_string(), toml::Value::Integer(3))
        );
        assert_eq!(
            parse_data_pair("title=Hello world").unwrap(),
            ("title".to_string(), toml::Value::String("Hello world".to_string()))
        );
        assert_eq!(
            parse_data_pair("quoted=\"x=y\"").unwrap(),
            ("quoted".to_string(), toml::Value::String("x=y".to_string()))
        );
        assert!(parse_data_pair("novalue").is_err());
        assert!(parse_data_pair("=3").is_err());
    }
}
