use crate::binding::{BodyStyle, CallArgs, Endpoint, Resource};
use crate::coercion::Coercer;
use crate::config::ClientConfig;
use crate::descriptor::DeclaredType;
use crate::logging::{init_logging_with_config, LogConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use http::Method;
use serde_json::Value;
use std::path::PathBuf;

/// Command-line interface for restmodels
///
/// Coerces JSON values into declared types and performs one-off bound
/// endpoint calls.
#[derive(Parser, Debug)]
#[command(name = "restmodels")]
#[command(about = "Typed REST response coercion", long_about = None, version)]
pub struct Cli {
    /// Log level: trace/debug/info/warn/error (logging is off when unset)
    #[arg(long, global = true, env = "RESTMODELS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Coerce a JSON value into a declared type and print the result as JSON
    Coerce {
        /// Type expression, e.g. `list[tuple[datetime, int]]` or `int | str`
        #[arg(short = 't', long = "type")]
        type_expr: String,

        /// Inline JSON input
        #[arg(long, conflicts_with = "input", required_unless_present = "input")]
        json: Option<String>,

        /// File holding the JSON input
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Call one endpoint and print the coerced response as JSON
    Call {
        /// YAML file with a `client:` section (default: environment only)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// HTTP verb
        #[arg(short, long, default_value = "GET")]
        method: String,

        /// Path template, e.g. `/pets/{id}`
        #[arg(short, long)]
        path: String,

        /// Declared return type expression
        #[arg(short = 't', long = "type", default_value = "None")]
        type_expr: String,

        /// Call argument as `name=value`; the value is parsed as JSON and
        /// falls back to a plain string (repeatable)
        #[arg(long = "arg", value_parser = parse_arg)]
        args: Vec<(String, Value)>,

        /// Name of an argument that goes into the body (repeatable)
        #[arg(long = "body")]
        body: Vec<String>,

        /// Send the single body argument as a flat string body
        #[arg(long, default_value_t = false)]
        flat: bool,
    },
}

/// Parse `name=value` into a call argument.
pub fn parse_arg(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("missing argument name in '{raw}'"));
    }
    let value =
        serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

fn parse_type(type_expr: &str) -> Result<DeclaredType> {
    type_expr
        .parse()
        .with_context(|| format!("Invalid type expression '{type_expr}'"))
}

/// Run one command and return its JSON output.
pub fn execute(command: &Commands) -> Result<Value> {
    match command {
        Commands::Coerce {
            type_expr,
            json,
            input,
        } => {
            let declared = parse_type(type_expr)?;
            let text = match (json, input) {
                (Some(json), _) => json.clone(),
                (None, Some(path)) => std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read input file {}", path.display()))?,
                (None, None) => anyhow::bail!("either --json or --input is required"),
            };
            let value: Value = serde_json::from_str(&text).context("Input is not valid JSON")?;
            let coerced = Coercer::default().coerce(value, &declared)?;
            Ok(coerced.to_json())
        }
        Commands::Call {
            config,
            method,
            path,
            type_expr,
            args,
            body,
            flat,
        } => {
            let config = match config {
                Some(file) => ClientConfig::load(file)?,
                None => ClientConfig::from_env()?,
            };
            let method = Method::from_bytes(method.to_uppercase().as_bytes())
                .with_context(|| format!("Invalid HTTP method '{method}'"))?;
            let style = if *flat {
                BodyStyle::Flat
            } else {
                BodyStyle::Embedded
            };
            let endpoint = Endpoint::builder(method, path.clone())
                .body(body.iter().cloned())
                .body_style(style)
                .returns(parse_type(type_expr)?)
                .build()?;
            let resource = Resource::http(&config)?;
            let args: CallArgs = args.iter().cloned().collect();
            let coerced = endpoint.call(&resource, args)?;
            Ok(coerced.to_json())
        }
    }
}

/// Entry point of the `restmodels` binary.
pub fn run_cli(cli: Cli) -> Result<()> {
    if let Some(level) = &cli.log_level {
        let config = LogConfig {
            log_level: level.clone(),
            ..LogConfig::from_env()
        };
        init_logging_with_config(&config)?;
    }
    let output = execute(&cli.command)?;
    let text = serde_json::to_string_pretty(&output).context("Failed to render output")?;
    println!("{text}");
    Ok(())
}
