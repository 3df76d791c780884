//! # CLI Module
//!
//! Command-line front end of the `restmodels` binary.
//!
//! ## Commands
//!
//! ### `coerce`
//!
//! Coerce a JSON value into a declared type:
//!
//! ```bash
//! restmodels coerce --type 'list[tuple[datetime, int]]' \
//!     --json '[["2023-10-22T19:50:29", "5"]]'
//! ```
//!
//! Options:
//! - `--type <EXPR>` - Type expression (required)
//! - `--json <TEXT>` - Inline JSON input
//! - `--input <FILE>` - Read the JSON input from a file
//!
//! ### `call`
//!
//! Call one endpoint and coerce its response:
//!
//! ```bash
//! restmodels call --config client.yaml --method GET \
//!     --path '/pets/{id}' --arg id=42 --type 'Optional[str]'
//! ```
//!
//! Options:
//! - `--config <FILE>` - YAML file with a `client:` section (default: environment)
//! - `--method <VERB>` - HTTP verb (default: GET)
//! - `--path <TEMPLATE>` - Path template (required)
//! - `--type <EXPR>` - Declared return type (default: None)
//! - `--arg name=value` - Call argument, repeatable
//! - `--body <NAME>` - Argument sent in the body, repeatable
//! - `--flat` - Send the single body argument as a flat string
//!
//! The global `--log-level` flag turns on structured logging to stderr.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use restmodels::cli::{Cli, run_cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{execute, parse_arg, run_cli, Cli, Commands};
