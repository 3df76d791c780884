//! Unit tests for CLI commands

#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::cli::{execute, parse_arg, Cli, Commands};
use clap::Parser;
use serde_json::json;
use std::io::Write;

#[test]
fn test_coerce_command_parses() {
    let cli = Cli::try_parse_from([
        "restmodels",
        "coerce",
        "--type",
        "list[int]",
        "--json",
        "[\"1\"]",
    ])
    .unwrap();

    match cli.command {
        Commands::Coerce {
            type_expr, json, ..
        } => {
            assert_eq!(type_expr, "list[int]");
            assert_eq!(json.as_deref(), Some("[\"1\"]"));
        }
        _ => panic!("Expected Coerce command"),
    }
}

#[test]
fn test_coerce_requires_an_input() {
    assert!(Cli::try_parse_from(["restmodels", "coerce", "--type", "int"]).is_err());
    assert!(Cli::try_parse_from([
        "restmodels",
        "coerce",
        "--type",
        "int",
        "--json",
        "1",
        "--input",
        "x.json"
    ])
    .is_err());
}

#[test]
fn test_call_command_collects_repeated_flags() {
    let cli = Cli::try_parse_from([
        "restmodels",
        "--log-level",
        "debug",
        "call",
        "--method",
        "post",
        "--path",
        "/pets/{id}",
        "--arg",
        "id=42",
        "--arg",
        "name=rex",
        "--body",
        "name",
        "--flat",
    ])
    .unwrap();

    assert_eq!(cli.log_level.as_deref(), Some("debug"));
    match cli.command {
        Commands::Call {
            method,
            args,
            body,
            flat,
            type_expr,
            ..
        } => {
            assert_eq!(method, "post");
            assert_eq!(
                args,
                vec![
                    ("id".to_string(), json!(42)),
                    ("name".to_string(), json!("rex"))
                ]
            );
            assert_eq!(body, vec!["name".to_string()]);
            assert!(flat);
            assert_eq!(type_expr, "None");
        }
        _ => panic!("Expected Call command"),
    }
}

#[test]
fn test_parse_arg() {
    assert_eq!(parse_arg("n=5").unwrap(), ("n".to_string(), json!(5)));
    assert_eq!(parse_arg("tags=[1,2]").unwrap(), ("tags".to_string(), json!([1, 2])));
    assert_eq!(parse_arg("q=plain text").unwrap(), ("q".to_string(), json!("plain text")));
    assert!(parse_arg("novalue").is_err());
    assert!(parse_arg("=5").is_err());
}

#[test]
fn test_execute_coerce_inline() {
    let command = Commands::Coerce {
        type_expr: "tuple[datetime, int]".to_string(),
        json: Some(r#"["2023-10-22T19:50:29", "5"]"#.to_string()),
        input: None,
    };
    assert_eq!(
        execute(&command).unwrap(),
        json!(["2023-10-22T19:50:29", 5])
    );
}

#[test]
fn test_execute_coerce_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "[[\"1\", \"2\"], [\"3\"]]").unwrap();
    let command = Commands::Coerce {
        type_expr: "list[list[int]]".to_string(),
        json: None,
        input: Some(file.path().to_path_buf()),
    };
    assert_eq!(execute(&command).unwrap(), json!([[1, 2], [3]]));
}

#[test]
fn test_execute_reports_coercion_failure() {
    let command = Commands::Coerce {
        type_expr: "bytes".to_string(),
        json: Some("5".to_string()),
        input: None,
    };
    let err = execute(&command).unwrap_err();
    assert!(format!("{err:#}").contains("only str sources are accepted"));
}

#[test]
fn test_execute_rejects_bad_type_expression() {
    let command = Commands::Coerce {
        type_expr: "list[int".to_string(),
        json: Some("[]".to_string()),
        input: None,
    };
    assert!(execute(&command).is_err());
}
