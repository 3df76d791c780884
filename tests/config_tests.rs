#![allow(clippy::unwrap_used, clippy::expect_used)]

use restmodels::ClientConfig;
use std::io::Write;
use std::time::Duration;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_full_client_section() {
    let file = write_config(
        r#"
client:
  base_url: https://api.example.com/v2
  timeout_secs: 5
  user_agent: petstore-client/1.0
  default_headers:
    Accept: application/json
    X-Tenant: blue
"#,
    );
    let config = ClientConfig::load(file.path()).unwrap();

    assert_eq!(config.timeout(), Duration::from_secs(5));
    assert_eq!(config.user_agent.as_deref(), Some("petstore-client/1.0"));
    assert_eq!(config.default_headers.len(), 2);
    assert_eq!(config.default_headers["X-Tenant"], "blue");
    assert_eq!(
        config.base_url().unwrap().join("pets").unwrap().as_str(),
        "https://api.example.com/v2/pets"
    );
}

#[test]
fn test_load_ignores_unrelated_sections() {
    let file = write_config(
        r#"
logging:
  level: debug
client:
  base_url: http://localhost:8080
"#,
    );
    let config = ClientConfig::load(file.path()).unwrap();
    assert_eq!(config.timeout_secs, 30);
    assert!(config.user_agent.is_none());
    assert!(config.default_headers.is_empty());
}

#[test]
fn test_load_errors_name_the_file() {
    let missing = std::env::temp_dir().join("restmodels-no-such-config.yaml");
    let err = ClientConfig::load(&missing).unwrap_err();
    assert!(format!("{err:#}").contains("restmodels-no-such-config.yaml"));

    let file = write_config("client:\n  timeout_secs: 5\n");
    let err = ClientConfig::load(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("Failed to parse config file"));
}

#[test]
fn test_load_rejects_non_http_base_url() {
    let file = write_config("client:\n  base_url: file:///etc/passwd\n");
    assert!(ClientConfig::load(file.path()).is_err());
}

#[test]
fn test_overrides_from_lookup() {
    let mut config =
        ClientConfig::from_yaml("client:\n  base_url: http://localhost:8080\n").unwrap();
    config.apply_overrides(|key: &str| match key {
        "RESTMODELS_BASE_URL" => Some("http://staging.internal:9000".to_string()),
        "RESTMODELS_TIMEOUT_SECS" => Some("0x3c".to_string()),
        _ => None,
    });
    assert_eq!(config.base_url, "http://staging.internal:9000");
    assert_eq!(config.timeout(), Duration::from_secs(60));
}
