//! Integration tests for the `Config::load_with` pipeline.
//!
//! TOML file -> `${VAR}` expansion -> environment overrides -> validation.
//! Variables are resolved through a closure so tests never touch the real
//! process environment. Each test uses its own file path.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use catalyst::config::{Config, ConfigError};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

fn write_config(name: &str, content: &str) -> String {
    let path = std::env::temp_dir().join(name);
    fs::write(&path, content).expect("Failed to write temp config");
    path.display().to_string()
}

#[test]
fn test_file_values_are_loaded() {
    let path = write_config(
        "catalyst_cfg_file_values.toml",
        r#"
[server]
listen = "127.0.0.1:18080"

[upstream]
url = "https://upstream.test/api/chat"
timeout_secs = 12

[models]
default = "claude"
available = ["gpt4", "claude"]

[models.routes]
claude = "claude-3"
"#,
    );

    let config = Config::load_with(Some(Path::new(&path)), lookup(&[])).unwrap();
    assert_eq!(config.server.listen, "127.0.0.1:18080");
    assert_eq!(config.upstream.url, "https://upstream.test/api/chat");
    assert_eq!(config.upstream.timeout_secs, 12);
    assert_eq!(config.models.default, "claude");
    assert_eq!(
        config.models.routes.get("claude").map(String::as_str),
        Some("claude-3")
    );

    fs::remove_file(&path).ok();
}

#[test]
fn test_url_placeholders_are_expanded() {
    let path = write_config(
        "catalyst_cfg_expand.toml",
        r#"
[upstream]
url = "https://${CATALYST_TEST_HOST}/u/${CATALYST_TEST_ACCOUNT}/api/chat"
"#,
    );

    let config = Config::load_with(
        Some(Path::new(&path)),
        lookup(&[
            ("CATALYST_TEST_HOST", "upstream.test"),
            ("CATALYST_TEST_ACCOUNT", "42"),
        ]),
    )
    .unwrap();
    assert_eq!(config.upstream.url, "https://upstream.test/u/42/api/chat");

    fs::remove_file(&path).ok();
}

#[test]
fn test_missing_placeholder_var_fails() {
    let path = write_config(
        "catalyst_cfg_missing_var.toml",
        r#"
[upstream]
url = "https://${CATALYST_TEST_UNSET_HOST}/api/chat"
"#,
    );

    let err = Config::load_with(Some(Path::new(&path)), lookup(&[])).unwrap_err();
    assert!(matches!(err, ConfigError::EnvVar { .. }));
    assert!(err.to_string().contains("CATALYST_TEST_UNSET_HOST"));

    fs::remove_file(&path).ok();
}

#[test]
fn test_env_overrides_win_over_file() {
    let path = write_config(
        "catalyst_cfg_env_override.toml",
        r#"
[upstream]
url = "https://file.test/api/chat"
timeout_secs = 30

[models]
default = "gpt4"
"#,
    );

    let config = Config::load_with(
        Some(Path::new(&path)),
        lookup(&[
            ("UPSTREAM_URL", "http://env.test/chat"),
            ("UPSTREAM_TIMEOUT_SECONDS", "3"),
            ("DEFAULT_MODEL", "FELO"),
        ]),
    )
    .unwrap();

    assert_eq!(config.upstream.url, "http://env.test/chat");
    assert_eq!(config.upstream.timeout_secs, 3);
    assert_eq!(config.models.default, "felo");

    fs::remove_file(&path).ok();
}

#[test]
fn test_env_override_to_invalid_url_fails_validation() {
    let result = Config::load_with(None, lookup(&[("UPSTREAM_URL", "not a url")]));
    assert!(matches!(result, Err(ConfigError::Validation(_))));
}

#[test]
fn test_malformed_toml_fails() {
    let path = write_config("catalyst_cfg_malformed.toml", "[upstream\nurl = ");

    let result = Config::load_with(Some(Path::new(&path)), lookup(&[]));
    assert!(matches!(result, Err(ConfigError::Parse(_))));

    fs::remove_file(&path).ok();
}
