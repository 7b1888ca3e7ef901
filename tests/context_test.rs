use std::ffi::OsString;
use std::fs;

use confsync::context::ConfigContext;
use confsync::error::Error;
use serde_json::json;
use tempfile::TempDir;

fn env(pairs: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
    pairs.iter().map(|(k, v)| (OsString::from(k), OsString::from(v))).collect()
}

#[test]
fn test_load_nested_document() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yml");
    fs::write(
        &path,
        "Master: true\nTcpPort: 4589\nServers:\n  - host: a\n  - host: b\nLimits:\n  cpu: 1.5\n",
    )
    .unwrap();

    let context = ConfigContext::load(&path).unwrap();
    assert_eq!(context.lookup("Master").unwrap(), &json!(true));
    assert_eq!(context.lookup(".TcpPort").unwrap(), &json!(4589));
    assert_eq!(context.lookup("Servers.1.host").unwrap(), &json!("b"));
    assert_eq!(context.lookup("Limits.cpu").unwrap(), &json!(1.5));
}

#[test]
fn test_lookup_root_and_missing_paths() {
    let context = ConfigContext::from_yaml("a:\n  b: [1, 2]\n").unwrap();

    assert_eq!(context.lookup(".").unwrap(), context.as_value());
    assert_eq!(context.lookup("").unwrap(), context.as_value());

    for missing in ["missing", "a.c", "a.b.2", "a.b.x", "a.b.0.deeper"] {
        match context.lookup(missing) {
            Err(Error::UndefinedValueError { path }) => assert_eq!(path, missing),
            other => panic!("Expected UndefinedValueError for {}, got {:?}", missing, other),
        }
    }
}

#[test]
fn test_empty_document_is_an_empty_mapping() {
    let context = ConfigContext::from_yaml("").unwrap();
    assert_eq!(context.as_value(), &json!({}));
}

#[test]
fn test_non_mapping_root_is_rejected() {
    assert!(ConfigContext::from_yaml("- a\n- b\n").is_err());
    assert!(ConfigContext::from_yaml("just a string").is_err());
}

#[test]
fn test_load_errors() {
    let temp_dir = TempDir::new().unwrap();

    let missing = ConfigContext::load(temp_dir.path().join("missing.yml"));
    assert!(matches!(missing, Err(Error::ConfigLoadError { .. })));

    let broken = temp_dir.path().join("broken.yml");
    fs::write(&broken, "key: [unterminated\n").unwrap();
    match ConfigContext::load(&broken) {
        Err(Error::ConfigLoadError { path, .. }) => assert_eq!(path, broken.display().to_string()),
        other => panic!("Expected ConfigLoadError, got {:?}", other),
    }
}

#[test]
fn test_with_env_adds_sorted_mapping() {
    let context = ConfigContext::from_yaml("Port: 1\n")
        .unwrap()
        .with_env(env(&[("ZED", "last"), ("HOME", "/root")]));

    assert_eq!(context.lookup("Port").unwrap(), &json!(1));
    assert_eq!(context.lookup("Env.HOME").unwrap(), &json!("/root"));
    let names: Vec<&String> = context.lookup("Env").unwrap().as_object().unwrap().keys().collect();
    assert_eq!(names, ["HOME", "ZED"]);
}

#[test]
fn test_with_env_replaces_document_key() {
    let context = ConfigContext::from_yaml("Env: from-file\n")
        .unwrap()
        .with_env(env(&[("USER", "ops")]));
    assert_eq!(context.lookup("Env").unwrap(), &json!({"USER": "ops"}));
}

#[test]
fn test_mapping_order_is_preserved() {
    let context = ConfigContext::from_yaml("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
    let keys: Vec<&String> = context.as_value().as_object().unwrap().keys().collect();
    assert_eq!(keys, ["zeta", "alpha", "mid"]);
}
