//! Tests for logging functionality
//!
//! A process can install one global subscriber, so most calls here only
//! check that initialisation does not panic.

use procxd::core::logging::{init_logging, LogFormat};

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert!(variants.contains(&"compact"));
    assert!(variants.contains(&"pretty"));
    assert!(variants.contains(&"json"));
}

#[test]
fn test_init_logging_levels_and_formats() {
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("warn"), Some("pretty"));
    let _ = init_logging(Some("off"), Some("json"));
    let _ = init_logging(None, None);
}

#[test]
fn test_init_logging_invalid_format() {
    let result = init_logging(Some("info"), Some("invalid_format"));
    assert!(result.is_err());
}

#[test]
fn test_rendering_with_subscriber_installed() {
    let _ = init_logging(Some("trace"), Some("compact"));
    let output = procxd::render_config(&serde_json::json!({"a": {"b": 1}}), "cfg");
    assert!(output.is_ok());
}

#[test]
fn test_failed_render_logs_and_returns_error() {
    let _ = init_logging(Some("debug"), Some("json"));
    let mut graph = procxd::GraphDatabase::new();
    graph.add_simple_node("a").unwrap();
    assert!(graph.add_simple_edge("a", "missing").is_err());
    assert!(procxd::render_config(&serde_json::json!("scalar"), "cfg").is_err());
}
