//! Catalog and Documentation Tests

use propconf::config::{KEYS, NAMESPACES, SettingKind, lookup, unknown_keys};
use propconf::{DocsConfig, Properties, catalog, generate_docs};
use serde_json::json;

#[test]
fn test_catalog_serializes_for_tooling() {
    let rows = serde_json::to_value(catalog()).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), KEYS.len());

    let block = rows
        .iter()
        .find(|r| r["key"] == "cairo.index.value.block.size")
        .unwrap();
    assert_eq!(block["type"], json!("size"));
    assert_eq!(block["default"], json!(256));
    assert_eq!(block["rule"], json!("ceil_pow2"));

    let bind = rows.iter().find(|r| r["key"] == "http.bind.to").unwrap();
    assert_eq!(bind["type"], json!("bind"));
    assert_eq!(bind["default"], json!("0.0.0.0:9000"));
    assert!(bind.get("rule").is_none());
}

#[test]
fn test_every_key_belongs_to_a_namespace() {
    for meta in catalog() {
        assert!(NAMESPACES.contains(&meta.namespace()), "{}", meta.key);
        assert!(!meta.description.is_empty(), "{}", meta.key);
    }
}

#[test]
fn test_lookup() {
    let meta = lookup("line.udp.join").unwrap();
    assert_eq!(meta.kind, SettingKind::Ipv4);
    assert_eq!(meta.namespace(), "line.udp");
    assert!(lookup("line.udp.nope").is_none());
}

#[test]
fn test_unknown_keys_only_inside_owned_namespaces() {
    let props = Properties::parse(
        "http.worker.count=2\n\
         http.wroker.count=2\n\
         cairo.sql.cache.rows=1\n\
         pg.enabled=true\n\
         httpx.thing=1\n",
    );

    assert_eq!(
        unknown_keys(&props),
        vec!["cairo.sql.cache.rows".to_string(), "http.wroker.count".to_string()]
    );
}

#[test]
fn test_generated_reference() {
    let docs = generate_docs(DocsConfig::new().with_title("Reference"));

    assert!(docs.starts_with("# Reference"));
    for ns in NAMESPACES {
        assert!(docs.contains(&format!("## `{ns}`")), "{ns}");
    }
    assert!(docs.contains("| `http.worker.count` | int | `2` |"));
    assert!(docs.contains("| `cairo.default.map.type` | string | `fast` |"));
}
