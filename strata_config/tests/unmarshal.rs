//! Shape-binding coverage for `PropertyStore::unmarshal_key`.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use strata_config::{PropertyStore, StrataError, Value, expand, flatten};

#[derive(Debug, Deserialize, PartialEq)]
struct Server {
    host: String,
    port: u16,
    #[serde(default)]
    replicas: Vec<String>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Net {
    #[serde(alias = "addr")]
    address: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Release {
    launched: DateTime<Utc>,
}

fn store() -> PropertyStore {
    let tree = Value::from_entries([
        ("title", Value::from("demo")),
        (
            // Mixed-case keys must still bind: matching is case-insensitive.
            "Server",
            Value::from_entries([
                ("Host", Value::from("127.0.0.1")),
                ("PORT", Value::from(8080)),
                (
                    "replicas",
                    Value::from(vec![Value::from("r1"), Value::from("r2")]),
                ),
            ]),
        ),
        ("net", Value::from_entries([("Addr", Value::from("10.1.1.1"))])),
        (
            "release",
            Value::from_entries([(
                "launched",
                Value::Timestamp(
                    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
                        .single()
                        .expect("valid timestamp"),
                ),
            )]),
        ),
        (
            "upstreams",
            Value::from(vec![
                Value::from_entries([("host", Value::from("a")), ("port", Value::from(1))]),
                Value::from_entries([("host", Value::from("b")), ("port", Value::from(2))]),
            ]),
        ),
    ]);
    PropertyStore::new(expand(flatten(&tree)))
}

#[test]
#[expect(
    clippy::panic_in_result_fn,
    reason = "assertions give clearer intent than error mapping here"
)]
fn binds_a_map_subtree_with_case_insensitive_fields() -> anyhow::Result<()> {
    let server: Server = store().unmarshal_key("Server")?;
    assert_eq!(
        server,
        Server {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            replicas: vec!["r1".to_owned(), "r2".to_owned()],
        }
    );
    Ok(())
}

#[test]
#[expect(
    clippy::panic_in_result_fn,
    reason = "assertions give clearer intent than error mapping here"
)]
fn declared_aliases_take_precedence() -> anyhow::Result<()> {
    let net: Net = store().unmarshal_key("net")?;
    assert_eq!(net.address, "10.1.1.1");
    Ok(())
}

#[test]
fn timestamps_bind_onto_datetime_fields() {
    let release: Release = store().unmarshal_key("release").expect("shape matches");
    assert_eq!(release.launched.timestamp(), 1_709_294_400);
}

#[test]
fn binds_a_list_subtree() {
    let upstreams: Vec<Server> = store().unmarshal_key("upstreams").expect("shape matches");
    assert_eq!(upstreams.len(), 2);
    assert_eq!(upstreams[1].host, "b");
}

#[test]
fn incompatible_subtree_is_a_shape_mismatch() {
    let err = store()
        .unmarshal_key::<Server>("title")
        .expect_err("a string cannot bind onto a struct");
    assert!(matches!(err, StrataError::ShapeMismatch { key, .. } if key == "title"));
}

#[test]
fn absent_key_is_a_shape_mismatch() {
    let err = store()
        .unmarshal_key::<Server>("nope")
        .expect_err("absent keys fail loudly");
    assert!(matches!(err, StrataError::ShapeMismatch { key, .. } if key == "nope"));
}
