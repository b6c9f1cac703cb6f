//! Container integration tests: dotted-path access, aliasing, merge and the
//! serialization boundary.

use serde_json::json;
use tether::{Container, Value};

#[test]
fn test_set_then_get_round_trip() {
    let container = Container::new();

    container.set("a", 1i64).unwrap();
    container.set("nested.property", "nested value").unwrap();
    container.set("deep.er.still", true).unwrap();

    assert_eq!(container.get_as::<i64>("a"), Some(1));
    assert_eq!(
        container.get_as::<String>("nested.property"),
        Some("nested value".to_string())
    );
    assert_eq!(container.get_as::<bool>("deep.er.still"), Some(true));
}

#[test]
fn test_set_returns_previous_value() {
    let container = Container::new();

    assert_eq!(container.set("key", "original").unwrap(), None);
    let old = container.set("key", "modified").unwrap();
    assert_eq!(old, Some(Value::Text("original".to_string())));
}

#[test]
fn test_get_absent_is_distinct_from_null() {
    let container = Container::from_value(json!({"present": null})).unwrap();

    assert_eq!(container.get("present"), Some(Value::Null));
    assert_eq!(container.get("missing"), None);
    assert!(container.has("present"));
    assert!(!container.has("missing"));
}

#[test]
fn test_get_through_wrong_shape_is_absent() {
    let container = Container::from_value(json!({"scalar": 5, "list": [1, 2]})).unwrap();

    assert_eq!(container.get("scalar.below"), None);
    assert_eq!(container.get("list.key"), None);
    assert_eq!(container.get("list.7"), None);
}

#[test]
fn test_get_indexes_into_lists() {
    let container =
        Container::from_value(json!({"items": [{"name": "first"}, {"name": "second"}]})).unwrap();

    assert_eq!(
        container.get_as::<String>("items.1.name"),
        Some("second".to_string())
    );
    assert_eq!(container.get_as::<String>("items.0.name"), Some("first".to_string()));
}

#[test]
fn test_set_through_scalar_is_a_shape_error() {
    let container = Container::from_value(json!({"scalar": 5})).unwrap();

    let err = container.set("scalar.below", 1i64).unwrap_err();
    assert!(err.is_shape_mismatch());
    assert_eq!(err.path(), Some("scalar"));
}

#[test]
fn test_set_never_creates_or_grows_lists() {
    let container = Container::from_value(json!({"items": [1, 2]})).unwrap();

    // Existing indices can be overwritten.
    container.set("items.1", 20i64).unwrap();
    assert_eq!(container.get_as::<i64>("items.1"), Some(20));

    // Indices past the end are refused, not created.
    let err = container.set("items.5", 50i64).unwrap_err();
    assert!(err.is_index_error());

    // Non-numeric segments cannot address a list.
    let err = container.set("items.key", 1i64).unwrap_err();
    assert!(err.is_shape_mismatch());
}

#[test]
fn test_set_intermediate_list_index_must_exist() {
    let container = Container::from_value(json!({"rows": [{"a": 1}]})).unwrap();

    container.set("rows.0.b", 2i64).unwrap();
    assert_eq!(container.get_as::<i64>("rows.0.b"), Some(2));

    let err = container.set("rows.3.a", 1i64).unwrap_err();
    assert!(err.is_index_error());
}

#[test]
fn test_node_handle_aliases_container_storage() {
    let container = Container::from_value(json!({"sub": {"x": 1}})).unwrap();

    let sub = container.node("sub").unwrap();
    sub.insert_key("y", 2i64);

    assert_eq!(container.get_as::<i64>("sub.y"), Some(2));

    container.set("sub.z", 3i64).unwrap();
    assert_eq!(sub.get_key("z"), Some(Value::Int(3)));
}

#[test]
fn test_retained_value_handle_stays_live() {
    let container = Container::from_value(json!({"sub": {"x": 1}})).unwrap();

    let value = container.get("sub").unwrap();
    container.set("sub.x", 9i64).unwrap();

    assert_eq!(value.as_map().unwrap().get_key("x"), Some(Value::Int(9)));
}

#[test]
fn test_clear_keeps_named_keys() {
    let container = Container::from_value(json!({"a": 1, "b": 2, "c": 3})).unwrap();

    container.clear(&["b"]);

    assert!(!container.has("a"));
    assert!(container.has("b"));
    assert!(!container.has("c"));
    assert_eq!(container.len(), 1);
}

#[test]
fn test_merge_overwrites_and_adds_without_removing() {
    let container = Container::from_value(json!({"keep": 1, "replace": "old"})).unwrap();

    container
        .merge(json!({"replace": "new", "added": true}))
        .unwrap();

    assert_eq!(container.get_as::<i64>("keep"), Some(1));
    assert_eq!(container.get_as::<String>("replace"), Some("new".to_string()));
    assert_eq!(container.get_as::<bool>("added"), Some(true));
}

#[test]
fn test_structure_snapshot_round_trip() {
    let raw = json!({
        "name": "order-17",
        "total": 12,
        "lines": [{"sku": "a"}, {"sku": "b"}],
        "customer": {"name": "Alice", "vip": true},
        "note": null,
    });

    let container = Container::from_value(raw.clone()).unwrap();
    assert_eq!(container.to_structure(), raw);
}

#[test]
fn test_serde_serialization_matches_snapshot() {
    let raw = json!({"a": {"b": [1, 2]}, "c": "text"});
    let container = Container::from_value(raw.clone()).unwrap();

    assert_eq!(serde_json::to_value(&container).unwrap(), raw);

    let parsed: Container = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(parsed.to_structure(), raw);
}

#[test]
fn test_set_json_and_get_json() {
    #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
    struct Address {
        street: String,
        number: i64,
    }

    let container = Container::new();
    let address = Address {
        street: "Main".to_string(),
        number: 7,
    };

    container.set_json("customer.address", &address).unwrap();
    assert_eq!(container.get_as::<String>("customer.address.street"), Some("Main".to_string()));

    let read: Address = container.get_json("customer.address").unwrap();
    assert_eq!(read, address);

    let err = container.get_json::<Address>("customer.missing").unwrap_err();
    assert!(err.is_not_found());
}

#[test]
#[should_panic(expected = "malformed path")]
fn test_malformed_path_fails_fast() {
    let container = Container::new();
    let _ = container.get("a..b");
}
