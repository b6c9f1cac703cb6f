//! Remote lifecycle tests: orchestration over the transport boundary and
//! the degrade-to-default failure policy.

use serde_json::json;
use tether::{Params, Record, Remote, Transport, TransportError};

use crate::helpers::{Album, FailingTransport, MemoryTransport};

fn seeded() -> MemoryTransport {
    let transport = MemoryTransport::new();
    transport.seed(
        "albums",
        vec![
            json!({"id": 1, "title": "Blue Lines", "label": {"name": "Wild Bunch"}}),
            json!({"id": 2, "title": "Protection", "label": {"name": "Circa"}}),
        ],
    );
    transport
}

#[test]
fn test_count_and_degrade_to_zero() {
    let transport = seeded();
    assert_eq!(Album::count(&transport, &Params::new()), 2);

    assert_eq!(Album::count(&FailingTransport, &Params::new()), 0);
}

#[test]
fn test_all_returns_existing_records() {
    let transport = seeded();
    let albums = Album::all(&transport, &Params::new()).unwrap();

    assert_eq!(albums.len(), 2);
    for album in &albums {
        assert!(album.entity().exists());
    }
    assert_eq!(
        albums.first().unwrap().entity().get_as::<String>("title"),
        Some("Blue Lines".to_string())
    );
}

#[test]
fn test_all_degrades_to_empty_collection() {
    let albums = Album::all(&FailingTransport, &Params::new()).unwrap();
    assert!(albums.is_empty());
}

#[test]
fn test_all_wraps_single_object_responses() {
    // A transport that answers a listing request with one bare object.
    struct SingleObject;

    impl Transport for SingleObject {
        fn count(&self, _: &str, _: &Params) -> Result<u64, TransportError> {
            Ok(1)
        }

        fn fetch(
            &self,
            _: &str,
            _: Option<&str>,
            _: &Params,
        ) -> Result<serde_json::Value, TransportError> {
            Ok(json!({"id": 9, "title": "Solo"}))
        }

        fn create(
            &self,
            resource: &str,
            _: serde_json::Value,
        ) -> Result<serde_json::Value, TransportError> {
            Err(TransportError::new(resource, "read only"))
        }

        fn update(
            &self,
            resource: &str,
            _: &str,
            _: serde_json::Value,
        ) -> Result<serde_json::Value, TransportError> {
            Err(TransportError::new(resource, "read only"))
        }

        fn delete(&self, resource: &str, _: &str) -> Result<(), TransportError> {
            Err(TransportError::new(resource, "read only"))
        }
    }

    let albums = Album::all(&SingleObject, &Params::new()).unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(
        albums.first().unwrap().entity().get_as::<String>("title"),
        Some("Solo".to_string())
    );
}

#[test]
fn test_find_marks_record_existing() {
    let transport = seeded();

    let album = Album::find(&transport, "2").unwrap().unwrap();
    assert!(album.entity().exists());
    assert_eq!(album.entity().get_as::<String>("title"), Some("Protection".to_string()));
}

#[test]
fn test_find_degrades_to_none() {
    let transport = seeded();

    assert!(Album::find(&transport, "99").unwrap().is_none());
    assert!(Album::find(&FailingTransport, "1").unwrap().is_none());
}

#[test]
fn test_create_assigns_id_and_marks_existing() {
    let transport = MemoryTransport::new();

    let album = Album::create(&transport, json!({"title": "Mezzanine"}))
        .unwrap()
        .unwrap();

    assert!(album.entity().exists());
    assert!(album.id().is_some());
    assert_eq!(transport.stored("albums").len(), 1);

    assert!(Album::create(&FailingTransport, json!({})).unwrap().is_none());
}

#[test]
fn test_hydrate_merges_remote_data_over_local_state() {
    let transport = seeded();
    let album = Album::from_data(json!({"id": 1, "local": "note"})).unwrap();

    assert!(album.hydrate(&transport).unwrap());

    assert!(album.entity().exists());
    assert_eq!(album.entity().get_as::<String>("title"), Some("Blue Lines".to_string()));
    // Hydrate merges; local-only data survives.
    assert_eq!(album.entity().get_as::<String>("local"), Some("note".to_string()));
}

#[test]
fn test_hydrate_requires_an_id() {
    let transport = seeded();
    let album = Album::from_data(json!({"title": "no id"})).unwrap();

    assert!(!album.hydrate(&transport).unwrap());
    assert!(!album.entity().exists());
}

#[test]
fn test_refresh_discards_local_data_but_keeps_id_and_relations() {
    let transport = seeded();
    let album = Album::find(&transport, "1").unwrap().unwrap();

    // Materialize a relation and stage some local-only state.
    let label = album.label().unwrap().unwrap();
    album.entity().set("scratch", "local").unwrap();

    assert!(album.refresh(&transport).unwrap());

    assert_eq!(album.id(), Some("1".to_string()));
    assert!(!album.entity().has("scratch"));
    // The materialized child kept its storage and sees the refreshed data.
    assert_eq!(label.name(), Some("Wild Bunch".to_string()));
    assert!(std::rc::Rc::ptr_eq(&label, &album.label().unwrap().unwrap()));
}

#[test]
fn test_refresh_requires_existence() {
    let transport = seeded();
    let album = Album::from_data(json!({"id": 1})).unwrap();

    assert!(!album.refresh(&transport).unwrap());
}

#[test]
fn test_save_creates_then_updates() {
    let transport = MemoryTransport::new();
    let album = Album::from_data(json!({"title": "Mezzanine"})).unwrap();

    // First save: the record does not exist remotely yet.
    assert!(album.save(&transport).unwrap());
    assert!(album.entity().exists());
    let id = album.id().unwrap();

    // Second save: same record, now an update.
    album.entity().set("title", "Mezzanine (Remastered)").unwrap();
    assert!(album.save(&transport).unwrap());

    let stored = transport.stored("albums");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["id"].to_string(), id);
    assert_eq!(stored[0]["title"], json!("Mezzanine (Remastered)"));
}

#[test]
fn test_save_degrades_to_false() {
    let album = Album::from_data(json!({"title": "x"})).unwrap();
    assert!(!album.save(&FailingTransport).unwrap());
    assert!(!album.entity().exists());
}

#[test]
fn test_delete_clears_existence_and_remote_record() {
    let transport = seeded();
    let album = Album::find(&transport, "1").unwrap().unwrap();

    assert!(album.delete(&transport).unwrap());
    assert!(!album.entity().exists());
    assert_eq!(transport.stored("albums").len(), 1);

    // Already gone: delete is not retried.
    assert!(!album.delete(&transport).unwrap());
}
