//! Collection integration tests: promotion from raw lists, indexed access,
//! and the non-mutating filter/sort operations.

use serde_json::json;
use tether::{Collection, Direction, Entity, Record};

use crate::helpers::{Track, album};

fn tracks(values: &[(&str, i64)]) -> Collection<Track> {
    Track::collection(
        values
            .iter()
            .map(|(title, position)| {
                Track::from_data(json!({"title": title, "position": position})).unwrap()
            })
            .collect(),
    )
}

#[test]
fn test_promotion_from_raw_list_data() {
    let album = album();
    let tracks = album.tracks().unwrap().unwrap();

    assert_eq!(tracks.len(), 3);
    assert_eq!(
        tracks.first().unwrap().title(),
        Some("Safe From Harm".to_string())
    );
}

#[test]
fn test_non_map_slot_is_an_element_shape_error() {
    let entity = Entity::from_data(json!({"items": [{"ok": 1}, "scalar"]})).unwrap();

    let err = entity.relation_list::<Entity>("items").unwrap_err();
    assert!(err.is_shape_error());
}

#[test]
fn test_indexed_access() {
    let collection = tracks(&[("a", 1), ("b", 2), ("c", 3)]);

    assert_eq!(collection.len(), 3);
    assert!(collection.has(2));
    assert!(!collection.has(3));
    assert_eq!(collection.get(1).unwrap().title(), Some("b".to_string()));
    assert!(collection.get(9).is_none());

    let removed = collection.remove(0).unwrap();
    assert_eq!(removed.title(), Some("a".to_string()));
    assert_eq!(collection.len(), 2);
    assert_eq!(collection.first().unwrap().title(), Some("b".to_string()));
}

#[test]
fn test_indexed_set_replaces_in_place() {
    let collection = tracks(&[("a", 1), ("b", 2)]);

    collection
        .set(0, Track::from_data(json!({"title": "z"})).unwrap())
        .unwrap();
    assert_eq!(collection.get(0).unwrap().title(), Some("z".to_string()));

    let err = collection
        .set(5, Track::from_data(json!({"title": "q"})).unwrap())
        .unwrap_err();
    assert!(err.is_index_error());
}

#[test]
fn test_wrapper_mutation_leaves_backing_list_alone() {
    let album = album();
    let tracks = album.tracks().unwrap().unwrap();

    // Replacing a wrapper rearranges the collection, not the raw list the
    // collection was promoted from.
    tracks
        .set(0, Track::from_data(json!({"title": "replacement"})).unwrap())
        .unwrap();

    assert_eq!(tracks.get(0).unwrap().title(), Some("replacement".to_string()));
    assert_eq!(
        album.entity().get_as::<String>("tracks.0.title"),
        Some("Safe From Harm".to_string())
    );
}

#[test]
fn test_filter_returns_new_collection_and_preserves_source() {
    let collection = tracks(&[("a", 1), ("b", 2), ("c", 3)]);

    let filtered = collection.filter(|track| track.position().unwrap_or(0) >= 2);

    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered.first().unwrap().title(), Some("b".to_string()));
    assert_eq!(collection.len(), 3);
    assert_eq!(collection.first().unwrap().title(), Some("a".to_string()));
}

#[test]
fn test_sort_by_key_orders_numerically() {
    let collection = tracks(&[("three", 3), ("one", 1), ("two", 2)]);

    let ascending = collection.sort_by_key("position", Direction::Ascending);
    let positions: Vec<_> = ascending.map(|track| track.position().unwrap());
    assert_eq!(positions, vec![1, 2, 3]);

    let descending = collection.sort_by_key("position", Direction::Descending);
    let positions: Vec<_> = descending.map(|track| track.position().unwrap());
    assert_eq!(positions, vec![3, 2, 1]);

    // The source ordering is untouched.
    assert_eq!(collection.first().unwrap().position(), Some(3));
}

#[test]
fn test_sort_by_key_uses_natural_ordering() {
    let collection = tracks(&[("b10", 1), ("b2", 2)]);

    let sorted = collection.sort_by_key("title", Direction::Ascending);
    let titles: Vec<_> = sorted.map(|track| track.title().unwrap());
    assert_eq!(titles, vec!["b2".to_string(), "b10".to_string()]);
}

#[test]
fn test_sort_by_comparator() {
    let collection = tracks(&[("a", 2), ("b", 3), ("c", 1)]);

    let sorted = collection.sort_by(|a, b| b.position().cmp(&a.position()));
    let positions: Vec<_> = sorted.map(|track| track.position().unwrap());
    assert_eq!(positions, vec![3, 2, 1]);
}

#[test]
fn test_find_returns_first_match_in_order() {
    let collection = tracks(&[("a", 1), ("b", 2), ("c", 2)]);

    let found = collection.find(|track| track.position() == Some(2)).unwrap();
    assert_eq!(found.title(), Some("b".to_string()));

    assert!(collection.find(|track| track.position() == Some(9)).is_none());
}

#[test]
fn test_iteration_is_restartable() {
    let collection = tracks(&[("a", 1), ("b", 2)]);

    let first_pass: Vec<_> = collection.iter().map(|t| t.title().unwrap()).collect();
    let second_pass: Vec<_> = (&collection).into_iter().map(|t| t.title().unwrap()).collect();

    assert_eq!(first_pass, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(first_pass, second_pass);
}

#[test]
fn test_push_appends_in_order() {
    let collection = tracks(&[("a", 1)]);
    collection.push(Track::from_data(json!({"title": "b", "position": 2})).unwrap());

    assert_eq!(collection.len(), 2);
    assert_eq!(collection.get(1).unwrap().title(), Some("b".to_string()));
}

#[test]
fn test_structure_maps_elements_in_order() {
    let collection = tracks(&[("a", 1), ("b", 2)]);

    assert_eq!(
        collection.to_structure(),
        json!([
            {"title": "a", "position": 1},
            {"title": "b", "position": 2},
        ])
    );

    let serialized = serde_json::to_value(&collection).unwrap();
    assert_eq!(serialized, collection.to_structure());
}
