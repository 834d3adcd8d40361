use crate::{SharedEventStorage, capture_subscriber};
use tracing::{info, warn};

#[test]
fn test_events_are_captured_with_fields() {
    let storage = SharedEventStorage::new();
    let _guard = tracing::subscriber::set_default(capture_subscriber(storage.clone()));

    info!(document.id = "doc-1", chunk_count = 3u64, "ingested document");
    warn!(error = %"boom", "index records left orphaned");

    let events = storage.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].level, "INFO");
    assert_eq!(events[0].message, "ingested document");
    assert_eq!(events[0].field_str("document.id"), Some("doc-1"));
    assert_eq!(events[0].fields.get("chunk_count"), Some(&serde_json::json!(3)));
    assert_eq!(events[1].level, "WARN");
    assert_eq!(events[1].field_str("error"), Some("boom"));
}

#[test]
fn test_events_are_indexed_by_document() {
    let storage = SharedEventStorage::new();
    let _guard = tracing::subscriber::set_default(capture_subscriber(storage.clone()));

    info!(document.id = "a", "first");
    info!(document.id = "b", "other");
    info!("no document");
    info!(document.id = %"a", "second");

    let messages: Vec<_> = storage.for_document("a").into_iter().map(|e| e.message).collect();
    assert_eq!(messages, ["first", "second"]);
    assert!(storage.for_document("missing").is_empty());
    assert!(storage.contains_message("no document"));

    storage.clear();
    assert!(storage.events().is_empty());
    assert!(storage.for_document("a").is_empty());
}

#[test]
fn test_event_serialization() {
    let storage = SharedEventStorage::new();
    let _guard = tracing::subscriber::set_default(capture_subscriber(storage.clone()));

    info!(file_name = "cats.pdf", "registered document");

    let json = serde_json::to_string(&storage.events()[0]).unwrap();
    assert!(json.contains("\"level\":\"INFO\""));
    assert!(json.contains("\"message\":\"registered document\""));
    assert!(json.contains("\"file_name\":\"cats.pdf\""));
}
