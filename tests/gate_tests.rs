// tests/gate_tests.rs

use serde_json::json;

use TextAnnotator::config::HandlerConfig;
use TextAnnotator::data_model::{ChangeEvent, ChangeType, DocumentSnapshot};
use TextAnnotator::pipeline::classifier::classify;
use TextAnnotator::pipeline::gate::{decide, Action, SkipReason};

fn snapshot(path: &str, fields: serde_json::Value) -> DocumentSnapshot {
    DocumentSnapshot::existing(path, fields.as_object().expect("object fields").clone())
}

fn base_config() -> HandlerConfig {
    HandlerConfig {
        input_field: "text".to_string(),
        output_field: "nlp".to_string(),
        tasks: vec!["sentiment".to_string()],
        entity_types: vec![],
        save_common_entities: false,
        mirror: None,
    }
}

#[test]
fn test_classify_delete_wins_over_everything() {
    let event = ChangeEvent {
        before: snapshot("messages/m1", json!({"text": "hi"})),
        after: DocumentSnapshot::missing("messages/m1"),
    };
    assert_eq!(classify(&event), ChangeType::Delete);

    // Both missing is still a delete.
    let event = ChangeEvent {
        before: DocumentSnapshot::missing("messages/m1"),
        after: DocumentSnapshot::missing("messages/m1"),
    };
    assert_eq!(classify(&event), ChangeType::Delete);
}

#[test]
fn test_classify_create_and_update() {
    let create = ChangeEvent {
        before: DocumentSnapshot::missing("messages/m1"),
        after: snapshot("messages/m1", json!({"text": "hi"})),
    };
    assert_eq!(classify(&create), ChangeType::Create);

    let update = ChangeEvent {
        before: snapshot("messages/m1", json!({"text": "hi"})),
        after: snapshot("messages/m1", json!({"text": "bye"})),
    };
    assert_eq!(classify(&update), ChangeType::Update);
}

#[test]
fn test_invalid_config_skips_every_change_type() {
    let config = HandlerConfig {
        output_field: "text".to_string(),
        ..base_config()
    };
    let before = snapshot("messages/m1", json!({"text": "hi"}));
    let after = snapshot("messages/m1", json!({"text": "bye"}));

    for change in [ChangeType::Create, ChangeType::Delete, ChangeType::Update] {
        match decide(change, &before, &after, &config) {
            Action::Skip(SkipReason::InvalidConfig(message)) => {
                assert!(message.contains("text"));
            }
            other => panic!("Expected InvalidConfig skip, got {:?}", other),
        }
    }
}

#[test]
fn test_prefix_config_skips_regardless_of_contents() {
    let config = HandlerConfig {
        input_field: "doc.text".to_string(),
        output_field: "doc.text.nlp".to_string(),
        ..base_config()
    };
    let before = DocumentSnapshot::missing("messages/m1");
    let after = snapshot("messages/m1", json!({"doc": {"text": "hi"}}));
    assert!(matches!(
        decide(ChangeType::Create, &before, &after, &config),
        Action::Skip(SkipReason::InvalidConfig(_))
    ));
}

#[test]
fn test_create_with_input_runs_with_exact_value() {
    let before = DocumentSnapshot::missing("messages/m1");
    let after = snapshot("messages/m1", json!({"text": "Good trip"}));
    assert_eq!(
        decide(ChangeType::Create, &before, &after, &base_config()),
        Action::Run("Good trip".to_string())
    );
}

#[test]
fn test_create_without_input_skips() {
    let before = DocumentSnapshot::missing("messages/m1");
    let after = snapshot("messages/m1", json!({"other": "field"}));
    assert_eq!(
        decide(ChangeType::Create, &before, &after, &base_config()),
        Action::Skip(SkipReason::NoInputField)
    );
}

#[test]
fn test_create_with_non_string_input_skips() {
    let before = DocumentSnapshot::missing("messages/m1");
    let after = snapshot("messages/m1", json!({"text": 42}));
    assert_eq!(
        decide(ChangeType::Create, &before, &after, &base_config()),
        Action::Skip(SkipReason::InputNotText)
    );
}

#[test]
fn test_delete_event_skips() {
    let before = snapshot("messages/m1", json!({"text": "hi"}));
    let after = DocumentSnapshot::missing("messages/m1");
    assert_eq!(
        decide(ChangeType::Delete, &before, &after, &base_config()),
        Action::Skip(SkipReason::DocumentDeleted)
    );
}

#[test]
fn test_update_with_unchanged_input_skips() {
    let before = snapshot("messages/m1", json!({"text": "same", "likes": 1}));
    let after = snapshot("messages/m1", json!({"text": "same", "likes": 2}));
    assert_eq!(
        decide(ChangeType::Update, &before, &after, &base_config()),
        Action::Skip(SkipReason::InputUnchanged)
    );
}

#[test]
fn test_update_with_input_absent_on_both_sides_skips() {
    let before = snapshot("messages/m1", json!({"likes": 1}));
    let after = snapshot("messages/m1", json!({"likes": 2}));
    assert_eq!(
        decide(ChangeType::Update, &before, &after, &base_config()),
        Action::Skip(SkipReason::InputUnchanged)
    );
}

#[test]
fn test_update_with_changed_input_runs() {
    let before = snapshot("messages/m1", json!({"text": "old"}));
    let after = snapshot("messages/m1", json!({"text": "new"}));
    assert_eq!(
        decide(ChangeType::Update, &before, &after, &base_config()),
        Action::Run("new".to_string())
    );
}

#[test]
fn test_update_introducing_input_runs() {
    let before = snapshot("messages/m1", json!({"likes": 1}));
    let after = snapshot("messages/m1", json!({"likes": 1, "text": "fresh"}));
    assert_eq!(
        decide(ChangeType::Update, &before, &after, &base_config()),
        Action::Run("fresh".to_string())
    );
}

#[test]
fn test_update_removing_input_deletes_output() {
    let before = snapshot("messages/m1", json!({"text": "gone"}));
    let after = snapshot("messages/m1", json!({"likes": 1}));
    assert_eq!(
        decide(ChangeType::Update, &before, &after, &base_config()),
        Action::DeleteOutput
    );
}

#[test]
fn test_nested_input_field_path() {
    let config = HandlerConfig {
        input_field: "content.body".to_string(),
        ..base_config()
    };
    let before = DocumentSnapshot::missing("messages/m1");
    let after = snapshot("messages/m1", json!({"content": {"body": "nested"}}));
    assert_eq!(
        decide(ChangeType::Create, &before, &after, &config),
        Action::Run("nested".to_string())
    );
}
