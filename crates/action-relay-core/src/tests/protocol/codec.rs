use crate::{
    Action, ActionId, ActionSpec, ClientMessage, MediaKey, ServerMessage, decode_client_message,
    encode, encode_manifest,
};

use serde_json::{Value, json};

/// WHAT: The manifest has the documented shape
/// WHY: Remotes parse this exact structure
#[test]
#[allow(clippy::unwrap_used)]
fn given_catalog_when_encoding_manifest_then_actions_message_with_id_name_icon() {
    // Given: Two actions, one with a resource icon and one without
    let actions = vec![
        Action::new(ActionId(1), ActionSpec::process("Term", "xterm", "")),
        Action::new(
            ActionId(3),
            ActionSpec::media("Next", MediaKey::Next).with_icon("qrc:/icons/next.png"),
        ),
    ];

    // When: Encoding
    let line = encode_manifest(&actions).unwrap();

    // Then: One line, type first, only id/name/icon per entry
    assert!(!line.contains('\n'));
    assert!(line.starts_with(r#"{"type":"actions""#));
    let value: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(
        value,
        json!({
            "type": "actions",
            "actions": [
                {"id": 1, "name": "Term", "icon": "placeholder"},
                {"id": 3, "name": "Next", "icon": "qrc:/icons/next.png"},
            ]
        })
    );
}

/// WHAT: An empty catalog encodes an empty list
/// WHY: Remotes must be able to clear their grid
#[test]
#[allow(clippy::unwrap_used)]
fn given_empty_catalog_when_encoding_manifest_then_empty_actions_array() {
    // Given/When: Encoding no actions
    let line = encode_manifest(&[]).unwrap();

    // Then: Empty array
    assert_eq!(&*line, r#"{"type":"actions","actions":[]}"#);
}

/// WHAT: Execution results carry camelCase actionId
/// WHY: Matches the naming of action_press
#[test]
#[allow(clippy::unwrap_used)]
fn given_action_result_when_encoding_then_camel_case_action_id() {
    // Given: A result message
    let message = ServerMessage::ActionResult {
        action_id: ActionId(5),
        success: true,
        output: "done\n".to_string(),
    };

    // When: Encoding
    let line = encode(&message).unwrap();

    // Then: Expected JSON
    let value: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(
        value,
        json!({"type": "action_result", "actionId": 5, "success": true, "output": "done\n"})
    );
}

/// WHAT: action_press decodes to the pressed id
/// WHY: Core inbound message
#[test]
fn given_action_press_when_decoding_then_action_id_extracted() {
    // Given: A press for id 7
    let line = r#"{"type":"action_press","actionId":7}"#;

    // When: Decoding
    let message = decode_client_message(line);

    // Then: ActionPress(7)
    assert_eq!(
        message,
        Some(ClientMessage::ActionPress {
            action_id: ActionId(7)
        })
    );
}

/// WHAT: get_actions decodes and extra fields are tolerated
/// WHY: Remotes may attach metadata
#[test]
fn given_get_actions_with_extra_fields_when_decoding_then_get_actions() {
    // Given: get_actions plus an unknown field
    let line = r#"{"type":"get_actions","client":"android"}"#;

    // When/Then: Decodes to GetActions
    assert_eq!(decode_client_message(line), Some(ClientMessage::GetActions));
}

/// WHAT: Unknown types and malformed input are ignored
/// WHY: Bad input must never produce a reply or an error
#[test]
fn given_unrecognised_input_when_decoding_then_none() {
    // Given: Assorted bad lines
    let lines = [
        r#"{"type":"reboot"}"#,
        r#"{"type":"action_press"}"#,
        r#"{"type":"action_press","actionId":"seven"}"#,
        r#"{"type":"action_press","actionId":-1}"#,
        r#"{"actionId":1}"#,
        r#"[1,2,3]"#,
        "not json at all",
        r#"{"type":"get_actions""#,
    ];

    // When/Then: Every one decodes to None
    for line in lines {
        assert_eq!(decode_client_message(line), None, "line: {line}");
    }
}
