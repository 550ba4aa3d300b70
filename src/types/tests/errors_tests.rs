use crate::types::errors::LockError;

#[test]
fn test_lock_error_from_serde_json() {
    let json_err = serde_json::from_str::<u32>("not a number").unwrap_err();
    let lock_err = LockError::from(json_err);

    match lock_err {
        LockError::Configuration(msg) => {
            assert!(msg.contains("expected"));
        }
        _ => panic!("Expected LockError::Configuration"),
    }
}

#[test]
fn test_lock_error_serialization() {
    let err = LockError::NotFound("Element not found".to_string());

    // LockError serializes as just its Display string
    let serialized = serde_json::to_string(&err).unwrap();
    assert_eq!(serialized, "\"Not found: Element not found\"");
}

#[test]
fn test_not_guarded_names_function_and_method() {
    let err = LockError::not_guarded("release", "onSave");
    let message = err.to_string();
    assert!(message.starts_with("release:"));
    assert!(message.contains("\"onSave\""));
    assert!(message.contains("guarded method"));
}
