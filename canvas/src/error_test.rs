use super::*;

#[test]
fn import_error_codes_are_stable() {
    assert_eq!(ImportError::Empty.code(), "E_IMPORT_EMPTY");
    assert_eq!(ImportError::TooManyParts { count: 7 }.code(), "E_IMPORT_TOO_MANY");
    assert_eq!(ImportError::MalformedLine { line: 1, text: String::new() }.code(), "E_IMPORT_MALFORMED");
    assert_eq!(ImportError::OutOfSequence { line: 1, found: 2 }.code(), "E_IMPORT_SEQUENCE");
    assert_eq!(ImportError::MissingCar.code(), "E_IMPORT_NO_CAR");
}

#[test]
fn too_many_parts_message_names_limit() {
    let msg = ImportError::TooManyParts { count: 9 }.to_string();
    assert_eq!(msg, "9 part lines found, at most 6 allowed");
}

#[test]
fn out_of_sequence_message_uses_two_digit_numbers() {
    let msg = ImportError::OutOfSequence { line: 1, found: 2 }.to_string();
    assert_eq!(msg, "part line 1 is numbered 02, expected 01");
}

#[test]
fn malformed_message_quotes_line() {
    let msg = ImportError::MalformedLine { line: 3, text: "part03 = x".into() }.to_string();
    assert_eq!(msg, "part line 3 is malformed: \"part03 = x\"");
}

#[test]
fn config_error_messages() {
    assert_eq!(
        ConfigError::NonPositive { key: "ROADBLOCK_CANVAS_WIDTH".into() }.to_string(),
        "ROADBLOCK_CANVAS_WIDTH must be a positive number"
    );
    assert!(ConfigError::UnknownProfile("x".into()).to_string().contains("'scripting'"));
}
