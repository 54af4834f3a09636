//! Error message quality tests
//!
//! Tests that verify error messages are helpful and distinguishable.

use fuelportal_exporter::error::{AuthError, ExporterError, FetchError, ParseWarning, SetupError};

#[test]
fn test_auth_error_message_clarity() {
    // Given: An authentication error wrapped in the exporter error
    let error = ExporterError::from(AuthError::InvalidCredentials);

    // When: Converting to string
    let message = format!("{}", error);

    // Then: Message should clearly indicate an authentication issue
    assert!(message.contains("Authentication failed"));
    assert!(message.contains("invalid credentials"));
}

#[test]
fn test_token_missing_message() {
    let message = AuthError::TokenMissing.to_string();

    assert!(message.contains("Anti-forgery token"));
}

#[test]
fn test_page_unavailable_keeps_reason() {
    let error = AuthError::PageUnavailable("connection refused".to_string());

    assert!(error.to_string().contains("connection refused"));
}

#[test]
fn test_fetch_error_message_clarity() {
    let error = ExporterError::from(FetchError::Unavailable(
        "tank page returned HTTP 500".to_string(),
    ));

    let message = format!("{}", error);

    assert!(message.contains("Fetch failed"));
    assert!(message.contains("HTTP 500"));
}

#[test]
fn test_config_error_message_clarity() {
    let error = ExporterError::Config("portal.username is required".to_string());

    let message = format!("{}", error);

    assert!(message.contains("Configuration error"));
    assert!(message.contains("portal.username"));
}

#[test]
fn test_parse_warning_names_the_tank() {
    let warning = ParseWarning::InvalidPercent {
        tank: "Garage".to_string(),
        raw: "n/a".to_string(),
    };

    let message = warning.to_string();

    assert!(message.contains("Garage"));
    assert!(message.contains("n/a"));
}

#[test]
fn test_setup_error_tags_are_distinct() {
    let invalid = SetupError::InvalidAuth;
    let offline = SetupError::CannotConnect("timeout".to_string());

    assert_eq!(invalid.tag(), "invalid_auth");
    assert_eq!(offline.tag(), "cannot_connect");
    assert!(offline.to_string().contains("timeout"));
}

#[test]
fn test_error_variants_are_distinguishable() {
    // Given: One error of each kind
    let errors = [
        ExporterError::from(AuthError::TokenMissing),
        ExporterError::from(FetchError::Unavailable("x".to_string())),
        ExporterError::Config("x".to_string()),
        ExporterError::Cycle("x".to_string()),
        ExporterError::Server("x".to_string()),
    ];

    // Then: Every message is different
    let messages: std::collections::HashSet<String> =
        errors.iter().map(|e| e.to_string()).collect();
    assert_eq!(messages.len(), errors.len());
}

#[test]
fn test_io_error_conversion() {
    let io = std::io::Error::new(std::io::ErrorKind::AddrInUse, "port taken");

    let error: ExporterError = io.into();

    assert!(error.to_string().contains("IO error"));
}
