use crate::{LogFormat, TelemetryConfig, TelemetryError, build_filter, init_telemetry};

#[test]
fn test_log_format_parsing() {
    assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Text);
    assert_eq!(" JSON ".parse::<LogFormat>().unwrap(), LogFormat::Json);
    assert!(matches!("xml".parse::<LogFormat>(), Err(TelemetryError::UnknownFormat(_))));
    assert_eq!(LogFormat::Json.to_string(), "json");
}

#[test]
fn test_invalid_default_filter_is_rejected() {
    // RUST_LOG takes precedence; only meaningful when it is unset.
    if std::env::var("RUST_LOG").is_ok() {
        return;
    }
    let err = build_filter("askpdf=loudest").unwrap_err();
    assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
}

#[test]
fn test_second_init_fails() {
    let config = TelemetryConfig::new("test-service").with_format(LogFormat::Json);
    // Another test binary may have installed a subscriber first; only the
    // second call is guaranteed to fail.
    let _ = init_telemetry(&config);
    assert!(matches!(init_telemetry(&config), Err(TelemetryError::AlreadyInitialized(_))));
}
