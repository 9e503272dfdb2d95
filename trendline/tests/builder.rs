use std::sync::Arc;

use trendline::{Throttle, Trends, TrendsError, WindowConfig};
use trendline_core::connector::TrendsConnector;
use trendline_mock::MockConnector;

struct NoCapabilities;

impl TrendsConnector for NoCapabilities {
    fn name(&self) -> &'static str {
        "bare"
    }
}

#[test]
fn requires_a_connector() {
    let err = Trends::builder().build().err().unwrap();
    assert!(matches!(err, TrendsError::InvalidArg(_)));
}

#[test]
fn requires_sessions_and_export() {
    let err = Trends::builder()
        .with_connector(Arc::new(NoCapabilities))
        .build()
        .err()
        .unwrap();
    match err {
        TrendsError::InvalidArg(msg) => assert!(msg.contains("bare")),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn rejects_zero_length_quarters() {
    let err = Trends::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .window(WindowConfig {
            offset_months: 12,
            quarter_months: 0,
        })
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, TrendsError::InvalidArg(_)));
}

#[test]
fn settings_land_in_the_config() {
    let trends = Trends::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .throttle(Throttle::random_default())
        .category("0-7-107")
        .build()
        .unwrap();
    assert_eq!(trends.config().throttle, Throttle::random_default());
    assert_eq!(trends.config().category.as_deref(), Some("0-7-107"));
    assert_eq!(trends.config().window, WindowConfig::default());
    // Middleware layers keep the inner connector's name.
    assert_eq!(trends.connector().name(), "trendline-mock");
}

#[test]
fn without_middleware_keeps_the_connector_as_is() {
    let raw: Arc<dyn TrendsConnector> = Arc::new(MockConnector::new());
    let trends = Trends::builder()
        .with_connector(Arc::clone(&raw))
        .without_middleware()
        .build()
        .unwrap();
    assert!(Arc::ptr_eq(trends.connector(), &raw));
}
