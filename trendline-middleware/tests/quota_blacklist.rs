use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use trendline_core::connector::TrendsConnector;
use trendline_core::{DateWindow, KeywordQuery, QueryParams, Session, Throttle, TrendsError};
use trendline_middleware::{ConnectorBuilder, QuotaBlacklist};
use trendline_mock::{DynamicMockConnector, MockBehavior, MockConnector};

fn params(topic: &str) -> QueryParams {
    let start = NaiveDate::from_ymd_opt(2014, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2014, 4, 1).unwrap();
    QueryParams::for_query(
        &KeywordQuery::new(topic),
        DateWindow::new(start, end).unwrap(),
        None,
    )
}

#[tokio::test]
async fn quota_error_blocks_every_capability() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_lookup_behavior("apple", MockBehavior::Fail(TrendsError::quota("daily limit")))
        .await;
    let wrapped = QuotaBlacklist::new(mock);
    let s = Session::default();

    let lk = wrapped.as_entity_lookup().expect("lookup");
    let err = lk.lookup("apple", &s).await.expect_err("quota");
    assert!(matches!(err, TrendsError::QuotaExceeded { .. }));

    // Both capabilities now fail without reaching the inner connector.
    let again = lk.lookup("pear", &s).await.expect_err("blocked");
    assert_eq!(again, err);
    let qt = wrapped.as_query_transport().expect("transport");
    assert_eq!(qt.fetch(&params("pear"), &s).await.expect_err("blocked"), err);

    let calls = controller.calls().await;
    assert_eq!(calls.lookups, vec!["apple".to_string()]);
    assert!(calls.fetches.is_empty());

    wrapped.reset();
    assert!(wrapped.blocked().is_none());
    assert!(qt.fetch(&params("pear"), &s).await.is_ok());
}

#[tokio::test]
async fn other_errors_do_not_trip() {
    let wrapped = QuotaBlacklist::new(Arc::new(MockConnector::new()));
    let qt = wrapped.as_query_transport().expect("transport");
    let s = Session::default();
    let err = qt.fetch(&params("UNAVAILABLE"), &s).await.expect_err("unavailable");
    assert!(matches!(err, TrendsError::Unavailable(_)));
    assert!(wrapped.blocked().is_none());
    assert!(qt.fetch(&params("apple"), &s).await.is_ok());
}

#[tokio::test(start_paused = true)]
async fn cooldown_lifts_block() {
    let wrapped = QuotaBlacklist::new(Arc::new(MockConnector::new()))
        .with_cooldown(Duration::from_secs(60));
    let qt = wrapped.as_query_transport().expect("transport");
    let s = Session::default();

    qt.fetch(&params("QUOTA"), &s).await.expect_err("quota");
    assert!(qt.fetch(&params("apple"), &s).await.is_err());

    tokio::time::advance(Duration::from_secs(61)).await;
    assert!(qt.fetch(&params("apple"), &s).await.is_ok());
}

#[tokio::test]
async fn release_passes_through_while_blocked() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("P0");
    controller
        .set_fetch_behavior("apple", MockBehavior::Fail(TrendsError::quota("limit")))
        .await;
    let wrapped = QuotaBlacklist::new(mock);
    let s = Session::default();
    let _ = wrapped
        .as_query_transport()
        .expect("transport")
        .fetch(&params("apple"), &s)
        .await;
    wrapped
        .as_session_provider()
        .expect("session")
        .release(s)
        .await
        .expect("release");
    assert_eq!(controller.calls().await.releases.len(), 1);
}

#[test]
fn builder_orders_layers_outermost_first() {
    let raw: Arc<dyn TrendsConnector> = Arc::new(MockConnector::new());
    let b = ConnectorBuilder::new(raw)
        .with_throttle(Throttle::Fixed(Duration::from_millis(10)))
        .with_blacklist(None);
    assert_eq!(
        b.layer_names(),
        vec!["QuotaBlacklist", "ThrottledConnector", "trendline-mock"]
    );

    let b = b.with_throttle(Throttle::None).without_blacklist();
    assert_eq!(b.layer_names(), vec!["trendline-mock"]);
    let built = b.build();
    assert_eq!(built.name(), "trendline-mock");
}
