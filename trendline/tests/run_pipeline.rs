use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Utc};
use trendline::{Credentials, KeywordQuery, Throttle, Trends, TrendsError};
use trendline_core::DateWindow;
use trendline_mock::{DynamicMockConnector, MockBehavior, MockConnector};

mod common;
use common::{BrokenSink, VecSink, d};

fn creds() -> Credentials {
    Credentials::new("analyst@example.com", "hunter2")
}

fn trends_with_mock() -> Trends {
    Trends::builder()
        .with_connector(Arc::new(MockConnector::new()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn resolves_and_merges_around_filing_date() {
    let trends = trends_with_mock();
    let mut sink = VecSink::default();
    let report = trends
        .run(
            &creds(),
            [KeywordQuery::new("Apple").with_filing_date(d(2014, 5, 17))],
            &mut sink,
        )
        .await
        .unwrap();

    assert_eq!(report.keywords.len(), 1);
    let kw = &report.keywords[0];
    assert_eq!(kw.keyword, "Apple");
    assert_eq!(kw.topic, "/m/0k8z");
    assert_eq!(kw.descriptor, "Consumer electronics company");
    assert_eq!(kw.all_zero_quarters, 0);
    assert_eq!(kw.unavailable_windows, 0);

    let (query, merged) = &sink.written[0];
    assert_eq!(query.title(), "Apple Inc");
    assert!(merged.rescaled);
    assert_eq!(kw.points, merged.series.len());
    // 2013-05-01 through 2015-05-01 inclusive.
    assert!(merged.series.len() >= 731);
    assert_eq!(merged.series.first().unwrap().date, d(2013, 5, 1));
    assert!(merged.series.values().iter().all(|v| v.is_finite() && *v >= 0.0));
}

#[tokio::test]
async fn one_long_span_then_quarters_with_one_topic_each() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let trends = Trends::builder().with_connector(mock).build().unwrap();
    let mut sink = VecSink::default();
    trends
        .run(
            &creds(),
            [
                KeywordQuery::new("Widget").with_filing_date(d(2014, 5, 17)),
                KeywordQuery::new("Gadget").with_filing_date(d(2014, 5, 17)),
            ],
            &mut sink,
        )
        .await
        .unwrap();

    let calls = controller.calls().await;
    assert_eq!(calls.acquires, vec!["analyst@example.com".to_string()]);
    assert_eq!(calls.releases.len(), 1);
    assert_eq!(calls.lookups, vec!["Widget".to_string(), "Gadget".to_string()]);
    assert_eq!(calls.fetches.len(), 18);
    assert!(calls.fetches.iter().all(|p| p.topics.len() == 1));

    let span = DateWindow::new(d(2013, 5, 1), d(2015, 5, 1)).unwrap();
    assert_eq!(calls.fetches[0].window, span);
    assert_eq!(calls.fetches[1].window.start(), d(2013, 5, 1));
    assert_eq!(calls.fetches[8].window.end(), d(2015, 5, 1));
    assert_eq!(calls.fetches[9].topics, vec!["Gadget".to_string()]);
    assert_eq!(sink.keywords(), vec!["Widget".to_string(), "Gadget".to_string()]);
}

#[tokio::test]
async fn quota_stops_the_run_and_still_releases() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_fetch_behavior("Tesla", MockBehavior::Fail(TrendsError::quota("daily limit")))
        .await;
    let trends = Trends::builder().with_connector(mock).build().unwrap();
    let mut sink = VecSink::default();

    let err = trends
        .run(
            &creds(),
            ["Apple", "Tesla", "Pizza Hut"]
                .into_iter()
                .map(|k| KeywordQuery::new(k).with_filing_date(d(2014, 5, 17))),
            &mut sink,
        )
        .await
        .unwrap_err();

    assert!(err.is_session_fatal());
    assert_eq!(sink.keywords(), vec!["Apple".to_string()]);
    let calls = controller.calls().await;
    assert_eq!(calls.releases.len(), 1);
    assert!(!calls.lookups.contains(&"Pizza Hut".to_string()));
    // Apple's nine windows plus the refused Tesla span.
    assert_eq!(calls.fetches.len(), 10);
}

#[tokio::test]
async fn lookup_quota_is_fatal_too() {
    let trends = trends_with_mock();
    let mut sink = VecSink::default();
    let err = trends
        .run(&creds(), [KeywordQuery::new("QUOTA")], &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, TrendsError::QuotaExceeded { .. }));
    assert!(sink.written.is_empty());
}

#[tokio::test]
async fn rejected_credentials_fail_before_any_query() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_acquire_behavior(MockBehavior::Fail(TrendsError::Auth("bad password".into())))
        .await;
    let trends = Trends::builder().with_connector(mock).build().unwrap();
    let mut sink = VecSink::default();
    let err = trends
        .run(&creds(), [KeywordQuery::new("Apple")], &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, TrendsError::Auth(_)));
    let calls = controller.calls().await;
    assert!(calls.lookups.is_empty());
    assert!(calls.fetches.is_empty());
    assert!(calls.releases.is_empty());

    let err = trends_with_mock()
        .run(&Credentials::new("bad", "x"), [KeywordQuery::new("Apple")], &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, TrendsError::Auth(_)));
}

#[tokio::test]
async fn unavailable_quarter_is_zero_filled_and_counted() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let second_quarter = DateWindow::new(d(2013, 8, 1), d(2013, 11, 1)).unwrap();
    controller
        .set_window_behavior(
            "Widget",
            second_quarter,
            MockBehavior::Fail(TrendsError::Unavailable("try later".into())),
        )
        .await;
    let trends = Trends::builder().with_connector(mock).build().unwrap();
    let mut sink = VecSink::default();
    let report = trends
        .run(
            &creds(),
            [KeywordQuery::new("Widget").with_filing_date(d(2014, 5, 17))],
            &mut sink,
        )
        .await
        .unwrap();

    let kw = &report.keywords[0];
    assert_eq!(kw.unavailable_windows, 1);
    assert_eq!(kw.all_zero_quarters, 1);
    assert_eq!(report.missing_quarters(), vec![1]);
    assert_eq!(sink.written.len(), 1);
}

#[tokio::test]
async fn no_interest_everywhere_passes_the_anchor_through() {
    let trends = trends_with_mock();
    let mut sink = VecSink::default();
    let report = trends
        .run(
            &creds(),
            [KeywordQuery::new("EMPTY").with_filing_date(d(2014, 5, 17))],
            &mut sink,
        )
        .await
        .unwrap();
    assert_eq!(report.keywords[0].all_zero_quarters, 8);
    assert_eq!(report.keywords[0].descriptor, "Search term");
    let (_, merged) = &sink.written[0];
    assert!(!merged.rescaled);
    assert!(merged.series.is_all_zero());

    let span = DateWindow::new(d(2013, 5, 1), d(2015, 5, 1)).unwrap();
    assert_eq!(merged.series.len() as i64, span.days() + 1);
    assert_eq!(merged.series.first().unwrap().date, span.start());
    assert_eq!(merged.series.last().unwrap().date, span.end());
}

#[tokio::test]
async fn no_interest_quarter_leaves_no_gap() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let second_quarter = DateWindow::new(d(2013, 8, 1), d(2013, 11, 1)).unwrap();
    controller
        .set_window_behavior(
            "Widget",
            second_quarter,
            MockBehavior::Return("Web Search interest: Widget\nWorldwide; 2013\n\n".into()),
        )
        .await;
    let trends = Trends::builder().with_connector(mock).build().unwrap();
    let mut sink = VecSink::default();
    let report = trends
        .run(
            &creds(),
            [KeywordQuery::new("Widget").with_filing_date(d(2014, 5, 17))],
            &mut sink,
        )
        .await
        .unwrap();

    assert_eq!(report.keywords[0].all_zero_quarters, 1);
    assert_eq!(report.keywords[0].unavailable_windows, 0);
    let (_, merged) = &sink.written[0];
    let points = merged.series.points();
    assert!(points.windows(2).all(|w| (w[1].date - w[0].date).num_days() == 1));
    assert_eq!(points[0].date, d(2013, 5, 1));
    assert!(points.iter().any(|p| p.date == d(2013, 9, 15)));
    assert!(merged.series.last().unwrap().date >= d(2015, 5, 1));
}

#[tokio::test]
async fn malformed_payload_propagates_after_release() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    controller
        .set_fetch_behavior("Widget", MockBehavior::Return("<html>oops</html>".into()))
        .await;
    let trends = Trends::builder().with_connector(mock).build().unwrap();
    let mut sink = VecSink::default();
    let err = trends
        .run(&creds(), [KeywordQuery::new("Widget")], &mut sink)
        .await
        .unwrap_err();
    assert!(matches!(err, TrendsError::Format(_)));
    assert_eq!(controller.calls().await.releases.len(), 1);
}

#[tokio::test]
async fn sink_failure_stops_the_run() {
    let trends = trends_with_mock();
    let err = trends
        .run(
            &creds(),
            [KeywordQuery::new("Apple"), KeywordQuery::new("Tesla")],
            &mut BrokenSink,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TrendsError::Sink(_)));
}

#[tokio::test]
async fn anchor_date_centres_keywords_without_filing_date() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let trends = Trends::builder()
        .with_connector(mock)
        .anchor_date(d(2014, 5, 17))
        .build()
        .unwrap();
    let mut sink = VecSink::default();
    trends
        .run(&creds(), [KeywordQuery::new("Widget")], &mut sink)
        .await
        .unwrap();
    let calls = controller.calls().await;
    assert_eq!(
        calls.fetches[0].window,
        DateWindow::new(d(2013, 5, 1), d(2015, 5, 1)).unwrap()
    );
}

#[tokio::test]
async fn undated_keywords_end_at_the_current_month() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let trends = Trends::builder().with_connector(mock).build().unwrap();
    let mut sink = VecSink::default();
    trends
        .run(&creds(), [KeywordQuery::new("Widget")], &mut sink)
        .await
        .unwrap();
    let span = controller.calls().await.fetches[0].window;
    let today = Utc::now().date_naive();
    assert_eq!(span.end().day(), 1);
    assert!(span.end() <= today);
    assert!((today - span.end()).num_days() < 31);
}

#[tokio::test]
async fn category_is_sent_with_every_export() {
    let (mock, controller) = DynamicMockConnector::new_with_controller("dyn");
    let trends = Trends::builder()
        .with_connector(mock)
        .category("0-7-37")
        .build()
        .unwrap();
    let mut sink = VecSink::default();
    trends
        .run(
            &creds(),
            [KeywordQuery::new("Widget").with_filing_date(d(2014, 5, 17))],
            &mut sink,
        )
        .await
        .unwrap();
    let calls = controller.calls().await;
    assert!(
        calls
            .fetches
            .iter()
            .all(|p| p.category.as_deref() == Some("0-7-37"))
    );
}

#[tokio::test(start_paused = true)]
async fn throttle_pauses_before_each_portal_call() {
    let (mock, _controller) = DynamicMockConnector::new_with_controller("dyn");
    let trends = Trends::builder()
        .with_connector(mock)
        .throttle(Throttle::Fixed(Duration::from_secs(1)))
        .build()
        .unwrap();
    let mut sink = VecSink::default();
    let started = tokio::time::Instant::now();
    trends
        .run(
            &creds(),
            [KeywordQuery::new("Widget").with_filing_date(d(2014, 5, 17))],
            &mut sink,
        )
        .await
        .unwrap();
    // One lookup and nine exports.
    assert!(started.elapsed() >= Duration::from_secs(10));
}

#[tokio::test]
async fn empty_keyword_source_yields_empty_report() {
    let trends = trends_with_mock();
    let mut sink = VecSink::default();
    let report = trends
        .run(&creds(), Vec::<KeywordQuery>::new(), &mut sink)
        .await
        .unwrap();
    assert!(report.keywords.is_empty());
}
