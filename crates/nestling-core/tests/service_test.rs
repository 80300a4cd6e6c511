// End-to-end tests for the dashboard service against a mock backend.
// These run on real time; the poller intervals are set far beyond the
// test duration so each subscription fetches exactly once unless
// explicitly refreshed.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::json;
use tokio::time::timeout;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nestling_api::{ApiClient, DiaperKind, FeedingKind};
use nestling_core::{CoreError, Dashboard, DashboardConfig};

const WAIT: Duration = Duration::from_secs(5);

fn config() -> DashboardConfig {
    DashboardConfig {
        stats_interval: Duration::from_secs(3600),
        health_interval: Duration::from_secs(3600),
        history_limit: 25,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date")
}

async fn dashboard(server: &MockServer) -> Dashboard {
    let base = server.uri().parse().expect("mock server url");
    let api = ApiClient::from_reqwest(base, reqwest::Client::new());
    Dashboard::new(api, &config(), today())
}

#[tokio::test]
async fn write_then_refresh_shows_new_event() {
    let server = MockServer::start().await;

    // The construction-time read sees an empty log; the post-write
    // refresh sees the new event.
    Mock::given(method("GET"))
        .and(path("/api/diaper/history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/diaper/history"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "type": "wet", "timestamp": "2024-06-01T08:30:00Z"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/diaper"))
        .and(body_json(json!({"type": "wet"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let dash = dashboard(&server).await;
    let mut log = dash.diaper_log();

    timeout(WAIT, log.wait_for(|s| s.value.as_deref().is_some_and(Vec::is_empty)))
        .await
        .expect("initial read within deadline")
        .expect("subscription alive");

    dash.log_diaper(DiaperKind::Wet).await.expect("write accepted");
    dash.refresh_diaper_log();

    let state = timeout(WAIT, log.wait_for(|s| s.value.as_deref().is_some_and(|v| v.len() == 1)))
        .await
        .expect("refreshed read within deadline")
        .expect("subscription alive")
        .clone();
    assert!(state.error.is_none());
    assert_eq!(state.value.expect("refreshed log")[0].kind, DiaperKind::Wet);
}

#[tokio::test]
async fn refresh_failure_after_successful_write_surfaces_on_subscription() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/diaper"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/diaper/history"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dash = dashboard(&server).await;
    let mut log = dash.diaper_log();

    // The write's own outcome is success; the broken read path shows up
    // only on the subscription.
    dash.log_diaper(DiaperKind::Dirty).await.expect("write accepted");
    dash.refresh_diaper_log();

    let state = timeout(WAIT, log.wait_for(|s| s.error.is_some()))
        .await
        .expect("error within deadline")
        .expect("subscription alive")
        .clone();
    assert_eq!(state.error.as_ref().expect("read error").status(), Some(500));
    assert!(state.is_unavailable());
}

#[tokio::test]
async fn rejected_write_is_reported_to_the_caller() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/feeding"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dash = dashboard(&server).await;

    let err = dash
        .log_feeding(FeedingKind::Bottle, Some(120.0))
        .await
        .expect_err("backend rejected the write");
    assert!(matches!(err, CoreError::Rejected(_)));
}

#[tokio::test]
async fn unreachable_backend_write_is_classified() {
    // Port 9 (discard) refuses connections.
    let base = "http://127.0.0.1:9".parse().expect("url");
    let api = ApiClient::from_reqwest(base, reqwest::Client::new());
    let dash = Dashboard::new(api, &config(), today());

    let err = dash
        .log_diaper(DiaperKind::Both)
        .await
        .expect_err("nothing listening");
    assert!(matches!(err, CoreError::Unreachable(_)));
}

#[tokio::test]
async fn date_rollover_refetches_weekly_trend() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/sleep/weekly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let dash = dashboard(&server).await;
    let mut weekly = dash.weekly();

    timeout(WAIT, weekly.wait_for(|s| s.value.is_some()))
        .await
        .expect("initial trend within deadline")
        .expect("subscription alive");

    // Same date: no new request. Next date: exactly one more.
    dash.observe_date(today());
    dash.observe_date(today().succ_opt().expect("next day"));

    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        let hits = server
            .received_requests()
            .await
            .expect("request recording enabled")
            .iter()
            .filter(|r| r.url.path() == "/api/sleep/weekly")
            .count();
        if hits == 2 {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "expected a second weekly fetch, saw {hits}"
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

#[tokio::test]
async fn awake_classifier_feed_reaches_its_subscription() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/getResultAndReasons"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0.82,eyes open"))
        .mount(&server)
        .await;

    let dash = dashboard(&server).await;
    let mut awake = dash.awake_status();

    let state = timeout(WAIT, awake.wait_for(|s| s.value.is_some()))
        .await
        .expect("awake status within deadline")
        .expect("subscription alive")
        .clone();
    let status = state.value.expect("decoded status");
    assert_eq!(status.average_awake, 0.82);
    assert_eq!(status.reasons, vec!["eyes open"]);
}

#[tokio::test]
async fn stats_subscriptions_deliver_decoded_values() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/diaper/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 6,
            "wet": 4,
            "dirty": 2,
            "daily_average_7d": 5.5,
            "last_change": {"timestamp": "2024-06-01T08:30:00Z", "type": "both"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "is_awake": false,
            "body_found": true,
            "model_sees_baby": true,
            "focus_region_set": true
        })))
        .mount(&server)
        .await;

    let dash = dashboard(&server).await;
    let mut diaper = dash.diaper_stats();
    let mut health = dash.health();

    let stats = timeout(WAIT, diaper.wait_for(|s| s.value.is_some()))
        .await
        .expect("stats within deadline")
        .expect("subscription alive")
        .clone();
    let stats = stats.value.expect("decoded stats");
    assert_eq!(stats.total, 6);
    assert_eq!(
        stats.last_change.as_ref().expect("last change").kind,
        DiaperKind::Both
    );

    let health = timeout(WAIT, health.wait_for(|s| s.value.is_some()))
        .await
        .expect("health within deadline")
        .expect("subscription alive")
        .clone();
    assert!(!health.value.expect("decoded health").is_awake);

    dash.shutdown();
}
