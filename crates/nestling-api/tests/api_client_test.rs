// Integration tests for `ApiClient` using wiremock.

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nestling_api::{ApiClient, DiaperKind, Error, FeedingKind, Urgency};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base = server.uri().parse().expect("mock server uri");
    let client = ApiClient::from_reqwest(base, reqwest::Client::new());
    (server, client)
}

// ── Sleep resources ─────────────────────────────────────────────────

#[tokio::test]
async fn sleep_stats_decodes_nested_shapes() {
    let (server, client) = setup().await;

    let body = json!({
        "total_nap_minutes": 145.5,
        "nap_count": 3,
        "longest_nap_minutes": 62.0,
        "wake_window": {
            "awake_minutes": 75.0,
            "window_min_minutes": 75.0,
            "window_max_minutes": 105.0,
            "remaining_minutes": 30.0,
            "urgency": "yellow",
            "baby_age_months": 3
        },
        "night_sleep": {
            "total_minutes": 540.0,
            "wake_count": 2,
            "longest_stretch_minutes": 240.0
        }
    });

    Mock::given(method("GET"))
        .and(path("/api/sleep/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let stats = client.sleep_stats().await.expect("sleep stats");

    assert_eq!(stats.nap_count, 3);
    assert_eq!(stats.wake_window.urgency, Urgency::Yellow);
    assert_eq!(stats.wake_window.baby_age_months, 3);
    assert_eq!(stats.night_sleep.wake_count, 2);
}

#[tokio::test]
async fn sleep_weekly_preserves_order() {
    let (server, client) = setup().await;

    let body = json!([
        { "date": "2024-03-01", "day_label": "Fri",
          "total_nap_minutes": 120.0, "nap_count": 2, "longest_nap_minutes": 80.0 },
        { "date": "2024-03-02", "day_label": "Sat",
          "total_nap_minutes": 95.0, "nap_count": 3, "longest_nap_minutes": 40.0 },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/sleep/weekly"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let week = client.sleep_weekly().await.expect("weekly trend");

    assert_eq!(week.len(), 2);
    assert_eq!(week[0].date, "2024-03-01");
    assert_eq!(week[1].day_label, "Sat");
}

// ── Diaper resources ────────────────────────────────────────────────

#[tokio::test]
async fn log_diaper_posts_typed_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/diaper"))
        .and(body_json(json!({ "type": "dirty" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .log_diaper(DiaperKind::Dirty)
        .await
        .expect("diaper write");
}

#[tokio::test]
async fn log_diaper_succeeds_regardless_of_ack_body() {
    // Success is decided solely by the HTTP status, never by body shape.
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/diaper"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&server)
        .await;

    client.log_diaper(DiaperKind::Wet).await.expect("write ok");
}

#[tokio::test]
async fn diaper_stats_with_and_without_last_change() {
    let (server, client) = setup().await;

    let body = json!({
        "total": 6, "wet": 4, "dirty": 2, "daily_average_7d": 8.2,
        "last_change": { "timestamp": "2024-01-01T10:00:00Z", "type": "wet" }
    });

    Mock::given(method("GET"))
        .and(path("/api/diaper/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let stats = client.diaper_stats().await.expect("diaper stats");
    assert_eq!(stats.total, 6);
    assert_eq!(stats.daily_average_7d, 8.2);
    let last = stats.last_change.expect("last change present");
    assert_eq!(last.kind, DiaperKind::Wet);

    server.reset().await;

    let body = json!({
        "total": 0, "wet": 0, "dirty": 0, "daily_average_7d": 0.0,
        "last_change": null
    });
    Mock::given(method("GET"))
        .and(path("/api/diaper/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let stats = client.diaper_stats().await.expect("empty stats");
    assert!(stats.last_change.is_none());
}

#[tokio::test]
async fn diaper_history_passes_limit() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": 12, "type": "both", "timestamp": "2024-03-02T09:30:00Z", "notes": "" },
        { "id": 11, "type": "wet", "timestamp": "2024-03-02T06:10:00Z" },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/diaper/history"))
        .and(query_param("limit", "25"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let events = client.diaper_history(25).await.expect("history");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, 12);
    assert_eq!(events[0].kind, DiaperKind::Both);
}

// ── Feeding resources ───────────────────────────────────────────────

#[tokio::test]
async fn log_feeding_omits_absent_amount() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/feeding"))
        .and(body_json(json!({ "type": "nursing" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    client
        .log_feeding(FeedingKind::Nursing, None)
        .await
        .expect("feeding write");
}

#[tokio::test]
async fn feeding_history_decodes_amounts() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": 4, "type": "bottle", "amount_ml": 120.0, "timestamp": "2024-03-02T12:00:00Z" },
        { "id": 3, "type": "nursing", "amount_ml": null, "timestamp": "2024-03-02T08:00:00Z" },
    ]);

    Mock::given(method("GET"))
        .and(path("/api/feeding/history"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let events = client.feeding_history(10).await.expect("history");
    assert_eq!(events[0].amount_ml, Some(120.0));
    assert_eq!(events[1].kind, FeedingKind::Nursing);
    assert!(events[1].amount_ml.is_none());
}

// ── Legacy plain-text / delimited modes ─────────────────────────────

#[tokio::test]
async fn notifications_toggle_round_trip() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/getSleepNotificationsEnabled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/setSleepNotificationsEnabled/false"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.notifications_enabled().await.expect("toggle state"));
    client
        .set_notifications_enabled(false)
        .await
        .expect("toggle write");
}

#[tokio::test]
async fn awake_status_parses_delimited_line() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/getResultAndReasons"))
        .respond_with(ResponseTemplate::new(200).set_body_string("0.82,eyes open,movement"))
        .mount(&server)
        .await;

    let status = client.awake_status().await.expect("awake status");
    assert_eq!(status.average_awake, 0.82);
    assert_eq!(status.reasons, vec!["eyes open", "movement"]);
}

#[tokio::test]
async fn awake_status_rejects_garbage() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/getResultAndReasons"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Bounds not set.,,, False"))
        .mount(&server)
        .await;

    let err = client.awake_status().await.expect_err("should not parse");
    assert!(err.is_decode());
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn non_success_status_becomes_api_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sleep/stats"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = client.sleep_stats().await.expect_err("should fail");
    match err {
        Error::Api {
            status,
            ref status_text,
        } => {
            assert_eq!(status, 503);
            assert_eq!(status_text, "Service Unavailable");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn decode_preview_clips_at_char_boundaries() {
    let (server, client) = setup().await;

    // 'é' straddles byte 200, where the error's body preview is cut.
    let body = format!("{}é{}", "x".repeat(199), "x".repeat(50));
    Mock::given(method("GET"))
        .and(path("/api/diaper/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let err = client.diaper_stats().await.expect_err("not json");
    assert!(err.is_decode());
}

#[tokio::test]
async fn malformed_success_body_becomes_decode_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/diaper/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"total\": \"six\"}"))
        .mount(&server)
        .await;

    let err = client.diaper_stats().await.expect_err("should fail");
    assert!(err.is_decode());
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn unreachable_server_becomes_network_error() {
    // Nothing listens on this port.
    let base = "http://127.0.0.1:9".parse().expect("url");
    let client = ApiClient::from_reqwest(base, reqwest::Client::new());

    let err = client.health().await.expect_err("should fail");
    assert!(err.is_network());
}
