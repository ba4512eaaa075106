//! End-to-end verification against an in-process mock of the siteverify API.

use axum::{
    Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use friendly_captcha::{Client, ErrorCode, TransportError, VerificationOutcome};

#[derive(Clone)]
struct MockApi {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    hits: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<(HeaderMap, String)>>>,
}

impl MockApi {
    fn new(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
            hits: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> (HeaderMap, String) {
        self.last_request.lock().unwrap().clone().expect("no request received")
    }

    /// Serve the mock on an ephemeral port and return its base URL
    async fn spawn(&self) -> String {
        let app = Router::new()
            .route("/api/v2/captcha/siteverify", post(siteverify))
            .with_state(self.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{addr}")
    }
}

async fn siteverify(
    State(api): State<MockApi>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, &'static str) {
    api.hits.fetch_add(1, Ordering::SeqCst);
    *api.last_request.lock().unwrap() = Some((headers, body));

    if !api.delay.is_zero() {
        tokio::time::sleep(api.delay).await;
    }
    (api.status, api.body)
}

/// A base URL nothing is listening on
async fn unreachable_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn client(endpoint: &str, strict: bool) -> Client {
    Client::builder()
        .api_key("YOUR_API_KEY")
        .sitekey("YOUR_SITE_KEY")
        .api_endpoint(endpoint)
        .strict(strict)
        .build()
        .unwrap()
}

const SUCCESS_BODY: &str = r#"{
    "success": true,
    "data": {
        "event_id": "ev_7fKxR2",
        "challenge": {"timestamp": "2025-01-15T12:30:00Z", "origin": "https://example.com"}
    }
}"#;

const INVALID_BODY: &str =
    r#"{"success":false,"error":{"error_code":"response_invalid","detail":"response is invalid"}}"#;

const AUTH_INVALID_BODY: &str = r#"{"error":{"error_code":"auth_invalid"}}"#;

const RISK_INTELLIGENCE_BODY: &str = r#"{
    "success": true,
    "data": {
        "event_id": "ev_9aQw1L",
        "challenge": {"timestamp": "2025-01-15T12:30:00Z", "origin": "https://example.com"},
        "risk_intelligence": {
            "risk_scores": {"overall": 4, "network": 5, "browser": 2},
            "network": {
                "ip": "88.64.4.22",
                "as": {"number": 3209, "name": "VODANET", "type": "isp"},
                "anonymization": {"vpn_score": 5, "proxy_score": 1, "tor": false, "icloud_private_relay": false}
            },
            "client": {
                "header_user_agent": "Mozilla/5.0",
                "automation": {"headless": true}
            }
        }
    }
}"#;

/// Verdicts whose informational fields are null or do not match the typed model
const LOOSE_SUCCESS_BODIES: [&str; 4] = [
    r#"{"success":true,"data":{"event_id":"e","risk_intelligence":{"network":{"ip":"1.2.3.4","as":{"name":null}}}}}"#,
    r#"{"success":true,"data":{"event_id":"e","risk_intelligence":{"network":{"ip":"1.2.3.4"},"client":null}}}"#,
    r#"{"success":true,"data":{"event_id":null,"challenge":null}}"#,
    r#"{"success":true,"data":{"risk_intelligence":{"risk_scores":{"overall":"high"},"network":[]}}}"#,
];

#[tokio::test]
async fn test_valid_token_is_accepted() {
    let api = MockApi::new(StatusCode::OK, SUCCESS_BODY);
    let endpoint = api.spawn().await;

    let result = client(&endpoint, false).verify("valid-token").await;

    assert!(result.should_accept());
    assert!(result.was_able_to_verify());
    assert!(!result.is_client_error());
    assert!(result.success());
    assert_eq!(result.status(), Some(200));

    let data = result.response().unwrap().data.as_ref().unwrap();
    assert_eq!(data.event_id, "ev_7fKxR2");
    assert_eq!(data.challenge.origin, "https://example.com");
}

#[tokio::test]
async fn test_bad_token_is_rejected_even_when_lenient() {
    let api = MockApi::new(StatusCode::OK, INVALID_BODY);
    let endpoint = api.spawn().await;

    for strict in [false, true] {
        let result = client(&endpoint, strict).verify("bad-token").await;

        assert!(!result.should_accept());
        assert!(result.should_reject());
        assert!(result.was_able_to_verify());
        assert!(!result.is_client_error());
        assert!(result.request_error().is_none());
        assert_eq!(
            result.response().unwrap().error_code(),
            Some(&ErrorCode::ResponseInvalid)
        );
    }
}

#[tokio::test]
async fn test_unreachable_api_fails_open() {
    let endpoint = unreachable_endpoint().await;

    let result = client(&endpoint, false).verify("valid-token").await;

    assert!(result.should_accept());
    assert!(!result.was_able_to_verify());
    assert!(!result.is_client_error());
    assert!(result.is_transport_error());
    assert_eq!(result.status(), None);
    match result.outcome() {
        VerificationOutcome::Transport(e) => assert!(e.is_connect(), "{e}"),
        other => panic!("expected transport failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_api_rejects_in_strict_mode() {
    let endpoint = unreachable_endpoint().await;

    let result = client(&endpoint, true).verify("valid-token").await;

    assert!(!result.should_accept());
    assert!(!result.was_able_to_verify());
    assert!(result.is_transport_error());
}

#[tokio::test]
async fn test_invalid_api_key_fails_open_as_client_error() {
    let api = MockApi::new(StatusCode::UNAUTHORIZED, AUTH_INVALID_BODY);
    let endpoint = api.spawn().await;

    let result = client(&endpoint, false).verify("valid-token").await;

    assert!(result.should_accept());
    assert!(!result.was_able_to_verify());
    assert!(result.is_client_error());
    assert!(!result.is_transport_error());
    assert_eq!(result.status(), Some(401));
    assert_eq!(
        result.response().unwrap().error_code(),
        Some(&ErrorCode::AuthInvalid)
    );

    let strict = client(&endpoint, true).verify("valid-token").await;
    assert!(!strict.should_accept());
    assert!(strict.is_client_error());
}

#[tokio::test]
async fn test_request_shape() {
    let api = MockApi::new(StatusCode::OK, SUCCESS_BODY);
    let endpoint = api.spawn().await;

    client(&endpoint, false).verify("valid-token").await;

    assert_eq!(api.hits(), 1);
    let (headers, body) = api.last_request();
    assert_eq!(headers["content-type"], "application/json");
    assert_eq!(headers["x-api-key"], "YOUR_API_KEY");
    assert_eq!(
        headers["x-frc-sdk"].to_str().unwrap(),
        friendly_captcha::sdk_header_value()
    );

    let body: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"response": "valid-token", "sitekey": "YOUR_SITE_KEY"})
    );
}

#[tokio::test]
async fn test_token_passed_through_and_sitekey_omitted() {
    let api = MockApi::new(StatusCode::BAD_REQUEST, r#"{"error":{"error_code":"response_missing"}}"#);
    let endpoint = api.spawn().await;

    let client = Client::builder()
        .api_key("YOUR_API_KEY")
        .api_endpoint(&endpoint)
        .build()
        .unwrap();
    let result = client.verify("").await;

    let (_, body) = api.last_request();
    assert_eq!(body, r#"{"response":""}"#);
    assert!(result.is_client_error());
    assert!(result.should_accept());
}

#[tokio::test]
async fn test_unparsable_error_page_is_transport_error() {
    let api = MockApi::new(StatusCode::BAD_GATEWAY, "<html><body>502 Bad Gateway</body></html>");
    let endpoint = api.spawn().await;

    let result = client(&endpoint, false).verify("valid-token").await;

    assert!(result.should_accept());
    assert!(!result.was_able_to_verify());
    assert!(!result.is_client_error());
    assert!(result.is_transport_error());
    assert_eq!(result.status(), Some(502));
    assert!(matches!(
        result.outcome(),
        VerificationOutcome::Transport(TransportError::Decode { status: 502, .. })
    ));

    assert!(!client(&endpoint, true).verify("valid-token").await.should_accept());
}

#[tokio::test]
async fn test_unparsable_ok_body_is_not_a_verdict() {
    let api = MockApi::new(StatusCode::OK, "OK");
    let endpoint = api.spawn().await;

    let result = client(&endpoint, false).verify("valid-token").await;

    assert!(!result.was_able_to_verify());
    assert!(result.is_transport_error());
    assert!(result.should_accept());
    assert!(result.response().is_none());
}

#[tokio::test]
async fn test_risk_intelligence_is_delivered() {
    let api = MockApi::new(StatusCode::OK, RISK_INTELLIGENCE_BODY);
    let endpoint = api.spawn().await;

    let result = client(&endpoint, true).verify("valid-token").await;

    assert!(result.was_able_to_verify());
    assert!(result.should_accept());

    let data = result.response().unwrap().data.as_ref().unwrap();
    let ri = data.risk_intelligence.as_ref().unwrap();
    assert!(ri.risk_scores.as_ref().unwrap().overall.is_high());
    assert_eq!(ri.network.autonomous_system.as_ref().unwrap().number, 3209);
    assert_eq!(
        ri.network.anonymization.as_ref().unwrap().vpn_score,
        friendly_captcha::wire::RiskScore::VERY_HIGH
    );
    assert!(ri.client.automation_detected());
    assert!(data.risk_intelligence_raw.as_ref().unwrap().get().contains("VODANET"));
}

#[tokio::test]
async fn test_loose_informational_fields_keep_the_verdict() {
    for body in LOOSE_SUCCESS_BODIES {
        let api = MockApi::new(StatusCode::OK, body);
        let endpoint = api.spawn().await;

        let result = client(&endpoint, true).verify("valid-token").await;

        assert!(
            result.was_able_to_verify() && result.should_accept(),
            "{body}: {:?}",
            result.request_error().map(|e| e.to_string())
        );
        assert!(result.response().unwrap().data.is_some());
    }
}

#[tokio::test]
async fn test_trailing_data_is_malformed() {
    let api = MockApi::new(StatusCode::OK, r#"{"success":true} {"success":false}"#);
    let endpoint = api.spawn().await;

    let result = client(&endpoint, true).verify("valid-token").await;

    assert!(!result.was_able_to_verify());
    assert!(!result.should_accept());
    assert!(matches!(
        result.outcome(),
        VerificationOutcome::Transport(TransportError::Decode { status: 200, .. })
    ));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let api = MockApi::new(StatusCode::OK, SUCCESS_BODY).with_delay(Duration::from_secs(5));
    let endpoint = api.spawn().await;

    let client = Client::builder()
        .api_key("YOUR_API_KEY")
        .api_endpoint(&endpoint)
        .timeout(Duration::from_millis(100))
        .strict(true)
        .build()
        .unwrap();
    let result = client.verify("valid-token").await;

    assert!(!result.should_accept());
    assert!(result.is_transport_error());
    match result.outcome() {
        VerificationOutcome::Transport(e) => assert!(e.is_timeout(), "{e}"),
        other => panic!("expected transport failure, got {other:?}"),
    }
    assert_eq!(api.hits(), 1);
}

#[tokio::test]
async fn test_caller_cancellation_aborts_request() {
    let api = MockApi::new(StatusCode::OK, SUCCESS_BODY).with_delay(Duration::from_secs(5));
    let endpoint = api.spawn().await;
    let client = client(&endpoint, false);

    let cancelled =
        tokio::time::timeout(Duration::from_millis(200), client.verify("valid-token")).await;

    assert!(cancelled.is_err());
    assert_eq!(api.hits(), 1);
}

#[tokio::test]
async fn test_concurrent_verifications_share_one_client() {
    let api = MockApi::new(StatusCode::OK, SUCCESS_BODY);
    let endpoint = api.spawn().await;
    let client = Arc::new(client(&endpoint, false));

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client.verify(&format!("token-{i}")).await.should_accept()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap());
    }

    assert_eq!(api.hits(), 8);
}

#[tokio::test]
#[allow(deprecated)]
async fn test_legacy_siteverify_endpoint() {
    let api = MockApi::new(StatusCode::OK, SUCCESS_BODY);
    let endpoint = api.spawn().await;

    let client = Client::builder()
        .api_key("YOUR_API_KEY")
        .siteverify_endpoint(&format!("{endpoint}/api/v2/captcha/siteverify"))
        .build()
        .unwrap();
    assert_eq!(client.api_endpoint(), endpoint);

    let result = client.verify("valid-token").await;
    assert!(result.was_able_to_verify());
    assert_eq!(api.hits(), 1);
}
