use std::sync::Mutex;
use std::time::Duration;

use insight_engine::{
    execute, DeliveryFailureKind, ReqwestTransport, RequestDescriptor, RetryPolicy, Transport,
    TransportError, TransportResponse, TransportSettings,
};
use pretty_assertions::assert_eq;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Transport that never produces a response, recording when each attempt
/// was issued.
#[derive(Default)]
struct FailingTransport {
    attempts: Mutex<Vec<Instant>>,
}

#[async_trait::async_trait]
impl Transport for FailingTransport {
    async fn send(
        &self,
        _request: &RequestDescriptor,
    ) -> Result<TransportResponse, TransportError> {
        self.attempts.lock().unwrap().push(Instant::now());
        Err(TransportError {
            message: "connection refused".to_string(),
        })
    }
}

fn reqwest_transport(server: &MockServer) -> ReqwestTransport {
    let base = url::Url::parse(&server.uri()).expect("server uri");
    ReqwestTransport::new(base, TransportSettings::default()).expect("transport")
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy::default().with_initial_delay(Duration::from_millis(5))
}

#[tokio::test(start_paused = true)]
async fn transport_failures_exhaust_budget_with_doubling_delays() {
    let transport = FailingTransport::default();
    let policy = RetryPolicy::default()
        .with_max_attempts(4)
        .with_initial_delay(Duration::from_millis(100));
    let request = RequestDescriptor::get("/api/insights");

    let error = execute(&transport, &request, &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind, DeliveryFailureKind::Transport);
    assert_eq!(error.message, "connection refused");

    let attempts = transport.attempts.lock().unwrap();
    assert_eq!(attempts.len(), 4);
    let gaps: Vec<u64> = attempts
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).as_millis() as u64)
        .collect();
    assert_eq!(gaps, vec![100, 200, 400]);
}

#[tokio::test(start_paused = true)]
async fn max_delay_caps_the_backoff_schedule() {
    let transport = FailingTransport::default();
    let policy = RetryPolicy::default()
        .with_max_attempts(5)
        .with_initial_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_millis(150));
    let request = RequestDescriptor::get("/api/insights");

    let _ = execute(&transport, &request, &policy, &CancellationToken::new()).await;

    let attempts = transport.attempts.lock().unwrap();
    let gaps: Vec<u64> = attempts
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).as_millis() as u64)
        .collect();
    assert_eq!(gaps, vec![100, 150, 150, 150]);
}

#[tokio::test]
async fn client_error_is_terminal_after_one_attempt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            serde_json::json!({"error": "Missing required fields: goal, sites"}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let transport = reqwest_transport(&server);
    let request = RequestDescriptor::post("/api/analyze", serde_json::json!({}));

    let error = execute(&transport, &request, &fast_policy(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind, DeliveryFailureKind::HttpStatus(400));
    assert_eq!(error.message, "Missing required fields: goal, sites");
}

#[tokio::test]
async fn client_error_without_body_gets_a_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/insights"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let transport = reqwest_transport(&server);
    let request = RequestDescriptor::get("/api/insights");

    let error = execute(&transport, &request, &fast_policy(), &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind, DeliveryFailureKind::HttpStatus(404));
    assert_eq!(error.message, "HTTP error, status 404");
}

#[tokio::test]
async fn server_error_then_success_takes_two_attempts() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/insights"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/insights"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let transport = reqwest_transport(&server);
    let request = RequestDescriptor::get("/api/insights");

    let response = execute(&transport, &request, &fast_policy(), &CancellationToken::new())
        .await
        .expect("second attempt succeeds");

    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn persistent_server_errors_exhaust_the_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/insights"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let transport = reqwest_transport(&server);
    let policy = fast_policy().with_max_attempts(3);
    let request = RequestDescriptor::get("/api/insights");

    let error = execute(&transport, &request, &policy, &CancellationToken::new())
        .await
        .unwrap_err();

    assert_eq!(error.kind, DeliveryFailureKind::HttpStatus(503));
    assert_eq!(error.message, "server error: 503");
}

#[tokio::test]
async fn cancellation_interrupts_the_backoff_sleep() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/insights"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let transport = reqwest_transport(&server);
    let policy = RetryPolicy::default().with_initial_delay(Duration::from_secs(30));
    let cancel = CancellationToken::new();
    let task = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let request = RequestDescriptor::get("/api/insights");
            execute(&transport, &request, &policy, &cancel).await
        })
    };

    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();

    let error = task.await.expect("task joins").unwrap_err();
    assert_eq!(error.kind, DeliveryFailureKind::Cancelled);
}

#[tokio::test]
async fn cancelled_token_prevents_any_attempt() {
    let transport = FailingTransport::default();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let request = RequestDescriptor::get("/api/insights");

    let error = execute(&transport, &request, &RetryPolicy::default(), &cancel)
        .await
        .unwrap_err();

    assert_eq!(error.kind, DeliveryFailureKind::Cancelled);
    assert!(transport.attempts.lock().unwrap().is_empty());
}
