use std::time::Duration;

use client_logging::{client_error, client_warn};
use tokio_util::sync::CancellationToken;

use crate::types::embedded_error;
use crate::{
    DeliveryError, DeliveryFailureKind, RequestDescriptor, RetryPolicy, Transport, TransportError,
    TransportResponse,
};

/// Classification of one attempt.
enum AttemptOutcome {
    Success(TransportResponse),
    Retryable(DeliveryError),
    Terminal(DeliveryError),
}

/// Delivers `request` through `transport`, retrying transient failures
/// according to `policy`.
///
/// Transport failures and 5xx statuses are transient; any other non-success
/// status is terminal and surfaces the server-supplied error message when
/// present. `cancel` is observed at both suspend points, the backoff sleep
/// and the in-flight attempt. The descriptor is never mutated.
pub async fn execute(
    transport: &dyn Transport,
    request: &RequestDescriptor,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<TransportResponse, DeliveryError> {
    let mut delay = policy.initial_delay;

    for attempt in 0..policy.max_attempts {
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(cancelled_error()),
            sent = transport.send(request) => sent,
        };

        match classify(sent) {
            AttemptOutcome::Success(response) => return Ok(response),
            AttemptOutcome::Terminal(error) => return Err(error),
            AttemptOutcome::Retryable(error) => {
                if attempt + 1 >= policy.max_attempts {
                    client_error!(
                        "all {} delivery attempts for {} failed",
                        policy.max_attempts,
                        request.path
                    );
                    return Err(error);
                }
                client_warn!(
                    "attempt {} of {} for {} failed: {}; retrying in {}ms",
                    attempt + 1,
                    policy.max_attempts,
                    request.path,
                    error.message,
                    delay.as_millis()
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(cancelled_error()),
                    _ = tokio::time::sleep(delay) => {}
                }
                delay = next_delay(delay, policy);
            }
        }
    }

    Err(DeliveryError::new(
        DeliveryFailureKind::Transport,
        "retry policy permits no attempts",
    ))
}

fn cancelled_error() -> DeliveryError {
    DeliveryError::new(DeliveryFailureKind::Cancelled, "delivery cancelled")
}

fn classify(sent: Result<TransportResponse, TransportError>) -> AttemptOutcome {
    match sent {
        Err(error) => AttemptOutcome::Retryable(DeliveryError::new(
            DeliveryFailureKind::Transport,
            error.message,
        )),
        Ok(response) if (500..=599).contains(&response.status) => {
            AttemptOutcome::Retryable(DeliveryError::new(
                DeliveryFailureKind::HttpStatus(response.status),
                format!("server error: {}", response.status),
            ))
        }
        Ok(response) if (200..300).contains(&response.status) => {
            AttemptOutcome::Success(response)
        }
        Ok(response) => AttemptOutcome::Terminal(DeliveryError::new(
            DeliveryFailureKind::HttpStatus(response.status),
            terminal_message(&response),
        )),
    }
}

/// Server-supplied error text when present, generic status message otherwise.
fn terminal_message(response: &TransportResponse) -> String {
    embedded_error(&response.body)
        .unwrap_or_else(|| format!("HTTP error, status {}", response.status))
}

fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let multiplier = f64::from(policy.backoff_multiplier).max(1.0);
    let scaled = Duration::from_secs_f64(current.as_secs_f64() * multiplier);
    match policy.max_delay {
        Some(cap) => scaled.min(cap),
        None => scaled,
    }
}
