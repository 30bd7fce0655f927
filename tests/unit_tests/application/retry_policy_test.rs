use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use nutrilab::application::ports::AiClientError;
use nutrilab::application::services::{RetryPolicy, ServiceError};

#[test]
fn given_default_policy_when_computing_delays_then_grows_by_base() {
    let policy = RetryPolicy::default();

    assert_eq!(policy.max_attempts(), 3);
    assert_eq!(policy.delay_for(0), Duration::from_secs(1));
    assert_eq!(policy.delay_for(1), Duration::from_secs_f64(1.5));
    assert_eq!(policy.delay_for(2), Duration::from_secs_f64(2.25));
}

#[test]
fn given_zero_attempts_when_creating_policy_then_clamps_to_one() {
    assert_eq!(RetryPolicy::new(0, 2.0).max_attempts(), 1);
}

#[tokio::test(start_paused = true)]
async fn given_two_rate_limits_when_executing_then_third_attempt_succeeds() {
    let calls = AtomicU32::new(0);
    let started = tokio::time::Instant::now();

    let result = RetryPolicy::default()
        .execute("test", || async {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(AiClientError::RateLimited)
            } else {
                Ok("done")
            }
        })
        .await;

    assert_eq!(result.unwrap(), "done");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(started.elapsed() >= Duration::from_secs_f64(2.5));
}

#[tokio::test(start_paused = true)]
async fn given_persistent_rate_limit_when_executing_then_fails_after_max_attempts() {
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = RetryPolicy::default()
        .execute("meal plan generation", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AiClientError::RateLimited)
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 3);
    match result {
        Err(ServiceError::RequestFailed {
            operation,
            attempts,
            source,
        }) => {
            assert_eq!(operation, "meal plan generation");
            assert_eq!(attempts, 3);
            assert!(source.is_rate_limited());
        }
        other => panic!("expected RequestFailed, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn given_non_rate_limit_error_when_executing_then_fails_without_retry() {
    let calls = AtomicU32::new(0);
    let started = tokio::time::Instant::now();

    let result: Result<(), _> = RetryPolicy::default()
        .execute("test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AiClientError::ApiRequestFailed {
                status: 500,
                body: "boom".to_string(),
            })
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(matches!(
        result,
        Err(ServiceError::RequestFailed {
            attempts: 1,
            source: AiClientError::ApiRequestFailed { status: 500, .. },
            ..
        })
    ));
}

#[tokio::test(start_paused = true)]
async fn given_timeout_when_executing_then_fails_without_retry() {
    let calls = AtomicU32::new(0);

    let result: Result<(), _> = RetryPolicy::default()
        .execute("test", || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(AiClientError::Timeout)
        })
        .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(matches!(
        result,
        Err(ServiceError::RequestFailed {
            source: AiClientError::Timeout,
            ..
        })
    ));
}
