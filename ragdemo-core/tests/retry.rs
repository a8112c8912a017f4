use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use ragdemo_core::{retry_with_backoff, EmbeddingError, RetryPolicy};

async fn flaky(
    attempts: Arc<AtomicUsize>,
    failures_before_success: usize,
) -> Result<String, EmbeddingError> {
    let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
    if attempt <= failures_before_success {
        return Err(EmbeddingError::Provider("transient".to_string()));
    }
    Ok("ok".to_string())
}

#[tokio::test(start_paused = true)]
async fn retries_until_success() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(3);

    let output = retry_with_backoff(&policy, EmbeddingError::is_retryable, || {
        flaky(Arc::clone(&attempts), 2)
    })
    .await
    .unwrap();

    assert_eq!(output, "ok");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn returns_last_error_when_attempts_exhausted() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(2);

    let err = retry_with_backoff(&policy, EmbeddingError::is_retryable, || {
        flaky(Arc::clone(&attempts), 5)
    })
    .await
    .unwrap_err();

    assert!(matches!(err, EmbeddingError::Provider(_)));
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn does_not_retry_permanent_errors() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);

    let err = retry_with_backoff(&RetryPolicy::new(5), EmbeddingError::is_retryable, || {
        let counter = Arc::clone(&counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<(), _>(EmbeddingError::InvalidResponse("bad".to_string()))
        }
    })
    .await
    .unwrap_err();

    assert!(matches!(err, EmbeddingError::InvalidResponse(_)));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn zero_attempts_still_runs_once() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let policy = RetryPolicy::new(0);

    let output = retry_with_backoff(&policy, EmbeddingError::is_retryable, || {
        flaky(Arc::clone(&attempts), 0)
    })
    .await
    .unwrap();

    assert_eq!(output, "ok");
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[test]
fn backoff_doubles_and_caps() {
    let policy = RetryPolicy {
        max_attempts: 10,
        initial_backoff: Duration::from_millis(100),
        max_backoff: Duration::from_millis(500),
    };

    assert_eq!(policy.backoff_for(1), Duration::from_millis(100));
    assert_eq!(policy.backoff_for(2), Duration::from_millis(200));
    assert_eq!(policy.backoff_for(3), Duration::from_millis(400));
    assert_eq!(policy.backoff_for(4), Duration::from_millis(500));
}
