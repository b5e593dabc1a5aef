use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_test::{assert_err, assert_ok};
use repo_organizer::enums::wait_policy::WaitPolicy;
use repo_organizer::errors::OrganizerError;
use repo_organizer::services::rate_limiter::ApiRateLimiter;

#[tokio::test(start_paused = true)]
async fn test_concurrent_callers_are_spaced_by_the_interval() {
    let limiter = Arc::new(ApiRateLimiter::default().with_service("llm", 60));
    let started = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..5 {
        let limiter = Arc::clone(&limiter);
        handles.push(tokio::spawn(async move { limiter.wait("llm").await }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert!(started.elapsed() >= Duration::from_secs(4));
    let stats = limiter.stats("llm").await.unwrap();
    assert_eq!(stats.total_calls, 5);
    assert_eq!(stats.total_waits, 4);
}

#[tokio::test(start_paused = true)]
async fn test_services_are_limited_independently() {
    let limiter = ApiRateLimiter::default()
        .with_service("github", 1)
        .with_service("llm", 1);
    let started = Instant::now();

    limiter.wait("github").await.unwrap();
    limiter.wait("llm").await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_fail_fast_refuses_long_waits() {
    let limiter = ApiRateLimiter::new(WaitPolicy::FailFast {
        max_wait: Duration::from_secs(1),
    })
    .with_service("llm", 6);

    assert_ok!(limiter.wait("llm").await);
    let error = assert_err!(limiter.wait("llm").await);

    assert!(matches!(error, OrganizerError::RateLimitExceeded { .. }));
    assert!(!error.is_retryable());
}
