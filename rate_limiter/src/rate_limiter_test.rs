use crate::{RateLimiter, RateLimiterError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test]
async fn test_allow_within_limit() {
    let limiter = RateLimiter::new(Duration::from_millis(100), 10);

    assert!(limiter.allow(5).await.is_ok());
    assert!(limiter.allow(5).await.is_ok());
    assert_eq!(limiter.used_weight().await, 10);
}

#[tokio::test]
async fn test_allow_rejects_invalid_weight() {
    let limiter = RateLimiter::new(Duration::from_millis(100), 10);

    assert!(matches!(
        limiter.allow(0).await.unwrap_err(),
        RateLimiterError::InvalidWeight { .. }
    ));
    assert!(matches!(
        limiter.wait(11).await.unwrap_err(),
        RateLimiterError::InvalidWeight { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn test_allow_limited_until_window_slides() {
    let limiter = RateLimiter::new(Duration::from_millis(100), 10);

    limiter.allow(8).await.unwrap();
    match limiter.allow(5).await {
        Err(RateLimiterError::Limited { retry_after_millis }) => {
            assert_eq!(retry_after_millis, 100)
        }
        other => panic!("unexpected result: {:?}", other),
    }

    tokio::time::advance(Duration::from_millis(101)).await;
    assert!(limiter.allow(5).await.is_ok());
    assert_eq!(limiter.used_weight().await, 5);
}

#[tokio::test(start_paused = true)]
async fn test_wait_sleeps_until_weight_released() {
    let limiter = RateLimiter::new(Duration::from_secs(1), 10);
    limiter.wait(10).await.unwrap();

    let start = Instant::now();
    limiter.wait(3).await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_waiters_respect_limit() {
    let limiter = Arc::new(RateLimiter::new(Duration::from_secs(1), 4));
    let start = Instant::now();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let limiter = limiter.clone();
        handles.push(tokio::spawn(async move {
            limiter.wait(1).await.unwrap();
            Instant::now()
        }));
    }

    let mut finished = Vec::new();
    for handle in handles {
        finished.push(handle.await.unwrap());
    }

    let immediate = finished
        .iter()
        .filter(|t| t.duration_since(start) < Duration::from_secs(1))
        .count();
    assert_eq!(immediate, 4);
}
