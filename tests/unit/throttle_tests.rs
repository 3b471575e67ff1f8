// ==============================
// tests/unit/throttle_tests.rs
// ==============================
//! Validates the public behaviour of `LoginThrottle`
use std::time::{Duration, Instant};
use userauth_backend::auth::{LockStatus, LoginThrottle, LOCKOUT_THRESHOLD, THROTTLE_WINDOW};

#[test]
fn test_throttle_allows_initial_attempts() {
    let throttle = LoginThrottle::new();

    assert_eq!(throttle.is_locked("first@x.com", Instant::now()), LockStatus::OPEN);
}

#[test]
fn test_throttle_blocks_after_max_attempts() {
    let throttle = LoginThrottle::new();
    let now = Instant::now();

    for _ in 0..LOCKOUT_THRESHOLD {
        throttle.record_failure("blocked@x.com", now);
    }

    let status = throttle.is_locked("blocked@x.com", now);
    assert!(status.locked);
    assert!(status.retry_after_secs > 0);
}

#[test]
fn test_throttle_resets_after_success() {
    let throttle = LoginThrottle::new();
    let now = Instant::now();

    for _ in 0..3 {
        throttle.record_failure("reset@x.com", now);
    }
    assert!(!throttle.is_locked("reset@x.com", now).locked);

    throttle.record_success("reset@x.com");

    // a full run of failures is needed again
    for _ in 0..LOCKOUT_THRESHOLD - 1 {
        throttle.record_failure("reset@x.com", now);
    }
    assert!(!throttle.is_locked("reset@x.com", now).locked);

    throttle.record_failure("reset@x.com", now);
    assert!(throttle.is_locked("reset@x.com", now).locked);
}

#[test]
fn test_different_emails_tracked_separately() {
    let throttle = LoginThrottle::new();
    let now = Instant::now();

    for _ in 0..LOCKOUT_THRESHOLD {
        throttle.record_failure("one@x.com", now);
    }

    assert!(throttle.is_locked("one@x.com", now).locked);
    assert!(!throttle.is_locked("two@x.com", now).locked);
}

#[test]
fn test_scenario_one_minute_intervals() {
    let throttle = LoginThrottle::new();
    let start = Instant::now();
    let minute = Duration::from_secs(60);

    for i in 0..4 {
        throttle.record_failure("a@x.com", start + minute * i);
    }
    let fourth = start + minute * 3;
    assert!(!throttle.is_locked("a@x.com", fourth).locked);

    let fifth = start + minute * 4;
    throttle.record_failure("a@x.com", fifth);

    let check = fifth + Duration::from_secs(30);
    let status = throttle.is_locked("a@x.com", check);
    assert!(status.locked);
    assert_eq!(status.retry_after_secs, 1800 - 30);
}

#[test]
fn test_sixth_failure_after_window_counts_from_one() {
    let throttle = LoginThrottle::new();
    let start = Instant::now();

    for _ in 0..LOCKOUT_THRESHOLD {
        throttle.record_failure("a@x.com", start);
    }

    let later = start + THROTTLE_WINDOW + Duration::from_secs(1);
    assert!(!throttle.is_locked("a@x.com", later).locked);

    let status = throttle.record_failure("a@x.com", later);
    assert!(!status.locked);
    assert_eq!(throttle.attempts("a@x.com"), 1);
}

#[test]
fn test_parallel_failures_below_threshold() {
    let throttle = LoginThrottle::new();
    let now = Instant::now();
    let n = LOCKOUT_THRESHOLD - 1;

    let handles: Vec<_> = (0..n)
        .map(|_| {
            let throttle = throttle.clone();
            std::thread::spawn(move || throttle.record_failure("race@x.com", now))
        })
        .collect();
    for handle in handles {
        assert!(!handle.join().unwrap().locked);
    }

    assert_eq!(throttle.attempts("race@x.com"), n);
}
