//! Latency of a login for an unknown email vs. a wrong password.
//!
//! Both paths run exactly one scrypt comparison at the same cost, so their
//! medians should sit close together. The bounds are loose to stay stable
//! on noisy machines; an unknown email that skipped hashing would be
//! orders of magnitude faster.
use std::time::{Duration, Instant};
use userauth_backend::AppState;

use crate::test_utils::{setup_test_state_with_cost, ALICE_EMAIL};

const SAMPLES: usize = 15;
const LOG_N: u8 = 12;

async fn median_latency(state: &AppState, email: &str) -> Duration {
    let mut samples = Vec::with_capacity(SAMPLES);
    for _ in 0..SAMPLES {
        let start = Instant::now();
        let _ = state.login.login(email, "Wr0ng!password").await;
        samples.push(start.elapsed());
        // stay under the lockout threshold
        state.throttle().record_success(email);
    }
    samples.sort();
    samples[SAMPLES / 2]
}

#[tokio::test]
async fn test_unknown_email_costs_the_same_as_wrong_password() {
    let (state, _clock) = setup_test_state_with_cost(LOG_N).await;

    // warm up allocator and blocking pool
    let _ = median_latency(&state, ALICE_EMAIL).await;

    let existing = median_latency(&state, ALICE_EMAIL).await;
    let missing = median_latency(&state, "nobody@example.com").await;

    let ratio = missing.as_secs_f64() / existing.as_secs_f64();
    assert!(
        (0.33..3.0).contains(&ratio),
        "unknown email {missing:?} vs wrong password {existing:?}"
    );
}
