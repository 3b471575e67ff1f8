// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const LOGIN_SUCCESS: &str = "login.success";
pub const LOGIN_FAILURE: &str = "login.failure";
pub const LOGIN_LOCKED: &str = "login.locked";
pub const LOGIN_REJECTED: &str = "login.rejected";
pub const THROTTLE_TRACKED: &str = "throttle.tracked";
