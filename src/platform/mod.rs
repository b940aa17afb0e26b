//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Storage (LocalStorage on web, an in-process map natively)
//! - Wall-clock time for seeding runs

pub mod storage;

/// Milliseconds since the Unix epoch, used to seed new runs
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// A fresh run seed from the clock
pub fn time_seed() -> u64 {
    now_ms() as u64
}
