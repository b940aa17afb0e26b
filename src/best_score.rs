//! Best score persistence
//!
//! A single integer persisted under a fixed key. Read once at load, written
//! only when a finished run beats it.

use crate::platform::storage;

/// Best score across runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScore {
    pub value: u64,
}

impl BestScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "neon.best";

    pub fn new(value: u64) -> Self {
        Self { value }
    }

    /// Parse a stored value. Missing or garbled values read as zero.
    pub fn parse(stored: Option<&str>) -> Self {
        let value = stored
            .map(str::trim)
            .and_then(|s| {
                s.parse::<u64>().ok().or_else(|| {
                    // Older saves may hold a float
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(|v| v.max(0.0) as u64)
                })
            })
            .unwrap_or(0);
        Self { value }
    }

    /// Check if a final score beats the stored best
    pub fn qualifies(&self, score: u64) -> bool {
        score > self.value
    }

    /// Record a final score. Returns true if it is a new best.
    pub fn submit(&mut self, score: u64) -> bool {
        if !self.qualifies(score) {
            return false;
        }
        self.value = score;
        true
    }

    /// Load from storage, defaulting to zero
    pub fn load() -> Self {
        let best = Self::parse(storage::get_item(Self::STORAGE_KEY).as_deref());
        log::info!("Best score: {}", best.value);
        best
    }

    pub fn save(&self) {
        if storage::set_item(Self::STORAGE_KEY, &self.value.to_string()) {
            log::info!("Best score saved ({})", self.value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults_to_zero() {
        assert_eq!(BestScore::parse(None).value, 0);
        assert_eq!(BestScore::parse(Some("")).value, 0);
        assert_eq!(BestScore::parse(Some("banana")).value, 0);
        assert_eq!(BestScore::parse(Some("-5")).value, 0);
    }

    #[test]
    fn test_parse_accepts_integers_and_floats() {
        assert_eq!(BestScore::parse(Some("1234")).value, 1234);
        assert_eq!(BestScore::parse(Some(" 88 ")).value, 88);
        assert_eq!(BestScore::parse(Some("99.7")).value, 99);
    }

    #[test]
    fn test_submit_only_on_strict_improvement() {
        let mut best = BestScore::new(100);
        assert!(!best.submit(100));
        assert!(!best.submit(40));
        assert_eq!(best.value, 100);
        assert!(best.submit(101));
        assert_eq!(best.value, 101);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_load_save_round_trip() {
        crate::platform::storage::remove_item(BestScore::STORAGE_KEY);
        assert_eq!(BestScore::load().value, 0);

        BestScore::new(321).save();
        assert_eq!(BestScore::load().value, 321);

        crate::platform::storage::set_item(BestScore::STORAGE_KEY, "not a number");
        assert_eq!(BestScore::load().value, 0);
    }
}
