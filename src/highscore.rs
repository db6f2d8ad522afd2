//! High score persistence
//!
//! A single non-negative integer stored under one LocalStorage key as a
//! decimal string. Read once at startup, written whenever a finished run
//! beats the stored value.

/// The persisted high score
#[derive(Debug, Clone, Copy, Default)]
pub struct HighScore {
    value: u32,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "river-raid-high-score";

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Record a finished run's score. Persists and returns true only when
    /// the stored value is beaten.
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.value {
            return false;
        }
        self.value = score;
        self.save();
        true
    }

    /// Decode a stored value; anything unreadable counts as no record
    fn parse_stored(raw: Option<String>) -> u32 {
        raw.and_then(|s| s.trim().parse().ok()).unwrap_or(0)
    }

    /// Load the high score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        let raw = storage.and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let value = Self::parse_stored(raw);
        log::info!("Loaded high score: {}", value);
        Self { value }
    }

    /// Save the high score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            let _ = storage.set_item(Self::STORAGE_KEY, &self.value.to_string());
            log::info!("High score saved: {}", self.value);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_stored() {
        assert_eq!(HighScore::parse_stored(None), 0);
        assert_eq!(HighScore::parse_stored(Some("".into())), 0);
        assert_eq!(HighScore::parse_stored(Some("garbage".into())), 0);
        assert_eq!(HighScore::parse_stored(Some("-5".into())), 0);
        assert_eq!(HighScore::parse_stored(Some("12730".into())), 12730);
        assert_eq!(HighScore::parse_stored(Some(" 42 ".into())), 42);
    }

    #[test]
    fn test_record_only_on_improvement() {
        let mut hs = HighScore { value: 1000 };
        assert!(!hs.record(999));
        assert_eq!(hs.value(), 1000);
        assert!(!hs.record(1000));
        assert!(hs.record(1001));
        assert_eq!(hs.value(), 1001);
    }
}
