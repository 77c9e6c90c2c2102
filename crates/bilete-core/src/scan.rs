//! Debouncing of decoded QR codes while a camera scanner is running.

use serde_json::Value;

pub const DEFAULT_SCAN_DEBOUNCE_MS: u64 = 2_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerState {
    Stopped,
    Scanning,
}

/// Body sent to the QR verification endpoint for one decoded code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPayload(String);

impl ScanPayload {
    /// JSON objects carrying a `ticket_id` are re-encoded compactly; any other
    /// text is forwarded unchanged.
    pub fn from_decoded(decoded: &str) -> Self {
        match serde_json::from_str::<Value>(decoded) {
            Ok(value @ Value::Object(_)) if value.get("ticket_id").is_some() => {
                Self(value.to_string())
            }
            _ => Self(decoded.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Drops repeated reads of the same code inside the debounce window.
///
/// Timestamps are caller-supplied milliseconds from a monotonic clock.
#[derive(Debug, Clone)]
pub struct ScanDebouncer {
    state: ScannerState,
    debounce_ms: u64,
    last: Option<(String, u64)>,
}

impl Default for ScanDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SCAN_DEBOUNCE_MS)
    }
}

impl ScanDebouncer {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            state: ScannerState::Stopped,
            debounce_ms,
            last: None,
        }
    }

    pub fn state(&self) -> ScannerState {
        self.state
    }

    pub fn is_scanning(&self) -> bool {
        self.state == ScannerState::Scanning
    }

    /// Returns false when the scanner was already running.
    pub fn start(&mut self) -> bool {
        if self.is_scanning() {
            return false;
        }
        self.last = None;
        self.state = ScannerState::Scanning;
        true
    }

    pub fn stop(&mut self) -> bool {
        if !self.is_scanning() {
            return false;
        }
        self.state = ScannerState::Stopped;
        true
    }

    /// Feeds one decoded code. Yields a payload when the code should be
    /// verified, `None` when it is empty, a duplicate, or the scanner is off.
    pub fn accept(&mut self, decoded: &str, now_ms: u64) -> Option<ScanPayload> {
        if !self.is_scanning() || decoded.is_empty() {
            return None;
        }
        if let Some((code, at)) = &self.last {
            if code == decoded && now_ms.saturating_sub(*at) < self.debounce_ms {
                return None;
            }
        }
        self.last = Some((decoded.to_string(), now_ms));
        Some(ScanPayload::from_decoded(decoded))
    }
}

#[cfg(test)]
mod tests {
    use super::{ScanDebouncer, ScanPayload, ScannerState};

    #[test]
    fn ignores_codes_while_stopped() {
        let mut scanner = ScanDebouncer::new(2_000);
        assert_eq!(scanner.state(), ScannerState::Stopped);
        assert!(scanner.accept("abc", 0).is_none());
    }

    #[test]
    fn drops_duplicates_inside_window() {
        let mut scanner = ScanDebouncer::new(2_000);
        assert!(scanner.start());
        assert!(scanner.accept("abc", 1_000).is_some());
        assert!(scanner.accept("abc", 2_999).is_none());
        assert!(scanner.accept("abc", 3_000).is_some());
    }

    #[test]
    fn different_codes_pass_immediately() {
        let mut scanner = ScanDebouncer::new(2_000);
        scanner.start();
        assert!(scanner.accept("abc", 0).is_some());
        assert!(scanner.accept("def", 1).is_some());
        assert!(scanner.accept("abc", 2).is_some());
    }

    #[test]
    fn restart_forgets_last_code() {
        let mut scanner = ScanDebouncer::new(2_000);
        scanner.start();
        assert!(scanner.accept("abc", 0).is_some());
        assert!(!scanner.start());
        assert!(scanner.stop());
        assert!(!scanner.stop());
        assert!(scanner.start());
        assert!(scanner.accept("abc", 10).is_some());
    }

    #[test]
    fn empty_codes_are_ignored() {
        let mut scanner = ScanDebouncer::default();
        scanner.start();
        assert!(scanner.accept("", 0).is_none());
    }

    #[test]
    fn json_payload_is_compacted() {
        let payload = ScanPayload::from_decoded("{ \"ticket_id\" : \"abc\" }");
        assert_eq!(payload.as_str(), "{\"ticket_id\":\"abc\"}");
    }

    #[test]
    fn other_text_passes_through() {
        assert_eq!(ScanPayload::from_decoded("TICKET-42").as_str(), "TICKET-42");
        assert_eq!(
            ScanPayload::from_decoded("{ \"id\": 1 }").as_str(),
            "{ \"id\": 1 }"
        );
    }
}
