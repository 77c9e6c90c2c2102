//! Romanian phone numbers in canonical `+40XXXXXXXXX` form.

use serde::Serialize;
use std::fmt;

use crate::error::CoreError;

pub const COUNTRY_PREFIX: &str = "+40";
const NATIONAL_DIGITS: usize = 9;

/// Normalizes a user-entered Romanian phone number.
///
/// Formatting characters are dropped, then the first matching rule wins:
/// `0` plus nine digits, `40` plus nine digits, or nine bare digits. Values
/// already starting with `+40` are returned cleaned but otherwise untouched.
/// When no rule applies the original input is returned as is; use
/// [`is_valid_phone`] to find out whether normalization succeeded.
pub fn normalize_phone(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let cleaned = strip_formatting(raw);
    if cleaned.starts_with(COUNTRY_PREFIX) {
        return cleaned;
    }

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if digits.len() == NATIONAL_DIGITS + 1 && digits.starts_with('0') {
        return format!("{COUNTRY_PREFIX}{}", &digits[1..]);
    }
    if digits.len() == NATIONAL_DIGITS + 2 && digits.starts_with("40") {
        return format!("+{digits}");
    }
    if digits.len() == NATIONAL_DIGITS {
        return format!("{COUNTRY_PREFIX}{digits}");
    }

    raw.to_string()
}

pub fn is_valid_phone(raw: &str) -> bool {
    is_canonical(&normalize_phone(raw))
}

fn strip_formatting(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_digit() || (ch == '+' && out.is_empty()) {
            out.push(ch);
        }
    }
    out
}

fn is_canonical(value: &str) -> bool {
    value.strip_prefix(COUNTRY_PREFIX).is_some_and(|rest| {
        rest.len() == NATIONAL_DIGITS && rest.bytes().all(|b| b.is_ascii_digit())
    })
}

/// A phone number known to be in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let normalized = normalize_phone(raw.trim());
        if !is_canonical(&normalized) {
            return Err(CoreError::InvalidPhone(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Digits without the leading `+`, as expected by `wa.me` links.
    pub fn whatsapp_digits(&self) -> &str {
        self.0.trim_start_matches('+')
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_phone, normalize_phone, PhoneNumber};

    #[test]
    fn local_format_gets_country_prefix() {
        assert_eq!(normalize_phone("0712345678"), "+40712345678");
        assert!(is_valid_phone("0712345678"));
    }

    #[test]
    fn national_format_gets_plus() {
        assert_eq!(normalize_phone("40712345678"), "+40712345678");
    }

    #[test]
    fn nine_digits_get_country_prefix() {
        assert_eq!(normalize_phone("712345678"), "+40712345678");
    }

    #[test]
    fn formatting_characters_are_stripped() {
        assert_eq!(normalize_phone("(0712) 345-678"), "+40712345678");
        assert_eq!(normalize_phone("+40 712 345 678"), "+40712345678");
        assert_eq!(normalize_phone("+ 0712 345 678"), "+40712345678");
    }

    #[test]
    fn canonical_prefix_short_circuits_even_when_too_long() {
        assert_eq!(normalize_phone("+4071234567890"), "+4071234567890");
        assert!(!is_valid_phone("+4071234567890"));
    }

    #[test]
    fn foreign_plus_is_dropped_before_rules() {
        assert_eq!(normalize_phone("+0712345678"), "+40712345678");
        assert_eq!(normalize_phone("+33612345678"), "+33612345678");
        assert!(!is_valid_phone("+33612345678"));
    }

    #[test]
    fn unmatched_input_is_returned_verbatim() {
        assert_eq!(normalize_phone("call me 12"), "call me 12");
        assert_eq!(normalize_phone("   "), "   ");
        assert!(!is_valid_phone("call me 12"));
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_phone(""), "");
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn normalization_is_idempotent_for_valid_numbers() {
        for raw in ["0712345678", "40712345678", "712345678", "+40 712-345-678"] {
            let once = normalize_phone(raw);
            assert!(is_valid_phone(&once));
            assert_eq!(normalize_phone(&once), once);
        }
    }

    #[test]
    fn every_ten_digit_local_number_normalizes() {
        for tail in ["000000000", "123456789", "999999999"] {
            let raw = format!("0{tail}");
            assert_eq!(normalize_phone(&raw), format!("+40{tail}"));
        }
    }

    #[test]
    fn whatsapp_digits_drop_plus() {
        let phone = PhoneNumber::parse("0712 345 678").unwrap();
        assert_eq!(phone.whatsapp_digits(), "40712345678");
    }

    #[test]
    fn phone_number_parse_validates() {
        let phone = PhoneNumber::parse(" 0712345678 ").unwrap();
        assert_eq!(phone.as_str(), "+40712345678");
        assert!(PhoneNumber::parse("12345").is_err());
    }
}
