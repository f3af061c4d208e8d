//! Phone number normalization for invitation matching.
//!
//! Invitations target a phone number typed by the inviter; recipient lookup
//! compares it against the registered user's stored number. Both sides are
//! normalized to digits with an optional leading `+` so formatting noise
//! (spaces, dashes, dots, parentheses) never defeats the match.

use std::sync::LazyLock;

use regex::Regex;

/// Regex matching every character stripped during normalization.
const FORMATTING_PATTERN: &str = r"[\s\-\.\(\)]";

/// Compiled formatting-stripper. Compiled once, reused forever.
static FORMATTING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(FORMATTING_PATTERN).expect("valid regex"));

/// Normalize a phone number for comparison.
///
/// Strips formatting characters and keeps a single leading `+` if present.
/// Returns `None` when nothing dialable remains or a non-dialable character
/// survives stripping, so callers treat the value as unmatchable rather than
/// erroring.
pub fn normalize(raw: &str) -> Option<String> {
    let stripped = FORMATTING_RE.replace_all(raw.trim(), "");
    let (plus, digits) = match stripped.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", stripped.as_ref()),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{plus}{digits}"))
}

/// Whether two raw phone numbers refer to the same line after normalization.
///
/// Unnormalizable input on either side never matches.
pub fn matches(a: &str, b: &str) -> bool {
    match (normalize(a), normalize(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_formatting_characters() {
        assert_eq!(normalize("+62 812-3456-7890"), Some("+6281234567890".into()));
        assert_eq!(normalize("(0812) 3456.7890"), Some("081234567890".into()));
    }

    #[test]
    fn keeps_leading_plus_only() {
        assert_eq!(normalize("+15551234567"), Some("+15551234567".into()));
        assert_eq!(normalize("15551234567"), Some("15551234567".into()));
    }

    #[test]
    fn rejects_undialable_input() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("+"), None);
        assert_eq!(normalize("call me"), None);
        assert_eq!(normalize("0812x456"), None);
    }

    #[test]
    fn matches_ignores_formatting() {
        assert!(matches("+62 812-3456-7890", "+6281234567890"));
        assert!(matches("0812 3456 7890", "081234567890"));
        assert!(!matches("081234567890", "081234567891"));
    }

    #[test]
    fn unnormalizable_never_matches() {
        assert!(!matches("", ""));
        assert!(!matches("call me", "call me"));
    }
}
