//! Validation of company registration numbers.
//!
//! A registration number is either seven digits with an optional leading
//! zero, or one of the known prefixes followed by enough digits to make
//! eight characters in total.

use std::sync::OnceLock;

use regex::Regex;

/// Validator for company registration numbers.
///
/// # Example
///
/// ```rust
/// use companies_house::RegistrationNumber;
///
/// assert!(RegistrationNumber::is_valid("07592231"));
/// assert!(RegistrationNumber::is_valid("SC592231"));
/// assert!(!RegistrationNumber::is_valid("BC098765"));
///
/// let number = RegistrationNumber::sanitise("SC 592 231");
/// assert!(RegistrationNumber::is_valid(&number));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct RegistrationNumber;

impl RegistrationNumber {
    /// Prefixes accepted in front of the digits.
    pub const VALID_PREFIXES: [&'static str; 9] =
        ["OC", "LP", "SC", "SO", "SL", "NI", "R", "NC", "NL"];

    /// Total length of a prefixed number.
    const LENGTH: usize = 8;

    /// Returns `true` if `number` is a well-formed registration number.
    #[must_use]
    pub fn is_valid(number: &str) -> bool {
        Self::pattern().is_match(number)
    }

    /// Removes every space from `number`. No other correction is made.
    #[must_use]
    pub fn sanitise(number: &str) -> String {
        number.chars().filter(|c| *c != ' ').collect()
    }

    fn pattern() -> &'static Regex {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        PATTERN.get_or_init(|| {
            let prefixed = Self::VALID_PREFIXES
                .iter()
                .map(|prefix| format!("{prefix}[0-9]{{{}}}", Self::LENGTH - prefix.len()))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!("^(?:0?[0-9]{{7}}|{prefixed})$"))
                .expect("registration number pattern is valid")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_limited_companies() {
        assert!(RegistrationNumber::is_valid("07592231"));
        assert!(RegistrationNumber::is_valid("7592231"));
    }

    #[test]
    fn test_accepts_every_prefix() {
        for number in [
            "OC592231", "LP592231", "SC592231", "SO592231", "SL592231", "NI592231", "R7592231",
            "NC592231", "NL592231",
        ] {
            assert!(RegistrationNumber::is_valid(number), "{number} should be valid");
        }
    }

    #[test]
    fn test_rejects_malformed_numbers() {
        assert!(!RegistrationNumber::is_valid("NI045"), "too short");
        assert!(
            !RegistrationNumber::is_valid("LP874892738923789724"),
            "too long"
        );
        assert!(!RegistrationNumber::is_valid("BC098765"), "invalid prefix");
        assert!(
            !RegistrationNumber::is_valid("88887654"),
            "eight digits without a leading zero"
        );
        assert!(!RegistrationNumber::is_valid(""));
        assert!(!RegistrationNumber::is_valid("R592231"), "R takes seven digits");
        assert!(!RegistrationNumber::is_valid("sc592231"), "prefixes are upper case");
    }

    #[test]
    fn test_rejects_surrounding_text() {
        assert!(!RegistrationNumber::is_valid("07592231\n"));
        assert!(!RegistrationNumber::is_valid(" 07592231"));
    }

    #[test]
    fn test_sanitise_only_strips_spaces() {
        assert_eq!(RegistrationNumber::sanitise("07 592 231"), "07592231");
        assert_eq!(RegistrationNumber::sanitise("sc592231"), "sc592231");
        assert_eq!(RegistrationNumber::sanitise("07-592\t231"), "07-592\t231");
    }
}
