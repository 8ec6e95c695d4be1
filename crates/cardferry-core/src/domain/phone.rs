/// Number of trailing digits compared when matching phone numbers.
pub const PHONE_MATCH_DIGITS: usize = 10;

/// Reduces a free-format phone number to its last ten digits.
///
/// Every non-digit is dropped first, so separators, country-code prefixes and
/// punctuation do not affect the result. Numbers with fewer than ten digits are
/// not usable as match keys and yield `None`.
pub fn normalize_phone_for_match(value: &str) -> Option<String> {
    let digits: Vec<char> = value.chars().filter(|ch| ch.is_ascii_digit()).collect();
    if digits.len() < PHONE_MATCH_DIGITS {
        return None;
    }

    Some(digits[digits.len() - PHONE_MATCH_DIGITS..].iter().collect())
}
