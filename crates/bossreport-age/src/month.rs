const CHINESE_MONTHS: [&str; 12] = [
    "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月",
    "十二月",
];

const ENGLISH_MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Resolve a decomposed month field to 1..=12.
///
/// Rules are tried in a fixed order and the first match wins:
/// 1. all ASCII digits → the number itself
/// 2. one of the twelve Chinese month tokens
/// 3. a full English month name, case-insensitive
///
/// A digit string outside 1..=12 resolves to `None`.
pub fn resolve_month(token: &str) -> Option<u32> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }

    if token.bytes().all(|b| b.is_ascii_digit()) {
        return token
            .parse::<u32>()
            .ok()
            .filter(|month| (1..=12).contains(month));
    }

    if let Some(month) = chinese_month(token) {
        return Some(month);
    }

    ENGLISH_MONTHS
        .iter()
        .position(|name| name.eq_ignore_ascii_case(token))
        .map(|idx| idx as u32 + 1)
}

/// Looser month-name lookup used by the freeform parser.
///
/// Accepts everything [`resolve_month`] accepts by name, plus three-letter
/// English abbreviations ("Jun", "sep") and "Sept".
pub fn month_from_name(token: &str) -> Option<u32> {
    let token = token.trim().trim_end_matches('.');
    if let Some(month) = chinese_month(token) {
        return Some(month);
    }

    let lower = token.to_ascii_lowercase();
    if lower == "sept" {
        return Some(9);
    }

    ENGLISH_MONTHS
        .iter()
        .position(|name| *name == lower || (lower.len() == 3 && name.starts_with(&lower)))
        .map(|idx| idx as u32 + 1)
}

fn chinese_month(token: &str) -> Option<u32> {
    CHINESE_MONTHS
        .iter()
        .position(|name| *name == token)
        .map(|idx| idx as u32 + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_resolve_first() {
        assert_eq!(resolve_month("6"), Some(6));
        assert_eq!(resolve_month("06"), Some(6));
        assert_eq!(resolve_month("12"), Some(12));
    }

    #[test]
    fn test_digits_out_of_range() {
        assert_eq!(resolve_month("0"), None);
        assert_eq!(resolve_month("13"), None);
        assert_eq!(resolve_month("99999999999999999999"), None);
    }

    #[test]
    fn test_chinese_tokens() {
        assert_eq!(resolve_month("一月"), Some(1));
        assert_eq!(resolve_month("十月"), Some(10));
        assert_eq!(resolve_month("十一月"), Some(11));
        assert_eq!(resolve_month("十二月"), Some(12));
        assert_eq!(resolve_month("十三月"), None);
        assert_eq!(resolve_month("6月"), None);
    }

    #[test]
    fn test_english_full_names() {
        assert_eq!(resolve_month("January"), Some(1));
        assert_eq!(resolve_month("june"), Some(6));
        assert_eq!(resolve_month("DECEMBER"), Some(12));
        // Abbreviations are not full month names
        assert_eq!(resolve_month("Jun"), None);
    }

    #[test]
    fn test_blank_is_none() {
        assert_eq!(resolve_month(""), None);
        assert_eq!(resolve_month("   "), None);
    }

    #[test]
    fn test_month_from_name_abbreviations() {
        assert_eq!(month_from_name("Jun"), Some(6));
        assert_eq!(month_from_name("sep"), Some(9));
        assert_eq!(month_from_name("Sept"), Some(9));
        assert_eq!(month_from_name("Dec."), Some(12));
        assert_eq!(month_from_name("八月"), Some(8));
        assert_eq!(month_from_name("Ju"), None);
        assert_eq!(month_from_name("hello"), None);
    }
}
