use chrono::{Datelike, Months, NaiveDate};

use crate::month::month_from_name;
use crate::BirthDateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Number { value: u32, digits: usize },
    Month(u32),
}

/// Parse a human-entered date string, preferring day-before-month.
///
/// Recognized shapes:
///
/// ```text
/// 15-06-2000   15/06/00   15.06.2000      day first, month/day swapped only
///                                         when day-first is not a date
/// 2000-06-15   2000/06/05                 year first, then day first when
///                                         the last field can be a month
/// 2000年6月5日                            year, month, day as labelled
/// 20000615                                compact YYYYMMDD
/// 15 June 2000   June 15, 2000   15th Jun 2000   15-六月-2000
/// June 2000                               day taken from `today`, clipped
///                                         to the length of the month
/// ```
///
/// Two-digit years resolve to the most recent matching year that is not
/// after `today`. A time of day (`10:30`, or an ISO `T10:30:00Z` suffix) is
/// ignored.
pub fn parse_freeform(text: &str, today: NaiveDate) -> Result<NaiveDate, BirthDateError> {
    let trimmed = strip_time(text.trim());
    if trimmed.is_empty() {
        return Err(BirthDateError::MissingInput);
    }

    let unparseable = || BirthDateError::Unparseable(text.trim().to_string());
    let (tokens, labelled) = tokenize(trimmed).ok_or_else(unparseable)?;

    let months: Vec<u32> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Month(month) => Some(*month),
            Token::Number { .. } => None,
        })
        .collect();
    let numbers: Vec<(u32, usize)> = tokens
        .iter()
        .filter_map(|t| match t {
            Token::Number { value, digits } => Some((*value, *digits)),
            Token::Month(_) => None,
        })
        .collect();

    match (months.as_slice(), numbers.as_slice()) {
        ([], [(value, 8)]) => build(
            (value / 10_000) as i32,
            (value / 100) % 100,
            value % 100,
        ),
        ([], [first, second, third]) if labelled => {
            build(expand_year(*first, today), second.0, third.0)
        }
        ([], [first, second, third]) => numeric_triple(*first, *second, *third, today),
        ([month], [a, b]) => {
            let (year, day) = if is_year(*a) && !is_year(*b) {
                (*a, *b)
            } else {
                (*b, *a)
            };
            build(expand_year(year, today), *month, day.0)
        }
        ([month], [year]) if is_year(*year) => {
            let year = expand_year(*year, today);
            let day = days_in_month(year, *month)
                .map_or(today.day(), |n| today.day().min(n));
            build(year, *month, day)
        }
        _ => Err(unparseable()),
    }
}

fn numeric_triple(
    first: (u32, usize),
    second: (u32, usize),
    third: (u32, usize),
    today: NaiveDate,
) -> Result<NaiveDate, BirthDateError> {
    if first.1 >= 3 {
        let year = first.0 as i32;
        if third.0 <= 12 {
            if let Ok(date) = build(year, third.0, second.0) {
                return Ok(date);
            }
        }
        return build(year, second.0, third.0);
    }

    let year = expand_year(third, today);
    let day_first = build(year, second.0, first.0);
    if day_first.is_ok() {
        return day_first;
    }
    build(year, first.0, second.0).or(day_first)
}

fn is_year((value, digits): (u32, usize)) -> bool {
    digits >= 3 || value > 31
}

fn expand_year((value, digits): (u32, usize), today: NaiveDate) -> i32 {
    let value = value as i32;
    if digits > 2 {
        return value;
    }
    let century = today.year() / 100 * 100;
    if value <= today.year() % 100 {
        century + value
    } else {
        century - 100 + value
    }
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    Some(next.signed_duration_since(first).num_days() as u32)
}

fn build(year: i32, month: u32, day: u32) -> Result<NaiveDate, BirthDateError> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or(BirthDateError::InvalidDate {
        year,
        month,
        day,
    })
}

/// Split into tokens; the flag is set when 年/月/日 label the numbers.
fn tokenize(text: &str) -> Option<(Vec<Token>, bool)> {
    let mut tokens = Vec::new();
    let mut labelled = false;

    for piece in text.split(|c: char| c.is_whitespace() || matches!(c, '-' | '/' | '.' | ',')) {
        if piece.is_empty() || piece.contains(':') {
            continue;
        }

        if let Some(month) = month_from_name(piece) {
            tokens.push(Token::Month(month));
            continue;
        }

        if piece.contains(is_cjk_date_marker) {
            labelled = true;
            for part in piece.split(is_cjk_date_marker).filter(|p| !p.is_empty()) {
                tokens.push(number_token(part)?);
            }
            continue;
        }

        tokens.push(number_token(piece)?);
    }

    Some((tokens, labelled))
}

fn is_cjk_date_marker(c: char) -> bool {
    matches!(c, '年' | '月' | '日')
}

fn number_token(piece: &str) -> Option<Token> {
    let lower = piece.to_ascii_lowercase();
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| lower.strip_suffix(suffix))
        .unwrap_or(lower.as_str());

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    digits.parse::<u32>().ok().map(|value| Token::Number {
        value,
        digits: digits.len(),
    })
}

/// Drop an ISO-8601 time suffix (`2000-06-15T10:00:00Z` → `2000-06-15`).
fn strip_time(text: &str) -> &str {
    let bytes = text.as_bytes();
    for i in 1..bytes.len().saturating_sub(1) {
        if matches!(bytes[i], b'T' | b't')
            && bytes[i - 1].is_ascii_digit()
            && bytes[i + 1].is_ascii_digit()
        {
            return &text[..i];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first_numeric() {
        assert_eq!(parse_freeform("15-06-2000", today()), Ok(date(2000, 6, 15)));
        assert_eq!(parse_freeform("15/06/2000", today()), Ok(date(2000, 6, 15)));
        assert_eq!(parse_freeform("15.06.2000", today()), Ok(date(2000, 6, 15)));
    }

    #[test]
    fn test_ambiguous_resolves_day_first() {
        assert_eq!(parse_freeform("03/04/1990", today()), Ok(date(1990, 4, 3)));
    }

    #[test]
    fn test_swaps_when_day_first_impossible() {
        assert_eq!(parse_freeform("06/15/2000", today()), Ok(date(2000, 6, 15)));
    }

    #[test]
    fn test_year_first() {
        assert_eq!(parse_freeform("2000-06-15", today()), Ok(date(2000, 6, 15)));
        assert_eq!(parse_freeform("2000/6/15", today()), Ok(date(2000, 6, 15)));
        assert_eq!(parse_freeform("2000年6月15日", today()), Ok(date(2000, 6, 15)));
    }

    #[test]
    fn test_year_first_reads_day_before_month_when_possible() {
        assert_eq!(parse_freeform("2000-06-05", today()), Ok(date(2000, 5, 6)));
        assert_eq!(parse_freeform("2000/06/05", today()), Ok(date(2000, 5, 6)));
        assert_eq!(parse_freeform("2000.12.01", today()), Ok(date(2000, 1, 12)));
        // 2000-02-30 is not a date, so month-then-day applies
        assert_eq!(parse_freeform("2000-30-02", today()), Err(BirthDateError::InvalidDate {
            year: 2000,
            month: 30,
            day: 2
        }));
        assert_eq!(parse_freeform("2000-13-05", today()), Ok(date(2000, 5, 13)));
    }

    #[test]
    fn test_labelled_cjk_date_is_not_swapped() {
        assert_eq!(parse_freeform("2000年6月5日", today()), Ok(date(2000, 6, 5)));
    }

    #[test]
    fn test_compact_digits() {
        assert_eq!(parse_freeform("20000615", today()), Ok(date(2000, 6, 15)));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parse_freeform("15 June 2000", today()), Ok(date(2000, 6, 15)));
        assert_eq!(parse_freeform("June 15, 2000", today()), Ok(date(2000, 6, 15)));
        assert_eq!(parse_freeform("15th Jun 2000", today()), Ok(date(2000, 6, 15)));
        assert_eq!(parse_freeform("15-六月-2000", today()), Ok(date(2000, 6, 15)));
    }

    #[test]
    fn test_month_and_year_only_uses_today_day() {
        assert_eq!(parse_freeform("March 1985", today()), Ok(date(1985, 3, 15)));
    }

    #[test]
    fn test_month_and_year_clips_day_to_month_length() {
        let end_of_may = date(2024, 5, 31);
        assert_eq!(parse_freeform("February 1985", end_of_may), Ok(date(1985, 2, 28)));
        assert_eq!(parse_freeform("February 2000", end_of_may), Ok(date(2000, 2, 29)));
        assert_eq!(parse_freeform("April 1985", end_of_may), Ok(date(1985, 4, 30)));
        assert_eq!(parse_freeform("March 1985", end_of_may), Ok(date(1985, 3, 31)));
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(parse_freeform("15/06/00", today()), Ok(date(2000, 6, 15)));
        assert_eq!(parse_freeform("15/06/24", today()), Ok(date(2024, 6, 15)));
        assert_eq!(parse_freeform("15/06/85", today()), Ok(date(1985, 6, 15)));
    }

    #[test]
    fn test_iso_timestamp_time_ignored() {
        assert_eq!(
            parse_freeform("2000-06-15T08:30:00Z", today()),
            Ok(date(2000, 6, 15))
        );
        assert_eq!(
            parse_freeform("15/06/2000 08:30", today()),
            Ok(date(2000, 6, 15))
        );
    }

    #[test]
    fn test_empty_is_missing() {
        assert_eq!(
            parse_freeform("   ", today()),
            Err(BirthDateError::MissingInput)
        );
    }

    #[test]
    fn test_garbage_is_unparseable() {
        assert!(matches!(
            parse_freeform("not a date", today()),
            Err(BirthDateError::Unparseable(_))
        ));
        assert!(matches!(
            parse_freeform("12345", today()),
            Err(BirthDateError::Unparseable(_))
        ));
    }

    #[test]
    fn test_impossible_date() {
        assert!(matches!(
            parse_freeform("31-02-2000", today()),
            Err(BirthDateError::InvalidDate { .. })
        ));
    }
}
