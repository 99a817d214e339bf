use regex::Regex;
use std::sync::LazyLock;

use crate::{BsDate, Day, Month, ParseError, Year};

// Spellings seen in announcements, mapped to month numbers. Every canonical
// name from `BS_MONTH_NAMES` appears here in lower case.
static MONTH_ALIASES: &[(&str, u8)] = &[
    ("baisakh", 1),
    ("baishakh", 1),
    ("baishak", 1),
    ("vaisakh", 1),
    ("vaishakh", 1),
    ("jestha", 2),
    ("jeth", 2),
    ("jeshtha", 2),
    ("jyeshtha", 2),
    ("ashadh", 3),
    ("ashad", 3),
    ("asadh", 3),
    ("asar", 3),
    ("shrawan", 4),
    ("shravan", 4),
    ("srawan", 4),
    ("sawan", 4),
    ("saun", 4),
    ("bhadra", 5),
    ("bhadau", 5),
    ("bhadrapad", 5),
    ("ashwin", 6),
    ("ashoj", 6),
    ("asoj", 6),
    ("kartik", 7),
    ("kattik", 7),
    ("mangsir", 8),
    ("mangshir", 8),
    ("marga", 8),
    ("poush", 9),
    ("paush", 9),
    ("push", 9),
    ("pus", 9),
    ("magh", 10),
    ("maghe", 10),
    ("falgun", 11),
    ("phalgun", 11),
    ("fagun", 11),
    ("chaitra", 12),
    ("chait", 12),
    ("chaite", 12),
];

// <day><ordinal?> <month>[, ]<year>, searched anywhere in the phrase
static RE_DATE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?P<day>\d{1,2})(?:st|nd|rd|th)?\s+(?P<month>[a-z]+)[,\s]+(?P<year>\d{4})\b")
        .expect("date phrase regex")
});

// The same shape, spanning the whole string
static RE_DATE_EXACT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?P<day>\d{1,2})(?:st|nd|rd|th)?\s+(?P<month>[a-z]+)[,\s]+(?P<year>\d{4})$")
        .expect("exact date regex")
});

/// Looks up a month by any known spelling, ignoring case and surrounding
/// whitespace.
pub fn month_from_name(name: &str) -> Option<Month> {
    let key = name.trim().to_lowercase();
    MONTH_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .and_then(|(_, number)| Month::new(*number).ok())
}

/// Canonical name for any known spelling, e.g. `"paush"` becomes `"Poush"`.
pub fn normalize_month(name: &str) -> Option<&'static str> {
    month_from_name(name).map(Month::name)
}

/// Extracts a BS date from a phrase such as `"28th Magh, 2081"`.
///
/// Day-in-month bounds are not checked here.
pub fn parse(phrase: &str) -> Option<BsDate> {
    parse_phrase(phrase).ok()
}

/// Like [`parse`], but reports why a phrase was rejected.
///
/// # Errors
/// `EmptyInput` for blank phrases, `InvalidFormat` when no day/month/year
/// shape is found, `UnrecognizedMonth` for an unknown month spelling, and
/// the component errors for a zero day or year.
pub fn parse_phrase(phrase: &str) -> Result<BsDate, ParseError> {
    parse_with(&RE_DATE_PHRASE, phrase)
}

/// Parses a string that is a date and nothing else, such as the Display
/// form `"5 Chaitra 2082"`. Used by `FromStr` and serde.
///
/// # Errors
/// As [`parse_phrase`]; any text around the date is `InvalidFormat`.
pub fn parse_exact(s: &str) -> Result<BsDate, ParseError> {
    parse_with(&RE_DATE_EXACT, s)
}

fn parse_with(pattern: &Regex, input: &str) -> Result<BsDate, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    let caps = pattern
        .captures(trimmed)
        .ok_or_else(|| ParseError::InvalidFormat(trimmed.to_owned()))?;

    let month_name = &caps["month"];
    let month = month_from_name(month_name)
        .ok_or_else(|| ParseError::UnrecognizedMonth(month_name.to_owned()))?;

    // \d{1,2} and \d{4} always fit
    let day = caps["day"]
        .parse::<u8>()
        .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;
    let year = caps["year"]
        .parse::<u16>()
        .map_err(|_| ParseError::InvalidFormat(trimmed.to_owned()))?;

    Ok(BsDate::new(Year::new(year)?, month, Day::new(day)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::bs;
    use crate::{BS_MONTH_NAMES, lengths_for};

    #[test]
    fn test_parse_with_ordinal() {
        assert_eq!(parse("28th Magh 2081"), Some(bs(2081, 10, 28)));
        assert_eq!(parse("1st Chaitra 2082"), Some(bs(2082, 12, 1)));
        assert_eq!(parse("2nd Jestha 2082"), Some(bs(2082, 2, 2)));
        assert_eq!(parse("3rd Poush 2081"), Some(bs(2081, 9, 3)));
    }

    #[test]
    fn test_parse_separators_and_case() {
        struct TestCase {
            phrase:   &'static str,
            expected: (u16, u8, u8),
        }

        let cases = [
            TestCase { phrase: "5 Chaitra 2082", expected: (2082, 12, 5) },
            TestCase { phrase: "5 Chaitra, 2082", expected: (2082, 12, 5) },
            TestCase { phrase: "5TH CHAITRA,2082", expected: (2082, 12, 5) },
            TestCase { phrase: "  21st  baishakh   2083 ", expected: (2083, 1, 21) },
            TestCase { phrase: "opens on 9th Paush, 2081 at 10 AM", expected: (2081, 9, 9) },
        ];

        for case in &cases {
            let (y, m, d) = case.expected;
            assert_eq!(parse(case.phrase), Some(bs(y, m, d)), "phrase {:?}", case.phrase);
        }
    }

    #[test]
    fn test_parse_does_not_check_month_length() {
        // 2081 Magh has 29 days; rejecting this is the converter's job
        assert_eq!(parse("31 Magh 2081"), Some(bs(2081, 10, 31)));
    }

    #[test]
    fn test_parse_failures() {
        assert!(matches!(parse_phrase(""), Err(ParseError::EmptyInput)));
        assert!(matches!(parse_phrase("Magh 2081"), Err(ParseError::InvalidFormat(_))));
        assert!(matches!(parse_phrase("28 Magh"), Err(ParseError::InvalidFormat(_))));
        assert!(matches!(
            parse_phrase("28 January 2081"),
            Err(ParseError::UnrecognizedMonth(m)) if m == "January"
        ));
        assert!(matches!(parse_phrase("0 Magh 2081"), Err(ParseError::InvalidDay(0))));
        assert!(matches!(parse_phrase("1 Magh 0000"), Err(ParseError::InvalidYear(0))));
        assert_eq!(parse("28 January 2081"), None);
    }

    #[test]
    fn test_phrase_ignores_digits_inside_numbers() {
        assert_eq!(parse("FY 2081 Magh 2082"), None);
        assert_eq!(parse("ref 123 Magh 2081"), None);
        assert_eq!(parse("28 Magh 20812"), None);
    }

    #[test]
    fn test_parse_exact() {
        assert_eq!(parse_exact("5 Chaitra 2082"), Ok(bs(2082, 12, 5)));
        assert_eq!(parse_exact(" 5th chaitra, 2082 "), Ok(bs(2082, 12, 5)));
        assert!(matches!(
            parse_exact("foo 5 Chaitra 2082 bar"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_exact("5 Chaitra 2082 at 10 AM"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(parse_exact(""), Err(ParseError::EmptyInput)));
        assert!(matches!(
            parse_exact("5 Smarch 2082"),
            Err(ParseError::UnrecognizedMonth(_))
        ));
    }

    #[test]
    fn test_month_aliases() {
        assert_eq!(month_from_name("baisakh").map(Month::get), Some(1));
        assert_eq!(month_from_name("Baishakh").map(Month::get), Some(1));
        assert_eq!(month_from_name(" poush ").map(Month::get), Some(9));
        assert_eq!(month_from_name("PAUSH").map(Month::get), Some(9));
        assert_eq!(month_from_name("push").map(Month::get), Some(9));
        assert_eq!(month_from_name("chait").map(Month::get), Some(12));
        assert_eq!(month_from_name("smarch"), None);
    }

    #[test]
    fn test_every_canonical_name_is_an_alias() {
        for (i, name) in BS_MONTH_NAMES.iter().enumerate() {
            assert_eq!(month_from_name(name).map(Month::index), Some(i), "{name}");
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for (alias, _) in MONTH_ALIASES {
            let once = normalize_month(alias).unwrap();
            assert_eq!(normalize_month(once), Some(once), "alias {alias}");
        }
        assert_eq!(normalize_month("paush"), Some("Poush"));
    }

    #[test]
    fn test_round_trip_canonical_phrases() {
        for year in [2080, 2082, 2086] {
            let lengths = lengths_for(year).unwrap();
            for (i, &len) in lengths.iter().enumerate() {
                for day in [1, 15, len] {
                    let date = bs(year, i as u8 + 1, day);
                    assert_eq!(parse(&date.to_string()), Some(date));
                }
            }
        }
        // Untabulated years round-trip too
        let date = bs(2070, 6, 30);
        assert_eq!(parse(&date.to_string()), Some(date));
    }
}
