//! Field-level normalization shared by the books and readers cleaners.
//!
//! Every function here is deterministic and a fixed point on its own output,
//! so a cleaned table re-cleans to itself.

use crate::domain::model::CleaningReport;
use chrono::NaiveDate;
use regex::Regex;
use std::ops::RangeInclusive;
use std::sync::OnceLock;

/// Outcome of coercing one optional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coerced<T> {
    Missing,
    Valid(T),
    Invalid(String),
}

impl<T> Coerced<T> {
    /// Invalid values are nulled and recorded as a warning against `line`.
    pub fn or_warn(self, line: u64, column: &str, raw: &str, report: &mut CleaningReport) -> Option<T> {
        match self {
            Coerced::Missing => None,
            Coerced::Valid(value) => Some(value),
            Coerced::Invalid(reason) => {
                report.warn(line, column, raw, reason);
                None
            }
        }
    }
}

pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn text(raw: &str) -> Option<String> {
    let collapsed = collapse_whitespace(raw);
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed)
    }
}

pub fn categorical(raw: &str) -> Option<String> {
    text(raw).map(|value| value.to_lowercase())
}

/// Title-cases words written entirely in one case; mixed-case words are kept.
pub fn person_name(raw: &str) -> Option<String> {
    let collapsed = text(raw)?;
    let words: Vec<String> = collapsed
        .split(' ')
        .map(|word| {
            let has_lower = word.chars().any(char::is_lowercase);
            let has_upper = word.chars().any(char::is_uppercase);
            if has_lower && has_upper {
                word.to_string()
            } else {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                    None => String::new(),
                }
            }
        })
        .collect();
    Some(words.join(" "))
}

/// ISBN-10 or ISBN-13 with a valid check digit, hyphens and spaces removed.
pub fn isbn(raw: &str) -> Coerced<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if compact.is_empty() {
        return Coerced::Missing;
    }

    let valid = match compact.len() {
        10 => isbn10_checksum(&compact),
        13 => isbn13_checksum(&compact),
        n => return Coerced::Invalid(format!("expected 10 or 13 characters, got {}", n)),
    };

    if valid {
        Coerced::Valid(compact)
    } else {
        Coerced::Invalid("check digit mismatch or non-digit characters".to_string())
    }
}

fn isbn10_checksum(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let digit = match (i, c) {
            (9, 'X') => 10,
            (_, c) => match c.to_digit(10) {
                Some(d) => d,
                None => return false,
            },
        };
        sum += (10 - i as u32) * digit;
    }
    sum % 11 == 0
}

fn isbn13_checksum(isbn: &str) -> bool {
    let mut sum = 0u32;
    for (i, c) in isbn.chars().enumerate() {
        let Some(digit) = c.to_digit(10) else {
            return false;
        };
        sum += if i % 2 == 0 { digit } else { digit * 3 };
    }
    sum % 10 == 0
}

/// Integer year inside `range`. Spreadsheet exports such as `1999.0` are accepted.
pub fn year(raw: &str, range: &RangeInclusive<i32>) -> Coerced<i32> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Coerced::Missing;
    }

    let integral = match trimmed.split_once('.') {
        Some((int, frac)) if !frac.is_empty() && frac.chars().all(|c| c == '0') => int,
        Some(_) => return Coerced::Invalid("not a whole number".to_string()),
        None => trimmed,
    };

    match integral.parse::<i32>() {
        Ok(y) if range.contains(&y) => Coerced::Valid(y),
        Ok(y) => Coerced::Invalid(format!(
            "{} outside {}..={}",
            y,
            range.start(),
            range.end()
        )),
        Err(e) => Coerced::Invalid(e.to_string()),
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern is valid")
    })
}

/// Lowercased address passing a basic `local@domain.tld` check.
pub fn email(raw: &str) -> Coerced<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Coerced::Missing;
    }

    let lowered = trimmed.to_lowercase();
    if email_regex().is_match(&lowered) {
        Coerced::Valid(lowered)
    } else {
        Coerced::Invalid("not a valid email address".to_string())
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Calendar date, optionally followed by a `T`- or space-separated time part.
pub fn date(raw: &str) -> Coerced<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Coerced::Missing;
    }

    let date_part = trimmed
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(trimmed);

    if date_part.len() == 8 && date_part.chars().all(|c| c.is_ascii_digit()) {
        let parsed = date_part[..4]
            .parse::<i32>()
            .ok()
            .zip(date_part[4..6].parse::<u32>().ok())
            .zip(date_part[6..].parse::<u32>().ok())
            .and_then(|((y, m), d)| NaiveDate::from_ymd_opt(y, m, d));
        return match parsed {
            Some(d) => Coerced::Valid(d),
            None => Coerced::Invalid("not a calendar date".to_string()),
        };
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
        .map(Coerced::Valid)
        .unwrap_or_else(|| Coerced::Invalid("unrecognized date format".to_string()))
}

pub fn gender(raw: &str) -> Coerced<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Coerced::Missing;
    }

    match trimmed.to_lowercase().as_str() {
        "m" | "male" | "男" => Coerced::Valid("M".to_string()),
        "f" | "female" | "女" => Coerced::Valid("F".to_string()),
        _ => Coerced::Invalid("expected M/F, male/female or 男/女".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_collapses_whitespace() {
        assert_eq!(text("  The   Rust \t Book "), Some("The Rust Book".to_string()));
        assert_eq!(text("   "), None);
        assert_eq!(categorical(" Science  Fiction"), Some("science fiction".to_string()));
    }

    #[test]
    fn test_person_name_casing() {
        assert_eq!(person_name("  alice   smith "), Some("Alice Smith".to_string()));
        assert_eq!(person_name("BOB"), Some("Bob".to_string()));
        assert_eq!(person_name("Ronald McDonald"), Some("Ronald McDonald".to_string()));
        assert_eq!(person_name("李 雷"), Some("李 雷".to_string()));
        assert_eq!(person_name(""), None);
    }

    #[test]
    fn test_person_name_is_fixed_point() {
        for raw in ["alice smith", "MARY-JANE o'neil", "Ronald McDonald"] {
            let once = person_name(raw).unwrap();
            assert_eq!(person_name(&once), Some(once.clone()));
        }
    }

    #[test]
    fn test_isbn_validation() {
        assert_eq!(isbn("978-0-13-110362-7"), Coerced::Valid("9780131103627".to_string()));
        assert_eq!(isbn("0-306-40615-2"), Coerced::Valid("0306406152".to_string()));
        assert_eq!(isbn("080442957x"), Coerced::Valid("080442957X".to_string()));
        assert_eq!(isbn(""), Coerced::Missing);
        assert!(matches!(isbn("9780131103628"), Coerced::Invalid(_)));
        assert!(matches!(isbn("12345"), Coerced::Invalid(_)));
        assert!(matches!(isbn("9.78013E+12"), Coerced::Invalid(_)));
    }

    #[test]
    fn test_year_range_and_float_exports() {
        let range = 1000..=2100;
        assert_eq!(year("1999", &range), Coerced::Valid(1999));
        assert_eq!(year(" 2001.0 ", &range), Coerced::Valid(2001));
        assert_eq!(year("", &range), Coerced::Missing);
        assert!(matches!(year("2001.5", &range), Coerced::Invalid(_)));
        assert!(matches!(year("20011", &range), Coerced::Invalid(_)));
        assert!(matches!(year("unknown", &range), Coerced::Invalid(_)));
    }

    #[test]
    fn test_email_check() {
        assert_eq!(email(" Alice@X.com "), Coerced::Valid("alice@x.com".to_string()));
        assert_eq!(email("a.b+tag@mail.example.org"), Coerced::Valid("a.b+tag@mail.example.org".to_string()));
        assert!(matches!(email("alice"), Coerced::Invalid(_)));
        assert!(matches!(email("alice@localhost"), Coerced::Invalid(_)));
        assert!(matches!(email("a@b@c.com"), Coerced::Invalid(_)));
        assert!(matches!(email("a b@c.com"), Coerced::Invalid(_)));
        assert!(matches!(email("a@b..com"), Coerced::Invalid(_)));
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        for raw in [
            "2024-03-05",
            "2024/03/05",
            "2024.3.5",
            "20240305",
            "2024-03-05T10:30:00Z",
            "2024-03-05 10:30",
        ] {
            assert_eq!(date(raw), Coerced::Valid(expected), "input {}", raw);
        }
        assert_eq!(date(""), Coerced::Missing);
        assert!(matches!(date("2024-02-30"), Coerced::Invalid(_)));
        assert!(matches!(date("20241301"), Coerced::Invalid(_)));
        assert!(matches!(date("next tuesday"), Coerced::Invalid(_)));
    }

    #[test]
    fn test_gender() {
        assert_eq!(gender("Male"), Coerced::Valid("M".to_string()));
        assert_eq!(gender("女"), Coerced::Valid("F".to_string()));
        assert_eq!(gender("F"), Coerced::Valid("F".to_string()));
        assert!(matches!(gender("x"), Coerced::Invalid(_)));
    }

    #[test]
    fn test_or_warn_records_invalid_values() {
        let mut report = CleaningReport::default();
        let value = email("nope").or_warn(4, "email", "nope", &mut report);
        assert_eq!(value, None);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].line, 4);
        assert_eq!(report.warnings[0].column, "email");
    }
}
