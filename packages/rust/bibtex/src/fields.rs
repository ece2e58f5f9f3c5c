//! Field formatting for publication listings.

use crate::BibEntry;

/// Display abbreviations, indexed by month number - 1.
const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan.", "Feb.", "Mar.", "Apr.", "May", "Jun.", "Jul.", "Aug.", "Sept.", "Oct.", "Nov.", "Dec.",
];

/// Join an author list the way a reference list reads.
///
/// `A and B and C` becomes `A, B, and C`; two authors keep their `and`.
pub fn format_authors(field: &str) -> String {
    let parts: Vec<&str> = field
        .split(" and ")
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    match parts.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

/// Month number (1-12) of a BibTeX month value, or 0 when unrecognized.
///
/// Accepts numbers (`3`, `03`), three-letter macros (`mar`), `sept`, and full
/// English names, case-insensitively.
pub fn month_number(value: &str) -> u32 {
    let normalized = value.trim().to_lowercase();
    if !normalized.is_empty() && normalized.bytes().all(|b| b.is_ascii_digit()) {
        return match normalized.parse::<u32>() {
            Ok(n @ 1..=12) => n,
            _ => 0,
        };
    }

    match normalized.as_str() {
        "jan" | "january" => 1,
        "feb" | "february" => 2,
        "mar" | "march" => 3,
        "apr" | "april" => 4,
        "may" => 5,
        "jun" | "june" => 6,
        "jul" | "july" => 7,
        "aug" | "august" => 8,
        "sep" | "sept" | "september" => 9,
        "oct" | "october" => 10,
        "nov" | "november" => 11,
        "dec" | "december" => 12,
        _ => 0,
    }
}

/// Display abbreviation of a month value (`Sept.`), or `""` when unrecognized.
pub fn format_month(value: &str) -> String {
    match month_number(value) {
        0 => String::new(),
        n => MONTH_ABBREVIATIONS[n as usize - 1].to_string(),
    }
}

/// `"Mar. 2020"`, or just the year when the month is missing or unknown.
pub fn format_date(entry: &BibEntry) -> String {
    let year = entry.get_or_empty("year").trim();
    let month = format_month(entry.get_or_empty("month"));
    if !month.is_empty() && !year.is_empty() {
        format!("{month} {year}")
    } else {
        year.to_string()
    }
}

/// Numeric year for sorting: all digits of the value, or 0.
///
/// `"2020a"` sorts as 2020, `"forthcoming"` as 0.
pub fn safe_year(value: &str) -> u32 {
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Lowercased keywords from `keywords` (or `keyword`), split on `,` or `;`.
pub fn parse_keywords(entry: &BibEntry) -> Vec<String> {
    let raw = entry
        .first_of(&["keywords", "keyword"])
        .unwrap_or_default();
    raw.split([',', ';'])
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_lowercase)
        .collect()
}
