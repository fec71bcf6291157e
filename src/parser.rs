// 🏗️ Field Parser - column discovery + date / amount decoding
//
// Statement exports disagree on column names, date encodings and sign
// conventions. Everything here is infallible: anything that cannot be read
// becomes None and is surfaced later by validation.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

use crate::transaction::{CellValue, TransactionType};

// ============================================================================
// HEADER SYNONYMS
// ============================================================================

pub const DATE_SYNONYMS: &[&str] = &[
    "date",
    "dt",
    "transaction date",
    "txn date",
    "tran date",
    "posting date",
    "post date",
    "value date",
    "booking date",
];

pub const DESCRIPTION_SYNONYMS: &[&str] = &[
    "description",
    "narration",
    "particulars",
    "remarks",
    "details",
    "transaction details",
    "memo",
    "payee",
    "merchant",
];

pub const CREDIT_SYNONYMS: &[&str] = &["credit", "cr", "deposit", "money in", "paid in"];

pub const DEBIT_SYNONYMS: &[&str] = &["debit", "dr", "withdrawal", "money out", "paid out"];

pub const AMOUNT_SYNONYMS: &[&str] = &["amount", "amt", "value", "transaction amount"];

pub const CATEGORY_SYNONYMS: &[&str] = &["category"];

/// Headers that look like an amount but never hold the transaction amount.
const NON_AMOUNT_MARKERS: &[&str] = &["balance"];

/// Check a lower-cased header against one synonym.
///
/// Synonyms of two characters or fewer ("cr", "dr") only match a whole word,
/// otherwise "description" would read as a credit column.
pub fn header_matches(header_lower: &str, synonym: &str) -> bool {
    if synonym.len() <= 2 {
        header_lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == synonym)
    } else {
        header_lower.contains(synonym)
    }
}

/// First header (by position) that matches any synonym, skipping `taken` columns.
pub fn find_column<S: AsRef<str>>(
    headers: &[S],
    synonyms: &[&str],
    taken: &[usize],
) -> Option<usize> {
    headers.iter().enumerate().find_map(|(idx, header)| {
        if taken.contains(&idx) {
            return None;
        }
        let lower = header.as_ref().trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        synonyms
            .iter()
            .any(|syn| header_matches(&lower, syn))
            .then_some(idx)
    })
}

// ============================================================================
// COLUMN MAP
// ============================================================================

/// Column positions discovered from a header list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: Option<usize>,
    pub description: Option<usize>,
    pub credit: Option<usize>,
    pub debit: Option<usize>,
    pub amount: Option<usize>,
    /// A "Cr/Dr" column holding direction text next to a generic amount.
    pub direction: Option<usize>,
    pub category: Option<usize>,
}

impl ColumnMap {
    /// Discover columns by fuzzy header-name matching. Never fails; missing
    /// columns stay None.
    pub fn discover<S: AsRef<str>>(headers: &[S]) -> Self {
        let date = find_column(headers, DATE_SYNONYMS, &[]);

        let mut taken: Vec<usize> = date.into_iter().collect();
        let description = find_column(headers, DESCRIPTION_SYNONYMS, &taken);
        taken.extend(description);

        // Balance and secondary date columns ("Value Dt") are never amounts
        let non_amount: Vec<usize> = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| {
                let lower = h.as_ref().trim().to_lowercase();
                NON_AMOUNT_MARKERS.iter().any(|m| lower.contains(m))
                    || DATE_SYNONYMS.iter().any(|syn| header_matches(&lower, syn))
            })
            .map(|(i, _)| i)
            .collect();
        taken.extend(non_amount);

        let credit = find_column(headers, CREDIT_SYNONYMS, &taken);
        let debit = find_column(headers, DEBIT_SYNONYMS, &taken);

        // One header naming both directions ("Debit/Credit", "Amount (Dr/Cr)")
        // is a single signed column, not a credit column
        let (credit, debit, combined) = match (credit, debit) {
            (Some(c), Some(d)) if c == d => (None, None, Some(c)),
            (credit, debit) => (credit, debit, None),
        };

        taken.extend(credit);
        taken.extend(debit);
        taken.extend(combined);
        let amount = find_column(headers, AMOUNT_SYNONYMS, &taken).or(combined);
        let direction = combined.filter(|c| amount != Some(*c));

        let category = find_column(headers, CATEGORY_SYNONYMS, &[]);

        ColumnMap {
            date,
            description,
            credit,
            debit,
            amount,
            direction,
            category,
        }
    }

    /// True when distinct credit/debit columns exist.
    pub fn has_split_amount(&self) -> bool {
        self.credit.is_some() || self.debit.is_some()
    }
}

// ============================================================================
// AMOUNT RESOLUTION
// ============================================================================

/// Resolve amount + direction for one row given the cells at the discovered columns.
///
/// Precedence:
/// 1. A credit column holding a non-zero number (credit wins when both are populated)
/// 2. A debit column holding a non-zero number
/// 3. The generic amount column, signed by the direction cell if it holds
///    Cr/Dr text, otherwise by its own sign
pub fn resolve_amount(
    credit: Option<&CellValue>,
    debit: Option<&CellValue>,
    generic: Option<&CellValue>,
    direction: Option<&CellValue>,
) -> (Option<f64>, TransactionType) {
    let credit_value = credit.and_then(parse_amount).filter(|v| *v != 0.0);
    if let Some(v) = credit_value {
        return (Some(v.abs()), TransactionType::Credit);
    }

    let debit_value = debit.and_then(parse_amount).filter(|v| *v != 0.0);
    if let Some(v) = debit_value {
        return (Some(-v.abs()), TransactionType::Debit);
    }

    let amount = generic.and_then(parse_amount).filter(|v| *v != 0.0);
    let indicator = direction.and_then(parse_direction);

    match (amount, indicator) {
        (Some(v), Some(TransactionType::Credit)) => (Some(v.abs()), TransactionType::Credit),
        (Some(v), Some(TransactionType::Debit)) => (Some(-v.abs()), TransactionType::Debit),
        (amount, _) => (amount, TransactionType::from_amount(amount)),
    }
}

/// Read a Cr/Dr style indicator cell.
pub fn parse_direction(cell: &CellValue) -> Option<TransactionType> {
    let CellValue::Text(text) = cell else {
        return None;
    };
    match text.trim().trim_end_matches('.').to_lowercase().as_str() {
        "cr" | "credit" => Some(TransactionType::Credit),
        "dr" | "debit" => Some(TransactionType::Debit),
        _ => None,
    }
}

// ============================================================================
// AMOUNT PARSING
// ============================================================================

fn currency_code_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(rs|inr|usd|eur|gbp|aed|sgd)\b\.?").ok())
        .as_ref()
}

/// Parse a money cell into a signed number.
///
/// - `"₹ 1,250.00"` -> 1250.0
/// - `"(1,250.00)"` -> -1250.0
/// - `"1,250.00 Dr"` -> -1250.0, `"1,250.00 Cr"` -> 1250.0
/// - `"500-"` -> -500.0
pub fn parse_amount(cell: &CellValue) -> Option<f64> {
    match cell {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Text(s) => parse_amount_str(s),
        _ => None,
    }
}

pub fn parse_amount_str(raw: &str) -> Option<f64> {
    let mut text = raw.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    let mut negative = false;

    if text.starts_with('(') && text.ends_with(')') && text.len() > 2 {
        negative = true;
        text = text[1..text.len() - 1].trim().to_string();
    }

    if let Some(rest) = text.strip_suffix("dr") {
        negative = true;
        text = rest.trim_end().to_string();
    } else if let Some(rest) = text.strip_suffix("cr") {
        text = rest.trim_end().to_string();
    }

    let text = match currency_code_regex() {
        Some(re) => re.replace_all(&text, "").into_owned(),
        None => text,
    };

    // Anything alphabetic left over is not a money value
    if text.chars().any(char::is_alphabetic) {
        return None;
    }

    let mut cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    if cleaned.len() > 1 && cleaned.ends_with('-') && !cleaned.starts_with('-') {
        negative = true;
        cleaned.pop();
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(if negative { -value.abs() } else { value })
}

// ============================================================================
// DATE PARSING
// ============================================================================

struct DatePatterns {
    iso: Regex,
    day_first: Regex,
    year_first: Regex,
    textual: Regex,
}

fn date_patterns() -> Option<&'static DatePatterns> {
    static PATTERNS: OnceLock<Option<DatePatterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            let compile = |p: &str| Regex::new(p).ok();
            Some(DatePatterns {
                iso: compile(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})(?:$|[T\s])")?,
                day_first: compile(r"^([0-9]{1,2})[/\-.]([0-9]{1,2})[/\-.]([0-9]{4}|[0-9]{2})(?:$|\s)")?,
                year_first: compile(r"^([0-9]{4})[/\-.]([0-9]{1,2})[/\-.]([0-9]{1,2})(?:$|\s)")?,
                textual: compile(
                    r"(?i)^([0-9]{1,2})[\s\-]+([a-z]{3,9})\.?[\s,\-]+([0-9]{4}|[0-9]{2})(?:$|\s)",
                )?,
            })
        })
        .as_ref()
}

/// Generic formats tried last, on the full text and on its first token.
const FALLBACK_DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%m/%d/%y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%d %B, %Y",
    "%d %b, %Y",
];

const FALLBACK_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Spreadsheet serial day numbers count from this date.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Two-digit years: above 50 is 19xx, otherwise 20xx.
pub fn expand_two_digit_year(yy: i32) -> i32 {
    if yy > 50 {
        1900 + yy
    } else {
        2000 + yy
    }
}

fn month_from_name(name: &str) -> Option<u32> {
    let prefix: String = name.chars().take(3).collect::<String>().to_lowercase();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn year_from_capture(s: &str) -> Option<i32> {
    let y: i32 = s.parse().ok()?;
    Some(if s.len() == 2 { expand_two_digit_year(y) } else { y })
}

/// Parse a date cell. Native dates pass through; numbers are read as
/// `YYYYMMDD` or spreadsheet serial days; text goes through `parse_date_str`.
pub fn parse_date(cell: &CellValue) -> Option<NaiveDate> {
    match cell {
        CellValue::Date(d) => Some(*d),
        CellValue::Number(n) => parse_numeric_date(*n),
        CellValue::Text(s) => parse_date_str(s),
        _ => None,
    }
}

fn parse_numeric_date(n: f64) -> Option<NaiveDate> {
    if !n.is_finite() || n < 1.0 {
        return None;
    }

    if n.fract() == 0.0 && (10_000_101.0..=99_991_231.0).contains(&n) {
        if let Some(d) = compact_ymd(&format!("{}", n as i64)) {
            return Some(d);
        }
    }

    if n <= MAX_SERIAL_DAY {
        let (y, m, d) = SERIAL_EPOCH;
        let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
        return epoch.checked_add_signed(Duration::days(n.floor() as i64));
    }

    None
}

/// Parse date text, in priority order:
/// 1. ISO `YYYY-MM-DD` (optionally followed by a time)
/// 2. Day-first `D/M/Y`, `D-M-Y` or `D.M.Y`, two-digit years pivoted at 50
/// 3. Year-first `Y/M/D`
/// 4. Textual `D Mon Y`
/// 5. Best-effort generic formats (month-first US dates, long month names, RFC 3339 ...)
pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    let Some(patterns) = date_patterns() else {
        return parse_date_fallback(text);
    };

    if let Some(caps) = patterns.iso.captures(text) {
        if let Some(d) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(d);
        }
    }

    if let Some(caps) = patterns.day_first.captures(text) {
        let year = year_from_capture(&caps[3]);
        let month = caps[2].parse().ok();
        let day = caps[1].parse().ok();
        if let (Some(y), Some(m), Some(d)) = (year, month, day) {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return Some(date);
            }
        }
    }

    if let Some(caps) = patterns.year_first.captures(text) {
        if let Some(d) = ymd(&caps[1], &caps[2], &caps[3]) {
            return Some(d);
        }
    }

    if let Some(caps) = patterns.textual.captures(text) {
        let year = year_from_capture(&caps[3]);
        let month = month_from_name(&caps[2]);
        let day = caps[1].parse().ok();
        if let (Some(y), Some(m), Some(d)) = (year, month, day) {
            if let Some(date) = NaiveDate::from_ymd_opt(y, m, d) {
                return Some(date);
            }
        }
    }

    parse_date_fallback(text)
}

fn ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y.parse().ok()?, m.parse().ok()?, d.parse().ok()?)
}

/// `YYYYMMDD` with no separators.
fn compact_ymd(s: &str) -> Option<NaiveDate> {
    if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    ymd(&s[0..4], &s[4..6], &s[6..8])
}

fn parse_date_fallback(text: &str) -> Option<NaiveDate> {
    if let Some(d) = compact_ymd(text) {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }

    for fmt in FALLBACK_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(dt.date());
        }
    }

    let first_token = text.split_whitespace().next().unwrap_or(text);
    for fmt in FALLBACK_DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, fmt) {
            return Some(d);
        }
        if first_token != text {
            if let Ok(d) = NaiveDate::parse_from_str(first_token, fmt) {
                return Some(d);
            }
        }
    }

    None
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn test_short_synonyms_match_whole_words_only() {
        assert!(header_matches("cr", "cr"));
        assert!(header_matches("cr/dr", "cr"));
        assert!(header_matches("cr/dr", "dr"));
        assert!(!header_matches("description", "cr"));
        assert!(!header_matches("address", "dr"));
        assert!(header_matches("deposit amt.", "deposit"));
    }

    #[test]
    fn test_discover_bank_style_headers() {
        let headers = [
            "Date",
            "Narration",
            "Chq./Ref.No.",
            "Value Dt",
            "Withdrawal Amt.",
            "Deposit Amt.",
            "Closing Balance",
        ];
        let map = ColumnMap::discover(&headers);

        assert_eq!(map.date, Some(0));
        assert_eq!(map.description, Some(1));
        assert_eq!(map.debit, Some(4));
        assert_eq!(map.credit, Some(5));
        assert_eq!(map.amount, None);
        assert!(map.has_split_amount());
    }

    #[test]
    fn test_discover_generic_amount() {
        let headers = ["Transaction Date", "Description", "Amount", "Balance Amount"];
        let map = ColumnMap::discover(&headers);

        assert_eq!(map.date, Some(0));
        assert_eq!(map.description, Some(1));
        assert_eq!(map.amount, Some(2));
        assert_eq!(map.credit, None);
        assert_eq!(map.debit, None);
    }

    #[test]
    fn test_value_date_is_not_an_amount() {
        let headers = ["Value Date", "Remarks", "Value"];
        let map = ColumnMap::discover(&headers);

        assert_eq!(map.date, Some(0));
        assert_eq!(map.amount, Some(2));
    }

    #[test]
    fn test_discover_combined_direction_header() {
        let map = ColumnMap::discover(&["Date", "Description", "Debit/Credit"]);
        assert_eq!(map.credit, None);
        assert_eq!(map.debit, None);
        assert_eq!(map.amount, Some(2));
        assert_eq!(map.direction, None);

        let map = ColumnMap::discover(&["Date", "Description", "Amount (Dr/Cr)"]);
        assert_eq!(map.amount, Some(2));
        assert!(!map.has_split_amount());

        // Cr/Dr next to a separate amount is read as the direction column
        let map = ColumnMap::discover(&["Date", "Description", "Amount", "Cr/Dr"]);
        assert_eq!(map.amount, Some(2));
        assert_eq!(map.direction, Some(3));
        assert_eq!(map.credit, None);
    }

    #[test]
    fn test_discover_nothing() {
        let headers = ["foo", "bar"];
        assert_eq!(ColumnMap::discover(&headers), ColumnMap::default());
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount_str("1,250.00"), Some(1250.0));
        assert_eq!(parse_amount_str("(1,250.00)"), Some(-1250.0));
        assert_eq!(parse_amount_str("₹ 2,00,000.50"), Some(200000.5));
        assert_eq!(parse_amount_str("$-45.99"), Some(-45.99));
        assert_eq!(parse_amount_str("Rs. 300"), Some(300.0));
        assert_eq!(parse_amount_str("INR 99.90"), Some(99.9));
        assert_eq!(parse_amount_str("1,200.00 Dr"), Some(-1200.0));
        assert_eq!(parse_amount_str("1,200.00 CR"), Some(1200.0));
        assert_eq!(parse_amount_str("500-"), Some(-500.0));
        assert_eq!(parse_amount_str("+12"), Some(12.0));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert_eq!(parse_amount_str(""), None);
        assert_eq!(parse_amount_str("   "), None);
        assert_eq!(parse_amount_str("N/A"), None);
        assert_eq!(parse_amount_str("-"), None);
        assert_eq!(parse_amount_str("1.2.3"), None);
        assert_eq!(parse_amount(&CellValue::Bool(true)), None);
        assert_eq!(parse_amount(&CellValue::Number(f64::NAN)), None);
        assert_eq!(parse_amount(&CellValue::Number(-7.5)), Some(-7.5));
    }

    #[test]
    fn test_parse_date_priority_order() {
        assert_eq!(parse_date_str("2024-03-15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_str("2024-03-15T10:22:00Z"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_str("15/03/24"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_str("15-03-2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_str("05.01.2023"), Some(date(2023, 1, 5)));
        assert_eq!(parse_date_str("2024/03/15"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_str("15 Mar 2024"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_str("15-Mar-24"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_str("1 September 2023"), Some(date(2023, 9, 1)));
    }

    #[test]
    fn test_day_first_wins_over_month_first() {
        // Ambiguous: read day-first
        assert_eq!(parse_date_str("04/05/2024"), Some(date(2024, 5, 4)));
        // Unambiguous month-first only via the generic fallback
        assert_eq!(parse_date_str("03/15/2024"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_two_digit_year_pivot() {
        assert_eq!(expand_two_digit_year(51), 1951);
        assert_eq!(expand_two_digit_year(50), 2050);
        assert_eq!(expand_two_digit_year(99), 1999);
        assert_eq!(expand_two_digit_year(0), 2000);
        assert_eq!(parse_date_str("01/01/99"), Some(date(1999, 1, 1)));
    }

    #[test]
    fn test_parse_date_fallbacks() {
        assert_eq!(parse_date_str("March 5, 2024"), Some(date(2024, 3, 5)));
        assert_eq!(parse_date_str("15/03/2024 14:05"), Some(date(2024, 3, 15)));
        assert_eq!(parse_date_str("20240315"), Some(date(2024, 3, 15)));
    }

    #[test]
    fn test_parse_date_unparseable() {
        assert_eq!(parse_date_str(""), None);
        assert_eq!(parse_date_str("yesterday"), None);
        assert_eq!(parse_date_str("32/13/2024"), None);
        assert_eq!(parse_date(&CellValue::Empty), None);
        assert_eq!(parse_date(&CellValue::Bool(false)), None);
    }

    #[test]
    fn test_parse_numeric_dates() {
        assert_eq!(parse_date(&CellValue::Number(45366.0)), Some(date(2024, 3, 15)));
        assert_eq!(parse_date(&CellValue::Number(20240315.0)), Some(date(2024, 3, 15)));
        assert_eq!(parse_date(&CellValue::Date(date(2020, 1, 2))), Some(date(2020, 1, 2)));
        assert_eq!(parse_date(&CellValue::Number(-3.0)), None);
    }

    #[test]
    fn test_resolve_amount_credit_wins_ties() {
        let (amount, ty) = resolve_amount(Some(&text("100.00")), Some(&text("40.00")), None, None);
        assert_eq!(amount, Some(100.0));
        assert_eq!(ty, TransactionType::Credit);
    }

    #[test]
    fn test_resolve_amount_positive_withdrawal_is_debit() {
        let (amount, ty) = resolve_amount(Some(&CellValue::Empty), Some(&text("250.00")), None, None);
        assert_eq!(amount, Some(-250.0));
        assert_eq!(ty, TransactionType::Debit);
    }

    #[test]
    fn test_resolve_amount_zero_credit_falls_through() {
        let (amount, ty) = resolve_amount(Some(&text("0.00")), Some(&text("12.50")), None, None);
        assert_eq!(amount, Some(-12.5));
        assert_eq!(ty, TransactionType::Debit);
    }

    #[test]
    fn test_resolve_amount_indicator_column() {
        let (amount, ty) = resolve_amount(None, None, Some(&text("300")), Some(&text("DR")));
        assert_eq!(amount, Some(-300.0));
        assert_eq!(ty, TransactionType::Debit);

        let (amount, ty) = resolve_amount(None, None, Some(&text("-300")), Some(&text("Cr")));
        assert_eq!(amount, Some(300.0));
        assert_eq!(ty, TransactionType::Credit);
    }

    #[test]
    fn test_resolve_amount_generic_sign() {
        let (amount, ty) = resolve_amount(None, None, Some(&text("(1,250.00)")), None);
        assert_eq!(amount, Some(-1250.0));
        assert_eq!(ty, TransactionType::Debit);

        let (amount, ty) = resolve_amount(None, None, Some(&text("0")), None);
        assert_eq!(amount, None);
        assert_eq!(ty, TransactionType::Unknown);
    }
}
