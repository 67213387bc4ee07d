//! The GEDCOM date grammar and its comparison arithmetic.
//!
//! Nine forms are recognized: exact (`15 JAN 1800`), month-year, year-only,
//! about, before, after, between, from-to, and the open periods `FROM X` /
//! `TO X`; a parenthesised phrase is kept as an opaque non-exact value.
//! Parsing never fails hard: an unparseable value keeps its original text
//! and carries a parse error for the caller to inspect.
//!
//! Calendar escapes (`@#DJULIAN@` …) tag the calendar and are otherwise
//! uninterpreted; only Gregorian dates are validated.

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// The grammatical form a date value took.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum DateKind {
    /// A single calendar date, possibly missing month or day.
    Exact,
    /// `ABT`/`CIRCA` and friends.
    About,
    /// `BEF`, strictly earlier than the boundary.
    Before,
    /// `AFT`, strictly later than the boundary.
    After,
    /// `BET X AND Y`.
    Between,
    /// An open period `FROM X`.
    From,
    /// An open period `TO X`.
    To,
    /// A closed period `FROM X TO Y`.
    FromTo,
    /// A phrase or unparseable value; opaque and non-exact.
    #[default]
    Unknown,
}

/// The calendar a date was written in. Tagged, never interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub enum Calendar {
    /// The default when no escape is present.
    #[default]
    Gregorian,
    /// `@#DJULIAN@`
    Julian,
    /// `@#DHEBREW@`
    Hebrew,
    /// `@#DFRENCH R@`
    French,
    /// Any other escape.
    Unknown,
}

/// A year-month-day triple; `0` means the component is absent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct SimpleDate {
    /// Calendar year, `0` when unknown.
    pub year: u16,
    /// 1-based month, `0` when unspecified.
    pub month: u8,
    /// 1-based day, `0` when unspecified.
    pub day: u8,
}

impl SimpleDate {
    /// Builds a triple.
    #[must_use]
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        SimpleDate { year, month, day }
    }

    /// Whether all components are absent.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }
}

/// The difference between two dates, in fractional years.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct Duration {
    /// Absolute distance in fractional years; never negative.
    pub years: f64,
    /// Both sides parsed without error.
    pub is_known: bool,
    /// At least one side is not an exact date.
    pub is_estimate: bool,
}

/// A parsed GEDCOM date value.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct ParsedDate {
    /// Which of the nine forms was recognized.
    pub kind: DateKind,
    /// The tagged calendar, Gregorian by default.
    pub calendar: Calendar,
    /// The single date (or boundary for about/before/after and open
    /// periods). Zero components mean "absent".
    pub date: SimpleDate,
    /// Range start; meaningful for `Between` and `FromTo` only.
    pub start: SimpleDate,
    /// Range end; meaningful for `Between` and `FromTo` only.
    pub end: SimpleDate,
    /// The value exactly as it appeared in the source.
    pub original: String,
    /// Why parsing failed, when it did. The original text is still kept.
    pub error: Option<String>,
}

const ABOUT_WORDS: &[&str] = &[
    "ABT", "ABT.", "ABOUT", "C.", "CA", "CA.", "CCA", "CCA.", "CIRCA",
];
const BEFORE_WORDS: &[&str] = &["BEF", "BEF.", "BEFORE"];
const AFTER_WORDS: &[&str] = &["AFT", "AFT.", "AFTER"];
const RANGE_PREFIXES: &[&str] = &["BET", "BET.", "BETWEEN", "FROM"];
const CONNECTORS: &[&str] = &["AND", "TO", "-"];

const MONTHS: &[(&str, u8)] = &[
    ("JAN", 1),
    ("JANUARY", 1),
    ("FEB", 2),
    ("FEBRUARY", 2),
    ("MAR", 3),
    ("MARCH", 3),
    ("APR", 4),
    ("APRIL", 4),
    ("MAY", 5),
    ("JUN", 6),
    ("JUNE", 6),
    ("JUL", 7),
    ("JULY", 7),
    ("AUG", 8),
    ("AUGUST", 8),
    ("SEP", 9),
    ("SEPTEMBER", 9),
    ("OCT", 10),
    ("OCTOBER", 10),
    ("NOV", 11),
    ("NOVEMBER", 11),
    ("DEC", 12),
    ("DECEMBER", 12),
];

fn month_number(token: &str) -> Option<u8> {
    MONTHS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|&(_, number)| number)
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn days_in_year(year: u16) -> u16 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

fn day_of_year(year: u16, month: u8, day: u8) -> u16 {
    let mut total = u16::from(day);
    for m in 1..month {
        total += u16::from(days_in_month(year, m));
    }
    total
}

/// Fractional-year position of a triple, with mid-range semantics for
/// missing components.
fn fractional_years(date: SimpleDate) -> f64 {
    if date.year == 0 {
        return 0.0;
    }
    let year = f64::from(date.year);
    if date.month == 0 {
        return year + 0.5;
    }
    if date.day == 0 {
        let first = fractional_years(SimpleDate::new(date.year, date.month, 1));
        let last = fractional_years(SimpleDate::new(
            date.year,
            date.month,
            days_in_month(date.year, date.month),
        ));
        return (first + last) / 2.0;
    }
    year + f64::from(day_of_year(date.year, date.month, date.day)) / f64::from(days_in_year(date.year))
}

fn parse_year(token: &str) -> Result<u16, String> {
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid year \"{token}\""));
    }
    match token.parse::<u16>() {
        Ok(year) if year >= 1 => Ok(year),
        _ => Err(format!("year \"{token}\" out of range")),
    }
}

/// Parses the three single-date forms: `DAY MONTH YEAR`, `MONTH YEAR`,
/// `YEAR`. Gregorian dates are validated against the calendar.
fn parse_single(tokens: &[&str], calendar: Calendar) -> Result<SimpleDate, String> {
    match tokens {
        [year] => Ok(SimpleDate::new(parse_year(year)?, 0, 0)),
        [month, year] => {
            let month =
                month_number(month).ok_or_else(|| format!("unknown month \"{month}\""))?;
            Ok(SimpleDate::new(parse_year(year)?, month, 0))
        }
        [day, month, year] => {
            let day: u8 = day
                .parse()
                .map_err(|_| format!("invalid day \"{day}\""))?;
            let month =
                month_number(month).ok_or_else(|| format!("unknown month \"{month}\""))?;
            let year = parse_year(year)?;
            if calendar == Calendar::Gregorian
                && (day == 0 || day > days_in_month(year, month))
            {
                return Err(format!("day {day} out of range for month {month}, {year}"));
            }
            Ok(SimpleDate::new(year, month, day))
        }
        [] => Err("missing date".to_string()),
        _ => Err("too many date components".to_string()),
    }
}

fn parse_calendar_escape(input: &str) -> (Calendar, &str) {
    let Some(after_prefix) = input.strip_prefix("@#D") else {
        return (Calendar::Gregorian, input);
    };
    let Some(close) = after_prefix.find('@') else {
        return (Calendar::Gregorian, input);
    };
    let name = after_prefix[..close].trim().to_uppercase();
    let calendar = match name.as_str() {
        "GREGORIAN" => Calendar::Gregorian,
        "JULIAN" => Calendar::Julian,
        "HEBREW" => Calendar::Hebrew,
        "FRENCH R" | "FRENCH" => Calendar::French,
        _ => Calendar::Unknown,
    };
    (calendar, after_prefix[close + 1..].trim_start())
}

impl ParsedDate {
    /// Parses a GEDCOM date value.
    ///
    /// Never fails: an unrecognizable value comes back with
    /// [`DateKind::Unknown`] or with [`ParsedDate::error`] set, and the
    /// original text preserved verbatim either way.
    #[must_use]
    pub fn parse(input: &str) -> ParsedDate {
        let mut parsed = ParsedDate {
            original: input.to_string(),
            ..ParsedDate::default()
        };

        // Collapse interior whitespace runs; keywords are matched uppercase.
        let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            parsed.error = Some("empty date value".to_string());
            return parsed;
        }
        if collapsed.starts_with('(') {
            // A date phrase is opaque: non-exact, no components.
            return parsed;
        }

        let (calendar, remainder) = parse_calendar_escape(&collapsed);
        parsed.calendar = calendar;

        let upper = remainder.to_uppercase();
        let tokens: Vec<&str> = upper.split(' ').filter(|t| !t.is_empty()).collect();
        if tokens.is_empty() {
            parsed.error = Some("empty date value".to_string());
            return parsed;
        }

        let head = tokens[0];
        if ABOUT_WORDS.contains(&head) {
            parsed.kind = DateKind::About;
            parsed.apply_single(&tokens[1..]);
        } else if BEFORE_WORDS.contains(&head) {
            parsed.kind = DateKind::Before;
            parsed.apply_single(&tokens[1..]);
        } else if AFTER_WORDS.contains(&head) {
            parsed.kind = DateKind::After;
            parsed.apply_single(&tokens[1..]);
        } else if head == "TO" {
            parsed.kind = DateKind::To;
            parsed.apply_single(&tokens[1..]);
        } else if RANGE_PREFIXES.contains(&head) {
            parsed.apply_range(head, &tokens[1..]);
        } else if let Some(dash) = tokens.iter().position(|&t| t == "-") {
            parsed.kind = DateKind::Between;
            parsed.apply_endpoints(&tokens[..dash], &tokens[dash + 1..]);
        } else {
            parsed.kind = DateKind::Exact;
            parsed.apply_single(&tokens);
        }
        parsed
    }

    fn apply_single(&mut self, tokens: &[&str]) {
        match parse_single(tokens, self.calendar) {
            Ok(date) => self.date = date,
            Err(message) => self.error = Some(message),
        }
    }

    fn apply_range(&mut self, prefix: &str, tokens: &[&str]) {
        let connector = tokens
            .iter()
            .position(|token| CONNECTORS.contains(token));
        match connector {
            Some(at) => {
                self.kind = if prefix == "FROM" {
                    DateKind::FromTo
                } else {
                    DateKind::Between
                };
                self.apply_endpoints(&tokens[..at], &tokens[at + 1..]);
            }
            None if prefix == "FROM" => {
                self.kind = DateKind::From;
                self.apply_single(tokens);
            }
            None => {
                self.error = Some("range is missing its connector".to_string());
            }
        }
    }

    fn apply_endpoints(&mut self, start: &[&str], end: &[&str]) {
        // A range is only usable with both endpoints parsed.
        match (
            parse_single(start, self.calendar),
            parse_single(end, self.calendar),
        ) {
            (Ok(start), Ok(end)) => {
                self.start = start;
                self.end = end;
            }
            (Err(message), _) | (_, Err(message)) => self.error = Some(message),
        }
    }

    /// Whether the value parsed cleanly.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// Whether this date is a two-endpoint range.
    #[must_use]
    pub fn is_range(&self) -> bool {
        matches!(self.kind, DateKind::Between | DateKind::FromTo)
    }

    /// Whether this date is exact.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.kind == DateKind::Exact
    }

    /// The earliest point this date can mean.
    ///
    /// Single dates substitute `1` for missing month and day. `Before` has
    /// no lower bound and collapses to year 1, Jan 1. Ranges answer with
    /// their start.
    #[must_use]
    pub fn earliest(&self) -> SimpleDate {
        fn fill(mut date: SimpleDate) -> SimpleDate {
            if date.month == 0 {
                date.month = 1;
                date.day = 1;
            } else if date.day == 0 {
                date.day = 1;
            }
            date
        }
        match self.kind {
            DateKind::Between | DateKind::FromTo => fill(self.start),
            DateKind::Before => SimpleDate::new(1, 1, 1),
            DateKind::Unknown => SimpleDate::default(),
            _ => fill(self.date),
        }
    }

    /// The latest point this date can mean.
    ///
    /// Single dates substitute month 12 and day 31. `After` has no upper
    /// bound and saturates to year 9999, Dec 31. Ranges answer with their
    /// end.
    #[must_use]
    pub fn latest(&self) -> SimpleDate {
        fn fill(mut date: SimpleDate) -> SimpleDate {
            if date.month == 0 {
                date.month = 12;
                date.day = 31;
            } else if date.day == 0 {
                date.day = 31;
            }
            date
        }
        match self.kind {
            DateKind::Between | DateKind::FromTo => fill(self.end),
            DateKind::After => SimpleDate::new(9999, 12, 31),
            DateKind::Unknown => SimpleDate::default(),
            _ => fill(self.date),
        }
    }

    /// A floating-point year estimate with mid-range semantics.
    ///
    /// Full dates use day-of-year over days-in-year; a month-year averages
    /// the month's first and last day; a bare year lands mid-year; ranges
    /// average their endpoints.
    #[must_use]
    pub fn years(&self) -> f64 {
        match self.kind {
            DateKind::Between | DateKind::FromTo => {
                (fractional_years(self.start) + fractional_years(self.end)) / 2.0
            }
            DateKind::Unknown => 0.0,
            _ => fractional_years(self.date),
        }
    }

    /// Similarity on a `0.0..=1.0` scale: `1 − (Δyears/max_years)²`,
    /// clipped to zero once the distance exceeds `max_years`.
    #[must_use]
    pub fn similarity(&self, other: &ParsedDate, max_years: f64) -> f64 {
        let distance = (self.years() - other.years()).abs();
        if distance >= max_years {
            return 0.0;
        }
        let ratio = distance / max_years;
        1.0 - ratio * ratio
    }

    /// Constraint-aware equality.
    ///
    /// Two dates of the same single form are equal when their components
    /// match. An exact or about date equals a `Before`/`After` date when it
    /// falls on the correct side of the boundary. Ranges and open periods
    /// are never equal to anything, including each other, unless both
    /// sides reduce to the same exact date, which they cannot.
    #[must_use]
    pub fn equals(&self, other: &ParsedDate) -> bool {
        use DateKind::{About, After, Before, Exact};
        if self.error.is_some() || other.error.is_some() {
            return false;
        }
        match (self.kind, other.kind) {
            (Exact, Exact) | (Before, Before) | (After, After) | (About, About) => {
                self.date == other.date
            }
            (Exact | About, Before) => self.years() < other.years(),
            (Before, Exact | About) => other.years() < self.years(),
            (Exact | About, After) => self.years() > other.years(),
            (After, Exact | About) => other.years() > self.years(),
            _ => false,
        }
    }

    /// The distance between two dates as a [`Duration`].
    ///
    /// The value is normalized non-negative. `is_known` holds when both
    /// sides parsed cleanly; `is_estimate` when either side is not exact.
    #[must_use]
    pub fn sub(&self, other: &ParsedDate) -> Duration {
        Duration {
            years: (self.years() - other.years()).abs(),
            is_known: self.error.is_none() && other.error.is_none(),
            is_estimate: self.kind != DateKind::Exact || other.kind != DateKind::Exact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_exact_full() {
        let date = ParsedDate::parse("15 JAN 1800");
        assert_eq!(date.kind, DateKind::Exact);
        assert_eq!(date.date, SimpleDate::new(1800, 1, 15));
        assert!(date.is_valid());
    }

    #[test]
    fn test_parse_exact_case_insensitive() {
        let date = ParsedDate::parse("2 Oct 1822");
        assert_eq!(date.kind, DateKind::Exact);
        assert_eq!(date.date, SimpleDate::new(1822, 10, 2));
    }

    #[test]
    fn test_parse_month_year() {
        let date = ParsedDate::parse("JAN 1800");
        assert_eq!(date.kind, DateKind::Exact);
        assert_eq!(date.date, SimpleDate::new(1800, 1, 0));
    }

    #[test]
    fn test_parse_year_only() {
        let date = ParsedDate::parse("1800");
        assert_eq!(date.kind, DateKind::Exact);
        assert_eq!(date.date, SimpleDate::new(1800, 0, 0));
    }

    #[test]
    fn test_parse_full_month_names() {
        let date = ParsedDate::parse("1 January 1900");
        assert_eq!(date.date, SimpleDate::new(1900, 1, 1));
        let date = ParsedDate::parse("30 september 1950");
        assert_eq!(date.date, SimpleDate::new(1950, 9, 30));
    }

    #[test]
    fn test_parse_about_keywords() {
        for keyword in ["ABT 1850", "ABT. 1850", "ABOUT 1850", "C. 1850", "CA 1850", "CIRCA 1850"]
        {
            let date = ParsedDate::parse(keyword);
            assert_eq!(date.kind, DateKind::About, "keyword: {keyword}");
            assert_eq!(date.date.year, 1850);
        }
    }

    #[test]
    fn test_parse_before_after() {
        let before = ParsedDate::parse("BEF 1900");
        assert_eq!(before.kind, DateKind::Before);
        assert_eq!(before.date.year, 1900);

        let after = ParsedDate::parse("AFTER 1900");
        assert_eq!(after.kind, DateKind::After);
        assert_eq!(after.date.year, 1900);
    }

    #[test]
    fn test_parse_between() {
        let date = ParsedDate::parse("BET 1800 AND 1850");
        assert_eq!(date.kind, DateKind::Between);
        assert_eq!(date.start, SimpleDate::new(1800, 0, 0));
        assert_eq!(date.end, SimpleDate::new(1850, 0, 0));
        assert!(date.is_valid());
    }

    #[test]
    fn test_parse_between_full_endpoints() {
        let date = ParsedDate::parse("BETWEEN 1 JAN 1800 AND 15 MAR 1850");
        assert_eq!(date.kind, DateKind::Between);
        assert_eq!(date.start, SimpleDate::new(1800, 1, 1));
        assert_eq!(date.end, SimpleDate::new(1850, 3, 15));
    }

    #[test]
    fn test_parse_from_to() {
        let date = ParsedDate::parse("FROM 1900 TO 1905");
        assert_eq!(date.kind, DateKind::FromTo);
        assert_eq!(date.start.year, 1900);
        assert_eq!(date.end.year, 1905);
    }

    #[test]
    fn test_parse_open_periods() {
        let from = ParsedDate::parse("FROM 1900");
        assert_eq!(from.kind, DateKind::From);
        assert_eq!(from.date.year, 1900);

        let to = ParsedDate::parse("TO 1905");
        assert_eq!(to.kind, DateKind::To);
        assert_eq!(to.date.year, 1905);
    }

    #[test]
    fn test_parse_dash_range() {
        let date = ParsedDate::parse("1800 - 1850");
        assert_eq!(date.kind, DateKind::Between);
        assert_eq!(date.start.year, 1800);
        assert_eq!(date.end.year, 1850);
    }

    #[test]
    fn test_parse_phrase_is_opaque() {
        let date = ParsedDate::parse("(deceased before the war)");
        assert_eq!(date.kind, DateKind::Unknown);
        assert!(date.is_valid());
        assert_eq!(date.original, "(deceased before the war)");
    }

    #[test]
    fn test_parse_collapses_whitespace() {
        let date = ParsedDate::parse("  15   JAN    1800 ");
        assert_eq!(date.date, SimpleDate::new(1800, 1, 15));
        assert_eq!(date.original, "  15   JAN    1800 ");
    }

    #[test]
    fn test_parse_calendar_escape() {
        let date = ParsedDate::parse("@#DJULIAN@ 4 MAR 1699");
        assert_eq!(date.calendar, Calendar::Julian);
        assert_eq!(date.date, SimpleDate::new(1699, 3, 4));

        let french = ParsedDate::parse("@#DFRENCH R@ 1794");
        assert_eq!(french.calendar, Calendar::French);
    }

    #[test]
    fn test_leap_year_validation() {
        assert!(ParsedDate::parse("29 FEB 2000").is_valid());
        assert!(ParsedDate::parse("29 FEB 1996").is_valid());

        let bad = ParsedDate::parse("29 FEB 1900");
        assert!(!bad.is_valid());
        assert_eq!(bad.original, "29 FEB 1900");

        assert!(!ParsedDate::parse("31 APR 1900").is_valid());
    }

    #[test]
    fn test_invalid_values_keep_original() {
        let date = ParsedDate::parse("not-valid");
        assert!(!date.is_valid());
        assert_eq!(date.original, "not-valid");
    }

    #[test]
    fn test_earliest_substitution() {
        assert_eq!(
            ParsedDate::parse("1850").earliest(),
            SimpleDate::new(1850, 1, 1)
        );
        assert_eq!(
            ParsedDate::parse("MAR 1850").earliest(),
            SimpleDate::new(1850, 3, 1)
        );
        assert_eq!(
            ParsedDate::parse("BEF 1850").earliest(),
            SimpleDate::new(1, 1, 1)
        );
        assert_eq!(
            ParsedDate::parse("BET 1800 AND 1850").earliest(),
            SimpleDate::new(1800, 1, 1)
        );
    }

    #[test]
    fn test_latest_substitution() {
        assert_eq!(
            ParsedDate::parse("1850").latest(),
            SimpleDate::new(1850, 12, 31)
        );
        assert_eq!(
            ParsedDate::parse("AFT 1850").latest(),
            SimpleDate::new(9999, 12, 31)
        );
        assert_eq!(
            ParsedDate::parse("BEF 1850").latest(),
            SimpleDate::new(1850, 12, 31)
        );
        assert_eq!(
            ParsedDate::parse("BET 1800 AND 1850").latest(),
            SimpleDate::new(1850, 12, 31)
        );
    }

    #[test]
    fn test_years_mid_range_semantics() {
        let year_only = ParsedDate::parse("1800");
        assert!((year_only.years() - 1800.5).abs() < 1e-9);

        let range = ParsedDate::parse("BET 1800 AND 1850");
        assert!((range.years() - 1825.0).abs() <= 1.0);

        let full = ParsedDate::parse("2 OCT 1822");
        let expected = 1822.0 + 275.0 / 365.0;
        assert!((full.years() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_similarity() {
        let range = ParsedDate::parse("BET 1800 AND 1850");
        let mid = ParsedDate::parse("1825");
        assert!(range.similarity(&mid, 10.0) > 0.9);

        let far = ParsedDate::parse("1700");
        assert!((range.similarity(&far, 10.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_equals_same_kind() {
        let a = ParsedDate::parse("15 JAN 1800");
        let b = ParsedDate::parse("15 January 1800");
        assert!(a.equals(&b));

        let c = ParsedDate::parse("16 JAN 1800");
        assert!(!a.equals(&c));
    }

    #[test]
    fn test_equals_constraint_aware() {
        let exact = ParsedDate::parse("15 JAN 1800");
        let before = ParsedDate::parse("BEF 1900");
        let after = ParsedDate::parse("AFT 1700");

        assert!(exact.equals(&before));
        assert!(before.equals(&exact));
        assert!(exact.equals(&after));
        assert!(after.equals(&exact));

        let too_late = ParsedDate::parse("1950");
        assert!(!too_late.equals(&before));
    }

    #[test]
    fn test_equals_about_exact_is_false() {
        let about = ParsedDate::parse("ABT 1800");
        let exact = ParsedDate::parse("1800");
        assert!(!about.equals(&exact));
        assert!(!exact.equals(&about));
    }

    #[test]
    fn test_equals_ranges_never_equal() {
        let a = ParsedDate::parse("BET 1800 AND 1850");
        let b = ParsedDate::parse("BET 1800 AND 1850");
        assert!(!a.equals(&b));
        assert!(!a.equals(&ParsedDate::parse("1825")));
    }

    #[test]
    fn test_sub_duration() {
        let birth = ParsedDate::parse("1800");
        let death = ParsedDate::parse("1850");
        let age = death.sub(&birth);
        assert!((age.years - 50.0).abs() < f64::EPSILON);
        assert!(age.is_known);
        assert!(!age.is_estimate);

        let approx = ParsedDate::parse("ABT 1800");
        let estimated = death.sub(&approx);
        assert!(estimated.is_estimate);

        // Normalized non-negative in either direction.
        assert!((birth.sub(&death).years - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sub_unknown_when_invalid() {
        let bad = ParsedDate::parse("garbage value");
        let good = ParsedDate::parse("1850");
        assert!(!good.sub(&bad).is_known);
    }
}
