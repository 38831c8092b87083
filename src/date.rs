//! Permissive parsing of human-entered change dates.
//!
//! Candidate formats are tried in a fixed priority order, in three tiers:
//! 1. every date template paired with every time template, date first and
//!    then time first
//! 2. date templates alone (midnight)
//! 3. well-known standard representations ([`StandardFormat`])
//!
//! The first successful interpretation wins. Every result is normalized to UTC;
//! inputs without a zone are read as UTC.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};

use crate::config::FormatsConfig;

/// Well-known calendar/time representations tried after the custom templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum StandardFormat {
    /// `Mon Jan _2 15:04:05 2006`
    #[serde(rename = "ansic")]
    Ansic,
    /// `Mon Jan _2 15:04:05 MST 2006`
    #[serde(rename = "unix_date")]
    UnixDate,
    /// `Mon Jan 02 15:04:05 -0700 2006`
    #[serde(rename = "ruby_date")]
    RubyDate,
    /// `02 Jan 06 15:04 MST`
    #[serde(rename = "rfc822")]
    Rfc822,
    /// `02 Jan 06 15:04 -0700`
    #[serde(rename = "rfc822z")]
    Rfc822Z,
    /// `Monday, 02-Jan-06 15:04:05 MST`
    #[serde(rename = "rfc850")]
    Rfc850,
    /// `Mon, 02 Jan 2006 15:04:05 MST`
    #[serde(rename = "rfc1123")]
    Rfc1123,
    /// `Mon, 02 Jan 2006 15:04:05 -0700`
    #[serde(rename = "rfc1123z")]
    Rfc1123Z,
    /// `2006-01-02T15:04:05Z07:00`
    #[serde(rename = "rfc3339")]
    Rfc3339,
    /// `2006-01-02T15:04:05.999999999Z07:00`
    #[serde(rename = "rfc3339_nano")]
    Rfc3339Nano,
}

/// Zone shape of a standard format's template.
enum Zone {
    /// No zone field; read as UTC.
    None,
    /// Zone abbreviation (`MST`); skipped and read as UTC.
    Named,
    /// Numeric offset (`-0700`); converted to UTC.
    Numeric,
}

impl StandardFormat {
    /// Every standard format, in fallback priority order.
    pub const ALL: [StandardFormat; 10] = [
        StandardFormat::Ansic,
        StandardFormat::UnixDate,
        StandardFormat::RubyDate,
        StandardFormat::Rfc822,
        StandardFormat::Rfc822Z,
        StandardFormat::Rfc850,
        StandardFormat::Rfc1123,
        StandardFormat::Rfc1123Z,
        StandardFormat::Rfc3339,
        StandardFormat::Rfc3339Nano,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StandardFormat::Ansic => "ANSIC",
            StandardFormat::UnixDate => "UnixDate",
            StandardFormat::RubyDate => "RubyDate",
            StandardFormat::Rfc822 => "RFC822",
            StandardFormat::Rfc822Z => "RFC822Z",
            StandardFormat::Rfc850 => "RFC850",
            StandardFormat::Rfc1123 => "RFC1123",
            StandardFormat::Rfc1123Z => "RFC1123Z",
            StandardFormat::Rfc3339 => "RFC3339",
            StandardFormat::Rfc3339Nano => "RFC3339Nano",
        }
    }

    /// chrono template for this format; RFC 3339 variants use chrono's
    /// dedicated parser instead.
    fn template(&self) -> (&'static str, Zone) {
        match self {
            StandardFormat::Ansic => ("%a %b %e %H:%M:%S %Y", Zone::None),
            StandardFormat::UnixDate => ("%a %b %e %H:%M:%S %Z %Y", Zone::Named),
            StandardFormat::RubyDate => ("%a %b %d %H:%M:%S %z %Y", Zone::Numeric),
            StandardFormat::Rfc822 => ("%d %b %y %H:%M %Z", Zone::Named),
            StandardFormat::Rfc822Z => ("%d %b %y %H:%M %z", Zone::Numeric),
            StandardFormat::Rfc850 => ("%A, %d-%b-%y %H:%M:%S %Z", Zone::Named),
            StandardFormat::Rfc1123 => ("%a, %d %b %Y %H:%M:%S %Z", Zone::Named),
            StandardFormat::Rfc1123Z => ("%a, %d %b %Y %H:%M:%S %z", Zone::Numeric),
            StandardFormat::Rfc3339 | StandardFormat::Rfc3339Nano => ("", Zone::Numeric),
        }
    }

    /// Attempt to read `input` in this format.
    pub fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        if matches!(self, StandardFormat::Rfc3339 | StandardFormat::Rfc3339Nano) {
            return DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|t| t.with_timezone(&Utc));
        }

        let (fmt, zone) = self.template();
        let two_digit_year = fmt.contains("%y");
        match zone {
            Zone::Numeric => DateTime::parse_from_str(input, fmt)
                .ok()
                .map(|t| pivot_century(two_digit_year, t).with_timezone(&Utc)),
            Zone::Named if !zone_is_abbreviation(fmt, input) => None,
            Zone::None | Zone::Named => NaiveDateTime::parse_from_str(input, fmt)
                .ok()
                .map(|t| Utc.from_utc_datetime(&pivot_century(two_digit_year, t))),
        }
    }
}

/// chrono skips any token under `%Z`; only letters count as a zone name here,
/// so numeric offsets fall through to the `%z` variants.
fn zone_is_abbreviation(fmt: &str, input: &str) -> bool {
    let Some(index) = fmt.split_whitespace().position(|part| part == "%Z") else {
        return true;
    };
    input
        .split_whitespace()
        .nth(index)
        .is_some_and(|zone| zone.chars().all(|c| c.is_ascii_alphabetic()))
}

impl fmt::Display for StandardFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A chrono template paired with the exact input shape it may accept.
///
/// chrono is lenient where human-entered dates need to be strict: `%Y` reads
/// any run of digits and a space matches zero spaces. The shape pins each
/// field to its width (`%Y` four digits, `%y` two, `%m`/`%d`/... one or two)
/// and each literal to itself before chrono sees the input.
#[derive(Debug, Clone)]
struct Layout {
    template: String,
    shape: Option<Regex>,
    two_digit_year: bool,
}

impl Layout {
    fn new(template: String) -> Self {
        let shape = Regex::new(&shape_pattern(&template)).ok();
        let two_digit_year = template.contains("%y");
        Layout {
            template,
            shape,
            two_digit_year,
        }
    }

    fn admits(&self, input: &str) -> bool {
        self.shape.as_ref().map_or(true, |re| re.is_match(input))
    }

    fn parse_date_time(&self, input: &str) -> Option<NaiveDateTime> {
        if !self.admits(input) {
            return None;
        }
        let t = NaiveDateTime::parse_from_str(input, &self.template).ok()?;
        Some(pivot_century(self.two_digit_year, t))
    }

    fn parse_date(&self, input: &str) -> Option<NaiveDate> {
        if !self.admits(input) {
            return None;
        }
        let d = NaiveDate::parse_from_str(input, &self.template).ok()?;
        Some(pivot_century(self.two_digit_year, d))
    }
}

/// Anchored regex for the inputs a chrono template can match. Specifiers
/// without a fixed shape match anything and are left to chrono.
fn shape_pattern(template: &str) -> String {
    let mut pattern = String::from("^");
    let mut chars = template.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
            continue;
        }
        let class = match chars.next() {
            Some('Y') => "[0-9]{4}",
            Some('C') | Some('y') => "[0-9]{2}",
            Some('m' | 'd' | 'H' | 'I' | 'M' | 'S') => "[0-9]{1,2}",
            Some('e') => " ?[0-9]{1,2}",
            Some('b' | 'h') => "[A-Za-z]{3}",
            Some('B' | 'a' | 'A') => "[A-Za-z]+",
            Some('p' | 'P') => "[AaPp][Mm]",
            Some('%') => "%",
            _ => ".*?",
        };
        pattern.push_str(class);
    }
    pattern.push('$');
    pattern
}

/// chrono reads `%y` 00-69 as 20xx; 69 belongs to 1969, matching the
/// traditional 1969-2068 window.
fn pivot_century<T: Datelike>(two_digit_year: bool, t: T) -> T {
    if two_digit_year && t.year() == 2069 {
        t.with_year(1969).unwrap_or(t)
    } else {
        t
    }
}

/// Ordered-attempt date parser over a set of format lists.
#[derive(Debug, Clone)]
pub struct DateParser {
    /// Every date/time pairing, date first then time first, in priority order.
    date_time: Vec<Layout>,
    date: Vec<Layout>,
    standard: Vec<StandardFormat>,
}

impl DateParser {
    pub fn new(formats: &FormatsConfig) -> Self {
        let mut date_time = Vec::with_capacity(2 * formats.date.len() * formats.time.len());
        for date_fmt in &formats.date {
            for time_fmt in &formats.time {
                date_time.push(Layout::new(format!("{} {}", date_fmt, time_fmt)));
                date_time.push(Layout::new(format!("{} {}", time_fmt, date_fmt)));
            }
        }

        DateParser {
            date_time,
            date: formats.date.iter().cloned().map(Layout::new).collect(),
            standard: formats.standard.clone(),
        }
    }

    /// Interpret `input` as a timestamp, trying every tier in order.
    ///
    /// Returns `None` for empty input or when no format matches; an
    /// unparseable date is not an error.
    pub fn parse(&self, input: &str) -> Option<DateTime<Utc>> {
        if input.is_empty() {
            return None;
        }

        let parsed = self
            .parse_date_time(input)
            .or_else(|| self.parse_date_only(input))
            .or_else(|| self.parse_standard(input));

        if parsed.is_none() {
            debug!(input, "no date format matched");
        }
        parsed
    }

    /// Tier 1: combined date and time, in either order.
    pub fn parse_date_time(&self, input: &str) -> Option<DateTime<Utc>> {
        self.date_time.iter().find_map(|layout| {
            let t = layout.parse_date_time(input)?;
            debug!(input, layout = %layout.template, "parsed date with time");
            Some(Utc.from_utc_datetime(&t))
        })
    }

    /// Tier 2: date templates alone, at midnight.
    pub fn parse_date_only(&self, input: &str) -> Option<DateTime<Utc>> {
        self.date.iter().find_map(|layout| {
            let midnight = layout.parse_date(input)?.and_hms_opt(0, 0, 0)?;
            debug!(input, layout = %layout.template, "parsed date without time");
            Some(Utc.from_utc_datetime(&midnight))
        })
    }

    /// Tier 3: standard representations.
    pub fn parse_standard(&self, input: &str) -> Option<DateTime<Utc>> {
        self.standard.iter().find_map(|standard| {
            trace!(input, standard = %standard, "trying standard format");
            let parsed = standard.parse(input)?;
            debug!(input, standard = %standard, "parsed standard date");
            Some(parsed)
        })
    }
}

/// Parse `input` with the default format lists.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    DateParser::new(&FormatsConfig::default()).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
    }

    #[test]
    fn test_parse_empty_is_none() {
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2020-13-45"), None);
    }

    #[test]
    fn test_parse_month_name_first_date_only() {
        assert_eq!(parse_date("Feb 26, 2020"), Some(utc(2020, 2, 26, 0, 0, 0)));
    }

    #[test]
    fn test_parse_two_digit_year_with_time() {
        // "20" is not a four-digit year, so the yy-Mon-d template claims it
        assert_eq!(
            parse_date("20-Mar-9 17:45:23"),
            Some(utc(2020, 3, 9, 17, 45, 23))
        );
    }

    #[test]
    fn test_short_digit_run_is_not_a_four_digit_year() {
        assert_eq!(parse_date("202-Jul-4"), None);
        assert_eq!(parse_date("20201-Jul-4"), None);
        assert_eq!(parse_date("7/4/202"), None);
    }

    #[test]
    fn test_two_digit_year_window() {
        assert_eq!(parse_date("69-1-2"), Some(utc(1969, 1, 2, 0, 0, 0)));
        assert_eq!(parse_date("68-1-2"), Some(utc(2068, 1, 2, 0, 0, 0)));
        assert_eq!(parse_date("70-1-2"), Some(utc(1970, 1, 2, 0, 0, 0)));
        assert_eq!(
            parse_date("02 Jan 69 15:04 -0000"),
            Some(utc(1969, 1, 2, 15, 4, 0))
        );
    }

    #[test]
    fn test_template_spaces_must_be_present() {
        assert_eq!(parse_date("2021Jul4"), None);
        assert_eq!(parse_date("2021-7-417:45"), None);
    }

    #[test]
    fn test_layout_shape_pins_field_widths() {
        let layout = Layout::new("%Y-%b-%d %I:%M%p".to_string());
        assert!(layout.admits("2021-Jul-4 3:04PM"));
        assert!(layout.admits("2021-jul-04 03:04am"));
        assert!(!layout.admits("21-Jul-4 3:04PM"));
        assert!(!layout.admits("2021-July-4 3:04PM"));
        assert!(!layout.admits("2021-Jul-4 3:04 PM"));

        let dotted = Layout::new("%d.%m.%y".to_string());
        assert!(dotted.admits("24.12.22"));
        assert!(!dotted.admits("24x12x22"));
        assert!(dotted.two_digit_year);
    }

    #[test]
    fn test_non_ascii_digits_are_rejected() {
        assert_eq!(parse_date("\u{0662}\u{0660}\u{0662}\u{0660}-7-4"), None);
    }

    #[test]
    fn test_parse_four_digit_year_forms() {
        let expected = Some(utc(2021, 7, 4, 0, 0, 0));
        assert_eq!(parse_date("2021 Jul 4"), expected);
        assert_eq!(parse_date("2021-Jul-4"), expected);
        assert_eq!(parse_date("2021-7-4"), expected);
        assert_eq!(parse_date("2021 7 4"), expected);
        assert_eq!(parse_date("7-4-2021"), expected);
        assert_eq!(parse_date("7/4/2021"), expected);
        assert_eq!(parse_date("Jul 4, 2021"), expected);
    }

    #[test]
    fn test_parse_time_before_date() {
        assert_eq!(
            parse_date("09:30 2021-7-4"),
            Some(utc(2021, 7, 4, 9, 30, 0))
        );
    }

    #[test]
    fn test_parse_twelve_hour_clock() {
        assert_eq!(
            parse_date("2021-7-4 3:04:05PM"),
            Some(utc(2021, 7, 4, 15, 4, 5))
        );
        assert_eq!(
            parse_date("2021-7-4 03:04pm"),
            Some(utc(2021, 7, 4, 15, 4, 0))
        );
        assert_eq!(
            parse_date("2021-7-4 12:10 AM"),
            Some(utc(2021, 7, 4, 0, 10, 0))
        );
    }

    #[test]
    fn test_parse_two_digit_year_slashes() {
        assert_eq!(parse_date("12/25/19"), Some(utc(2019, 12, 25, 0, 0, 0)));
    }

    #[test]
    fn test_ambiguous_numeric_date_prefers_year_first() {
        // "01-02-03" fits yy-m-d before m-d-yy
        let t = parse_date("01-02-03").unwrap();
        assert_eq!((t.year(), t.month(), t.day()), (2001, 2, 3));
    }

    #[test]
    fn test_parse_standard_rfc1123() {
        assert_eq!(
            parse_date("Mon, 09 Mar 2020 17:45:23 UTC"),
            Some(utc(2020, 3, 9, 17, 45, 23))
        );
    }

    #[test]
    fn test_parse_standard_numeric_zone_converts_to_utc() {
        let t = parse_date("Mon, 09 Mar 2020 17:45:23 -0700").unwrap();
        assert_eq!(t, utc(2020, 3, 10, 0, 45, 23));
    }

    #[test]
    fn test_parse_standard_rfc3339() {
        assert_eq!(
            parse_date("2020-03-09T17:45:23Z"),
            Some(utc(2020, 3, 9, 17, 45, 23))
        );
        let nano = parse_date("2020-03-09T17:45:23.123456789+01:00").unwrap();
        assert_eq!(nano.hour(), 16);
        assert_eq!(nano.nanosecond(), 123_456_789);
    }

    #[test]
    fn test_parse_standard_ansic_and_unix() {
        let expected = Some(utc(2006, 1, 2, 15, 4, 5));
        assert_eq!(parse_date("Mon Jan 2 15:04:05 2006"), expected);
        assert_eq!(parse_date("Mon Jan 2 15:04:05 MST 2006"), expected);
        assert_eq!(parse_date("Mon Jan 02 15:04:05 +0000 2006"), expected);
    }

    #[test]
    fn test_parse_standard_rfc850() {
        assert_eq!(
            parse_date("Monday, 02-Jan-06 15:04:05 MST"),
            Some(utc(2006, 1, 2, 15, 4, 5))
        );
    }

    #[test]
    fn test_tiers_are_individually_reachable() {
        let formats = FormatsConfig::default();
        let parser = DateParser::new(&formats);

        assert!(parser.parse_date_time("Feb 26, 2020").is_none());
        assert!(parser.parse_date_only("Feb 26, 2020").is_some());
        assert!(parser.parse_standard("Feb 26, 2020").is_none());
        assert!(parser.parse_standard("02 Jan 06 15:04 -0700").is_some());
    }

    #[test]
    fn test_custom_format_lists() {
        let formats = FormatsConfig {
            date: vec!["%d.%m.%Y".to_string()],
            time: vec!["%H.%M".to_string()],
            standard: vec![],
        };
        let parser = DateParser::new(&formats);

        assert_eq!(
            parser.parse("24.12.2022 18.30"),
            Some(utc(2022, 12, 24, 18, 30, 0))
        );
        assert_eq!(parser.parse("Feb 26, 2020"), None);
        assert_eq!(parser.parse("2020-03-09T17:45:23Z"), None);
    }

    #[test]
    fn test_named_zone_rejects_numeric_offset() {
        assert!(StandardFormat::Rfc1123
            .parse("Mon, 09 Mar 2020 17:45:23 -0700")
            .is_none());
        assert!(StandardFormat::Rfc1123Z
            .parse("Mon, 09 Mar 2020 17:45:23 -0700")
            .is_some());
    }

    #[test]
    fn test_standard_format_names() {
        let names: Vec<&str> = StandardFormat::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.first(), Some(&"ANSIC"));
        assert_eq!(names.last(), Some(&"RFC3339Nano"));
        assert_eq!(StandardFormat::Rfc1123.to_string(), "RFC1123");
    }
}
