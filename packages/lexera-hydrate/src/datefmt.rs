/// Moment-style date/time patterns (`YYYY-MM-DD`, `h:mm A`) translated to chrono.
///
/// Parsing is lenient the way the board's settings expect: surrounding
/// whitespace and trailing text after the matched pattern are ignored, and
/// fields the pattern leaves out are filled in the way moment does.
use std::sync::LazyLock;

use chrono::format::{self, ParseResult, Parsed, StrftimeItems};
use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use regex::Regex;

static ORDINAL_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d)(?:st|nd|rd|th)\b").unwrap());

/// Tokens ordered longest first so `YYYY` wins over `YY`.
const TOKENS: &[(&str, &str)] = &[
    ("YYYY", "%Y"),
    ("YY", "%y"),
    ("MMMM", "%B"),
    ("MMM", "%b"),
    ("MM", "%m"),
    ("M", "%m"),
    ("DDDD", "%j"),
    ("DDD", "%j"),
    ("DD", "%d"),
    ("Do", "%d"),
    ("D", "%d"),
    ("dddd", "%A"),
    ("ddd", "%a"),
    ("HH", "%H"),
    ("H", "%H"),
    ("hh", "%I"),
    ("h", "%I"),
    ("mm", "%M"),
    ("m", "%M"),
    ("ss", "%S"),
    ("s", "%S"),
    ("A", "%p"),
    ("a", "%p"),
];

/// Translate a moment pattern into a chrono format string.
/// `[...]` sections are copied literally.
pub fn moment_to_chrono(pattern: &str) -> String {
    translate(pattern).0
}

/// The chrono format plus whether the pattern uses an ordinal day (`Do`).
fn translate(pattern: &str) -> (String, bool) {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut ordinal_day = false;
    let mut rest = pattern;

    'outer: while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('[') {
            match stripped.find(']') {
                Some(end) => {
                    push_literal(&mut out, &stripped[..end]);
                    rest = &stripped[end + 1..];
                }
                None => {
                    push_literal(&mut out, stripped);
                    rest = "";
                }
            }
            continue;
        }

        for (token, replacement) in TOKENS {
            if let Some(after) = rest.strip_prefix(token) {
                ordinal_day |= *token == "Do";
                out.push_str(replacement);
                rest = after;
                continue 'outer;
            }
        }

        let ch = rest.chars().next().unwrap_or_default();
        push_literal(&mut out, &rest[..ch.len_utf8()]);
        rest = &rest[ch.len_utf8()..];
    }

    (out, ordinal_day)
}

fn push_literal(out: &mut String, literal: &str) {
    for ch in literal.chars() {
        if ch == '%' {
            out.push_str("%%");
        } else {
            out.push(ch);
        }
    }
}

/// Run the pattern over `input`, leaving whatever was matched in a `Parsed`.
fn parse_fields(input: &str, pattern: &str) -> ParseResult<Parsed> {
    let (fmt, ordinal_day) = translate(pattern);
    let input = input.trim();
    let input = if ordinal_day {
        ORDINAL_SUFFIX_RE.replace_all(input, "$1")
    } else {
        input.into()
    };

    let mut parsed = Parsed::new();
    format::parse_and_remainder(&mut parsed, &input, StrftimeItems::new(&fmt))?;
    Ok(parsed)
}

/// Missing leading fields come from `today` (no year means this year, no
/// month either means this month); fields after the first given one
/// default to the start of the period.
fn fill_date_defaults(parsed: &mut Parsed, today: NaiveDate) -> ParseResult<()> {
    let has_year = parsed.year().is_some()
        || parsed.year_div_100().is_some()
        || parsed.year_mod_100().is_some();
    if !has_year {
        parsed.set_year(today.year().into())?;
    }
    if parsed.ordinal().is_some() {
        return Ok(());
    }

    let month_missing = parsed.month().is_none();
    if month_missing {
        parsed.set_month(if has_year { 1 } else { today.month().into() })?;
    }
    if parsed.day().is_none() {
        let leading = !has_year && month_missing;
        parsed.set_day(if leading { today.day().into() } else { 1 })?;
    }
    Ok(())
}

fn fill_time_defaults(parsed: &mut Parsed) -> ParseResult<()> {
    // A 12-hour clock without a meridiem keeps the hour as written.
    if parsed.hour_div_12().is_none() {
        if let Some(hour) = parsed.hour_mod_12() {
            parsed.set_ampm(hour == 0)?;
        }
    }
    if parsed.minute().is_none() {
        parsed.set_minute(0)?;
    }
    if parsed.second().is_none() {
        parsed.set_second(0)?;
    }
    Ok(())
}

/// Parse `input` as a date using a moment pattern.
pub fn parse_date(input: &str, pattern: &str) -> Option<NaiveDate> {
    parse_date_on(input, pattern, Local::now().date_naive())
}

/// Like [`parse_date`], with `today` supplying the fields the pattern omits.
pub fn parse_date_on(input: &str, pattern: &str, today: NaiveDate) -> Option<NaiveDate> {
    let mut parsed = parse_fields(input, pattern).ok()?;
    fill_date_defaults(&mut parsed, today).ok()?;
    parsed.to_naive_date().ok()
}

/// Parse `input` as a time of day using a moment pattern.
pub fn parse_time(input: &str, pattern: &str) -> Option<NaiveTime> {
    let mut parsed = parse_fields(input, pattern).ok()?;
    fill_time_defaults(&mut parsed).ok()?;
    parsed.to_naive_time().ok()
}
