//! Query parameter validation driven by rule tags.
//!
//! Handlers declare which parameters they read and how each should be coerced:
//!
//! ```ignore
//! let params = QueryParamValidator::new(&query)
//!     .rule("start_date", "date")
//!     .rule("end_date", "date")
//!     .validate()?;
//! let start = params.date("start_date");
//! ```
//!
//! Every declared field is checked before failing, so a request with two bad
//! fields gets both messages back in a single [`ValidationError`].

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use log::warn;

/// Naive datetime layouts, tried in order.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-qualified layouts, tried in order.
const OFFSET_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// A coercion rule attached to a query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// ISO-8601 date or datetime
    Date,
    /// Decimal number
    Float,
}

impl FromStr for Rule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "date" => Ok(Self::Date),
            "float" => Ok(Self::Float),
            other => Err(format!("Unknown validation rule: {}", other)),
        }
    }
}

/// A successfully coerced parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Date(NaiveDateTime),
    Float(f64),
}

/// Validation failure returned to the client as a 400.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// One or more fields could not be coerced.
    #[error("Validation fields error: {}", .0.join(" "))]
    Fields(Vec<String>),
    /// Fields parsed but are inconsistent with each other.
    #[error("{0}")]
    InvalidRange(String),
}

impl ValidationError {
    /// Per-field messages, or the single range message.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Fields(errors) => errors.clone(),
            Self::InvalidRange(msg) => vec![msg.clone()],
        }
    }
}

/// Coerced parameters keyed by name. Absent or empty parameters map to `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidatedParams {
    values: HashMap<String, Option<ParamValue>>,
}

impl ValidatedParams {
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name).and_then(Option::as_ref)
    }

    /// Whether `name` was declared to the validator.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn date(&self, name: &str) -> Option<NaiveDateTime> {
        match self.get(name) {
            Some(ParamValue::Date(dt)) => Some(*dt),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(ParamValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Validator over a decoded query string.
pub struct QueryParamValidator<'a> {
    query: &'a HashMap<String, String>,
    rules: Vec<(&'a str, &'a str)>,
}

impl<'a> QueryParamValidator<'a> {
    pub fn new(query: &'a HashMap<String, String>) -> Self {
        Self {
            query,
            rules: Vec::new(),
        }
    }

    /// Build a validator from a static rule table.
    pub fn with_rules(query: &'a HashMap<String, String>, rules: &[(&'a str, &'a str)]) -> Self {
        Self {
            query,
            rules: rules.to_vec(),
        }
    }

    /// Declare `name` with comma-separated rule tags (e.g. `"date"`).
    pub fn rule(mut self, name: &'a str, tags: &'a str) -> Self {
        self.rules.push((name, tags));
        self
    }

    /// Coerce every declared parameter, collecting all failures.
    pub fn validate(&self) -> Result<ValidatedParams, ValidationError> {
        validate_query(self.query, &self.rules)
    }
}

/// Coerce `rules` against `query`.
///
/// Unknown rule tags are skipped with a warning. When a field carries several
/// tags, the last successful coercion wins and each failing tag adds a message.
pub fn validate_query(
    query: &HashMap<String, String>,
    rules: &[(&str, &str)],
) -> Result<ValidatedParams, ValidationError> {
    let mut validated = ValidatedParams::default();
    let mut invalid = Vec::new();

    for (name, tags) in rules {
        let raw = query.get(*name).map(String::as_str).filter(|s| !s.is_empty());

        for tag in tags.split(',') {
            let rule = match tag.parse::<Rule>() {
                Ok(rule) => rule,
                Err(e) => {
                    warn!("{} (field '{}')", e, name);
                    continue;
                }
            };

            let Some(raw) = raw else {
                validated.values.insert(name.to_string(), None);
                continue;
            };

            match coerce(rule, raw) {
                Some(value) => {
                    validated.values.insert(name.to_string(), Some(value));
                }
                None => invalid.push(error_message(rule, name)),
            }
        }
    }

    if invalid.is_empty() {
        Ok(validated)
    } else {
        Err(ValidationError::Fields(invalid))
    }
}

fn coerce(rule: Rule, raw: &str) -> Option<ParamValue> {
    match rule {
        Rule::Date => parse_iso_datetime(raw).map(ParamValue::Date),
        Rule::Float => parse_decimal(raw).map(ParamValue::Float),
    }
}

fn error_message(rule: Rule, name: &str) -> String {
    match rule {
        Rule::Date => format!(
            "Invalid date format for {}. Please use (YYYY-MM-DD) format.",
            name
        ),
        Rule::Float => format!(
            "Invalid number format for {}. Please provide a decimal number.",
            name
        ),
    }
}

/// Parse an ISO-8601 date or datetime.
///
/// A bare date is midnight. Offset-qualified values (`Z`, `+02:00`) are
/// normalised to UTC and returned naive.
pub fn parse_iso_datetime(raw: &str) -> Option<NaiveDateTime> {
    if !has_iso_shape(raw) {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }

    let with_offset = match raw.strip_suffix('Z') {
        Some(stripped) => format!("{}+00:00", stripped),
        None => raw.to_string(),
    };
    for fmt in OFFSET_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
            return Some(dt.naive_utc());
        }
    }

    None
}

/// Fixed-width layout check run before chrono, which also accepts unpadded
/// fields, a signed year and surrounding whitespace.
///
/// Accepted: `YYYY-MM-DD`, optionally followed by `[T ]HH:MM[:SS[.f]]` with one
/// to six fraction digits, then an optional `Z` or `+HH:MM` offset.
fn has_iso_shape(raw: &str) -> bool {
    let b = raw.as_bytes();
    let digits = |range: std::ops::Range<usize>| {
        b.get(range)
            .is_some_and(|part| part.iter().all(u8::is_ascii_digit))
    };
    let at = |i: usize, c: u8| b.get(i) == Some(&c);

    if !(digits(0..4) && at(4, b'-') && digits(5..7) && at(7, b'-') && digits(8..10)) {
        return false;
    }
    if b.len() == 10 {
        return true;
    }
    if !(matches!(b[10], b'T' | b' ') && digits(11..13) && at(13, b':') && digits(14..16)) {
        return false;
    }

    let mut pos = 16;
    if at(pos, b':') {
        if !digits(pos + 1..pos + 3) {
            return false;
        }
        pos += 3;
        if at(pos, b'.') {
            let fraction = b[pos + 1..]
                .iter()
                .take_while(|c| c.is_ascii_digit())
                .count();
            if !(1..=6).contains(&fraction) {
                return false;
            }
            pos += 1 + fraction;
        }
    }

    match &b[pos..] {
        [] | [b'Z'] => true,
        [b'+' | b'-', h1, h2, b':', m1, m2] => {
            [h1, h2, m1, m2].iter().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Parse a finite decimal number, ignoring surrounding whitespace.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_parse_bare_date_is_midnight() {
        assert_eq!(
            parse_iso_datetime("2002-03-01"),
            Some(ymd_hms(2002, 3, 1, 0, 0, 0))
        );
    }

    #[test]
    fn test_parse_datetime_with_t_and_space_separators() {
        let expected = ymd_hms(2011, 5, 3, 14, 22, 7);
        assert_eq!(parse_iso_datetime("2011-05-03T14:22:07"), Some(expected));
        assert_eq!(parse_iso_datetime("2011-05-03 14:22:07"), Some(expected));
    }

    #[test]
    fn test_parse_datetime_with_fraction() {
        let dt = parse_iso_datetime("2011-05-03T14:22:07.250000").unwrap();
        assert_eq!(dt.nanosecond(), 250_000_000);
        assert_eq!(dt.second(), 7);
    }

    #[test]
    fn test_parse_datetime_without_seconds() {
        assert_eq!(
            parse_iso_datetime("2011-05-03T14:22"),
            Some(ymd_hms(2011, 5, 3, 14, 22, 0))
        );
    }

    #[test]
    fn test_parse_datetime_with_offset_normalises_to_utc() {
        assert_eq!(
            parse_iso_datetime("2011-05-03T14:22:07+02:00"),
            Some(ymd_hms(2011, 5, 3, 12, 22, 7))
        );
        assert_eq!(
            parse_iso_datetime("2011-05-03T14:22:07Z"),
            Some(ymd_hms(2011, 5, 3, 14, 22, 7))
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_iso_datetime("2002-03-0d"), None);
        assert_eq!(parse_iso_datetime("wrong"), None);
        assert_eq!(parse_iso_datetime("2002-13-01"), None);
        assert_eq!(parse_iso_datetime(""), None);
    }

    #[test]
    fn test_parse_rejects_loose_layouts() {
        for raw in [
            "2002-3-1",
            "2002-03-1",
            " 2002-03-01",
            "2002-03-01 ",
            "+2002-03-01",
            "2011-05-03T14:22:07.1234567",
            "2011-05-03T14:22:07.",
            "2011-05-03T4:22",
            "2011-05-03T14:22:07+2:00",
            "2011-05-03X14:22",
        ] {
            assert_eq!(parse_iso_datetime(raw), None, "{:?} should be rejected", raw);
        }
    }

    #[test]
    fn test_parse_accepts_short_fraction_and_offset_without_seconds() {
        let dt = parse_iso_datetime("2011-05-03T14:22:07.5").unwrap();
        assert_eq!(dt.nanosecond(), 500_000_000);
        assert_eq!(
            parse_iso_datetime("2011-05-03T14:22+02:00"),
            Some(ymd_hms(2011, 5, 3, 12, 22, 0))
        );
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("12.5"), Some(12.5));
        assert_eq!(parse_decimal("-3"), Some(-3.0));
        assert_eq!(parse_decimal(" 7 "), Some(7.0));
        assert_eq!(parse_decimal("1e3"), Some(1000.0));
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("nan"), None);
        assert_eq!(parse_decimal("inf"), None);
    }

    #[test]
    fn test_absent_and_empty_params_are_none() {
        let q = query(&[("end_date", "")]);
        let params = QueryParamValidator::new(&q)
            .rule("start_date", "date")
            .rule("end_date", "date")
            .validate()
            .unwrap();

        assert!(params.contains("start_date"));
        assert!(params.contains("end_date"));
        assert_eq!(params.date("start_date"), None);
        assert_eq!(params.date("end_date"), None);
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_valid_params_are_coerced() {
        let q = query(&[("start_date", "2020-01-01"), ("min_depth", "4.5")]);
        let params = QueryParamValidator::new(&q)
            .rule("start_date", "date")
            .rule("min_depth", "float")
            .validate()
            .unwrap();

        assert_eq!(params.date("start_date"), Some(ymd_hms(2020, 1, 1, 0, 0, 0)));
        assert_eq!(params.float("min_depth"), Some(4.5));
        // Wrong accessor for the coerced type yields nothing
        assert_eq!(params.float("start_date"), None);
    }

    #[test]
    fn test_all_invalid_fields_are_reported_together() {
        let q = query(&[("start_date", "2002-03-0d"), ("end_date", "wrong")]);
        let err = QueryParamValidator::new(&q)
            .rule("start_date", "date")
            .rule("end_date", "date")
            .validate()
            .unwrap_err();

        assert_eq!(err.messages().len(), 2);
        let text = err.to_string();
        assert!(text.starts_with("Validation fields error: "));
        assert!(text.contains("Invalid date format for start_date."));
        assert!(text.contains("Invalid date format for end_date."));
    }

    #[test]
    fn test_invalid_float_message() {
        let q = query(&[("min_depth", "deep")]);
        let err = validate_query(&q, &[("min_depth", "float")]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Fields(vec![
                "Invalid number format for min_depth. Please provide a decimal number."
                    .to_string()
            ])
        );
    }

    #[test]
    fn test_unknown_rule_is_ignored() {
        let q = query(&[("limit", "ten")]);
        let params = validate_query(&q, &[("limit", "integer")]).unwrap();
        assert!(!params.contains("limit"));
    }

    #[test]
    fn test_rule_tags_are_trimmed() {
        assert_eq!(" date".parse::<Rule>(), Ok(Rule::Date));
        assert_eq!("float ".parse::<Rule>(), Ok(Rule::Float));
        assert!("datetime".parse::<Rule>().is_err());
    }

    #[test]
    fn test_undeclared_params_are_not_validated() {
        let q = query(&[("start_date", "2020-01-01"), ("other", "garbage")]);
        let params = validate_query(&q, &[("start_date", "date")]).unwrap();
        assert!(!params.contains("other"));
    }

    #[test]
    fn test_with_rules_table() {
        const RULES: &[(&str, &str)] = &[("min_depth", "float"), ("max_depth", "float")];
        let q = query(&[("max_depth", "100")]);
        let params = QueryParamValidator::with_rules(&q, RULES).validate().unwrap();
        assert_eq!(params.float("min_depth"), None);
        assert_eq!(params.float("max_depth"), Some(100.0));
    }
}
