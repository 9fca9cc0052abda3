//! ISO 8601 dates and times.
//!
//! Each of these is a [`StringField`](../struct.StringField.html) with a
//! maximum length suited to its format, which is checked before any parsing.

use super::string::{StringField, STRING_MESSAGES};
use crate::errors::{ErrorNode, SchemaError};
use crate::field::{Configure, Field, FieldOptions, FIELD_MESSAGES, TYPED_MESSAGES};
use crate::messages::{ErrorKind, MessageChain, MessageTable};
use crate::value::Cleaned;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub const DATETIME_MESSAGES: MessageTable = &[
    (ErrorKind::INVALID_FORMAT, "Not a valid date time"),
    (ErrorKind::NO_TIMEZONE, "A timezone must be specified"),
];

pub const DATE_MESSAGES: MessageTable = &[(ErrorKind::INVALID_FORMAT, "Not a valid date")];

pub const TIME_MESSAGES: MessageTable = &[
    (ErrorKind::INVALID_FORMAT, "Not a valid time"),
    (ErrorKind::NO_TIMEZONE, "A timezone must be specified"),
];

pub const YEAR_MONTH_MESSAGES: MessageTable = &[(ErrorKind::INVALID_FORMAT, "Not a valid date")];

const DATETIME_CHAIN: MessageChain = &[DATETIME_MESSAGES, STRING_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];
const DATE_CHAIN: MessageChain = &[DATE_MESSAGES, STRING_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];
const TIME_CHAIN: MessageChain = &[TIME_MESSAGES, STRING_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];
const YEAR_MONTH_CHAIN: MessageChain = &[YEAR_MONTH_MESSAGES, STRING_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];

// YYYY-MM-DDTHH:MM:SS.ssssss+00:00
const DATETIME_MAX_LENGTH: usize = 32;
// YYYY-MM-DD
const DATE_MAX_LENGTH: usize = 10;
// HH:MM:SS.ssssss+00:00
pub(crate) const TIME_MAX_LENGTH: usize = 21;
// YYYY-MM
const YEAR_MONTH_MAX_LENGTH: usize = 7;

fn date_re() -> &'static Regex {
    static DATE_RE: OnceLock<Regex> = OnceLock::new();
    DATE_RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})$").expect("date pattern is valid"))
}

fn year_month_re() -> &'static Regex {
    static YEAR_MONTH_RE: OnceLock<Regex> = OnceLock::new();
    YEAR_MONTH_RE.get_or_init(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("year-month pattern is valid"))
}

fn time_re() -> &'static Regex {
    static TIME_RE: OnceLock<Regex> = OnceLock::new();
    TIME_RE.get_or_init(|| {
        Regex::new(r"^(\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?(?:(Z)|([+-])(\d{2}):?(\d{2}))?$")
            .expect("time pattern is valid")
    })
}

/// Accepts RFC 3339 date times, e.g. `2015-03-02T10:00:00+10:00`.
///
/// A timezone is required unless
/// [`timezone_required(false)`](#method.timezone_required) is set, in which
/// case naive date times clean to `Cleaned::NaiveDateTime`.
#[derive(Clone, Debug)]
pub struct DateTimeField {
    string: StringField,
    timezone_required: bool,
}

impl DateTimeField {
    pub fn new() -> Self {
        Self {
            string: StringField::new().max_length(DATETIME_MAX_LENGTH),
            timezone_required: true,
        }
    }

    pub fn timezone_required(mut self, timezone_required: bool) -> Self {
        self.timezone_required = timezone_required;
        self
    }
}

impl Default for DateTimeField {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for DateTimeField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        self.string.options_mut()
    }
}

impl Field for DateTimeField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let value = self.string.clean_str(self, raw)?;

        if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
            return Ok(Cleaned::DateTime(datetime));
        }

        match NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
            Ok(_) if self.timezone_required => Err(self.error(ErrorKind::NO_TIMEZONE, &[])),
            Ok(datetime) => Ok(Cleaned::NaiveDateTime(datetime)),
            Err(_) => Err(self.error(ErrorKind::INVALID_FORMAT, &[])),
        }
    }

    fn options(&self) -> &FieldOptions {
        self.string.options()
    }

    fn messages(&self) -> MessageChain {
        DATETIME_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        self.string.check_bounds(name)
    }
}

/// Accepts `YYYY-MM-DD` dates with a four digit year.
#[derive(Clone, Debug)]
pub struct DateField {
    string: StringField,
}

impl DateField {
    pub fn new() -> Self {
        Self {
            string: StringField::new().max_length(DATE_MAX_LENGTH),
        }
    }
}

impl Default for DateField {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for DateField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        self.string.options_mut()
    }
}

impl Field for DateField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let value = self.string.clean_str(self, raw)?;

        date_re()
            .captures(value)
            .and_then(|caps| {
                let year = caps[1].parse().ok()?;
                let month = caps[2].parse().ok()?;
                let day = caps[3].parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, day)
            })
            .map(Cleaned::Date)
            .ok_or_else(|| self.error(ErrorKind::INVALID_FORMAT, &[]))
    }

    fn options(&self) -> &FieldOptions {
        self.string.options()
    }

    fn messages(&self) -> MessageChain {
        DATE_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        self.string.check_bounds(name)
    }
}

/// Accepts `HH:MM`, `HH:MM:SS` or `HH:MM:SS.ffffff` times, followed by `Z`
/// or an offset such as `+10:00`.
///
/// As with [`DateTimeField`](struct.DateTimeField.html), the offset may only
/// be left out when the timezone isn't required.
#[derive(Clone, Debug)]
pub struct TimeField {
    string: StringField,
    timezone_required: bool,
}

impl TimeField {
    pub fn new() -> Self {
        Self {
            string: StringField::new().max_length(TIME_MAX_LENGTH),
            timezone_required: true,
        }
    }

    pub fn timezone_required(mut self, timezone_required: bool) -> Self {
        self.timezone_required = timezone_required;
        self
    }

    fn parse(value: &str) -> Option<(NaiveTime, Option<FixedOffset>)> {
        let caps = time_re().captures(value)?;

        let hour = caps[1].parse().ok()?;
        let minute = caps[2].parse().ok()?;
        let second = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
        let nano = match caps.get(4) {
            Some(m) => format!("{:0<9}", m.as_str()).parse().ok()?,
            None => 0,
        };
        let time = NaiveTime::from_hms_nano_opt(hour, minute, second, nano)?;

        let offset = if caps.get(5).is_some() {
            Some(FixedOffset::east_opt(0)?)
        } else if let Some(sign) = caps.get(6) {
            let hours: i32 = caps[7].parse().ok()?;
            let minutes: i32 = caps[8].parse().ok()?;
            let seconds = hours * 3600 + minutes * 60;
            let seconds = if sign.as_str() == "-" { -seconds } else { seconds };
            Some(FixedOffset::east_opt(seconds)?)
        } else {
            None
        };

        Some((time, offset))
    }
}

impl Default for TimeField {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for TimeField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        self.string.options_mut()
    }
}

impl Field for TimeField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let value = self.string.clean_str(self, raw)?;

        match Self::parse(value) {
            Some((_, None)) if self.timezone_required => Err(self.error(ErrorKind::NO_TIMEZONE, &[])),
            Some((time, offset)) => Ok(Cleaned::Time(time, offset)),
            None => Err(self.error(ErrorKind::INVALID_FORMAT, &[])),
        }
    }

    fn options(&self) -> &FieldOptions {
        self.string.options()
    }

    fn messages(&self) -> MessageChain {
        TIME_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        self.string.check_bounds(name)
    }
}

/// Accepts `YYYY-MM` strings, cleaned to a `(year, month)` pair.
#[derive(Clone, Debug)]
pub struct YearMonthField {
    string: StringField,
}

impl YearMonthField {
    pub fn new() -> Self {
        Self {
            string: StringField::new().max_length(YEAR_MONTH_MAX_LENGTH),
        }
    }
}

impl Default for YearMonthField {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for YearMonthField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        self.string.options_mut()
    }
}

impl Field for YearMonthField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let value = self.string.clean_str(self, raw)?;

        year_month_re()
            .captures(value)
            .and_then(|caps| {
                let year: i32 = caps[1].parse().ok()?;
                let month: u32 = caps[2].parse().ok()?;
                NaiveDate::from_ymd_opt(year, month, 1).map(|_| Cleaned::YearMonth(year, month))
            })
            .ok_or_else(|| self.error(ErrorKind::INVALID_FORMAT, &[]))
    }

    fn options(&self) -> &FieldOptions {
        self.string.options()
    }

    fn messages(&self) -> MessageChain {
        YEAR_MONTH_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        self.string.check_bounds(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_util::{err, ok};
    use serde_json::json;

    #[test]
    fn datetimes() {
        let field = DateTimeField::new();
        assert_eq!(
            ok(&field, json!("2015-03-02T10:00:00+10:00")),
            Cleaned::DateTime(DateTime::parse_from_rfc3339("2015-03-02T10:00:00+10:00").unwrap())
        );
        assert_eq!(err(&field, json!("2015-03-02T10:00:00")), "A timezone must be specified");
        assert_eq!(err(&field, json!("last tuesday")), "Not a valid date time");
        assert_eq!(err(&field, json!(20150302)), "Expected a value of type 'string'");
    }

    #[test]
    fn naive_datetimes() {
        let field = DateTimeField::new().timezone_required(false);
        assert_eq!(
            ok(&field, json!("2015-03-02T10:00:00.5")),
            Cleaned::NaiveDateTime(
                NaiveDate::from_ymd_opt(2015, 3, 2)
                    .unwrap()
                    .and_hms_milli_opt(10, 0, 0, 500)
                    .unwrap()
            )
        );
    }

    #[test]
    fn dates() {
        let field = DateField::new();
        assert_eq!(
            ok(&field, json!("1989-10-16")),
            Cleaned::Date(NaiveDate::from_ymd_opt(1989, 10, 16).unwrap())
        );
        assert_eq!(
            ok(&field, json!("2345-06-7")),
            Cleaned::Date(NaiveDate::from_ymd_opt(2345, 6, 7).unwrap())
        );

        // Not a leap year.
        assert_eq!(err(&field, json!("2015-2-29")), "Not a valid date");
        assert_eq!(err(&field, json!("999-01-01")), "Not a valid date");
        assert_eq!(err(&field, json!("Not a date")), "Not a valid date");
        assert_eq!(err(&field, json!("10000-01-01")), "Maximum length 10");
    }

    #[test]
    fn times() {
        let field = TimeField::new();
        assert_eq!(
            ok(&field, json!("09:30:15.25+10:00")),
            Cleaned::Time(
                NaiveTime::from_hms_milli_opt(9, 30, 15, 250).unwrap(),
                FixedOffset::east_opt(10 * 3600)
            )
        );
        assert_eq!(
            ok(&field, json!("23:59Z")),
            Cleaned::Time(NaiveTime::from_hms_opt(23, 59, 0).unwrap(), FixedOffset::east_opt(0))
        );
        assert_eq!(
            ok(&field, json!("07:00:00-0330")),
            Cleaned::Time(
                NaiveTime::from_hms_opt(7, 0, 0).unwrap(),
                FixedOffset::west_opt(3 * 3600 + 30 * 60)
            )
        );
        assert_eq!(err(&field, json!("09:30")), "A timezone must be specified");
        assert_eq!(err(&field, json!("25:00Z")), "Not a valid time");
        assert_eq!(err(&field, json!("noon")), "Not a valid time");

        let naive = TimeField::new().timezone_required(false);
        assert_eq!(
            ok(&naive, json!("09:30")),
            Cleaned::Time(NaiveTime::from_hms_opt(9, 30, 0).unwrap(), None)
        );
    }

    #[test]
    fn year_months() {
        let field = YearMonthField::new();
        assert_eq!(ok(&field, json!("1989-10")), Cleaned::YearMonth(1989, 10));
        assert_eq!(ok(&field, json!("2345-06")), Cleaned::YearMonth(2345, 6));
        assert_eq!(err(&field, json!("2345-13")), "Not a valid date");
        assert_eq!(err(&field, json!("999-01")), "Not a valid date");
        assert_eq!(err(&field, json!("nope-no")), "Not a valid date");
        assert_eq!(err(&field, json!("10000-01")), "Maximum length 7");
    }

    #[test]
    fn cleaned_values_clean_again() {
        let datetime = DateTimeField::new();
        let first = ok(&datetime, json!("2015-03-02T10:00:00.123+10:00"));
        assert_eq!(ok(&datetime, first.to_json()), first);

        let time = TimeField::new();
        let first = ok(&time, json!("09:30:15.25+10:00"));
        assert_eq!(ok(&time, first.to_json()), first);
    }

    #[test]
    fn long_fractions_clean_again() {
        let datetime = DateTimeField::new();
        for raw in &[
            "2015-03-02T10:00:00.123456789Z",
            "2015-03-02T10:00:00.1234567Z",
            "2015-03-02T10:00:00.123456+00:00",
            "2015-03-02T10:00:00.123450-05:30",
        ] {
            let first = ok(&datetime, json!(raw));
            assert_eq!(ok(&datetime, first.to_json()), first);
        }

        let naive = DateTimeField::new().timezone_required(false);
        let first = ok(&naive, json!("2015-03-02T10:00:00.1234567"));
        assert_eq!(ok(&naive, first.to_json()), first);

        let time = TimeField::new();
        for raw in &["09:30:15.1234567Z", "09:30:15.123456789Z", "09:30:15.1234567+1000"] {
            let first = ok(&time, json!(raw));
            assert_eq!(ok(&time, first.to_json()), first);
        }
    }
}
