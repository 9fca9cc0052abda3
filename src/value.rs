//! Typed values produced by cleaning.

use crate::fields::TIME_MAX_LENGTH;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::ser::{Serialize, Serializer};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// The cleaned output of a schema: declared field names to cleaned values.
pub type Record = BTreeMap<String, Cleaned>;

/// A value which has passed validation and been converted to its field's
/// native representation.
#[derive(Clone, Debug, PartialEq)]
pub enum Cleaned {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    NaiveDateTime(NaiveDateTime),
    Time(NaiveTime, Option<FixedOffset>),
    YearMonth(i32, u32),
    List(Vec<Cleaned>),
    Record(Record),

    /// A value passed through untouched, or configured as the output of a
    /// choice.
    Json(Value),
}

impl Cleaned {
    pub fn is_null(&self) -> bool {
        match self {
            Cleaned::Null | Cleaned::Json(Value::Null) => true,
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cleaned::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Cleaned::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cleaned::Int(n) => Some(*n as f64),
            Cleaned::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cleaned::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cleaned::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Cleaned]> {
        match self {
            Cleaned::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Cleaned::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Convert back into plain JSON. Dates and times become ISO 8601
    /// strings, so the output of a successful `clean` can be cleaned again.
    pub fn to_json(&self) -> Value {
        match self {
            Cleaned::Null => Value::Null,
            Cleaned::Bool(b) => Value::Bool(*b),
            Cleaned::Int(n) => Value::Number((*n).into()),
            Cleaned::Float(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
            Cleaned::Str(s) => Value::String(s.clone()),
            Cleaned::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            Cleaned::DateTime(datetime) => Value::String(format!(
                "{}{}{}",
                datetime.format("%Y-%m-%dT%H:%M:%S"),
                fraction(datetime.nanosecond()),
                offset_to_string(datetime.offset(), true),
            )),
            Cleaned::NaiveDateTime(datetime) => Value::String(format!(
                "{}{}",
                datetime.format("%Y-%m-%dT%H:%M:%S"),
                fraction(datetime.nanosecond()),
            )),
            Cleaned::Time(time, offset) => {
                let mut out = format!("{}{}", time.format("%H:%M:%S"), fraction(time.nanosecond()));
                if let Some(offset) = offset {
                    // Times accept offsets without a colon, which is the only
                    // way a long fraction plus an offset fits.
                    let colon = out.len() + 6 <= TIME_MAX_LENGTH;
                    out.push_str(&offset_to_string(offset, colon));
                }
                Value::String(out)
            }
            Cleaned::YearMonth(year, month) => Value::String(format!("{:04}-{:02}", year, month)),
            Cleaned::List(items) => Value::Array(items.iter().map(Cleaned::to_json).collect()),
            Cleaned::Record(record) => Value::Object(record_to_json(record)),
            Cleaned::Json(value) => value.clone(),
        }
    }
}

/// Fractional seconds with trailing zeros dropped, so a value never prints
/// longer than it was written.
fn fraction(nanos: u32) -> String {
    let nanos = nanos % 1_000_000_000;
    if nanos == 0 {
        return String::new();
    }
    format!(".{:09}", nanos).trim_end_matches('0').to_owned()
}

fn offset_to_string(offset: &FixedOffset, colon: bool) -> String {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return "Z".to_owned();
    }

    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    if colon {
        format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
    } else {
        format!("{}{:02}{:02}", sign, minutes / 60, minutes % 60)
    }
}

/// Convert a cleaned record back into a JSON object.
pub fn record_to_json(record: &Record) -> Map<String, Value> {
    record
        .iter()
        .map(|(name, value)| (name.clone(), value.to_json()))
        .collect()
}

impl Serialize for Cleaned {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl From<bool> for Cleaned {
    fn from(b: bool) -> Self {
        Cleaned::Bool(b)
    }
}

impl From<i64> for Cleaned {
    fn from(n: i64) -> Self {
        Cleaned::Int(n)
    }
}

impl From<f64> for Cleaned {
    fn from(n: f64) -> Self {
        Cleaned::Float(n)
    }
}

impl From<&str> for Cleaned {
    fn from(s: &str) -> Self {
        Cleaned::Str(s.to_owned())
    }
}

impl From<String> for Cleaned {
    fn from(s: String) -> Self {
        Cleaned::Str(s)
    }
}

impl From<Value> for Cleaned {
    fn from(value: Value) -> Self {
        Cleaned::Json(value)
    }
}
