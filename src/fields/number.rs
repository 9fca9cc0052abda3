use crate::errors::{ErrorNode, SchemaError};
use crate::field::{expect_type, Configure, Field, FieldOptions, FIELD_MESSAGES, TYPED_MESSAGES};
use crate::messages::{ErrorKind, MessageChain, MessageTable};
use crate::value::Cleaned;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

pub const NUMBER_MESSAGES: MessageTable = &[
    (ErrorKind::MIN_VALUE, "This must be equal to or greater than the minimum of {min}"),
    (ErrorKind::MAX_VALUE, "This must be equal to or less than the maximum of {max}"),
];

const NUMBER_CHAIN: MessageChain = &[NUMBER_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];
const TYPED_CHAIN: MessageChain = &[TYPED_MESSAGES, FIELD_MESSAGES];

/// Accepts `true` and `false`, and nothing else.
#[derive(Clone, Debug, Default)]
pub struct BooleanField {
    options: FieldOptions,
}

impl BooleanField {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Configure for BooleanField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }
}

impl Field for BooleanField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        expect_type(self, "boolean", raw, Value::as_bool).map(Cleaned::Bool)
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn messages(&self) -> MessageChain {
        TYPED_CHAIN
    }
}

/// Which JSON numbers a [`NumberField`](struct.NumberField.html) accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumberKind {
    /// Any number. Integers clean to `Cleaned::Int`, everything else to
    /// `Cleaned::Float`.
    Any,

    /// Integers only. `1.0` is a float, and is rejected.
    Integer,

    /// Floats only.
    Float,
}

impl NumberKind {
    fn type_name(self) -> &'static str {
        match self {
            NumberKind::Any => "number",
            NumberKind::Integer => "integer",
            NumberKind::Float => "float",
        }
    }

    fn extract(self, raw: &Value) -> Option<Cleaned> {
        match self {
            NumberKind::Any => raw
                .as_i64()
                .map(Cleaned::Int)
                .or_else(|| raw.as_f64().map(Cleaned::Float)),
            NumberKind::Integer => raw.as_i64().map(Cleaned::Int),
            NumberKind::Float if raw.is_f64() => raw.as_f64().map(Cleaned::Float),
            NumberKind::Float => None,
        }
    }
}

/// An inclusive limit on a [`NumberField`](struct.NumberField.html).
///
/// Integer bounds compare exactly against integer values, so limits beyond
/// 2^53 still work for integer fields.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumberBound {
    Int(i64),
    Float(f64),
}

impl NumberBound {
    /// Where `value` lies relative to this bound.
    fn compare(self, value: &Cleaned) -> Option<Ordering> {
        match (value, self) {
            (Cleaned::Int(n), NumberBound::Int(bound)) => Some(n.cmp(&bound)),
            (Cleaned::Int(n), NumberBound::Float(bound)) => (*n as f64).partial_cmp(&bound),
            (Cleaned::Float(n), bound) => n.partial_cmp(&bound.as_f64()),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            NumberBound::Int(n) => n as f64,
            NumberBound::Float(n) => n,
        }
    }

    fn exceeds(self, other: NumberBound) -> bool {
        match (self, other) {
            (NumberBound::Int(a), NumberBound::Int(b)) => a > b,
            (a, b) => a.as_f64() > b.as_f64(),
        }
    }
}

impl fmt::Display for NumberBound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumberBound::Int(n) => write!(f, "{}", n),
            NumberBound::Float(n) => write!(f, "{}", n),
        }
    }
}

macro_rules! bound_from {
    ($variant:ident: $($ty:ty),*) => {
        $(
            impl From<$ty> for NumberBound {
                fn from(n: $ty) -> Self {
                    NumberBound::$variant(n.into())
                }
            }
        )*
    };
}

bound_from!(Int: i8, i16, i32, i64, u8, u16, u32);
bound_from!(Float: f32, f64);

/// Accepts numbers, optionally within an inclusive range.
#[derive(Clone, Debug)]
pub struct NumberField {
    options: FieldOptions,
    kind: NumberKind,
    min: Option<NumberBound>,
    max: Option<NumberBound>,
}

impl NumberField {
    /// A field accepting any number.
    pub fn new() -> Self {
        Self::of_kind(NumberKind::Any)
    }

    /// A field accepting integers only.
    pub fn integer() -> Self {
        Self::of_kind(NumberKind::Integer)
    }

    /// A field accepting floats only.
    pub fn float() -> Self {
        Self::of_kind(NumberKind::Float)
    }

    pub fn of_kind(kind: NumberKind) -> Self {
        Self {
            options: FieldOptions::default(),
            kind,
            min: None,
            max: None,
        }
    }

    pub fn min<N: Into<NumberBound>>(mut self, min: N) -> Self {
        self.min = Some(min.into());
        self
    }

    pub fn max<N: Into<NumberBound>>(mut self, max: N) -> Self {
        self.max = Some(max.into());
        self
    }

    pub fn kind(&self) -> NumberKind {
        self.kind
    }
}

impl Default for NumberField {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for NumberField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }
}

impl Field for NumberField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let kind = self.kind;
        let value = expect_type(self, kind.type_name(), raw, |raw| kind.extract(raw))?;
        if let Some(min) = self.min {
            if min.compare(&value) == Some(Ordering::Less) {
                return Err(self.error(ErrorKind::MIN_VALUE, &[("min", min.to_string())]));
            }
        }

        if let Some(max) = self.max {
            if max.compare(&value) == Some(Ordering::Greater) {
                return Err(self.error(ErrorKind::MAX_VALUE, &[("max", max.to_string())]));
            }
        }

        Ok(value)
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn messages(&self) -> MessageChain {
        NUMBER_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min.exceeds(max) => Err(SchemaError::InvalidBounds {
                field: name.to_owned(),
                min: min.to_string(),
                max: max.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
