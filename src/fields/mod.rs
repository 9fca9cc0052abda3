//! The fields this crate provides.
//!
//! Scalar fields check the JSON type of their input first, then apply their
//! own value-level rules. [`ListField`](struct.ListField.html) and
//! [`NestedValidator`](struct.NestedValidator.html) recurse into arrays and
//! objects, collecting the errors of every element or property.

mod characters;
mod choice;
mod datetime;
mod list;
mod nested;
mod number;
mod string;

pub use self::characters::{CharacterField, CreditCardField, CHARACTER_MESSAGES, CREDIT_CARD_MESSAGES};
pub use self::choice::{ChoiceField, ChoiceMapField, CHOICE_MESSAGES};
pub use self::datetime::{
    DateField, DateTimeField, TimeField, YearMonthField, DATETIME_MESSAGES, DATE_MESSAGES,
    TIME_MESSAGES, YEAR_MONTH_MESSAGES,
};
pub(crate) use self::datetime::TIME_MAX_LENGTH;
pub use self::list::ListField;
pub use self::nested::NestedValidator;
pub use self::number::{BooleanField, NumberBound, NumberField, NumberKind, NUMBER_MESSAGES};
pub use self::string::{EmailField, StringField, UrlField, EMAIL_MESSAGES, STRING_MESSAGES, URL_MESSAGES};

pub use crate::field::AnyField;
