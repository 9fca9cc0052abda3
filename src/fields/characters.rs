use crate::errors::{ErrorNode, SchemaError};
use crate::field::{expect_type, Configure, Field, FieldOptions, FIELD_MESSAGES, TYPED_MESSAGES};
use crate::messages::{ErrorKind, MessageChain, MessageTable};
use crate::value::Cleaned;
use serde_json::Value;

pub const CHARACTER_MESSAGES: MessageTable = &[
    (ErrorKind::ALLOWED_CHARACTERS, "Only the characters '{alphabet}{punctuation}' are allowed"),
    (ErrorKind::MIN_LENGTH, "Minimum length {min}"),
    (ErrorKind::MAX_LENGTH, "Maximum length {max}"),
];

pub const CREDIT_CARD_MESSAGES: MessageTable =
    &[(ErrorKind::LUHN_CHECKSUM, "The credit card number is not valid")];

const CHARACTER_CHAIN: MessageChain = &[CHARACTER_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];
const CREDIT_CARD_CHAIN: MessageChain =
    &[CREDIT_CARD_MESSAGES, CHARACTER_MESSAGES, TYPED_MESSAGES, FIELD_MESSAGES];

const DIGITS: &str = "0123456789";

/// Accepts strings made of characters from an alphabet, optionally
/// punctuated.
///
/// Punctuation characters are allowed anywhere in the input and stripped
/// from the cleaned output. Length bounds apply to the output, after
/// punctuation has been removed.
#[derive(Clone, Debug)]
pub struct CharacterField {
    options: FieldOptions,
    alphabet: String,
    punctuation: String,
    min_length: usize,
    max_length: Option<usize>,
}

impl CharacterField {
    pub fn new<A: Into<String>, P: Into<String>>(alphabet: A, punctuation: P) -> Self {
        Self {
            options: FieldOptions::default(),
            alphabet: alphabet.into(),
            punctuation: punctuation.into(),
            min_length: 0,
            max_length: None,
        }
    }

    /// Only characters from `alphabet`, without any punctuation.
    pub fn restricted<A: Into<String>>(alphabet: A) -> Self {
        Self::new(alphabet, "")
    }

    /// Only the digits `0-9`. The value is not treated as a number, so
    /// leading zeros are kept.
    pub fn digits() -> Self {
        Self::restricted(DIGITS)
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    fn clean_chars(&self, outer: &dyn Field, raw: &Value) -> Result<String, ErrorNode> {
        let value = expect_type(outer, "string", raw, Value::as_str)?;

        let stripped: String = value.chars().filter(|c| !self.punctuation.contains(*c)).collect();
        if stripped.chars().any(|c| !self.alphabet.contains(c)) {
            return Err(outer.error(
                ErrorKind::ALLOWED_CHARACTERS,
                &[
                    ("alphabet", self.alphabet.clone()),
                    ("punctuation", self.punctuation.clone()),
                ],
            ));
        }

        let len = stripped.chars().count();
        if len < self.min_length {
            return Err(outer.error(ErrorKind::MIN_LENGTH, &[("min", self.min_length.to_string())]));
        }

        if let Some(max_length) = self.max_length {
            if len > max_length {
                return Err(outer.error(ErrorKind::MAX_LENGTH, &[("max", max_length.to_string())]));
            }
        }

        Ok(stripped)
    }
}

impl Configure for CharacterField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }
}

impl Field for CharacterField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        self.clean_chars(self, raw).map(Cleaned::Str)
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn messages(&self) -> MessageChain {
        CHARACTER_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        if self.alphabet.is_empty() {
            return Err(SchemaError::EmptyAlphabet {
                field: name.to_owned(),
            });
        }

        if let Some(character) = self.punctuation.chars().find(|c| self.alphabet.contains(*c)) {
            return Err(SchemaError::AmbiguousCharacter {
                field: name.to_owned(),
                character,
            });
        }

        match self.max_length {
            Some(max_length) if max_length < self.min_length => Err(SchemaError::InvalidBounds {
                field: name.to_owned(),
                min: self.min_length.to_string(),
                max: max_length.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Accepts credit card numbers of 12 to 20 digits, optionally punctuated
/// with spaces and dashes, which pass the Luhn checksum.
///
/// The cleaned value is the bare digits.
#[derive(Clone, Debug)]
pub struct CreditCardField {
    characters: CharacterField,
}

impl CreditCardField {
    pub fn new() -> Self {
        Self {
            characters: CharacterField::new(DIGITS, " -").min_length(12).max_length(20),
        }
    }
}

impl Default for CreditCardField {
    fn default() -> Self {
        Self::new()
    }
}

impl Configure for CreditCardField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        self.characters.options_mut()
    }
}

impl Field for CreditCardField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let number = self.characters.clean_chars(self, raw)?;
        if !luhn_checksum(&number) {
            return Err(self.error(ErrorKind::LUHN_CHECKSUM, &[]));
        }
        Ok(Cleaned::Str(number))
    }

    fn options(&self) -> &FieldOptions {
        self.characters.options()
    }

    fn messages(&self) -> MessageChain {
        CREDIT_CARD_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        self.characters.check(name)
    }
}

/// `digits` must be ASCII digits only.
fn luhn_checksum(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .map(|b| u32::from(b - b'0'))
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { d } else { (d * 2) / 10 + (d * 2) % 10 })
        .sum();
    sum % 10 == 0
}
