use crate::errors::{ErrorNode, SchemaError};
use crate::field::{Configure, Field, FieldOptions, FIELD_MESSAGES};
use crate::messages::{ErrorKind, MessageChain, MessageTable};
use crate::value::Cleaned;
use serde_json::Value;

pub const CHOICE_MESSAGES: MessageTable = &[(ErrorKind::INVALID_CHOICE, "Not a valid choice")];

const CHOICE_CHAIN: MessageChain = &[CHOICE_MESSAGES, FIELD_MESSAGES];

/// Accepts only values from a fixed set of choices, of any JSON type.
///
/// `null` is an ordinary choice: listing it among the choices accepts it.
#[derive(Clone, Debug)]
pub struct ChoiceField {
    options: FieldOptions,
    choices: Vec<Value>,
}

impl ChoiceField {
    pub fn new<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            options: FieldOptions::default(),
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn choices(&self) -> &[Value] {
        &self.choices
    }
}

impl Configure for ChoiceField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }
}

impl Field for ChoiceField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        if self.choices.contains(raw) {
            Ok(Cleaned::Json(raw.clone()))
        } else {
            Err(self.error(ErrorKind::INVALID_CHOICE, &[]))
        }
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn messages(&self) -> MessageChain {
        CHOICE_CHAIN
    }

    fn cleans_null(&self) -> bool {
        self.choices.contains(&Value::Null)
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        if self.choices.is_empty() {
            return Err(SchemaError::EmptyChoices {
                field: name.to_owned(),
            });
        }
        Ok(())
    }
}

/// Accepts only the keys of a fixed mapping, and cleans each key to the
/// value it maps to.
///
/// ```
/// use cleanse::fields::ChoiceMapField;
/// use cleanse::{Cleaned, Field};
/// use serde_json::json;
///
/// let field = ChoiceMapField::new(vec![(json!(1), "one"), (json!(2), "two")]);
/// assert_eq!(field.clean(&json!(1)), Ok(Cleaned::from("one")));
/// assert!(field.clean(&json!("one")).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct ChoiceMapField {
    options: FieldOptions,
    choices: Vec<(Value, Cleaned)>,
}

impl ChoiceMapField {
    pub fn new<I, K, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Cleaned>,
    {
        Self {
            options: FieldOptions::default(),
            choices: choices
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

impl Configure for ChoiceMapField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }
}

impl Field for ChoiceMapField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        self.choices
            .iter()
            .find(|(key, _)| key == raw)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| self.error(ErrorKind::INVALID_CHOICE, &[]))
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn messages(&self) -> MessageChain {
        CHOICE_CHAIN
    }

    fn cleans_null(&self) -> bool {
        self.choices.iter().any(|(key, _)| key.is_null())
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        if self.choices.is_empty() {
            return Err(SchemaError::EmptyChoices {
                field: name.to_owned(),
            });
        }
        Ok(())
    }
}
