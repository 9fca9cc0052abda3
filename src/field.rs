//! The contract every field satisfies.
//!
//! A [`Field`](trait.Field.html) turns one raw JSON value into a
//! [`Cleaned`](../value/enum.Cleaned.html) value, or reports why it can't.
//! Fields are configured once, when a schema is declared, and never change
//! afterwards; cleaning has no side effects, so one field can be shared by
//! any number of threads.
//!
//! Whether a value is present at all, and whether it's `null`, is decided
//! here by [`clean_value`](fn.clean_value.html) before a field's own
//! [`clean`](trait.Field.html#tymethod.clean) ever runs.

use crate::errors::{ErrorNode, SchemaError, ValidationError};
use crate::messages::{ErrorKind, MessageChain, MessageTable, Messages};
use crate::value::Cleaned;
use serde_json::Value;
use std::fmt;

/// Messages shared by every field.
pub const FIELD_MESSAGES: MessageTable = &[
    (ErrorKind::REQUIRED, "This field is required"),
    (ErrorKind::NULL, "This field can not be null"),
];

/// Messages shared by every field that expects a particular JSON type.
pub const TYPED_MESSAGES: MessageTable = &[(ErrorKind::INVALID, "Expected a value of type '{type}'")];

/// Validates and cleans a single value.
pub trait Field: fmt::Debug + Send + Sync {
    /// Clean a present, non-`null` value (or `null`, if
    /// [`cleans_null`](#method.cleans_null) says so).
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode>;

    /// The configuration shared by all fields.
    fn options(&self) -> &FieldOptions;

    /// The default message tables of this kind of field, nearest first.
    fn messages(&self) -> MessageChain {
        &[FIELD_MESSAGES]
    }

    /// Whether `null` is an ordinary input for this field, to be handed to
    /// [`clean`](#tymethod.clean) rather than rejected up front.
    fn cleans_null(&self) -> bool {
        false
    }

    /// Check that this field's configuration makes sense. Called once when
    /// the schema holding it is built; `name` is the field's name there.
    fn check(&self, _name: &str) -> Result<(), SchemaError> {
        Ok(())
    }

    /// Build the error for `kind`, rendered with this field's messages.
    fn error(&self, kind: ErrorKind, params: &[(&str, String)]) -> ErrorNode {
        let message = self.options().messages.render(self.messages(), kind, params);
        ValidationError::new(kind, message).into()
    }
}

/// Configuration common to all fields.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldOptions {
    /// Must the key be present in the input. Absent optional fields are left
    /// out of the cleaned output.
    pub required: bool,

    /// Used in place of an absent value. A default is cleaned just like
    /// supplied data would be.
    pub default: Option<Value>,

    /// Is `null` an acceptable value. Accepted `null`s clean to
    /// `Cleaned::Null`.
    pub allow_null: bool,

    /// Message overrides for this field alone.
    pub messages: Messages,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            required: true,
            default: None,
            allow_null: false,
            messages: Messages::new(),
        }
    }
}

/// Builder methods available on every field.
pub trait Configure: Sized {
    fn options_mut(&mut self) -> &mut FieldOptions;

    /// Allow the field to be absent from the input.
    fn optional(self) -> Self {
        self.required(false)
    }

    fn required(mut self, required: bool) -> Self {
        self.options_mut().required = required;
        self
    }

    /// Use `value` when the field is absent from the input.
    fn default_value<V: Into<Value>>(mut self, value: V) -> Self {
        self.options_mut().default = Some(value.into());
        self
    }

    /// Accept `null` as a value.
    fn nullable(mut self) -> Self {
        self.options_mut().allow_null = true;
        self
    }

    /// Override the message used for `kind`.
    fn message<T: Into<String>>(mut self, kind: ErrorKind, template: T) -> Self {
        self.options_mut().messages.set(kind, template);
        self
    }
}

/// Clean the value found (or not found) for a field.
///
/// Returns `Ok(None)` when the value is absent, there is no default, and the
/// field is optional: the key is then left out of the output.
pub fn clean_value(field: &dyn Field, raw: Option<&Value>) -> Result<Option<Cleaned>, ErrorNode> {
    let options = field.options();
    match raw.or_else(|| options.default.as_ref()) {
        Some(raw) => clean_present(field, raw).map(Some),
        None if options.required => Err(field.error(ErrorKind::REQUIRED, &[])),
        None => Ok(None),
    }
}

/// Clean a value which is known to be present, such as a list element.
pub fn clean_present(field: &dyn Field, raw: &Value) -> Result<Cleaned, ErrorNode> {
    if raw.is_null() && !field.cleans_null() {
        return if field.options().allow_null {
            Ok(Cleaned::Null)
        } else {
            Err(field.error(ErrorKind::NULL, &[]))
        };
    }

    field.clean(raw)
}

/// Check the JSON type of `raw`, rejecting it with an `invalid` error naming
/// `type_name` if `extract` can't make sense of it.
pub fn expect_type<'v, T, F>(
    field: &dyn Field,
    type_name: &str,
    raw: &'v Value,
    extract: F,
) -> Result<T, ErrorNode>
where
    F: FnOnce(&'v Value) -> Option<T>,
{
    extract(raw).ok_or_else(|| field.error(ErrorKind::INVALID, &[("type", type_name.to_owned())]))
}

/// Accepts any value, unchanged.
///
/// By itself this only enforces the required and `null` behaviour common to
/// all fields.
#[derive(Clone, Debug, Default)]
pub struct AnyField {
    options: FieldOptions,
}

impl AnyField {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Configure for AnyField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }
}

impl Field for AnyField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        Ok(Cleaned::Json(raw.clone()))
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message(result: Result<Option<Cleaned>, ErrorNode>) -> String {
        match result {
            Err(ErrorNode::Leaf(error)) => error.message().to_owned(),
            other => panic!("expected a leaf error, got {:?}", other),
        }
    }

    #[test]
    fn present_values_pass_through() {
        let field = AnyField::new();
        assert_eq!(
            clean_value(&field, Some(&json!("hello"))),
            Ok(Some(Cleaned::Json(json!("hello"))))
        );
        assert_eq!(
            clean_value(&field, Some(&json!(""))),
            Ok(Some(Cleaned::Json(json!(""))))
        );
    }

    #[test]
    fn missing_required() {
        let field = AnyField::new();
        assert_eq!(message(clean_value(&field, None)), "This field is required");
    }

    #[test]
    fn missing_optional_is_omitted() {
        let field = AnyField::new().optional();
        assert_eq!(clean_value(&field, None), Ok(None));
    }

    #[test]
    fn missing_uses_default() {
        let field = AnyField::new().default_value(42);
        assert_eq!(
            clean_value(&field, None),
            Ok(Some(Cleaned::Json(json!(42))))
        );
    }

    #[test]
    fn null_rejected_unless_nullable() {
        assert_eq!(
            message(clean_value(&AnyField::new(), Some(&Value::Null))),
            "This field can not be null"
        );
        assert_eq!(
            clean_value(&AnyField::new().nullable(), Some(&Value::Null)),
            Ok(Some(Cleaned::Null))
        );
    }

    #[test]
    fn instance_messages_override_defaults() {
        let field = AnyField::new().message(ErrorKind::REQUIRED, "Please fill this in");
        assert_eq!(message(clean_value(&field, None)), "Please fill this in");
    }
}
