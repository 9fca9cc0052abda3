use crate::errors::{ErrorCollection, ErrorNode, SchemaError};
use crate::field::{clean_present, expect_type, Configure, Field, FieldOptions, FIELD_MESSAGES, TYPED_MESSAGES};
use crate::messages::MessageChain;
use crate::value::Cleaned;
use serde_json::Value;

const LIST_CHAIN: MessageChain = &[TYPED_MESSAGES, FIELD_MESSAGES];

/// Validates every element of an array against one field.
///
/// Anything other than an array is rejected outright. For an array, every
/// element is cleaned even after one fails, and the failures are reported
/// together, keyed by index.
#[derive(Debug)]
pub struct ListField {
    options: FieldOptions,
    field: Box<dyn Field>,
}

impl ListField {
    pub fn new<F: Field + 'static>(field: F) -> Self {
        Self {
            options: FieldOptions::default(),
            field: Box::new(field),
        }
    }

    /// The field each element is cleaned with.
    pub fn field(&self) -> &dyn Field {
        self.field.as_ref()
    }
}

impl Configure for ListField {
    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }
}

impl Field for ListField {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let items = expect_type(self, "list", raw, Value::as_array)?;

        let mut errors = ErrorCollection::new();
        let mut cleaned = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match clean_present(self.field(), item) {
                Ok(value) => cleaned.push(value),
                Err(error) => errors.insert(i, error),
            }
        }

        errors.into_result(Cleaned::List(cleaned)).map_err(ErrorNode::from)
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn messages(&self) -> MessageChain {
        LIST_CHAIN
    }

    fn check(&self, name: &str) -> Result<(), SchemaError> {
        self.field.check(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{ErrorPath, PathSegment};
    use crate::fields::test_util::{err, ok};
    use crate::fields::{NumberField, StringField};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn string_list() {
        let field = ListField::new(StringField::new());
        assert_eq!(
            ok(&field, json!(["foo", "bar", "baz"])),
            Cleaned::List(vec!["foo".into(), "bar".into(), "baz".into()])
        );
        assert_eq!(ok(&field, json!([])), Cleaned::List(vec![]));
    }

    #[test]
    fn not_a_list() {
        let field = ListField::new(NumberField::integer());
        assert_eq!(err(&field, json!({ "0": 1 })), "Expected a value of type 'list'");
        assert_eq!(err(&field, json!("1,2,3")), "Expected a value of type 'list'");
    }

    #[test]
    fn errors_are_indexed() {
        let field = ListField::new(NumberField::integer());
        let errors = match field.clean(&json!([1, "nope", 3, "strings", null])) {
            Err(ErrorNode::Branch(errors)) => errors,
            other => panic!("expected a branch, got {:?}", other),
        };

        let indices: Vec<_> = errors.iter().map(|(segment, _)| segment.clone()).collect();
        assert_eq!(
            indices,
            vec![PathSegment::Index(1), PathSegment::Index(3), PathSegment::Index(4)]
        );
    }

    #[test]
    fn every_element_is_checked() {
        let field = ListField::new(StringField::new().max_length(3));
        let errors = match field.clean(&json!(["ok", "toolong", "x", "waytoolong"])) {
            Err(ErrorNode::Branch(errors)) => errors,
            other => panic!("expected a branch, got {:?}", other),
        };

        assert_eq!(
            errors.flatten(),
            vec![
                (ErrorPath::from(vec![1usize]), "Maximum length 3".to_owned()),
                (ErrorPath::from(vec![3usize]), "Maximum length 3".to_owned()),
            ]
        );
    }

    #[test]
    fn nullable_elements() {
        let field = ListField::new(NumberField::integer().nullable());
        assert_eq!(
            ok(&field, json!([1, null])),
            Cleaned::List(vec![Cleaned::Int(1), Cleaned::Null])
        );
    }
}
