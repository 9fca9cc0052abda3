use crate::errors::ErrorNode;
use crate::field::{expect_type, Configure, Field, FieldOptions, FIELD_MESSAGES, TYPED_MESSAGES};
use crate::messages::MessageChain;
use crate::schema::Schema;
use crate::value::Cleaned;
use serde_json::Value;
use std::sync::Arc;

const NESTED_CHAIN: MessageChain = &[TYPED_MESSAGES, FIELD_MESSAGES];

/// Cleans a nested object with a schema of its own.
///
/// Errors from the nested schema stay nested: they appear under this field's
/// name in the parent's errors, not merged into the parent.
///
/// ```
/// use cleanse::fields::{CharacterField, ChoiceField, NestedValidator, StringField};
/// use cleanse::Schema;
///
/// let address = Schema::builder("Address")
///     .field("street", StringField::new().min_length(1))
///     .field("postcode", CharacterField::digits().min_length(4).max_length(4))
///     .field("state", ChoiceField::new("ACT NSW NT QLD SA TAS VIC WA".split(' ')))
///     .build()
///     .unwrap();
///
/// let person = Schema::builder("Person")
///     .field("name", StringField::new())
///     .field("address", NestedValidator::new(address))
///     .build()
///     .unwrap();
/// # assert_eq!(person.len(), 2);
/// ```
#[derive(Debug)]
pub struct NestedValidator {
    options: FieldOptions,
    schema: Arc<Schema>,
}

impl NestedValidator {
    pub fn new<S: Into<Arc<Schema>>>(schema: S) -> Self {
        Self {
            options: FieldOptions::default(),
            schema: schema.into(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Configure for NestedValidator {
    fn options_mut(&mut self) -> &mut FieldOptions {
        &mut self.options
    }
}

impl Field for NestedValidator {
    fn clean(&self, raw: &Value) -> Result<Cleaned, ErrorNode> {
        let object = expect_type(self, "object", raw, Value::as_object)?;
        self.schema
            .clean(object)
            .map(Cleaned::Record)
            .map_err(ErrorNode::from)
    }

    fn options(&self) -> &FieldOptions {
        &self.options
    }

    fn messages(&self) -> MessageChain {
        NESTED_CHAIN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_util::{err, ok};
    use crate::fields::{ListField, NumberField, StringField};
    use crate::value::Record;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn item_schema() -> Schema {
        Schema::builder("Item")
            .field("int", NumberField::integer())
            .field("string", StringField::new())
            .build()
            .unwrap()
    }

    fn record(int: i64, string: &str) -> Cleaned {
        let mut record = Record::new();
        record.insert("int".to_owned(), Cleaned::Int(int));
        record.insert("string".to_owned(), Cleaned::from(string));
        Cleaned::Record(record)
    }

    #[test]
    fn nested_validator() {
        let field = NestedValidator::new(item_schema());
        assert_eq!(ok(&field, json!({ "string": "foo", "int": 10 })), record(10, "foo"));
        assert_eq!(err(&field, json!("foo")), "Expected a value of type 'object'");
    }

    #[test]
    fn nested_lists() {
        let field = ListField::new(NestedValidator::new(item_schema()));
        assert_eq!(
            ok(
                &field,
                json!([
                    { "int": 0, "string": "foo" },
                    { "int": 1, "string": "bar" },
                    { "int": 2, "string": "baz" },
                ])
            ),
            Cleaned::List(vec![record(0, "foo"), record(1, "bar"), record(2, "baz")])
        );
    }

    #[test]
    fn shared_schema() {
        let schema = Arc::new(item_schema());
        let first = NestedValidator::new(schema.clone());
        let second = NestedValidator::new(schema);
        assert_eq!(
            ok(&first, json!({ "int": 1, "string": "a" })),
            ok(&second, json!({ "int": 1, "string": "a" }))
        );
    }
}
