//! Schemas: named, ordered collections of fields.
//!
//! A schema can be put together ad hoc with
//! [`Schema::builder`](struct.Schema.html#method.builder), or declared once
//! per type by implementing [`Declare`](trait.Declare.html).
//!
//! Either way, a built [`Schema`](struct.Schema.html) never changes. It holds
//! no state between calls to [`clean`](struct.Schema.html#method.clean), so a
//! single instance can be shared across threads and requests.

use crate::errors::SchemaError;
use crate::field::Field;
use crate::messages::{ErrorKind, MessageTable};
use crate::validator::Config;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Messages shared by every schema.
pub const SCHEMA_MESSAGES: MessageTable = &[(ErrorKind::UNKNOWN, "Unknown field")];

/// A validated set of named fields.
pub struct Schema {
    pub(crate) name: String,
    pub(crate) fields: Vec<(String, Arc<dyn Field>)>,
    pub(crate) index: HashMap<String, usize>,
    pub(crate) config: Config,
    pub(crate) messages: Vec<MessageTable>,
}

impl Schema {
    /// Start declaring a new schema.
    pub fn builder<T: Into<String>>(name: T) -> SchemaBuilder {
        SchemaBuilder::new(name)
    }

    /// Build the schema declared by `D`.
    pub fn declared<D: Declare>() -> Result<Schema, SchemaError> {
        D::declare(Schema::builder(D::NAME)).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The field declared as `name`, if any.
    pub fn field(&self, name: &str) -> Option<&dyn Field> {
        self.index.get(name).map(|&i| self.fields[i].1.as_ref())
    }

    /// Every field, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &dyn Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field.as_ref()))
    }

    /// The number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn allows_unknown_fields(&self) -> bool {
        self.config.allows_unknown_fields()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Schema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("config", &self.config)
            .finish()
    }
}

/// A schema declared once per type.
///
/// Declarations form a single chain: a schema extending another calls its
/// parent's `declare` before adding (or replacing) its own fields.
///
/// ```
/// use cleanse::fields::{EmailField, NumberField, StringField};
/// use cleanse::{Declare, ErrorKind, MessageTable, Schema, SchemaBuilder};
///
/// struct Person;
///
/// impl Declare for Person {
///     const NAME: &'static str = "Person";
///
///     fn declare(builder: SchemaBuilder) -> SchemaBuilder {
///         builder
///             .field("name", StringField::new())
///             .field("height", NumberField::new().min(0))
///     }
/// }
///
/// struct Employee;
///
/// const EMPLOYEE_MESSAGES: MessageTable = &[(ErrorKind::UNKNOWN, "Not an employee attribute")];
///
/// impl Declare for Employee {
///     const NAME: &'static str = "Employee";
///
///     fn declare(builder: SchemaBuilder) -> SchemaBuilder {
///         Person::declare(builder)
///             .field("email", EmailField::new())
///             .default_messages(EMPLOYEE_MESSAGES)
///     }
/// }
///
/// let employee = Schema::declared::<Employee>().unwrap();
/// let names: Vec<_> = employee.fields().map(|(name, _)| name).collect();
/// assert_eq!(names, vec!["name", "height", "email"]);
/// ```
pub trait Declare {
    /// The name of the declared schema.
    const NAME: &'static str;

    /// Add this schema's fields and settings to `builder`.
    fn declare(builder: SchemaBuilder) -> SchemaBuilder;
}

/// Collects fields and settings, then checks them all at once in
/// [`build`](#method.build).
pub struct SchemaBuilder {
    name: String,
    fields: Vec<(String, Arc<dyn Field>)>,
    config: Config,
    messages: Vec<MessageTable>,
}

impl SchemaBuilder {
    pub fn new<T: Into<String>>(name: T) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            config: Config::default(),
            messages: Vec::new(),
        }
    }

    /// Declare a field. Declaring a name twice replaces the earlier field,
    /// keeping its position.
    pub fn field<T: Into<String>, F: Field + 'static>(self, name: T, field: F) -> Self {
        self.shared_field(name, Arc::new(field))
    }

    /// Declare a field which is also used elsewhere.
    pub fn shared_field<T: Into<String>>(mut self, name: T, field: Arc<dyn Field>) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = field,
            None => self.fields.push((name, field)),
        }
        self
    }

    /// Copy every field and message table of `parent` into this schema.
    pub fn extend(mut self, parent: &Schema) -> Self {
        for (name, field) in &parent.fields {
            self = self.shared_field(name.as_str(), field.clone());
        }

        for table in &parent.messages {
            if *table != SCHEMA_MESSAGES && !self.messages.contains(table) {
                self.messages.push(*table);
            }
        }
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn allow_unknown_fields(mut self, allow: bool) -> Self {
        self.config.allow_unknown_fields(allow);
        self
    }

    /// Override a schema-level message, such as the one for unknown fields.
    pub fn message<T: Into<String>>(mut self, kind: ErrorKind, template: T) -> Self {
        self.config.error_message(kind, template);
        self
    }

    /// Add the default messages of a schema type. Tables added later take
    /// precedence, so a declaration extending another should add its table
    /// after calling its parent's `declare`.
    pub fn default_messages(mut self, table: MessageTable) -> Self {
        self.messages.insert(0, table);
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut index = HashMap::with_capacity(self.fields.len());
        for (i, (name, field)) in self.fields.iter().enumerate() {
            if name.is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    schema: self.name.clone(),
                });
            }
            field.check(name)?;
            index.insert(name.clone(), i);
        }

        let mut messages = self.messages;
        messages.push(SCHEMA_MESSAGES);

        debug!(schema = %self.name, fields = self.fields.len(), "built schema");

        Ok(Schema {
            name: self.name,
            fields: self.fields,
            index,
            config: self.config,
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{BooleanField, DateField, NumberField, StringField};
    use serde_json::json;

    struct Parent;

    impl Declare for Parent {
        const NAME: &'static str = "Parent";

        fn declare(builder: SchemaBuilder) -> SchemaBuilder {
            builder
                .field("int", NumberField::integer())
                .field("override", BooleanField::new())
        }
    }

    struct Child;

    impl Declare for Child {
        const NAME: &'static str = "Child";

        fn declare(builder: SchemaBuilder) -> SchemaBuilder {
            Parent::declare(builder)
                .field("string", StringField::new())
                .field("override", DateField::new())
        }
    }

    fn names(schema: &Schema) -> Vec<&str> {
        schema.fields().map(|(name, _)| name).collect()
    }

    #[test]
    fn declaration_order_is_kept() -> Result<(), SchemaError> {
        let schema = Schema::declared::<Parent>()?;
        assert_eq!(schema.name(), "Parent");
        assert_eq!(names(&schema), vec!["int", "override"]);
        Ok(())
    }

    #[test]
    fn child_declarations_replace_in_place() -> Result<(), SchemaError> {
        let schema = Schema::declared::<Child>()?;
        assert_eq!(names(&schema), vec!["int", "override", "string"]);
        assert!(format!("{:?}", schema.field("override")).contains("DateField"));
        Ok(())
    }

    #[test]
    fn extend_copies_fields() -> Result<(), SchemaError> {
        let parent = Schema::declared::<Parent>()?;
        let schema = Schema::builder("Extended")
            .extend(&parent)
            .field("extra", StringField::new())
            .build()?;
        assert_eq!(names(&schema), vec!["int", "override", "extra"]);
        Ok(())
    }

    const ANIMAL_MESSAGES: MessageTable = &[(ErrorKind::UNKNOWN, "Not an animal attribute")];
    const DOG_MESSAGES: MessageTable = &[(ErrorKind::UNKNOWN, "Not a dog attribute")];

    struct Animal;

    impl Declare for Animal {
        const NAME: &'static str = "Animal";

        fn declare(builder: SchemaBuilder) -> SchemaBuilder {
            Parent::declare(builder).default_messages(ANIMAL_MESSAGES)
        }
    }

    struct Dog;

    impl Declare for Dog {
        const NAME: &'static str = "Dog";

        fn declare(builder: SchemaBuilder) -> SchemaBuilder {
            Animal::declare(builder)
                .field("good", BooleanField::new())
                .default_messages(DOG_MESSAGES)
        }
    }

    fn unknown_message(schema: &Schema) -> String {
        let input = json!({ "int": 1, "override": true, "good": true, "wings": 2 });
        let errors = schema.clean(input.as_object().unwrap()).unwrap_err();
        errors
            .flatten()
            .into_iter()
            .find(|(path, _)| path.to_string() == "wings")
            .map(|(_, message)| message)
            .unwrap()
    }

    #[test]
    fn nearest_declared_messages_win() -> Result<(), SchemaError> {
        assert_eq!(unknown_message(&Schema::declared::<Parent>()?), "Unknown field");
        assert_eq!(unknown_message(&Schema::declared::<Animal>()?), "Not an animal attribute");
        assert_eq!(unknown_message(&Schema::declared::<Dog>()?), "Not a dog attribute");
        Ok(())
    }

    #[test]
    fn extend_keeps_one_base_table() -> Result<(), SchemaError> {
        let dog = Schema::declared::<Dog>()?;
        let schema = Schema::builder("Extended").extend(&dog).build()?;

        assert_eq!(schema.messages, vec![DOG_MESSAGES, ANIMAL_MESSAGES, SCHEMA_MESSAGES]);
        assert_eq!(unknown_message(&schema), "Not a dog attribute");
        Ok(())
    }

    #[test]
    fn empty_names_are_rejected() {
        let result = Schema::builder("Broken").field("", StringField::new()).build();
        assert_eq!(
            result.err(),
            Some(SchemaError::EmptyFieldName {
                schema: "Broken".to_owned()
            })
        );
    }

    #[test]
    fn field_configuration_is_checked() {
        let result = Schema::builder("Broken")
            .field("n", NumberField::new().min(10).max(1))
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn lookups() -> Result<(), SchemaError> {
        let schema = Schema::declared::<Parent>()?;
        assert!(schema.field("int").is_some());
        assert!(schema.field("nope").is_none());
        assert_eq!(schema.len(), 2);
        assert!(!schema.allows_unknown_fields());
        Ok(())
    }
}
